//! Transaction command implementations
//!
//! Writes go through the controller so they follow the same path as the
//! interactive form: validation, AI suggestion, correction reporting, then
//! the backend call and the local mirror.

use anyhow::{bail, Context, Result};
use mymoney_core::{
    AppEvent, ClientConfig, FileStore, FinanceApi, FormField, LocalMirror, Summary, UiSurface,
};

use super::core::{open_controller, CliController};
use crate::cli::{EditArgs, TransactionArgs};
use crate::terminal::{transaction_line, TerminalUi};

fn open_mirror(config: &ClientConfig) -> Result<LocalMirror<FileStore>> {
    let store = FileStore::new(&config.data_dir).with_context(|| {
        format!(
            "Failed to open data directory {}",
            config.data_dir.display()
        )
    })?;
    Ok(LocalMirror::open(store))
}

/// Fail when the last operation showed field errors or an error toast
fn check_outcome<A>(c: &CliController<A>, errors_before: usize, what: &str) -> Result<()>
where
    A: FinanceApi + Clone + 'static,
{
    if !c.state().field_errors.is_empty() {
        bail!("Transaction form is invalid");
    }
    if c.ui().errors_shown() > errors_before {
        bail!("{} failed", what);
    }
    Ok(())
}

/// Type a description, then wait for the AI suggestion to land
async fn describe<A>(c: &mut CliController<A>, description: &str)
where
    A: FinanceApi + Clone + 'static,
{
    c.handle(AppEvent::FieldInput(
        FormField::Description,
        description.to_string(),
    ));
    c.handle(AppEvent::DescriptionBlur);
    c.settle().await;
}

pub async fn cmd_add<A>(api: A, config: ClientConfig, args: &TransactionArgs) -> Result<()>
where
    A: FinanceApi + Clone + 'static,
{
    let mut controller = open_controller(api, config)?;
    add_with(&mut controller, args).await
}

pub async fn add_with<A>(c: &mut CliController<A>, args: &TransactionArgs) -> Result<()>
where
    A: FinanceApi + Clone + 'static,
{
    println!("📝 Adding transaction...");
    let errors_before = c.ui().errors_shown();

    if let Some(date) = &args.date {
        c.handle(AppEvent::FieldInput(FormField::Date, date.clone()));
    }
    c.handle(AppEvent::FieldInput(FormField::Amount, args.amount.clone()));
    c.handle(AppEvent::FieldInput(FormField::Type, args.kind.clone()));
    describe(c, &args.description).await;

    match &args.category {
        Some(category) => {
            c.handle(AppEvent::FieldInput(FormField::Category, category.clone()));
        }
        None if c.state().form.category.is_empty() => {
            // Nothing auto-filled: take the suggestion as if picked by hand
            if let Some(held) = c.state().suggestion.clone() {
                c.handle(AppEvent::FieldInput(
                    FormField::Category,
                    held.category().to_string(),
                ));
            }
        }
        None => {}
    }
    c.settle().await;

    c.handle(AppEvent::Submit);
    c.settle().await;
    check_outcome(c, errors_before, "Saving the transaction")
}

pub async fn cmd_edit<A>(api: A, config: ClientConfig, id: i64, fields: &EditArgs) -> Result<()>
where
    A: FinanceApi + Clone + 'static,
{
    let mut controller = open_controller(api, config)?;
    edit_with(&mut controller, id, fields).await
}

pub async fn edit_with<A>(c: &mut CliController<A>, id: i64, fields: &EditArgs) -> Result<()>
where
    A: FinanceApi + Clone + 'static,
{
    let errors_before = c.ui().errors_shown();
    c.handle(AppEvent::BeginEdit(id));
    if c.state().editing_id != Some(id) {
        bail!(
            "Transaction {} not found in the local mirror (try 'mymoney sync')",
            id
        );
    }

    if let Some(date) = &fields.date {
        c.handle(AppEvent::FieldInput(FormField::Date, date.clone()));
    }
    if let Some(amount) = &fields.amount {
        c.handle(AppEvent::FieldInput(FormField::Amount, amount.clone()));
    }
    if let Some(kind) = &fields.kind {
        c.handle(AppEvent::FieldInput(FormField::Type, kind.clone()));
    }
    if let Some(description) = &fields.description {
        describe(c, description).await;
    }
    if let Some(category) = &fields.category {
        c.handle(AppEvent::FieldInput(FormField::Category, category.clone()));
        c.settle().await;
    }

    c.handle(AppEvent::Submit);
    c.settle().await;
    check_outcome(c, errors_before, "Updating the transaction")
}

pub async fn cmd_delete<A>(api: A, config: ClientConfig, id: i64) -> Result<()>
where
    A: FinanceApi + Clone + 'static,
{
    let mut controller = open_controller(api, config)?;
    delete_with(&mut controller, id).await
}

pub async fn delete_with<A>(c: &mut CliController<A>, id: i64) -> Result<()>
where
    A: FinanceApi + Clone + 'static,
{
    let errors_before = c.ui().errors_shown();
    c.handle(AppEvent::Delete(id));
    c.settle().await;
    check_outcome(c, errors_before, "Deleting the transaction")
}

pub async fn cmd_sync<A>(api: A, config: ClientConfig) -> Result<()>
where
    A: FinanceApi + Clone + 'static,
{
    let mut controller = open_controller(api, config)?;
    sync_with(&mut controller).await
}

pub async fn sync_with<A>(c: &mut CliController<A>) -> Result<()>
where
    A: FinanceApi + Clone + 'static,
{
    println!("🔄 Syncing transactions...");
    let errors_before = c.ui().errors_shown();
    c.handle(AppEvent::Refresh);
    c.settle().await;
    check_outcome(c, errors_before, "Sync")?;

    println!(
        "✅ Local mirror holds {} transactions",
        c.mirror().transactions().len()
    );
    Ok(())
}

pub fn cmd_list(config: &ClientConfig, limit: usize) -> Result<()> {
    let mirror = open_mirror(config)?;
    let mut transactions: Vec<_> = mirror.transactions().iter().collect();

    if transactions.is_empty() {
        println!("No transactions found. Add one with:");
        println!("  mymoney add --amount 250 --description \"team lunch\"");
        return Ok(());
    }

    transactions.sort_by(|a, b| b.date.cmp(&a.date));

    println!();
    println!("📝 Transactions");
    println!("   ─────────────────────────────────────────────────────────────");
    for tx in transactions.into_iter().take(limit) {
        println!("{}", transaction_line(tx));
    }

    Ok(())
}

pub fn cmd_balance(config: &ClientConfig, json: bool) -> Result<()> {
    let mirror = open_mirror(config)?;
    let summary = Summary::compute(mirror.transactions());

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        TerminalUi::new().render_summary(&summary);
    }

    Ok(())
}
