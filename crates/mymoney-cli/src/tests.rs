//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::time::Duration;

use mymoney_core::api::sample_transaction;
use mymoney_core::{
    AppEvent, ClientConfig, FormField, KeyPress, MockApi, MockCall, TransactionType, View,
};
use tempfile::TempDir;

use crate::cli::{EditArgs, TransactionArgs};
use crate::commands::shell::{parse_key, parse_line, ShellCommand};
use crate::commands::{self, truncate, CliController};
use crate::terminal::TerminalUi;

fn test_config(dir: &TempDir) -> ClientConfig {
    let mut config = ClientConfig::default();
    config.data_dir = dir.path().to_path_buf();
    config
}

fn controller(api: &MockApi, dir: &TempDir) -> CliController<MockApi> {
    commands::open_controller_with(api.clone(), test_config(dir), TerminalUi::silent()).unwrap()
}

fn add_args(amount: &str, description: &str, category: Option<&str>) -> TransactionArgs {
    TransactionArgs {
        amount: amount.to_string(),
        description: description.to_string(),
        category: category.map(str::to_string),
        kind: "expense".to_string(),
        date: Some("2024-06-01".to_string()),
    }
}

fn created(api: &MockApi) -> Vec<mymoney_core::NewTransaction> {
    api.calls()
        .into_iter()
        .filter_map(|c| match c {
            MockCall::CreateTransaction(tx) => Some(tx),
            _ => None,
        })
        .collect()
}

// ========== Helper Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("a much longer description", 10), "a much ...");
    assert_eq!(truncate("₹₹₹₹₹₹", 5), "₹₹...");
}

#[test]
fn test_load_config_overrides() {
    let dir = TempDir::new().unwrap();
    let config =
        commands::load_config(Some(dir.path()), Some("http://finance.test:9000/")).unwrap();
    assert_eq!(config.data_dir, dir.path());
    assert_eq!(config.api_base_url, "http://finance.test:9000");
}

// ========== Add Command Tests ==========

#[tokio::test(start_paused = true)]
async fn test_add_uses_autofilled_suggestion() {
    let dir = TempDir::new().unwrap();
    let api = MockApi::new();
    api.push_suggestion("Food & Dining", 0.9);
    let mut c = controller(&api, &dir);

    commands::add_with(&mut c, &add_args("250", "team lunch", None))
        .await
        .unwrap();

    let sent = created(&api);
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].category, "Food & Dining");
    assert!(api.corrections().is_empty());
    assert_eq!(c.mirror().transactions().len(), 1);
    assert!(dir.path().join("transactions.json").exists());
}

#[tokio::test(start_paused = true)]
async fn test_add_low_confidence_takes_suggestion() {
    let dir = TempDir::new().unwrap();
    let api = MockApi::new();
    api.push_suggestion("Other", 0.3);
    let mut c = controller(&api, &dir);

    commands::add_with(&mut c, &add_args("99", "misc thing", None))
        .await
        .unwrap();

    assert_eq!(created(&api)[0].category, "Other");
    assert!(api.corrections().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_add_with_other_category_reports_correction() {
    let dir = TempDir::new().unwrap();
    let api = MockApi::new();
    api.push_suggestion("Food & Dining", 0.9);
    let mut c = controller(&api, &dir);

    commands::add_with(&mut c, &add_args("40", "uber to office", Some("Transportation")))
        .await
        .unwrap();

    assert_eq!(
        api.corrections(),
        vec![("uber to office".to_string(), "Transportation".to_string())]
    );
    assert_eq!(created(&api)[0].category, "Transportation");
}

#[tokio::test(start_paused = true)]
async fn test_add_invalid_amount_fails_without_request() {
    let dir = TempDir::new().unwrap();
    let api = MockApi::new();
    let mut c = controller(&api, &dir);

    let result = commands::add_with(&mut c, &add_args("0", "coffee", Some("Food"))).await;

    assert!(result.is_err());
    assert!(created(&api).is_empty());
    assert!(c
        .ui()
        .transcript()
        .iter()
        .any(|l| l.contains("Amount must be greater than ₹0.00")));
}

#[tokio::test(start_paused = true)]
async fn test_add_backend_failure_is_error() {
    let dir = TempDir::new().unwrap();
    let api = MockApi::new();
    api.fail_writes(true);
    let mut c = controller(&api, &dir);

    let result = commands::add_with(&mut c, &add_args("10", "tea", Some("Food"))).await;

    assert!(result.is_err());
    assert!(c.mirror().transactions().is_empty());
}

// ========== Edit / Delete / Sync Tests ==========

fn seeded_api() -> MockApi {
    let api = MockApi::new();
    api.seed_transactions(vec![
        sample_transaction(1, (2024, 1, 1), 1000.0, TransactionType::Income, "Salary"),
        sample_transaction(2, (2024, 1, 5), 300.0, TransactionType::Expense, "Food"),
    ]);
    api
}

#[tokio::test(start_paused = true)]
async fn test_sync_then_edit() {
    let dir = TempDir::new().unwrap();
    let api = seeded_api();
    let mut c = controller(&api, &dir);

    commands::sync_with(&mut c).await.unwrap();
    assert_eq!(c.mirror().transactions().len(), 2);

    let fields = EditArgs {
        amount: Some("350".into()),
        ..Default::default()
    };
    commands::edit_with(&mut c, 2, &fields).await.unwrap();

    assert!(api
        .calls()
        .iter()
        .any(|call| matches!(call, MockCall::UpdateTransaction(2, tx) if tx.amount == 350.0)));
    let edited = c.mirror().find_transaction(2).unwrap();
    assert_eq!(edited.amount, 350.0);
    assert_eq!(edited.category, "Food");
}

#[tokio::test(start_paused = true)]
async fn test_edit_unknown_id_fails() {
    let dir = TempDir::new().unwrap();
    let api = MockApi::new();
    let mut c = controller(&api, &dir);

    let result = commands::edit_with(&mut c, 77, &EditArgs::default()).await;
    assert!(result.is_err());
}

#[tokio::test(start_paused = true)]
async fn test_delete() {
    let dir = TempDir::new().unwrap();
    let api = seeded_api();
    let mut c = controller(&api, &dir);
    commands::sync_with(&mut c).await.unwrap();

    commands::delete_with(&mut c, 1).await.unwrap();
    assert_eq!(c.mirror().transactions().len(), 1);

    api.fail_writes(true);
    assert!(commands::delete_with(&mut c, 2).await.is_err());
    assert_eq!(c.mirror().transactions().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_balance_and_list_read_mirror() {
    let dir = TempDir::new().unwrap();
    let api = seeded_api();
    let mut c = controller(&api, &dir);
    commands::sync_with(&mut c).await.unwrap();

    let config = test_config(&dir);
    assert!(commands::cmd_balance(&config, true).is_ok());
    assert!(commands::cmd_balance(&config, false).is_ok());
    assert!(commands::cmd_list(&config, 5).is_ok());
}

#[tokio::test]
async fn test_ai_commands_against_mock() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    let api = seeded_api();
    api.push_suggestion("Transportation", 0.6);

    assert!(commands::cmd_suggest(&api, &config, "metro card", false)
        .await
        .is_ok());
    assert!(commands::cmd_learn(&api, &config, "metro card", "Travel")
        .await
        .is_ok());
    assert!(commands::cmd_insights(&api, &config, false).await.is_ok());

    // Nothing scripted: the categorizer reports no suggestion
    assert!(commands::cmd_suggest(&api, &config, "mystery", true)
        .await
        .is_err());
}

// ========== Shell Tests ==========

#[test]
fn test_parse_form_lines() {
    assert_eq!(parse_line("   ").unwrap(), None);
    assert_eq!(
        parse_line("desc  uber to office").unwrap(),
        Some(ShellCommand::Event(AppEvent::FieldInput(
            FormField::Description,
            " uber to office".into()
        )))
    );
    assert_eq!(
        parse_line("amount 250").unwrap(),
        Some(ShellCommand::Event(AppEvent::FieldInput(
            FormField::Amount,
            "250".into()
        )))
    );
    assert_eq!(
        parse_line("view personal").unwrap(),
        Some(ShellCommand::Event(AppEvent::ShowView(View::Personal)))
    );
    assert_eq!(
        parse_line("delete 4").unwrap(),
        Some(ShellCommand::Event(AppEvent::Delete(4)))
    );
    assert_eq!(parse_line("quit").unwrap(), Some(ShellCommand::Quit));
}

#[test]
fn test_parse_errors() {
    assert!(parse_line("edit abc").is_err());
    assert!(parse_line("view reports").is_err());
    assert!(parse_line("frobnicate").is_err());
    assert!(parse_key("hyper+2").is_err());
}

#[test]
fn test_parse_keys() {
    let press = parse_key("alt+2").unwrap();
    assert!(press.modifiers.alt);
    assert_eq!(press.key, "2");

    let press = parse_key("ctrl+enter").unwrap();
    assert!(press.modifiers.ctrl);
    assert!(press.focus_in_form);
    assert_eq!(press.key, "Enter");

    assert_eq!(parse_key("esc").unwrap().key, KeyPress::plain("Escape").key);
}

#[tokio::test(start_paused = true)]
async fn test_shell_events_drive_controller() {
    let dir = TempDir::new().unwrap();
    let api = MockApi::new();
    api.push_suggestion("Food & Dining", 0.8);
    let mut c = controller(&api, &dir);

    let (tx, rx) = tokio::sync::mpsc::channel(16);
    for line in [
        "view personal",
        "amount 120",
        "type expense",
        "desc pizza night",
        "blur",
    ] {
        if let Some(ShellCommand::Event(event)) = parse_line(line).unwrap() {
            tx.send(event).await.unwrap();
        }
    }

    let sender = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(1)).await;
        tx.send(parse_key("ctrl+enter").map(AppEvent::Key).unwrap())
            .await
            .unwrap();
    });

    c.run(rx).await;
    sender.await.unwrap();

    assert_eq!(created(&api).len(), 1);
    assert_eq!(created(&api)[0].category, "Food & Dining");
    assert!(c
        .ui()
        .transcript()
        .iter()
        .any(|l| l.contains("Balance Summary")));
}
