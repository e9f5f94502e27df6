//! Terminal rendering of the controller's UI surface

use mymoney_core::{
    format_currency, ConfidenceBadge, ConfidenceBand, FieldError, Summary, Toast, ToastKind,
    Transaction, TransactionForm, TransactionType, UiSurface, View,
};

use crate::commands::truncate;

/// How many transactions the list view shows
const RECENT_LIMIT: usize = 10;

/// Prints controller output as it happens
///
/// Every line is also kept in a transcript so commands (and tests) can
/// inspect what was shown.
pub struct TerminalUi {
    echo: bool,
    transcript: Vec<String>,
    errors_shown: usize,
}

impl TerminalUi {
    pub fn new() -> Self {
        Self {
            echo: true,
            transcript: Vec::new(),
            errors_shown: 0,
        }
    }

    /// Record output without printing it
    #[cfg(test)]
    pub fn silent() -> Self {
        Self {
            echo: false,
            ..Self::new()
        }
    }

    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    /// Number of error toasts shown, used to pick the exit status
    pub fn errors_shown(&self) -> usize {
        self.errors_shown
    }

    fn emit(&mut self, line: String) {
        if self.echo {
            println!("{}", line);
        }
        self.transcript.push(line);
    }
}

impl Default for TerminalUi {
    fn default() -> Self {
        Self::new()
    }
}

fn band_icon(band: ConfidenceBand) -> &'static str {
    match band {
        ConfidenceBand::High => "🟢",
        ConfidenceBand::Medium => "🟡",
        ConfidenceBand::Low => "🔴",
    }
}

impl UiSurface for TerminalUi {
    fn set_category(&mut self, category: &str) {
        self.emit(format!("   🏷️  Category set to {}", category));
    }

    fn show_suggestion_loading(&mut self) {
        self.emit("   🤖 Asking AI for a category...".to_string());
    }

    fn hide_suggestion_loading(&mut self) {}

    fn render_badge(&mut self, badge: &ConfidenceBadge) {
        self.emit(format!("   {} {}", band_icon(badge.band), badge.label()));
    }

    fn fade_badge(&mut self) {}

    fn clear_badge(&mut self) {}

    fn show_toast(&mut self, toast: &Toast) {
        let icon = match toast.kind {
            ToastKind::Success => "✅",
            ToastKind::Error => "❌",
            ToastKind::Info => "ℹ️ ",
        };
        if toast.kind == ToastKind::Error {
            self.errors_shown += 1;
        }
        self.emit(format!("{} {}", icon, toast.message));
    }

    fn dismiss_toast(&mut self, _id: u64) {}

    fn clear_field_errors(&mut self) {}

    fn show_field_error(&mut self, error: &FieldError) {
        self.emit(format!("   ⚠️  {}: {}", error.field, error.message));
    }

    fn mark_amount_invalid(&mut self, invalid: bool) {
        if invalid {
            self.emit("   ⚠️  Amount must be a number greater than zero".to_string());
        }
    }

    fn set_submit_busy(&mut self, busy: bool, label: &str) {
        if busy {
            self.emit(format!("   ⏳ {}", label));
        }
    }

    fn render_form(&mut self, form: &TransactionForm, editing: bool) {
        if !editing {
            return;
        }
        self.emit("📝 Editing transaction".to_string());
        self.emit(format!(
            "   {} │ {} │ {} │ {} │ {}",
            form.date, form.amount, form.transaction_type, form.category, form.description
        ));
    }

    fn show_view(&mut self, view: View) {
        self.emit(format!("📂 {} view", view));
    }

    fn render_summary(&mut self, summary: &Summary) {
        self.emit(String::new());
        self.emit("💰 Balance Summary".to_string());
        self.emit(format!("   Income:       {}", format_currency(summary.total_income)));
        self.emit(format!("   Expenses:     {}", format_currency(summary.total_expenses)));
        self.emit(format!("   Balance:      {}", format_currency(summary.balance)));
        self.emit(format!("   Transactions: {}", summary.transaction_count));
    }

    fn render_transactions(&mut self, transactions: &[Transaction]) {
        if transactions.is_empty() {
            return;
        }
        self.emit(String::new());
        self.emit("📝 Recent Transactions".to_string());
        let mut recent: Vec<&Transaction> = transactions.iter().collect();
        recent.sort_by(|a, b| b.date.cmp(&a.date));
        for tx in recent.into_iter().take(RECENT_LIMIT) {
            let line = transaction_line(tx);
            self.emit(line);
        }
    }
}

/// One-line rendering shared by the list command and the shell
pub fn transaction_line(tx: &Transaction) -> String {
    let amount = match tx.transaction_type {
        TransactionType::Income => format!("\x1b[32m+{}\x1b[0m", format_currency(tx.amount)),
        TransactionType::Expense => format!("\x1b[31m-{}\x1b[0m", format_currency(tx.amount)),
    };
    format!(
        "   [{}] {} │ {:>14} │ {:<16} │ {}",
        tx.id.map(|id| id.to_string()).unwrap_or_else(|| "-".into()),
        tx.date,
        amount,
        truncate(&tx.category, 16),
        truncate(&tx.description, 40)
    )
}
