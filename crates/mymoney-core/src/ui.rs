//! Rendering surface the controller drives
//!
//! The controller never touches presentation directly. Everything visible
//! goes through `UiSurface`, which the CLI implements for the terminal and
//! tests implement with [`RecordingUi`].

use crate::models::Transaction;
use crate::notify::Toast;
use crate::shortcuts::View;
use crate::suggest::ConfidenceBadge;
use crate::summary::Summary;
use crate::validate::{FieldError, TransactionForm};

/// Everything the controller can show
pub trait UiSurface {
    /// Reflect an auto-filled category in the form
    fn set_category(&mut self, category: &str);

    /// Spinner next to the description field
    fn show_suggestion_loading(&mut self);
    fn hide_suggestion_loading(&mut self);

    fn render_badge(&mut self, badge: &ConfidenceBadge);
    fn fade_badge(&mut self);
    fn clear_badge(&mut self);

    fn show_toast(&mut self, toast: &Toast);
    fn dismiss_toast(&mut self, id: u64);

    fn clear_field_errors(&mut self);
    fn show_field_error(&mut self, error: &FieldError);
    /// Live highlight of the amount field while typing
    fn mark_amount_invalid(&mut self, invalid: bool);

    /// Disable/enable the submit button with the given label
    fn set_submit_busy(&mut self, busy: bool, label: &str);
    /// Redraw the whole form (after reset or when an edit begins)
    fn render_form(&mut self, form: &TransactionForm, editing: bool);

    fn show_view(&mut self, view: View);
    fn render_summary(&mut self, summary: &Summary);
    fn render_transactions(&mut self, transactions: &[Transaction]);
}

/// A UI call captured by [`RecordingUi`]
#[derive(Debug, Clone, PartialEq)]
pub enum UiCall {
    SetCategory(String),
    ShowLoading,
    HideLoading,
    RenderBadge(ConfidenceBadge),
    FadeBadge,
    ClearBadge,
    ShowToast(Toast),
    DismissToast(u64),
    ClearFieldErrors,
    ShowFieldError(FieldError),
    MarkAmountInvalid(bool),
    SetSubmitBusy(bool, String),
    RenderForm { form: TransactionForm, editing: bool },
    ShowView(View),
    RenderSummary(Summary),
    RenderTransactions(usize),
}

/// UI surface that records every call, for tests and headless use
#[derive(Debug, Default)]
pub struct RecordingUi {
    calls: Vec<UiCall>,
}

impl RecordingUi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[UiCall] {
        &self.calls
    }

    pub fn count(&self, pred: impl Fn(&UiCall) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    /// Messages of every toast shown so far
    pub fn toasts(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                UiCall::ShowToast(t) => Some(t.message.clone()),
                _ => None,
            })
            .collect()
    }

    /// Most recently rendered badge, if any
    pub fn last_badge(&self) -> Option<&ConfidenceBadge> {
        self.calls.iter().rev().find_map(|c| match c {
            UiCall::RenderBadge(b) => Some(b),
            _ => None,
        })
    }
}

impl UiSurface for RecordingUi {
    fn set_category(&mut self, category: &str) {
        self.calls.push(UiCall::SetCategory(category.to_string()));
    }

    fn show_suggestion_loading(&mut self) {
        self.calls.push(UiCall::ShowLoading);
    }

    fn hide_suggestion_loading(&mut self) {
        self.calls.push(UiCall::HideLoading);
    }

    fn render_badge(&mut self, badge: &ConfidenceBadge) {
        self.calls.push(UiCall::RenderBadge(badge.clone()));
    }

    fn fade_badge(&mut self) {
        self.calls.push(UiCall::FadeBadge);
    }

    fn clear_badge(&mut self) {
        self.calls.push(UiCall::ClearBadge);
    }

    fn show_toast(&mut self, toast: &Toast) {
        self.calls.push(UiCall::ShowToast(toast.clone()));
    }

    fn dismiss_toast(&mut self, id: u64) {
        self.calls.push(UiCall::DismissToast(id));
    }

    fn clear_field_errors(&mut self) {
        self.calls.push(UiCall::ClearFieldErrors);
    }

    fn show_field_error(&mut self, error: &FieldError) {
        self.calls.push(UiCall::ShowFieldError(error.clone()));
    }

    fn mark_amount_invalid(&mut self, invalid: bool) {
        self.calls.push(UiCall::MarkAmountInvalid(invalid));
    }

    fn set_submit_busy(&mut self, busy: bool, label: &str) {
        self.calls.push(UiCall::SetSubmitBusy(busy, label.to_string()));
    }

    fn render_form(&mut self, form: &TransactionForm, editing: bool) {
        self.calls.push(UiCall::RenderForm {
            form: form.clone(),
            editing,
        });
    }

    fn show_view(&mut self, view: View) {
        self.calls.push(UiCall::ShowView(view));
    }

    fn render_summary(&mut self, summary: &Summary) {
        self.calls.push(UiCall::RenderSummary(*summary));
    }

    fn render_transactions(&mut self, transactions: &[Transaction]) {
        self.calls.push(UiCall::RenderTransactions(transactions.len()));
    }
}
