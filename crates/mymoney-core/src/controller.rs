//! Application controller
//!
//! The controller owns all application state and processes one thing at a
//! time: a UI event, an elapsed timer, or a finished network request. Network
//! calls are spawned into a `JoinSet` and come back as completions, so state
//! is only ever touched from the loop itself.
//!
//! Timers are plain deadlines kept in state (debounce, badge fade, toast
//! expiry). The loop sleeps until the earliest one.

use std::time::Duration;

use chrono::{Local, NaiveDate};
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, error, info, warn};

use crate::api::FinanceApi;
use crate::config::{ClientConfig, StalePolicy};
use crate::error::Result;
use crate::mirror::LocalMirror;
use crate::models::{Suggestion, Transaction};
use crate::notify::{ToastKind, ToastQueue};
use crate::shortcuts::{self, KeyPress, Shortcut, View};
use crate::store::KeyValueStore;
use crate::suggest::{
    classify_change, should_autofill, CategoryChange, ConfidenceBadge, Debouncer, HeldSuggestion,
    InputDecision, SuggestionPhase,
};
use crate::summary::Summary;
use crate::ui::UiSurface;
use crate::validate::{
    amount_field_invalid, to_new_transaction, FieldError, FormField, TransactionForm,
};

pub const MSG_ADDED: &str = "Transaction added successfully! 🤖 AI learned your preferences.";
pub const MSG_UPDATED: &str = "Transaction updated successfully!";
pub const MSG_SAVE_FAILED: &str = "Failed to save transaction. Please try again.";
pub const MSG_DELETED: &str = "Transaction deleted successfully!";
pub const MSG_DELETE_FAILED: &str = "Failed to delete transaction. Please try again.";
pub const MSG_LOAD_FAILED: &str = "Failed to load transactions. Please try again.";
pub const MSG_NOT_FOUND: &str = "Transaction not found";
pub const MSG_LEARNED: &str = "🤖 AI learned from your correction and will improve!";

const LABEL_BUSY: &str = "Processing...";
const LABEL_ADD: &str = "Add Transaction";
const LABEL_UPDATE: &str = "Update Transaction";

/// Input delivered by a UI surface
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// A form field changed. Description and category changes drive the
    /// suggestion workflow; amount changes get live validation.
    FieldInput(FormField, String),
    /// The description field lost focus
    DescriptionBlur,
    Submit,
    BeginEdit(i64),
    CancelEdit,
    Delete(i64),
    Refresh,
    Key(KeyPress),
    ShowView(View),
    DismissToast(u64),
}

/// Result of a spawned network call
#[derive(Debug)]
enum Completion {
    Suggestion {
        seq: u64,
        result: Result<Suggestion>,
    },
    Correction {
        correct_category: String,
        result: Result<()>,
    },
    Saved {
        editing_id: Option<i64>,
        result: Result<Transaction>,
    },
    Deleted {
        id: i64,
        result: Result<()>,
    },
    Refreshed(Result<Vec<Transaction>>),
}

#[derive(Debug)]
enum Wakeup {
    Debounce,
    BadgeFade,
    ToastExpiry,
    Completed(std::result::Result<Completion, JoinError>),
}

/// Which deadlines a wait should honor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WaitFor {
    /// Pending debounce and in-flight requests only
    Requests,
    /// Also cosmetic timers (badge fade, toast expiry)
    Everything,
}

/// Mutable application state
#[derive(Debug)]
pub struct AppState {
    pub view: View,
    pub form: TransactionForm,
    pub editing_id: Option<i64>,
    pub field_errors: Vec<FieldError>,
    pub submitting: bool,
    /// Description as of its last blur, used for corrections
    pub last_description: String,
    pub suggestion: Option<HeldSuggestion>,
    pub badge: Option<ConfidenceBadge>,
    pub toasts: ToastQueue,
    badge_fade_at: Option<Instant>,
    debouncer: Debouncer,
    suggestions_in_flight: usize,
    /// Responses tagged below this are stale
    latest_seq: u64,
}

impl AppState {
    fn new(config: &ClientConfig, today: NaiveDate) -> Self {
        Self {
            view: View::default(),
            form: TransactionForm::new(today),
            editing_id: None,
            field_errors: Vec::new(),
            submitting: false,
            last_description: String::new(),
            suggestion: None,
            badge: None,
            toasts: ToastQueue::new(config.toast_ttl),
            badge_fade_at: None,
            debouncer: Debouncer::new(
                config.suggestions.debounce,
                config.suggestions.min_description_chars,
            ),
            suggestions_in_flight: 0,
            latest_seq: 0,
        }
    }

    pub fn phase(&self) -> SuggestionPhase {
        if self.debouncer.is_pending() {
            SuggestionPhase::Pending
        } else if self.suggestions_in_flight > 0 {
            SuggestionPhase::Loading
        } else {
            match &self.suggestion {
                Some(held) if held.accepted => SuggestionPhase::Accepted,
                Some(_) => SuggestionPhase::Suggested,
                None => SuggestionPhase::Idle,
            }
        }
    }

    pub fn suggestions_in_flight(&self) -> usize {
        self.suggestions_in_flight
    }
}

pub struct Controller<A, S, U>
where
    A: FinanceApi + Clone + 'static,
    S: KeyValueStore,
    U: UiSurface,
{
    api: A,
    ui: U,
    mirror: LocalMirror<S>,
    config: ClientConfig,
    state: AppState,
    requests: JoinSet<Completion>,
}

impl<A, S, U> Controller<A, S, U>
where
    A: FinanceApi + Clone + 'static,
    S: KeyValueStore,
    U: UiSurface,
{
    pub fn new(api: A, store: S, ui: U, config: ClientConfig) -> Self {
        let mirror = LocalMirror::open(store);
        let state = AppState::new(&config, today());
        info!(
            api = api.base_url(),
            transactions = mirror.transactions().len(),
            "Controller ready"
        );
        Self {
            api,
            ui,
            mirror,
            config,
            state,
            requests: JoinSet::new(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn phase(&self) -> SuggestionPhase {
        self.state.phase()
    }

    pub fn mirror(&self) -> &LocalMirror<S> {
        &self.mirror
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    /// Number of spawned requests that have not reported back
    pub fn in_flight(&self) -> usize {
        self.requests.len()
    }

    // ==================== Events ====================

    pub fn handle(&mut self, event: AppEvent) {
        debug!(?event, "Handling event");
        match event {
            AppEvent::FieldInput(FormField::Description, text) => self.on_description_input(text),
            AppEvent::FieldInput(FormField::Category, category) => {
                self.on_category_change(category)
            }
            AppEvent::FieldInput(FormField::Amount, value) => {
                self.ui.mark_amount_invalid(amount_field_invalid(&value));
                self.state.form.amount = value;
            }
            AppEvent::FieldInput(field, value) => self.state.form.set(field, &value),
            AppEvent::DescriptionBlur => {
                self.state.last_description = self.state.form.description.clone();
            }
            AppEvent::Submit => self.submit(),
            AppEvent::BeginEdit(id) => self.begin_edit(id),
            AppEvent::CancelEdit => self.cancel_edit(),
            AppEvent::Delete(id) => self.delete(id),
            AppEvent::Refresh => self.refresh(),
            AppEvent::Key(press) => self.on_key(&press),
            AppEvent::ShowView(view) => self.show_view(view),
            AppEvent::DismissToast(id) => {
                if self.state.toasts.dismiss(id) {
                    self.ui.dismiss_toast(id);
                }
            }
        }
    }

    fn on_description_input(&mut self, text: String) {
        match self.state.debouncer.input(&text, Instant::now()) {
            InputDecision::TooShort => self.clear_suggestion(),
            InputDecision::Scheduled(_) => {}
        }
        self.state.form.description = text;
    }

    fn on_category_change(&mut self, category: String) {
        let change = classify_change(
            self.state.suggestion.as_ref(),
            &category,
            &self.state.last_description,
        );
        self.state.form.category = category;

        match change {
            CategoryChange::NoSuggestion => {}
            CategoryChange::Matches => {
                if let Some(held) = &mut self.state.suggestion {
                    held.accepted = true;
                }
            }
            CategoryChange::Override {
                description,
                correct_category,
            } => {
                info!(
                    suggested = ?self.state.suggestion.as_ref().map(|h| h.category()),
                    chosen = %correct_category,
                    "Suggestion overridden, reporting correction"
                );
                self.report_correction(description, correct_category);
                // The badge stays on screen; only the held suggestion goes
                self.state.suggestion = None;
            }
            CategoryChange::OverrideWithoutDescription => {
                debug!("Suggestion overridden before the description was captured");
            }
        }
    }

    fn on_key(&mut self, press: &KeyPress) {
        match shortcuts::resolve(press) {
            Some(Shortcut::Cancel) => {
                if self.state.editing_id.is_some() {
                    self.cancel_edit();
                }
            }
            Some(Shortcut::Submit) => self.submit(),
            Some(Shortcut::Navigate(view)) => self.show_view(view),
            None => {}
        }
    }

    // ==================== Suggestions ====================

    fn fire_debounce(&mut self) {
        if let Some(description) = self.state.debouncer.fire(Instant::now()) {
            self.request_suggestion(description);
        }
    }

    fn request_suggestion(&mut self, description: String) {
        self.state.latest_seq += 1;
        let seq = self.state.latest_seq;
        self.state.suggestions_in_flight += 1;
        self.ui.show_suggestion_loading();
        debug!(seq, description = %description, "Requesting category suggestion");

        let api = self.api.clone();
        let user_id = self.config.user_id.clone();
        self.requests.spawn(async move {
            let result = api.categorize(&description, &user_id).await;
            Completion::Suggestion { seq, result }
        });
    }

    fn on_suggestion(&mut self, seq: u64, result: Result<Suggestion>) {
        self.state.suggestions_in_flight = self.state.suggestions_in_flight.saturating_sub(1);
        self.ui.hide_suggestion_loading();

        if self.config.suggestions.stale_policy == StalePolicy::LastRequestWins
            && seq < self.state.latest_seq
        {
            debug!(seq, latest = self.state.latest_seq, "Discarding stale suggestion");
            return;
        }

        match result {
            Ok(suggestion) => {
                info!(
                    category = %suggestion.suggested_category,
                    confidence = suggestion.confidence,
                    "AI suggestion received"
                );
                self.present(suggestion);
            }
            Err(e) => {
                warn!(error = %e, "AI categorization failed");
                self.clear_suggestion();
            }
        }
    }

    fn present(&mut self, suggestion: Suggestion) {
        let badge = ConfidenceBadge::for_suggestion(&suggestion);
        let autofill = should_autofill(&suggestion, self.config.suggestions.autofill_threshold);
        let category = suggestion.suggested_category.clone();

        // Held before the synthesized change so it is classified as a match
        self.state.suggestion = Some(HeldSuggestion::new(suggestion));
        if autofill {
            self.ui.set_category(&category);
            self.on_category_change(category);
        }

        self.ui.render_badge(&badge);
        self.state.badge = Some(badge);
        self.state.badge_fade_at = Some(Instant::now() + self.config.suggestions.badge_fade);
    }

    /// Drop the held suggestion and badge
    ///
    /// Requests issued before this point become stale, so a response still in
    /// flight cannot bring a cleared suggestion back.
    fn clear_suggestion(&mut self) {
        self.state.latest_seq += 1;
        self.state.suggestion = None;
        self.state.badge_fade_at = None;
        if self.state.badge.take().is_some() {
            self.ui.clear_badge();
        }
    }

    fn fade_badge(&mut self) {
        self.state.badge_fade_at = None;
        if let Some(badge) = &mut self.state.badge {
            badge.faded = true;
            self.ui.fade_badge();
        }
    }

    fn report_correction(&mut self, description: String, correct_category: String) {
        let api = self.api.clone();
        let user_id = self.config.user_id.clone();
        self.requests.spawn(async move {
            let result = api
                .learn_correction(&description, &correct_category, &user_id)
                .await;
            Completion::Correction {
                correct_category,
                result,
            }
        });
    }

    // ==================== Transactions ====================

    fn submit(&mut self) {
        if self.state.submitting {
            debug!("Submit already in progress");
            return;
        }

        self.ui.clear_field_errors();
        self.state.field_errors.clear();

        let payload = match to_new_transaction(&self.state.form) {
            Ok(payload) => payload,
            Err(errors) => {
                debug!(errors = errors.len(), "Transaction form invalid");
                for e in &errors {
                    self.ui.show_field_error(e);
                }
                self.state.field_errors = errors;
                return;
            }
        };

        if let Some(held) = &mut self.state.suggestion {
            if held.category() == payload.category {
                held.accepted = true;
            }
        }

        self.state.submitting = true;
        self.ui.set_submit_busy(true, LABEL_BUSY);

        let api = self.api.clone();
        let editing_id = self.state.editing_id;
        let previous = editing_id.and_then(|id| self.mirror.find_transaction(id).cloned());
        info!(editing = ?editing_id, category = %payload.category, "Saving transaction");

        self.requests.spawn(async move {
            let result = match editing_id {
                Some(id) => api
                    .update_transaction(id, &payload)
                    .await
                    .map(|()| Transaction::from_update(id, &payload, previous.as_ref())),
                None => api.create_transaction(&payload).await,
            };
            Completion::Saved { editing_id, result }
        });
    }

    fn on_saved(&mut self, editing_id: Option<i64>, result: Result<Transaction>) {
        self.state.submitting = false;

        match result {
            Ok(tx) => {
                info!(id = ?tx.id, "Transaction saved");
                self.mirror.record_transaction(tx, editing_id);
                let message = if editing_id.is_some() {
                    MSG_UPDATED
                } else {
                    MSG_ADDED
                };
                self.toast(ToastKind::Success, message);
                self.reset_form();
                self.refresh_displays();
            }
            Err(e) => {
                error!(error = %e, "Failed to save transaction");
                self.toast(ToastKind::Error, MSG_SAVE_FAILED);
            }
        }

        let label = self.submit_label();
        self.ui.set_submit_busy(false, label);
    }

    fn begin_edit(&mut self, id: i64) {
        let Some(tx) = self.mirror.find_transaction(id) else {
            warn!(id, "Cannot edit unknown transaction");
            self.toast(ToastKind::Error, MSG_NOT_FOUND);
            return;
        };

        self.state.form = TransactionForm::from_transaction(tx);
        self.state.last_description = tx.description.clone();
        self.state.editing_id = Some(id);
        self.state.debouncer.cancel();
        self.clear_errors();
        self.clear_suggestion();
        self.ui.render_form(&self.state.form, true);
        let label = self.submit_label();
        self.ui.set_submit_busy(self.state.submitting, label);
    }

    fn cancel_edit(&mut self) {
        debug!(editing = ?self.state.editing_id, "Cancelling edit");
        self.reset_form();
        let label = self.submit_label();
        self.ui.set_submit_busy(self.state.submitting, label);
    }

    fn reset_form(&mut self) {
        self.state.form = TransactionForm::new(today());
        self.state.editing_id = None;
        self.state.last_description.clear();
        self.state.debouncer.cancel();
        self.clear_errors();
        self.clear_suggestion();
        self.ui.render_form(&self.state.form, false);
    }

    fn clear_errors(&mut self) {
        self.state.field_errors.clear();
        self.ui.clear_field_errors();
    }

    fn submit_label(&self) -> &'static str {
        if self.state.editing_id.is_some() {
            LABEL_UPDATE
        } else {
            LABEL_ADD
        }
    }

    fn delete(&mut self, id: i64) {
        let api = self.api.clone();
        self.requests.spawn(async move {
            let result = api.delete_transaction(id).await;
            Completion::Deleted { id, result }
        });
    }

    fn on_deleted(&mut self, id: i64, result: Result<()>) {
        match result {
            Ok(()) => {
                info!(id, "Transaction deleted");
                self.mirror.remove_transaction(id);
                if self.state.editing_id == Some(id) {
                    self.cancel_edit();
                }
                self.toast(ToastKind::Success, MSG_DELETED);
                self.refresh_displays();
            }
            Err(e) => {
                error!(id, error = %e, "Failed to delete transaction");
                self.toast(ToastKind::Error, MSG_DELETE_FAILED);
            }
        }
    }

    fn refresh(&mut self) {
        let api = self.api.clone();
        self.requests.spawn(async move { Completion::Refreshed(api.list_transactions().await) });
    }

    fn on_refreshed(&mut self, result: Result<Vec<Transaction>>) {
        match result {
            Ok(transactions) => {
                info!(count = transactions.len(), "Transactions refreshed");
                self.mirror.replace_transactions(transactions);
                self.refresh_displays();
            }
            Err(e) => {
                error!(error = %e, "Failed to load transactions");
                self.toast(ToastKind::Error, MSG_LOAD_FAILED);
            }
        }
    }

    // ==================== Views ====================

    fn show_view(&mut self, view: View) {
        self.state.view = view;
        self.ui.show_view(view);
        self.refresh_displays();
    }

    fn refresh_displays(&mut self) {
        if self.state.view == View::Personal {
            let transactions = self.mirror.transactions();
            self.ui.render_summary(&Summary::compute(transactions));
            self.ui.render_transactions(transactions);
        }
    }

    fn toast(&mut self, kind: ToastKind, message: &str) {
        let toast = self.state.toasts.push(kind, message, Instant::now());
        self.ui.show_toast(&toast);
    }

    // ==================== Loop ====================

    fn on_completion(&mut self, completion: Completion) {
        match completion {
            Completion::Suggestion { seq, result } => self.on_suggestion(seq, result),
            Completion::Correction {
                correct_category,
                result,
            } => match result {
                Ok(()) => {
                    info!(category = %correct_category, "Correction learned");
                    self.toast(ToastKind::Info, MSG_LEARNED);
                }
                Err(e) => warn!(error = %e, "Failed to report correction"),
            },
            Completion::Saved { editing_id, result } => self.on_saved(editing_id, result),
            Completion::Deleted { id, result } => self.on_deleted(id, result),
            Completion::Refreshed(result) => self.on_refreshed(result),
        }
    }

    fn apply(&mut self, wakeup: Wakeup) {
        match wakeup {
            Wakeup::Debounce => self.fire_debounce(),
            Wakeup::BadgeFade => self.fade_badge(),
            Wakeup::ToastExpiry => {
                for toast in self.state.toasts.expire(Instant::now()) {
                    self.ui.dismiss_toast(toast.id);
                }
            }
            Wakeup::Completed(Ok(completion)) => self.on_completion(completion),
            Wakeup::Completed(Err(e)) => error!(error = %e, "Background request task failed"),
        }
    }

    /// Wait for the next deadline or completion; `None` when nothing is pending
    async fn next_wakeup(&mut self, wait: WaitFor) -> Option<Wakeup> {
        let debounce = self.state.debouncer.deadline();
        let (fade, toast) = match wait {
            WaitFor::Requests => (None, None),
            WaitFor::Everything => (self.state.badge_fade_at, self.state.toasts.next_deadline()),
        };

        if debounce.is_none() && fade.is_none() && toast.is_none() && self.requests.is_empty() {
            return None;
        }

        tokio::select! {
            _ = sleep_opt(debounce) => Some(Wakeup::Debounce),
            _ = sleep_opt(fade) => Some(Wakeup::BadgeFade),
            _ = sleep_opt(toast) => Some(Wakeup::ToastExpiry),
            Some(joined) = self.requests.join_next() => Some(Wakeup::Completed(joined)),
        }
    }

    /// Process pending debounce timers and requests until none remain
    ///
    /// Cosmetic timers are left armed.
    pub async fn settle(&mut self) {
        while let Some(wakeup) = self.next_wakeup(WaitFor::Requests).await {
            self.apply(wakeup);
        }
    }

    /// Run the loop for a fixed amount of time, honoring every timer
    pub async fn run_for(&mut self, duration: Duration) {
        let until = Instant::now() + duration;
        loop {
            let wakeup = tokio::select! {
                w = self.next_wakeup(WaitFor::Everything) => w,
                _ = sleep_until(until) => break,
            };
            match wakeup {
                Some(w) => self.apply(w),
                None => {
                    sleep_until(until).await;
                    break;
                }
            }
        }
    }

    /// Run until the event channel closes, then settle outstanding requests
    pub async fn run(&mut self, mut events: mpsc::Receiver<AppEvent>) {
        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => self.handle(event),
                    None => break,
                },
                Some(wakeup) = self.next_wakeup(WaitFor::Everything) => self.apply(wakeup),
            }
        }
        debug!(in_flight = self.requests.len(), "Event channel closed, settling");
        self.settle().await;
    }
}

async fn sleep_opt(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
