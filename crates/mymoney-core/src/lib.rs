//! My Money Core Library
//!
//! Client-side functionality for the My Money finance tracker:
//! - Typed access to the finance backend (transactions, AI categorization)
//! - Debounced AI category suggestions with correction reporting
//! - Transaction form validation
//! - Local mirror of confirmed records on a pluggable key-value store
//! - Balance summary, notifications, views and keyboard shortcuts
//! - An event-loop controller tying it together behind a UI surface trait

pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod mirror;
pub mod models;
pub mod notify;
pub mod shortcuts;
pub mod store;
pub mod suggest;
pub mod summary;
pub mod ui;
pub mod validate;

/// Test utilities including mock finance backend
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use api::{FinanceApi, HttpApi, MockApi, MockCall};
pub use config::{ClientConfig, StalePolicy, SuggestionConfig};
pub use controller::{AppEvent, AppState, Controller};
pub use error::{Error, Result};
pub use mirror::{Collection, LocalMirror};
pub use models::{
    BusinessTransaction, BusinessTransactionType, Customer, NewTransaction, SpendingInsights,
    Suggestion, Transaction, TransactionType,
};
pub use notify::{Toast, ToastKind, ToastQueue};
pub use shortcuts::{KeyPress, Modifiers, Shortcut, View};
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use suggest::{ConfidenceBadge, ConfidenceBand, HeldSuggestion, SuggestionPhase};
pub use summary::{format_currency, Summary};
pub use ui::{RecordingUi, UiCall, UiSurface};
pub use validate::{validate, FieldError, FormField, TransactionForm, Validation};
