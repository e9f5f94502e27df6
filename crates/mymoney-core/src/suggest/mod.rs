//! AI category suggestion workflow
//!
//! A suggestion moves through a small lifecycle:
//!
//! ```text
//! idle -> pending (debounce armed) -> loading (request in flight)
//!      -> suggested -> accepted   (category kept at submit)
//!                   -> idle       (category overridden, correction reported)
//! ```
//!
//! The pieces here are synchronous; the controller drives them from its
//! event loop.

mod debounce;
mod presenter;

pub use debounce::{Debouncer, InputDecision, PendingRequest};
pub use presenter::{should_autofill, ConfidenceBadge, ConfidenceBand};

use serde::Serialize;

use crate::models::Suggestion;

/// Where the suggestion lifecycle currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionPhase {
    Idle,
    Pending,
    Loading,
    Suggested,
    Accepted,
}

/// The suggestion currently held for the form
#[derive(Debug, Clone, PartialEq)]
pub struct HeldSuggestion {
    pub suggestion: Suggestion,
    pub accepted: bool,
}

impl HeldSuggestion {
    pub fn new(suggestion: Suggestion) -> Self {
        Self {
            suggestion,
            accepted: false,
        }
    }

    pub fn category(&self) -> &str {
        &self.suggestion.suggested_category
    }
}

/// What a category change means for the held suggestion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryChange {
    /// Nothing held, nothing to compare against
    NoSuggestion,
    /// Selected category equals the suggestion
    Matches,
    /// User picked something else and a description is available to learn from
    Override {
        description: String,
        correct_category: String,
    },
    /// User picked something else but no description has been captured yet
    OverrideWithoutDescription,
}

/// Classify a category change against the held suggestion
///
/// `last_description` is the description as of its last blur; it is sent
/// untrimmed but must be non-blank after trimming.
pub fn classify_change(
    held: Option<&HeldSuggestion>,
    selected: &str,
    last_description: &str,
) -> CategoryChange {
    let Some(held) = held else {
        return CategoryChange::NoSuggestion;
    };

    if held.category() == selected {
        return CategoryChange::Matches;
    }

    if last_description.trim().is_empty() {
        return CategoryChange::OverrideWithoutDescription;
    }

    CategoryChange::Override {
        description: last_description.to_string(),
        correct_category: selected.to_string(),
    }
}
