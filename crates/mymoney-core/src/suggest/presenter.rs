//! Confidence badge and auto-fill decision

use serde::Serialize;

use crate::models::Suggestion;

/// Display bucket for a confidence score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceBand {
    High,
    Medium,
    Low,
}

impl ConfidenceBand {
    /// Bucket a whole-number percentage: high above 70, medium above 40
    pub fn from_percent(percent: u32) -> Self {
        if percent > 70 {
            Self::High
        } else if percent > 40 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// The "AI suggests" indicator next to the category field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfidenceBadge {
    pub category: String,
    pub percent: u32,
    pub band: ConfidenceBand,
    /// Faded badges stay visible, just dimmed
    pub faded: bool,
}

impl ConfidenceBadge {
    pub fn for_suggestion(suggestion: &Suggestion) -> Self {
        let percent = suggestion.percent();
        Self {
            category: suggestion.suggested_category.clone(),
            percent,
            band: ConfidenceBand::from_percent(percent),
            faded: false,
        }
    }

    pub fn label(&self) -> String {
        format!(
            "🤖 AI suggests: {} ({}% confident)",
            self.category, self.percent
        )
    }
}

/// Whether the suggestion should be written into the category field
///
/// Strictly greater than the threshold; empty categories never auto-fill.
pub fn should_autofill(suggestion: &Suggestion, threshold: f64) -> bool {
    !suggestion.suggested_category.is_empty() && suggestion.confidence > threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bands() {
        assert_eq!(ConfidenceBand::from_percent(95), ConfidenceBand::High);
        assert_eq!(ConfidenceBand::from_percent(71), ConfidenceBand::High);
        assert_eq!(ConfidenceBand::from_percent(70), ConfidenceBand::Medium);
        assert_eq!(ConfidenceBand::from_percent(41), ConfidenceBand::Medium);
        assert_eq!(ConfidenceBand::from_percent(40), ConfidenceBand::Low);
        assert_eq!(ConfidenceBand::from_percent(0), ConfidenceBand::Low);
    }

    #[test]
    fn test_autofill_threshold_is_strict() {
        assert!(!should_autofill(&Suggestion::new("Food", 0.5), 0.5));
        assert!(should_autofill(&Suggestion::new("Food", 0.51), 0.5));
        assert!(!should_autofill(&Suggestion::new("", 0.99), 0.5));
    }

    #[test]
    fn test_badge_label() {
        let badge = ConfidenceBadge::for_suggestion(&Suggestion::new("Travel", 0.3));
        assert_eq!(badge.band, ConfidenceBand::Low);
        assert_eq!(badge.label(), "🤖 AI suggests: Travel (30% confident)");
    }
}
