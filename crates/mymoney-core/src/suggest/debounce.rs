//! Trailing-edge debounce for categorization requests
//!
//! The debouncer owns a single pending-request slot. Every input first
//! cancels whatever is pending; only qualifying inputs re-arm it.

use std::time::Duration;

use tokio::time::Instant;

/// A categorization request waiting for the quiet period to end
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub description: String,
    pub deadline: Instant,
}

/// What an input event did to the pending slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputDecision {
    /// Below the minimum length: nothing armed, shown suggestion must be cleared
    TooShort,
    /// Slot armed to fire at the given instant
    Scheduled(Instant),
}

#[derive(Debug)]
pub struct Debouncer {
    quiet: Duration,
    min_chars: usize,
    pending: Option<PendingRequest>,
}

impl Debouncer {
    pub fn new(quiet: Duration, min_chars: usize) -> Self {
        Self {
            quiet,
            min_chars,
            pending: None,
        }
    }

    /// Register a description change
    ///
    /// The description is kept untrimmed; only the length check trims.
    /// Length is measured in UTF-16 code units, the way a text field reports it.
    pub fn input(&mut self, description: &str, now: Instant) -> InputDecision {
        self.cancel();

        if description.trim().encode_utf16().count() < self.min_chars {
            return InputDecision::TooShort;
        }

        let deadline = now + self.quiet;
        self.pending = Some(PendingRequest {
            description: description.to_string(),
            deadline,
        });
        InputDecision::Scheduled(deadline)
    }

    /// Drop the pending request, returning whether one was armed
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the pending description if its quiet period has elapsed
    pub fn fire(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some(p) if p.deadline <= now => self.pending.take().map(|p| p.description),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn debouncer() -> Debouncer {
        Debouncer::new(Duration::from_millis(500), 3)
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_input_arms_nothing() {
        let mut d = debouncer();
        let now = Instant::now();
        for text in ["", "a", "ab", "  ab  ", "\t\n"] {
            assert_eq!(d.input(text, now), InputDecision::TooShort);
            assert!(!d.is_pending());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_length_counts_utf16_units() {
        let mut d = debouncer();
        let now = Instant::now();
        // Each emoji is two UTF-16 units
        assert!(matches!(d.input("😀😀", now), InputDecision::Scheduled(_)));
        assert_eq!(d.input("😀", now), InputDecision::TooShort);
        assert!(matches!(d.input("चाय", now), InputDecision::Scheduled(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_input_cancels_pending() {
        let mut d = debouncer();
        let now = Instant::now();
        d.input("lunch", now);
        assert!(d.is_pending());
        d.input("lu", now);
        assert!(!d.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearm_replaces_pending() {
        let mut d = debouncer();
        let start = Instant::now();
        d.input("lun", start);
        d.input("lunc", start + Duration::from_millis(200));
        d.input("lunch", start + Duration::from_millis(400));

        // The first two deadlines pass without anything firing
        assert_eq!(d.fire(start + Duration::from_millis(500)), None);
        assert_eq!(d.fire(start + Duration::from_millis(700)), None);
        assert_eq!(
            d.fire(start + Duration::from_millis(900)).as_deref(),
            Some("lunch")
        );
        assert!(!d.is_pending());
        assert_eq!(d.fire(start + Duration::from_secs(10)), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_description_kept_untrimmed() {
        let mut d = debouncer();
        let now = Instant::now();
        d.input("  taxi ", now);
        assert_eq!(
            d.fire(now + Duration::from_millis(500)).as_deref(),
            Some("  taxi ")
        );
    }
}
