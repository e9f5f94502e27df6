//! Transient toast notifications
//!
//! Toasts are auto-dismissed a fixed time after they are shown. The queue only
//! tracks deadlines; the controller's event loop sleeps until the next one.

use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

impl ToastKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
    #[serde(skip)]
    pub expires_at: Instant,
}

/// Visible toasts, oldest first
#[derive(Debug)]
pub struct ToastQueue {
    ttl: Duration,
    next_id: u64,
    visible: Vec<Toast>,
}

impl ToastQueue {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            next_id: 0,
            visible: Vec::new(),
        }
    }

    /// Show a toast, returning a copy for rendering
    pub fn push(&mut self, kind: ToastKind, message: &str, now: Instant) -> Toast {
        self.next_id += 1;
        let toast = Toast {
            id: self.next_id,
            kind,
            message: message.to_string(),
            expires_at: now + self.ttl,
        };
        self.visible.push(toast.clone());
        toast
    }

    /// Manually close a toast
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.visible.len();
        self.visible.retain(|t| t.id != id);
        before != self.visible.len()
    }

    /// Remove and return every toast whose time is up
    pub fn expire(&mut self, now: Instant) -> Vec<Toast> {
        let (expired, kept): (Vec<_>, Vec<_>) = self
            .visible
            .drain(..)
            .partition(|t| t.expires_at <= now);
        self.visible = kept;
        expired
    }

    /// Earliest pending expiry
    pub fn next_deadline(&self) -> Option<Instant> {
        self.visible.iter().map(|t| t.expires_at).min()
    }

    pub fn visible(&self) -> &[Toast] {
        &self.visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_toasts_expire_after_ttl() {
        let mut q = ToastQueue::new(Duration::from_secs(5));
        let start = Instant::now();
        q.push(ToastKind::Success, "saved", start);
        q.push(ToastKind::Info, "learned", start + Duration::from_secs(2));

        assert!(q.expire(start + Duration::from_secs(4)).is_empty());
        let gone = q.expire(start + Duration::from_secs(5));
        assert_eq!(gone.len(), 1);
        assert_eq!(gone[0].message, "saved");
        assert_eq!(q.visible().len(), 1);
        assert_eq!(q.next_deadline(), Some(start + Duration::from_secs(7)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss() {
        let mut q = ToastQueue::new(Duration::from_secs(5));
        let t = q.push(ToastKind::Error, "failed", Instant::now());
        assert!(q.dismiss(t.id));
        assert!(!q.dismiss(t.id));
        assert!(q.next_deadline().is_none());
    }
}
