//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Config loading, controller construction, config display
//! - `transactions` - Transaction commands (add, edit, delete, list, balance, sync)
//! - `ai` - AI commands (suggest, learn, insights)
//! - `shell` - Interactive session

pub mod ai;
pub mod core;
pub mod shell;
pub mod transactions;

// Re-export command functions for main.rs
pub use ai::*;
pub use core::*;
pub use shell::*;
pub use transactions::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
