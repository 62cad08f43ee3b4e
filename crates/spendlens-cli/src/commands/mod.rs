//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `analyze` - Load an expense batch from files and report on it
//! - `serve` - Web server command

pub mod analyze;
pub mod serve;

// Re-export command functions for main.rs
pub use analyze::*;
pub use serve::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
