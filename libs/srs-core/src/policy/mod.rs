//! Review policy implementations.

pub mod stepped;

use chrono::{DateTime, Duration, Utc};

use crate::types::{Judgment, WordProgress};

/// Result of applying a judgment to a word's progress.
#[derive(Debug, Clone)]
pub struct ReviewOutcome {
    pub progress: WordProgress,
    pub next_due: DateTime<Utc>,
}

/// Trait for review scheduling policies.
///
/// The contract is judgment in, state and interval out. A richer scheduler
/// (ease factors, per-word intervals) can replace the stepped ladder behind
/// this trait without touching the selection queries or the answer handler.
pub trait ReviewPolicy: Send + Sync {
    /// Policy identifier.
    fn name(&self) -> &'static str;

    /// Re-review interval for a judgment. Keyed by judgment alone,
    /// independent of the word's current state.
    fn interval(&self, judgment: Judgment) -> Duration;

    /// Apply a judgment to a word's progress.
    fn apply(
        &self,
        progress: &WordProgress,
        judgment: Judgment,
        now: DateTime<Utc>,
    ) -> ReviewOutcome;
}

/// Get policy by name.
pub fn get_policy(name: &str) -> Option<Box<dyn ReviewPolicy>> {
    match name {
        "stepped" => Some(Box::new(stepped::Stepped::default())),
        _ => None,
    }
}
