//! Core scheduling library shared by the freqphrase backend.
//!
//! Provides:
//! - Word learning states and the three-valued judgment type
//! - Review policy implementations (stepped interval ladder)
//! - Shared progress types (WordProgress, ReviewOutcome)

pub mod policy;
pub mod types;

pub use policy::{get_policy, ReviewOutcome, ReviewPolicy};
pub use types::{Judgment, WordProgress, WordState};
