//! Core types for the spaced-repetition scheduler.

use serde::{Deserialize, Serialize};

/// Per-word learning state. A missing state row is equivalent to `New`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WordState {
    New,
    Intro,
    Learn,
    Known,
}

impl Default for WordState {
    fn default() -> Self {
        Self::New
    }
}

impl WordState {
    /// Text form as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::Intro => "INTRO",
            Self::Learn => "LEARN",
            Self::Known => "KNOWN",
        }
    }

    /// Parse from the database text form.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "NEW" => Some(Self::New),
            "INTRO" => Some(Self::Intro),
            "LEARN" => Some(Self::Learn),
            "KNOWN" => Some(Self::Known),
            _ => None,
        }
    }
}

/// Learner's self-assessment after being shown a phrase.
///
/// `Low` = "don't know", `Mid` = "know", `High` = "know well".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Judgment {
    Low,
    Mid,
    High,
}

impl Judgment {
    /// Wire and database form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Mid => "mid",
            Self::High => "high",
        }
    }

    /// Parse from the wire form. Unknown values return `None` so callers
    /// can reject them before any side effect.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Self::Low),
            "mid" => Some(Self::Mid),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// Accumulated progress for one (user, word) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordProgress {
    pub state: WordState,
    pub reps: u32,
    pub lapses: u32,
}

impl Default for WordProgress {
    fn default() -> Self {
        Self {
            state: WordState::New,
            reps: 0,
            lapses: 0,
        }
    }
}
