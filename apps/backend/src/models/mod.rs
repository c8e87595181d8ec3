//! Database models and API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// Re-export shared types from srs-core
pub use srs_core::types::{Judgment, WordProgress, WordState};

// === Database Entity Types ===

/// Registered learner
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub token: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
}

/// Phrase stored in PostgreSQL
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbPhrase {
    pub id: i64,
    pub phrase: String,
    pub freq: i32,
}

/// Per-(user, word) state row. At most one row per pair; a missing row
/// means the word has never been judged.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbWordState {
    pub user_id: i64,
    pub word_id: i64,
    pub state: String,
    pub reps: i32,
    pub lapses: i32,
    pub last_result: Option<String>,
    pub last_seen: Option<DateTime<Utc>>,
    pub next_due: Option<DateTime<Utc>>,
}

impl DbWordState {
    /// Convert to srs-core progress. Unknown state text falls back to NEW.
    pub fn to_progress(&self) -> WordProgress {
        WordProgress {
            state: WordState::from_str(&self.state).unwrap_or_default(),
            reps: self.reps.max(0) as u32,
            lapses: self.lapses.max(0) as u32,
        }
    }
}

/// One row of the per-phrase state aggregation used by candidate selection.
#[derive(Debug, Clone, FromRow)]
pub struct CandidateRow {
    pub id: i64,
    pub phrase: String,
    pub freq: i32,
    pub n_new: i64,
    pub n_intro: i64,
    pub n_learn: i64,
}

/// Target word (teaching point) of a selected phrase.
#[derive(Debug, Clone, FromRow)]
pub struct TargetWordRow {
    pub word_id: i64,
    pub word: String,
}

/// Effective word state for one composition row of a phrase, with absent
/// user_word_state columns surfaced as NULL.
#[derive(Debug, Clone, FromRow)]
pub struct PhraseWordStateRow {
    pub word_id: i64,
    pub state: String,
    pub reps: Option<i32>,
    pub lapses: Option<i32>,
}

impl PhraseWordStateRow {
    /// Effective progress, defaulting missing rows to NEW with zero counters.
    pub fn to_progress(&self) -> WordProgress {
        WordProgress {
            state: WordState::from_str(&self.state).unwrap_or_default(),
            reps: self.reps.unwrap_or(0).max(0) as u32,
            lapses: self.lapses.unwrap_or(0).max(0) as u32,
        }
    }
}

/// Which selection pass produced the candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SelectionMode {
    Strict,
    Relaxed,
}

/// Per-state word counts across the corpus for one user.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct WordStateStats {
    pub new: i64,
    pub intro: i64,
    pub learn: i64,
    pub known: i64,
}

// === API Request/Response Types ===

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub user_id: i64,
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MeResponse {
    pub user_id: i64,
    pub last_seen_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NextPhraseStatus {
    Ok,
    NoPhrase,
}

/// Selected candidate with its diagnostic counts and teaching point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NextPhrase {
    pub phrase_id: i64,
    pub phrase: String,
    pub freq: i32,
    pub n_new: i64,
    pub n_intro: i64,
    pub n_learn: i64,
    pub mode: SelectionMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_word_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_word: Option<String>,
}

/// GET /api/srs/next response. The phrase fields are flattened alongside
/// `status` and omitted entirely when the queue is exhausted.
#[derive(Debug, Serialize, Deserialize)]
pub struct NextPhraseResponse {
    pub status: NextPhraseStatus,
    #[serde(flatten)]
    pub next: Option<NextPhrase>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnswerRequest {
    pub phrase_id: i64,
    pub judgment: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub status: String,
}
