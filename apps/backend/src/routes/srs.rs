//! SRS endpoints: next-phrase selection and answer processing

use axum::{extract::State, Extension, Json};
use chrono::Utc;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;
use srs_core::types::Judgment;

/// GET /api/srs/next
///
/// Two-phase selection: the strict pass wants exactly one NEW word and a
/// phrase never shown to this user; once that pool is exhausted the relaxed
/// pass accepts any phrase that still teaches at least one NEW word.
pub async fn next_phrase(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<NextPhraseResponse>> {
    let (candidate, mode) = match state.db.find_candidate_strict(auth.user_id).await? {
        Some(row) => (Some(row), SelectionMode::Strict),
        None => (
            state.db.find_candidate_relaxed(auth.user_id).await?,
            SelectionMode::Relaxed,
        ),
    };

    let Some(row) = candidate else {
        return Ok(Json(NextPhraseResponse {
            status: NextPhraseStatus::NoPhrase,
            next: None,
        }));
    };

    // Teaching point: first NEW word by position. Absence is advisory.
    let target = state.db.find_target_word(auth.user_id, row.id).await?;

    Ok(Json(NextPhraseResponse {
        status: NextPhraseStatus::Ok,
        next: Some(NextPhrase {
            phrase_id: row.id,
            phrase: row.phrase,
            freq: row.freq,
            n_new: row.n_new,
            n_intro: row.n_intro,
            n_learn: row.n_learn,
            mode,
            target_word_id: target.as_ref().map(|t| t.word_id),
            target_word: target.map(|t| t.word),
        }),
    }))
}

/// POST /api/srs/answer
pub async fn answer(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(payload): Json<AnswerRequest>,
) -> Result<Json<AnswerResponse>> {
    // Validate the judgment before any side effect
    let judgment = Judgment::from_str(&payload.judgment)
        .ok_or_else(|| ApiError::BadRequest(format!("Unknown judgment: {}", payload.judgment)))?;

    state
        .db
        .get_phrase(payload.phrase_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Phrase not found".to_string()))?;

    let now = Utc::now();
    let updated = state
        .db
        .record_answer(
            auth.user_id,
            payload.phrase_id,
            judgment,
            state.policy.as_ref(),
            now,
        )
        .await?;

    tracing::debug!(
        "Recorded {} answer for user {} phrase {} ({} words)",
        judgment.as_str(),
        auth.user_id,
        payload.phrase_id,
        updated
    );

    Ok(Json(AnswerResponse {
        status: "OK".to_string(),
    }))
}

/// GET /api/srs/stats
pub async fn stats(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<WordStateStats>> {
    let stats = state.db.word_state_stats(auth.user_id).await?;
    Ok(Json(stats))
}
