//! PostgreSQL database operations

use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use srs_core::policy::ReviewPolicy;
use srs_core::types::Judgment;

use crate::error::{ApiError, Result};
use crate::models::*;

/// Database wrapper with connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to PostgreSQL and create connection pool
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| ApiError::Database(e.into()))?;
        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // === User Repository ===

    /// Create a new user with generated token
    pub async fn create_user(&self, name: Option<&str>) -> Result<User> {
        let token = Uuid::new_v4().to_string();
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (token, name)
            VALUES ($1, $2)
            RETURNING id, token, name, created_at, last_seen_at
            "#,
        )
        .bind(&token)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Get user by token
    pub async fn get_user_by_token(&self, token: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, token, name, created_at, last_seen_at
            FROM users
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Update user last_seen_at timestamp
    pub async fn update_last_seen(&self, user_id: i64) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET last_seen_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // === Corpus Repository ===

    /// Get phrase by ID
    pub async fn get_phrase(&self, phrase_id: i64) -> Result<Option<DbPhrase>> {
        let phrase = sqlx::query_as::<_, DbPhrase>(
            r#"
            SELECT id, phrase, freq
            FROM phrases
            WHERE id = $1
            "#,
        )
        .bind(phrase_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(phrase)
    }

    // === Candidate Selection ===

    /// Strict pass: phrases with exactly one NEW constituent word that have
    /// never been shown to this user. Missing state rows count as NEW.
    /// Highest frequency rank wins, ties broken by phrase id.
    pub async fn find_candidate_strict(&self, user_id: i64) -> Result<Option<CandidateRow>> {
        let candidate = sqlx::query_as::<_, CandidateRow>(
            r#"
            WITH pw AS (
                SELECT
                    pw.phrase_id,
                    COALESCE(uws.state, 'NEW') AS state
                FROM phrase_words pw
                LEFT JOIN user_word_state uws
                  ON uws.word_id = pw.word_id
                 AND uws.user_id = $1
            ),
            agg AS (
                SELECT
                    phrase_id,
                    SUM(CASE WHEN state = 'NEW'   THEN 1 ELSE 0 END) AS n_new,
                    SUM(CASE WHEN state = 'INTRO' THEN 1 ELSE 0 END) AS n_intro,
                    SUM(CASE WHEN state = 'LEARN' THEN 1 ELSE 0 END) AS n_learn
                FROM pw
                GROUP BY phrase_id
            )
            SELECT p.id, p.phrase, p.freq, a.n_new, a.n_intro, a.n_learn
            FROM agg a
            JOIN phrases p ON p.id = a.phrase_id
            LEFT JOIN user_phrase_history h
              ON h.user_id = $1
             AND h.phrase_id = p.id
            WHERE a.n_new = 1
              AND h.phrase_id IS NULL
            ORDER BY p.freq DESC, p.id
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(candidate)
    }

    /// Relaxed pass: any phrase with at least one NEW constituent word,
    /// review history ignored. Phrases whose other words are already KNOWN
    /// stay eligible on purpose.
    pub async fn find_candidate_relaxed(&self, user_id: i64) -> Result<Option<CandidateRow>> {
        let candidate = sqlx::query_as::<_, CandidateRow>(
            r#"
            WITH pw AS (
                SELECT
                    pw.phrase_id,
                    COALESCE(uws.state, 'NEW') AS state
                FROM phrase_words pw
                LEFT JOIN user_word_state uws
                  ON uws.word_id = pw.word_id
                 AND uws.user_id = $1
            ),
            agg AS (
                SELECT
                    phrase_id,
                    SUM(CASE WHEN state = 'NEW'   THEN 1 ELSE 0 END) AS n_new,
                    SUM(CASE WHEN state = 'INTRO' THEN 1 ELSE 0 END) AS n_intro,
                    SUM(CASE WHEN state = 'LEARN' THEN 1 ELSE 0 END) AS n_learn
                FROM pw
                GROUP BY phrase_id
            )
            SELECT p.id, p.phrase, p.freq, a.n_new, a.n_intro, a.n_learn
            FROM agg a
            JOIN phrases p ON p.id = a.phrase_id
            WHERE a.n_new >= 1
            ORDER BY p.freq DESC, p.id
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(candidate)
    }

    /// First NEW word of a phrase in ascending position order. None is
    /// advisory (a relaxed-mode phrase may have lost its NEW word to a
    /// concurrent update), never an error.
    pub async fn find_target_word(
        &self,
        user_id: i64,
        phrase_id: i64,
    ) -> Result<Option<TargetWordRow>> {
        let target = sqlx::query_as::<_, TargetWordRow>(
            r#"
            SELECT w.id AS word_id, w.word
            FROM phrase_words pw
            JOIN words w ON w.id = pw.word_id
            LEFT JOIN user_word_state uws
              ON uws.word_id = pw.word_id
             AND uws.user_id = $1
            WHERE pw.phrase_id = $2
              AND COALESCE(uws.state, 'NEW') = 'NEW'
            ORDER BY pw.position
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(phrase_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(target)
    }

    // === Answer Processing ===

    /// Record a judgment for a shown phrase: append one history row and
    /// upsert the state of every word composing the phrase, as a single
    /// transaction. Returns the number of word states written.
    pub async fn record_answer(
        &self,
        user_id: i64,
        phrase_id: i64,
        judgment: Judgment,
        policy: &dyn ReviewPolicy,
        now: DateTime<Utc>,
    ) -> Result<usize> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO user_phrase_history (user_id, phrase_id, shown_at, result)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(user_id)
        .bind(phrase_id)
        .bind(now)
        .bind(judgment.as_str())
        .execute(&mut *tx)
        .await?;

        let rows = sqlx::query_as::<_, PhraseWordStateRow>(
            r#"
            SELECT
                pw.word_id,
                COALESCE(uws.state, 'NEW') AS state,
                uws.reps,
                uws.lapses
            FROM phrase_words pw
            LEFT JOIN user_word_state uws
              ON uws.word_id = pw.word_id
             AND uws.user_id = $1
            WHERE pw.phrase_id = $2
            "#,
        )
        .bind(user_id)
        .bind(phrase_id)
        .fetch_all(&mut *tx)
        .await?;

        for row in &rows {
            let outcome = policy.apply(&row.to_progress(), judgment, now);

            // Full-row insert-or-replace: last writer wins under concurrent
            // double-submits, no partial-field merging.
            sqlx::query(
                r#"
                INSERT INTO user_word_state (
                    user_id, word_id, state, reps, lapses, last_result, last_seen, next_due
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                ON CONFLICT (user_id, word_id) DO UPDATE SET
                    state       = EXCLUDED.state,
                    reps        = EXCLUDED.reps,
                    lapses      = EXCLUDED.lapses,
                    last_result = EXCLUDED.last_result,
                    last_seen   = EXCLUDED.last_seen,
                    next_due    = EXCLUDED.next_due
                "#,
            )
            .bind(user_id)
            .bind(row.word_id)
            .bind(outcome.progress.state.as_str())
            .bind(outcome.progress.reps as i32)
            .bind(outcome.progress.lapses as i32)
            .bind(judgment.as_str())
            .bind(now)
            .bind(outcome.next_due)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(rows.len())
    }

    // === Stats ===

    /// Get word state by (user, word)
    pub async fn get_word_state(
        &self,
        user_id: i64,
        word_id: i64,
    ) -> Result<Option<DbWordState>> {
        let state = sqlx::query_as::<_, DbWordState>(
            r#"
            SELECT user_id, word_id, state, reps, lapses, last_result, last_seen, next_due
            FROM user_word_state
            WHERE user_id = $1 AND word_id = $2
            "#,
        )
        .bind(user_id)
        .bind(word_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(state)
    }

    /// Per-state word counts across the whole corpus for this user, with
    /// words lacking a state row counted as NEW.
    pub async fn word_state_stats(&self, user_id: i64) -> Result<WordStateStats> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT COALESCE(uws.state, 'NEW') AS state, COUNT(*) AS cnt
            FROM words w
            LEFT JOIN user_word_state uws
              ON uws.word_id = w.id
             AND uws.user_id = $1
            GROUP BY COALESCE(uws.state, 'NEW')
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let mut stats = WordStateStats::default();
        for (state, count) in rows {
            match state.as_str() {
                "NEW" => stats.new = count,
                "INTRO" => stats.intro = count,
                "LEARN" => stats.learn = count,
                "KNOWN" => stats.known = count,
                _ => {}
            }
        }

        Ok(stats)
    }
}
