//! Common test utilities and fixtures for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - TestContext for setting up test environment with database
//! - Helper functions for seeding corpus data and learner state
//! - Authentication helpers
//!
//! # Requirements
//! Integration tests require a dedicated PostgreSQL database (set
//! DATABASE_URL env var). Candidate selection scans the whole phrase
//! corpus, so run them against an otherwise-empty database and
//! single-threaded: `cargo test -- --ignored --test-threads=1`.

pub mod fixtures;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use freqphrase_backend::db::Database;
use freqphrase_backend::models::DbWordState;
use freqphrase_backend::routes;
use freqphrase_backend::AppState;
use srs_core::policy::get_policy;

/// Test context containing database connection and test server.
///
/// Use this to set up integration tests with a real database connection.
/// Requires DATABASE_URL environment variable to be set.
pub struct TestContext {
    pub db: Arc<Database>,
    app: Router,
}

impl TestContext {
    /// Create a new test context.
    ///
    /// # Panics
    /// Panics if DATABASE_URL is not set or database connection fails.
    pub async fn new() -> Self {
        dotenvy::dotenv().ok();

        let database_url =
            std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests");

        let db = Database::connect(&database_url)
            .await
            .expect("Failed to connect to test database");

        db.run_migrations()
            .await
            .expect("Failed to run migrations");

        let db = Arc::new(db);

        let state = AppState {
            db: db.clone(),
            policy: Arc::from(get_policy("stepped").expect("stepped policy must exist")),
        };

        let app = build_test_router(state);

        Self { db, app }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    /// Create a test user and return its ID and token.
    pub async fn create_test_user(&self, name: Option<&str>) -> (i64, String) {
        let user = self
            .db
            .create_user(name)
            .await
            .expect("Failed to create test user");
        (user.id, user.token)
    }

    /// Format authorization header value.
    pub fn auth_header_value(token: &str) -> String {
        format!("Bearer {}", token)
    }

    // === Corpus seeding ===

    /// Insert a word and return its id.
    pub async fn seed_word(&self, word: &str) -> i64 {
        sqlx::query_scalar("INSERT INTO words (word) VALUES ($1) RETURNING id")
            .bind(word)
            .fetch_one(self.db.pool())
            .await
            .expect("Failed to seed word")
    }

    /// Insert a phrase composed of the given words (positions 0..n).
    pub async fn seed_phrase(&self, phrase: &str, freq: i32, word_ids: &[i64]) -> i64 {
        let phrase_id: i64 =
            sqlx::query_scalar("INSERT INTO phrases (phrase, freq) VALUES ($1, $2) RETURNING id")
                .bind(phrase)
                .bind(freq)
                .fetch_one(self.db.pool())
                .await
                .expect("Failed to seed phrase");

        for (position, word_id) in word_ids.iter().enumerate() {
            sqlx::query(
                "INSERT INTO phrase_words (phrase_id, word_id, position) VALUES ($1, $2, $3)",
            )
            .bind(phrase_id)
            .bind(word_id)
            .bind(position as i32)
            .execute(self.db.pool())
            .await
            .expect("Failed to seed phrase word");
        }

        phrase_id
    }

    /// Force a word into a given state for a user, bypassing the API.
    pub async fn set_word_state(&self, user_id: i64, word_id: i64, state: &str) {
        sqlx::query(
            r#"
            INSERT INTO user_word_state (user_id, word_id, state)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, word_id) DO UPDATE SET state = EXCLUDED.state
            "#,
        )
        .bind(user_id)
        .bind(word_id)
        .bind(state)
        .execute(self.db.pool())
        .await
        .expect("Failed to set word state");
    }

    /// Read back a word state row.
    pub async fn get_word_state(&self, user_id: i64, word_id: i64) -> Option<DbWordState> {
        self.db
            .get_word_state(user_id, word_id)
            .await
            .expect("Failed to read word state")
    }

    /// Count history rows for (user, phrase).
    pub async fn history_count(&self, user_id: i64, phrase_id: i64) -> i64 {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM user_phrase_history WHERE user_id = $1 AND phrase_id = $2",
        )
        .bind(user_id)
        .bind(phrase_id)
        .fetch_one(self.db.pool())
        .await
        .expect("Failed to count history")
    }

    /// Clean up test data for a user.
    ///
    /// Call this after tests to remove test data.
    pub async fn cleanup_user(&self, user_id: i64) {
        // Delete in order due to foreign keys
        let _ = sqlx::query("DELETE FROM user_phrase_history WHERE user_id = $1")
            .bind(user_id)
            .execute(self.db.pool())
            .await;

        let _ = sqlx::query("DELETE FROM user_word_state WHERE user_id = $1")
            .bind(user_id)
            .execute(self.db.pool())
            .await;

        let _ = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(self.db.pool())
            .await;
    }

    /// Clean up seeded corpus rows.
    pub async fn cleanup_corpus(&self, phrase_ids: &[i64], word_ids: &[i64]) {
        for phrase_id in phrase_ids {
            let _ = sqlx::query("DELETE FROM user_phrase_history WHERE phrase_id = $1")
                .bind(phrase_id)
                .execute(self.db.pool())
                .await;

            let _ = sqlx::query("DELETE FROM phrase_words WHERE phrase_id = $1")
                .bind(phrase_id)
                .execute(self.db.pool())
                .await;

            let _ = sqlx::query("DELETE FROM phrases WHERE id = $1")
                .bind(phrase_id)
                .execute(self.db.pool())
                .await;
        }

        for word_id in word_ids {
            let _ = sqlx::query("DELETE FROM user_word_state WHERE word_id = $1")
                .bind(word_id)
                .execute(self.db.pool())
                .await;

            let _ = sqlx::query("DELETE FROM words WHERE id = $1")
                .bind(word_id)
                .execute(self.db.pool())
                .await;
        }
    }
}

/// Build the test router with all routes.
fn build_test_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/api/users/me", get(routes::users::me))
        .route("/api/srs/next", get(routes::srs::next_phrase))
        .route("/api/srs/answer", post(routes::srs::answer))
        .route("/api/srs/stats", get(routes::srs::stats))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            routes::auth::auth_middleware,
        ));

    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api/users/register", post(routes::users::register))
        .merge(protected_routes)
        .with_state(state)
}
