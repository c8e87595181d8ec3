//! Test fixtures and factory functions for creating test data.

use serde_json::json;
use uuid::Uuid;

/// Generate a unique word surface form to avoid collisions between tests.
pub fn unique_word(prefix: &str) -> String {
    format!("{}_{}", prefix, &Uuid::new_v4().to_string()[..8])
}

/// Generate a unique phrase text.
pub fn unique_phrase(prefix: &str) -> String {
    format!("{} {}", prefix, &Uuid::new_v4().to_string()[..8])
}

/// Create a user register request body.
pub fn register_request(name: Option<&str>) -> serde_json::Value {
    match name {
        Some(n) => json!({ "name": n }),
        None => json!({}),
    }
}

/// Create an answer request body.
pub fn answer_request(phrase_id: i64, judgment: &str) -> serde_json::Value {
    json!({
        "phrase_id": phrase_id,
        "judgment": judgment
    })
}
