//! Test fixtures and factory functions for creating request bodies.

use serde_json::json;
use uuid::Uuid;

/// Create a start session request body.
pub fn start_session_request(deck_id: Uuid) -> serde_json::Value {
    json!({ "deck_id": deck_id })
}

/// Create a submit review request body.
pub fn submit_review_request(flashcard_id: Uuid, rating: u8) -> serde_json::Value {
    json!({
        "flashcard_id": flashcard_id,
        "rating": rating
    })
}

/// Create an update session status request body.
pub fn update_status_request(status: &str) -> serde_json::Value {
    json!({ "status": status })
}
