//! Error handling for the backend API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use review_core::ScheduleError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Persistence error: {0}")]
    Persistence(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Deck not found")]
    DeckNotFound,

    #[error("Session not found")]
    SessionNotFound,

    #[error("Flashcard not found")]
    FlashcardNotFound,

    #[error("No cards available for review")]
    NoCardsAvailable,

    #[error("Invalid rating {0}, expected 1-4")]
    InvalidRating(u8),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ScheduleError> for ApiError {
    fn from(err: ScheduleError) -> Self {
        match err {
            ScheduleError::InvalidRating(value) => ApiError::InvalidRating(value),
        }
    }
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "unauthorized"),
            ApiError::DeckNotFound => (StatusCode::NOT_FOUND, "deck_not_found"),
            ApiError::SessionNotFound => (StatusCode::NOT_FOUND, "session_not_found"),
            ApiError::FlashcardNotFound => (StatusCode::NOT_FOUND, "flashcard_not_found"),
            ApiError::NoCardsAvailable => (StatusCode::CONFLICT, "no_cards_available"),
            ApiError::InvalidRating(_) => (StatusCode::BAD_REQUEST, "invalid_rating"),
            ApiError::Persistence(_) => (StatusCode::INTERNAL_SERVER_ERROR, "persistence_error"),
            ApiError::Migration(_) => (StatusCode::INTERNAL_SERVER_ERROR, "migration_error"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}

/// Result type alias for API operations
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_status() {
        let error = ApiError::Unauthorized("invalid token".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_not_found_statuses() {
        for error in [
            ApiError::DeckNotFound,
            ApiError::SessionNotFound,
            ApiError::FlashcardNotFound,
        ] {
            let response = error.into_response();
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
        }
    }

    #[test]
    fn test_invalid_rating_status() {
        let error = ApiError::InvalidRating(5);
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_no_cards_available_status() {
        let error = ApiError::NoCardsAvailable;
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_internal_error_status() {
        let error = ApiError::Internal("unexpected error".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_schedule_error_maps_to_invalid_rating() {
        let error: ApiError = ScheduleError::InvalidRating(7).into();
        assert!(matches!(error, ApiError::InvalidRating(7)));
    }

    #[test]
    fn test_error_display_invalid_rating() {
        let error = ApiError::InvalidRating(0);
        assert_eq!(error.to_string(), "Invalid rating 0, expected 1-4");
    }

    #[test]
    fn test_error_display_no_cards() {
        let error = ApiError::NoCardsAvailable;
        assert_eq!(error.to_string(), "No cards available for review");
    }
}
