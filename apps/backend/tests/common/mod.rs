//! Common test utilities and fixtures for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - TestContext for setting up test environment with database
//! - Helper functions for seeding users, decks, and flashcards
//! - Authentication helpers
//!
//! # Requirements
//! Integration tests require a PostgreSQL database (set DATABASE_URL env var).

pub mod fixtures;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use mnemo_backend::db::Database;
use mnemo_backend::routes;
use mnemo_backend::AppState;

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

        let state = AppState { db: db.clone() };

        let app = build_test_router(state);

        Self { db, app }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    /// Create a test user and return its ID and token.
    pub async fn create_test_user(&self, name: Option<&str>) -> (Uuid, String) {
        let user = self
            .db
            .create_user(name)
            .await
            .expect("Failed to create test user");
        (user.id, user.token)
    }

    /// Create a deck for a user and return its ID.
    pub async fn create_test_deck(&self, user_id: Uuid, name: &str) -> Uuid {
        sqlx::query_scalar(
            r#"
            INSERT INTO decks (user_id, name)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(name)
        .fetch_one(self.db.pool())
        .await
        .expect("Failed to create test deck")
    }

    /// Create a flashcard in a deck and return its ID.
    pub async fn create_test_card(
        &self,
        user_id: Uuid,
        deck_id: Uuid,
        question: &str,
        answer: &str,
    ) -> Uuid {
        sqlx::query_scalar(
            r#"
            INSERT INTO flashcards (user_id, deck_id, question, answer)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(deck_id)
        .bind(question)
        .bind(answer)
        .fetch_one(self.db.pool())
        .await
        .expect("Failed to create test card")
    }

    /// Overwrite a card's scheduling state, to seed overdue/future cards.
    pub async fn set_card_schedule(
        &self,
        card_id: Uuid,
        stability: f64,
        difficulty: f64,
        last_reviewed_at: DateTime<Utc>,
        next_due_at: DateTime<Utc>,
    ) {
        sqlx::query(
            r#"
            UPDATE flashcards
            SET stability = $2, difficulty = $3, last_reviewed_at = $4, next_due_at = $5
            WHERE id = $1
            "#,
        )
        .bind(card_id)
        .bind(stability)
        .bind(difficulty)
        .bind(last_reviewed_at)
        .bind(next_due_at)
        .execute(self.db.pool())
        .await
        .expect("Failed to set card schedule");
    }

    /// Read a flashcard's (stability, next_due_at, version) directly.
    pub async fn card_schedule(&self, card_id: Uuid) -> (Option<f64>, Option<DateTime<Utc>>, i64) {
        sqlx::query_as(
            r#"
            SELECT stability, next_due_at, version
            FROM flashcards
            WHERE id = $1
            "#,
        )
        .bind(card_id)
        .fetch_one(self.db.pool())
        .await
        .expect("Failed to read card schedule")
    }

    /// Count review events recorded for a session.
    pub async fn count_session_reviews(&self, session_id: Uuid) -> i64 {
        sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM review_events
            WHERE study_session_id = $1
            "#,
        )
        .bind(session_id)
        .fetch_one(self.db.pool())
        .await
        .expect("Failed to count review events")
    }

    /// Format authorization header value.
    pub fn auth_header_value(token: &str) -> String {
        format!("Bearer {}", token)
    }

    /// Clean up test data for a user.
    ///
    /// Call this after tests to remove test data.
    pub async fn cleanup_user(&self, user_id: Uuid) {
        // Delete in order due to foreign keys
        let _ = sqlx::query("DELETE FROM review_events WHERE user_id = $1")
            .bind(user_id)
            .execute(self.db.pool())
            .await;

        let _ = sqlx::query("DELETE FROM study_sessions WHERE user_id = $1")
            .bind(user_id)
            .execute(self.db.pool())
            .await;

        let _ = sqlx::query("DELETE FROM flashcards WHERE user_id = $1")
            .bind(user_id)
            .execute(self.db.pool())
            .await;

        let _ = sqlx::query("DELETE FROM decks WHERE user_id = $1")
            .bind(user_id)
            .execute(self.db.pool())
            .await;

        let _ = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(self.db.pool())
            .await;
    }
}

/// Build the test router with all routes.
fn build_test_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/api/sessions", post(routes::sessions::start))
        .route("/api/sessions/:id", get(routes::sessions::get))
        .route("/api/sessions/:id/status", put(routes::sessions::update_status))
        .route("/api/sessions/:id/reviews", post(routes::sessions::submit_review))
        .route("/api/sessions/:id/summary", get(routes::sessions::summary))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            routes::auth::auth_middleware,
        ));

    Router::new()
        .route("/health", get(|| async { "OK" }))
        .merge(protected_routes)
        .with_state(state)
}
