//! PostgreSQL database operations

use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

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
            .map_err(|e| ApiError::Migration(e.to_string()))?;
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
    pub async fn update_last_seen(&self, user_id: Uuid) -> Result<()> {
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

    // === Deck Repository ===

    /// Check that a deck exists and is owned by the user
    pub async fn deck_exists(&self, user_id: Uuid, deck_id: Uuid) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM decks
                WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL
            )
            "#,
        )
        .bind(deck_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    // === Flashcard Repository ===

    /// Get all non-deleted flashcards in a deck, in insertion order
    pub async fn get_deck_flashcards(
        &self,
        user_id: Uuid,
        deck_id: Uuid,
    ) -> Result<Vec<DbFlashcard>> {
        let cards = sqlx::query_as::<_, DbFlashcard>(
            r#"
            SELECT id, user_id, deck_id, question, answer,
                   stability, difficulty, last_reviewed_at, next_due_at,
                   version, created_at, updated_at, deleted_at
            FROM flashcards
            WHERE user_id = $1 AND deck_id = $2 AND deleted_at IS NULL
            ORDER BY created_at, id
            "#,
        )
        .bind(user_id)
        .bind(deck_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(cards)
    }

    /// Get a flashcard by ID, owned by the user and not soft-deleted
    pub async fn get_flashcard(
        &self,
        user_id: Uuid,
        flashcard_id: Uuid,
    ) -> Result<Option<DbFlashcard>> {
        let card = sqlx::query_as::<_, DbFlashcard>(
            r#"
            SELECT id, user_id, deck_id, question, answer,
                   stability, difficulty, last_reviewed_at, next_due_at,
                   version, created_at, updated_at, deleted_at
            FROM flashcards
            WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(flashcard_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(card)
    }

    // === Study Session Repository ===

    /// Create a study session in progress
    pub async fn create_session(&self, user_id: Uuid, deck_id: Uuid) -> Result<DbStudySession> {
        let session = sqlx::query_as::<_, DbStudySession>(
            r#"
            INSERT INTO study_sessions (user_id, deck_id, status)
            VALUES ($1, $2, 'in_progress')
            RETURNING id, user_id, deck_id, status, started_at, ended_at
            "#,
        )
        .bind(user_id)
        .bind(deck_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(session)
    }

    /// Get a session owned by the user
    pub async fn get_session(
        &self,
        user_id: Uuid,
        session_id: Uuid,
    ) -> Result<Option<DbStudySession>> {
        let session = sqlx::query_as::<_, DbStudySession>(
            r#"
            SELECT id, user_id, deck_id, status, started_at, ended_at
            FROM study_sessions
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(session_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    /// Write a new session status. `ended_at` is set for terminal statuses
    /// and cleared otherwise.
    pub async fn update_session_status(
        &self,
        user_id: Uuid,
        session_id: Uuid,
        status: SessionStatus,
        ended_at: Option<DateTime<Utc>>,
    ) -> Result<Option<DbStudySession>> {
        let session = sqlx::query_as::<_, DbStudySession>(
            r#"
            UPDATE study_sessions
            SET status = $3, ended_at = $4
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, deck_id, status, started_at, ended_at
            "#,
        )
        .bind(session_id)
        .bind(user_id)
        .bind(status.as_str())
        .bind(ended_at)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    // === Review Event Repository ===

    /// Persist a review event and mirror its output onto the flashcard, as
    /// one transaction.
    ///
    /// The flashcard update is guarded by `expected_version`: if another
    /// review committed in between, no row matches, the transaction rolls
    /// back and `Ok(false)` is returned so the caller can recompute from
    /// fresh state.
    pub async fn record_review(
        &self,
        event: &DbReviewEvent,
        expected_version: i64,
    ) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO review_events (id, user_id, study_session_id, flashcard_id,
                                       rating, stability, difficulty, retrievability,
                                       next_due_at, reviewed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(event.id)
        .bind(event.user_id)
        .bind(event.study_session_id)
        .bind(event.flashcard_id)
        .bind(event.rating)
        .bind(event.stability)
        .bind(event.difficulty)
        .bind(event.retrievability)
        .bind(event.next_due_at)
        .bind(event.reviewed_at)
        .execute(&mut *tx)
        .await?;

        let updated = sqlx::query(
            r#"
            UPDATE flashcards
            SET stability = $4,
                difficulty = $5,
                last_reviewed_at = $6,
                next_due_at = $7,
                version = version + 1,
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2 AND version = $3 AND deleted_at IS NULL
            "#,
        )
        .bind(event.flashcard_id)
        .bind(event.user_id)
        .bind(expected_version)
        .bind(event.stability)
        .bind(event.difficulty)
        .bind(event.reviewed_at)
        .bind(event.next_due_at)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        tx.commit().await?;
        Ok(true)
    }

    /// Get all review events recorded for a session
    pub async fn get_session_reviews(
        &self,
        user_id: Uuid,
        session_id: Uuid,
    ) -> Result<Vec<DbReviewEvent>> {
        let events = sqlx::query_as::<_, DbReviewEvent>(
            r#"
            SELECT id, user_id, study_session_id, flashcard_id,
                   rating, stability, difficulty, retrievability,
                   next_due_at, reviewed_at
            FROM review_events
            WHERE study_session_id = $1 AND user_id = $2
            ORDER BY reviewed_at
            "#,
        )
        .bind(session_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }
}
