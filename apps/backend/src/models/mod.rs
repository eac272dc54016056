//! Database models and API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeMap;
use uuid::Uuid;

use review_core::DueCard;

// === Database Entity Types ===

/// Account the bearer token resolves to
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub token: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
}

/// Flashcard stored in PostgreSQL
///
/// Scheduling fields are null until the card's first review. `version` is
/// bumped on every scheduling update and checked on write.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbFlashcard {
    pub id: Uuid,
    pub user_id: Uuid,
    pub deck_id: Uuid,
    pub question: String,
    pub answer: String,
    pub stability: Option<f64>,
    pub difficulty: Option<f64>,
    pub last_reviewed_at: Option<DateTime<Utc>>,
    pub next_due_at: Option<DateTime<Utc>>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl DbFlashcard {
    /// Convert to the card shape exposed to study callers.
    /// Scheduling fields stay server-side.
    pub fn to_session_card(&self) -> SessionCard {
        SessionCard {
            id: self.id,
            question: self.question.clone(),
            answer: self.answer.clone(),
        }
    }
}

impl DueCard for DbFlashcard {
    fn next_due_at(&self) -> Option<DateTime<Utc>> {
        self.next_due_at
    }

    fn last_reviewed_at(&self) -> Option<DateTime<Utc>> {
        self.last_reviewed_at
    }
}

/// Study session status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    InProgress,
    Completed,
    Abandoned,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Abandoned => "abandoned",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "completed" => Self::Completed,
            "abandoned" => Self::Abandoned,
            _ => Self::InProgress,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

/// Study session stored in PostgreSQL
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbStudySession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub deck_id: Uuid,
    pub status: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl DbStudySession {
    pub fn status(&self) -> SessionStatus {
        SessionStatus::from_str(&self.status)
    }
}

/// Review event record. Append-only: snapshots the engine output at the
/// moment of the review.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbReviewEvent {
    pub id: Uuid,
    pub user_id: Uuid,
    pub study_session_id: Uuid,
    pub flashcard_id: Uuid,
    pub rating: i32,
    pub stability: f64,
    pub difficulty: f64,
    pub retrievability: f64,
    pub next_due_at: DateTime<Utc>,
    pub reviewed_at: DateTime<Utc>,
}

// === API Request/Response Types ===

#[derive(Debug, Serialize, Deserialize)]
pub struct StartSessionRequest {
    pub deck_id: Uuid,
}

/// Card as exposed to the study caller (no scheduling fields).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCard {
    pub id: Uuid,
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub status: SessionStatus,
    pub cards: Vec<SessionCard>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateSessionStatusRequest {
    pub status: SessionStatus,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateSessionStatusResponse {
    pub id: Uuid,
    pub status: SessionStatus,
    pub ended_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitReviewRequest {
    pub flashcard_id: Uuid,
    pub rating: u8,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitReviewResponse {
    pub review_event_id: Uuid,
    pub next_due_at: DateTime<Utc>,
    pub stability: f64,
    pub difficulty: f64,
    pub retrievability: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionSummaryResponse {
    pub cards_reviewed: usize,
    pub ratings: BTreeMap<u8, usize>,
}

impl SessionSummaryResponse {
    /// Build the summary from recorded events. All four rating buckets are
    /// always present; missing ratings report 0.
    pub fn from_events(events: &[DbReviewEvent]) -> Self {
        let mut ratings: BTreeMap<u8, usize> = (1..=4u8).map(|r| (r, 0)).collect();
        for event in events {
            if let Some(count) = ratings.get_mut(&(event.rating as u8)) {
                *count += 1;
            }
        }
        Self {
            cards_reviewed: events.len(),
            ratings,
        }
    }
}
