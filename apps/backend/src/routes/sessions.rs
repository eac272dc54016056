//! Study session endpoints

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;
use review_core::{compute_next_review, select_due, DEFAULT_SESSION_LIMIT};

/// How often a review write is retried after losing a version race.
const REVIEW_WRITE_ATTEMPTS: u32 = 3;

/// Load a deck's candidate cards and run the selector against them.
///
/// Selection always reflects live flashcard state, so a card reviewed a
/// moment ago has already moved out of the due set here.
async fn select_session_cards(
    state: &AppState,
    user_id: Uuid,
    deck_id: Uuid,
) -> Result<Vec<DbFlashcard>> {
    let candidates = state.db.get_deck_flashcards(user_id, deck_id).await?;
    Ok(select_due(candidates, DEFAULT_SESSION_LIMIT, Utc::now()))
}

/// POST /api/sessions
pub async fn start(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(payload): Json<StartSessionRequest>,
) -> Result<Json<SessionResponse>> {
    if !state.db.deck_exists(auth.user_id, payload.deck_id).await? {
        return Err(ApiError::DeckNotFound);
    }

    // One kind covers both "deck is empty" and "nothing due right now".
    let cards = select_session_cards(&state, auth.user_id, payload.deck_id).await?;
    if cards.is_empty() {
        return Err(ApiError::NoCardsAvailable);
    }

    let session = state.db.create_session(auth.user_id, payload.deck_id).await?;

    tracing::info!(session_id = %session.id, deck_id = %payload.deck_id, cards = cards.len(), "session started");

    Ok(Json(SessionResponse {
        id: session.id,
        status: session.status(),
        cards: cards.iter().map(|c| c.to_session_card()).collect(),
    }))
}

/// GET /api/sessions/{id}
pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionResponse>> {
    let session = state
        .db
        .get_session(auth.user_id, session_id)
        .await?
        .ok_or(ApiError::SessionNotFound)?;

    // Re-select against current card state; cards reviewed since the
    // session started no longer appear.
    let cards = select_session_cards(&state, auth.user_id, session.deck_id).await?;

    Ok(Json(SessionResponse {
        id: session.id,
        status: session.status(),
        cards: cards.iter().map(|c| c.to_session_card()).collect(),
    }))
}

/// PUT /api/sessions/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(session_id): Path<Uuid>,
    Json(payload): Json<UpdateSessionStatusRequest>,
) -> Result<Json<UpdateSessionStatusResponse>> {
    let ended_at = payload.status.is_terminal().then(Utc::now);

    let session = state
        .db
        .update_session_status(auth.user_id, session_id, payload.status, ended_at)
        .await?
        .ok_or(ApiError::SessionNotFound)?;

    Ok(Json(UpdateSessionStatusResponse {
        id: session.id,
        status: session.status(),
        ended_at: session.ended_at,
    }))
}

/// POST /api/sessions/{id}/reviews
pub async fn submit_review(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(session_id): Path<Uuid>,
    Json(payload): Json<SubmitReviewRequest>,
) -> Result<Json<SubmitReviewResponse>> {
    let session = state
        .db
        .get_session(auth.user_id, session_id)
        .await?
        .ok_or(ApiError::SessionNotFound)?;

    // Optimistic write: recompute from fresh card state whenever another
    // review commits in between.
    for _ in 0..REVIEW_WRITE_ATTEMPTS {
        let card = state
            .db
            .get_flashcard(auth.user_id, payload.flashcard_id)
            .await?
            .ok_or(ApiError::FlashcardNotFound)?;

        let now = Utc::now();
        let outcome = compute_next_review(
            payload.rating,
            card.stability,
            card.difficulty,
            card.last_reviewed_at,
            now,
        )?;

        let event = DbReviewEvent {
            id: Uuid::new_v4(),
            user_id: auth.user_id,
            study_session_id: session.id,
            flashcard_id: card.id,
            rating: payload.rating as i32,
            stability: outcome.stability,
            difficulty: outcome.difficulty,
            retrievability: outcome.retrievability,
            next_due_at: outcome.next_due_at,
            reviewed_at: now,
        };

        if state.db.record_review(&event, card.version).await? {
            return Ok(Json(SubmitReviewResponse {
                review_event_id: event.id,
                next_due_at: event.next_due_at,
                stability: event.stability,
                difficulty: event.difficulty,
                retrievability: event.retrievability,
            }));
        }

        tracing::debug!(flashcard_id = %card.id, "review write lost a version race, retrying");
    }

    Err(ApiError::Internal(format!(
        "review write for flashcard {} kept conflicting after {} attempts",
        payload.flashcard_id, REVIEW_WRITE_ATTEMPTS
    )))
}

/// GET /api/sessions/{id}/summary
pub async fn summary(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionSummaryResponse>> {
    let session = state
        .db
        .get_session(auth.user_id, session_id)
        .await?
        .ok_or(ApiError::SessionNotFound)?;

    let events = state.db.get_session_reviews(auth.user_id, session.id).await?;

    Ok(Json(SessionSummaryResponse::from_events(&events)))
}
