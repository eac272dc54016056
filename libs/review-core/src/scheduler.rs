//! Scheduling engine.
//!
//! Simplified memory model using stability (days a memory is expected to
//! hold) and difficulty (intrinsic card hardness, 1-10). Each rating
//! applies a fixed multiplier; the next interval is derived from the
//! stability the card had *before* the review.

use chrono::{DateTime, Duration, Utc};

use crate::error::{Result, ScheduleError};
use crate::types::Rating;

/// Stability floor after any update.
const MIN_STABILITY: f64 = 0.1;
/// Difficulty bounds after any update.
const MIN_DIFFICULTY: f64 = 1.0;
const MAX_DIFFICULTY: f64 = 10.0;
/// Defaults substituted for a card that has never been scheduled.
const DEFAULT_STABILITY: f64 = 1.0;
const DEFAULT_DIFFICULTY: f64 = 5.0;

/// Result of scheduling a card after review.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewOutcome {
    pub stability: f64,
    pub difficulty: f64,
    pub retrievability: f64,
    pub next_due_at: DateTime<Utc>,
}

/// Calculate updated memory parameters and the next due date for a review.
///
/// `stability` and `difficulty` are `None` only for a card never scheduled
/// before; defaults of 1.0 and 5.0 are substituted. `last_reviewed_at` is
/// part of the contract for algorithms that weigh elapsed time, but does
/// not enter this computation.
pub fn compute_next_review(
    rating: u8,
    stability: Option<f64>,
    difficulty: Option<f64>,
    _last_reviewed_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<ReviewOutcome> {
    let rating = Rating::from_value(rating).ok_or(ScheduleError::InvalidRating(rating))?;

    let s = stability.unwrap_or(DEFAULT_STABILITY);
    let d = difficulty.unwrap_or(DEFAULT_DIFFICULTY);

    // Interval comes from the pre-review stability. For Good and Easy it
    // therefore equals the new stability; that equality is part of the
    // model, not an accident.
    let (new_stability, new_difficulty, interval_days, retrievability) = match rating {
        Rating::Again => (s * 0.5, (d + 1.0).min(MAX_DIFFICULTY), 0.1, 0.3),
        Rating::Hard => (s * 0.85, (d + 0.5).min(MAX_DIFFICULTY), s * 1.2, 0.7),
        Rating::Good => (s * 2.5, (d - 0.3).max(MIN_DIFFICULTY), s * 2.5, 0.9),
        Rating::Easy => (s * 4.0, (d - 0.5).max(MIN_DIFFICULTY), s * 4.0, 0.9),
    };

    // Partial intervals round up, so even a lapse gets a full day of
    // separation before the card is due again.
    let next_due_at = now + Duration::days(interval_days.ceil() as i64);

    Ok(ReviewOutcome {
        stability: new_stability.max(MIN_STABILITY),
        difficulty: new_difficulty,
        retrievability,
        next_due_at,
    })
}
