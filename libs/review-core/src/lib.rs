//! Core review-scheduling library shared by the backend service.
//!
//! Provides:
//! - Scheduling engine computing updated memory parameters after a review
//! - Card selector ranking and filtering cards into the due set
//! - Shared types (Rating, ReviewOutcome)

pub mod error;
pub mod scheduler;
pub mod selector;
pub mod types;

pub use error::{Result, ScheduleError};
pub use scheduler::{compute_next_review, ReviewOutcome};
pub use selector::{select_due, DueCard, DEFAULT_SESSION_LIMIT};
pub use types::Rating;
