//! Card selector.
//!
//! Ranks a candidate set and keeps the cards that are currently due.
//! Never-reviewed cards always outrank previously-reviewed ones; among the
//! reviewed, the most overdue card comes first.

use chrono::{DateTime, Utc};

/// Default number of cards admitted into a study session.
pub const DEFAULT_SESSION_LIMIT: usize = 20;

/// Scheduling view of a card, as seen by the selector.
pub trait DueCard {
    fn next_due_at(&self) -> Option<DateTime<Utc>>;
    fn last_reviewed_at(&self) -> Option<DateTime<Utc>>;
}

/// Rank and filter `cards` into the due subset, at most `limit` entries.
///
/// Priority order:
/// 1. never-reviewed cards, in input order
/// 2. reviewed cards, ascending by due date; a reviewed card without a due
///    date ranks last in this group
///
/// After ordering, a card survives only if its due date is unset or has
/// passed. An empty input or a zero limit yields an empty result.
pub fn select_due<C: DueCard>(cards: Vec<C>, limit: usize, now: DateTime<Utc>) -> Vec<C> {
    let (never_reviewed, mut reviewed): (Vec<C>, Vec<C>) = cards
        .into_iter()
        .partition(|c| c.last_reviewed_at().is_none());

    reviewed.sort_by_key(|c| (c.next_due_at().is_none(), c.next_due_at()));

    never_reviewed
        .into_iter()
        .chain(reviewed)
        .filter(|c| c.next_due_at().map_or(true, |due| due <= now))
        .take(limit)
        .collect()
}
