use chrono::NaiveDate;
use thiserror::Error;

use crate::model::{BlockId, BlockProgress, ProgressBook, SequenceIndex};
use crate::time::days_between;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("cooldown must be at least one day, got {provided}")]
    InvalidCooldown { provided: i64 },
}

/// Days a presented but unvalidated block stays out of rotation.
pub const COOLDOWN_DAYS: i64 = 3;

//
// ─── AVAILABILITY ──────────────────────────────────────────────────────────────
//

/// What the scheduler can offer on a given day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    /// Every block is validated; nothing will ever be offered again.
    AllComplete,
    /// Every remaining block is cooling down; try again on a later day.
    NoneAvailable,
    /// Blocks that may be presented today, in ascending id order.
    Eligible(Vec<BlockId>),
}

//
// ─── SCHEDULER ─────────────────────────────────────────────────────────────────
//

/// Fixed-threshold spaced-repetition gate over blocks.
///
/// A block is offered when it is not validated and either has never been
/// presented, or was last presented at least `cooldown_days` calendar days ago.
/// Unvalidated blocks keep resurfacing indefinitely.
///
/// # Examples
///
/// ```
/// # use drill_core::scheduler::Scheduler;
/// # use drill_core::model::BlockProgress;
/// # use chrono::NaiveDate;
/// let scheduler = Scheduler::new();
/// let seen_on = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let mut progress = BlockProgress::default();
/// progress.mark_presented(seen_on);
///
/// let too_soon = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
/// let later = NaiveDate::from_ymd_opt(2024, 1, 4).unwrap();
/// assert!(!scheduler.is_eligible(Some(&progress), too_soon));
/// assert!(scheduler.is_eligible(Some(&progress), later));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scheduler {
    cooldown_days: i64,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    /// Scheduler with the standard three-day cooldown.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cooldown_days: COOLDOWN_DAYS,
        }
    }

    /// Scheduler with a custom cooldown.
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::InvalidCooldown` if `cooldown_days < 1`.
    pub fn try_with_cooldown(cooldown_days: i64) -> Result<Self, SchedulerError> {
        if cooldown_days < 1 {
            return Err(SchedulerError::InvalidCooldown {
                provided: cooldown_days,
            });
        }
        Ok(Self { cooldown_days })
    }

    #[must_use]
    pub fn cooldown_days(&self) -> i64 {
        self.cooldown_days
    }

    /// Whether a block with this record may be presented on `today`.
    #[must_use]
    pub fn is_eligible(&self, progress: Option<&BlockProgress>, today: NaiveDate) -> bool {
        let Some(progress) = progress else {
            return true;
        };
        if progress.validated {
            return false;
        }
        if !progress.seen {
            return true;
        }
        match progress.last_seen {
            None => true,
            Some(last) => days_between(last, today) >= self.cooldown_days,
        }
    }

    /// Blocks that may be presented on `today`.
    #[must_use]
    pub fn eligible_blocks(
        &self,
        index: &SequenceIndex,
        book: &ProgressBook,
        today: NaiveDate,
    ) -> Vec<BlockId> {
        index
            .ids()
            .filter(|id| self.is_eligible(book.get(*id), today))
            .collect()
    }

    /// Classify the day: finished, waiting, or a non-empty eligible set.
    #[must_use]
    pub fn availability(
        &self,
        index: &SequenceIndex,
        book: &ProgressBook,
        today: NaiveDate,
    ) -> Availability {
        if book.all_validated(index.total()) {
            return Availability::AllComplete;
        }
        let eligible = self.eligible_blocks(index, book, today);
        if eligible.is_empty() {
            Availability::NoneAvailable
        } else {
            Availability::Eligible(eligible)
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BLOCK_LEN;
    use crate::time::parse_date;

    fn day(raw: &str) -> NaiveDate {
        parse_date(raw).unwrap()
    }

    fn index(blocks: usize) -> SequenceIndex {
        SequenceIndex::new(blocks * BLOCK_LEN)
    }

    fn seen_on(raw: &str) -> BlockProgress {
        let mut progress = BlockProgress::default();
        progress.mark_presented(day(raw));
        progress
    }

    #[test]
    fn fresh_blocks_are_all_eligible() {
        let ids = Scheduler::new().eligible_blocks(&index(4), &ProgressBook::new(), day("2024-01-01"));
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn validated_blocks_are_excluded() {
        let mut book = ProgressBook::new();
        book.entry(BlockId::new(2)).validated = true;

        let ids = Scheduler::new().eligible_blocks(&index(5), &book, day("2024-01-01"));
        let ids: Vec<u32> = ids.iter().map(BlockId::value).collect();
        assert_eq!(ids, vec![0, 1, 3, 4]);
    }

    #[test]
    fn validated_wins_over_unseen_flag() {
        let mut progress = BlockProgress::default();
        progress.validated = true;
        assert!(!Scheduler::new().is_eligible(Some(&progress), day("2030-01-01")));
    }

    #[test]
    fn unseen_record_is_eligible_regardless_of_date() {
        let mut progress = seen_on("2024-01-01");
        progress.seen = false;
        assert!(Scheduler::new().is_eligible(Some(&progress), day("2024-01-01")));
    }

    #[test]
    fn seen_without_date_is_eligible() {
        let mut progress = BlockProgress::default();
        progress.seen = true;
        assert!(Scheduler::new().is_eligible(Some(&progress), day("2024-01-01")));
    }

    #[test]
    fn cooldown_uses_three_calendar_days() {
        let scheduler = Scheduler::new();
        let progress = seen_on("2024-01-01");

        assert!(!scheduler.is_eligible(Some(&progress), day("2024-01-01")));
        assert!(!scheduler.is_eligible(Some(&progress), day("2024-01-03")));
        assert!(scheduler.is_eligible(Some(&progress), day("2024-01-04")));
        assert!(scheduler.is_eligible(Some(&progress), day("2025-06-30")));
    }

    #[test]
    fn future_last_seen_is_suppressed() {
        let progress = seen_on("2024-02-01");
        assert!(!Scheduler::new().is_eligible(Some(&progress), day("2024-01-15")));
    }

    #[test]
    fn availability_distinguishes_waiting_from_done() {
        let scheduler = Scheduler::new();
        let index = index(2);
        let today = day("2024-01-02");

        let mut book = ProgressBook::new();
        book.entry(BlockId::new(0)).validated = true;
        book.insert(BlockId::new(1), seen_on("2024-01-01"));
        assert_eq!(scheduler.availability(&index, &book, today), Availability::NoneAvailable);

        book.entry(BlockId::new(1)).validated = true;
        assert_eq!(scheduler.availability(&index, &book, today), Availability::AllComplete);
    }

    #[test]
    fn availability_lists_eligible_blocks() {
        let mut book = ProgressBook::new();
        book.insert(BlockId::new(0), seen_on("2024-01-01"));

        let availability = Scheduler::new().availability(&index(2), &book, day("2024-01-02"));
        assert_eq!(availability, Availability::Eligible(vec![BlockId::new(1)]));
    }

    #[test]
    fn custom_cooldown_is_validated() {
        assert_eq!(
            Scheduler::try_with_cooldown(0),
            Err(SchedulerError::InvalidCooldown { provided: 0 })
        );
        let scheduler = Scheduler::try_with_cooldown(1).unwrap();
        assert!(scheduler.is_eligible(Some(&seen_on("2024-01-01")), day("2024-01-02")));
    }
}
