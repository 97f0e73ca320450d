use chrono::NaiveDate;
use rand::Rng;
use rand::rngs::ThreadRng;
use rand::seq::IndexedRandom;

use drill_core::model::{BlockId, SequenceIndex};
use drill_core::scheduler::{Availability, Scheduler};
use storage::ProgressStore;

/// Chooses one block among the eligible ones.
pub trait BlockPicker {
    /// Pick from `eligible`; `None` only when `eligible` is empty.
    fn pick(&mut self, eligible: &[BlockId]) -> Option<BlockId>;
}

/// Uniform random choice backed by any `rand` generator.
#[derive(Debug, Clone)]
pub struct RandomPicker<R> {
    rng: R,
}

impl RandomPicker<ThreadRng> {
    /// Picker driven by the thread-local generator.
    #[must_use]
    pub fn thread_local() -> Self {
        Self { rng: rand::rng() }
    }
}

impl<R: Rng> RandomPicker<R> {
    #[must_use]
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> BlockPicker for RandomPicker<R> {
    fn pick(&mut self, eligible: &[BlockId]) -> Option<BlockId> {
        eligible.choose(&mut self.rng).copied()
    }
}

/// Outcome of asking for a new session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickOutcome {
    /// A block was chosen and marked as presented today.
    Started(BlockId),
    /// Every remaining block is on cooldown.
    NoneAvailable,
    /// Every block is validated; no session will ever start again.
    AllComplete,
}

/// Picks the block for the next session and records its presentation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionPlanner {
    scheduler: Scheduler,
}

impl SessionPlanner {
    #[must_use]
    pub fn new(scheduler: Scheduler) -> Self {
        Self { scheduler }
    }

    #[must_use]
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Blocks that may be presented on `today`.
    #[must_use]
    pub fn eligible_blocks(
        &self,
        index: &SequenceIndex,
        store: &ProgressStore,
        today: NaiveDate,
    ) -> Vec<BlockId> {
        self.scheduler.eligible_blocks(index, store.book(), today)
    }

    /// Choose a block for today.
    ///
    /// The chosen block is marked seen with `lastSeen = today` immediately, so
    /// "seen" tracks presentation rather than completion.
    pub fn pick_session(
        &self,
        index: &SequenceIndex,
        store: &mut ProgressStore,
        today: NaiveDate,
        picker: &mut dyn BlockPicker,
    ) -> PickOutcome {
        let eligible = match self.scheduler.availability(index, store.book(), today) {
            Availability::AllComplete => return PickOutcome::AllComplete,
            Availability::NoneAvailable => return PickOutcome::NoneAvailable,
            Availability::Eligible(eligible) => eligible,
        };

        let Some(block_id) = picker.pick(&eligible) else {
            return PickOutcome::NoneAvailable;
        };

        store.upsert(block_id, |progress| progress.mark_presented(today));
        tracing::debug!(block = %block_id, eligible = eligible.len(), "picked block");
        PickOutcome::Started(block_id)
    }
}
