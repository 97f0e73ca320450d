use std::fmt;
use std::sync::Arc;

use drill_core::model::{BlockId, HintKind, ProgressStats, SequenceIndex, WordStore};
use drill_core::scheduler::Scheduler;
use storage::ProgressStore;

use super::engine::{DefinitionCard, DefinitionRef, RevealOutcome, SessionEngine, SubmitOutcome};
use super::plan::{BlockPicker, PickOutcome, RandomPicker, SessionPlanner};
use super::view::SessionView;
use crate::Clock;
use crate::error::SessionError;

/// Orchestrates the drill loop: picking a block, running its session, and
/// keeping progress persisted along the way.
///
/// At most one session is active. A successful start replaces the previous
/// session, finished or not.
pub struct DrillLoopService {
    clock: Clock,
    words: Arc<WordStore>,
    index: SequenceIndex,
    planner: SessionPlanner,
    picker: Box<dyn BlockPicker>,
    store: ProgressStore,
    current: Option<SessionEngine>,
}

impl DrillLoopService {
    #[must_use]
    pub fn new(clock: Clock, words: Arc<WordStore>, store: ProgressStore) -> Self {
        Self {
            clock,
            index: SequenceIndex::for_store(&words),
            words,
            planner: SessionPlanner::default(),
            picker: Box::new(RandomPicker::thread_local()),
            store,
            current: None,
        }
    }

    #[must_use]
    pub fn with_picker(mut self, picker: Box<dyn BlockPicker>) -> Self {
        self.picker = picker;
        self
    }

    /// Use a custom cooldown between presentations of an unvalidated block.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Scheduler` if `days < 1`.
    pub fn with_cooldown(mut self, days: i64) -> Result<Self, SessionError> {
        self.planner = SessionPlanner::new(Scheduler::try_with_cooldown(days)?);
        Ok(self)
    }

    #[must_use]
    pub fn cooldown_days(&self) -> i64 {
        self.planner.scheduler().cooldown_days()
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Move a fixed clock forward. No effect on the system clock.
    pub fn advance_days(&mut self, days: u64) {
        self.clock.advance_days(days);
    }

    #[must_use]
    pub fn index(&self) -> &SequenceIndex {
        &self.index
    }

    #[must_use]
    pub fn store(&self) -> &ProgressStore {
        &self.store
    }

    #[must_use]
    pub fn current(&self) -> Option<&SessionEngine> {
        self.current.as_ref()
    }

    /// Blocks that could be picked today.
    #[must_use]
    pub fn eligible_blocks(&self) -> Vec<BlockId> {
        self.planner
            .eligible_blocks(&self.index, &self.store, self.clock.today())
    }

    /// Pick a block and start a session on it.
    ///
    /// The current session is replaced only when a block is picked; otherwise
    /// it stays as it was and the outcome says why nothing started.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownBlock` if the picked block cannot be
    /// built from the word list.
    pub fn start_session(&mut self) -> Result<PickOutcome, SessionError> {
        let today = self.clock.today();
        let outcome =
            self.planner
                .pick_session(&self.index, &mut self.store, today, self.picker.as_mut());

        if let PickOutcome::Started(block_id) = outcome {
            let engine = SessionEngine::init_session(block_id, &self.index, Arc::clone(&self.words))?;
            self.current = Some(engine);
        }
        tracing::info!(outcome = ?outcome, %today, "session start requested");
        Ok(outcome)
    }

    /// # Errors
    ///
    /// Returns `SessionError::NoActiveSession` when no session is running.
    pub fn submit_word(&mut self, raw: &str) -> Result<SubmitOutcome, SessionError> {
        let engine = self.current.as_mut().ok_or(SessionError::NoActiveSession)?;
        Ok(engine.submit_word(raw, &mut self.store))
    }

    /// # Errors
    ///
    /// Returns `SessionError::NoActiveSession` when no session is running, or
    /// `SessionError::SlotOutOfRange` for an invalid slot.
    pub fn request_hint(
        &mut self,
        slot: usize,
        kind: HintKind,
    ) -> Result<Option<String>, SessionError> {
        let engine = self.current.as_mut().ok_or(SessionError::NoActiveSession)?;
        engine.request_hint(slot, kind, &mut self.store)
    }

    /// # Errors
    ///
    /// Returns `SessionError::NoActiveSession` when no session is running, or
    /// `SessionError::SlotOutOfRange` for an invalid slot.
    pub fn request_definition(
        &mut self,
        reference: DefinitionRef,
    ) -> Result<DefinitionCard, SessionError> {
        let engine = self.current.as_mut().ok_or(SessionError::NoActiveSession)?;
        engine.request_definition(reference, &mut self.store)
    }

    /// # Errors
    ///
    /// Returns `SessionError::NoActiveSession` when no session is running, or
    /// `SessionError::SlotOutOfRange` for an invalid slot.
    pub fn review_found(&self, slot: usize) -> Result<Option<DefinitionCard>, SessionError> {
        self.current
            .as_ref()
            .ok_or(SessionError::NoActiveSession)?
            .review_found(slot)
    }

    /// # Errors
    ///
    /// Returns `SessionError::NoActiveSession` when no session is running.
    pub fn reveal_all(&mut self) -> Result<RevealOutcome, SessionError> {
        let engine = self.current.as_mut().ok_or(SessionError::NoActiveSession)?;
        Ok(engine.reveal_all(&mut self.store))
    }

    #[must_use]
    pub fn view(&self) -> Option<SessionView> {
        self.current.as_ref().map(SessionEngine::view)
    }

    /// Seen/validated counters over the whole word list.
    #[must_use]
    pub fn stats(&self) -> ProgressStats {
        self.store.stats(self.index.total())
    }
}

impl fmt::Debug for DrillLoopService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DrillLoopService")
            .field("clock", &self.clock)
            .field("blocks", &self.index.total())
            .field("store", &self.store)
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drill_core::model::{BLOCK_LEN, WordRow};
    use drill_core::scheduler::SchedulerError;
    use drill_core::time::fixed_clock;
    use storage::InMemoryRepository;

    fn service(blocks: usize) -> DrillLoopService {
        let rows = (0..blocks * BLOCK_LEN)
            .map(|i| WordRow::bare(format!("MOT{i}")))
            .collect();
        let store = ProgressStore::load(Arc::new(InMemoryRepository::new()));
        DrillLoopService::new(fixed_clock(), Arc::new(WordStore::from_rows(rows)), store)
    }

    #[test]
    fn actions_need_an_active_session() {
        let mut service = service(1);

        assert!(matches!(
            service.submit_word("MOT1"),
            Err(SessionError::NoActiveSession)
        ));
        assert!(matches!(
            service.request_hint(0, HintKind::Length),
            Err(SessionError::NoActiveSession)
        ));
        assert!(matches!(service.reveal_all(), Err(SessionError::NoActiveSession)));
        assert!(service.view().is_none());
    }

    #[test]
    fn empty_word_list_is_all_complete() {
        let mut service = service(0);
        assert_eq!(service.start_session().unwrap(), PickOutcome::AllComplete);
        assert!(service.current().is_none());
    }

    #[test]
    fn start_session_presents_a_block() {
        let mut service = service(2);

        let PickOutcome::Started(block_id) = service.start_session().unwrap() else {
            panic!("a block should be available");
        };
        assert_eq!(service.current().map(SessionEngine::block_id), Some(block_id));
        assert!(service.store().get(block_id).unwrap().seen);
        assert_eq!(service.stats().seen, 1);
        assert_eq!(service.stats().seen_percent(), 50);
    }

    #[test]
    fn nothing_to_pick_keeps_the_running_session() {
        let mut service = service(1);
        assert_eq!(service.start_session().unwrap(), PickOutcome::Started(BlockId::new(0)));
        service.submit_word("mot1").unwrap();

        assert_eq!(service.start_session().unwrap(), PickOutcome::NoneAvailable);
        let current = service.current().unwrap();
        assert_eq!(current.block_id(), BlockId::new(0));
        assert_eq!(current.found_count(), 1);
        assert_eq!(service.view().unwrap().progress.found, 1);
        assert!(matches!(
            service.submit_word("mot1").unwrap(),
            SubmitOutcome::AlreadyFound
        ));
    }

    #[test]
    fn custom_cooldown_is_validated_and_applied() {
        assert!(matches!(
            service(1).with_cooldown(0),
            Err(SessionError::Scheduler(SchedulerError::InvalidCooldown { provided: 0 }))
        ));

        let mut service = service(1).with_cooldown(1).unwrap();
        assert_eq!(service.cooldown_days(), 1);
        service.start_session().unwrap();
        assert_eq!(service.start_session().unwrap(), PickOutcome::NoneAvailable);
        service.advance_days(1);
        assert_eq!(service.start_session().unwrap(), PickOutcome::Started(BlockId::new(0)));
    }
}
