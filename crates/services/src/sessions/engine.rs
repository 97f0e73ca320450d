use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use drill_core::model::{
    AnagramList, BlockId, BlockProgress, Boundary, HintKind, HintMode, SequenceIndex, Target,
    WordRow, WordStore,
};
use drill_core::normalize::normalize_word;
use storage::ProgressStore;

use super::progress::SessionProgress;
use super::view::{BoundaryView, SessionView, SlotView};
use crate::error::SessionError;

//
// ─── OUTCOMES ──────────────────────────────────────────────────────────────────
//

/// How a finished session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CompletionKind {
    /// Every word found without any aid; the block is now validated.
    ValidatedClean,
    /// Every word found, but some aid was used; the block stays unvalidated.
    CompletedWithAid,
}

/// Signal emitted once, when the tenth slot is found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Completion {
    pub kind: CompletionKind,
    /// This completion validated the last unvalidated block.
    pub all_complete: bool,
}

/// Result of submitting a word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Nothing left after normalization.
    EmptyInput,
    /// The word is not one of the block's targets.
    NotInBlock,
    /// Every slot holding this word is already found.
    AlreadyFound,
    /// At least one slot was found by this submission.
    Accepted {
        /// Slots newly found by this submission.
        slots: Vec<usize>,
        /// The word fills more than one slot of the block.
        duplicate: bool,
        completion: Option<Completion>,
    },
}

/// Result of revealing every remaining word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealOutcome {
    pub revealed: Vec<usize>,
    pub completion: Option<Completion>,
}

/// What a definition is requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionRef {
    /// One of the ten targets. Counts as an aid.
    Slot(usize),
    /// One of the two reference rows around the targets. Free.
    Boundary(Boundary),
}

/// Definition and anagrams of a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionCard {
    /// Display form, withheld while the target is still hidden.
    pub title: Option<String>,
    pub definition: Option<String>,
    pub anagrams: AnagramList,
}

//
// ─── ENGINE ────────────────────────────────────────────────────────────────────
//

/// State of the block currently being drilled.
///
/// Each slot goes from hidden to found and never back. Any aid (hint,
/// definition of a target, reveal) taints the run: completing a tainted run
/// does not validate the block.
pub struct SessionEngine {
    block_id: BlockId,
    total_blocks: usize,
    words: Arc<WordStore>,
    start: WordRow,
    end: WordRow,
    targets: Vec<Target>,
    found: BTreeSet<usize>,
    hints: Vec<HintMode>,
    aid_used: bool,
    completion: Option<Completion>,
}

impl SessionEngine {
    /// Start a fresh session on `block_id`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownBlock` if the index has no such block or
    /// the store is missing its rows.
    pub fn init_session(
        block_id: BlockId,
        index: &SequenceIndex,
        words: Arc<WordStore>,
    ) -> Result<Self, SessionError> {
        let unknown = || SessionError::UnknownBlock(block_id);
        let targets = index.targets(block_id, &words).ok_or_else(unknown)?;
        let start = index
            .boundary(block_id, Boundary::Start, &words)
            .cloned()
            .ok_or_else(unknown)?;
        let end = index
            .boundary(block_id, Boundary::End, &words)
            .cloned()
            .ok_or_else(unknown)?;

        Ok(Self {
            block_id,
            total_blocks: index.total(),
            words,
            start,
            end,
            hints: vec![HintMode::None; targets.len()],
            targets,
            found: BTreeSet::new(),
            aid_used: false,
            completion: None,
        })
    }

    #[must_use]
    pub fn block_id(&self) -> BlockId {
        self.block_id
    }

    #[must_use]
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    #[must_use]
    pub fn boundary(&self, side: Boundary) -> &WordRow {
        match side {
            Boundary::Start => &self.start,
            Boundary::End => &self.end,
        }
    }

    #[must_use]
    pub fn is_found(&self, slot: usize) -> bool {
        self.found.contains(&slot)
    }

    #[must_use]
    pub fn hint_mode(&self, slot: usize) -> Option<HintMode> {
        self.hints.get(slot).copied()
    }

    #[must_use]
    pub fn found_count(&self) -> usize {
        self.found.len()
    }

    /// Whether any aid has been used during this session.
    #[must_use]
    pub fn aid_used(&self) -> bool {
        self.aid_used
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.found.len() == self.targets.len()
    }

    #[must_use]
    pub fn completion(&self) -> Option<Completion> {
        self.completion
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            total: self.targets.len(),
            found: self.found.len(),
            remaining: self.targets.len() - self.found.len(),
            is_complete: self.is_complete(),
        }
    }

    /// Match a learner's word against the targets.
    ///
    /// Every slot holding the word is found at once, so a word listed twice in
    /// the block fills both slots.
    pub fn submit_word(&mut self, raw: &str, store: &mut ProgressStore) -> SubmitOutcome {
        let word = normalize_word(raw);
        if word.is_empty() {
            return SubmitOutcome::EmptyInput;
        }

        let matched: Vec<usize> = self
            .targets
            .iter()
            .enumerate()
            .filter(|(_, target)| target.normalized == word)
            .map(|(slot, _)| slot)
            .collect();
        if matched.is_empty() {
            return SubmitOutcome::NotInBlock;
        }

        let slots: Vec<usize> = matched
            .iter()
            .copied()
            .filter(|slot| self.reveal_slot(*slot))
            .collect();
        if slots.is_empty() {
            return SubmitOutcome::AlreadyFound;
        }

        let completion = self.evaluate_completion(store);
        SubmitOutcome::Accepted {
            slots,
            duplicate: matched.len() > 1,
            completion,
        }
    }

    /// Show, switch, or hide a hint on a hidden slot.
    ///
    /// Asking taints the session even when the request hides the hint again or
    /// targets a slot that is already found. Returns the hint text now shown.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::SlotOutOfRange` for an invalid slot.
    pub fn request_hint(
        &mut self,
        slot: usize,
        kind: HintKind,
        store: &mut ProgressStore,
    ) -> Result<Option<String>, SessionError> {
        self.check_slot(slot)?;
        self.mark_aid(store);
        if self.is_found(slot) {
            return Ok(None);
        }

        let mode = self.hints[slot].toggled(kind);
        self.hints[slot] = mode;
        Ok(mode.render(&self.targets[slot]))
    }

    /// Look up a definition.
    ///
    /// Target lookups taint the session; boundary lookups do not.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::SlotOutOfRange` for an invalid slot.
    pub fn request_definition(
        &mut self,
        reference: DefinitionRef,
        store: &mut ProgressStore,
    ) -> Result<DefinitionCard, SessionError> {
        match reference {
            DefinitionRef::Slot(slot) => {
                self.check_slot(slot)?;
                self.mark_aid(store);
                Ok(self.slot_card(slot))
            }
            DefinitionRef::Boundary(side) => {
                let row = self.boundary(side);
                Ok(DefinitionCard {
                    title: Some(row.display.clone()),
                    definition: row.definition.clone(),
                    anagrams: self.words.anagrams_of(&row.canonical),
                })
            }
        }
    }

    /// Definition of a word the learner already found. Never taints.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::SlotOutOfRange` for an invalid slot.
    pub fn review_found(&self, slot: usize) -> Result<Option<DefinitionCard>, SessionError> {
        self.check_slot(slot)?;
        Ok(self.is_found(slot).then(|| self.slot_card(slot)))
    }

    /// Reveal every hidden word. Always taints, so completion is never clean.
    pub fn reveal_all(&mut self, store: &mut ProgressStore) -> RevealOutcome {
        self.mark_aid(store);
        let revealed: Vec<usize> = (0..self.targets.len())
            .filter(|slot| self.reveal_slot(*slot))
            .collect();
        let completion = self.evaluate_completion(store);
        RevealOutcome {
            revealed,
            completion,
        }
    }

    /// Render-facing snapshot of the session.
    #[must_use]
    pub fn view(&self) -> SessionView {
        let slots = self
            .targets
            .iter()
            .enumerate()
            .map(|(slot, target)| {
                let found = self.is_found(slot);
                SlotView {
                    slot,
                    found,
                    display: found.then(|| target.display.clone()),
                    hint: self.hints[slot].render(target),
                }
            })
            .collect();

        SessionView {
            block_id: self.block_id,
            start: BoundaryView::from_row(&self.start),
            end: BoundaryView::from_row(&self.end),
            slots,
            progress: self.progress(),
            aid_used: self.aid_used,
            completion: self.completion,
        }
    }

    fn slot_card(&self, slot: usize) -> DefinitionCard {
        let target = &self.targets[slot];
        DefinitionCard {
            title: self.is_found(slot).then(|| target.display.clone()),
            definition: target.definition.clone(),
            anagrams: self.words.anagrams_of(&target.canonical),
        }
    }

    fn check_slot(&self, slot: usize) -> Result<(), SessionError> {
        if slot < self.targets.len() {
            Ok(())
        } else {
            Err(SessionError::SlotOutOfRange {
                slot,
                len: self.targets.len(),
            })
        }
    }

    /// Mark `slot` found; false if it already was.
    fn reveal_slot(&mut self, slot: usize) -> bool {
        if !self.found.insert(slot) {
            return false;
        }
        self.hints[slot] = HintMode::None;
        true
    }

    /// Taint the run. The first aid is persisted right away so that quitting
    /// after peeking cannot pass for a clean run. On a finished session only
    /// the in-memory flag changes; the stored outcome stays as it was.
    fn mark_aid(&mut self, store: &mut ProgressStore) {
        if self.aid_used {
            return;
        }
        self.aid_used = true;
        if self.is_complete() {
            return;
        }
        store.upsert(self.block_id, BlockProgress::mark_aided);
        tracing::debug!(block = %self.block_id, "aid used, run no longer clean");
    }

    fn evaluate_completion(&mut self, store: &mut ProgressStore) -> Option<Completion> {
        if !self.is_complete() || self.completion.is_some() {
            return None;
        }

        let clean = !self.aid_used;
        store.upsert(self.block_id, |progress| progress.mark_completed(clean));
        let completion = Completion {
            kind: if clean {
                CompletionKind::ValidatedClean
            } else {
                CompletionKind::CompletedWithAid
            },
            all_complete: clean && store.all_validated(self.total_blocks),
        };
        tracing::info!(block = %self.block_id, kind = ?completion.kind, "block completed");
        self.completion = Some(completion);
        Some(completion)
    }
}

impl fmt::Debug for SessionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionEngine")
            .field("block_id", &self.block_id)
            .field("targets_len", &self.targets.len())
            .field("found", &self.found)
            .field("aid_used", &self.aid_used)
            .field("completion", &self.completion)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
