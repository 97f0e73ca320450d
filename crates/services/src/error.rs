//! Shared error types for the services crate.

use thiserror::Error;

use drill_core::model::BlockId;
use drill_core::scheduler::SchedulerError;

/// Errors emitted by session services.
///
/// Learner mistakes (empty input, unknown word, repeated word) are not errors;
/// they come back as `SubmitOutcome` variants.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no active session")]
    NoActiveSession,
    #[error("block {0} does not exist")]
    UnknownBlock(BlockId),
    #[error("slot {slot} is out of range (block has {len} targets)")]
    SlotOutOfRange { slot: usize, len: usize },
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
}
