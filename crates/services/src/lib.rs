#![forbid(unsafe_code)]

pub mod error;
pub mod sessions;

pub use drill_core::Clock;
pub use sessions as session;

pub use error::SessionError;

pub use sessions::{
    BlockPicker, Completion, CompletionKind, DefinitionCard, DefinitionRef, DrillLoopService,
    PickOutcome, RandomPicker, RevealOutcome, SessionEngine, SessionPlanner, SessionProgress,
    SessionView, SlotView, SubmitOutcome,
};
