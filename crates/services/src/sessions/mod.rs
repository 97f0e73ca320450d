mod engine;
mod plan;
mod progress;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use engine::{
    Completion, CompletionKind, DefinitionCard, DefinitionRef, RevealOutcome, SessionEngine,
    SubmitOutcome,
};
pub use plan::{BlockPicker, PickOutcome, RandomPicker, SessionPlanner};
pub use progress::SessionProgress;
pub use view::{BoundaryView, SessionView, SlotView};
pub use workflow::DrillLoopService;
