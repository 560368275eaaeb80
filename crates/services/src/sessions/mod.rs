mod control;
mod plan;
mod service;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use control::{CancelToken, SessionControls, SkipHandle, SkipSignals, skip_channel};
pub use plan::{PlaybackBuilder, PlaybackPlan, Selection};
pub use service::{
    ActiveQuestion, DEFAULT_REVEAL_AFTER, QuestionState, QuizSession, RevealCause, RevealEvent,
};
pub use workflow::QuizService;
