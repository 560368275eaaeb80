#![forbid(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod sessions;

pub use catalog::{CatalogService, SeedCategory};
pub use error::{CatalogError, SessionError};

pub use sessions::{
    ActiveQuestion, CancelToken, PlaybackBuilder, PlaybackPlan, QuizService, QuizSession,
    RevealCause, RevealEvent, Selection, SessionControls, SkipHandle,
};
