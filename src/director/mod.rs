//! The creative director: a background agent that keeps choosing what the
//! table should express, by asking a model or, when the model is away, by
//! cycling a curated show.

pub mod agent;
pub mod backend;
pub mod directive;
pub mod fallback;
pub mod history;
pub mod parse;
pub mod prompt;

pub use agent::{
    speaking_duration, CreativeDirector, CycleOutcome, DirectorConfig, DirectorHandle,
    DirectorSnapshot, DirectorStats, LinkState,
};
pub use backend::{InferenceBackend, InferenceError};
pub use directive::Directive;
pub use fallback::FallbackSequence;
pub use history::{ChatMessage, ConversationHistory, Role};
pub use parse::{parse_directive, ParseError};
pub use prompt::Prompt;
