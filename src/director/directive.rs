use serde::{Deserialize, Serialize};

use crate::patterns::{Params, PatternKind};

/// Placeholder mood when the model leaves it out.
pub const NO_MOOD: &str = "—";

/// The creative decision in force: what to draw, with which parameters,
/// how it feels, and what to say about it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Directive {
    pub pattern: PatternKind,
    #[serde(default)]
    pub params: Params,
    #[serde(default = "default_mood")]
    pub mood: String,
    #[serde(default)]
    pub text: String,
}

fn default_mood() -> String {
    NO_MOOD.to_string()
}

impl Directive {
    pub fn new(pattern: PatternKind, params: Params, mood: impl Into<String>) -> Self {
        Self {
            pattern,
            params,
            mood: mood.into(),
            text: String::new(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }
}
