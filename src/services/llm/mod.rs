pub mod client;

pub use client::{LlmSettings, OllamaClient};
