use std::future::Future;
use std::time::Duration;
use thiserror::Error;

use super::history::ChatMessage;

/// Every way a call to the model can fail.
///
/// All variants except `Malformed` mean the model is unreachable this cycle.
/// `Malformed` is a server that answered but not with a chat reply.
#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("inference server returned status {0}")]
    Status(u16),

    #[error("no reply within {0:?}")]
    Timeout(Duration),

    #[error("reply body is not a chat response: {0}")]
    Malformed(String),
}

impl InferenceError {
    pub fn is_unreachable(&self) -> bool {
        !matches!(self, InferenceError::Malformed(_))
    }
}

/// The remote model the director consults.
pub trait InferenceBackend: Send + Sync + 'static {
    /// Sends the whole conversation (system message first) and returns the
    /// assistant's reply text.
    fn chat(
        &self,
        messages: &[ChatMessage],
    ) -> impl Future<Output = Result<String, InferenceError>> + Send;
}
