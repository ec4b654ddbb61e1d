use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::director::{ChatMessage, InferenceBackend, InferenceError};

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "llama3.2:3b";

#[derive(Debug, Clone, PartialEq)]
pub struct LlmSettings {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    /// Network-level bound on one request.
    pub timeout: Duration,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.9,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Client for Ollama's `/api/chat` endpoint.
#[derive(Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
    options: ChatOptions,
}

#[derive(Serialize)]
struct ChatOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: String,
}

impl OllamaClient {
    pub fn new(settings: LlmSettings) -> Self {
        Self {
            client: Client::builder()
                .timeout(settings.timeout)
                .build()
                .unwrap_or_default(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model,
            temperature: settings.temperature,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }
}

fn transport(err: reqwest::Error) -> InferenceError {
    if err.is_timeout() {
        InferenceError::Transport(format!("timed out: {}", err))
    } else {
        InferenceError::Transport(err.to_string())
    }
}

impl InferenceBackend for OllamaClient {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String, InferenceError> {
        let body = ChatRequest {
            model: &self.model,
            messages,
            stream: false, // one-shot reply
            options: ChatOptions { temperature: self.temperature },
        };

        let response = self
            .client
            .post(self.endpoint())
            .json(&body)
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            return Err(InferenceError::Status(response.status().as_u16()));
        }

        let reply: ChatResponse = response
            .json()
            .await
            .map_err(|e| {
                if e.is_decode() {
                    InferenceError::Malformed(e.to_string())
                } else {
                    transport(e)
                }
            })?;
        Ok(reply.message.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = OllamaClient::new(LlmSettings {
            base_url: "http://table.local:11434/".to_string(),
            ..LlmSettings::default()
        });
        assert_eq!(client.base_url(), "http://table.local:11434");
        assert_eq!(client.endpoint(), "http://table.local:11434/api/chat");
    }

    #[test]
    fn test_request_body_shape() {
        let messages = vec![ChatMessage::system("rules"), ChatMessage::user("hi")];
        let body = ChatRequest {
            model: "llama3.2:3b",
            messages: &messages,
            stream: false,
            options: ChatOptions { temperature: 0.5 },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "llama3.2:3b");
        assert_eq!(json["stream"], false);
        assert_eq!(json["options"]["temperature"], 0.5);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hi");
    }

    #[test]
    fn test_reply_envelope() {
        let raw = r#"{"model":"m","message":{"role":"assistant","content":"{\"pattern\":\"rain\"}"},"done":true}"#;
        let reply: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(reply.message.content, r#"{"pattern":"rain"}"#);
    }
}
