//! Ollama chat backend (`POST /api/chat`).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use para_core::errors::ClassifierError;

use crate::backend::{CompletionRequest, GenerativeBackend};

pub struct OllamaBackend {
    client: reqwest::Client,
    base_url: String,
    model: String,
    name: String,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatOptions {
    temperature: f64,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    stream: bool,
    format: &'a str,
    options: ChatOptions,
}

#[derive(Deserialize)]
struct ChatReply {
    message: ChatReplyMessage,
}

#[derive(Deserialize)]
struct ChatReplyMessage {
    #[serde(default)]
    content: String,
}

impl OllamaBackend {
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            name: format!("ollama:{model}"),
        }
    }

    fn transport(&self, reason: impl Into<String>) -> ClassifierError {
        ClassifierError::Transport {
            backend: self.name.clone(),
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl GenerativeBackend for OllamaBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, ClassifierError> {
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
            stream: false,
            // Ollama's JSON mode; always on, the strict flag tightens the prompt instead.
            format: "json",
            options: ChatOptions {
                temperature: request.temperature,
            },
        };

        let url = format!("{}/api/chat", self.base_url);
        debug!(backend = %self.name, strict = request.strict, "sending chat request");
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(self.transport(format!("HTTP {status}: {text}")));
        }

        let reply: ChatReply = response
            .json()
            .await
            .map_err(|e| self.transport(format!("unreadable chat envelope: {e}")))?;
        Ok(reply.message.content)
    }
}
