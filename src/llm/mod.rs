pub mod transport;

use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::LlmConfig;
use transport::{ReqwestTransport, Transport, TransportError, TransportResponse};

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

/// Either a completion or the provider's own error object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ChatResponse {
    Failure {
        error: ApiError,
    },
    Success {
        #[serde(default)]
        choices: Vec<Choice>,
    },
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Everything that can go wrong between a prompt and its completion.
///
/// The `Display` text is what ends up in the channel, so it stays short
/// and free of provider internals. Sources carry the detail for logs.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("Completion API key is not configured")]
    MissingApiKey,

    #[error("Failed to encode completion request")]
    Encode(#[source] serde_json::Error),

    #[error("Error contacting completion API")]
    Transport(#[source] TransportError),

    #[error("Failed to read completion response")]
    Read(#[source] TransportError),

    #[error("Completion API returned HTTP {status}")]
    Status { status: u16 },

    #[error("Completion API error: {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse completion response")]
    Parse(#[source] serde_json::Error),

    #[error("No response from completion model")]
    NoChoices,

    #[error("Completion response missing content")]
    MissingContent,
}

impl From<TransportError> for CompletionError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Body(_) => CompletionError::Read(err),
            _ => CompletionError::Transport(err),
        }
    }
}

impl CompletionError {
    /// Text sent back to the channel in place of a completion.
    pub fn reply_text(&self) -> String {
        format!("❌ {}", self)
    }
}

/// Turns a prompt into generated text with a single POST.
pub struct LlmClient {
    transport: Arc<dyn Transport>,
    config: LlmConfig,
}

impl LlmClient {
    pub fn new(config: LlmConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(config.timeout())?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn with_transport(config: LlmConfig, transport: Arc<dyn Transport>) -> Self {
        Self { transport, config }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Send `prompt` as a single user message and return the first
    /// choice's content verbatim.
    pub async fn complete(&self, prompt: &str) -> std::result::Result<String, CompletionError> {
        if self.config.api_key.is_empty() {
            return Err(CompletionError::MissingApiKey);
        }

        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };
        let body = serde_json::to_vec(&request).map_err(CompletionError::Encode)?;

        let url = self.config.completions_url();
        debug!("Sending completion request to {}", url);

        let response = self
            .transport
            .post_json(&url, &self.config.api_key, body)
            .await?;

        extract_content(response)
    }
}

fn extract_content(response: TransportResponse) -> std::result::Result<String, CompletionError> {
    let status = response.status;
    let parsed: ChatResponse = match serde_json::from_str(&response.body) {
        Ok(parsed) => parsed,
        Err(_) if !response.is_success() => return Err(CompletionError::Status { status }),
        Err(e) => return Err(CompletionError::Parse(e)),
    };

    match parsed {
        ChatResponse::Failure { error } => Err(CompletionError::Api {
            status,
            message: error.message,
        }),
        ChatResponse::Success { choices } => {
            let choice = choices
                .into_iter()
                .next()
                .ok_or(CompletionError::NoChoices)?;
            choice
                .message
                .and_then(|m| m.content)
                .ok_or(CompletionError::MissingContent)
        }
    }
}
