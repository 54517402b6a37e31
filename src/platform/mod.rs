pub mod discord;

use anyhow::Result;
use async_trait::async_trait;

/// A message received from the chat platform
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    /// Platform-specific user ID
    pub user_id: u64,
    /// Display name of the user
    pub user_name: String,
    /// Set for bot and webhook authors, including ourselves
    pub author_is_bot: bool,
    /// Channel the message arrived in; replies go back here
    pub channel_id: u64,
    /// The message text
    pub text: String,
}

/// Outbound side of the platform: post plain text into a channel.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReplySink: Send + Sync {
    async fn send_text(&self, channel_id: u64, text: &str) -> Result<()>;
}
