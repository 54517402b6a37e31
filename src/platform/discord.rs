use std::sync::Arc;

use anyhow::{Context as _, Result};
use async_trait::async_trait;
use serenity::http::Http;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::model::id::ChannelId;
use serenity::prelude::{Client, Context, EventHandler, GatewayIntents};
use tracing::{info, warn};

use crate::bot::Listener;
use crate::config::DiscordConfig;
use crate::platform::{IncomingMessage, ReplySink};

impl From<&Message> for IncomingMessage {
    fn from(msg: &Message) -> Self {
        Self {
            user_id: msg.author.id.get(),
            user_name: msg.author.name.clone(),
            author_is_bot: msg.author.bot,
            channel_id: msg.channel_id.get(),
            text: msg.content.clone(),
        }
    }
}

/// Sends replies through the Discord REST API.
pub struct DiscordReplies {
    http: Arc<Http>,
}

impl DiscordReplies {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl ReplySink for DiscordReplies {
    async fn send_text(&self, channel_id: u64, text: &str) -> Result<()> {
        if channel_id == 0 {
            anyhow::bail!("Invalid channel id 0");
        }
        ChannelId::new(channel_id)
            .say(&self.http, text)
            .await
            .with_context(|| format!("Failed to send message to channel {}", channel_id))?;
        Ok(())
    }
}

/// Serenity event handler wired to the command listener.
pub struct DiscordHandler {
    listener: Arc<Listener>,
}

#[async_trait]
impl EventHandler for DiscordHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(
            "Connected to Discord as {}. Bot is now running, press CTRL+C to exit.",
            ready.user.name
        );
    }

    async fn message(&self, ctx: Context, msg: Message) {
        let incoming = IncomingMessage::from(&msg);
        let replies = DiscordReplies::new(Arc::clone(&ctx.http));
        self.listener.handle_message(&incoming, &replies).await;
    }
}

/// Intents needed to read message text in guild channels.
pub fn intents() -> GatewayIntents {
    GatewayIntents::GUILD_MESSAGES | GatewayIntents::MESSAGE_CONTENT
}

/// Connect to the gateway and dispatch messages until shutdown.
pub async fn run(config: &DiscordConfig, listener: Arc<Listener>) -> Result<()> {
    info!("Starting Discord platform...");

    let mut client = Client::builder(&config.bot_token, intents())
        .event_handler(DiscordHandler { listener })
        .await
        .context("Failed to create Discord client")?;

    // In-flight completions are not cancelled; only the shards are closed.
    let shard_manager = Arc::clone(&client.shard_manager);
    tokio::spawn(async move {
        wait_for_shutdown_signal().await;
        info!("Shutting down...");
        shard_manager.shutdown_all().await;
    });

    client
        .start()
        .await
        .context("Discord client stopped with an error")?;

    Ok(())
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = terminate.recv() => {}
                }
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
