use tracing::{debug, error, info, warn};

use crate::command::CommandRequest;
use crate::llm::LlmClient;
use crate::platform::{IncomingMessage, ReplySink};

/// Turns command messages into completions and posts the answer back.
/// Holds nothing mutable, so one instance serves every event.
pub struct Listener {
    llm: LlmClient,
}

impl Listener {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }

    /// Handle one message-created event.
    ///
    /// Sends exactly one reply for a recognized command, whether the
    /// completion succeeded or not, and nothing for anything else.
    pub async fn handle_message(&self, msg: &IncomingMessage, replies: &dyn ReplySink) {
        if msg.author_is_bot {
            return;
        }

        let request = match CommandRequest::parse(&msg.text) {
            Some(request) => request,
            None => return,
        };

        info!(
            "{} from {} ({}) in channel {}",
            request.command, msg.user_name, msg.user_id, msg.channel_id
        );

        let reply = match self.llm.complete(&request.prompt()).await {
            Ok(text) => {
                debug!("Completion returned {} chars", text.len());
                text
            }
            Err(e) => {
                error!(error = ?e, "Completion failed: {}", e);
                e.reply_text()
            }
        };

        if let Err(e) = replies.send_text(msg.channel_id, &reply).await {
            warn!("Failed to deliver reply: {:#}", e);
        }
    }
}
