use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use crate::message::ChatMessage;
use crate::prompt::Prompt;

/// The two operations argument resolution needs from a chat platform.
#[async_trait]
pub trait MessageTransport: Send + Sync {
    /// Human-readable transport name for logging.
    fn name(&self) -> &str;

    /// Deliver a prompt to a channel and return the sent message.
    async fn send_prompt(&self, channel_id: &str, prompt: &Prompt) -> Result<ChatMessage>;

    /// Wait for the next message from `user_id` in `channel_id`.
    ///
    /// Resolves to `Ok(None)` when `timeout` elapses first. A `None` timeout
    /// waits indefinitely.
    async fn await_reply(
        &self,
        channel_id: &str,
        user_id: &str,
        timeout: Option<Duration>,
    ) -> Result<Option<ChatMessage>>;
}
