use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A chat message as seen by the argument resolver: either the message that
/// triggered a command, a prompt the bot sent, or a user's reply to one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub channel_id: String,
    pub author_id: String,
    pub content: String,
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(
        channel_id: impl Into<String>,
        author_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            channel_id: channel_id.into(),
            author_id: author_id.into(),
            content: content.into(),
            sent_at: Utc::now(),
        }
    }

    /// A follow-up message from the same author in the same channel.
    pub fn reply_to(&self, content: impl Into<String>) -> Self {
        Self::new(self.channel_id.clone(), self.author_id.clone(), content)
    }

    /// Composite key identifying the (author, channel) pair.
    pub fn conversation_key(&self) -> String {
        conversation_key(&self.author_id, &self.channel_id)
    }
}

/// Build the `user:channel` key used to track conversations awaiting input.
pub fn conversation_key(user_id: &str, channel_id: &str) -> String {
    format!("{user_id}:{channel_id}")
}
