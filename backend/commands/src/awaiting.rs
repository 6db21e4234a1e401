//! Conversations currently answering a prompt.
//!
//! While a command is collecting arguments, the invoking user's next message
//! in that channel is an answer, not a new command. Dispatchers check
//! [`AwaitingSet::is_awaiting`] before parsing a message as a command.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use parley_core::{conversation_key, MessageTransport};
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct AwaitingSet {
    keys: Arc<Mutex<HashSet<String>>>,
}

impl AwaitingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `(user_id, channel_id)` as awaiting input until the returned
    /// guard is dropped.
    pub fn mark(&self, user_id: &str, channel_id: &str) -> AwaitingGuard {
        let key = conversation_key(user_id, channel_id);
        debug!(key = %key, "Conversation awaiting input");
        self.lock().insert(key.clone());
        AwaitingGuard { set: self.clone(), key }
    }

    pub fn is_awaiting(&self, user_id: &str, channel_id: &str) -> bool {
        self.lock().contains(&conversation_key(user_id, channel_id))
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashSet<String>> {
        self.keys.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Removes its key from the [`AwaitingSet`] when dropped, on every exit path.
#[must_use = "the conversation stops awaiting input as soon as the guard is dropped"]
pub struct AwaitingGuard {
    set: AwaitingSet,
    key: String,
}

impl Drop for AwaitingGuard {
    fn drop(&mut self) {
        self.set.lock().remove(&self.key);
        debug!(key = %self.key, "Conversation released");
    }
}

/// Process-wide handles every resolution needs: where prompts go, and the
/// shared awaiting set. Holds no per-invocation state.
#[derive(Clone)]
pub struct Conversation {
    pub transport: Arc<dyn MessageTransport>,
    pub awaiting: AwaitingSet,
}

impl Conversation {
    pub fn new(transport: Arc<dyn MessageTransport>) -> Self {
        Self { transport, awaiting: AwaitingSet::new() }
    }

    pub fn with_awaiting(transport: Arc<dyn MessageTransport>, awaiting: AwaitingSet) -> Self {
        Self { transport, awaiting }
    }
}
