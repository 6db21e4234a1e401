//! Shared fixtures for the crate's unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;
use parley_core::{ChatMessage, MessageTransport, Prompt};

use crate::argument::{Argument, ArgumentDef};
use crate::awaiting::{AwaitingSet, Conversation};
use crate::registry::TypeRegistry;
use crate::types::{EntityDirectory, ValueContext, ValueType};
use crate::value::{ArgValue, EntityKind, EntityRef, Validation};

pub const CHANNEL: &str = "c1";
pub const USER: &str = "u1";

/// A command message from the test user.
pub fn trigger(content: &str) -> ChatMessage {
    ChatMessage::new(CHANNEL, USER, content)
}

pub fn registry() -> TypeRegistry {
    TypeRegistry::with_defaults()
}

pub fn argument(def: ArgumentDef) -> Argument {
    Argument::new(def, &registry()).unwrap()
}

pub fn argument_with(def: ArgumentDef, directory: Arc<StaticDirectory>) -> Argument {
    let registry = registry();
    registry.register_entity_types(directory).unwrap();
    Argument::new(def, &registry).unwrap()
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// Replays canned replies; once the script runs dry every wait times out.
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<String>>,
    sent: Mutex<Vec<Prompt>>,
    awaiting: AwaitingSet,
    /// Whether the test user was marked awaiting at each `await_reply`.
    awaiting_seen: Mutex<Vec<bool>>,
}

impl ScriptedTransport {
    pub fn sent(&self) -> Vec<Prompt> {
        self.sent.lock().unwrap().clone()
    }

    pub fn awaiting_seen(&self) -> Vec<bool> {
        self.awaiting_seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageTransport for ScriptedTransport {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn send_prompt(&self, channel_id: &str, prompt: &Prompt) -> Result<ChatMessage> {
        self.sent.lock().unwrap().push(prompt.clone());
        Ok(ChatMessage::new(channel_id, "bot", prompt.render()))
    }

    async fn await_reply(
        &self,
        channel_id: &str,
        user_id: &str,
        _timeout: Option<Duration>,
    ) -> Result<Option<ChatMessage>> {
        self.awaiting_seen
            .lock()
            .unwrap()
            .push(self.awaiting.is_awaiting(user_id, channel_id));
        let next = self.replies.lock().unwrap().pop_front();
        Ok(next.map(|content| ChatMessage::new(channel_id, user_id, content)))
    }
}

/// A conversation whose transport answers with `replies`, in order.
pub fn scripted(replies: &[&str]) -> (Conversation, Arc<ScriptedTransport>) {
    let awaiting = AwaitingSet::new();
    let transport = Arc::new(ScriptedTransport {
        replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
        sent: Mutex::new(Vec::new()),
        awaiting: awaiting.clone(),
        awaiting_seen: Mutex::new(Vec::new()),
    });
    let conv = Conversation::with_awaiting(transport.clone(), awaiting);
    (conv, transport)
}

// ---------------------------------------------------------------------------
// Entity directory
// ---------------------------------------------------------------------------

pub struct StaticDirectory {
    entities: Vec<EntityRef>,
    pub lookups: AtomicUsize,
    offline: bool,
}

impl StaticDirectory {
    pub fn new(entities: Vec<EntityRef>) -> Self {
        Self { entities, lookups: AtomicUsize::new(0), offline: false }
    }

    /// A directory whose every lookup fails.
    pub fn offline() -> Self {
        Self { entities: Vec::new(), lookups: AtomicUsize::new(0), offline: true }
    }

    fn hit(&self) -> Result<()> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.offline {
            bail!("directory offline");
        }
        Ok(())
    }
}

#[async_trait]
impl EntityDirectory for StaticDirectory {
    async fn by_id(
        &self,
        kind: EntityKind,
        id: &str,
        _message: &ChatMessage,
    ) -> Result<Option<EntityRef>> {
        self.hit()?;
        Ok(self.entities.iter().find(|e| e.kind == kind && e.id == id).cloned())
    }

    async fn search(
        &self,
        kind: EntityKind,
        query: &str,
        _message: &ChatMessage,
    ) -> Result<Vec<EntityRef>> {
        self.hit()?;
        Ok(self
            .entities
            .iter()
            .filter(|e| e.kind == kind && e.name.to_lowercase().contains(query))
            .cloned()
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Value types with fixed answers
// ---------------------------------------------------------------------------

enum Verdict {
    Accept(String),
    Reject(String),
    Silent,
}

/// A value type that gives the same verdict for every input.
pub struct FixedType {
    id: String,
    verdict: Verdict,
}

impl FixedType {
    /// Accepts everything and parses to `Text(parsed)`.
    pub fn accepting(id: &str, parsed: &str) -> Self {
        Self { id: id.into(), verdict: Verdict::Accept(parsed.into()) }
    }

    pub fn rejecting(id: &str, reason: &str) -> Self {
        Self { id: id.into(), verdict: Verdict::Reject(reason.into()) }
    }

    /// Rejects everything without a reason.
    pub fn silent(id: &str) -> Self {
        Self { id: id.into(), verdict: Verdict::Silent }
    }
}

#[async_trait]
impl ValueType for FixedType {
    fn id(&self) -> &str {
        &self.id
    }

    async fn validate(&self, _raw: &str, _ctx: &ValueContext<'_>) -> Result<Validation> {
        Ok(match &self.verdict {
            Verdict::Accept(_) => Validation::valid(),
            Verdict::Reject(reason) => Validation::reject(reason.clone()),
            Verdict::Silent => Validation::invalid(),
        })
    }

    async fn parse(
        &self,
        _raw: &str,
        _ctx: &ValueContext<'_>,
        _resolved: Option<ArgValue>,
    ) -> Result<ArgValue> {
        match &self.verdict {
            Verdict::Accept(parsed) => Ok(ArgValue::Text(parsed.clone())),
            _ => bail!("{} never parses", self.id),
        }
    }
}
