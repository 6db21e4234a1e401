use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use parley_core::{ChatMessage, ParleyError};
use regex::Regex;
use tracing::debug;

use super::{ValueContext, ValueType};
use crate::value::{ArgValue, EntityKind, EntityRef, Validation};

/// Longest disambiguation list shown to the user.
const MAX_DISAMBIGUATION: usize = 15;

static USER_MENTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:<@!?)?(\d+)>?$").expect("user mention pattern"));
static CHANNEL_MENTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:<#)?(\d+)>?$").expect("channel mention pattern"));
static ROLE_MENTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:<@&)?(\d+)>?$").expect("role mention pattern"));

/// Platform lookups backing the entity value types.
#[async_trait]
pub trait EntityDirectory: Send + Sync {
    /// Fetch one entity by id, scoped to wherever `message` was sent.
    async fn by_id(
        &self,
        kind: EntityKind,
        id: &str,
        message: &ChatMessage,
    ) -> Result<Option<EntityRef>>;

    /// Entities whose name contains `query` (already lowercased).
    async fn search(
        &self,
        kind: EntityKind,
        query: &str,
        message: &ChatMessage,
    ) -> Result<Vec<EntityRef>>;
}

/// Users, channels, or roles, resolved through an [`EntityDirectory`].
///
/// Accepts a mention, a bare id, or a name fragment.
pub struct EntityType {
    kind: EntityKind,
    directory: Arc<dyn EntityDirectory>,
}

impl EntityType {
    pub fn new(kind: EntityKind, directory: Arc<dyn EntityDirectory>) -> Self {
        Self { kind, directory }
    }

    fn mention_id(&self, raw: &str) -> Option<String> {
        let pattern = match self.kind {
            EntityKind::User => &*USER_MENTION,
            EntityKind::Channel => &*CHANNEL_MENTION,
            EntityKind::Role => &*ROLE_MENTION,
        };
        pattern.captures(raw.trim()).map(|cap| cap[1].to_string())
    }

    async fn resolve(&self, raw: &str, message: &ChatMessage) -> Result<Validation> {
        if let Some(id) = self.mention_id(raw) {
            debug!(kind = %self.kind, id = %id, "Looking up entity by id");
            return Ok(match self.directory.by_id(self.kind, &id, message).await? {
                Some(entity) => Validation::resolved(entity),
                None => Validation::invalid(),
            });
        }

        let query = raw.trim().to_lowercase();
        let found = self.directory.search(self.kind, &query, message).await?;
        debug!(kind = %self.kind, query = %query, matches = found.len(), "Searched entities");

        match found.len() {
            0 => Ok(Validation::invalid()),
            1 => Ok(found.into_iter().next().map_or_else(Validation::invalid, Validation::resolved)),
            _ => {
                let mut exact: Vec<_> =
                    found.iter().filter(|e| e.name.to_lowercase() == query).cloned().collect();
                if exact.len() == 1 {
                    return Ok(exact.pop().map_or_else(Validation::invalid, Validation::resolved));
                }
                Ok(Validation::reject(self.disambiguation(&found)))
            }
        }
    }

    fn disambiguation(&self, found: &[EntityRef]) -> String {
        let names: Vec<_> =
            found.iter().take(MAX_DISAMBIGUATION).map(|e| format!("\"{}\"", e.name)).collect();
        format!(
            "Multiple {} found. Please be more specific: {}",
            self.kind.plural(),
            names.join(", ")
        )
    }
}

#[async_trait]
impl ValueType for EntityType {
    fn id(&self) -> &str {
        self.kind.type_id()
    }

    async fn validate(&self, raw: &str, ctx: &ValueContext<'_>) -> Result<Validation> {
        self.resolve(raw, ctx.message).await
    }

    async fn parse(
        &self,
        raw: &str,
        ctx: &ValueContext<'_>,
        resolved: Option<ArgValue>,
    ) -> Result<ArgValue> {
        if let Some(value @ ArgValue::Entity(_)) = resolved {
            return Ok(value);
        }
        match self.resolve(raw, ctx.message).await?.into_resolved() {
            Some(value) => Ok(value),
            None => Err(ParleyError::Lookup {
                kind: self.kind.to_string(),
                message: format!("\"{raw}\" no longer resolves"),
            }
            .into()),
        }
    }
}
