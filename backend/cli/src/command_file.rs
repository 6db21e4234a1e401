//! YAML declaration of a command's arguments, for `parley resolve`.
//!
//! ```yaml
//! name: give
//! arguments:
//!   - key: who
//!     prompt: Who should get it?
//!     type: user
//!   - key: count
//!     prompt: How many?
//!     type: integer
//!     min: 1
//!     default: 1
//! entities:
//!   - { kind: user, id: "100", name: alice }
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use parley_commands::{ArgumentDef, EntityDirectory, EntityKind, EntityRef};
use parley_core::ChatMessage;
use serde::Deserialize;
use tokio::fs;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CommandFile {
    #[serde(default)]
    pub name: Option<String>,
    pub arguments: Vec<ArgumentDef>,
    /// Users, channels, and roles the entity types can resolve.
    #[serde(default)]
    pub entities: Vec<EntityRef>,
}

impl CommandFile {
    pub async fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read argument file: {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("Failed to parse argument file: {}", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("command")
    }

    /// Argument definitions, with `wait_secs` filled in where unset.
    pub fn definitions(&self, wait_secs: u64) -> Vec<ArgumentDef> {
        self.arguments
            .iter()
            .cloned()
            .map(|def| match def.wait {
                Some(_) => def,
                None => def.wait(wait_secs),
            })
            .collect()
    }
}

/// Entity lookups over the entities listed in a [`CommandFile`].
pub struct ListedEntities {
    entities: Vec<EntityRef>,
}

impl ListedEntities {
    pub fn new(entities: Vec<EntityRef>) -> Self {
        Self { entities }
    }
}

#[async_trait]
impl EntityDirectory for ListedEntities {
    async fn by_id(
        &self,
        kind: EntityKind,
        id: &str,
        _message: &ChatMessage,
    ) -> Result<Option<EntityRef>> {
        Ok(self.entities.iter().find(|e| e.kind == kind && e.id == id).cloned())
    }

    async fn search(
        &self,
        kind: EntityKind,
        query: &str,
        _message: &ChatMessage,
    ) -> Result<Vec<EntityRef>> {
        Ok(self
            .entities
            .iter()
            .filter(|e| e.kind == kind && e.name.to_lowercase().contains(query))
            .cloned()
            .collect())
    }
}
