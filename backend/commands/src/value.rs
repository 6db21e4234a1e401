//! Values flowing through resolution: raw user input, validation outcomes,
//! and final typed argument values.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Raw input
// ---------------------------------------------------------------------------

/// What the caller supplied for an argument before any prompting.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RawInput {
    #[default]
    Missing,
    Single(String),
    /// Pre-split values, used to seed infinite arguments.
    List(Vec<String>),
}

impl From<&str> for RawInput {
    fn from(value: &str) -> Self {
        RawInput::Single(value.to_string())
    }
}

impl From<String> for RawInput {
    fn from(value: String) -> Self {
        RawInput::Single(value)
    }
}

impl From<Vec<String>> for RawInput {
    fn from(values: Vec<String>) -> Self {
        RawInput::List(values)
    }
}

// ---------------------------------------------------------------------------
// Platform entities
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    User,
    Channel,
    Role,
}

impl EntityKind {
    /// Registry id of the value type resolving this kind.
    pub fn type_id(self) -> &'static str {
        match self {
            EntityKind::User => "user",
            EntityKind::Channel => "channel",
            EntityKind::Role => "role",
        }
    }

    pub fn plural(self) -> &'static str {
        match self {
            EntityKind::User => "users",
            EntityKind::Channel => "channels",
            EntityKind::Role => "roles",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_id())
    }
}

/// A resolved platform entity (user, channel, role).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    pub kind: EntityKind,
    pub id: String,
    pub name: String,
}

impl EntityRef {
    pub fn new(kind: EntityKind, id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { kind, id: id.into(), name: name.into() }
    }
}

// ---------------------------------------------------------------------------
// Typed values
// ---------------------------------------------------------------------------

/// A fully parsed argument value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Duration(Duration),
    Entity(EntityRef),
    List(Vec<ArgValue>),
}

impl ArgValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ArgValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ArgValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ArgValue::Float(n) => Some(*n),
            ArgValue::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_duration(&self) -> Option<Duration> {
        match self {
            ArgValue::Duration(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_entity(&self) -> Option<&EntityRef> {
        match self {
            ArgValue::Entity(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ArgValue]> {
        match self {
            ArgValue::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<bool> for ArgValue {
    fn from(value: bool) -> Self {
        ArgValue::Bool(value)
    }
}

impl From<i64> for ArgValue {
    fn from(value: i64) -> Self {
        ArgValue::Integer(value)
    }
}

impl From<f64> for ArgValue {
    fn from(value: f64) -> Self {
        ArgValue::Float(value)
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        ArgValue::Text(value.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        ArgValue::Text(value)
    }
}

impl From<Duration> for ArgValue {
    fn from(value: Duration) -> Self {
        ArgValue::Duration(value)
    }
}

impl From<EntityRef> for ArgValue {
    fn from(value: EntityRef) -> Self {
        ArgValue::Entity(value)
    }
}

impl From<Vec<ArgValue>> for ArgValue {
    fn from(values: Vec<ArgValue>) -> Self {
        ArgValue::List(values)
    }
}

// ---------------------------------------------------------------------------
// Validation outcome
// ---------------------------------------------------------------------------

/// Outcome of validating one raw value.
///
/// `Valid` may carry whatever a lookup-backed type already resolved while
/// validating, so `parse` does not have to look it up again.
#[derive(Debug, Clone, PartialEq)]
pub enum Validation {
    Valid(Option<ArgValue>),
    /// Rejected, with an optional user-facing reason.
    Invalid(Option<String>),
}

impl Validation {
    pub fn valid() -> Self {
        Validation::Valid(None)
    }

    pub fn resolved(value: impl Into<ArgValue>) -> Self {
        Validation::Valid(Some(value.into()))
    }

    pub fn invalid() -> Self {
        Validation::Invalid(None)
    }

    pub fn reject(reason: impl Into<String>) -> Self {
        Validation::Invalid(Some(reason.into()))
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid(_))
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Validation::Invalid(Some(reason)) => Some(reason),
            _ => None,
        }
    }

    /// The value resolved during validation, if any.
    pub fn into_resolved(self) -> Option<ArgValue> {
        match self {
            Validation::Valid(resolved) => resolved,
            Validation::Invalid(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untagged_values_deserialize_by_shape() {
        let v: ArgValue = serde_json::from_str("true").unwrap();
        assert_eq!(v, ArgValue::Bool(true));
        let v: ArgValue = serde_json::from_str("42").unwrap();
        assert_eq!(v, ArgValue::Integer(42));
        let v: ArgValue = serde_json::from_str("2.5").unwrap();
        assert_eq!(v, ArgValue::Float(2.5));
        let v: ArgValue = serde_json::from_str(r#"["a", 1]"#).unwrap();
        assert_eq!(v, ArgValue::List(vec!["a".into(), 1i64.into()]));
    }

    #[test]
    fn entity_serializes_with_kind() {
        let v = ArgValue::from(EntityRef::new(EntityKind::Role, "9", "mods"));
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["kind"], "role");
        assert_eq!(json["id"], "9");
    }

    #[test]
    fn validation_accessors() {
        assert!(Validation::valid().is_valid());
        assert_eq!(Validation::reject("nope").reason(), Some("nope"));
        assert_eq!(Validation::invalid().reason(), None);
        assert_eq!(Validation::resolved(3i64).into_resolved(), Some(ArgValue::Integer(3)));
        assert_eq!(Validation::reject("x").into_resolved(), None);
    }
}
