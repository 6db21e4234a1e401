//! Value types: pluggable `validate` / `parse` / `is_empty` strategies, one
//! per kind of value an argument can hold.

mod boolean;
mod duration;
mod entity;
mod number;
mod string;
mod union;

pub use boolean::BooleanType;
pub use duration::{parse_duration, DurationType};
pub use entity::{EntityDirectory, EntityType};
pub use number::{FloatType, IntegerType};
pub use string::StringType;
pub use union::{UNION_SEPARATOR, UnionType};

use anyhow::Result;
use async_trait::async_trait;
use parley_core::ChatMessage;

use crate::argument::Argument;
use crate::value::{ArgValue, Validation};

/// Everything a value type may consult besides the raw text.
#[derive(Clone, Copy)]
pub struct ValueContext<'a> {
    /// The message that triggered the command.
    pub message: &'a ChatMessage,
    /// The argument being resolved.
    pub argument: &'a Argument,
    /// The reply currently being evaluated, if the value came from a prompt.
    pub reply: Option<&'a ChatMessage>,
}

/// Strategy for one semantic kind of value.
///
/// Implementations hold no per-call state: the same instance serves every
/// concurrent resolution. Anything `validate` looks up and `parse` needs is
/// handed over through [`Validation::Valid`].
#[async_trait]
pub trait ValueType: Send + Sync {
    /// Unique, lowercase registry id.
    fn id(&self) -> &str;

    /// Whether `raw` counts as "nothing supplied".
    fn is_empty(&self, raw: &str, _ctx: &ValueContext<'_>) -> bool {
        raw.trim().is_empty()
    }

    async fn validate(&self, raw: &str, ctx: &ValueContext<'_>) -> Result<Validation>;

    /// Convert an already-validated raw value. `resolved` is whatever
    /// `validate` carried forward.
    async fn parse(
        &self,
        raw: &str,
        ctx: &ValueContext<'_>,
        resolved: Option<ArgValue>,
    ) -> Result<ArgValue>;
}

/// Rejection text listing the allowed options.
pub(crate) fn one_of_message(options: &[String]) -> String {
    format!("Please enter one of the following options: {}", options.join(", "))
}
