//! Argument definitions and the single-value resolution loop.
//!
//! An [`Argument`] is built once per command and shared by every invocation.
//! All per-invocation state (current value, prompts, answers) lives in the
//! locals of [`Argument::obtain`].

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use futures::future::BoxFuture;
use parley_core::{ChatMessage, ParleyError, PromptTone};
use serde::{Deserialize, Deserializer};
use tracing::{debug, info};

use crate::awaiting::Conversation;
use crate::error::ArgumentConfigError;
use crate::prompting::{self, is_keyword, PromptMode, CANCEL_KEYWORD};
use crate::registry::TypeRegistry;
use crate::result::{ArgumentResult, CancelReason};
use crate::types::{ValueContext, ValueType, UNION_SEPARATOR};
use crate::value::{ArgValue, RawInput, Validation};

/// Seconds to wait for each reply unless the argument says otherwise.
pub const DEFAULT_WAIT_SECS: u64 = 30;

// ---------------------------------------------------------------------------
// Type selection
// ---------------------------------------------------------------------------

/// One type id, or several forming a union (`"a|b"` or `["a", "b"]`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TypeSpec {
    One(String),
    Union(Vec<String>),
}

impl TypeSpec {
    pub fn registry_id(&self) -> String {
        match self {
            TypeSpec::One(id) => id.clone(),
            TypeSpec::Union(ids) => ids.join(&UNION_SEPARATOR.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults and custom hooks
// ---------------------------------------------------------------------------

pub type DefaultFn =
    Arc<dyn Fn(&ChatMessage, &Argument) -> BoxFuture<'static, Result<ArgValue>> + Send + Sync>;

/// Value used when an optional argument is left empty.
#[derive(Clone)]
pub enum ArgDefault {
    Value(ArgValue),
    /// Computed from the triggering message when needed.
    Computed(DefaultFn),
}

impl fmt::Debug for ArgDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgDefault::Value(v) => f.debug_tuple("Value").field(v).finish(),
            ArgDefault::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl<'de> Deserialize<'de> for ArgDefault {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        ArgValue::deserialize(deserializer).map(ArgDefault::Value)
    }
}

/// Owned view of a value handed to custom hooks.
#[derive(Debug, Clone)]
pub struct CustomInput {
    pub raw: String,
    pub message: ChatMessage,
    pub reply: Option<ChatMessage>,
    /// What validation carried forward (parse hooks only).
    pub resolved: Option<ArgValue>,
}

impl CustomInput {
    fn new(
        raw: &str,
        message: &ChatMessage,
        reply: Option<&ChatMessage>,
        resolved: Option<ArgValue>,
    ) -> Self {
        Self {
            raw: raw.to_string(),
            message: message.clone(),
            reply: reply.cloned(),
            resolved,
        }
    }
}

pub type ValidateFn =
    Arc<dyn Fn(CustomInput) -> BoxFuture<'static, Result<Validation>> + Send + Sync>;
pub type ParseFn = Arc<dyn Fn(CustomInput) -> BoxFuture<'static, Result<ArgValue>> + Send + Sync>;
pub type IsEmptyFn = Arc<dyn Fn(&RawInput) -> bool + Send + Sync>;

/// Per-argument replacements for the type's methods.
#[derive(Clone, Default)]
pub struct ValueOverrides {
    pub validate: Option<ValidateFn>,
    pub parse: Option<ParseFn>,
    pub is_empty: Option<IsEmptyFn>,
}

impl fmt::Debug for ValueOverrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueOverrides")
            .field("validate", &self.validate.is_some())
            .field("parse", &self.parse.is_some())
            .field("is_empty", &self.is_empty.is_some())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Definition
// ---------------------------------------------------------------------------

/// Declaration of one command argument.
///
/// Build it in code with the chained setters, or deserialize it from YAML /
/// JSON (custom hooks and computed defaults are code-only).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ArgumentDef {
    pub key: String,
    #[serde(default)]
    pub label: Option<String>,
    pub prompt: String,
    /// Fixed rejection text replacing whatever the type reports.
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default, rename = "type")]
    pub type_spec: Option<TypeSpec>,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub default: Option<ArgDefault>,
    #[serde(default)]
    pub one_of: Option<Vec<String>>,
    #[serde(default)]
    pub required: Option<bool>,
    #[serde(default)]
    pub infinite: bool,
    /// Seconds to wait for each reply; `0` waits forever.
    #[serde(default)]
    pub wait: Option<u64>,
    #[serde(skip)]
    pub overrides: ValueOverrides,
}

impl ArgumentDef {
    pub fn new(key: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: None,
            prompt: prompt.into(),
            error: None,
            type_spec: None,
            min: None,
            max: None,
            default: None,
            one_of: None,
            required: None,
            infinite: false,
            wait: None,
            overrides: ValueOverrides::default(),
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn value_type(mut self, id: impl Into<String>) -> Self {
        self.type_spec = Some(TypeSpec::One(id.into()));
        self
    }

    /// Accept any of `ids`, tried in the given order.
    pub fn union<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.type_spec = Some(TypeSpec::Union(ids.into_iter().map(Into::into).collect()));
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn default_value(mut self, value: impl Into<ArgValue>) -> Self {
        self.default = Some(ArgDefault::Value(value.into()));
        self
    }

    pub fn default_with<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(&ChatMessage, &Argument) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ArgValue>> + Send + 'static,
    {
        self.default = Some(ArgDefault::Computed(Arc::new(
            move |message: &ChatMessage, argument: &Argument| -> BoxFuture<'static, Result<ArgValue>> {
                Box::pin(f(message, argument))
            },
        )));
        self
    }

    pub fn one_of<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.one_of = Some(options.into_iter().map(Into::into).collect());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn infinite(mut self) -> Self {
        self.infinite = true;
        self
    }

    pub fn wait(mut self, secs: u64) -> Self {
        self.wait = Some(secs);
        self
    }

    pub fn validate_with<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(CustomInput) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Validation>> + Send + 'static,
    {
        self.overrides.validate = Some(Arc::new(
            move |input: CustomInput| -> BoxFuture<'static, Result<Validation>> {
                Box::pin(f(input))
            },
        ));
        self
    }

    pub fn parse_with<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(CustomInput) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ArgValue>> + Send + 'static,
    {
        self.overrides.parse = Some(Arc::new(
            move |input: CustomInput| -> BoxFuture<'static, Result<ArgValue>> {
                Box::pin(f(input))
            },
        ));
        self
    }

    pub fn is_empty_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&RawInput) -> bool + Send + Sync + 'static,
    {
        self.overrides.is_empty = Some(Arc::new(f));
        self
    }
}

// ---------------------------------------------------------------------------
// Argument
// ---------------------------------------------------------------------------

/// A validated argument definition bound to its value type.
#[derive(Clone)]
pub struct Argument {
    key: String,
    label: String,
    prompt: String,
    error: Option<String>,
    value_type: Option<Arc<dyn ValueType>>,
    min: Option<f64>,
    max: Option<f64>,
    default: Option<ArgDefault>,
    one_of: Option<Vec<String>>,
    required: bool,
    infinite: bool,
    wait: Option<Duration>,
    overrides: ValueOverrides,
}

impl fmt::Debug for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Argument")
            .field("key", &self.key)
            .field("type", &self.value_type.as_ref().map(|t| t.id()))
            .field("required", &self.required)
            .field("infinite", &self.infinite)
            .field("default", &self.default)
            .finish_non_exhaustive()
    }
}

fn missing_strategy(key: &str) -> anyhow::Error {
    ParleyError::ContractViolation(format!("argument \"{key}\" has no validate/parse strategy"))
        .into()
}

/// Multi-line rejections (unions) are shown by their last line.
fn last_line(reason: &str) -> String {
    reason
        .lines()
        .filter(|line| !line.trim().is_empty())
        .last()
        .unwrap_or(reason)
        .to_string()
}

impl Argument {
    pub fn new(def: ArgumentDef, registry: &TypeRegistry) -> Result<Self, ArgumentConfigError> {
        let ArgumentDef {
            key,
            label,
            prompt,
            error,
            type_spec,
            min,
            max,
            default,
            one_of,
            required,
            infinite,
            wait,
            overrides,
        } = def;

        if key.trim().is_empty() {
            return Err(ArgumentConfigError::EmptyKey);
        }

        let value_type = match type_spec {
            Some(spec) => {
                let id = spec.registry_id();
                let well_formed = id
                    .split(UNION_SEPARATOR)
                    .all(|part| !part.is_empty() && part.to_lowercase() == part);
                if !well_formed {
                    return Err(ArgumentConfigError::InvalidTypeId(id));
                }
                let ty = registry.get(&id).ok_or_else(|| ArgumentConfigError::UnknownType {
                    key: key.clone(),
                    type_id: id.clone(),
                })?;
                Some(ty)
            }
            None if overrides.validate.is_some() && overrides.parse.is_some() => None,
            None => return Err(ArgumentConfigError::MissingType { key }),
        };

        let wait = match wait.unwrap_or(DEFAULT_WAIT_SECS) {
            0 | u64::MAX => None,
            secs => Some(Duration::from_secs(secs)),
        };

        Ok(Self {
            label: label.unwrap_or_else(|| key.clone()),
            required: required.unwrap_or(default.is_none()),
            key,
            prompt,
            error,
            value_type,
            min,
            max,
            default,
            one_of,
            infinite,
            wait,
            overrides,
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn min(&self) -> Option<f64> {
        self.min
    }

    pub fn max(&self) -> Option<f64> {
        self.max
    }

    pub fn one_of(&self) -> Option<&[String]> {
        self.one_of.as_deref()
    }

    pub fn default(&self) -> Option<&ArgDefault> {
        self.default.as_ref()
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_infinite(&self) -> bool {
        self.infinite
    }

    /// Reply timeout; `None` waits forever.
    pub fn wait(&self) -> Option<Duration> {
        self.wait
    }

    pub fn value_type(&self) -> Option<&Arc<dyn ValueType>> {
        self.value_type.as_ref()
    }

    fn context<'a>(
        &'a self,
        message: &'a ChatMessage,
        reply: Option<&'a ChatMessage>,
    ) -> ValueContext<'a> {
        ValueContext { message, argument: self, reply }
    }

    pub fn is_empty(
        &self,
        raw: &RawInput,
        message: &ChatMessage,
        reply: Option<&ChatMessage>,
    ) -> bool {
        if let Some(custom) = &self.overrides.is_empty {
            return custom(raw);
        }
        match raw {
            RawInput::Missing => true,
            RawInput::List(values) => values.is_empty(),
            RawInput::Single(value) => match &self.value_type {
                Some(ty) => ty.is_empty(value, &self.context(message, reply)),
                None => value.trim().is_empty(),
            },
        }
    }

    /// Validate with the custom hook or the type. Rejections are replaced by
    /// the argument's fixed `error` when one is set.
    pub async fn validate(
        &self,
        raw: &str,
        message: &ChatMessage,
        reply: Option<&ChatMessage>,
    ) -> Result<Validation> {
        let outcome = if let Some(custom) = &self.overrides.validate {
            custom(CustomInput::new(raw, message, reply, None)).await?
        } else if let Some(ty) = &self.value_type {
            ty.validate(raw, &self.context(message, reply)).await?
        } else {
            return Err(missing_strategy(&self.key));
        };

        Ok(match outcome {
            Validation::Invalid(reason) => {
                Validation::Invalid(self.error.clone().or_else(|| reason.map(|r| last_line(&r))))
            }
            valid => valid,
        })
    }

    pub async fn parse(
        &self,
        raw: &str,
        message: &ChatMessage,
        reply: Option<&ChatMessage>,
        resolved: Option<ArgValue>,
    ) -> Result<ArgValue> {
        if let Some(custom) = &self.overrides.parse {
            return custom(CustomInput::new(raw, message, reply, resolved)).await;
        }
        match &self.value_type {
            Some(ty) => ty.parse(raw, &self.context(message, reply), resolved).await,
            None => Err(missing_strategy(&self.key)),
        }
    }

    pub(crate) async fn resolve_default(&self, message: &ChatMessage) -> Result<Option<ArgValue>> {
        match &self.default {
            None => Ok(None),
            Some(ArgDefault::Value(value)) => Ok(Some(value.clone())),
            Some(ArgDefault::Computed(compute)) => compute(message, self)
                .await
                .with_context(|| format!("computing default for argument \"{}\"", self.key))
                .map(Some),
        }
    }

    /// Resolve this argument for one invocation, prompting `message`'s
    /// author until a valid value arrives or resolution is cancelled.
    pub async fn obtain(
        &self,
        conv: &Conversation,
        message: &ChatMessage,
        raw: RawInput,
        prompt_limit: Option<usize>,
    ) -> Result<ArgumentResult> {
        let mut empty = self.is_empty(&raw, message, None);
        if empty && !self.required {
            debug!(argument = %self.key, "No value supplied; using default");
            let value = self.resolve_default(message).await?;
            return Ok(ArgumentResult::resolved(value, Vec::new(), Vec::new()));
        }

        if self.infinite || matches!(raw, RawInput::List(_)) {
            let seed = match raw {
                RawInput::Missing => None,
                RawInput::Single(value) if value.trim().is_empty() => None,
                RawInput::Single(value) => Some(vec![value]),
                RawInput::List(values) => Some(values).filter(|v| !v.is_empty()),
            };
            return self.obtain_infinite(conv, message, seed, prompt_limit).await;
        }

        let mut current = match raw {
            RawInput::Single(value) => value,
            _ => String::new(),
        };
        let mut prompts = Vec::new();
        let mut answers: Vec<ChatMessage> = Vec::new();
        let mut valid = if empty {
            Validation::invalid()
        } else {
            self.validate(&current, message, None).await?
        };

        while !valid.is_valid() {
            if prompt_limit.is_some_and(|limit| prompts.len() >= limit) {
                info!(argument = %self.key, prompts = prompts.len(), "Prompt limit reached");
                return Ok(ArgumentResult::cancelled(CancelReason::PromptLimit, prompts, answers));
            }

            let prompt = if empty {
                let mut prompt = prompting::ask(self, PromptMode::Single);
                if !prompts.is_empty() {
                    prompt.tone = PromptTone::Retry;
                }
                prompt
            } else {
                prompting::reask(self, PromptMode::Single, &current, valid.reason())
            };
            let sent = conv
                .transport
                .send_prompt(&message.channel_id, &prompt)
                .await
                .with_context(|| format!("sending prompt for argument \"{}\"", self.key))?;
            prompts.push(sent);
            debug!(argument = %self.key, attempt = prompts.len(), "Prompt sent");

            let Some(reply) = conv
                .transport
                .await_reply(&message.channel_id, &message.author_id, self.wait)
                .await?
            else {
                info!(argument = %self.key, "No reply before the wait expired");
                return Ok(ArgumentResult::cancelled(CancelReason::Time, prompts, answers));
            };
            current = reply.content.clone();
            answers.push(reply);

            if is_keyword(&current, CANCEL_KEYWORD) {
                info!(argument = %self.key, "Cancelled by user");
                return Ok(ArgumentResult::cancelled(CancelReason::User, prompts, answers));
            }

            let reply = answers.last();
            empty = self.is_empty(&RawInput::Single(current.clone()), message, reply);
            valid = if empty {
                Validation::invalid()
            } else {
                self.validate(&current, message, reply).await?
            };
        }

        let value = self.parse(&current, message, answers.last(), valid.into_resolved()).await?;
        debug!(argument = %self.key, prompts = prompts.len(), "Argument resolved");
        Ok(ArgumentResult::resolved(Some(value), prompts, answers))
    }
}
