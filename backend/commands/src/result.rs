use std::collections::HashMap;
use std::fmt;

use parley_core::ChatMessage;
use serde::{Deserialize, Serialize};

use crate::value::ArgValue;

/// Why a resolution ended without a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CancelReason {
    /// The user replied `cancel`, or `finish` with nothing collected.
    User,
    /// No reply arrived within the wait window.
    Time,
    /// The prompt budget ran out before a valid value arrived.
    PromptLimit,
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CancelReason::User => "user",
            CancelReason::Time => "time",
            CancelReason::PromptLimit => "promptLimit",
        };
        f.write_str(s)
    }
}

/// Result of resolving a single argument.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentResult {
    pub value: Option<ArgValue>,
    pub cancelled: Option<CancelReason>,
    /// Prompts sent, in order.
    pub prompts: Vec<ChatMessage>,
    /// Replies received, in order.
    pub answers: Vec<ChatMessage>,
}

impl ArgumentResult {
    pub(crate) fn resolved(
        value: Option<ArgValue>,
        prompts: Vec<ChatMessage>,
        answers: Vec<ChatMessage>,
    ) -> Self {
        Self { value, cancelled: None, prompts, answers }
    }

    pub(crate) fn cancelled(
        reason: CancelReason,
        prompts: Vec<ChatMessage>,
        answers: Vec<ChatMessage>,
    ) -> Self {
        Self { value: None, cancelled: Some(reason), prompts, answers }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.is_some()
    }
}

/// Result of resolving every argument of a command.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectorResult {
    /// Values keyed by argument key; `None` when resolution was cancelled.
    pub values: Option<HashMap<String, Option<ArgValue>>>,
    pub cancelled: Option<CancelReason>,
    pub prompts: Vec<ChatMessage>,
    pub answers: Vec<ChatMessage>,
}

impl CollectorResult {
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.is_some()
    }

    /// Value of one argument, if resolution succeeded and it has one.
    pub fn get(&self, key: &str) -> Option<&ArgValue> {
        self.values.as_ref()?.get(key)?.as_ref()
    }
}
