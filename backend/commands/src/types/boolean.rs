use anyhow::{bail, Result};
use async_trait::async_trait;

use super::{one_of_message, ValueContext, ValueType};
use crate::value::{ArgValue, Validation};

const TRUTHY: &[&str] = &["true", "t", "yes", "y", "on", "enable", "enabled", "1", "+"];
const FALSY: &[&str] = &["false", "f", "no", "n", "off", "disable", "disabled", "0", "-"];

/// `yes` / `no` style switches.
pub struct BooleanType;

fn interpret(raw: &str) -> Option<bool> {
    let lc = raw.trim().to_lowercase();
    if TRUTHY.contains(&lc.as_str()) {
        Some(true)
    } else if FALSY.contains(&lc.as_str()) {
        Some(false)
    } else {
        None
    }
}

#[async_trait]
impl ValueType for BooleanType {
    fn id(&self) -> &str {
        "boolean"
    }

    async fn validate(&self, raw: &str, ctx: &ValueContext<'_>) -> Result<Validation> {
        let Some(value) = interpret(raw) else {
            return Ok(Validation::invalid());
        };
        if let Some(options) = ctx.argument.one_of() {
            if !options.iter().any(|o| interpret(o) == Some(value)) {
                return Ok(Validation::reject(one_of_message(options)));
            }
        }
        Ok(Validation::valid())
    }

    async fn parse(
        &self,
        raw: &str,
        _ctx: &ValueContext<'_>,
        _resolved: Option<ArgValue>,
    ) -> Result<ArgValue> {
        match interpret(raw) {
            Some(b) => Ok(ArgValue::Bool(b)),
            None => bail!("unknown boolean value \"{raw}\""),
        }
    }
}
