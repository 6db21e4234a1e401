use anyhow::{Context, Result};
use async_trait::async_trait;

use super::{one_of_message, ValueContext, ValueType};
use crate::value::{ArgValue, Validation};

/// Shared `one_of` / `min` / `max` checks for numeric types.
fn check_bounds(n: f64, ctx: &ValueContext<'_>) -> Option<Validation> {
    let arg = ctx.argument;
    if let Some(options) = arg.one_of() {
        let listed = options
            .iter()
            .filter_map(|o| o.trim().parse::<f64>().ok())
            .any(|o| o == n);
        if !listed {
            return Some(Validation::reject(one_of_message(options)));
        }
    }
    if let Some(min) = arg.min() {
        if n < min {
            return Some(Validation::reject(format!(
                "Please enter a number above or exactly {min}."
            )));
        }
    }
    if let Some(max) = arg.max() {
        if n > max {
            return Some(Validation::reject(format!(
                "Please enter a number below or exactly {max}."
            )));
        }
    }
    None
}

/// Whole numbers (`i64`).
pub struct IntegerType;

#[async_trait]
impl ValueType for IntegerType {
    fn id(&self) -> &str {
        "integer"
    }

    async fn validate(&self, raw: &str, ctx: &ValueContext<'_>) -> Result<Validation> {
        let Ok(n) = raw.trim().parse::<i64>() else {
            return Ok(Validation::invalid());
        };
        Ok(check_bounds(n as f64, ctx).unwrap_or_else(Validation::valid))
    }

    async fn parse(
        &self,
        raw: &str,
        _ctx: &ValueContext<'_>,
        _resolved: Option<ArgValue>,
    ) -> Result<ArgValue> {
        let n = raw
            .trim()
            .parse::<i64>()
            .with_context(|| format!("\"{raw}\" is not an integer"))?;
        Ok(ArgValue::Integer(n))
    }
}

/// Finite floating point numbers.
pub struct FloatType;

fn parse_finite(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

#[async_trait]
impl ValueType for FloatType {
    fn id(&self) -> &str {
        "float"
    }

    async fn validate(&self, raw: &str, ctx: &ValueContext<'_>) -> Result<Validation> {
        let Some(n) = parse_finite(raw) else {
            return Ok(Validation::invalid());
        };
        Ok(check_bounds(n, ctx).unwrap_or_else(Validation::valid))
    }

    async fn parse(
        &self,
        raw: &str,
        _ctx: &ValueContext<'_>,
        _resolved: Option<ArgValue>,
    ) -> Result<ArgValue> {
        let n = parse_finite(raw).with_context(|| format!("\"{raw}\" is not a finite number"))?;
        Ok(ArgValue::Float(n))
    }
}
