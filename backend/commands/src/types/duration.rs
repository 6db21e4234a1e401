use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use super::{one_of_message, ValueContext, ValueType};
use crate::value::{ArgValue, Validation};

/// Whole input: one or more `<number><unit>` tokens.
static DURATION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:\d+\s*[wdhms]\s*)+$").expect("duration pattern"));

static DURATION_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\s*([wdhms])").expect("duration token pattern"));

/// Parse `1w2d3h4m5s`-style durations, or a bare number of seconds.
///
/// Returns `None` for anything else, including totals that overflow.
pub fn parse_duration(raw: &str) -> Option<Duration> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(secs) = raw.parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }
    if !DURATION_PATTERN.is_match(raw) {
        return None;
    }

    let mut total: u64 = 0;
    for cap in DURATION_TOKEN.captures_iter(raw) {
        let amount: u64 = cap[1].parse().ok()?;
        let unit: u64 = match cap[2].to_ascii_lowercase().as_str() {
            "w" => 7 * 24 * 3600,
            "d" => 24 * 3600,
            "h" => 3600,
            "m" => 60,
            _ => 1,
        };
        total = total.checked_add(amount.checked_mul(unit)?)?;
    }
    Some(Duration::from_secs(total))
}

/// Durations such as `90s`, `1h30m`, `2d`. Bounds are in seconds.
pub struct DurationType;

#[async_trait]
impl ValueType for DurationType {
    fn id(&self) -> &str {
        "duration"
    }

    async fn validate(&self, raw: &str, ctx: &ValueContext<'_>) -> Result<Validation> {
        let Some(duration) = parse_duration(raw) else {
            return Ok(Validation::invalid());
        };
        if let Some(options) = ctx.argument.one_of() {
            if !options.iter().any(|o| parse_duration(o) == Some(duration)) {
                return Ok(Validation::reject(one_of_message(options)));
            }
        }
        let secs = duration.as_secs_f64();
        if let Some(min) = ctx.argument.min() {
            if secs < min {
                return Ok(Validation::reject(format!(
                    "Please enter a duration of at least {min} seconds."
                )));
            }
        }
        if let Some(max) = ctx.argument.max() {
            if secs > max {
                return Ok(Validation::reject(format!(
                    "Please enter a duration of at most {max} seconds."
                )));
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
        let duration = parse_duration(raw).with_context(|| format!("\"{raw}\" is not a duration"))?;
        Ok(ArgValue::Duration(duration))
    }
}
