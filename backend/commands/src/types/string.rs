use anyhow::Result;
use async_trait::async_trait;

use super::{one_of_message, ValueContext, ValueType};
use crate::value::{ArgValue, Validation};

/// Free text. Bounds are character counts; `one_of` ignores case.
pub struct StringType;

#[async_trait]
impl ValueType for StringType {
    fn id(&self) -> &str {
        "string"
    }

    async fn validate(&self, raw: &str, ctx: &ValueContext<'_>) -> Result<Validation> {
        let arg = ctx.argument;
        if let Some(options) = arg.one_of() {
            let lc = raw.trim().to_lowercase();
            if !options.iter().any(|o| o.to_lowercase() == lc) {
                return Ok(Validation::reject(one_of_message(options)));
            }
        }
        let len = raw.chars().count() as f64;
        if let Some(min) = arg.min() {
            if len < min {
                return Ok(Validation::reject(format!(
                    "Please keep the {} above or exactly {min} characters.",
                    arg.label()
                )));
            }
        }
        if let Some(max) = arg.max() {
            if len > max {
                return Ok(Validation::reject(format!(
                    "Please keep the {} below or exactly {max} characters.",
                    arg.label()
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
        Ok(ArgValue::Text(raw.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::argument::ArgumentDef;
    use crate::test_support::{argument, trigger};

    #[tokio::test]
    async fn length_bounds_use_label() {
        let msg = trigger("!nick");
        let arg = argument(
            ArgumentDef::new("nick", "New nickname?")
                .label("nickname")
                .value_type("string")
                .min(2.0)
                .max(4.0),
        );
        let ctx = ValueContext { message: &msg, argument: &arg, reply: None };

        assert_eq!(
            StringType.validate("a", &ctx).await.unwrap().reason(),
            Some("Please keep the nickname above or exactly 2 characters.")
        );
        assert_eq!(
            StringType.validate("abcde", &ctx).await.unwrap().reason(),
            Some("Please keep the nickname below or exactly 4 characters.")
        );
        // Counted in characters, not bytes.
        assert!(StringType.validate("ñññ", &ctx).await.unwrap().is_valid());
    }

    #[tokio::test]
    async fn one_of_is_case_insensitive() {
        let msg = trigger("!queue");
        let arg = argument(
            ArgumentDef::new("mode", "Mode?").value_type("string").one_of(["steer", "collect"]),
        );
        let ctx = ValueContext { message: &msg, argument: &arg, reply: None };

        assert!(StringType.validate("STEER", &ctx).await.unwrap().is_valid());
        assert!(StringType.validate("steer ", &ctx).await.unwrap().is_valid());
        assert_eq!(
            StringType.validate("drop", &ctx).await.unwrap().reason(),
            Some("Please enter one of the following options: steer, collect")
        );
        assert_eq!(
            StringType.parse("Collect", &ctx, None).await.unwrap(),
            ArgValue::Text("Collect".into())
        );
    }
}
