//! Resolves a command's full argument list, in declaration order.

use std::collections::{HashMap, HashSet};

use anyhow::Result;
use parley_core::ChatMessage;
use tracing::{debug, info};

use crate::argument::{Argument, ArgumentDef};
use crate::awaiting::Conversation;
use crate::error::ArgumentConfigError;
use crate::registry::TypeRegistry;
use crate::result::CollectorResult;
use crate::value::RawInput;

/// Built once per command definition and shared by every invocation.
#[derive(Debug, Clone)]
pub struct ArgumentCollector {
    args: Vec<Argument>,
    prompt_limit: Option<usize>,
}

impl ArgumentCollector {
    /// Build every argument and check the list as a whole: unique keys, an
    /// infinite argument only in last position, and no required argument
    /// after an optional one.
    pub fn new(
        defs: Vec<ArgumentDef>,
        registry: &TypeRegistry,
        prompt_limit: Option<usize>,
    ) -> Result<Self, ArgumentConfigError> {
        let count = defs.len();
        let mut args = Vec::with_capacity(count);
        let mut keys = HashSet::new();
        let mut seen_optional = false;

        for (i, def) in defs.into_iter().enumerate() {
            let arg = Argument::new(def, registry)?;
            if !keys.insert(arg.key().to_string()) {
                return Err(ArgumentConfigError::DuplicateKey(arg.key().to_string()));
            }
            if arg.is_infinite() && i + 1 != count {
                return Err(ArgumentConfigError::InfiniteNotLast { key: arg.key().to_string() });
            }
            if arg.is_required() && seen_optional {
                return Err(ArgumentConfigError::RequiredAfterOptional {
                    key: arg.key().to_string(),
                });
            }
            seen_optional |= !arg.is_required();
            args.push(arg);
        }

        Ok(Self { args, prompt_limit })
    }

    pub fn arguments(&self) -> &[Argument] {
        &self.args
    }

    /// Resolve every argument for `message`. `provided` holds the
    /// positional values already typed with the command; `prompt_limit`
    /// overrides the collector's own limit for this call.
    ///
    /// The author/channel pair is marked awaiting input for the duration of
    /// the call, and released on every exit path.
    pub async fn obtain(
        &self,
        conv: &Conversation,
        message: &ChatMessage,
        provided: &[String],
        prompt_limit: Option<usize>,
    ) -> Result<CollectorResult> {
        let _awaiting = conv.awaiting.mark(&message.author_id, &message.channel_id);
        let limit = prompt_limit.or(self.prompt_limit);
        debug!(
            arguments = self.args.len(),
            provided = provided.len(),
            transport = conv.transport.name(),
            "Collecting arguments"
        );

        let mut values = HashMap::with_capacity(self.args.len());
        let mut prompts = Vec::new();
        let mut answers = Vec::new();

        for (i, arg) in self.args.iter().enumerate() {
            let raw = if arg.is_infinite() {
                RawInput::List(provided.get(i..).unwrap_or_default().to_vec())
            } else {
                provided.get(i).cloned().map_or(RawInput::Missing, RawInput::Single)
            };

            let result = arg.obtain(conv, message, raw, limit).await?;
            prompts.extend(result.prompts);
            answers.extend(result.answers);

            if let Some(reason) = result.cancelled {
                info!(argument = %arg.key(), reason = %reason, "Argument collection cancelled");
                return Ok(CollectorResult { values: None, cancelled: Some(reason), prompts, answers });
            }
            values.insert(arg.key().to_string(), result.value);
        }

        debug!(prompts = prompts.len(), "Arguments collected");
        Ok(CollectorResult { values: Some(values), cancelled: None, prompts, answers })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::result::CancelReason;
    use crate::test_support::{registry, scripted, trigger, StaticDirectory, CHANNEL, USER};
    use crate::value::ArgValue;

    fn collector(defs: Vec<ArgumentDef>) -> ArgumentCollector {
        ArgumentCollector::new(defs, &registry(), None).unwrap()
    }

    fn owned(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn infinite_must_be_last() {
        let err = ArgumentCollector::new(
            vec![
                ArgumentDef::new("tags", "Tags?").value_type("string").infinite(),
                ArgumentDef::new("name", "Name?").value_type("string"),
            ],
            &registry(),
            None,
        )
        .unwrap_err();
        assert_eq!(err, ArgumentConfigError::InfiniteNotLast { key: "tags".into() });
    }

    #[test]
    fn required_cannot_follow_optional() {
        let err = ArgumentCollector::new(
            vec![
                ArgumentDef::new("count", "Count?").value_type("integer").default_value(1i64),
                ArgumentDef::new("name", "Name?").value_type("string"),
            ],
            &registry(),
            None,
        )
        .unwrap_err();
        assert_eq!(err, ArgumentConfigError::RequiredAfterOptional { key: "name".into() });
    }

    #[test]
    fn keys_must_be_unique() {
        let err = ArgumentCollector::new(
            vec![
                ArgumentDef::new("name", "Name?").value_type("string"),
                ArgumentDef::new("name", "Again?").value_type("string"),
            ],
            &registry(),
            None,
        )
        .unwrap_err();
        assert_eq!(err, ArgumentConfigError::DuplicateKey("name".into()));
    }

    #[tokio::test]
    async fn resolves_provided_values_without_prompting() {
        let (conv, transport) = scripted(&[]);
        let msg = trigger("!give bob 3 apple pear");
        let args = collector(vec![
            ArgumentDef::new("who", "Who?").value_type("string"),
            ArgumentDef::new("count", "How many?").value_type("integer"),
            ArgumentDef::new("items", "Which items?").value_type("string").infinite(),
        ]);

        let result = args
            .obtain(&conv, &msg, &owned(&["bob", "3", "apple", "pear"]), None)
            .await
            .unwrap();
        assert!(!result.is_cancelled());
        assert_eq!(result.get("who"), Some(&ArgValue::Text("bob".into())));
        assert_eq!(result.get("count"), Some(&ArgValue::Integer(3)));
        assert_eq!(
            result.get("items"),
            Some(&ArgValue::List(vec!["apple".into(), "pear".into()]))
        );
        assert!(transport.sent().is_empty());
        assert!(conv.awaiting.is_empty());
    }

    #[tokio::test]
    async fn optional_argument_takes_default_silently() {
        let (conv, transport) = scripted(&[]);
        let msg = trigger("!roll");
        let args = collector(vec![
            ArgumentDef::new("sides", "Sides?").value_type("integer").default_value(6i64),
            ArgumentDef::new("note", "Note?").value_type("string").required(false),
        ]);

        let result = args.obtain(&conv, &msg, &[], Some(0)).await.unwrap();
        assert_eq!(result.get("sides"), Some(&ArgValue::Integer(6)));
        assert_eq!(result.values.as_ref().and_then(|v| v.get("note")), Some(&None));
        assert!(result.prompts.is_empty());
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn first_cancel_stops_collection() {
        let (conv, transport) = scripted(&["bob", "cancel", "5"]);
        let msg = trigger("!give");
        let args = collector(vec![
            ArgumentDef::new("who", "Who?").value_type("string"),
            ArgumentDef::new("count", "How many?").value_type("integer"),
            ArgumentDef::new("note", "Note?").value_type("string"),
        ]);

        let result = args.obtain(&conv, &msg, &[], None).await.unwrap();
        assert_eq!(result.cancelled, Some(CancelReason::User));
        assert_eq!(result.values, None);
        // Prompts and answers from both attempted arguments, in order.
        assert_eq!(result.prompts.len(), 2);
        let answers: Vec<_> = result.answers.iter().map(|a| a.content.as_str()).collect();
        assert_eq!(answers, ["bob", "cancel"]);
        assert_eq!(transport.sent()[1].body, "How many?");
    }

    #[tokio::test]
    async fn awaiting_is_held_during_and_released_after() {
        for (replies, expected) in [
            (&["4"][..], None),
            (&["cancel"][..], Some(CancelReason::User)),
            (&[][..], Some(CancelReason::Time)),
            (&["x", "y"][..], Some(CancelReason::PromptLimit)),
        ] {
            let (conv, transport) = scripted(replies);
            let msg = trigger("!roll");
            let args = collector(vec![ArgumentDef::new("sides", "Sides?").value_type("integer")]);

            let result = args.obtain(&conv, &msg, &[], Some(2)).await.unwrap();
            assert_eq!(result.cancelled, expected);
            assert!(transport.awaiting_seen().iter().all(|seen| *seen));
            assert!(!conv.awaiting.is_awaiting(USER, CHANNEL));
        }
    }

    #[tokio::test]
    async fn awaiting_is_released_when_a_lookup_fails() {
        let (conv, _) = scripted(&[]);
        let msg = trigger("!ban someone");
        let reg = registry();
        reg.register_entity_types(Arc::new(StaticDirectory::offline())).unwrap();
        let args = ArgumentCollector::new(
            vec![ArgumentDef::new("who", "Who?").value_type("user")],
            &reg,
            None,
        )
        .unwrap();

        let err = args.obtain(&conv, &msg, &owned(&["someone"]), None).await.unwrap_err();
        assert!(format!("{err:#}").contains("directory offline"));
        assert!(conv.awaiting.is_empty());
    }

    #[tokio::test]
    async fn call_limit_overrides_collector_limit() {
        let msg = trigger("!roll");
        let defs = || vec![ArgumentDef::new("sides", "Sides?").value_type("integer")];
        let args = ArgumentCollector::new(defs(), &registry(), Some(1)).unwrap();

        let (conv, transport) = scripted(&["a", "b", "c", "d"]);
        let result = args.obtain(&conv, &msg, &[], None).await.unwrap();
        assert_eq!(result.cancelled, Some(CancelReason::PromptLimit));
        assert_eq!(transport.sent().len(), 1);

        let (conv, transport) = scripted(&["a", "b", "c", "d"]);
        let result = args.obtain(&conv, &msg, &[], Some(3)).await.unwrap();
        assert_eq!(result.cancelled, Some(CancelReason::PromptLimit));
        assert_eq!(transport.sent().len(), 3);
    }

    #[tokio::test]
    async fn union_resolves_in_declared_order() {
        let (conv, _) = scripted(&[]);
        let msg = trigger("!pick 42");
        let args = collector(vec![ArgumentDef::new("pick", "Pick?").union(["integer", "string"])]);
        let result = args.obtain(&conv, &msg, &owned(&["42"]), None).await.unwrap();
        assert_eq!(result.get("pick"), Some(&ArgValue::Integer(42)));

        let args = collector(vec![ArgumentDef::new("pick", "Pick?").union(["string", "integer"])]);
        let result = args.obtain(&conv, &msg, &owned(&["42"]), None).await.unwrap();
        assert_eq!(result.get("pick"), Some(&ArgValue::Text("42".into())));
    }

    #[tokio::test]
    async fn infinite_tail_is_empty_when_input_is_short() {
        let (conv, transport) = scripted(&["red", "finish"]);
        let msg = trigger("!paint wall");
        let args = collector(vec![
            ArgumentDef::new("what", "What?").value_type("string"),
            ArgumentDef::new("colors", "Colors?").value_type("string").infinite(),
        ]);
        let result = args.obtain(&conv, &msg, &owned(&["wall"]), None).await.unwrap();
        assert_eq!(result.get("colors"), Some(&ArgValue::List(vec!["red".into()])));
        assert_eq!(transport.sent().len(), 1);
    }
}
