//! Multi-value ("infinite") resolution.
//!
//! Seeded with supplied values, each slot is validated in turn and only
//! invalid slots are re-asked; the result has exactly one value per seed.
//! Unseeded, values are collected until the user replies `finish`.

use anyhow::{Context, Result};
use parley_core::{ChatMessage, PromptTone};
use tracing::{debug, info};

use crate::argument::Argument;
use crate::awaiting::Conversation;
use crate::prompting::{self, is_keyword, PromptMode, CANCEL_KEYWORD, FINISH_KEYWORD};
use crate::result::{ArgumentResult, CancelReason};
use crate::value::{ArgValue, RawInput, Validation};

impl Argument {
    pub(crate) async fn obtain_infinite(
        &self,
        conv: &Conversation,
        message: &ChatMessage,
        seed: Option<Vec<String>>,
        prompt_limit: Option<usize>,
    ) -> Result<ArgumentResult> {
        let mut results: Vec<ArgValue> = Vec::new();
        let mut prompts = Vec::new();
        let mut answers: Vec<ChatMessage> = Vec::new();
        let mut slot = 0usize;

        loop {
            let mut current = seed
                .as_ref()
                .and_then(|values| values.get(slot))
                .filter(|value| !self.is_empty(&RawInput::Single((*value).clone()), message, None))
                .cloned();
            let mut reply_index: Option<usize> = None;
            let mut valid = match &current {
                Some(raw) => self.validate(raw, message, None).await?,
                None => Validation::invalid(),
            };
            let mut attempts = 0usize;

            while !valid.is_valid() {
                if prompt_limit.is_some_and(|limit| attempts >= limit) {
                    info!(
                        argument = %self.key(),
                        slot,
                        collected = results.len(),
                        "Prompt limit reached"
                    );
                    let value = (!results.is_empty()).then(|| ArgValue::List(results));
                    return Ok(ArgumentResult {
                        value,
                        cancelled: Some(CancelReason::PromptLimit),
                        prompts,
                        answers,
                    });
                }
                attempts += 1;

                let mode = PromptMode::Infinite { collected: results.len() };
                let prompt = match &current {
                    Some(raw) => Some(prompting::reask(self, mode, raw, valid.reason())),
                    // Unseeded: after the first value, the next one is awaited silently.
                    None if seed.is_none() && !results.is_empty() => None,
                    None => {
                        let mut prompt = prompting::ask(self, mode);
                        if attempts > 1 {
                            prompt.tone = PromptTone::Retry;
                        }
                        Some(prompt)
                    }
                };
                if let Some(prompt) = prompt {
                    let sent = conv
                        .transport
                        .send_prompt(&message.channel_id, &prompt)
                        .await
                        .with_context(|| format!("sending prompt for argument \"{}\"", self.key()))?;
                    prompts.push(sent);
                    debug!(argument = %self.key(), slot, attempt = attempts, "Prompt sent");
                }

                let Some(reply) = conv
                    .transport
                    .await_reply(&message.channel_id, &message.author_id, self.wait())
                    .await?
                else {
                    info!(argument = %self.key(), slot, "No reply before the wait expired");
                    return Ok(ArgumentResult::cancelled(CancelReason::Time, prompts, answers));
                };
                let text = reply.content.clone();
                answers.push(reply);

                if is_keyword(&text, FINISH_KEYWORD) {
                    return self.finish(message, results, prompts, answers).await;
                }
                if is_keyword(&text, CANCEL_KEYWORD) {
                    info!(argument = %self.key(), slot, "Cancelled by user");
                    return Ok(ArgumentResult::cancelled(CancelReason::User, prompts, answers));
                }

                let reply = answers.last();
                let empty = self.is_empty(&RawInput::Single(text.clone()), message, reply);
                valid = if empty {
                    Validation::invalid()
                } else {
                    self.validate(&text, message, reply).await?
                };
                reply_index = Some(answers.len() - 1);
                current = (!empty).then_some(text);
            }

            let raw = current.unwrap_or_default();
            let reply = reply_index.and_then(|i| answers.get(i));
            let value = self.parse(&raw, message, reply, valid.into_resolved()).await?;
            results.push(value);
            debug!(argument = %self.key(), slot, collected = results.len(), "Value collected");

            slot += 1;
            if seed.as_ref().is_some_and(|values| slot >= values.len()) {
                return Ok(ArgumentResult::resolved(Some(ArgValue::List(results)), prompts, answers));
            }
        }
    }

    /// `finish` ends entry with what has been collected. With nothing
    /// collected, the default applies if there is one; otherwise it counts
    /// as a cancel.
    async fn finish(
        &self,
        message: &ChatMessage,
        results: Vec<ArgValue>,
        prompts: Vec<ChatMessage>,
        answers: Vec<ChatMessage>,
    ) -> Result<ArgumentResult> {
        if !results.is_empty() {
            debug!(argument = %self.key(), collected = results.len(), "Entry finished");
            return Ok(ArgumentResult::resolved(Some(ArgValue::List(results)), prompts, answers));
        }
        if self.default().is_some() {
            let value = self.resolve_default(message).await?;
            return Ok(ArgumentResult::resolved(value, prompts, answers));
        }
        info!(argument = %self.key(), "Finished with nothing collected");
        Ok(ArgumentResult::cancelled(CancelReason::User, prompts, answers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::argument::ArgumentDef;
    use crate::test_support::{argument, scripted, trigger};

    fn numbers() -> Argument {
        argument(ArgumentDef::new("numbers", "Which numbers?").value_type("integer").infinite())
    }

    fn ints(values: &[i64]) -> Option<ArgValue> {
        Some(ArgValue::List(values.iter().copied().map(ArgValue::Integer).collect()))
    }

    #[tokio::test]
    async fn valid_seed_needs_no_prompts() {
        let (conv, transport) = scripted(&[]);
        let msg = trigger("!sum 1 2 3");
        let seed = vec!["1".to_string(), "2".into(), "3".into()];
        let result = numbers().obtain(&conv, &msg, seed.into(), None).await.unwrap();
        assert_eq!(result.value, ints(&[1, 2, 3]));
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn only_invalid_slots_are_reasked() {
        let (conv, transport) = scripted(&["two"]);
        let msg = trigger("!sum 1 x 3");
        let seed = vec!["1".to_string(), "x".into(), "3".into()];
        // "two" is still not an integer, so a second re-ask follows; the
        // script then runs dry.
        let result = numbers().obtain(&conv, &msg, seed.clone().into(), None).await.unwrap();
        assert_eq!(result.cancelled, Some(CancelReason::Time));
        assert_eq!(transport.sent().len(), 2);

        let (conv, transport) = scripted(&["2"]);
        let result = numbers().obtain(&conv, &msg, seed.into(), None).await.unwrap();
        assert_eq!(result.value, ints(&[1, 2, 3]));
        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].tone, PromptTone::Retry);
        assert_eq!(
            sent[0].reason.as_deref(),
            Some("You provided an invalid numbers, \"x\". Please try again.")
        );
        assert!(sent[0].instructions.ends_with("finish entry up to this point."));
    }

    #[tokio::test]
    async fn unseeded_collects_until_finish() {
        let (conv, transport) = scripted(&["4", "five", "5", " Finish "]);
        let msg = trigger("!sum");
        let result = numbers().obtain(&conv, &msg, RawInput::Missing, None).await.unwrap();
        assert_eq!(result.value, ints(&[4, 5]));
        assert_eq!(result.answers.len(), 4);

        // Opening ask, then a re-ask for "five"; "4" and "5" are followed
        // by silent waits.
        let sent = transport.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].tone, PromptTone::Neutral);
        assert!(sent[0].instructions.ends_with("`finish` to finish entry."));
        assert_eq!(
            sent[1].reason.as_deref(),
            Some("You provided an invalid numbers, \"five\". Please try again.")
        );
    }

    #[tokio::test]
    async fn finish_with_nothing_collected() {
        let (conv, _) = scripted(&["finish"]);
        let msg = trigger("!sum");
        let result = numbers().obtain(&conv, &msg, RawInput::Missing, None).await.unwrap();
        assert_eq!(result.cancelled, Some(CancelReason::User));
        assert_eq!(result.value, None);
    }

    #[tokio::test]
    async fn cancel_discards_collected_values() {
        let (conv, _) = scripted(&["1", "2", "cancel"]);
        let msg = trigger("!sum");
        let result = numbers().obtain(&conv, &msg, RawInput::Missing, None).await.unwrap();
        assert_eq!(result.cancelled, Some(CancelReason::User));
        assert_eq!(result.value, None);
        assert_eq!(result.answers.len(), 3);
    }

    #[tokio::test]
    async fn prompt_limit_keeps_partial_results() {
        let (conv, transport) = scripted(&["1", "x", "y"]);
        let msg = trigger("!sum");
        let result = numbers().obtain(&conv, &msg, RawInput::Missing, Some(2)).await.unwrap();
        assert_eq!(result.cancelled, Some(CancelReason::PromptLimit));
        assert_eq!(result.value, ints(&[1]));
        // Opening ask plus one re-ask for "x".
        assert_eq!(transport.sent().len(), 2);
    }

    #[tokio::test]
    async fn seeded_empty_list_behaves_unseeded() {
        let (conv, transport) = scripted(&["7", "finish"]);
        let msg = trigger("!sum");
        let result = numbers().obtain(&conv, &msg, Vec::<String>::new().into(), None).await.unwrap();
        assert_eq!(result.value, ints(&[7]));
        assert_eq!(transport.sent().len(), 1);
    }

    #[tokio::test]
    async fn blank_seed_slot_is_asked_for() {
        let (conv, transport) = scripted(&["2"]);
        let msg = trigger("!sum");
        let seed = vec!["1".to_string(), " ".into(), "3".into()];
        let result = numbers().obtain(&conv, &msg, seed.into(), None).await.unwrap();
        assert_eq!(result.value, ints(&[1, 2, 3]));
        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].tone, PromptTone::Neutral);
    }

    #[tokio::test]
    async fn blank_single_input_collects_until_finish() {
        let (conv, transport) = scripted(&["1", "2", "finish"]);
        let msg = trigger("!sum");
        let arg = argument(
            ArgumentDef::new("numbers", "Which numbers?").value_type("integer").infinite().required(true),
        );
        let result = arg.obtain(&conv, &msg, RawInput::Single(String::new()), None).await.unwrap();
        assert_eq!(result.value, ints(&[1, 2]));
        assert_eq!(result.answers.len(), 3);
        assert_eq!(transport.sent().len(), 1);
    }
}
