//! Prompt wording and reply keywords.

use parley_core::{Prompt, PromptTone};

use crate::argument::Argument;

pub const CANCEL_KEYWORD: &str = "cancel";
pub const FINISH_KEYWORD: &str = "finish";

/// Longest rejected value echoed back to the user.
const MAX_ECHO_CHARS: usize = 1850;

pub(crate) fn is_keyword(text: &str, keyword: &str) -> bool {
    text.trim().eq_ignore_ascii_case(keyword)
}

/// Which resolution loop the prompt belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PromptMode {
    Single,
    /// `collected` values are already accepted.
    Infinite { collected: usize },
}

fn footer(argument: &Argument) -> Option<String> {
    argument.wait().map(|wait| {
        format!("The command will automatically be cancelled in {} seconds.", wait.as_secs())
    })
}

fn instructions(mode: PromptMode) -> String {
    match mode {
        PromptMode::Single => "Respond with `cancel` to cancel the command.".to_string(),
        PromptMode::Infinite { collected: 0 } => {
            "Respond with `cancel` to cancel the command, or `finish` to finish entry.".to_string()
        }
        PromptMode::Infinite { .. } => {
            "Respond with `cancel` to cancel the command, or `finish` to finish entry up to this point."
                .to_string()
        }
    }
}

/// The opening question for an argument.
pub(crate) fn ask(argument: &Argument, mode: PromptMode) -> Prompt {
    Prompt {
        tone: PromptTone::Neutral,
        reason: None,
        body: argument.prompt().to_string(),
        instructions: instructions(mode),
        footer: footer(argument),
    }
}

/// A re-ask after `rejected` failed validation with an optional `reason`.
pub(crate) fn reask(
    argument: &Argument,
    mode: PromptMode,
    rejected: &str,
    reason: Option<&str>,
) -> Prompt {
    let reason = match (reason, mode) {
        (Some(reason), _) => reason.to_string(),
        (None, PromptMode::Single) => {
            format!("You provided an invalid {}. Please try again.", argument.label())
        }
        (None, PromptMode::Infinite { .. }) => format!(
            "You provided an invalid {}, \"{}\". Please try again.",
            argument.label(),
            echo(rejected)
        ),
    };
    Prompt {
        tone: PromptTone::Retry,
        reason: Some(reason),
        body: argument.prompt().to_string(),
        instructions: instructions(mode),
        footer: footer(argument),
    }
}

/// User text safe to quote back: mentions are defused and long input elided.
fn echo(raw: &str) -> String {
    if raw.chars().count() >= MAX_ECHO_CHARS {
        return "[too long to show]".to_string();
    }
    raw.replace('@', "@\u{200b}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::argument::ArgumentDef;
    use crate::test_support::argument;

    #[test]
    fn keywords_ignore_case_and_padding() {
        assert!(is_keyword(" CANCEL ", CANCEL_KEYWORD));
        assert!(is_keyword("Finish", FINISH_KEYWORD));
        assert!(!is_keyword("cancelled", CANCEL_KEYWORD));
    }

    #[test]
    fn footer_follows_wait() {
        let timed = argument(ArgumentDef::new("n", "How many?").value_type("integer"));
        let prompt = ask(&timed, PromptMode::Single);
        assert_eq!(prompt.tone, PromptTone::Neutral);
        assert_eq!(
            prompt.footer.as_deref(),
            Some("The command will automatically be cancelled in 30 seconds.")
        );

        let untimed = argument(ArgumentDef::new("n", "How many?").value_type("integer").wait(0));
        assert_eq!(ask(&untimed, PromptMode::Single).footer, None);
    }

    #[test]
    fn reask_falls_back_to_generic_reason() {
        let arg = argument(ArgumentDef::new("n", "How many?").label("count").value_type("integer"));
        let prompt = reask(&arg, PromptMode::Single, "ten", None);
        assert_eq!(prompt.tone, PromptTone::Retry);
        assert_eq!(prompt.reason.as_deref(), Some("You provided an invalid count. Please try again."));
        assert_eq!(prompt.body, "How many?");

        let prompt = reask(&arg, PromptMode::Infinite { collected: 1 }, "@everyone", None);
        assert_eq!(
            prompt.reason.as_deref(),
            Some("You provided an invalid count, \"@\u{200b}everyone\". Please try again.")
        );
        assert!(prompt.instructions.ends_with("finish entry up to this point."));

        let prompt = reask(&arg, PromptMode::Single, "x", Some("Too small."));
        assert_eq!(prompt.reason.as_deref(), Some("Too small."));
    }
}
