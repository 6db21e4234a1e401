use serde::{Deserialize, Serialize};

/// Color/urgency of a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptTone {
    /// First time the value is asked for.
    Neutral,
    /// Re-ask after an invalid answer.
    Retry,
}

/// A structured prompt. Transports decide how to present it (embed, colored
/// terminal text, plain message); `render` gives the plain-text form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    pub tone: PromptTone,
    /// Why the previous answer was rejected, if this is a re-ask.
    pub reason: Option<String>,
    pub body: String,
    pub instructions: String,
    /// Countdown notice; absent when no timeout applies.
    pub footer: Option<String>,
}

impl Prompt {
    pub fn render(&self) -> String {
        let mut lines = Vec::with_capacity(4);
        if let Some(reason) = &self.reason {
            lines.push(reason.as_str());
        }
        if !self.body.is_empty() {
            lines.push(self.body.as_str());
        }
        lines.push(self.instructions.as_str());
        if let Some(footer) = &self.footer {
            lines.push(footer.as_str());
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_skips_missing_parts() {
        let prompt = Prompt {
            tone: PromptTone::Neutral,
            reason: None,
            body: "How long?".into(),
            instructions: "Respond with `cancel` to cancel the command.".into(),
            footer: None,
        };
        assert_eq!(
            prompt.render(),
            "How long?\nRespond with `cancel` to cancel the command."
        );
    }

    #[test]
    fn render_puts_reason_first() {
        let prompt = Prompt {
            tone: PromptTone::Retry,
            reason: Some("Too short.".into()),
            body: "Name?".into(),
            instructions: "cancel".into(),
            footer: Some("30 seconds".into()),
        };
        assert_eq!(prompt.render(), "Too short.\nName?\ncancel\n30 seconds");
    }
}
