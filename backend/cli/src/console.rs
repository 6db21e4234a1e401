//! Interactive terminal transport: prompts go to stdout, replies are read
//! line by line from stdin.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use parley_core::{ChatMessage, MessageTransport, ParleyError, Prompt, PromptTone};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;
use tracing::debug;

use crate::terminal_output::{paint, BOLD, CYAN, DIM, YELLOW};

const BOT_ID: &str = "parley";

pub struct ConsoleTransport {
    lines: Mutex<Lines<BufReader<Stdin>>>,
    color: bool,
}

impl ConsoleTransport {
    pub fn new(color: bool) -> Self {
        Self { lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()), color }
    }
}

/// Terminal rendering of a prompt: the rejection reason highlighted, the
/// question in bold, instructions and countdown dimmed.
pub fn format_prompt(prompt: &Prompt, color: bool) -> String {
    let accent = match prompt.tone {
        PromptTone::Neutral => CYAN,
        PromptTone::Retry => YELLOW,
    };
    let mut lines = Vec::with_capacity(4);
    if let Some(reason) = &prompt.reason {
        lines.push(paint(reason, accent, color));
    }
    if !prompt.body.is_empty() {
        let marker = paint("?", accent, color);
        lines.push(format!("{marker} {}", paint(&prompt.body, BOLD, color)));
    }
    lines.push(paint(&prompt.instructions, DIM, color));
    if let Some(footer) = &prompt.footer {
        lines.push(paint(footer, DIM, color));
    }
    lines.join("\n")
}

fn stdin_error(e: std::io::Error) -> ParleyError {
    ParleyError::Transport(format!("reading reply from stdin: {e}"))
}

#[async_trait]
impl MessageTransport for ConsoleTransport {
    fn name(&self) -> &str {
        "console"
    }

    async fn send_prompt(&self, channel_id: &str, prompt: &Prompt) -> Result<ChatMessage> {
        let mut stdout = tokio::io::stdout();
        let text = format!("{}\n> ", format_prompt(prompt, self.color));
        let written = match stdout.write_all(text.as_bytes()).await {
            Ok(()) => stdout.flush().await,
            Err(e) => Err(e),
        };
        written.map_err(|e| ParleyError::Transport(format!("writing prompt to stdout: {e}")))?;
        Ok(ChatMessage::new(channel_id, BOT_ID, prompt.render()))
    }

    async fn await_reply(
        &self,
        channel_id: &str,
        user_id: &str,
        timeout: Option<Duration>,
    ) -> Result<Option<ChatMessage>> {
        let mut lines = self.lines.lock().await;
        let line = match timeout {
            Some(wait) => match tokio::time::timeout(wait, lines.next_line()).await {
                Ok(line) => line.map_err(stdin_error)?,
                Err(_) => {
                    debug!(wait_secs = wait.as_secs(), "Console reply timed out");
                    println!();
                    return Ok(None);
                }
            },
            None => lines.next_line().await.map_err(stdin_error)?,
        };
        // End of input behaves like silence.
        Ok(line.map(|content| ChatMessage::new(channel_id, user_id, content)))
    }
}
