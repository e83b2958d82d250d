//! Interactive single-turn chat loop
//!
//! Each input line is sent on its own, with no memory of earlier turns.
//! Provider failures are reported and the loop keeps accepting input; only
//! an exit sentinel or end of input stops it.

use crate::error::Result;
use crate::llm::{complete_single_turn, ChatModel};
use serde::Serialize;
use std::io::{BufRead, Write};
use tracing::{error, info};

/// Inputs that end the loop, compared case-insensitively
pub const EXIT_SENTINELS: [&str; 2] = ["exit", "quit"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Terminated,
}

/// Counters reported when the loop ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChatSummary {
    pub answered: usize,
    pub failed: usize,
}

pub fn is_exit_sentinel(line: &str) -> bool {
    let line = line.trim();
    EXIT_SENTINELS.iter().any(|s| line.eq_ignore_ascii_case(s))
}

pub struct ChatLoop<'a> {
    model: &'a dyn ChatModel,
    system_prompt: String,
    state: LoopState,
    summary: ChatSummary,
}

impl<'a> ChatLoop<'a> {
    pub fn new(model: &'a dyn ChatModel, system_prompt: impl Into<String>) -> Self {
        Self {
            model,
            system_prompt: system_prompt.into(),
            state: LoopState::Running,
            summary: ChatSummary::default(),
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn summary(&self) -> ChatSummary {
        self.summary
    }

    /// Handle one input line, writing the reply or the error to `out`
    pub async fn step<W: Write>(&mut self, line: &str, out: &mut W) -> Result<LoopState> {
        if self.state == LoopState::Terminated {
            return Ok(self.state);
        }

        if is_exit_sentinel(line) {
            info!("Exiting chatbot");
            self.state = LoopState::Terminated;
            return Ok(self.state);
        }

        let prompt = line.trim_end_matches(['\r', '\n']);

        info!("Generating response for prompt: {}", prompt);
        match complete_single_turn(self.model, &self.system_prompt, prompt).await {
            Ok(answer) => {
                info!("Successfully generated response");
                self.summary.answered += 1;
                writeln!(out, "\nBot: {}", answer)?;
            }
            Err(e) => {
                error!("Error in chat loop: {}", e);
                self.summary.failed += 1;
                writeln!(out, "\nAn error occurred: {}", e)?;
            }
        }
        out.flush()?;

        Ok(self.state)
    }

    /// Prompt, read and answer lines until a sentinel or end of input
    pub async fn run<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        out: &mut W,
    ) -> Result<ChatSummary> {
        let mut line = String::new();
        while self.state == LoopState::Running {
            write!(out, "\nYou: ")?;
            out.flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                info!("End of input");
                self.state = LoopState::Terminated;
                break;
            }

            self.step(&line, out).await?;
        }

        Ok(self.summary)
    }
}
