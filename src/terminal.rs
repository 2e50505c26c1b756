//! # Terminal Seam
//!
//! All user interaction goes through the [`Terminal`] trait so the menu engine
//! and the actions can be driven by a script in tests.
//!
//! - [`Console`] reads lines with `rustyline`. Ctrl-C and Ctrl-D while waiting
//!   for input both surface as [`Interrupted`].
//! - [`ScriptedTerminal`] replays queued lines and records everything printed.

use crate::error::Interrupted;
use log::warn;
use owo_colors::OwoColorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::collections::VecDeque;

pub trait Terminal {
    /// Show `prompt` and block for one line of input, without its line ending.
    fn read_line(&mut self, prompt: &str) -> Result<String, Interrupted>;

    fn print(&mut self, line: &str);

    /// Print a line that reports an abort or cancellation.
    fn alert(&mut self, line: &str) {
        self.print(line);
    }
}

/// Interactive terminal backed by a `rustyline` editor.
pub struct Console {
    editor: DefaultEditor,
}

impl Console {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }
}

impl Terminal for Console {
    fn read_line(&mut self, prompt: &str) -> Result<String, Interrupted> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string()),
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => Err(Interrupted),
            Err(err) => {
                warn!("Reading from the terminal failed: {err}");
                Err(Interrupted)
            }
        }
    }

    fn print(&mut self, line: &str) {
        println!("{line}");
    }

    fn alert(&mut self, line: &str) {
        println!("{}", line.red());
    }
}

/// Terminal that replays a fixed script of input lines.
///
/// `None` entries in the script act as a Ctrl-C. Reading past the end of the
/// script also reports [`Interrupted`], like Ctrl-D on a real terminal.
#[derive(Debug, Default)]
pub struct ScriptedTerminal {
    input: VecDeque<Option<String>>,
    prompts: Vec<String>,
    output: Vec<String>,
}

impl ScriptedTerminal {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input: lines.into_iter().map(|line| Some(line.into())).collect(),
            ..Self::default()
        }
    }

    pub fn push_line(&mut self, line: impl Into<String>) -> &mut Self {
        self.input.push_back(Some(line.into()));
        self
    }

    pub fn push_interrupt(&mut self) -> &mut Self {
        self.input.push_back(None);
        self
    }

    /// Every prompt shown so far, in order.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    /// Every printed line so far, in order.
    pub fn output(&self) -> &[String] {
        &self.output
    }

    pub fn printed(&self, needle: &str) -> bool {
        self.output.iter().any(|line| line.contains(needle))
    }

    /// Number of scripted entries not consumed yet.
    pub fn remaining(&self) -> usize {
        self.input.len()
    }
}

impl Terminal for ScriptedTerminal {
    fn read_line(&mut self, prompt: &str) -> Result<String, Interrupted> {
        self.prompts.push(prompt.to_string());
        match self.input.pop_front() {
            Some(Some(line)) => Ok(line),
            Some(None) | None => Err(Interrupted),
        }
    }

    fn print(&mut self, line: &str) {
        self.output.extend(line.lines().map(str::to_string));
        if line.is_empty() {
            self.output.push(String::new());
        }
    }
}
