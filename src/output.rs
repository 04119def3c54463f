use std::io::{self, Write};

use serde::Serialize;

use crate::error::AppResult;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum OutputMode {
    Text,
    Json,
}

/// Writes command results to stdout as plain lines or pretty JSON.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    mode: OutputMode,
}

impl Output {
    pub fn new(json: bool) -> Self {
        let mode = if json {
            OutputMode::Json
        } else {
            OutputMode::Text
        };
        Self { mode }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    pub fn emit<T: Serialize>(&self, text_line: &str, json_value: &T) -> AppResult<()> {
        self.emit_lines([text_line], json_value)
    }

    /// Text mode prints each line; JSON mode prints only `json_value`.
    pub fn emit_lines<I, S, T>(&self, lines: I, json_value: &T) -> AppResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        T: Serialize,
    {
        let mut stdout = io::stdout().lock();
        match self.mode {
            OutputMode::Text => {
                for line in lines {
                    writeln!(stdout, "{}", line.as_ref())?;
                }
            }
            OutputMode::Json => {
                serde_json::to_writer_pretty(&mut stdout, json_value)?;
                writeln!(stdout)?;
            }
        }
        Ok(())
    }
}
