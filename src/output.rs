//! Operator-facing output channel.
//!
//! Report lines ("would remove", per-root descriptions, summaries) are plain
//! text for people, not a protocol. Diagnostics go through `tracing`.

use std::fmt::Display;
use std::io::{self, Write};

#[derive(Debug)]
enum Sink {
    Stdout,
    Captured(Vec<String>),
}

/// Line-oriented output, optionally silenced.
#[derive(Debug)]
pub struct Output {
    silent: bool,
    sink: Sink,
}

impl Output {
    /// Print to stdout unless `silent`.
    pub fn stdout(silent: bool) -> Self {
        Self {
            silent,
            sink: Sink::Stdout,
        }
    }

    /// Collect lines in memory instead of printing them.
    pub fn captured() -> Self {
        Self {
            silent: false,
            sink: Sink::Captured(Vec::new()),
        }
    }

    pub fn is_silent(&self) -> bool {
        self.silent
    }

    pub fn line(&mut self, text: impl Display) {
        if self.silent {
            return;
        }
        match &mut self.sink {
            Sink::Stdout => {
                // A closed pipe (e.g. `| head`) must not abort a deletion pass
                let _ = writeln!(io::stdout().lock(), "{}", text);
            }
            Sink::Captured(lines) => lines.push(text.to_string()),
        }
    }

    /// Lines collected so far; always empty for stdout output.
    pub fn lines(&self) -> &[String] {
        match &self.sink {
            Sink::Stdout => &[],
            Sink::Captured(lines) => lines,
        }
    }
}
