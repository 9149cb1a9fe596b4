//! Structured diagnostics collected while walking.
//!
//! Every entry is also forwarded to `tracing`, so a subscriber sees the walk
//! live while the caller keeps an inspectable record it can render later.

use std::fmt::Write as _;

const INDENT: &str = "    ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Trace,
    Info,
    Warn,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: Level,
    /// Tree depth the message was emitted at (used for indentation).
    pub depth: usize,
    pub message: String,
}

/// Caller-owned log sink passed through the walker and collector.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trace(&mut self, depth: usize, message: impl Into<String>) {
        let message = message.into();
        tracing::trace!(depth, "{message}");
        self.push(Level::Trace, depth, message);
    }

    pub fn info(&mut self, depth: usize, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(depth, "{message}");
        self.push(Level::Info, depth, message);
    }

    pub fn warn(&mut self, depth: usize, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(depth, "{message}");
        self.push(Level::Warn, depth, message);
    }

    fn push(&mut self, level: Level, depth: usize, message: String) {
        self.entries.push(Diagnostic {
            level,
            depth,
            message,
        });
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(|d| d.level == Level::Warn)
    }

    /// Render the log as text, one line per entry, indented by depth.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(&INDENT.repeat(entry.depth));
            if entry.level == Level::Warn {
                out.push_str("WARNING: ");
            }
            let _ = writeln!(out, "{}", entry.message);
        }
        out
    }
}
