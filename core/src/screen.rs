use console::{style, Term};
use std::sync::{Mutex, MutexGuard};

pub const INVALID_COMMAND: &str = "That command is invalid in the current state!";

/// Where the operator sees things.
pub trait Screen: Send + Sync + 'static {
    fn prompt(&self);
    /// Text that arrived from a peer.
    fn incoming(&self, text: &str);
    fn status(&self, text: &str);
    fn error(&self, text: &str);
}

/// Colored output on the process's own terminal.
#[derive(Debug, Clone)]
pub struct Terminal {
    term: Term,
}

impl Terminal {
    pub fn stdout() -> Self {
        Self {
            term: Term::stdout(),
        }
    }

    fn line(&self, text: &str) {
        if let Err(err) = self.term.write_line(text) {
            tracing::warn!(%err, "failed to write to terminal");
        }
    }
}

impl Screen for Terminal {
    fn prompt(&self) {
        let prompt = format!("{}{}", style("UserInput").cyan(), style(" --> ").magenta());
        if let Err(err) = self.term.write_str(&prompt) {
            tracing::warn!(%err, "failed to write to terminal");
        }
    }

    fn incoming(&self, text: &str) {
        self.line(&style(text).blue().to_string());
    }

    fn status(&self, text: &str) {
        self.line(&style(text).yellow().to_string());
    }

    fn error(&self, text: &str) {
        self.line(&style(text).red().to_string());
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Incoming(String),
    Status(String),
    Error(String),
}

/// Keeps everything it is shown, for embedding and inspection.
#[derive(Debug, Default)]
pub struct Recorder {
    lines: Mutex<Vec<Line>>,
}

impl Recorder {
    pub fn lines(&self) -> Vec<Line> {
        self.lock().clone()
    }

    /// Texts shown as arriving from peers, in order.
    pub fn received(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|line| match line {
                Line::Incoming(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Line>> {
        // a panicking writer cannot leave the vector half-pushed
        self.lines.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn push(&self, line: Line) {
        self.lock().push(line);
    }
}

impl Screen for Recorder {
    fn prompt(&self) {}

    fn incoming(&self, text: &str) {
        self.push(Line::Incoming(text.to_owned()));
    }

    fn status(&self, text: &str) {
        self.push(Line::Status(text.to_owned()));
    }

    fn error(&self, text: &str) {
        self.push(Line::Error(text.to_owned()));
    }
}
