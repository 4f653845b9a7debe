//! Diagnostics sink for the output layer
//!
//! Failed inserts and other writer messages are mirrored to a plain-text
//! error stream (`sqlite.err` next to the database by default), one
//! `SQLite3 message, <text>` line each, and to `tracing`.

use crate::error::DbError;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::{error, warn};

/// Line prefix of every diagnostics message
pub const MESSAGE_PREFIX: &str = "SQLite3 message, ";

/// Destination for writer diagnostics
pub struct DiagnosticsSink {
    out: Option<BufWriter<File>>,
    messages: u64,
}

impl DiagnosticsSink {
    /// Create (truncate) the error stream at `path`
    pub fn to_file(path: &Path) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            out: Some(BufWriter::new(file)),
            messages: 0,
        })
    }

    /// Sink that only logs through `tracing`
    pub fn discard() -> Self {
        Self {
            out: None,
            messages: 0,
        }
    }

    /// Write one message line
    pub fn write_message(&mut self, message: &str) {
        self.messages += 1;
        warn!(target: "sim_sqlite::diagnostics", "{}", message);

        if let Some(out) = self.out.as_mut() {
            if let Err(e) = writeln!(out, "{MESSAGE_PREFIX}{message}") {
                error!(error = %e, "Failed to write diagnostics message");
            }
        }
    }

    /// Report a failed operation with the engine's error text
    pub fn report(&mut self, context: &str, err: &DbError) {
        self.write_message(&format!("{context}: {err}"));
    }

    /// Number of messages written so far
    pub fn message_count(&self) -> u64 {
        self.messages
    }

    pub fn flush(&mut self) -> io::Result<()> {
        match self.out.as_mut() {
            Some(out) => out.flush(),
            None => Ok(()),
        }
    }
}

impl Drop for DiagnosticsSink {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

impl std::fmt::Debug for DiagnosticsSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiagnosticsSink")
            .field("to_file", &self.out.is_some())
            .field("messages", &self.messages)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_messages_written_with_prefix() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sqlite.err");

        let mut sink = DiagnosticsSink::to_file(&path).unwrap();
        sink.write_message("Begin transaction failed");
        sink.report("Zones", &DbError::UnknownDictionary(7));
        sink.flush().unwrap();
        assert_eq!(sink.message_count(), 2);

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "SQLite3 message, Begin transaction failed");
        assert_eq!(
            lines[1],
            "SQLite3 message, Zones: Dictionary id 7 has no dictionary record"
        );
    }

    #[test]
    fn test_discard_counts_only() {
        let mut sink = DiagnosticsSink::discard();
        sink.write_message("ignored");
        assert_eq!(sink.message_count(), 1);
        sink.flush().unwrap();
    }
}
