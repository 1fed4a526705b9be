//! Operator-facing rendering of ownership results.
//!
//! Lines carry the familiar markers: `[+]` for a fresh mark, `[-]` for an
//! item that needed nothing, `[!]` for a failed item and `[*]` for the batch
//! summary. Listed names are printed bare, one per line.

use std::io::Write;

use tracing::warn;

use crate::domain::ports::OutcomeSink;
use crate::domain::{BatchReport, EntityName, FailureStage, ItemOutcome, UnsupportedEntityType};

/// Closing line of every completed batch.
pub const SIGN_OFF: &str = "Happy Graphing!";

/// [`OutcomeSink`] writing plain text lines to `W`.
#[derive(Debug)]
pub struct ConsoleReporter<W> {
    out: W,
}

impl<W> ConsoleReporter<W> {
    /// Reporter writing to `out`.
    #[must_use]
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    /// Give back the underlying writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ConsoleReporter<W> {
    /// Explain that a request named an entity type with no descriptor.
    pub fn unsupported(&mut self, error: &UnsupportedEntityType) {
        self.line(&format!("Nothing happened: {error}"));
    }

    fn line(&mut self, text: &str) {
        if let Err(error) = writeln!(self.out, "{text}") {
            warn!(%error, "failed to write console output");
        }
    }
}

impl<W: Write + Send> OutcomeSink for ConsoleReporter<W> {
    fn item(&mut self, name: &EntityName, outcome: &ItemOutcome) {
        let text = match outcome {
            ItemOutcome::Marked => format!("[+] {name} marked as owned"),
            ItemOutcome::AlreadyOwned => format!("[-] {name} already marked as owned"),
            ItemOutcome::NotFound => format!("[-] {name} does not exist"),
            ItemOutcome::Failed {
                stage: FailureStage::Lookup,
                message,
            } => format!("[!] {name} could not be checked: {message}"),
            ItemOutcome::Failed {
                stage: FailureStage::Mark,
                message,
            } => format!("[!] {name} could not be marked: {message}"),
        };
        self.line(&text);
    }

    fn finished(&mut self, report: &BatchReport) {
        for summary in report.summary_lines() {
            self.line(&format!("[*] {summary}"));
        }
        self.line(&format!("[*] {SIGN_OFF}"));
    }

    fn owned_name(&mut self, name: &str) {
        self.line(name);
    }
}
