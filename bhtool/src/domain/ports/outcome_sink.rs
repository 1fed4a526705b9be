//! Port receiving progress from the ownership engine.
//!
//! The engine reports each item as soon as it is decided, so an operator
//! watching a long batch sees progress line by line. Implementations must not
//! fail: rendering problems are the sink's own concern.

use crate::domain::{BatchReport, EntityName, ItemOutcome};

/// Receiver for per-item outcomes, batch summaries and listed names.
pub trait OutcomeSink: Send {
    /// One item of a batch has been decided.
    fn item(&mut self, name: &EntityName, outcome: &ItemOutcome);

    /// The batch finished.
    fn finished(&mut self, report: &BatchReport);

    /// An owned entity was listed.
    fn owned_name(&mut self, name: &str);
}

/// Sink that keeps everything it receives, in arrival order.
#[cfg(any(test, feature = "test-support"))]
#[derive(Debug, Default, Clone)]
pub struct RecordingOutcomeSink {
    /// Items in the order they were reported.
    pub items: Vec<(EntityName, ItemOutcome)>,
    /// Reports received via [`OutcomeSink::finished`].
    pub reports: Vec<BatchReport>,
    /// Names received via [`OutcomeSink::owned_name`].
    pub names: Vec<String>,
}

#[cfg(any(test, feature = "test-support"))]
impl OutcomeSink for RecordingOutcomeSink {
    fn item(&mut self, name: &EntityName, outcome: &ItemOutcome) {
        self.items.push((name.clone(), outcome.clone()));
    }

    fn finished(&mut self, report: &BatchReport) {
        self.reports.push(*report);
    }

    fn owned_name(&mut self, name: &str) {
        self.names.push(name.to_owned());
    }
}
