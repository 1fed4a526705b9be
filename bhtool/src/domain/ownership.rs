//! Outcomes, reports and settings for ownership marking.

use std::num::NonZeroUsize;

use super::EntityType;

/// Step of the check-then-mark sequence that failed for an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    /// Reading the current `owned` flag failed.
    Lookup,
    /// Writing the `owned` flag failed.
    Mark,
}

/// Result of processing one identifier in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    /// The node was unowned and is now flagged.
    Marked,
    /// The node was already flagged; nothing was written.
    AlreadyOwned,
    /// No node of the requested type carries this name.
    NotFound,
    /// A statement failed for this item; the batch carried on.
    Failed {
        /// Step that failed.
        stage: FailureStage,
        /// Store-supplied reason.
        message: String,
    },
}

impl ItemOutcome {
    /// Short label used in structured logs.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Marked => "marked",
            Self::AlreadyOwned => "already_owned",
            Self::NotFound => "not_found",
            Self::Failed { .. } => "failed",
        }
    }
}

/// Aggregate tally of a completed batch.
///
/// ## Invariants
/// - [`BatchReport::total`] equals the number of identifiers submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    entity_type: EntityType,
    marked: usize,
    already_owned: usize,
    not_found: usize,
    failed: usize,
}

impl BatchReport {
    /// Empty report for a batch of `entity_type` entities.
    #[must_use]
    pub const fn new(entity_type: EntityType) -> Self {
        Self {
            entity_type,
            marked: 0,
            already_owned: 0,
            not_found: 0,
            failed: 0,
        }
    }

    /// Count one outcome.
    pub fn record(&mut self, outcome: &ItemOutcome) {
        match outcome {
            ItemOutcome::Marked => self.marked += 1,
            ItemOutcome::AlreadyOwned => self.already_owned += 1,
            ItemOutcome::NotFound => self.not_found += 1,
            ItemOutcome::Failed { .. } => self.failed += 1,
        }
    }

    /// Entity type the batch targeted.
    #[must_use]
    pub const fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    /// Items flagged by this batch.
    #[must_use]
    pub const fn marked(&self) -> usize {
        self.marked
    }

    /// Items that were already flagged.
    #[must_use]
    pub const fn already_owned(&self) -> usize {
        self.already_owned
    }

    /// Items with no matching node.
    #[must_use]
    pub const fn not_found(&self) -> usize {
        self.not_found
    }

    /// Items whose lookup or mark statement failed.
    #[must_use]
    pub const fn failed(&self) -> usize {
        self.failed
    }

    /// Number of items processed.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.marked + self.already_owned + self.not_found + self.failed
    }

    /// Human-readable summary, one line per tally.
    ///
    /// # Examples
    /// ```
    /// use bhtool::domain::{BatchReport, EntityType, ItemOutcome};
    ///
    /// let mut report = BatchReport::new(EntityType::User);
    /// report.record(&ItemOutcome::Marked);
    ///
    /// let lines = report.summary_lines();
    /// assert_eq!(lines[1], "1 user was marked as owned");
    /// assert_eq!(lines[2], "There were 0 users already marked as owned");
    /// ```
    #[must_use]
    pub fn summary_lines(&self) -> Vec<String> {
        let kind = self.entity_type;
        let mut lines = vec![
            "Operation finished".to_owned(),
            format!(
                "{} {} {} marked as owned",
                self.marked,
                kind.noun(self.marked),
                was_were(self.marked)
            ),
            format!(
                "There {} {} {} already marked as owned",
                was_were(self.already_owned),
                self.already_owned,
                kind.noun(self.already_owned)
            ),
            format!(
                "{} {} {}",
                self.not_found,
                kind.noun(self.not_found),
                if self.not_found == 1 {
                    "does not exist"
                } else {
                    "do not exist"
                }
            ),
        ];
        if self.failed > 0 {
            lines.push(format!(
                "{} {} could not be processed",
                self.failed,
                kind.noun(self.failed)
            ));
        }
        lines
    }
}

const fn was_were(count: usize) -> &'static str {
    if count == 1 { "was" } else { "were" }
}

/// What to do when reading an item's `owned` flag fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LookupFailurePolicy {
    /// Report the item as failed and skip the write.
    #[default]
    Skip,
    /// Attempt the write anyway, as if the item were unowned.
    Mark,
}

/// Engine settings, passed by value into [`super::OwnershipService::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnershipSettings {
    /// Maximum number of items in flight against the store.
    pub concurrency: NonZeroUsize,
    /// Handling of failed lookups.
    pub lookup_failure: LookupFailurePolicy,
}

impl Default for OwnershipSettings {
    fn default() -> Self {
        Self {
            concurrency: NonZeroUsize::MIN,
            lookup_failure: LookupFailurePolicy::default(),
        }
    }
}
