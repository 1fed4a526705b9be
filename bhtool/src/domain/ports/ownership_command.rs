//! Driving port for marking entities as owned.

use async_trait::async_trait;

use crate::domain::{BatchReport, EntityName, EntityType, Error};

use super::OutcomeSink;

/// A batch of entities to flag, all of one type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkOwnedRequest {
    /// Identifiers in submission order; duplicates are processed each time.
    pub names: Vec<EntityName>,
    /// Kind of node the names refer to.
    pub entity_type: EntityType,
}

/// Domain use-case port for flagging entities as owned.
#[async_trait]
pub trait OwnershipCommand: Send + Sync {
    /// Process every name in order, reporting each outcome to `sink` as it is
    /// decided and the final tally once the batch completes.
    ///
    /// Fails only when the store becomes unusable; per-item failures are
    /// reported as outcomes.
    async fn mark_owned(
        &self,
        request: MarkOwnedRequest,
        sink: &mut dyn OutcomeSink,
    ) -> Result<BatchReport, Error>;
}
