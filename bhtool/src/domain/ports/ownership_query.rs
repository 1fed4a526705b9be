//! Driving port for listing owned entities.

use async_trait::async_trait;

use crate::domain::{EntityType, Error};

use super::OutcomeSink;

/// Domain use-case port for reading which entities are owned.
#[async_trait]
pub trait OwnershipQuery: Send + Sync {
    /// Emit every owned entity name of `entity_type` to `sink` as it arrives,
    /// returning how many were emitted.
    async fn list_owned(
        &self,
        entity_type: EntityType,
        sink: &mut dyn OutcomeSink,
    ) -> Result<usize, Error>;
}
