//! Port for reading and writing the `owned` flag on graph entities.
//!
//! The [`OwnershipRepository`] trait is the query layer the ownership engine
//! drives. Each operation is scoped to one [`EntityType`]; adapters pick the
//! statements for that type and bind the entity name as a parameter.

use async_trait::async_trait;
use futures_util::stream::BoxStream;

use crate::domain::{EntityName, EntityType};

use super::define_port_error;

define_port_error! {
    /// Errors raised by ownership repository adapters.
    pub enum OwnershipRepositoryError {
        /// The store cannot be reached; nothing further can succeed.
        Connection { message: String } =>
            "ownership repository connection failed: {message}",
        /// A single statement failed.
        Query { message: String } =>
            "ownership repository query failed: {message}",
    }
}

/// Names of owned entities, produced as the store returns them.
pub type OwnedNames = BoxStream<'static, Result<String, OwnershipRepositoryError>>;

/// Port for ownership lookups and mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OwnershipRepository: Send + Sync {
    /// Whether the entity carries `owned = true`.
    ///
    /// Returns `Ok(false)` when no entity matches or the flag is absent or not
    /// a boolean. Store failures are returned as errors, never as `false`.
    async fn check_owned(
        &self,
        name: &EntityName,
        entity_type: EntityType,
    ) -> Result<bool, OwnershipRepositoryError>;

    /// Set `owned = true` on the entity.
    ///
    /// Returns `Ok(true)` if an entity matched, `Ok(false)` if none exists.
    async fn set_owned(
        &self,
        name: &EntityName,
        entity_type: EntityType,
    ) -> Result<bool, OwnershipRepositoryError>;

    /// Stream the names of every owned entity of `entity_type`.
    ///
    /// Order is whatever the store returns.
    async fn owned_names(
        &self,
        entity_type: EntityType,
    ) -> Result<OwnedNames, OwnershipRepositoryError>;
}
