//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **graph**: Cypher statements behind the `OwnershipRepository` port,
//!   runnable on any `GraphSession`.
//! - **neo4j**: the Bolt driver session and its connection settings.
//!
//! Adapters translate between domain types and driver representations. They
//! contain no business logic.

pub mod graph;
pub mod neo4j;
