//! Cypher adapters over the `GraphSession` port.
//!
//! Statement text lives in [`descriptors`]; [`CypherOwnershipRepository`]
//! binds names and interprets rows.

pub mod descriptors;
mod cypher_ownership_repository;

pub use cypher_ownership_repository::CypherOwnershipRepository;
pub use descriptors::{EntityTypeDescriptor, descriptor_for};
