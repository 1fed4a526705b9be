//! Ownership marking for BloodHound attack graphs.
//!
//! During an engagement, compromised principals are flagged with
//! `owned = true` on their graph node so path queries can start from them.
//! This crate flags users and computers by name, reports what happened to
//! each one, and lists what is already flagged.
//!
//! Layout follows ports and adapters:
//! - [`domain`]: entity types, outcomes, the ownership engine and its ports;
//! - [`outbound`]: Cypher statements and the Neo4j driver session;
//! - [`inbound`]: the command-line surface and console rendering.

pub mod domain;
pub mod inbound;
pub mod outbound;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
