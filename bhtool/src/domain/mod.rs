//! Domain primitives, ports and the ownership engine.
//!
//! Purpose: decide, for a batch of named graph entities, which ones need the
//! `owned` flag and keep an accurate tally, without knowing how the graph is
//! stored or how results are displayed.
//!
//! Public surface:
//! - `EntityType`, `EntityName`: what an operation targets.
//! - `ItemOutcome`, `BatchReport`: what an operation produced.
//! - `OwnershipService`: the engine, driven through
//!   `ports::OwnershipCommand` and `ports::OwnershipQuery`.
//! - `Error`, `ErrorCode`: failures that reach the caller.

pub mod entity;
pub mod error;
pub mod ownership;
mod ownership_service;
pub mod ports;

pub use self::entity::{EntityName, EntityNameValidationError, EntityType, UnsupportedEntityType};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::ownership::{
    BatchReport, FailureStage, ItemOutcome, LookupFailurePolicy, OwnershipSettings,
};
pub use self::ownership_service::OwnershipService;
