//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod graph_session;
mod outcome_sink;
mod ownership_command;
mod ownership_query;
mod ownership_repository;

#[cfg(test)]
pub use graph_session::MockGraphSession;
pub use graph_session::{
    GraphSession, GraphSessionError, GraphValue, Record, RecordStream, Statement,
};
pub use outcome_sink::OutcomeSink;
#[cfg(any(test, feature = "test-support"))]
pub use outcome_sink::RecordingOutcomeSink;
pub use ownership_command::{MarkOwnedRequest, OwnershipCommand};
pub use ownership_query::OwnershipQuery;
#[cfg(test)]
pub use ownership_repository::MockOwnershipRepository;
pub use ownership_repository::{OwnedNames, OwnershipRepository, OwnershipRepositoryError};
