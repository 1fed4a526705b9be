//! Neo4j driver adapter and its connection settings.

mod session;
mod settings;

pub use session::Neo4jSession;
pub use settings::{
    ConnectionSettings, DEFAULT_PASSWORD, DEFAULT_URI, DEFAULT_USER, effective_uri,
};
