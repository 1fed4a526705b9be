//! Port for executing parameterized statements against a graph store.
//!
//! The [`GraphSession`] trait is the narrow seam between statement-building
//! adapters and a concrete driver. A session runs one [`Statement`] at a time
//! and hands back a [`RecordStream`]: a single-pass cursor over the returned
//! rows which may itself fail part-way through.

use std::collections::BTreeMap;

use async_trait::async_trait;
use futures_util::stream::BoxStream;

use super::define_port_error;

define_port_error! {
    /// Errors raised by graph session adapters.
    pub enum GraphSessionError {
        /// The session cannot reach the store.
        Connection { message: String } => "graph session connection failed: {message}",
        /// The store rejected or failed the statement.
        Query { message: String } => "graph statement failed: {message}",
    }
}

/// A single value read from a returned column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphValue {
    /// Explicit null or an absent property.
    Null,
    /// Boolean property.
    Boolean(bool),
    /// Integer property.
    Integer(i64),
    /// String property.
    String(String),
    /// Any value the tool does not interpret (lists, nodes, floats, ...).
    Unsupported,
}

impl GraphValue {
    /// Boolean payload, if this is a boolean.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    /// String payload, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value.as_str()),
            _ => None,
        }
    }
}

/// One returned row, keyed by column alias.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    values: BTreeMap<String, GraphValue>,
}

impl Record {
    /// Empty row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: GraphValue) -> Self {
        self.insert(column, value);
        self
    }

    /// Set `column` to `value`, replacing any previous value.
    pub fn insert(&mut self, column: impl Into<String>, value: GraphValue) {
        self.values.insert(column.into(), value);
    }

    /// Value of `column`; `None` when the row has no such column.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&GraphValue> {
        self.values.get(column)
    }
}

/// A fixed statement plus its bound parameters.
///
/// Statement text is always a compile-time constant; caller-supplied values
/// travel only as parameters and are never spliced into the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    text: &'static str,
    params: BTreeMap<&'static str, String>,
    columns: &'static [&'static str],
}

impl Statement {
    /// Statement returning the given column aliases.
    #[must_use]
    pub const fn new(text: &'static str, columns: &'static [&'static str]) -> Self {
        Self {
            text,
            params: BTreeMap::new(),
            columns,
        }
    }

    /// Bind a string parameter referenced as `$name` in the text.
    #[must_use]
    pub fn param(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.params.insert(name, value.into());
        self
    }

    /// Statement text.
    #[must_use]
    pub const fn text(&self) -> &'static str {
        self.text
    }

    /// Bound parameters.
    #[must_use]
    pub const fn params(&self) -> &BTreeMap<&'static str, String> {
        &self.params
    }

    /// Column aliases each returned [`Record`] carries.
    #[must_use]
    pub const fn columns(&self) -> &'static [&'static str] {
        self.columns
    }
}

/// Lazy, single-pass cursor over returned rows.
pub type RecordStream = BoxStream<'static, Result<Record, GraphSessionError>>;

/// Port for running statements against an open graph session.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GraphSession: Send + Sync {
    /// Execute `statement` and return a cursor over its rows.
    async fn run(&self, statement: Statement) -> Result<RecordStream, GraphSessionError>;
}
