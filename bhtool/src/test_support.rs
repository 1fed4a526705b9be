//! Test utilities for the bhtool crate.
//!
//! This module provides shared helpers for both unit tests (in `src/`) and
//! integration tests (in `tests/`). It is only compiled for tests or with the
//! `test-support` feature.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use futures_util::{StreamExt, stream};

use crate::domain::EntityType;
use crate::domain::ports::{
    GraphSession, GraphSessionError, GraphValue, Record, RecordStream, Statement,
};
use crate::outbound::graph::descriptor_for;
use crate::outbound::graph::descriptors::{NAME_COLUMN, NAME_PARAM, OWNED_COLUMN};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatementKind {
    Lookup,
    Mark,
    ListOwned,
}

#[derive(Debug, Clone)]
struct Node {
    entity_type: EntityType,
    name: String,
    owned: GraphValue,
}

#[derive(Debug, Default)]
struct GraphState {
    nodes: Vec<Node>,
    failing: Vec<String>,
    disconnected: bool,
    statements: usize,
    writes: usize,
}

/// In-memory [`GraphSession`] understanding the ownership statements.
///
/// Nodes keep their insertion order, which is also the order the owned list
/// is returned in. Failures can be injected per name or for the whole store.
#[derive(Debug, Default)]
pub struct InMemoryGraph {
    state: Mutex<GraphState>,
}

impl InMemoryGraph {
    /// Empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, GraphState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a node without an `owned` property.
    pub fn add_node(&self, entity_type: EntityType, name: &str) {
        self.add_node_with(entity_type, name, GraphValue::Null);
    }

    /// Add a node with `owned = true`.
    pub fn add_owned_node(&self, entity_type: EntityType, name: &str) {
        self.add_node_with(entity_type, name, GraphValue::Boolean(true));
    }

    /// Add a node whose `owned` property holds `owned`.
    pub fn add_node_with(&self, entity_type: EntityType, name: &str, owned: GraphValue) {
        self.lock().nodes.push(Node {
            entity_type,
            name: name.to_owned(),
            owned,
        });
    }

    /// Make every statement bound to `name` fail with a query error.
    pub fn fail_statements_for(&self, name: &str) {
        self.lock().failing.push(name.to_owned());
    }

    /// Make every subsequent statement fail with a connection error.
    pub fn disconnect(&self) {
        self.lock().disconnected = true;
    }

    /// Whether a node of `entity_type` named `name` carries `owned = true`.
    #[must_use]
    pub fn is_owned(&self, entity_type: EntityType, name: &str) -> bool {
        self.lock().nodes.iter().any(|node| {
            node.entity_type == entity_type
                && node.name == name
                && node.owned == GraphValue::Boolean(true)
        })
    }

    /// Number of statements run so far.
    #[must_use]
    pub fn statements(&self) -> usize {
        self.lock().statements
    }

    /// Number of mark statements run so far.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.lock().writes
    }
}

fn recognise(text: &str) -> Option<(EntityType, StatementKind)> {
    EntityType::ALL.into_iter().find_map(|entity_type| {
        let descriptor = descriptor_for(entity_type);
        let kind = if text == descriptor.lookup {
            StatementKind::Lookup
        } else if text == descriptor.mark {
            StatementKind::Mark
        } else if text == descriptor.list_owned {
            StatementKind::ListOwned
        } else {
            return None;
        };
        Some((entity_type, kind))
    })
}

impl GraphState {
    fn execute(&mut self, statement: &Statement) -> Result<Vec<Record>, GraphSessionError> {
        self.statements += 1;
        if self.disconnected {
            return Err(GraphSessionError::connection("in-memory graph disconnected"));
        }
        let (entity_type, kind) = recognise(statement.text()).ok_or_else(|| {
            GraphSessionError::query(format!("unrecognised statement: {}", statement.text()))
        })?;
        let bound = statement.params().get(NAME_PARAM).map(String::as_str);
        if let Some(name) = bound.filter(|name| self.failing.iter().any(|failing| failing == name))
        {
            return Err(GraphSessionError::query(format!(
                "injected failure for {name}"
            )));
        }

        let matches_name =
            |node: &Node| node.entity_type == entity_type && Some(node.name.as_str()) == bound;
        let rows = match kind {
            StatementKind::Lookup => self
                .nodes
                .iter()
                .filter(|node| matches_name(&**node))
                .map(|node| Record::new().with(OWNED_COLUMN, node.owned.clone()))
                .collect(),
            StatementKind::Mark => {
                self.writes += 1;
                self.nodes
                    .iter_mut()
                    .filter(|node| matches_name(&**node))
                    .map(|node| {
                        node.owned = GraphValue::Boolean(true);
                        Record::new().with(NAME_COLUMN, GraphValue::String(node.name.clone()))
                    })
                    .collect()
            }
            StatementKind::ListOwned => self
                .nodes
                .iter()
                .filter(|node| {
                    node.entity_type == entity_type && node.owned == GraphValue::Boolean(true)
                })
                .map(|node| Record::new().with(NAME_COLUMN, GraphValue::String(node.name.clone())))
                .collect(),
        };
        Ok(rows)
    }
}

#[async_trait]
impl GraphSession for InMemoryGraph {
    async fn run(&self, statement: Statement) -> Result<RecordStream, GraphSessionError> {
        let rows = self.lock().execute(&statement)?;
        Ok(stream::iter(rows.into_iter().map(Ok)).boxed())
    }
}
