//! `GraphSession` adapter backed by the neo4rs Bolt driver.

use futures_util::{StreamExt, stream};
use neo4rs::{ConfigBuilder, Graph, Row};
use tracing::{debug, info};

use crate::domain::ports::{
    GraphSession, GraphSessionError, GraphValue, Record, RecordStream, Statement,
};

use super::ConnectionSettings;

const CONNECTIVITY_CHECK: &str = "RETURN 1 AS ok";

/// Open session against a Neo4j-compatible store.
///
/// The underlying driver keeps a small connection pool, so one session can
/// serve several in-flight statements.
#[derive(Clone)]
pub struct Neo4jSession {
    graph: Graph,
}

impl Neo4jSession {
    /// Connect using `settings` and confirm the store answers a trivial
    /// statement.
    ///
    /// `pool_size` bounds the number of driver connections; callers size it
    /// to the number of statements they keep in flight.
    ///
    /// # Errors
    ///
    /// Returns [`GraphSessionError::Connection`] if the configuration is
    /// rejected, the store is unreachable, or authentication fails.
    pub async fn connect(
        settings: &ConnectionSettings,
        pool_size: usize,
    ) -> Result<Self, GraphSessionError> {
        let uri = settings.effective_uri();
        let mut builder = ConfigBuilder::default()
            .uri(uri.as_str())
            .user(settings.user())
            .password(settings.password())
            .max_connections(pool_size.max(1));
        if let Some(database) = settings.database() {
            builder = builder.db(database);
        }
        let config = builder
            .build()
            .map_err(|error| GraphSessionError::connection(error.to_string()))?;

        let graph = Graph::connect(config)
            .await
            .map_err(|error| GraphSessionError::connection(error.to_string()))?;

        let session = Self { graph };
        session.verify_connectivity().await?;
        info!(%uri, user = settings.user(), "connected to graph store");
        Ok(session)
    }

    async fn verify_connectivity(&self) -> Result<(), GraphSessionError> {
        let mut rows = self
            .graph
            .execute(neo4rs::query(CONNECTIVITY_CHECK))
            .await
            .map_err(|error| GraphSessionError::connection(error.to_string()))?;
        rows.next()
            .await
            .map_err(|error| GraphSessionError::connection(error.to_string()))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl GraphSession for Neo4jSession {
    async fn run(&self, statement: Statement) -> Result<RecordStream, GraphSessionError> {
        debug!(statement = statement.text(), "running graph statement");

        let mut query = neo4rs::query(statement.text());
        for (name, value) in statement.params() {
            query = query.param(name, value.clone());
        }

        let rows = self.graph.execute(query).await.map_err(classify_error)?;
        let columns = statement.columns();

        let records = stream::try_unfold(rows, move |mut cursor| async move {
            match cursor.next().await.map_err(classify_error)? {
                Some(row) => Ok(Some((record_from_row(&row, columns), cursor))),
                None => Ok(None),
            }
        });
        Ok(records.boxed())
    }
}

/// Sort driver errors into connection and query classes.
fn classify_error(error: neo4rs::Error) -> GraphSessionError {
    match error {
        neo4rs::Error::IOError { .. }
        | neo4rs::Error::ConnectionError
        | neo4rs::Error::AuthenticationError(_) => GraphSessionError::connection(error.to_string()),
        other => GraphSessionError::query(other.to_string()),
    }
}

fn record_from_row(row: &Row, columns: &[&str]) -> Record {
    columns.iter().fold(Record::new(), |record, column| {
        record.with(*column, cell(row, column))
    })
}

fn cell(row: &Row, column: &str) -> GraphValue {
    if let Ok(value) = row.get::<Option<bool>>(column) {
        return value.map_or(GraphValue::Null, GraphValue::Boolean);
    }
    if let Ok(value) = row.get::<i64>(column) {
        return GraphValue::Integer(value);
    }
    if let Ok(value) = row.get::<String>(column) {
        return GraphValue::String(value);
    }
    GraphValue::Unsupported
}
