//! Cypher-backed `OwnershipRepository` implementation.
//!
//! This adapter implements the domain's `OwnershipRepository` port on top of
//! any [`GraphSession`]. It picks the statement templates for the requested
//! entity type, binds the entity name as the only parameter and interprets the
//! returned rows.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::{StreamExt, TryStreamExt, future};
use tracing::debug;

use crate::domain::ports::{
    GraphSession, GraphSessionError, GraphValue, OwnedNames, OwnershipRepository,
    OwnershipRepositoryError, Record, Statement,
};
use crate::domain::{EntityName, EntityType};

use super::descriptors::{NAME_COLUMN, NAME_PARAM, OWNED_COLUMN, descriptor_for};

const LOOKUP_COLUMNS: &[&str] = &[OWNED_COLUMN];
const NAME_COLUMNS: &[&str] = &[NAME_COLUMN];

/// Cypher implementation of the `OwnershipRepository` port.
#[derive(Clone)]
pub struct CypherOwnershipRepository<S> {
    session: Arc<S>,
}

impl<S> CypherOwnershipRepository<S> {
    /// Create a new repository running statements on `session`.
    #[must_use]
    pub const fn new(session: Arc<S>) -> Self {
        Self { session }
    }
}

/// Map session errors to domain ownership repository errors.
fn map_session_error(error: GraphSessionError) -> OwnershipRepositoryError {
    match error {
        GraphSessionError::Connection { message } => {
            OwnershipRepositoryError::connection(message)
        }
        GraphSessionError::Query { message } => OwnershipRepositoryError::query(message),
    }
}

impl<S> CypherOwnershipRepository<S>
where
    S: GraphSession,
{
    async fn first_row(
        &self,
        statement: Statement,
    ) -> Result<Option<Record>, OwnershipRepositoryError> {
        let mut rows = self
            .session
            .run(statement)
            .await
            .map_err(map_session_error)?;
        rows.try_next().await.map_err(map_session_error)
    }
}

#[async_trait]
impl<S> OwnershipRepository for CypherOwnershipRepository<S>
where
    S: GraphSession,
{
    async fn check_owned(
        &self,
        name: &EntityName,
        entity_type: EntityType,
    ) -> Result<bool, OwnershipRepositoryError> {
        let descriptor = descriptor_for(entity_type);
        let statement =
            Statement::new(descriptor.lookup, LOOKUP_COLUMNS).param(NAME_PARAM, name.as_ref());

        let row = self.first_row(statement).await?;
        let owned = match row.as_ref().and_then(|record| record.get(OWNED_COLUMN)) {
            Some(GraphValue::Boolean(flag)) => *flag,
            Some(GraphValue::Null) | None => false,
            Some(other) => {
                debug!(%entity_type, %name, value = ?other, "non-boolean owned flag treated as unowned");
                false
            }
        };
        Ok(owned)
    }

    async fn set_owned(
        &self,
        name: &EntityName,
        entity_type: EntityType,
    ) -> Result<bool, OwnershipRepositoryError> {
        let descriptor = descriptor_for(entity_type);
        let statement =
            Statement::new(descriptor.mark, NAME_COLUMNS).param(NAME_PARAM, name.as_ref());

        Ok(self.first_row(statement).await?.is_some())
    }

    async fn owned_names(
        &self,
        entity_type: EntityType,
    ) -> Result<OwnedNames, OwnershipRepositoryError> {
        let descriptor = descriptor_for(entity_type);
        let statement = Statement::new(descriptor.list_owned, NAME_COLUMNS);

        let rows = self
            .session
            .run(statement)
            .await
            .map_err(map_session_error)?;

        let names = rows
            .map_err(map_session_error)
            .try_filter_map(move |record| {
                let name = record
                    .get(NAME_COLUMN)
                    .and_then(GraphValue::as_str)
                    .map(str::to_owned);
                if name.is_none() {
                    debug!(%entity_type, "skipping owned node without a string name");
                }
                future::ready(Ok(name))
            })
            .boxed();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    //! Statement construction and row interpretation coverage.

    use futures_util::stream;
    use rstest::rstest;

    use super::*;
    use crate::domain::ports::{MockGraphSession, RecordStream};

    fn name(raw: &str) -> EntityName {
        EntityName::new(raw).expect("valid entity name")
    }

    fn rows(records: Vec<Record>) -> RecordStream {
        stream::iter(records.into_iter().map(Ok)).boxed()
    }

    fn repository(session: MockGraphSession) -> CypherOwnershipRepository<MockGraphSession> {
        CypherOwnershipRepository::new(Arc::new(session))
    }

    #[rstest]
    #[case(vec![Record::new().with("owned", GraphValue::Boolean(true))], true)]
    #[case(vec![Record::new().with("owned", GraphValue::Boolean(false))], false)]
    #[case(vec![Record::new().with("owned", GraphValue::Null)], false)]
    #[case(vec![Record::new()], false)]
    #[case(vec![Record::new().with("owned", GraphValue::String("true".to_owned()))], false)]
    #[case(Vec::new(), false)]
    #[tokio::test]
    async fn check_owned_interprets_lookup_rows(
        #[case] records: Vec<Record>,
        #[case] expected: bool,
    ) {
        let mut session = MockGraphSession::new();
        session
            .expect_run()
            .withf(|statement: &Statement| {
                statement.text() == "MATCH (n:User) WHERE n.name = $name RETURN n.owned AS owned"
                    && statement.params().get("name").map(String::as_str) == Some("ALICE@CORP.COM")
                    && statement.columns() == ["owned"]
            })
            .times(1)
            .return_once(move |_| Ok(rows(records)));

        let owned = repository(session)
            .check_owned(&name("ALICE@CORP.COM"), EntityType::User)
            .await
            .expect("lookup succeeds");

        assert_eq!(owned, expected);
    }

    #[rstest]
    #[case(vec![Record::new().with("name", GraphValue::String("WS01".to_owned()))], true)]
    #[case(Vec::new(), false)]
    #[tokio::test]
    async fn set_owned_reports_whether_a_node_matched(
        #[case] records: Vec<Record>,
        #[case] expected: bool,
    ) {
        let mut session = MockGraphSession::new();
        session
            .expect_run()
            .withf(|statement: &Statement| {
                statement.text().contains("MATCH (n:Computer)")
                    && statement.text().contains("SET n.owned = true")
                    && statement.params().get("name").map(String::as_str) == Some("WS01")
            })
            .times(1)
            .return_once(move |_| Ok(rows(records)));

        let matched = repository(session)
            .set_owned(&name("WS01"), EntityType::Computer)
            .await
            .expect("mark succeeds");

        assert_eq!(matched, expected);
    }

    #[rstest]
    #[case(GraphSessionError::connection("refused"), true)]
    #[case(GraphSessionError::query("syntax"), false)]
    #[tokio::test]
    async fn session_errors_keep_their_class(
        #[case] error: GraphSessionError,
        #[case] is_connection: bool,
    ) {
        let mut session = MockGraphSession::new();
        session.expect_run().times(1).return_once(move |_| Err(error));

        let err = repository(session)
            .check_owned(&name("BOB@CORP.COM"), EntityType::User)
            .await
            .expect_err("lookup fails");

        assert_eq!(
            matches!(err, OwnershipRepositoryError::Connection { .. }),
            is_connection
        );
    }

    #[tokio::test]
    async fn cursor_errors_surface_from_lookup() {
        let mut session = MockGraphSession::new();
        session.expect_run().times(1).return_once(|_| {
            Ok(stream::iter(vec![Err(GraphSessionError::query("deadlock"))]).boxed())
        });

        let err = repository(session)
            .set_owned(&name("BOB@CORP.COM"), EntityType::User)
            .await
            .expect_err("cursor failure surfaces");

        assert_eq!(err, OwnershipRepositoryError::query("deadlock"));
    }

    #[tokio::test]
    async fn owned_names_streams_string_names_only() {
        let mut session = MockGraphSession::new();
        session
            .expect_run()
            .withf(|statement: &Statement| {
                statement.text() == "MATCH (n:Computer) WHERE n.owned = true RETURN n.name AS name"
                    && statement.params().is_empty()
            })
            .times(1)
            .return_once(|_| {
                Ok(rows(vec![
                    Record::new().with("name", GraphValue::String("WS01.CORP.COM".to_owned())),
                    Record::new().with("name", GraphValue::Null),
                    Record::new().with("name", GraphValue::String("DC01.CORP.COM".to_owned())),
                ]))
            });

        let names: Vec<String> = repository(session)
            .owned_names(EntityType::Computer)
            .await
            .expect("listing starts")
            .try_collect()
            .await
            .expect("listing completes");

        assert_eq!(names, vec!["WS01.CORP.COM", "DC01.CORP.COM"]);
    }
}
