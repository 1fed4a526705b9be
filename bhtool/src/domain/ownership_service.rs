//! Ownership domain services.
//!
//! [`OwnershipService`] implements the ownership driving ports on top of an
//! [`OwnershipRepository`]. Marking is check-then-set: an entity that already
//! carries the flag is never written again. The two statements are not atomic,
//! so a concurrent writer may flag an entity between the check and the set;
//! the item is then reported as marked rather than already owned.
//!
//! Up to `concurrency` items are in flight at once. A name repeated within a
//! batch waits for its earlier occurrence to finish, so the repeat sees the
//! flag that occurrence wrote and reports already owned.

use std::collections::HashSet;
use std::mem;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::{StreamExt, TryStreamExt, stream};
use tracing::{debug, info, warn};

use crate::domain::ports::{
    MarkOwnedRequest, OutcomeSink, OwnershipCommand, OwnershipQuery, OwnershipRepository,
    OwnershipRepositoryError,
};
use crate::domain::{
    BatchReport, EntityName, EntityType, Error, FailureStage, ItemOutcome, LookupFailurePolicy,
    OwnershipSettings,
};

fn map_repository_error(error: OwnershipRepositoryError) -> Error {
    match error {
        OwnershipRepositoryError::Connection { message } => {
            Error::store_unavailable(format!("graph store unavailable: {message}"))
        }
        OwnershipRepositoryError::Query { message } => {
            Error::query_failed(format!("graph query failed: {message}"))
        }
    }
}

/// Split `names` into consecutive runs in which no name repeats.
fn distinct_runs(names: Vec<EntityName>) -> Vec<Vec<EntityName>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    let mut seen = HashSet::new();
    for name in names {
        if seen.contains(&name) {
            runs.push(mem::take(&mut current));
            seen.clear();
        }
        seen.insert(name.clone());
        current.push(name);
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

/// Ownership engine implementing [`OwnershipCommand`] and [`OwnershipQuery`].
#[derive(Clone)]
pub struct OwnershipService<R> {
    repository: Arc<R>,
    settings: OwnershipSettings,
}

impl<R> OwnershipService<R> {
    /// Create a new service over `repository`.
    #[must_use]
    pub const fn new(repository: Arc<R>, settings: OwnershipSettings) -> Self {
        Self {
            repository,
            settings,
        }
    }
}

impl<R> OwnershipService<R>
where
    R: OwnershipRepository,
{
    async fn lookup(
        &self,
        name: &EntityName,
        entity_type: EntityType,
    ) -> Result<Result<bool, String>, Error> {
        match self.repository.check_owned(name, entity_type).await {
            Ok(owned) => Ok(Ok(owned)),
            Err(OwnershipRepositoryError::Query { message }) => Ok(Err(message)),
            Err(error) => Err(map_repository_error(error)),
        }
    }

    async fn process(
        &self,
        name: &EntityName,
        entity_type: EntityType,
    ) -> Result<ItemOutcome, Error> {
        let owned = match self.lookup(name, entity_type).await? {
            Ok(owned) => owned,
            Err(message) => match self.settings.lookup_failure {
                LookupFailurePolicy::Skip => {
                    return Ok(ItemOutcome::Failed {
                        stage: FailureStage::Lookup,
                        message,
                    });
                }
                LookupFailurePolicy::Mark => {
                    warn!(
                        %entity_type,
                        %name,
                        reason = %message,
                        "ownership lookup failed; attempting to mark anyway"
                    );
                    false
                }
            },
        };

        if owned {
            return Ok(ItemOutcome::AlreadyOwned);
        }

        match self.repository.set_owned(name, entity_type).await {
            Ok(true) => Ok(ItemOutcome::Marked),
            Ok(false) => Ok(ItemOutcome::NotFound),
            Err(OwnershipRepositoryError::Query { message }) => Ok(ItemOutcome::Failed {
                stage: FailureStage::Mark,
                message,
            }),
            Err(error) => Err(map_repository_error(error)),
        }
    }
}

#[async_trait]
impl<R> OwnershipCommand for OwnershipService<R>
where
    R: OwnershipRepository,
{
    async fn mark_owned(
        &self,
        request: MarkOwnedRequest,
        sink: &mut dyn OutcomeSink,
    ) -> Result<BatchReport, Error> {
        let MarkOwnedRequest { names, entity_type } = request;
        let mut report = BatchReport::new(entity_type);

        let submitted = names.len();
        let concurrency = self.settings.concurrency.get();

        for run in distinct_runs(names) {
            let mut outcomes = stream::iter(run)
                .map(|name| async move {
                    let result = self.process(&name, entity_type).await;
                    (name, result)
                })
                .buffered(concurrency);

            while let Some((name, result)) = outcomes.next().await {
                let outcome = result.inspect_err(|error| {
                    warn!(
                        %entity_type,
                        %name,
                        processed = report.total(),
                        submitted,
                        error = %error,
                        "aborting ownership batch"
                    );
                })?;
                debug!(%entity_type, %name, outcome = outcome.label(), "ownership item processed");
                sink.item(&name, &outcome);
                report.record(&outcome);
            }
        }

        info!(
            %entity_type,
            marked = report.marked(),
            already_owned = report.already_owned(),
            not_found = report.not_found(),
            failed = report.failed(),
            "ownership batch finished"
        );
        sink.finished(&report);
        Ok(report)
    }
}

#[async_trait]
impl<R> OwnershipQuery for OwnershipService<R>
where
    R: OwnershipRepository,
{
    async fn list_owned(
        &self,
        entity_type: EntityType,
        sink: &mut dyn OutcomeSink,
    ) -> Result<usize, Error> {
        let mut names = self
            .repository
            .owned_names(entity_type)
            .await
            .map_err(map_repository_error)?;

        let mut listed = 0_usize;
        while let Some(name) = names.try_next().await.map_err(map_repository_error)? {
            sink.owned_name(&name);
            listed += 1;
        }

        debug!(%entity_type, listed, "owned entities listed");
        Ok(listed)
    }
}

#[cfg(test)]
#[path = "ownership_service_tests.rs"]
mod tests;
