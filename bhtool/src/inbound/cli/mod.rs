//! Command-line inbound adapter.
//!
//! [`CliArgs`] is the clap surface of the `bhtool` binary. It resolves into an
//! [`Invocation`], which [`execute`] drives through the domain's ownership
//! ports while a [`ConsoleReporter`] renders the outcome.

mod console;

use std::io::Write;
use std::num::NonZeroUsize;

use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::ports::{MarkOwnedRequest, OwnershipCommand, OwnershipQuery};
use crate::domain::{
    EntityName, EntityType, Error, LookupFailurePolicy, OwnershipSettings, UnsupportedEntityType,
};
use crate::outbound::neo4j::ConnectionSettings;

pub use console::{ConsoleReporter, SIGN_OFF};

/// `bhtool` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "bhtool",
    about = "Mark BloodHound users and computers as owned and list owned entities",
    version
)]
pub struct CliArgs {
    /// Graph store URI. Falls back to `NEO4J_URI`, then `bolt://localhost:7687`.
    #[arg(long = "neo4j-uri", value_name = "uri", global = true)]
    pub neo4j_uri: Option<String>,
    /// Graph store user. Falls back to `NEO4J_USER`, then `neo4j`.
    #[arg(long = "neo4j-user", value_name = "user", global = true)]
    pub neo4j_user: Option<String>,
    /// Graph store password. Falls back to `NEO4J_PASSWORD`, then `neo4j`.
    #[arg(long = "neo4j-pass", value_name = "password", global = true)]
    pub neo4j_pass: Option<String>,
    /// Database name. Falls back to `NEO4J_DATABASE`, then the server default.
    #[arg(long = "neo4j-db", value_name = "name", global = true)]
    pub neo4j_db: Option<String>,
    /// Connect over TLS.
    #[arg(long, global = true)]
    pub tls: bool,
    /// Number of entities processed concurrently. A name given more than
    /// once is processed one occurrence after another.
    #[arg(
        long,
        value_name = "n",
        default_value = "1",
        value_parser = parse_concurrency,
        global = true
    )]
    pub concurrency: NonZeroUsize,
    /// What to do when reading an entity's current flag fails.
    #[arg(
        long = "on-lookup-failure",
        value_enum,
        default_value_t = LookupFailureArg::Skip,
        global = true
    )]
    pub on_lookup_failure: LookupFailureArg,
    /// Operation to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Mark entities as owned.
    Own {
        /// Entity type: `user` or `computer`.
        #[arg(long = "type", value_name = "type", default_value = "user")]
        entity_type: String,
        /// Entity names, exactly as stored (for example `ALICE@CORP.COM`).
        #[arg(value_name = "NAME", required = true)]
        names: Vec<String>,
    },
    /// List owned entities.
    Owned {
        /// Entity type: `user` or `computer`.
        #[arg(long = "type", value_name = "type", default_value = "user")]
        entity_type: String,
    },
}

/// Command-line spelling of [`LookupFailurePolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LookupFailureArg {
    /// Report the item as failed and leave it untouched.
    Skip,
    /// Treat the item as unowned and attempt the write anyway.
    Mark,
}

impl From<LookupFailureArg> for LookupFailurePolicy {
    fn from(value: LookupFailureArg) -> Self {
        match value {
            LookupFailureArg::Skip => Self::Skip,
            LookupFailureArg::Mark => Self::Mark,
        }
    }
}

fn parse_concurrency(raw: &str) -> Result<NonZeroUsize, String> {
    raw.trim()
        .parse::<NonZeroUsize>()
        .map_err(|error| format!("concurrency must be a positive integer: {error}"))
}

impl CliArgs {
    /// Overlay explicit flags on settings loaded from the environment.
    #[must_use]
    pub fn connection_settings(&self, loaded: ConnectionSettings) -> ConnectionSettings {
        ConnectionSettings {
            uri: self.neo4j_uri.clone().or(loaded.uri),
            user: self.neo4j_user.clone().or(loaded.user),
            password: self.neo4j_pass.clone().or(loaded.password),
            database: self.neo4j_db.clone().or(loaded.database),
            tls: self.tls || loaded.tls,
        }
    }

    /// Engine settings selected by the flags.
    #[must_use]
    pub fn ownership_settings(&self) -> OwnershipSettings {
        OwnershipSettings {
            concurrency: self.concurrency,
            lookup_failure: self.on_lookup_failure.into(),
        }
    }
}

/// A validated request, ready to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Flag the named entities.
    MarkOwned(MarkOwnedRequest),
    /// List flagged entities of one type.
    ListOwned(EntityType),
    /// The requested type has no descriptor; nothing touches the store.
    Unsupported(UnsupportedEntityType),
}

impl Command {
    /// Validate the arguments into an [`Invocation`].
    ///
    /// # Errors
    ///
    /// Returns an [`crate::domain::ErrorCode::InvalidRequest`] error when a
    /// name is blank or carries surrounding whitespace.
    pub fn invocation(&self) -> Result<Invocation, Error> {
        match self {
            Self::Own { entity_type, names } => {
                let kind = match entity_type.parse::<EntityType>() {
                    Ok(kind) => kind,
                    Err(unsupported) => return Ok(Invocation::Unsupported(unsupported)),
                };
                let validated = names
                    .iter()
                    .map(|raw| {
                        EntityName::new(raw.as_str())
                            .map_err(|error| Error::invalid_request(error.to_string()))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Invocation::MarkOwned(MarkOwnedRequest {
                    names: validated,
                    entity_type: kind,
                }))
            }
            Self::Owned { entity_type } => Ok(entity_type
                .parse::<EntityType>()
                .map_or_else(Invocation::Unsupported, Invocation::ListOwned)),
        }
    }
}

/// Run `invocation` against `engine`, rendering to `reporter`.
///
/// # Errors
///
/// Propagates engine errors: a lost store connection while marking, or a
/// failed owned-list query.
pub async fn execute<E, W>(
    engine: &E,
    invocation: Invocation,
    reporter: &mut ConsoleReporter<W>,
) -> Result<(), Error>
where
    E: OwnershipCommand + OwnershipQuery,
    W: Write + Send,
{
    match invocation {
        Invocation::MarkOwned(request) => {
            engine.mark_owned(request, reporter).await?;
        }
        Invocation::ListOwned(entity_type) => {
            engine.list_owned(entity_type, reporter).await?;
        }
        Invocation::Unsupported(unsupported) => reporter.unsupported(&unsupported),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    //! Argument parsing and invocation coverage.

    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(std::iter::once("bhtool").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    #[rstest]
    fn defaults_apply_when_flags_are_absent() {
        let args = parse(&["own", "ALICE@CORP.COM"]);

        assert_eq!(args.concurrency.get(), 1);
        assert_eq!(args.on_lookup_failure, LookupFailureArg::Skip);
        assert!(!args.tls);
        assert_eq!(
            args.ownership_settings(),
            OwnershipSettings::default()
        );
    }

    #[rstest]
    fn own_builds_a_mark_request_in_submission_order() {
        let args = parse(&["own", "--type", "Computer", "WS02", "WS01", "WS02"]);

        let invocation = args.command.invocation().expect("valid invocation");
        let Invocation::MarkOwned(request) = invocation else {
            panic!("expected a mark request, got {invocation:?}");
        };
        assert_eq!(request.entity_type, EntityType::Computer);
        let names: Vec<&str> = request.names.iter().map(AsRef::as_ref).collect();
        assert_eq!(names, ["WS02", "WS01", "WS02"]);
    }

    #[rstest]
    #[case(&["own", "--type", "group", "DOMAIN ADMINS@CORP.COM"])]
    #[case(&["owned", "--type", "group"])]
    fn unknown_types_become_no_ops(#[case] raw: &[&str]) {
        let invocation = parse(raw).command.invocation().expect("valid invocation");

        assert!(matches!(invocation, Invocation::Unsupported(ref error) if error.value == "group"));
    }

    #[rstest]
    fn owned_defaults_to_users() {
        let invocation = parse(&["owned"]).command.invocation().expect("valid invocation");

        assert_eq!(invocation, Invocation::ListOwned(EntityType::User));
    }

    #[rstest]
    fn blank_names_are_rejected() {
        let error = parse(&["own", "ALICE@CORP.COM", " "])
            .command
            .invocation()
            .expect_err("blank name rejected");

        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[case("0")]
    #[case("-2")]
    #[case("many")]
    fn concurrency_must_be_positive(#[case] value: &str) {
        let result = CliArgs::try_parse_from(["bhtool", "--concurrency", value, "owned"]);

        assert!(result.is_err());
    }

    #[rstest]
    fn own_requires_at_least_one_name() {
        assert!(CliArgs::try_parse_from(["bhtool", "own"]).is_err());
    }

    #[rstest]
    fn flags_override_loaded_settings() {
        let args = parse(&[
            "--neo4j-uri",
            "bolt://graph:7687",
            "--neo4j-pass",
            "s3cret",
            "--tls",
            "--on-lookup-failure",
            "mark",
            "--concurrency",
            "4",
            "owned",
        ]);
        let loaded = ConnectionSettings {
            uri: Some("bolt://ignored:7687".to_owned()),
            user: Some("analyst".to_owned()),
            ..ConnectionSettings::default()
        };

        let merged = args.connection_settings(loaded);

        assert_eq!(merged.uri(), "bolt://graph:7687");
        assert_eq!(merged.user(), "analyst");
        assert_eq!(merged.password(), "s3cret");
        assert_eq!(merged.effective_uri(), "bolt+s://graph:7687");
        let settings = args.ownership_settings();
        assert_eq!(settings.concurrency.get(), 4);
        assert_eq!(settings.lookup_failure, LookupFailurePolicy::Mark);
    }
}
