//! `bhtool` binary: flag BloodHound entities as owned and list them.
//!
//! Connection values come from `NEO4J_*` environment variables or a
//! configuration file, overridden by command-line flags. Logs go to stderr and
//! are filtered through `RUST_LOG`; stdout carries only the console report.

use std::ffi::OsString;
use std::io;
use std::sync::Arc;

use bhtool::domain::OwnershipService;
use bhtool::inbound::cli::{CliArgs, ConsoleReporter, Invocation, execute};
use bhtool::outbound::graph::CypherOwnershipRepository;
use bhtool::outbound::neo4j::{ConnectionSettings, Neo4jSession};
use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(error) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init()
    {
        warn!(%error, "tracing init failed");
    }

    let args = CliArgs::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build runtime")?;
    runtime.block_on(run(args))
}

async fn run(args: CliArgs) -> Result<()> {
    let invocation = args.command.invocation()?;
    let mut reporter = ConsoleReporter::new(io::stdout());

    if let Invocation::Unsupported(unsupported) = &invocation {
        reporter.unsupported(unsupported);
        return Ok(());
    }

    let loaded = ConnectionSettings::load_from_iter([OsString::from("bhtool")])
        .map_err(|error| eyre!("failed to load connection settings: {error}"))?;
    let settings = args.connection_settings(loaded);
    let ownership = args.ownership_settings();

    let session = Neo4jSession::connect(&settings, ownership.concurrency.get())
        .await
        .wrap_err("error connecting to graph store")?;
    let repository = CypherOwnershipRepository::new(Arc::new(session));
    let engine = OwnershipService::new(Arc::new(repository), ownership);

    execute(&engine, invocation, &mut reporter).await?;
    Ok(())
}
