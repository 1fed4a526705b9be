//! Behaviour-driven development (BDD) tests for ownership marking.
//!
//! These scenarios drive the command-line invocation layer, the ownership
//! engine and the Cypher repository against an in-memory graph, checking the
//! operator-visible console output and the resulting graph state.

use std::sync::Arc;

use bhtool::domain::{EntityType, ErrorCode, OwnershipService, OwnershipSettings};
use bhtool::inbound::cli::{Command, ConsoleReporter, execute};
use bhtool::outbound::graph::CypherOwnershipRepository;
use bhtool::test_support::InMemoryGraph;
use futures::executor::block_on;
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};

// -----------------------------------------------------------------------------
// Test World
// -----------------------------------------------------------------------------

/// Test world holding the graph double and the last command's results.
#[derive(Default, ScenarioState)]
struct OwnershipWorld {
    graph: Slot<Arc<InMemoryGraph>>,
    console: Slot<String>,
    error: Slot<ErrorCode>,
}

impl OwnershipWorld {
    fn graph(&self) -> Arc<InMemoryGraph> {
        if let Some(graph) = self.graph.get() {
            return graph;
        }
        let graph = Arc::new(InMemoryGraph::new());
        self.graph.set(Arc::clone(&graph));
        graph
    }

    fn run(&self, command: &Command) {
        let repository = CypherOwnershipRepository::new(self.graph());
        let engine = OwnershipService::new(Arc::new(repository), OwnershipSettings::default());
        let mut reporter = ConsoleReporter::new(Vec::new());

        let result = command
            .invocation()
            .and_then(|invocation| block_on(execute(&engine, invocation, &mut reporter)));

        let console = String::from_utf8(reporter.into_inner()).expect("console output is UTF-8");
        self.console.set(console);
        if let Err(error) = result {
            self.error.set(error.code());
        }
    }

    fn console_lines(&self) -> Vec<String> {
        self.console
            .get()
            .expect("a command should have run")
            .lines()
            .map(str::to_owned)
            .collect()
    }
}

fn unquote(raw: &str) -> &str {
    raw.trim().trim_matches('"')
}

fn split_names(raw: &str) -> Vec<String> {
    raw.split(',').map(|name| name.trim().to_owned()).collect()
}

#[fixture]
fn world() -> OwnershipWorld {
    OwnershipWorld::default()
}

// -----------------------------------------------------------------------------
// Given Steps
// -----------------------------------------------------------------------------

#[given("an empty graph")]
fn an_empty_graph(world: &OwnershipWorld) {
    world.graph.set(Arc::new(InMemoryGraph::new()));
}

#[given("an unowned user named {name}")]
fn an_unowned_user(world: &OwnershipWorld, name: String) {
    world.graph().add_node(EntityType::User, &name);
}

#[given("an owned user named {name}")]
fn an_owned_user(world: &OwnershipWorld, name: String) {
    world.graph().add_owned_node(EntityType::User, &name);
}

#[given("an unowned computer named {name}")]
fn an_unowned_computer(world: &OwnershipWorld, name: String) {
    world.graph().add_node(EntityType::Computer, &name);
}

#[given("an owned computer named {name}")]
fn an_owned_computer(world: &OwnershipWorld, name: String) {
    world.graph().add_owned_node(EntityType::Computer, &name);
}

#[given("statements for {name} fail")]
fn statements_for_fail(world: &OwnershipWorld, name: String) {
    world.graph().fail_statements_for(&name);
}

#[given("the graph store is unreachable")]
fn the_graph_store_is_unreachable(world: &OwnershipWorld) {
    world.graph().disconnect();
}

// -----------------------------------------------------------------------------
// When Steps
// -----------------------------------------------------------------------------

#[when("{names} are marked as owned with type {kind}")]
fn names_are_marked_as_owned(world: &OwnershipWorld, names: String, kind: String) {
    world.run(&Command::Own {
        entity_type: kind,
        names: split_names(&names),
    });
}

#[when("the owned entities of type {kind} are listed")]
fn the_owned_entities_are_listed(world: &OwnershipWorld, kind: String) {
    world.run(&Command::Owned { entity_type: kind });
}

// -----------------------------------------------------------------------------
// Then Steps
// -----------------------------------------------------------------------------

#[then("the console shows {line}")]
fn the_console_shows(world: &OwnershipWorld, line: String) {
    let expected = unquote(&line);
    let lines = world.console_lines();
    assert!(
        lines.iter().any(|actual| actual == expected),
        "expected line {expected:?} in console output {lines:#?}"
    );
}

#[then("the console mentions {fragment}")]
fn the_console_mentions(world: &OwnershipWorld, fragment: String) {
    let expected = unquote(&fragment);
    let lines = world.console_lines();
    assert!(
        lines.iter().any(|actual| actual.contains(expected)),
        "expected {expected:?} in console output {lines:#?}"
    );
}

#[then("the user {name} is owned")]
fn the_user_is_owned(world: &OwnershipWorld, name: String) {
    assert!(world.graph().is_owned(EntityType::User, &name));
}

#[then("the user {name} is not owned")]
fn the_user_is_not_owned(world: &OwnershipWorld, name: String) {
    assert!(!world.graph().is_owned(EntityType::User, &name));
}

#[then("the listed names are {names}")]
fn the_listed_names_are(world: &OwnershipWorld, names: String) {
    let mut listed = world.console_lines();
    listed.sort();
    let mut expected = split_names(&names);
    expected.sort();
    assert_eq!(listed, expected);
}

#[then("no statements were run")]
fn no_statements_were_run(world: &OwnershipWorld) {
    assert_eq!(world.graph().statements(), 0);
}

#[then("the operation fails because the store is unavailable")]
fn the_operation_fails_because_the_store_is_unavailable(world: &OwnershipWorld) {
    assert_eq!(world.error.get(), Some(ErrorCode::StoreUnavailable));
}

// -----------------------------------------------------------------------------
// Scenario Bindings
// -----------------------------------------------------------------------------

#[scenario(
    path = "tests/features/ownership_marking.feature",
    name = "Marking a user that does not exist"
)]
fn marking_a_user_that_does_not_exist(world: OwnershipWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/ownership_marking.feature",
    name = "Marking the same user twice"
)]
fn marking_the_same_user_twice(world: OwnershipWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/ownership_marking.feature",
    name = "Listing owned computers ignores users"
)]
fn listing_owned_computers_ignores_users(world: OwnershipWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/ownership_marking.feature",
    name = "Listing after marking returns the newly owned entities"
)]
fn listing_after_marking_returns_newly_owned(world: OwnershipWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/ownership_marking.feature",
    name = "A failed lookup leaves the entity untouched"
)]
fn a_failed_lookup_leaves_the_entity_untouched(world: OwnershipWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/ownership_marking.feature",
    name = "Unsupported entity types change nothing"
)]
fn unsupported_entity_types_change_nothing(world: OwnershipWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/ownership_marking.feature",
    name = "Losing the store aborts the batch"
)]
fn losing_the_store_aborts_the_batch(world: OwnershipWorld) {
    let _ = world;
}
