//! Behavioural tests for [`AStarPlanner`] using `rstest-bdd`.

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use shopwalk_core::test_support::{FixedDistanceProvider, destination};
use shopwalk_core::{
    Destination, DistanceProvider, HaversineDistance, PlanError, PlanRequest, PlanResponse,
    PlanStrategy, Planner, Point,
};
use shopwalk_solver_astar::{AStarPlanner, AStarPlannerConfig};
use std::cell::RefCell;

type Provider = Box<dyn DistanceProvider + Send + Sync>;

/// Inputs gathered by the `given` steps.
struct Setup {
    start: Point,
    destinations: Vec<Destination>,
    provider: Provider,
    config: AStarPlannerConfig,
}

impl Default for Setup {
    fn default() -> Self {
        Self {
            start: Point::new(0.0, 0.0),
            destinations: Vec::new(),
            provider: Box::new(HaversineDistance),
            config: AStarPlannerConfig::default(),
        }
    }
}

type SetupCell = RefCell<Setup>;
type ResultCell = RefCell<Option<Result<PlanResponse, PlanError>>>;

#[fixture]
fn setup() -> SetupCell {
    RefCell::new(Setup::default())
}

#[fixture]
fn result() -> ResultCell {
    RefCell::new(None)
}

fn with_response(result: &ResultCell, check: impl FnOnce(&PlanResponse)) {
    let borrowed = result.borrow();
    let outcome = borrowed.as_ref().expect("plan must have run");
    check(outcome.as_ref().expect("expected a planned route"));
}

// --- Given steps ---

#[given("a shopper at the origin")]
fn shopper_at_origin(#[from(setup)] setup: &SetupCell) {
    setup.borrow_mut().start = Point::new(0.0, 0.0);
}

#[given("a shopper at an impossible latitude")]
fn shopper_off_the_map(#[from(setup)] setup: &SetupCell) {
    setup.borrow_mut().start = Point::new(123.0, 0.0);
}

#[given("stores east at 0.01 and 0.02 degrees and north at 0.02 degrees")]
fn three_stores(#[from(setup)] setup: &SetupCell) {
    setup.borrow_mut().destinations = vec![
        destination(1, 0.0, 0.01),
        destination(2, 0.0, 0.02),
        destination(3, 0.02, 0.0),
    ];
}

#[given("the routing service is offline")]
fn routing_offline(#[from(setup)] setup: &SetupCell) {
    setup.borrow_mut().provider = Box::new(FixedDistanceProvider::unreachable());
}

#[given("a search budget of zero expansions")]
fn zero_budget(#[from(setup)] setup: &SetupCell) {
    let mut guard = setup.borrow_mut();
    guard.config = guard.config.clone().with_max_expansions(0);
}

// --- When steps ---

#[when("I plan the route")]
fn plan_route(#[from(setup)] setup: &SetupCell, #[from(result)] result: &ResultCell) {
    let inputs = setup.replace(Setup::default());
    let request = PlanRequest::new(inputs.start, inputs.destinations);
    let planner = AStarPlanner::with_config(inputs.provider, inputs.config);
    *result.borrow_mut() = Some(planner.plan(&request));
}

// --- Then steps ---

#[then("the stores are visited east-near, east-far, then north")]
fn then_nearest_first(#[from(result)] result: &ResultCell) {
    with_response(result, |response| {
        assert_eq!(response.route.ids(), vec![1, 2, 3]);
    });
}

#[then("the route was found by search")]
fn then_searched(#[from(result)] result: &ResultCell) {
    with_response(result, |response| {
        assert_eq!(response.diagnostics.strategy, PlanStrategy::Search);
    });
}

#[then("the route was built greedily")]
fn then_greedy(#[from(result)] result: &ResultCell) {
    with_response(result, |response| {
        assert_eq!(response.diagnostics.strategy, PlanStrategy::Greedy);
    });
}

#[then("every store is visited once")]
fn then_permutation(#[from(result)] result: &ResultCell) {
    with_response(result, |response| {
        let mut ids = response.route.ids();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3]);
    });
}

#[then("some distances fell back to straight-line estimates")]
fn then_fallbacks(#[from(result)] result: &ResultCell) {
    with_response(result, |response| {
        assert!(response.diagnostics.distance_fallbacks > 0);
    });
}

#[then("the route is empty")]
fn then_empty(#[from(result)] result: &ResultCell) {
    with_response(result, |response| {
        assert!(response.route.is_empty());
        assert_eq!(response.diagnostics.strategy, PlanStrategy::Empty);
    });
}

#[then("the request is rejected as invalid")]
fn then_invalid(#[from(result)] result: &ResultCell) {
    let borrowed = result.borrow();
    assert!(
        matches!(borrowed.as_ref(), Some(Err(PlanError::InvalidRequest(_)))),
        "expected InvalidRequest, got {borrowed:?}"
    );
}

// --- Scenario registrations ---

macro_rules! register_scenario {
    ($fn_name:ident, $title:literal) => {
        #[scenario(path = "tests/features/planner.feature", name = $title)]
        fn $fn_name(setup: SetupCell, result: ResultCell) {
            let _ = (setup, result);
        }
    };
}

register_scenario!(visiting_nearest_first, "visiting stores nearest first");
register_scenario!(offline_routing_service, "planning with an offline routing service");
register_scenario!(spent_search_budget, "falling back when the search budget is spent");
register_scenario!(no_stores, "planning with no stores");
register_scenario!(invalid_start, "rejecting an invalid start");
