//! `AStarPlanner`: A* search with a greedy fallback.

use std::time::{Duration, Instant};

use shopwalk_core::{
    Destination, DistanceProvider, PlanDiagnostics, PlanError, PlanRequest, PlanResponse,
    PlanStrategy, Planner, Point, Route,
};

use crate::costs::EdgeCosts;
use crate::greedy::greedy_order;
use crate::search::{ClosedSetPolicy, SearchBudget, SearchOptions, search};
use crate::state::VisitedSet;

/// Destination count above which the planner skips the search by default.
pub const DEFAULT_MAX_SEARCH_DESTINATIONS: usize = 10;

/// Configuration for [`AStarPlanner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AStarPlannerConfig {
    /// Requests with more destinations than this go straight to the greedy
    /// planner. Values above [`VisitedSet::CAPACITY`] are capped.
    pub max_search_destinations: usize,
    /// Maximum states to expand before abandoning the search.
    pub max_expansions: Option<u64>,
    /// Wall-clock limit on the search.
    pub deadline: Option<Duration>,
    /// Closed-set behaviour during the search.
    pub closed_set_policy: ClosedSetPolicy,
    /// Cache edge costs for the duration of a planning call.
    pub memoize_distances: bool,
}

impl Default for AStarPlannerConfig {
    fn default() -> Self {
        Self {
            max_search_destinations: DEFAULT_MAX_SEARCH_DESTINATIONS,
            max_expansions: None,
            deadline: None,
            closed_set_policy: ClosedSetPolicy::default(),
            memoize_distances: true,
        }
    }
}

impl AStarPlannerConfig {
    /// Set the largest destination count that is searched.
    #[must_use]
    pub const fn with_max_search_destinations(mut self, max: usize) -> Self {
        self.max_search_destinations = max;
        self
    }

    /// Set the expansion budget.
    #[must_use]
    pub const fn with_max_expansions(mut self, max: u64) -> Self {
        self.max_expansions = Some(max);
        self
    }

    /// Set the search deadline.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Set the closed-set policy.
    #[must_use]
    pub const fn with_closed_set_policy(mut self, policy: ClosedSetPolicy) -> Self {
        self.closed_set_policy = policy;
        self
    }

    /// Enable or disable per-request edge-cost memoization.
    #[must_use]
    pub const fn with_memoized_distances(mut self, memoize: bool) -> Self {
        self.memoize_distances = memoize;
        self
    }

    const fn search_options(&self) -> SearchOptions {
        SearchOptions {
            policy: self.closed_set_policy,
            budget: SearchBudget {
                max_expansions: self.max_expansions,
                deadline: self.deadline,
            },
        }
    }

    fn search_limit(&self) -> usize {
        self.max_search_destinations.min(VisitedSet::CAPACITY)
    }
}

/// Shopping-route planner built on A* search.
///
/// Generic over the [`DistanceProvider`] that prices each leg. Provider
/// failures never surface: the affected leg is priced with the haversine
/// distance instead. The planner holds no per-request state, so one instance
/// can serve concurrent calls.
///
/// # Examples
/// ```
/// use shopwalk_core::{HaversineDistance, PlanRequest, PlanStrategy, Planner, Point};
/// use shopwalk_core::test_support::destination;
/// use shopwalk_solver_astar::AStarPlanner;
///
/// let planner = AStarPlanner::new(HaversineDistance);
/// let request = PlanRequest::new(
///     Point::new(0.0, 0.0),
///     vec![destination(1, 0.0, 0.02), destination(2, 0.0, 0.01)],
/// );
/// let response = planner.plan(&request)?;
/// assert_eq!(response.route.ids(), vec![2, 1]);
/// assert_eq!(response.diagnostics.strategy, PlanStrategy::Search);
/// # Ok::<(), shopwalk_core::PlanError>(())
/// ```
#[derive(Debug)]
pub struct AStarPlanner<P>
where
    P: DistanceProvider,
{
    provider: P,
    config: AStarPlannerConfig,
}

impl<P> AStarPlanner<P>
where
    P: DistanceProvider,
{
    /// Construct a planner using default configuration.
    pub fn new(provider: P) -> Self {
        Self::with_config(provider, AStarPlannerConfig::default())
    }

    /// Construct a planner with explicit configuration.
    pub const fn with_config(provider: P, config: AStarPlannerConfig) -> Self {
        Self { provider, config }
    }

    /// The active configuration.
    pub const fn config(&self) -> &AStarPlannerConfig {
        &self.config
    }

    /// Choose a visiting order and price it.
    ///
    /// Greedy routes never query the provider: they are priced from edges
    /// the search already looked up, with haversine for the rest, so an
    /// exhausted deadline is not followed by another round of lookups.
    fn choose(
        &self,
        start: Point,
        destinations: &[Destination],
        costs: &mut EdgeCosts<'_, P>,
    ) -> Choice {
        match destinations.len() {
            0 => Choice {
                order: Vec::new(),
                strategy: PlanStrategy::Empty,
                states_expanded: 0,
                total_miles: 0.0,
            },
            1 => Choice {
                order: vec![0],
                strategy: PlanStrategy::Direct,
                states_expanded: 0,
                total_miles: costs.cost(0, 1),
            },
            count if count > self.config.search_limit() => {
                log::info!(
                    "{count} destinations exceed the search limit of {}; planning greedily",
                    self.config.search_limit()
                );
                Choice::greedy(start, destinations, costs, 0)
            }
            _ => match search(costs, self.config.search_options()) {
                Ok(outcome) => {
                    let strategy = match outcome.interrupted {
                        Some(reason) => {
                            log::warn!("{reason}; keeping the best route found so far");
                            PlanStrategy::Interrupted
                        }
                        None => PlanStrategy::Search,
                    };
                    Choice {
                        order: outcome.order,
                        strategy,
                        states_expanded: outcome.states_expanded,
                        total_miles: outcome.cost,
                    }
                }
                Err(exhausted) => {
                    log::warn!("{exhausted}; falling back to the greedy route");
                    Choice::greedy(start, destinations, costs, exhausted.states_expanded())
                }
            },
        }
    }
}

/// A priced visiting order and how it was produced.
struct Choice {
    order: Vec<usize>,
    strategy: PlanStrategy,
    states_expanded: u64,
    total_miles: f64,
}

impl Choice {
    fn greedy<P>(
        start: Point,
        destinations: &[Destination],
        costs: &EdgeCosts<'_, P>,
        states_expanded: u64,
    ) -> Self
    where
        P: DistanceProvider + ?Sized,
    {
        let order = greedy_order(start, destinations);
        let total_miles = costs.known_route_cost(&order);
        Self {
            order,
            strategy: PlanStrategy::Greedy,
            states_expanded,
            total_miles,
        }
    }
}

impl<P> Planner for AStarPlanner<P>
where
    P: DistanceProvider + Send + Sync,
{
    fn plan(&self, request: &PlanRequest) -> Result<PlanResponse, PlanError> {
        request.validate()?;
        let started_at = Instant::now();

        let mut costs = EdgeCosts::new(
            &self.provider,
            request.start,
            &request.destinations,
            self.config.memoize_distances,
        );
        let choice = self.choose(request.start, &request.destinations, &mut costs);

        let destinations: Vec<Destination> = choice
            .order
            .iter()
            .filter_map(|&index| request.destinations.get(index).cloned())
            .collect();
        debug_assert_eq!(destinations.len(), request.destinations.len());

        Ok(PlanResponse {
            route: Route::new(destinations, choice.total_miles),
            diagnostics: PlanDiagnostics {
                plan_time: started_at.elapsed(),
                states_expanded: choice.states_expanded,
                distance_fallbacks: costs.fallbacks(),
                strategy: choice.strategy,
            },
        })
    }
}
