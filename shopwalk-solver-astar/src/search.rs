//! A* search over `(location, visited set)` states.

use std::collections::hash_map::Entry;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::time::{Duration, Instant};

use shopwalk_core::{DistanceProvider, LocationKey, Point};
use thiserror::Error;

use crate::costs::EdgeCosts;
use crate::mst::mst_cost;
use crate::state::{FrontierEntry, SearchState, StateArena, VisitedSet};

/// How the search treats a state whose `(location, visited set)` key has
/// already been expanded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ClosedSetPolicy {
    /// Skip every later state with a closed key, whatever its cost.
    #[default]
    FirstExpansion,
    /// Re-expand a closed key when a strictly cheaper state reaches it.
    CheapestCost,
}

/// Limits that abort a search early.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchBudget {
    /// Maximum number of states to expand.
    pub max_expansions: Option<u64>,
    /// Wall-clock limit measured from the start of the search.
    pub deadline: Option<Duration>,
}

/// Tuning for a single [`search`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Closed-set behaviour.
    pub policy: ClosedSetPolicy,
    /// Early-abort limits.
    pub budget: SearchBudget,
}

/// Best route found by [`search`].
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// Destination indices in visiting order.
    pub order: Vec<usize>,
    /// Total cost of the route in miles.
    pub cost: f64,
    /// Number of states expanded.
    pub states_expanded: u64,
    /// Set when the budget or deadline stopped the search after a complete
    /// route was found; `order` is then the best route seen so far.
    pub interrupted: Option<SearchExhausted>,
}

impl SearchOutcome {
    /// Whether the frontier was drained, making `order` the search's final
    /// answer.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.interrupted.is_none()
    }
}

/// Reasons a search ends without a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SearchExhausted {
    /// The frontier emptied before any complete route was reached.
    #[error("search frontier drained after {states_expanded} expansions without a complete route")]
    NoCompleteRoute {
        /// States expanded before the frontier emptied.
        states_expanded: u64,
    },
    /// The expansion budget ran out.
    #[error("search expansion budget of {limit} states exhausted")]
    ExpansionBudget {
        /// Configured budget.
        limit: u64,
    },
    /// The wall-clock deadline passed.
    #[error("search deadline of {limit:?} passed after {states_expanded} expansions")]
    Deadline {
        /// Configured deadline.
        limit: Duration,
        /// States expanded before the deadline.
        states_expanded: u64,
    },
    /// More destinations than a [`VisitedSet`] can track.
    #[error("{count} destinations exceed the search capacity of {capacity}")]
    TooManyDestinations {
        /// Destinations in the request.
        count: usize,
        /// Largest searchable count.
        capacity: usize,
    },
}

impl SearchExhausted {
    /// States expanded before the search gave up.
    #[must_use]
    pub const fn states_expanded(&self) -> u64 {
        match *self {
            Self::NoCompleteRoute { states_expanded } | Self::Deadline { states_expanded, .. } => {
                states_expanded
            }
            Self::ExpansionBudget { limit } => limit,
            Self::TooManyDestinations { .. } => 0,
        }
    }
}

/// Find a minimum-cost order visiting every destination in `costs`.
///
/// States are expanded in ascending `cost + heuristic` order, ties broken by
/// insertion order. The heuristic is [`mst_cost`] over the destinations not
/// yet visited, seen from the current location. Complete routes are recorded
/// as soon as they are generated and kept while the frontier drains; states
/// already at least as costly as the best complete route are never expanded.
///
/// The deadline is checked before every expansion and before every edge
/// lookup, so a slow provider overruns it by at most one lookup. When the
/// budget or deadline stops the search after a complete route was found,
/// that route is returned with [`SearchOutcome::interrupted`] set.
///
/// # Errors
///
/// Returns [`SearchExhausted`] when the budget or deadline is hit before any
/// complete route was found, when the request exceeds
/// [`VisitedSet::CAPACITY`], or when no complete route is reached.
///
/// # Examples
/// ```
/// use shopwalk_core::{HaversineDistance, Point};
/// use shopwalk_core::test_support::destination;
/// use shopwalk_solver_astar::{EdgeCosts, SearchOptions, search};
///
/// let stops = vec![destination(1, 0.0, 0.02), destination(2, 0.0, 0.01)];
/// let mut costs = EdgeCosts::new(&HaversineDistance, Point::new(0.0, 0.0), &stops, true);
/// let outcome = search(&mut costs, SearchOptions::default())?;
/// assert_eq!(outcome.order, vec![1, 0]);
/// # Ok::<(), shopwalk_solver_astar::SearchExhausted>(())
/// ```
pub fn search<P>(
    costs: &mut EdgeCosts<'_, P>,
    options: SearchOptions,
) -> Result<SearchOutcome, SearchExhausted>
where
    P: DistanceProvider + ?Sized,
{
    let count = costs.destination_count();
    if count > VisitedSet::CAPACITY {
        return Err(SearchExhausted::TooManyDestinations {
            count,
            capacity: VisitedSet::CAPACITY,
        });
    }

    let mut run = SearchRun::new(costs, options);
    let outcome = run.execute();
    log::debug!(
        "search over {count} destinations expanded {} states and generated {}",
        run.expanded,
        run.generated
    );
    outcome
}

/// Mutable bookkeeping for one search.
struct SearchRun<'c, 'p, P: ?Sized> {
    costs: &'c mut EdgeCosts<'p, P>,
    options: SearchOptions,
    started: Instant,
    goal: VisitedSet,
    arena: StateArena,
    generated: usize,
    frontier: BinaryHeap<FrontierEntry>,
    sequence: u64,
    closed: ClosedSet,
    heuristics: HashMap<(usize, VisitedSet), f64>,
    expanded: u64,
    best: Option<(usize, f64)>,
}

impl<'c, 'p, P> SearchRun<'c, 'p, P>
where
    P: DistanceProvider + ?Sized,
{
    fn new(costs: &'c mut EdgeCosts<'p, P>, options: SearchOptions) -> Self {
        let goal = VisitedSet::all(costs.destination_count());
        Self {
            costs,
            options,
            started: Instant::now(),
            goal,
            arena: StateArena::default(),
            generated: 0,
            frontier: BinaryHeap::new(),
            sequence: 0,
            closed: ClosedSet::new(options.policy),
            heuristics: HashMap::new(),
            expanded: 0,
            best: None,
        }
    }

    fn execute(&mut self) -> Result<SearchOutcome, SearchExhausted> {
        let interrupted = self.drain().err();
        let Some((leaf, cost)) = self.best else {
            return Err(interrupted.unwrap_or(SearchExhausted::NoCompleteRoute {
                states_expanded: self.expanded,
            }));
        };
        Ok(SearchOutcome {
            order: self.arena.destination_order(leaf),
            cost,
            states_expanded: self.expanded,
            interrupted,
        })
    }

    /// Expand states until the frontier empties or a limit is hit.
    fn drain(&mut self) -> Result<(), SearchExhausted> {
        self.enqueue(SearchState {
            node: 0,
            visited: VisitedSet::EMPTY,
            cost: 0.0,
            parent: None,
        });

        while let Some(entry) = self.frontier.pop() {
            let Some(state) = self.arena.get(entry.state) else {
                debug_assert!(false, "frontier references missing state {}", entry.state);
                continue;
            };

            if state.visited == self.goal {
                self.record_terminal(entry.state, state.cost);
                continue;
            }
            if self.cannot_improve(state.cost) {
                continue;
            }
            let Some(location) = self.costs.point(state.node) else {
                continue;
            };
            if !self.closed.admit((location.key(), state.visited), state.cost) {
                continue;
            }

            self.check_expansions()?;
            self.check_deadline()?;
            self.expanded += 1;
            self.expand(entry.state, state)?;
        }
        Ok(())
    }

    fn check_expansions(&self) -> Result<(), SearchExhausted> {
        match self.options.budget.max_expansions {
            Some(limit) if self.expanded >= limit => {
                Err(SearchExhausted::ExpansionBudget { limit })
            }
            _ => Ok(()),
        }
    }

    fn check_deadline(&self) -> Result<(), SearchExhausted> {
        match self.options.budget.deadline {
            Some(limit) if self.started.elapsed() >= limit => Err(SearchExhausted::Deadline {
                limit,
                states_expanded: self.expanded,
            }),
            _ => Ok(()),
        }
    }

    /// Generate every child of `parent`. Complete routes are recorded
    /// immediately instead of joining the frontier.
    #[expect(
        clippy::float_arithmetic,
        reason = "child cost adds the edge cost to the parent cost"
    )]
    fn expand(&mut self, index: usize, parent: SearchState) -> Result<(), SearchExhausted> {
        let count = self.costs.destination_count();
        for destination in parent.visited.missing(count) {
            self.check_deadline()?;
            let node = destination + 1;
            let cost = parent.cost + self.costs.cost(parent.node, node);
            if self.cannot_improve(cost) {
                continue;
            }
            let child = SearchState {
                node,
                visited: parent.visited.with(destination),
                cost,
                parent: Some(index),
            };
            if child.visited == self.goal {
                let leaf = self.arena.push(child);
                self.generated += 1;
                self.record_terminal(leaf, cost);
            } else {
                self.enqueue(child);
            }
        }
        Ok(())
    }

    fn record_terminal(&mut self, leaf: usize, cost: f64) {
        if self.best.is_none_or(|(_, best)| cost < best) {
            self.best = Some((leaf, cost));
        }
    }

    #[expect(clippy::float_arithmetic, reason = "priority is cost plus heuristic")]
    fn enqueue(&mut self, state: SearchState) {
        let priority = state.cost + self.heuristic(state.node, state.visited);
        let index = self.arena.push(state);
        self.generated += 1;
        self.frontier.push(FrontierEntry {
            priority,
            sequence: self.sequence,
            state: index,
        });
        self.sequence += 1;
    }

    fn heuristic(&mut self, node: usize, visited: VisitedSet) -> f64 {
        if let Some(estimate) = self.heuristics.get(&(node, visited)) {
            return *estimate;
        }
        let Some(reference) = self.costs.point(node) else {
            return 0.0;
        };
        let remaining: Vec<Point> = visited
            .missing(self.costs.destination_count())
            .filter_map(|destination| self.costs.point(destination + 1))
            .collect();
        let estimate = mst_cost(reference, &remaining);
        self.heuristics.insert((node, visited), estimate);
        estimate
    }

    fn cannot_improve(&self, cost: f64) -> bool {
        self.best.is_some_and(|(_, best)| cost >= best)
    }
}

type ClosedKey = (LocationKey, VisitedSet);

/// Keys already expanded, under either [`ClosedSetPolicy`].
enum ClosedSet {
    First(HashSet<ClosedKey>),
    Cheapest(HashMap<ClosedKey, f64>),
}

impl ClosedSet {
    fn new(policy: ClosedSetPolicy) -> Self {
        match policy {
            ClosedSetPolicy::FirstExpansion => Self::First(HashSet::new()),
            ClosedSetPolicy::CheapestCost => Self::Cheapest(HashMap::new()),
        }
    }

    /// Record `key` as expanded at `cost`; `false` means skip the state.
    fn admit(&mut self, key: ClosedKey, cost: f64) -> bool {
        match self {
            Self::First(seen) => seen.insert(key),
            Self::Cheapest(best) => match best.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(cost);
                    true
                }
                Entry::Occupied(mut slot) => {
                    if cost < *slot.get() {
                        slot.insert(cost);
                        true
                    } else {
                        false
                    }
                }
            },
        }
    }
}
