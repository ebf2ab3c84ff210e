//! Request-scoped edge costs with per-edge haversine fallback.

use std::collections::HashMap;

use shopwalk_core::{Destination, DistanceProvider, Point, haversine_miles};

/// Travel costs between the nodes of one planning call.
///
/// Node 0 is the start point and node `i + 1` is destination `i`. Costs come
/// from the wrapped [`DistanceProvider`]; when it fails or answers with a
/// negative or non-finite figure the haversine distance is used for that edge
/// and counted as a fallback. With memoization enabled each directed edge is
/// priced at most once.
#[derive(Debug)]
pub struct EdgeCosts<'a, P: ?Sized> {
    provider: &'a P,
    nodes: Vec<Point>,
    memo: Option<HashMap<(usize, usize), f64>>,
    fallbacks: u64,
}

impl<'a, P> EdgeCosts<'a, P>
where
    P: DistanceProvider + ?Sized,
{
    /// Build the cost table for a start point and its destinations.
    #[must_use]
    pub fn new(provider: &'a P, start: Point, destinations: &[Destination], memoize: bool) -> Self {
        let nodes = std::iter::once(start)
            .chain(destinations.iter().map(|stop| stop.location))
            .collect();
        Self {
            provider,
            nodes,
            memo: memoize.then(HashMap::new),
            fallbacks: 0,
        }
    }

    /// Number of destinations, excluding the start node.
    #[must_use]
    pub const fn destination_count(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    /// Location of `node`, if it exists.
    #[must_use]
    pub fn point(&self, node: usize) -> Option<Point> {
        self.nodes.get(node).copied()
    }

    /// Edge lookups answered by the haversine fallback so far.
    #[must_use]
    pub const fn fallbacks(&self) -> u64 {
        self.fallbacks
    }

    /// Cost in miles of travelling from node `from` to node `to`.
    pub fn cost(&mut self, from: usize, to: usize) -> f64 {
        if let Some(miles) = self.memo.as_ref().and_then(|memo| memo.get(&(from, to))) {
            return *miles;
        }
        let (Some(origin), Some(target)) = (self.point(from), self.point(to)) else {
            log::warn!("edge {from} -> {to} references an unknown node; treating it as free");
            debug_assert!(false, "edge {from} -> {to} references an unknown node");
            return 0.0;
        };
        let miles = self.price(origin, target);
        if let Some(memo) = self.memo.as_mut() {
            memo.insert((from, to), miles);
        }
        miles
    }

    /// Total cost of visiting destinations in `order`, starting from node 0.
    #[expect(clippy::float_arithmetic, reason = "route length is a sum of legs")]
    pub fn route_cost(&mut self, order: &[usize]) -> f64 {
        let mut previous = 0;
        let mut total = 0.0;
        for &destination in order {
            let node = destination + 1;
            total += self.cost(previous, node);
            previous = node;
        }
        total
    }

    /// Total cost of `order` without querying the provider.
    ///
    /// Legs already priced through [`Self::cost`] reuse that figure; any
    /// other leg is costed with the haversine distance. Used once the search
    /// has given up, when further lookups could outlast its deadline.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "route length is a sum of legs")]
    pub fn known_route_cost(&self, order: &[usize]) -> f64 {
        let mut previous = 0;
        let mut total = 0.0;
        for &destination in order {
            let node = destination + 1;
            total += self.known_cost(previous, node);
            previous = node;
        }
        total
    }

    fn known_cost(&self, from: usize, to: usize) -> f64 {
        if let Some(miles) = self.memo.as_ref().and_then(|memo| memo.get(&(from, to))) {
            return *miles;
        }
        match (self.point(from), self.point(to)) {
            (Some(origin), Some(target)) => haversine_miles(origin, target),
            _ => 0.0,
        }
    }

    fn price(&mut self, origin: Point, target: Point) -> f64 {
        match self.provider.distance(origin, target) {
            Ok(miles) if miles.is_finite() && miles >= 0.0 => miles,
            Ok(miles) => {
                log::debug!(
                    "distance provider returned unusable distance {miles}; using haversine"
                );
                self.fallback(origin, target)
            }
            Err(err) => {
                log::debug!("distance lookup failed: {err}; using haversine");
                self.fallback(origin, target)
            }
        }
    }

    fn fallback(&mut self, origin: Point, target: Point) -> f64 {
        self.fallbacks += 1;
        haversine_miles(origin, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use shopwalk_core::test_support::{
        CountingDistanceProvider, FixedDistanceProvider, destination,
    };

    fn stops() -> Vec<Destination> {
        vec![destination(10, 0.0, 0.01), destination(11, 0.0, 0.02)]
    }

    #[rstest]
    fn provider_distance_is_used_when_valid() {
        let provider = FixedDistanceProvider::miles(2.5);
        let mut costs = EdgeCosts::new(&provider, Point::new(0.0, 0.0), &stops(), true);
        assert_eq!(costs.cost(0, 1), 2.5);
        assert_eq!(costs.fallbacks(), 0);
    }

    #[rstest]
    fn failures_fall_back_to_haversine() {
        let provider = FixedDistanceProvider::unreachable();
        let start = Point::new(0.0, 0.0);
        let mut costs = EdgeCosts::new(&provider, start, &stops(), true);
        let expected = haversine_miles(start, Point::new(0.0, 0.01));
        assert!((costs.cost(0, 1) - expected).abs() < 1e-12);
        assert_eq!(costs.fallbacks(), 1);
    }

    #[rstest]
    #[case(-1.0)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn unusable_distances_fall_back(#[case] miles: f64) {
        let provider = FixedDistanceProvider::miles(miles);
        let mut costs = EdgeCosts::new(&provider, Point::new(0.0, 0.0), &stops(), false);
        assert!(costs.cost(0, 2).is_finite());
        assert_eq!(costs.fallbacks(), 1);
    }

    #[rstest]
    #[case(true, 1)]
    #[case(false, 3)]
    fn memo_prices_each_edge_once(#[case] memoize: bool, #[case] expected_calls: usize) {
        let provider = CountingDistanceProvider::default();
        let mut costs = EdgeCosts::new(&provider, Point::new(0.0, 0.0), &stops(), memoize);
        for _ in 0..3 {
            costs.cost(1, 2);
        }
        assert_eq!(provider.calls(), expected_calls);
    }

    #[rstest]
    fn route_cost_sums_legs_from_start() {
        let provider = FixedDistanceProvider::miles(1.5);
        let mut costs = EdgeCosts::new(&provider, Point::new(0.0, 0.0), &stops(), true);
        assert_eq!(costs.route_cost(&[1, 0]), 3.0);
        assert_eq!(costs.route_cost(&[]), 0.0);
        assert_eq!(costs.destination_count(), 2);
    }

    #[rstest]
    fn known_route_cost_never_queries_the_provider() {
        let provider = CountingDistanceProvider::default();
        let start = Point::new(0.0, 0.0);
        let mut costs = EdgeCosts::new(&provider, start, &stops(), true);
        let priced = costs.cost(0, 1);
        let calls = provider.calls();

        let total = costs.known_route_cost(&[0, 1]);

        assert_eq!(provider.calls(), calls);
        let unpriced = haversine_miles(Point::new(0.0, 0.01), Point::new(0.0, 0.02));
        assert!((total - (priced + unpriced)).abs() < 1e-12);
    }

    #[rstest]
    fn known_route_cost_prefers_memoised_legs() {
        let provider = FixedDistanceProvider::miles(7.0);
        let mut costs = EdgeCosts::new(&provider, Point::new(0.0, 0.0), &stops(), true);
        costs.cost(0, 1);
        costs.cost(1, 2);
        assert_eq!(costs.known_route_cost(&[0, 1]), 14.0);
    }
}
