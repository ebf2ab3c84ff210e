//! Nearest-neighbour fallback route.

use shopwalk_core::{Destination, Point, haversine_miles};

/// Order destinations by repeatedly visiting the nearest remaining one.
///
/// Distances are haversine miles; ties go to the lowest index. Returns
/// destination indices in visiting order.
#[must_use]
pub fn greedy_order(start: Point, destinations: &[Destination]) -> Vec<usize> {
    let mut remaining: Vec<usize> = (0..destinations.len()).collect();
    let mut order = Vec::with_capacity(destinations.len());
    let mut here = start;

    while let Some((slot, index, location)) = nearest(here, &remaining, destinations) {
        remaining.remove(slot);
        order.push(index);
        here = location;
    }
    order
}

/// Position in `remaining`, destination index and location of the
/// destination nearest to `here`.
fn nearest(
    here: Point,
    remaining: &[usize],
    destinations: &[Destination],
) -> Option<(usize, usize, Point)> {
    remaining
        .iter()
        .enumerate()
        .filter_map(|(slot, &index)| {
            destinations
                .get(index)
                .map(|stop| (slot, index, stop.location))
        })
        .reduce(|best, next| {
            if haversine_miles(here, next.2) < haversine_miles(here, best.2) {
                next
            } else {
                best
            }
        })
}

/// Nearest-neighbour route over `destinations`, starting at `start`.
///
/// # Examples
/// ```
/// use shopwalk_core::Point;
/// use shopwalk_core::test_support::destination;
/// use shopwalk_solver_astar::greedy_route;
///
/// let stops = [destination(1, 0.0, 0.03), destination(2, 0.0, 0.01)];
/// let route = greedy_route(Point::new(0.0, 0.0), &stops);
/// assert_eq!(route.iter().map(|stop| stop.id).collect::<Vec<_>>(), vec![2, 1]);
/// ```
#[must_use]
pub fn greedy_route(start: Point, destinations: &[Destination]) -> Vec<Destination> {
    greedy_order(start, destinations)
        .into_iter()
        .filter_map(|index| destinations.get(index).cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use shopwalk_core::test_support::destination;

    #[rstest]
    fn empty_input_yields_empty_route() {
        assert!(greedy_order(Point::new(0.0, 0.0), &[]).is_empty());
    }

    #[rstest]
    fn follows_nearest_neighbour_chain() {
        let stops = [
            destination(1, 0.02, 0.0),
            destination(2, 0.0, 0.02),
            destination(3, 0.0, 0.01),
        ];
        assert_eq!(greedy_order(Point::new(0.0, 0.0), &stops), vec![2, 1, 0]);
    }

    #[rstest]
    fn ties_go_to_lowest_index() {
        let stops = [destination(1, 0.0, 0.01), destination(2, 0.0, -0.01)];
        assert_eq!(greedy_order(Point::new(0.0, 0.0), &stops), vec![0, 1]);
    }

    #[rstest]
    fn duplicate_locations_are_all_visited() {
        let stops = [
            destination(1, 0.0, 0.01),
            destination(2, 0.0, 0.01),
            destination(3, 0.0, 0.02),
        ];
        assert_eq!(greedy_order(Point::new(0.0, 0.0), &stops), vec![0, 1, 2]);
    }
}
