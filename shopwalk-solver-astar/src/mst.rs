//! Minimum-spanning-tree lower bound used as the search heuristic.

use shopwalk_core::{Point, haversine_miles};

/// Cost of a minimum spanning tree over `points`, in haversine miles.
///
/// Prim's algorithm is seeded with the point nearest to `reference`; the edge
/// from `reference` to that seed is not counted. The result never exceeds
/// the length of any path that visits every point, and does not depend on
/// the order of `points`.
///
/// Empty and single-point inputs cost nothing.
///
/// # Examples
/// ```
/// use shopwalk_core::Point;
/// use shopwalk_solver_astar::mst_cost;
///
/// assert_eq!(mst_cost(Point::new(0.0, 0.0), &[]), 0.0);
/// assert_eq!(mst_cost(Point::new(0.0, 0.0), &[Point::new(1.0, 1.0)]), 0.0);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "spanning tree cost accumulates floating-point edge weights"
)]
pub fn mst_cost(reference: Point, points: &[Point]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }

    let Some(seed) = nearest_index(reference, points) else {
        return 0.0;
    };

    // Cheapest known edge from the built tree to each point; `None` once built.
    let mut frontier: Vec<Option<f64>> = points
        .iter()
        .map(|point| Some(haversine_miles(points_at(points, seed), *point)))
        .collect();
    if let Some(slot) = frontier.get_mut(seed) {
        *slot = None;
    }

    let mut total = 0.0;
    while let Some((next, weight)) = cheapest(&frontier) {
        total += weight;
        if let Some(slot) = frontier.get_mut(next) {
            *slot = None;
        }
        let joined = points_at(points, next);
        for (slot, point) in frontier.iter_mut().zip(points) {
            if let Some(best) = slot {
                let candidate = haversine_miles(joined, *point);
                if candidate < *best {
                    *best = candidate;
                }
            }
        }
    }
    total
}

/// Index of the point nearest to `reference`; ties go to the lowest index.
pub(crate) fn nearest_index(reference: Point, points: &[Point]) -> Option<usize> {
    points
        .iter()
        .enumerate()
        .map(|(index, point)| (index, haversine_miles(reference, *point)))
        .reduce(|best, next| if next.1 < best.1 { next } else { best })
        .map(|(index, _)| index)
}

fn cheapest(frontier: &[Option<f64>]) -> Option<(usize, f64)> {
    frontier
        .iter()
        .enumerate()
        .filter_map(|(index, weight)| weight.map(|w| (index, w)))
        .reduce(|best, next| if next.1 < best.1 { next } else { best })
}

fn points_at(points: &[Point], index: usize) -> Point {
    points.get(index).copied().unwrap_or_else(|| {
        debug_assert!(false, "point index {index} out of range");
        Point::new(0.0, 0.0)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    /// Degrees of latitude per mile on a 3959-mile sphere.
    const DEGREES_PER_MILE: f64 = 1.0 / 69.0975;

    fn right_triangle() -> (Point, Point, Point) {
        let vertex = Point::new(0.0, 0.0);
        let north = Point::new(3.0 * DEGREES_PER_MILE, 0.0);
        let east = Point::new(0.0, 4.0 * DEGREES_PER_MILE);
        (vertex, north, east)
    }

    #[rstest]
    fn empty_input_costs_nothing() {
        assert_eq!(mst_cost(Point::new(10.0, 10.0), &[]), 0.0);
    }

    #[rstest]
    fn single_point_costs_nothing() {
        assert_eq!(
            mst_cost(Point::new(10.0, 10.0), &[Point::new(11.0, 11.0)]),
            0.0
        );
    }

    #[rstest]
    fn right_triangle_spans_both_legs() {
        let (vertex, north, east) = right_triangle();
        let cost = mst_cost(vertex, &[vertex, north, east]);
        assert!((cost - 7.0).abs() < 0.01, "got {cost}");
    }

    #[rstest]
    fn reference_edge_is_not_counted() {
        let (vertex, north, east) = right_triangle();
        let far = Point::new(1.0, 1.0);
        // Hypotenuse is 5 miles; the tree over the two far corners is one edge.
        let cost = mst_cost(far, &[north, east]);
        assert!((cost - 5.0).abs() < 0.01, "got {cost}");
        assert!(mst_cost(vertex, &[north, east]) < 5.01);
    }

    #[rstest]
    #[case(vec![0, 1, 2, 3])]
    #[case(vec![3, 2, 1, 0])]
    #[case(vec![2, 0, 3, 1])]
    fn cost_ignores_point_order(#[case] order: Vec<usize>) {
        let points = [
            Point::new(0.0, 0.01),
            Point::new(0.0, 0.02),
            Point::new(0.02, 0.0),
            Point::new(0.015, 0.015),
        ];
        let shuffled: Vec<Point> = order
            .iter()
            .map(|&index| *points.get(index).expect("index in range"))
            .collect();
        let baseline = mst_cost(Point::new(0.0, 0.0), &points);
        let permuted = mst_cost(Point::new(0.0, 0.0), &shuffled);
        assert!((baseline - permuted).abs() < 1e-9);
    }

    #[rstest]
    fn nearest_index_prefers_lowest_on_ties() {
        let points = [Point::new(0.0, 1.0), Point::new(0.0, -1.0)];
        assert_eq!(nearest_index(Point::new(0.0, 0.0), &points), Some(0));
        assert_eq!(nearest_index(Point::new(0.0, 0.0), &[]), None);
    }
}
