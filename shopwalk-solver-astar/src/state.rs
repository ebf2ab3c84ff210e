//! Search states, the visited set, and the arena that owns them.

use std::cmp::Ordering;

/// Set of destination indices, stored as a 64-bit mask.
///
/// Index `i` refers to the `i`th destination of the planning request.
/// Indices of 64 and above cannot be represented; the planner routes such
/// requests to the greedy fallback instead of searching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct VisitedSet(u64);

impl VisitedSet {
    /// Largest number of destinations a search can track.
    pub const CAPACITY: usize = 64;

    /// The set with no destinations.
    pub const EMPTY: Self = Self(0);

    /// The set `{0, .., count - 1}`, saturating at [`Self::CAPACITY`].
    #[must_use]
    pub fn all(count: usize) -> Self {
        if count >= Self::CAPACITY {
            return Self(u64::MAX);
        }
        Self(bit(count).wrapping_sub(1))
    }

    /// Whether `index` is in the set.
    #[must_use]
    pub fn contains(self, index: usize) -> bool {
        self.0 & bit(index) != 0
    }

    /// This set plus `index`.
    #[must_use]
    pub fn with(self, index: usize) -> Self {
        Self(self.0 | bit(index))
    }

    /// Number of indices in the set.
    #[must_use]
    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }

    /// Whether the set is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Indices below `count` that are not in the set, ascending.
    pub fn missing(self, count: usize) -> impl Iterator<Item = usize> {
        (0..count.min(Self::CAPACITY)).filter(move |&index| !self.contains(index))
    }
}

fn bit(index: usize) -> u64 {
    u32::try_from(index)
        .ok()
        .and_then(|shift| 1_u64.checked_shl(shift))
        .unwrap_or(0)
}

/// One node of the search tree.
///
/// `node` 0 is the start point and `node` `i + 1` is destination `i`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SearchState {
    pub(crate) node: usize,
    pub(crate) visited: VisitedSet,
    pub(crate) cost: f64,
    pub(crate) parent: Option<usize>,
}

/// Owns every state generated during one search.
///
/// Parents are arena indices, so the chain from any state back to the root
/// can be walked without reference counting.
#[derive(Debug, Default)]
pub(crate) struct StateArena {
    states: Vec<SearchState>,
}

impl StateArena {
    pub(crate) fn push(&mut self, state: SearchState) -> usize {
        self.states.push(state);
        self.states.len() - 1
    }

    pub(crate) fn get(&self, index: usize) -> Option<SearchState> {
        self.states.get(index).copied()
    }

    /// Destination indices from the root to `leaf`, in visiting order.
    pub(crate) fn destination_order(&self, leaf: usize) -> Vec<usize> {
        let mut order = Vec::new();
        let mut cursor = Some(leaf);
        while let Some(index) = cursor {
            let Some(state) = self.get(index) else {
                debug_assert!(false, "parent index {index} missing from arena");
                break;
            };
            if let Some(destination) = state.node.checked_sub(1) {
                order.push(destination);
            }
            cursor = state.parent;
        }
        order.reverse();
        order
    }
}

/// Frontier entry: a state handle with its priority and insertion sequence.
///
/// Ordered so that [`std::collections::BinaryHeap`] pops the lowest priority
/// first, then the earliest inserted.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FrontierEntry {
    pub(crate) priority: f64,
    pub(crate) sequence: u64,
    pub(crate) state: usize,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}
