//! Assignment engine: place members into the least-occupied group.
//!
//! For each member, in input order:
//! 1. If one or more groups sit below the others, target the least
//!    occupied (leftmost on ties).
//! 2. If every group holds the same count, fall back to round-robin on
//!    the member's position: member `i` goes to group `i % groups`.
//! 3. Bump the targeted group's running count before the next member.
//!
//! Starting from equal occupancies the first `groups` members therefore
//! land in groups `0, 1, 2, ...` in order.

use tracing::{debug, warn};

/// One planned enrollment: `members[member]` into group `group`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub member: usize,
    pub group: usize,
}

/// Output of [`assign`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AssignmentPlan {
    /// Placements in the order they must be applied.
    pub placements: Vec<Placement>,
    /// Occupancy of every group once all placements succeed.
    pub projected: Vec<u32>,
}

impl AssignmentPlan {
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    /// Number of placements targeting `group`.
    pub fn count_for(&self, group: usize) -> usize {
        self.placements.iter().filter(|p| p.group == group).count()
    }
}

/// Index of the smallest value, or `None` when every value is equal.
///
/// Ties between several smallest values resolve to the leftmost. An empty
/// slice has no minimum.
pub fn index_of_smallest(values: &[u32]) -> Option<usize> {
    let first = *values.first()?;
    if values.iter().all(|&v| v == first) {
        return None;
    }

    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v < values[best] {
            best = i;
        }
    }
    Some(best)
}

/// Plan the placement of every member in `members` given current group
/// `occupancies`.
///
/// Pure: no I/O, no randomness. Callers shuffle `members` first so that
/// round-robin ties are not positional.
pub fn assign<T>(members: &[T], occupancies: &[u32]) -> AssignmentPlan {
    let groups = occupancies.len();
    let mut running = occupancies.to_vec();

    if groups == 0 {
        if !members.is_empty() {
            warn!(members = members.len(), "no target groups; nothing assigned");
        }
        return AssignmentPlan {
            placements: Vec::new(),
            projected: running,
        };
    }

    let mut placements = Vec::with_capacity(members.len());
    for member in 0..members.len() {
        let group = match index_of_smallest(&running) {
            Some(min) => min,
            None => member % groups,
        };
        running[group] = running[group].saturating_add(1);
        placements.push(Placement { member, group });
        debug!(member, group, occupancy = running[group], "planned placement");
    }

    AssignmentPlan {
        placements,
        projected: running,
    }
}
