//! Randomized ordering of unplaced members.
//!
//! The random source is a parameter so callers can pass a seeded
//! `StdRng` in tests and `thread_rng`/`from_entropy` in production.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::engine::{AssignmentPlan, assign};

/// Unbiased in-place Fisher–Yates shuffle.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    items.shuffle(rng);
}

/// Shuffle `members` in place, then plan their placement.
///
/// Plan indices refer to the shuffled order.
pub fn shuffled_plan<T, R: Rng + ?Sized>(
    members: &mut [T],
    occupancies: &[u32],
    rng: &mut R,
) -> AssignmentPlan {
    shuffle(members, rng);
    assign(members, occupancies)
}
