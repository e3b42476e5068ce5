//! roster-balance — balanced random assignment into sections.
//!
//! Given the current occupancy of K target groups and a set of members not
//! yet in any of them, produces an ordered plan that fills the
//! least-occupied group first and falls back to round-robin once the
//! groups are level. The plan is pure data; the reconciliation driver
//! applies it.
//!
//! # Components
//!
//! - **`engine`** — minimum search and the assignment loop
//! - **`shuffle`** — injectable-RNG shuffle applied before planning

pub mod engine;
pub mod shuffle;

pub use engine::{AssignmentPlan, Placement, assign, index_of_smallest};
pub use shuffle::{shuffle, shuffled_plan};
