//! roster-sync — reconciles a course's section layout against a request.
//!
//! For each work item the driver reads the course, its student roster
//! and its sections, makes sure every requested section exists, spreads
//! the students who are in none of them across the sections with the
//! balancing engine, and removes the section enrollments of students who
//! have left the course.
//!
//! # Architecture
//!
//! ```text
//! WorkItem ──→ Reconciler ──→ RosterGateway (reads, then writes)
//!                  │
//!                  ├── group    (target resolution, unplaced, withdrawals)
//!                  ├── roster_balance::shuffled_plan
//!                  └── report   (SyncReport → status line)
//! ```

pub mod batch;
pub mod driver;
pub mod error;
pub mod group;
pub mod report;

pub use batch::{BatchOutcome, run_batch};
pub use driver::Reconciler;
pub use error::{SyncError, SyncResult};
pub use group::{GroupOrigin, TargetGroup};
pub use report::{GroupSummary, SyncReport};
