//! roster-core — shared types for roster balancing.
//!
//! Holds the course/section/enrollment records decoded from the upstream
//! LMS API, the inbound work-item payloads, and the runtime configuration
//! consumed by the client and the reconciliation driver.

pub mod config;
pub mod types;
pub mod work;

pub use config::{ConfigError, DropMode, RosterConfig};
pub use types::*;
pub use work::{BatchPayload, WorkItem};
