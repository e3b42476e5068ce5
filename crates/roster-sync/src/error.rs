//! Reconciliation error types.

use thiserror::Error;

use roster_client::RequestError;

/// Read-phase failure. Aborts the current work item before any write.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("failed to fetch course {course}: {source}")]
    Course {
        course: String,
        #[source]
        source: RequestError,
    },

    #[error("failed to fetch roster of course {course}: {source}")]
    Roster {
        course: String,
        #[source]
        source: RequestError,
    },

    #[error("failed to fetch sections of course {course}: {source}")]
    Sections {
        course: String,
        #[source]
        source: RequestError,
    },
}

pub type SyncResult<T> = Result<T, SyncError>;
