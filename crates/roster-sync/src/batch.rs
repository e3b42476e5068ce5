//! Batch processing of work items.

use rand::Rng;
use tracing::info;

use roster_core::WorkItem;

use crate::driver::Reconciler;

/// Status lines of one batch, one per work item in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    pub statuses: Vec<String>,
}

impl BatchOutcome {
    /// All status lines joined by newlines.
    pub fn text(&self) -> String {
        self.statuses.join("\n")
    }
}

/// Process `items` one after another. A failed item yields an error line
/// and does not stop the batch.
pub async fn run_batch<R>(reconciler: &Reconciler, items: &[WorkItem], rng: &mut R) -> BatchOutcome
where
    R: Rng + Send + ?Sized,
{
    info!(items = items.len(), "starting batch");

    let mut statuses = Vec::with_capacity(items.len());
    for item in items {
        statuses.push(reconciler.run_item(item, rng).await);
    }

    info!(items = items.len(), "batch complete");
    BatchOutcome { statuses }
}
