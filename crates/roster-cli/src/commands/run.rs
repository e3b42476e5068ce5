use anyhow::Context;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use roster_core::{RosterConfig, WorkItem};
use roster_sync::Reconciler;

/// Reconcile one course and print its summary. A read-phase failure is
/// returned, not printed, so `main` reports it once.
pub async fn run(
    config: &RosterConfig,
    course: String,
    sections: Vec<String>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let reconciler = Reconciler::new(super::gateway(config)?);

    let mut item = WorkItem::new(course, sections);
    item.dry_run = dry_run;

    let summary = reconcile_one(&reconciler, &item, &mut StdRng::from_entropy()).await?;
    println!("{summary}");
    Ok(())
}

async fn reconcile_one<R>(
    reconciler: &Reconciler,
    item: &WorkItem,
    rng: &mut R,
) -> anyhow::Result<String>
where
    R: Rng + Send + ?Sized,
{
    let report = reconciler
        .reconcile(item, rng)
        .await
        .with_context(|| format!("Error processing course {}", item.course_id))?;
    Ok(report.summary())
}
