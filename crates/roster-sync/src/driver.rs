//! Reconciliation driver: one full run for one course.
//!
//! ```text
//! read      course, roster, sections         (any failure aborts the item)
//! resolve   reuse or create each target section
//! place     shuffle unplaced members → engine → enroll in plan order
//! drop      remove sole target-section enrollments of withdrawn members
//! report    one summary line
//! ```
//!
//! Every call is awaited before the next is issued. Occupancy lives in
//! the run's `TargetGroup`s and is bumped only on a confirmed enrollment.

use std::sync::Arc;

use rand::Rng;
use tracing::{debug, error, info, warn};

use roster_balance::shuffled_plan;
use roster_client::RosterGateway;
use roster_core::{Course, Member, Section, WorkItem};

use crate::error::{SyncError, SyncResult};
use crate::group::{TargetGroup, find_section, unplaced_members, withdrawal_candidates};
use crate::report::{GroupSummary, SyncReport};

/// Reconciles work items against one gateway.
#[derive(Clone)]
pub struct Reconciler {
    gateway: Arc<dyn RosterGateway>,
}

/// Everything the read phase fetched.
struct Snapshot {
    course: Course,
    members: Vec<Member>,
    sections: Vec<Section>,
}

impl Reconciler {
    pub fn new(gateway: Arc<dyn RosterGateway>) -> Self {
        Self { gateway }
    }

    /// Run one work item and render its status line.
    ///
    /// A read-phase failure becomes an error line instead of a summary.
    pub async fn run_item<R>(&self, item: &WorkItem, rng: &mut R) -> String
    where
        R: Rng + Send + ?Sized,
    {
        match self.reconcile(item, rng).await {
            Ok(report) => report.summary(),
            Err(e) => format!("Error processing course {}: {e}", item.course_id),
        }
    }

    /// Run one work item end to end.
    pub async fn reconcile<R>(&self, item: &WorkItem, rng: &mut R) -> SyncResult<SyncReport>
    where
        R: Rng + Send + ?Sized,
    {
        info!(course = %item.course_id, sections = ?item.section_names, dry_run = item.dry_run, "reconciling course");

        let snapshot = match self.read(&item.course_id).await {
            Ok(s) => s,
            Err(e) => {
                error!(course = %item.course_id, error = %e, "read phase failed; no writes attempted");
                return Err(e);
            }
        };

        let mut report = SyncReport {
            course_id: snapshot.course.id.clone(),
            course_name: snapshot.course.name.clone(),
            dry_run: item.dry_run,
            ..Default::default()
        };

        let mut groups = self
            .resolve_groups(&snapshot, item, &mut report.skipped_groups)
            .await;

        self.place(&snapshot, &mut groups, item.dry_run, rng, &mut report)
            .await;

        self.drop_withdrawals(&snapshot, &groups, item.dry_run, &mut report)
            .await;

        report.groups = groups.iter().map(GroupSummary::from).collect();

        info!(
            course = %report.course_id,
            placed = report.placed,
            failed_placements = report.failed_placements,
            dropped = report.dropped,
            failed_drops = report.failed_drops,
            "course reconciled"
        );
        Ok(report)
    }

    async fn read(&self, course_id: &str) -> SyncResult<Snapshot> {
        let course = self
            .gateway
            .get_course(course_id)
            .await
            .map_err(|source| SyncError::Course {
                course: course_id.to_string(),
                source,
            })?;

        let members = self
            .gateway
            .list_students(course_id)
            .await
            .map_err(|source| SyncError::Roster {
                course: course_id.to_string(),
                source,
            })?;

        let sections = self
            .gateway
            .list_sections(course_id)
            .await
            .map_err(|source| SyncError::Sections {
                course: course_id.to_string(),
                source,
            })?;

        debug!(
            course = course_id,
            members = members.len(),
            sections = sections.len(),
            "read phase complete"
        );
        Ok(Snapshot {
            course,
            members,
            sections,
        })
    }

    /// Match each requested name against the fetched sections, creating
    /// the missing ones. A failed creation drops that name from the run.
    async fn resolve_groups(
        &self,
        snapshot: &Snapshot,
        item: &WorkItem,
        skipped: &mut Vec<String>,
    ) -> Vec<TargetGroup> {
        let mut groups = Vec::new();

        for name in item.distinct_section_names() {
            if let Some(section) = find_section(&snapshot.sections, name) {
                debug!(section = name, id = %section.id, occupancy = section.occupancy(), "reusing section");
                groups.push(TargetGroup::existing(section));
                continue;
            }

            if item.dry_run {
                groups.push(TargetGroup::planned(name));
                continue;
            }

            match self.gateway.create_section(&snapshot.course.id, name).await {
                Some(section) => groups.push(TargetGroup::created(&section)),
                None => {
                    warn!(
                        course = %snapshot.course.id,
                        section = name,
                        "section unavailable; continuing with remaining sections"
                    );
                    skipped.push(name.to_string());
                }
            }
        }

        groups
    }

    async fn place<R>(
        &self,
        snapshot: &Snapshot,
        groups: &mut [TargetGroup],
        dry_run: bool,
        rng: &mut R,
        report: &mut SyncReport,
    ) where
        R: Rng + Send + ?Sized,
    {
        let mut unplaced = unplaced_members(&snapshot.members, groups);
        report.unplaced = unplaced.len();
        if unplaced.is_empty() {
            debug!(course = %snapshot.course.id, "no unplaced members");
            return;
        }
        if groups.is_empty() {
            warn!(course = %snapshot.course.id, unplaced = unplaced.len(), "no target sections available");
            return;
        }

        let occupancies: Vec<u32> = groups.iter().map(|g| g.occupancy).collect();
        let plan = shuffled_plan(&mut unplaced, &occupancies, rng);
        debug!(course = %snapshot.course.id, placements = plan.len(), projected = ?plan.projected, "assignment planned");

        for placement in &plan.placements {
            let member = unplaced[placement.member];
            let group = &mut groups[placement.group];

            if dry_run {
                group.occupancy = group.occupancy.saturating_add(1);
                report.placed += 1;
                continue;
            }

            let Some(section_id) = group.id.as_deref() else {
                continue;
            };
            match self.gateway.create_enrollment(section_id, &member.id).await {
                Some(_) => {
                    group.occupancy = group.occupancy.saturating_add(1);
                    report.placed += 1;
                    debug!(member = %member.id, section = %group.name, occupancy = group.occupancy, "member placed");
                }
                None => report.failed_placements += 1,
            }
        }
    }

    async fn drop_withdrawals(
        &self,
        snapshot: &Snapshot,
        groups: &[TargetGroup],
        dry_run: bool,
        report: &mut SyncReport,
    ) {
        let candidates = withdrawal_candidates(&snapshot.members, groups);
        report.withdrawals = candidates.len();

        for enrollment in candidates {
            if dry_run {
                debug!(member = %enrollment.member_id, enrollment = %enrollment.id, "would remove enrollment");
                continue;
            }

            match self
                .gateway
                .delete_enrollment(&snapshot.course.id, enrollment)
                .await
            {
                Some(_) => {
                    report.dropped += 1;
                    info!(member = %enrollment.member_id, enrollment = %enrollment.id, "removed withdrawn member");
                }
                None => report.failed_drops += 1,
            }
        }
    }
}
