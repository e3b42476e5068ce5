//! Outcome of one reconciliation run.

use crate::group::{GroupOrigin, TargetGroup};

/// Final state of one target group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSummary {
    pub name: String,
    pub id: Option<String>,
    pub occupancy: u32,
    pub origin: GroupOrigin,
}

impl From<&TargetGroup> for GroupSummary {
    fn from(group: &TargetGroup) -> Self {
        Self {
            name: group.name.clone(),
            id: group.id.clone(),
            occupancy: group.occupancy,
            origin: group.origin,
        }
    }
}

/// Counts and group states for one work item.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SyncReport {
    pub course_id: String,
    pub course_name: String,
    pub dry_run: bool,
    pub groups: Vec<GroupSummary>,
    /// Requested names whose creation failed.
    pub skipped_groups: Vec<String>,
    pub unplaced: usize,
    pub placed: usize,
    pub failed_placements: usize,
    pub withdrawals: usize,
    pub dropped: usize,
    pub failed_drops: usize,
}

impl SyncReport {
    /// Final occupancy of the group named `name`.
    pub fn occupancy_of(&self, name: &str) -> Option<u32> {
        self.groups
            .iter()
            .find(|g| g.name == name)
            .map(|g| g.occupancy)
    }

    /// One-line status naming the course.
    pub fn summary(&self) -> String {
        let mut line = if self.dry_run {
            format!(
                "Planned course '{}' ({}): would place {} students across {} sections, \
                 would remove {} withdrawn enrollments",
                self.course_name,
                self.course_id,
                self.placed,
                self.groups.len(),
                self.withdrawals,
            )
        } else {
            format!(
                "Rebalanced course '{}' ({}): placed {}/{} students across {} sections, \
                 removed {}/{} withdrawn enrollments",
                self.course_name,
                self.course_id,
                self.placed,
                self.unplaced,
                self.groups.len(),
                self.dropped,
                self.withdrawals,
            )
        };

        if !self.skipped_groups.is_empty() {
            line.push_str(&format!(
                "; skipped sections: {}",
                self.skipped_groups.join(", ")
            ));
        }
        line
    }
}
