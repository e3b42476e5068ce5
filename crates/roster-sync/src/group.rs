//! Target groups and the membership rules evaluated against them.

use std::collections::HashSet;

use roster_core::{Enrollment, Member, MemberId, Section, SectionId};

/// How a target group came to be part of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupOrigin {
    Existing,
    Created,
    /// Missing upstream; a dry run would create it.
    Planned,
}

/// A requested section resolved for one run.
///
/// `occupancy` is the running count for this run: seeded from the server
/// and bumped only when an enrollment is confirmed.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetGroup {
    pub name: String,
    /// `None` only for a group a dry run would have created.
    pub id: Option<SectionId>,
    pub occupancy: u32,
    pub origin: GroupOrigin,
    members: HashSet<MemberId>,
}

impl TargetGroup {
    /// Reuse an existing section, seeding occupancy from the server.
    pub fn existing(section: &Section) -> Self {
        Self {
            name: section.name.clone(),
            id: Some(section.id.clone()),
            occupancy: section.occupancy(),
            origin: GroupOrigin::Existing,
            members: section.students.iter().map(|s| s.id.clone()).collect(),
        }
    }

    /// A section created during this run.
    pub fn created(section: &Section) -> Self {
        Self {
            name: section.name.clone(),
            id: Some(section.id.clone()),
            occupancy: 0,
            origin: GroupOrigin::Created,
            members: HashSet::new(),
        }
    }

    /// A section a dry run would create.
    pub fn planned(name: &str) -> Self {
        Self {
            name: name.to_string(),
            id: None,
            occupancy: 0,
            origin: GroupOrigin::Planned,
            members: HashSet::new(),
        }
    }

    pub fn lists_member(&self, member_id: &str) -> bool {
        self.members.contains(member_id)
    }
}

/// First section whose name matches `name` exactly (case-sensitive).
pub fn find_section<'a>(sections: &'a [Section], name: &str) -> Option<&'a Section> {
    sections.iter().find(|s| s.name == name)
}

/// Ids of every group that exists upstream.
pub fn target_ids(groups: &[TargetGroup]) -> Vec<&str> {
    groups.iter().filter_map(|g| g.id.as_deref()).collect()
}

/// Members not yet in any target group.
///
/// A member is excluded when a group lists it among its members or when
/// one of its own enrollments already references a target group.
pub fn unplaced_members<'a>(members: &'a [Member], groups: &[TargetGroup]) -> Vec<&'a Member> {
    let ids = target_ids(groups);
    members
        .iter()
        .filter(|m| !groups.iter().any(|g| g.lists_member(&m.id)))
        .filter(|m| !m.is_enrolled_in_any(&ids))
        .collect()
}

/// Enrollments of members who hold nothing but a target-group enrollment.
///
/// Such a member has lost their original course enrollment, meaning they
/// withdrew after being placed.
pub fn withdrawal_candidates<'a>(
    members: &'a [Member],
    groups: &[TargetGroup],
) -> Vec<&'a Enrollment> {
    let ids = target_ids(groups);
    members
        .iter()
        .filter_map(|m| match m.enrollments.as_slice() {
            [only] if ids.contains(&only.section_id.as_str()) => Some(only),
            _ => None,
        })
        .collect()
}
