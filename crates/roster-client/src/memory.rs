//! In-memory gateway for tests and offline runs.
//!
//! Holds courses, rosters, and sections in a mutex and applies writes to
//! them the way the LMS would. Individual reads and writes can be made to
//! fail to exercise the driver's degraded paths.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use roster_core::{Course, Enrollment, Member, Section, SectionStudent};

use crate::error::{RequestError, RequestResult};
use crate::gateway::RosterGateway;

/// A write the gateway received, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    CreateSection { course: String, name: String },
    CreateEnrollment { section: String, member: String },
    DeleteEnrollment { course: String, enrollment: String },
}

#[derive(Default)]
struct MemoryState {
    courses: HashMap<String, Course>,
    rosters: HashMap<String, Vec<Member>>,
    sections: HashMap<String, Vec<Section>>,
    failing_reads: HashSet<String>,
    failing_sections: HashSet<String>,
    failing_members: HashSet<String>,
    failing_deletes: HashSet<String>,
    calls: Vec<GatewayCall>,
    next_id: u64,
}

impl MemoryState {
    fn fresh_id(&mut self) -> String {
        self.next_id += 1;
        format!("mem-{}", self.next_id)
    }

    fn course_of_section(&self, section_id: &str) -> Option<String> {
        self.sections
            .iter()
            .find(|(_, list)| list.iter().any(|s| s.id == section_id))
            .map(|(course, _)| course.clone())
    }
}

#[derive(Default)]
pub struct InMemoryGateway {
    state: Mutex<MemoryState>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn with_course(self, id: &str, name: &str) -> Self {
        self.lock().courses.insert(
            id.to_string(),
            Course {
                id: id.to_string(),
                name: name.to_string(),
            },
        );
        self
    }

    /// Add a section whose server-reported total equals its member count.
    pub fn with_section(self, course: &str, id: &str, name: &str, students: &[&str]) -> Self {
        let section = Section {
            id: id.to_string(),
            name: name.to_string(),
            total_students: Some(students.len() as u32),
            students: students
                .iter()
                .map(|s| SectionStudent {
                    id: s.to_string(),
                    name: None,
                })
                .collect(),
        };
        self.lock()
            .sections
            .entry(course.to_string())
            .or_default()
            .push(section);
        self
    }

    /// Add a roster member enrolled in each of `section_ids`.
    pub fn with_member(self, course: &str, id: &str, section_ids: &[&str]) -> Self {
        {
            let mut state = self.lock();
            let enrollments = section_ids
                .iter()
                .map(|section| Enrollment {
                    id: format!("e-{id}-{section}"),
                    section_id: section.to_string(),
                    member_id: id.to_string(),
                })
                .collect();
            state
                .rosters
                .entry(course.to_string())
                .or_default()
                .push(Member {
                    id: id.to_string(),
                    name: None,
                    enrollments,
                });
        }
        self
    }

    /// Make every read for `course` fail.
    pub fn fail_reads(self, course: &str) -> Self {
        self.lock().failing_reads.insert(course.to_string());
        self
    }

    /// Make creating a section named `name` fail.
    pub fn fail_section(self, name: &str) -> Self {
        self.lock().failing_sections.insert(name.to_string());
        self
    }

    /// Make enrolling `member` anywhere fail.
    pub fn fail_enrollment_for(self, member: &str) -> Self {
        self.lock().failing_members.insert(member.to_string());
        self
    }

    /// Make removing `enrollment` fail.
    pub fn fail_delete(self, enrollment: &str) -> Self {
        self.lock().failing_deletes.insert(enrollment.to_string());
        self
    }

    /// Writes received so far.
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.lock().calls.clone()
    }

    /// Current sections of `course`.
    pub fn sections(&self, course: &str) -> Vec<Section> {
        self.lock().sections.get(course).cloned().unwrap_or_default()
    }

    /// Current roster of `course`.
    pub fn members(&self, course: &str) -> Vec<Member> {
        self.lock().rosters.get(course).cloned().unwrap_or_default()
    }

    fn check_read(&self, course: &str, what: &str) -> RequestResult<()> {
        if self.lock().failing_reads.contains(course) {
            return Err(RequestError::Status {
                url: format!("memory://courses/{course}/{what}"),
                status: 503,
                body: "injected failure".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl RosterGateway for InMemoryGateway {
    async fn get_course(&self, course_id: &str) -> RequestResult<Course> {
        self.check_read(course_id, "")?;
        self.lock()
            .courses
            .get(course_id)
            .cloned()
            .ok_or_else(|| RequestError::Status {
                url: format!("memory://courses/{course_id}"),
                status: 404,
                body: "course not found".to_string(),
            })
    }

    async fn list_students(&self, course_id: &str) -> RequestResult<Vec<Member>> {
        self.check_read(course_id, "users")?;
        Ok(self.members(course_id))
    }

    async fn list_sections(&self, course_id: &str) -> RequestResult<Vec<Section>> {
        self.check_read(course_id, "sections")?;
        Ok(self.sections(course_id))
    }

    async fn create_section(&self, course_id: &str, name: &str) -> Option<Section> {
        let mut state = self.lock();
        state.calls.push(GatewayCall::CreateSection {
            course: course_id.to_string(),
            name: name.to_string(),
        });
        if state.failing_sections.contains(name) {
            return None;
        }

        let section = Section {
            id: state.fresh_id(),
            name: name.to_string(),
            total_students: Some(0),
            students: Vec::new(),
        };
        state
            .sections
            .entry(course_id.to_string())
            .or_default()
            .push(section.clone());
        Some(section)
    }

    async fn create_enrollment(&self, section_id: &str, member_id: &str) -> Option<Enrollment> {
        let mut state = self.lock();
        state.calls.push(GatewayCall::CreateEnrollment {
            section: section_id.to_string(),
            member: member_id.to_string(),
        });
        if state.failing_members.contains(member_id) {
            return None;
        }

        let course = state.course_of_section(section_id)?;
        let enrollment = Enrollment {
            id: state.fresh_id(),
            section_id: section_id.to_string(),
            member_id: member_id.to_string(),
        };

        let member = state
            .rosters
            .get_mut(&course)?
            .iter_mut()
            .find(|m| m.id == member_id)?;
        member.enrollments.push(enrollment.clone());

        if let Some(section) = state
            .sections
            .get_mut(&course)
            .and_then(|list| list.iter_mut().find(|s| s.id == section_id))
        {
            section.students.push(SectionStudent {
                id: member_id.to_string(),
                name: None,
            });
            section.total_students = Some(section.students.len() as u32);
        }
        Some(enrollment)
    }

    async fn delete_enrollment(&self, course_id: &str, enrollment: &Enrollment) -> Option<Enrollment> {
        let enrollment_id = enrollment.id.as_str();
        let mut state = self.lock();
        state.calls.push(GatewayCall::DeleteEnrollment {
            course: course_id.to_string(),
            enrollment: enrollment_id.to_string(),
        });
        if state.failing_deletes.contains(enrollment_id) {
            return None;
        }

        let mut removed = None;
        for member in state.rosters.get_mut(course_id)?.iter_mut() {
            if let Some(pos) = member.enrollments.iter().position(|e| e.id == enrollment_id) {
                removed = Some(member.enrollments.remove(pos));
                break;
            }
        }
        let removed = removed?;

        if let Some(section) = state
            .sections
            .get_mut(course_id)
            .and_then(|list| list.iter_mut().find(|s| s.id == removed.section_id))
        {
            section.students.retain(|s| s.id != removed.member_id);
            section.total_students = Some(section.students.len() as u32);
        }
        Some(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn enrollment_updates_roster_and_section() {
        let gateway = InMemoryGateway::new()
            .with_course("1", "Bio")
            .with_section("1", "s-default", "Bio 101", &["u1"])
            .with_section("1", "s-a", "A", &[])
            .with_member("1", "u1", &["s-default"]);

        let enrollment = gateway.create_enrollment("s-a", "u1").await.unwrap();
        assert_eq!(enrollment.section_id, "s-a");

        let sections = gateway.sections("1");
        assert_eq!(sections[1].occupancy(), 1);
        assert!(sections[1].has_member("u1"));
        assert_eq!(gateway.members("1")[0].enrollments.len(), 2);
    }

    #[tokio::test]
    async fn delete_reverts_enrollment() {
        let gateway = InMemoryGateway::new()
            .with_course("1", "Bio")
            .with_section("1", "s-a", "A", &["u1"])
            .with_member("1", "u1", &["s-a"]);

        let enrollment = gateway.members("1")[0].enrollments[0].clone();
        let removed = gateway.delete_enrollment("1", &enrollment).await.unwrap();
        assert_eq!(removed.member_id, "u1");
        assert!(gateway.members("1")[0].enrollments.is_empty());
        assert_eq!(gateway.sections("1")[0].occupancy(), 0);
    }

    #[tokio::test]
    async fn injected_failures() {
        let gateway = InMemoryGateway::new()
            .with_course("1", "Bio")
            .fail_section("B")
            .fail_reads("2");

        assert!(gateway.create_section("1", "B").await.is_none());
        assert!(gateway.create_section("1", "A").await.is_some());
        assert!(gateway.get_course("2").await.is_err());
        assert!(gateway.get_course("3").await.is_err());
        assert_eq!(gateway.calls().len(), 2);
    }
}
