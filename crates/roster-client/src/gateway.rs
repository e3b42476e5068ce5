//! Roster/section gateway.
//!
//! Named operations over the paginated client, one per upstream
//! endpoint. Reads return a [`RequestResult`] so the driver can abort the
//! work item; writes log their failure with the ids involved and return
//! `None` so one bad write never escapes this layer.

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use roster_core::{Course, DropMode, Enrollment, Member, Section};

use crate::client::ApiClient;
use crate::error::RequestResult;

/// Operations the reconciliation driver needs from the LMS.
#[async_trait]
pub trait RosterGateway: Send + Sync {
    async fn get_course(&self, course_id: &str) -> RequestResult<Course>;

    /// Every student on the course roster, with their enrollments.
    async fn list_students(&self, course_id: &str) -> RequestResult<Vec<Member>>;

    /// Every section of the course, with membership and occupancy.
    async fn list_sections(&self, course_id: &str) -> RequestResult<Vec<Section>>;

    async fn create_section(&self, course_id: &str, name: &str) -> Option<Section>;

    /// Enroll `member_id` in `section_id`. When the server acknowledges the
    /// write without a body, the returned record has an empty `id`.
    async fn create_enrollment(&self, section_id: &str, member_id: &str) -> Option<Enrollment>;

    /// Remove `enrollment` from the course. An acknowledgement without a
    /// body returns `enrollment` itself.
    async fn delete_enrollment(&self, course_id: &str, enrollment: &Enrollment) -> Option<Enrollment>;
}

/// Gateway backed by a Canvas-style REST API.
#[derive(Clone)]
pub struct LmsGateway {
    client: ApiClient,
    drop_mode: DropMode,
}

impl LmsGateway {
    pub fn new(client: ApiClient, drop_mode: DropMode) -> Self {
        Self { client, drop_mode }
    }

    pub fn drop_mode(&self) -> DropMode {
        self.drop_mode
    }
}

#[async_trait]
impl RosterGateway for LmsGateway {
    #[instrument(skip(self))]
    async fn get_course(&self, course_id: &str) -> RequestResult<Course> {
        self.client
            .get_one(&format!("courses/{course_id}"), &[])
            .await
    }

    #[instrument(skip(self))]
    async fn list_students(&self, course_id: &str) -> RequestResult<Vec<Member>> {
        self.client
            .get_all(
                &format!("courses/{course_id}/users"),
                &[
                    ("enrollment_type[]", "student"),
                    ("include[]", "enrollments"),
                ],
            )
            .await
    }

    #[instrument(skip(self))]
    async fn list_sections(&self, course_id: &str) -> RequestResult<Vec<Section>> {
        self.client
            .get_all(
                &format!("courses/{course_id}/sections"),
                &[("include[]", "students"), ("include[]", "total_students")],
            )
            .await
    }

    #[instrument(skip(self))]
    async fn create_section(&self, course_id: &str, name: &str) -> Option<Section> {
        let result: RequestResult<Option<Section>> = self
            .client
            .post_form(
                &format!("courses/{course_id}/sections"),
                &[("course_section[name]", name)],
            )
            .await;

        match result {
            Ok(Some(section)) => {
                info!(course = course_id, section = name, id = %section.id, "created section");
                Some(section)
            }
            // Without the new id nothing can be enrolled into the section.
            Ok(None) => {
                warn!(course = course_id, section = name, "section created without a record; id unknown");
                None
            }
            Err(e) => {
                warn!(course = course_id, section = name, error = %e, "failed to create section");
                None
            }
        }
    }

    #[instrument(skip(self))]
    async fn create_enrollment(&self, section_id: &str, member_id: &str) -> Option<Enrollment> {
        let result: RequestResult<Option<Enrollment>> = self
            .client
            .post_form(
                &format!("sections/{section_id}/enrollments"),
                &[
                    ("enrollment[user_id]", member_id),
                    ("enrollment[type]", "StudentEnrollment"),
                    ("enrollment[enrollment_state]", "active"),
                ],
            )
            .await;

        match result {
            Ok(Some(enrollment)) => Some(enrollment),
            Ok(None) => {
                debug!(section = section_id, member = member_id, "enrollment acknowledged without a record");
                Some(Enrollment {
                    id: String::new(),
                    section_id: section_id.to_string(),
                    member_id: member_id.to_string(),
                })
            }
            Err(e) => {
                warn!(section = section_id, member = member_id, error = %e, "failed to enroll member");
                None
            }
        }
    }

    #[instrument(skip(self, enrollment), fields(enrollment = %enrollment.id))]
    async fn delete_enrollment(&self, course_id: &str, enrollment: &Enrollment) -> Option<Enrollment> {
        let result: RequestResult<Option<Enrollment>> = self
            .client
            .delete(
                &format!("courses/{course_id}/enrollments/{}", enrollment.id),
                &[("task", self.drop_mode.as_task())],
            )
            .await;

        match result {
            Ok(Some(removed)) => Some(removed),
            Ok(None) => Some(enrollment.clone()),
            Err(e) => {
                warn!(
                    course = course_id,
                    enrollment = %enrollment.id,
                    task = %self.drop_mode,
                    error = %e,
                    "failed to remove enrollment"
                );
                None
            }
        }
    }
}
