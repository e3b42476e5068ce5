//! Domain records decoded from the upstream LMS API.
//!
//! These mirror the subset of the course, user, section, and enrollment
//! resources the balancer reads. Upstream ids are numeric in some
//! deployments and strings in others; every id is normalized to a
//! `String` on decode.

use serde::{Deserialize, Deserializer, Serialize};

/// Identifier of a course.
pub type CourseId = String;

/// Identifier of a section (sub-group) within a course.
pub type SectionId = String;

/// Identifier of a roster member.
pub type MemberId = String;

/// Identifier of an enrollment record.
pub type EnrollmentId = String;

// ── Course ─────────────────────────────────────────────────────────

/// Read-only course reference data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Course {
    #[serde(deserialize_with = "id_string")]
    pub id: CourseId,
    #[serde(default)]
    pub name: String,
}

// ── Roster ─────────────────────────────────────────────────────────

/// A course roster entry together with its active enrollments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Member {
    #[serde(deserialize_with = "id_string")]
    pub id: MemberId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub enrollments: Vec<Enrollment>,
}

impl Member {
    /// Whether any enrollment of this member references one of `section_ids`.
    pub fn is_enrolled_in_any(&self, section_ids: &[&str]) -> bool {
        self.enrollments
            .iter()
            .any(|e| section_ids.contains(&e.section_id.as_str()))
    }
}

/// Join record between a member and a section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Enrollment {
    #[serde(deserialize_with = "id_string")]
    pub id: EnrollmentId,
    #[serde(rename = "course_section_id", deserialize_with = "id_string")]
    pub section_id: SectionId,
    #[serde(rename = "user_id", deserialize_with = "id_string")]
    pub member_id: MemberId,
}

// ── Sections ───────────────────────────────────────────────────────

/// A section as reported by the server, with its membership.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Section {
    #[serde(deserialize_with = "id_string")]
    pub id: SectionId,
    pub name: String,
    /// Server-reported occupancy. May lag behind recent writes.
    #[serde(default)]
    pub total_students: Option<u32>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub students: Vec<SectionStudent>,
}

impl Section {
    /// Whether the server lists `member_id` among this section's students.
    pub fn has_member(&self, member_id: &str) -> bool {
        self.students.iter().any(|s| s.id == member_id)
    }

    /// Occupancy to seed a run with: the reported total, or the size of
    /// the member list when the total is absent.
    pub fn occupancy(&self) -> u32 {
        self.total_students
            .unwrap_or_else(|| self.students.len() as u32)
    }
}

/// Member stub embedded in a section listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SectionStudent {
    #[serde(deserialize_with = "id_string")]
    pub id: MemberId,
    #[serde(default)]
    pub name: Option<String>,
}

// ── Serde helpers ──────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(i64),
    Str(String),
}

/// Accept an id encoded either as a JSON number or a JSON string.
pub fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Int(n) => n.to_string(),
        RawId::Str(s) => s,
    })
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_and_string_ids_normalize() {
        let a: Course = serde_json::from_value(json!({"id": 42, "name": "Bio"})).unwrap();
        let b: Course = serde_json::from_value(json!({"id": "42", "name": "Bio"})).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.id, "42");
    }

    #[test]
    fn member_with_enrollments() {
        let member: Member = serde_json::from_value(json!({
            "id": 7,
            "name": "Ada",
            "enrollments": [
                {"id": 100, "course_section_id": 1, "user_id": 7, "type": "StudentEnrollment"}
            ]
        }))
        .unwrap();

        assert_eq!(member.enrollments.len(), 1);
        assert_eq!(member.enrollments[0].section_id, "1");
        assert_eq!(member.enrollments[0].member_id, "7");
        assert!(member.is_enrolled_in_any(&["1", "2"]));
        assert!(!member.is_enrolled_in_any(&["3"]));
    }

    #[test]
    fn null_students_decode_as_empty() {
        let section: Section = serde_json::from_value(json!({
            "id": 5,
            "name": "A",
            "total_students": 0,
            "students": null
        }))
        .unwrap();
        assert!(section.students.is_empty());
        assert_eq!(section.occupancy(), 0);
    }

    #[test]
    fn occupancy_falls_back_to_member_count() {
        let section: Section = serde_json::from_value(json!({
            "id": 5,
            "name": "A",
            "students": [{"id": 1}, {"id": 2}]
        }))
        .unwrap();
        assert_eq!(section.occupancy(), 2);
        assert!(section.has_member("2"));
        assert!(!section.has_member("3"));
    }

    #[test]
    fn missing_enrollments_default_to_empty() {
        let member: Member = serde_json::from_value(json!({"id": "u1"})).unwrap();
        assert!(member.enrollments.is_empty());
        assert!(member.name.is_none());
    }
}
