//! Inbound work items.

use serde::{Deserialize, Serialize};

use crate::types::{CourseId, id_string};

/// One course to rebalance across the named sections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkItem {
    #[serde(deserialize_with = "id_string")]
    pub course_id: CourseId,
    pub section_names: Vec<String>,
    /// Compute and report the plan without issuing writes.
    #[serde(default)]
    pub dry_run: bool,
}

impl WorkItem {
    pub fn new(course_id: impl Into<String>, section_names: Vec<String>) -> Self {
        Self {
            course_id: course_id.into(),
            section_names,
            dry_run: false,
        }
    }

    /// Requested names with duplicates removed, first occurrence kept.
    pub fn distinct_section_names(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::with_capacity(self.section_names.len());
        for name in &self.section_names {
            if !seen.contains(&name.as_str()) {
                seen.push(name);
            }
        }
        seen
    }
}

/// A batch of work items, processed in list order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct BatchPayload {
    pub data: Vec<WorkItem>,
}

impl BatchPayload {
    pub fn from_json(input: &str) -> serde_json::Result<Self> {
        serde_json::from_str(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_batch_payload() {
        let payload = BatchPayload::from_json(
            r#"{"data": [
                {"courseId": "101", "sectionNames": ["A", "B"]},
                {"courseId": 202, "sectionNames": ["Control"], "dryRun": true}
            ]}"#,
        )
        .unwrap();

        assert_eq!(payload.data.len(), 2);
        assert_eq!(payload.data[0].course_id, "101");
        assert_eq!(payload.data[0].section_names, vec!["A", "B"]);
        assert!(!payload.data[0].dry_run);
        assert_eq!(payload.data[1].course_id, "202");
        assert!(payload.data[1].dry_run);
    }

    #[test]
    fn duplicate_names_collapse_in_order() {
        let item = WorkItem::new(
            "1",
            vec!["B".into(), "A".into(), "B".into(), "C".into(), "A".into()],
        );
        assert_eq!(item.distinct_section_names(), vec!["B", "A", "C"]);
    }

    #[test]
    fn names_are_case_sensitive() {
        let item = WorkItem::new("1", vec!["a".into(), "A".into()]);
        assert_eq!(item.distinct_section_names(), vec!["a", "A"]);
    }
}
