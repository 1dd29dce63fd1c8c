use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Interest categories a student can pick on their profile.
pub const INTEREST_CATEGORIES: &[&str] = &[
    "과학",
    "기술",
    "공학",
    "예술",
    "수학",
    "인문학",
    "사회과학",
    "경영",
    "의학",
    "법학",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "중학교 1학년")]
    Middle1,
    #[serde(rename = "중학교 2학년")]
    Middle2,
    #[serde(rename = "중학교 3학년")]
    Middle3,
    #[serde(rename = "고등학교 1학년")]
    High1,
    #[serde(rename = "고등학교 2학년")]
    High2,
    #[serde(rename = "고등학교 3학년")]
    High3,
}

/// The per-user document. Created with empty defaults at signup (or on the
/// first login without a document) and never deleted by this service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "grade_or_blank")]
    pub grade: Option<Grade>,
    #[serde(default)]
    pub interests: BTreeSet<String>,
    #[serde(default)]
    pub test_results: BTreeMap<String, TestResult>,
    #[serde(default)]
    pub saved_jobs: Vec<JobBookmark>,
    #[serde(default)]
    pub saved_schools: Vec<SchoolBookmark>,
}

/// Documents written by older clients store an unset grade as `""`.
fn grade_or_blank<'de, D>(deserializer: D) -> Result<Option<Grade>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Grade(Grade),
        Other(serde::de::IgnoredAny),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Grade(grade)) => Ok(Some(grade)),
        _ => Ok(None),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub test_id: String,
    pub test_name: String,
    pub completed_date: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub categories: BTreeMap<String, f64>,
    #[serde(default)]
    pub recommended_jobs: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobBookmark {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    pub job_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_category: Option<String>,
    #[serde(default)]
    pub job_description: String,
    pub saved_date: String,
}

/// A saved school, school+department pair, or department.
/// Blank strings mark absent school fields, as stored by the web client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchoolBookmark {
    #[serde(default)]
    pub school_id: String,
    #[serde(default)]
    pub school_name: String,
    #[serde(default)]
    pub school_type: String,
    #[serde(default)]
    pub region: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_id: Option<String>,
    #[serde(default)]
    pub department_name: String,
    pub saved_date: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BookmarkShape {
    SchoolOnly,
    SchoolDepartment,
    DepartmentOnly,
}

impl SchoolBookmark {
    pub fn shape(&self) -> BookmarkShape {
        let has_department = self
            .department_id
            .as_deref()
            .is_some_and(|id| !id.is_empty());

        if self.school_id.is_empty() && self.school_name.is_empty() {
            BookmarkShape::DepartmentOnly
        } else if has_department {
            BookmarkShape::SchoolDepartment
        } else {
            BookmarkShape::SchoolOnly
        }
    }
}

/// Today's date in the `YYYY-MM-DD` form used for every saved record.
pub fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bookmark(school_id: &str, school_name: &str, department_id: Option<&str>) -> SchoolBookmark {
        SchoolBookmark {
            school_id: school_id.to_string(),
            school_name: school_name.to_string(),
            school_type: String::new(),
            region: String::new(),
            department_id: department_id.map(String::from),
            department_name: String::new(),
            saved_date: "2024-03-01".to_string(),
        }
    }

    #[test]
    fn test_bookmark_shapes() {
        assert_eq!(bookmark("1", "서울대학교", None).shape(), BookmarkShape::SchoolOnly);
        assert_eq!(
            bookmark("1", "서울대학교", Some("101")).shape(),
            BookmarkShape::SchoolDepartment
        );
        assert_eq!(bookmark("", "", Some("201")).shape(), BookmarkShape::DepartmentOnly);
        assert_eq!(bookmark("1", "서울대학교", Some("")).shape(), BookmarkShape::SchoolOnly);
    }

    #[test]
    fn test_profile_accepts_legacy_blank_grade() {
        let profile: UserProfile = serde_json::from_value(json!({
            "name": "김학생",
            "grade": "",
            "interests": [],
            "test_results": {},
            "saved_jobs": [],
            "saved_schools": []
        }))
        .unwrap();
        assert_eq!(profile.grade, None);
        assert_eq!(profile.name, "김학생");
    }

    #[test]
    fn test_grade_uses_korean_labels() {
        let profile: UserProfile =
            serde_json::from_value(json!({"grade": "고등학교 2학년"})).unwrap();
        assert_eq!(profile.grade, Some(Grade::High2));
        assert_eq!(
            serde_json::to_value(Grade::Middle1).unwrap(),
            json!("중학교 1학년")
        );
    }

    #[test]
    fn test_default_profile_is_empty() {
        let profile = UserProfile::default();
        assert!(profile.saved_jobs.is_empty());
        assert!(profile.test_results.is_empty());
        assert_eq!(profile.grade, None);
    }

    #[test]
    fn test_today_format() {
        let date = today();
        assert!(chrono::NaiveDate::parse_from_str(&date, "%Y-%m-%d").is_ok());
    }
}
