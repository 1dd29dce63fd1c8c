use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ────────────────────────────────────────────────────────────────────────────
// Provenance
// ────────────────────────────────────────────────────────────────────────────

/// Where a payload handed to the caller came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum Provenance {
    Upstream { endpoint: String },
    Sample { reason: String },
}

/// A payload plus its provenance. Sample payloads are well-formed but not
/// authoritative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sourced<T> {
    pub data: T,
    pub provenance: Provenance,
}

impl<T> Sourced<T> {
    pub fn upstream(data: T, endpoint: impl Into<String>) -> Self {
        Self {
            data,
            provenance: Provenance::Upstream {
                endpoint: endpoint.into(),
            },
        }
    }

    pub fn sample(data: T, reason: impl Into<String>) -> Self {
        Self {
            data,
            provenance: Provenance::Sample {
                reason: reason.into(),
            },
        }
    }

    pub fn is_sample(&self) -> bool {
        matches!(self.provenance, Provenance::Sample { .. })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tagged parse of accepted upstream payloads
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Parsed<T> {
    Success(T),
    Empty,
    Malformed(String),
}

/// Reads a list from the first of `keys` present in `payload`. A list may
/// also be nested one level down under the same key name, e.g.
/// `{"RESULT": {"questions": [...]}}`.
pub fn parse_list<T: DeserializeOwned>(payload: &Value, keys: &[&str]) -> Parsed<Vec<T>> {
    let Some(value) = keys.iter().find_map(|key| payload.get(*key)) else {
        return Parsed::Malformed(format!("none of {keys:?} present"));
    };

    let list = match value {
        Value::Array(_) => value,
        Value::Object(map) => match keys.iter().find_map(|key| map.get(*key)) {
            Some(inner @ Value::Array(_)) => inner,
            _ => return Parsed::Malformed("list key holds an object without a list".to_string()),
        },
        Value::Null => return Parsed::Empty,
        other => return Parsed::Malformed(format!("expected a list, found {other}")),
    };

    match serde_json::from_value::<Vec<T>>(list.clone()) {
        Ok(items) if items.is_empty() => Parsed::Empty,
        Ok(items) => Parsed::Success(items),
        Err(e) => Parsed::Malformed(e.to_string()),
    }
}

/// Reads a single record from the first of `keys` present in `payload`.
pub fn parse_record<T: DeserializeOwned>(payload: &Value, keys: &[&str]) -> Parsed<T> {
    match keys.iter().find_map(|key| payload.get(*key)) {
        None | Some(Value::Null) => Parsed::Empty,
        Some(value) => match serde_json::from_value::<T>(value.clone()) {
            Ok(record) => Parsed::Success(record),
            Err(e) => Parsed::Malformed(e.to_string()),
        },
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Psychological tests
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PsychTest {
    pub id: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    pub options: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Job encyclopedia
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobFilter {
    pub category: Option<String>,
    pub keyword: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSummary {
    pub id: String,
    pub name: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDetail {
    pub id: String,
    pub name: String,
    pub category: String,
    pub description: String,
    #[serde(default)]
    pub work_tasks: Vec<String>,
    #[serde(default)]
    pub required_skills: Vec<String>,
    /// Share of workers per education level, in percent.
    #[serde(default)]
    pub education: BTreeMap<String, u32>,
    #[serde(default)]
    pub salary_range: String,
    #[serde(default)]
    pub job_outlook: String,
    #[serde(default)]
    pub related_majors: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Schools and departments
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchoolFilter {
    pub school_type: Option<String>,
    pub region: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct School {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub school_type: String,
    pub region: String,
    #[serde(default)]
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchoolDetail {
    #[serde(flatten)]
    pub school: School,
    pub website: String,
    pub established: String,
    pub description: String,
    pub departments: Vec<NamedRef>,
    pub admission_info: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DepartmentFilter {
    pub category: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    pub id: String,
    pub name: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentDetail {
    pub id: String,
    pub name: String,
    pub category: String,
    pub description: String,
    #[serde(default)]
    pub curriculum: Vec<String>,
    #[serde(default)]
    pub career_paths: Vec<String>,
    #[serde(default)]
    pub related_jobs: Vec<String>,
    #[serde(default)]
    pub universities: Vec<NamedRef>,
}

// ────────────────────────────────────────────────────────────────────────────
// Counseling cases
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct CounselingFilter {
    pub category: Option<String>,
    pub keyword: Option<String>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub size: u32,
}

impl Default for CounselingFilter {
    fn default() -> Self {
        Self {
            category: None,
            keyword: None,
            page: default_page(),
            size: default_page_size(),
        }
    }
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    10
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounselingCase {
    pub id: String,
    pub title: String,
    pub category: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarCase {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounselingDetail {
    #[serde(flatten)]
    pub case: CounselingCase,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub similar_cases: Vec<SimilarCase>,
}

/// Case-insensitive substring match used by every list filter.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
