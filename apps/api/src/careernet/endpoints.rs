//! Endpoint catalogue for the CareerNet open API.
//!
//! The upstream contract was never stable: endpoint paths, parameter names and
//! even the casing of the API key parameter differ between endpoint families.
//! All of that lives here as data, and can be overridden from a JSON file,
//! so the client logic never hardcodes a guess about the contract.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::fetch::HttpMethod;

/// Logical upstream operations. Each one maps to an ordered list of
/// candidate request shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    ListTests,
    TestQuestions,
    SubmitTest,
    ListJobs,
    JobDetail,
    ListSchools,
    ListDepartments,
    DepartmentDetail,
    ListCounselingCases,
    CounselingDetail,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::ListTests => "list_tests",
            Operation::TestQuestions => "test_questions",
            Operation::SubmitTest => "submit_test",
            Operation::ListJobs => "list_jobs",
            Operation::JobDetail => "job_detail",
            Operation::ListSchools => "list_schools",
            Operation::ListDepartments => "list_departments",
            Operation::DepartmentDetail => "department_detail",
            Operation::ListCounselingCases => "list_counseling_cases",
            Operation::CounselingDetail => "counseling_detail",
        }
    }
}

/// One request shape to try for an operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointCandidate {
    /// Full URL, may contain `{name}` placeholders.
    pub url_template: String,
    /// Query parameters; values may contain `{name}` placeholders.
    #[serde(default)]
    pub params: BTreeMap<String, String>,
    #[serde(default = "default_method")]
    pub method: HttpMethod,
    /// Name of the query parameter carrying the API key (`apikey` or `apiKey`).
    #[serde(default = "default_api_key_param")]
    pub api_key_param: String,
    /// The payload must carry a non-empty value under one of these keys.
    pub marker_keys: Vec<String>,
}

fn default_method() -> HttpMethod {
    HttpMethod::Get
}

fn default_api_key_param() -> String {
    "apikey".to_string()
}

impl EndpointCandidate {
    fn get(url_template: String, marker_keys: &[&str]) -> Self {
        Self {
            url_template,
            params: BTreeMap::new(),
            method: HttpMethod::Get,
            api_key_param: default_api_key_param(),
            marker_keys: marker_keys.iter().map(|k| k.to_string()).collect(),
        }
    }

    fn param(mut self, name: &str, value: &str) -> Self {
        self.params.insert(name.to_string(), value.to_string());
        self
    }

    fn method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    fn api_key_param(mut self, name: &str) -> Self {
        self.api_key_param = name.to_string();
        self
    }

    /// Renders the URL with each input percent-encoded as a single path
    /// segment. Inputs made only of dots render empty, since the URL parser
    /// would resolve them as `.`/`..` segments.
    pub fn render_url(&self, inputs: &BTreeMap<String, String>) -> String {
        substitute(&self.url_template, inputs, |value| {
            if value.chars().all(|c| c == '.') {
                Cow::Borrowed("")
            } else {
                urlencoding::encode(value)
            }
        })
    }

    /// Renders query parameters, dropping any whose value comes out empty.
    pub fn render_params(&self, inputs: &BTreeMap<String, String>) -> Vec<(String, String)> {
        self.params
            .iter()
            .map(|(name, value)| (name.clone(), render_template(value, inputs)))
            .filter(|(_, value)| !value.is_empty())
            .collect()
    }
}

/// Replaces `{name}` placeholders with values from `inputs`.
/// Placeholders without an input render as the empty string.
pub fn render_template(template: &str, inputs: &BTreeMap<String, String>) -> String {
    substitute(template, inputs, |value| Cow::Borrowed(value))
}

fn substitute<F>(template: &str, inputs: &BTreeMap<String, String>, encode: F) -> String
where
    F: Fn(&str) -> Cow<'_, str>,
{
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + 1..];
        match after_open.find('}') {
            Some(close) => {
                let key = &after_open[..close];
                if let Some(value) = inputs.get(key) {
                    out.push_str(&encode(value));
                }
                rest = &after_open[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    operations: BTreeMap<Operation, Vec<EndpointCandidate>>,
}

#[derive(Debug, Clone, Default)]
pub struct EndpointCatalog {
    operations: BTreeMap<Operation, Vec<EndpointCandidate>>,
}

impl EndpointCatalog {
    /// The request shapes the web app has been observed to try, in order.
    pub fn default_for(base_url: &str, base_url_v2: &str) -> Self {
        let v1 = |path: &str| format!("{}/{}", base_url.trim_end_matches('/'), path);
        let v2 = |path: &str| format!("{}/{}", base_url_v2.trim_end_matches('/'), path);

        let mut operations = BTreeMap::new();

        operations.insert(
            Operation::ListTests,
            vec![EndpointCandidate::get(v2("tests"), &["tests", "result", "RESULT"])
                .api_key_param("apiKey")],
        );
        operations.insert(
            Operation::TestQuestions,
            vec![
                EndpointCandidate::get(v1("test/questions"), &["RESULT"]).param("q", "{test_id}"),
                EndpointCandidate::get(v2("test"), &["result"])
                    .param("q", "{test_id}")
                    .api_key_param("apiKey"),
                EndpointCandidate::get(v1("test/questions/{test_id}"), &["RESULT", "questions"]),
                EndpointCandidate::get(v1("inspct/question"), &["questions", "RESULT", "result"])
                    .param("seq", "{test_id}"),
            ],
        );
        operations.insert(
            Operation::SubmitTest,
            vec![
                EndpointCandidate::get(v1("psychTest/{test_id}/results"), &["RESULT", "result"])
                    .method(HttpMethod::Post),
            ],
        );
        operations.insert(
            Operation::ListJobs,
            vec![EndpointCandidate::get(v1("job"), &["jobs"])
                .param("category", "{category}")
                .param("keyword", "{keyword}")],
        );
        operations.insert(
            Operation::JobDetail,
            vec![EndpointCandidate::get(v1("job/{job_id}"), &["job", "RESULT", "result"])],
        );
        operations.insert(
            Operation::ListSchools,
            vec![EndpointCandidate::get(v1("school"), &["schools"])
                .param("schoolType", "{school_type}")
                .param("region", "{region}")
                .param("name", "{name}")],
        );
        operations.insert(
            Operation::ListDepartments,
            vec![EndpointCandidate::get(v1("department"), &["departments"])
                .param("category", "{category}")
                .param("name", "{name}")],
        );
        operations.insert(
            Operation::DepartmentDetail,
            vec![EndpointCandidate::get(
                v1("department/{department_id}"),
                &["department", "RESULT", "result"],
            )],
        );
        operations.insert(
            Operation::ListCounselingCases,
            vec![EndpointCandidate::get(v1("counseling"), &["cases"])
                .param("page", "{page}")
                .param("size", "{size}")
                .param("keyword", "{keyword}")
                .param("category", "{category}")],
        );
        operations.insert(
            Operation::CounselingDetail,
            vec![EndpointCandidate::get(v1("counseling/{case_id}"), &["case", "RESULT", "result"])],
        );

        Self { operations }
    }

    /// Replaces the candidate lists of every operation named in the JSON file
    /// at `path`. Operations the file does not mention keep their candidates.
    pub fn with_overrides_from_file(mut self, path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read endpoint catalogue {}", path.display()))?;
        let file: CatalogFile = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid endpoint catalogue {}", path.display()))?;

        for (operation, candidates) in file.operations {
            self.operations.insert(operation, candidates);
        }
        Ok(self)
    }

    pub fn candidates(&self, operation: Operation) -> &[EndpointCandidate] {
        self.operations
            .get(&operation)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
