//! CareerNet client — the single point of entry for upstream data API calls.
//!
//! Every operation runs its endpoint fallback chain and, when the chain is
//! exhausted or the accepted payload is empty or malformed, substitutes the
//! canonical sample payload. Callers always get a well-formed value tagged
//! with its [`Provenance`](models::Provenance); browsing never fails.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

pub mod chain;
pub mod endpoints;
pub mod fetch;
pub mod models;
pub mod retry;
pub mod samples;

use crate::profile::models::{today, TestResult};
use chain::{ChainOutcome, FallbackChain};
use endpoints::{EndpointCatalog, Operation};
use models::{
    parse_list, parse_record, CounselingCase, CounselingDetail, CounselingFilter, Department,
    DepartmentDetail, DepartmentFilter, JobDetail, JobFilter, JobSummary, Parsed, PsychTest,
    Question, School, SchoolDetail, SchoolFilter, Sourced,
};

/// Result block returned by the upstream test submission endpoint.
#[derive(Debug, Deserialize)]
struct UpstreamTestResult {
    #[serde(default)]
    summary: String,
    #[serde(default)]
    categories: BTreeMap<String, f64>,
    #[serde(default)]
    recommended_jobs: Vec<String>,
    #[serde(default)]
    result_url: Option<String>,
}

#[derive(Clone)]
pub struct CareerNetClient {
    chain: FallbackChain,
    catalog: Arc<EndpointCatalog>,
}

impl CareerNetClient {
    pub fn new(chain: FallbackChain, catalog: EndpointCatalog) -> Self {
        Self {
            chain,
            catalog: Arc::new(catalog),
        }
    }

    // ── Psychological tests ────────────────────────────────────────────────

    pub async fn list_tests(&self) -> Sourced<Vec<PsychTest>> {
        let outcome = self.run(Operation::ListTests, &[], None).await;
        resolve(
            Operation::ListTests,
            outcome,
            |payload| parse_list(payload, &["tests", "result", "RESULT"]),
            samples::tests,
        )
    }

    pub async fn test_questions(&self, test_id: &str) -> Sourced<Vec<Question>> {
        let outcome = self
            .run(Operation::TestQuestions, &[("test_id", test_id)], None)
            .await;
        resolve(
            Operation::TestQuestions,
            outcome,
            |payload| parse_list(payload, &["questions", "RESULT", "result"]),
            || samples::questions(test_id),
        )
    }

    pub async fn submit_test(
        &self,
        test: &PsychTest,
        answers: &BTreeMap<String, String>,
    ) -> Sourced<TestResult> {
        let body = serde_json::to_value(answers).unwrap_or_default();
        let outcome = self
            .run(Operation::SubmitTest, &[("test_id", &test.id)], Some(&body))
            .await;
        resolve(
            Operation::SubmitTest,
            outcome,
            |payload| match parse_record::<UpstreamTestResult>(payload, &["RESULT", "result"]) {
                Parsed::Success(result) => Parsed::Success(TestResult {
                    test_id: test.id.clone(),
                    test_name: test.name.clone(),
                    completed_date: today(),
                    summary: result.summary,
                    categories: result.categories,
                    recommended_jobs: result.recommended_jobs,
                    result_url: result.result_url,
                }),
                Parsed::Empty => Parsed::Empty,
                Parsed::Malformed(why) => Parsed::Malformed(why),
            },
            || samples::test_result(test),
        )
    }

    // ── Job encyclopedia ───────────────────────────────────────────────────

    pub async fn list_jobs(&self, filter: &JobFilter) -> Sourced<Vec<JobSummary>> {
        let inputs = [
            ("category", filter.category.as_deref().unwrap_or_default()),
            ("keyword", filter.keyword.as_deref().unwrap_or_default()),
        ];
        let outcome = self.run(Operation::ListJobs, &inputs, None).await;
        resolve(
            Operation::ListJobs,
            outcome,
            |payload| parse_list(payload, &["jobs"]),
            || samples::jobs(filter),
        )
    }

    /// `data` is `None` when neither the upstream nor the sample set knows the job.
    pub async fn job_detail(&self, job_id: &str) -> Sourced<Option<JobDetail>> {
        let outcome = self
            .run(Operation::JobDetail, &[("job_id", job_id)], None)
            .await;
        resolve(
            Operation::JobDetail,
            outcome,
            |payload| some(parse_record(payload, &["job", "RESULT", "result"])),
            || {
                samples::jobs(&JobFilter::default())
                    .iter()
                    .find(|job| job.id == job_id)
                    .map(samples::job_detail)
            },
        )
    }

    // ── Schools and departments ────────────────────────────────────────────

    pub async fn list_schools(&self, filter: &SchoolFilter) -> Sourced<Vec<School>> {
        let inputs = [
            ("school_type", filter.school_type.as_deref().unwrap_or_default()),
            ("region", filter.region.as_deref().unwrap_or_default()),
            ("name", filter.name.as_deref().unwrap_or_default()),
        ];
        let outcome = self.run(Operation::ListSchools, &inputs, None).await;
        resolve(
            Operation::ListSchools,
            outcome,
            |payload| parse_list(payload, &["schools"]),
            || samples::schools(filter),
        )
    }

    /// There is no upstream endpoint for school details; this is always sample data.
    pub fn school_detail(&self, school_id: &str) -> Sourced<Option<SchoolDetail>> {
        let detail = samples::schools(&SchoolFilter::default())
            .iter()
            .find(|school| school.id == school_id)
            .map(samples::school_detail);
        Sourced::sample(detail, "no upstream endpoint for school detail")
    }

    pub async fn list_departments(&self, filter: &DepartmentFilter) -> Sourced<Vec<Department>> {
        let inputs = [
            ("category", filter.category.as_deref().unwrap_or_default()),
            ("name", filter.name.as_deref().unwrap_or_default()),
        ];
        let outcome = self.run(Operation::ListDepartments, &inputs, None).await;
        resolve(
            Operation::ListDepartments,
            outcome,
            |payload| parse_list(payload, &["departments"]),
            || samples::departments(filter),
        )
    }

    pub async fn department_detail(&self, department_id: &str) -> Sourced<Option<DepartmentDetail>> {
        let outcome = self
            .run(
                Operation::DepartmentDetail,
                &[("department_id", department_id)],
                None,
            )
            .await;
        resolve(
            Operation::DepartmentDetail,
            outcome,
            |payload| some(parse_record(payload, &["department", "RESULT", "result"])),
            || {
                samples::departments(&DepartmentFilter::default())
                    .iter()
                    .find(|d| d.id == department_id)
                    .map(samples::department_detail)
            },
        )
    }

    // ── Counseling cases ───────────────────────────────────────────────────

    pub async fn list_counseling_cases(
        &self,
        filter: &CounselingFilter,
    ) -> Sourced<Vec<CounselingCase>> {
        let page = filter.page.to_string();
        let size = filter.size.to_string();
        let inputs = [
            ("page", page.as_str()),
            ("size", size.as_str()),
            ("keyword", filter.keyword.as_deref().unwrap_or_default()),
            ("category", filter.category.as_deref().unwrap_or_default()),
        ];
        let outcome = self
            .run(Operation::ListCounselingCases, &inputs, None)
            .await;
        resolve(
            Operation::ListCounselingCases,
            outcome,
            |payload| parse_list(payload, &["cases"]),
            || samples::counseling_cases(filter),
        )
    }

    pub async fn counseling_detail(&self, case_id: &str) -> Sourced<Option<CounselingDetail>> {
        let outcome = self
            .run(Operation::CounselingDetail, &[("case_id", case_id)], None)
            .await;
        resolve(
            Operation::CounselingDetail,
            outcome,
            |payload| some(parse_record(payload, &["case", "RESULT", "result"])),
            || {
                let every_case = CounselingFilter {
                    size: u32::MAX,
                    ..CounselingFilter::default()
                };
                samples::counseling_cases(&every_case)
                    .iter()
                    .find(|c| c.id == case_id)
                    .map(samples::counseling_detail)
            },
        )
    }

    async fn run(
        &self,
        operation: Operation,
        inputs: &[(&str, &str)],
        body: Option<&Value>,
    ) -> ChainOutcome {
        let inputs: BTreeMap<String, String> = inputs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.chain
            .run(operation, self.catalog.candidates(operation), &inputs, body)
            .await
    }
}

/// Turns a chain outcome into a sourced value, falling back to `sample`
/// whenever the upstream did not produce a usable answer.
fn resolve<T>(
    operation: Operation,
    outcome: ChainOutcome,
    parse: impl FnOnce(&Value) -> Parsed<T>,
    sample: impl FnOnce() -> T,
) -> Sourced<T> {
    let reason = match outcome {
        ChainOutcome::Accepted {
            payload, endpoint, ..
        } => match parse(&payload) {
            Parsed::Success(data) => return Sourced::upstream(data, endpoint),
            Parsed::Empty => format!("{endpoint} returned an empty result"),
            Parsed::Malformed(why) => format!("{endpoint} returned a malformed payload: {why}"),
        },
        exhausted @ ChainOutcome::Exhausted { .. } => exhausted.failure_reason(),
    };

    warn!(
        "{}: serving sample data ({reason})",
        operation.as_str()
    );
    Sourced::sample(sample(), reason)
}

fn some<T>(parsed: Parsed<T>) -> Parsed<Option<T>> {
    match parsed {
        Parsed::Success(value) => Parsed::Success(Some(value)),
        Parsed::Empty => Parsed::Empty,
        Parsed::Malformed(why) => Parsed::Malformed(why),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::careernet::chain::tests::ScriptedFetcher;
    use crate::careernet::fetch::FetchError;
    use crate::careernet::models::Provenance;
    use crate::careernet::retry::RetryPolicy;
    use serde_json::json;
    use std::time::Duration;

    fn client(fetcher: Arc<ScriptedFetcher>) -> CareerNetClient {
        let chain = FallbackChain::new(
            fetcher,
            RetryPolicy::new(3, Duration::ZERO),
            "key".to_string(),
            Duration::from_secs(5),
        );
        CareerNetClient::new(chain, EndpointCatalog::default_for("v1", "v2"))
    }

    #[tokio::test]
    async fn test_questions_from_third_candidate() {
        let fetcher = Arc::new(ScriptedFetcher::default());
        fetcher.script("v1/test/questions", vec![Ok(json!({"RESULT": []}))]);
        fetcher.script("v2/test", vec![Err(FetchError::HttpStatus(500))]);
        fetcher.script(
            "v1/test/questions/1",
            vec![Ok(json!({"questions": [
                {"id": "1", "text": "나는 계획적이다.", "options": ["예", "아니오"]}
            ]}))],
        );

        let sourced = client(fetcher.clone()).test_questions("1").await;

        assert!(!sourced.is_sample());
        assert_eq!(sourced.data.len(), 1);
        assert_eq!(
            sourced.provenance,
            Provenance::Upstream {
                endpoint: "v1/test/questions/1".to_string()
            }
        );
        assert!(!fetcher
            .urls_called()
            .contains(&"v1/inspct/question".to_string()));
    }

    #[tokio::test]
    async fn test_questions_fall_back_to_samples_when_all_candidates_fail() {
        let fetcher = Arc::new(ScriptedFetcher::default());
        let sourced = client(fetcher.clone()).test_questions("2").await;

        assert!(sourced.is_sample());
        assert_eq!(sourced.data, samples::questions("2"));
        // 4 candidates x 3 attempts
        assert_eq!(fetcher.urls_called().len(), 12);
        match &sourced.provenance {
            Provenance::Sample { reason } => assert!(reason.contains("all 4")),
            other => panic!("unexpected provenance {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_accepted_payload_falls_back() {
        let fetcher = Arc::new(ScriptedFetcher::default());
        fetcher.script("v1/job", vec![Ok(json!({"jobs": [{"unexpected": true}]}))]);

        let filter = JobFilter {
            category: Some("보건·의료".into()),
            keyword: None,
        };
        let sourced = client(fetcher).list_jobs(&filter).await;

        assert!(sourced.is_sample());
        assert_eq!(sourced.data.len(), 2);
    }

    #[tokio::test]
    async fn test_job_list_from_upstream_passes_filter_params() {
        let fetcher = Arc::new(ScriptedFetcher::default());
        fetcher.script(
            "v1/job",
            vec![Ok(json!({"jobs": [{"id": "77", "name": "기상연구원", "category": "연구직"}]}))],
        );

        let filter = JobFilter {
            category: None,
            keyword: Some("기상".into()),
        };
        let sourced = client(fetcher.clone()).list_jobs(&filter).await;

        assert!(!sourced.is_sample());
        assert_eq!(sourced.data[0].name, "기상연구원");
        let calls = fetcher.calls.lock().unwrap();
        assert_eq!(
            calls[0].query,
            vec![
                ("keyword".to_string(), "기상".to_string()),
                ("apikey".to_string(), "key".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_submit_uses_upstream_result_block() {
        let fetcher = Arc::new(ScriptedFetcher::default());
        fetcher.script(
            "v1/psychTest/1/results",
            vec![Ok(json!({"RESULT": {
                "summary": "탐구형",
                "categories": {"탐구형": 90},
                "recommended_jobs": ["연구원"]
            }}))],
        );
        let test = samples::tests().remove(0);
        let answers = BTreeMap::from([("1".to_string(), "그렇다".to_string())]);

        let sourced = client(fetcher.clone()).submit_test(&test, &answers).await;

        assert!(!sourced.is_sample());
        assert_eq!(sourced.data.test_id, "1");
        assert_eq!(sourced.data.test_name, "직업흥미검사(H)");
        assert_eq!(sourced.data.categories["탐구형"], 90.0);
        let calls = fetcher.calls.lock().unwrap();
        assert_eq!(calls[0].body, Some(json!({"1": "그렇다"})));
    }

    #[tokio::test]
    async fn test_unknown_job_detail_is_none_from_samples() {
        let fetcher = Arc::new(ScriptedFetcher::default());
        let sourced = client(fetcher).job_detail("999").await;
        assert!(sourced.is_sample());
        assert!(sourced.data.is_none());
    }

    #[tokio::test]
    async fn test_job_detail_id_cannot_escape_its_path_segment() {
        let fetcher = Arc::new(ScriptedFetcher::default());
        let sourced = client(fetcher.clone()).job_detail("../admin?apikey=evil#").await;

        assert!(sourced.is_sample());
        assert_eq!(
            fetcher.urls_called(),
            vec!["v1/job/..%2Fadmin%3Fapikey%3Devil%23"; 3]
        );
        let calls = fetcher.calls.lock().unwrap();
        assert_eq!(calls[0].query, vec![("apikey".to_string(), "key".to_string())]);
    }

    #[tokio::test]
    async fn test_school_detail_is_always_sample() {
        let fetcher = Arc::new(ScriptedFetcher::default());
        let sourced = client(fetcher.clone()).school_detail("1");
        assert!(sourced.is_sample());
        assert_eq!(sourced.data.unwrap().school.name, "서울대학교");
        assert!(fetcher.urls_called().is_empty());
    }
}
