use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::endpoints::{EndpointCandidate, Operation};
use super::fetch::{FetchError, FetchRequest, HttpFetcher};
use super::retry::RetryPolicy;

/// Why a single candidate was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CandidateFailure {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("payload has no non-empty marker key (expected one of {expected:?})")]
    MissingMarker { expected: Vec<String> },
}

/// Result of running a fallback chain. Exhaustion is a value, not an error:
/// callers are expected to substitute sample data.
#[derive(Debug, Clone)]
pub enum ChainOutcome {
    Accepted {
        payload: Value,
        candidate_index: usize,
        endpoint: String,
    },
    Exhausted {
        attempted: usize,
        last_failure: Option<CandidateFailure>,
    },
}

impl ChainOutcome {
    pub fn failure_reason(&self) -> String {
        match self {
            ChainOutcome::Accepted { .. } => "accepted".to_string(),
            ChainOutcome::Exhausted {
                last_failure: Some(failure),
                attempted,
            } => format!("all {attempted} endpoint candidates failed; last: {failure}"),
            ChainOutcome::Exhausted {
                last_failure: None, ..
            } => "no endpoint candidates configured".to_string(),
        }
    }
}

/// Tries each endpoint candidate of an operation in declared order until one
/// returns a payload carrying the expected marker key.
#[derive(Clone)]
pub struct FallbackChain {
    fetcher: Arc<dyn HttpFetcher>,
    retry: RetryPolicy,
    api_key: String,
    timeout: Duration,
}

impl FallbackChain {
    pub fn new(
        fetcher: Arc<dyn HttpFetcher>,
        retry: RetryPolicy,
        api_key: String,
        timeout: Duration,
    ) -> Self {
        Self {
            fetcher,
            retry,
            api_key,
            timeout,
        }
    }

    pub async fn run(
        &self,
        operation: Operation,
        candidates: &[EndpointCandidate],
        inputs: &BTreeMap<String, String>,
        body: Option<&Value>,
    ) -> ChainOutcome {
        let mut last_failure = None;

        for (index, candidate) in candidates.iter().enumerate() {
            let request = self.build_request(candidate, inputs, body);
            debug!(
                "{}: trying candidate {}/{} ({})",
                operation.as_str(),
                index + 1,
                candidates.len(),
                request.url
            );

            let fetcher = &self.fetcher;
            let request_ref = &request;
            let result = self
                .retry
                .run(|| async move { fetcher.fetch(request_ref).await })
                .await;

            let failure = match result {
                Ok(payload) if has_marker(&payload, &candidate.marker_keys) => {
                    info!(
                        "{}: accepted candidate {} ({})",
                        operation.as_str(),
                        index + 1,
                        request.url
                    );
                    return ChainOutcome::Accepted {
                        payload,
                        candidate_index: index,
                        endpoint: request.url,
                    };
                }
                Ok(_) => CandidateFailure::MissingMarker {
                    expected: candidate.marker_keys.clone(),
                },
                Err(err) => CandidateFailure::Fetch(err),
            };

            warn!(
                "{}: candidate {} ({}) rejected: {}",
                operation.as_str(),
                index + 1,
                request.url,
                failure
            );
            last_failure = Some(failure);
        }

        ChainOutcome::Exhausted {
            attempted: candidates.len(),
            last_failure,
        }
    }

    fn build_request(
        &self,
        candidate: &EndpointCandidate,
        inputs: &BTreeMap<String, String>,
        body: Option<&Value>,
    ) -> FetchRequest {
        let mut query = candidate.render_params(inputs);
        query.push((candidate.api_key_param.clone(), self.api_key.clone()));

        FetchRequest {
            url: candidate.render_url(inputs),
            method: candidate.method,
            query,
            body: body.cloned(),
            timeout: self.timeout,
        }
    }
}

/// True when `payload` holds a non-empty value under any of `keys`.
fn has_marker(payload: &Value, keys: &[String]) -> bool {
    keys.iter()
        .filter_map(|key| payload.get(key))
        .any(|value| match value {
            Value::Null => false,
            Value::String(s) => !s.is_empty(),
            Value::Array(items) => !items.is_empty(),
            Value::Object(map) => !map.is_empty(),
            Value::Bool(_) | Value::Number(_) => true,
        })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::careernet::fetch::HttpMethod;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays scripted responses per URL and records every call.
    #[derive(Default)]
    pub(crate) struct ScriptedFetcher {
        scripts: Mutex<BTreeMap<String, VecDeque<Result<Value, FetchError>>>>,
        pub calls: Mutex<Vec<FetchRequest>>,
    }

    impl ScriptedFetcher {
        /// Queues responses for `url`; the last one repeats once the queue drains.
        pub fn script(&self, url: &str, responses: Vec<Result<Value, FetchError>>) {
            self.scripts
                .lock()
                .unwrap()
                .insert(url.to_string(), responses.into());
        }

        pub fn urls_called(&self) -> Vec<String> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .map(|r| r.url.clone())
                .collect()
        }
    }

    #[async_trait]
    impl HttpFetcher for ScriptedFetcher {
        async fn fetch(&self, request: &FetchRequest) -> Result<Value, FetchError> {
            self.calls.lock().unwrap().push(request.clone());
            let mut scripts = self.scripts.lock().unwrap();
            match scripts.get_mut(&request.url) {
                Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
                Some(queue) => queue
                    .front()
                    .cloned()
                    .unwrap_or(Err(FetchError::Transport("no script".into()))),
                None => Err(FetchError::Transport("connection refused".into())),
            }
        }
    }

    fn candidate(url: &str, marker: &str) -> EndpointCandidate {
        EndpointCandidate {
            url_template: url.to_string(),
            params: BTreeMap::new(),
            method: HttpMethod::Get,
            api_key_param: "apikey".to_string(),
            marker_keys: vec![marker.to_string()],
        }
    }

    fn chain(fetcher: Arc<ScriptedFetcher>) -> FallbackChain {
        FallbackChain::new(
            fetcher,
            RetryPolicy::new(3, Duration::ZERO),
            "secret".to_string(),
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn test_stops_at_first_successful_candidate() {
        let fetcher = Arc::new(ScriptedFetcher::default());
        fetcher.script("c1", vec![Err(FetchError::HttpStatus(404))]);
        fetcher.script("c2", vec![Ok(json!({"RESULT": [{"q": 1}]}))]);
        fetcher.script("c3", vec![Ok(json!({"RESULT": [{"q": 2}]}))]);

        let candidates = vec![
            candidate("c1", "RESULT"),
            candidate("c2", "RESULT"),
            candidate("c3", "RESULT"),
            candidate("c4", "RESULT"),
        ];
        let outcome = chain(fetcher.clone())
            .run(Operation::TestQuestions, &candidates, &BTreeMap::new(), None)
            .await;

        match outcome {
            ChainOutcome::Accepted {
                candidate_index,
                payload,
                endpoint,
            } => {
                assert_eq!(candidate_index, 1);
                assert_eq!(endpoint, "c2");
                assert_eq!(payload["RESULT"][0]["q"], 1);
            }
            other => panic!("expected acceptance, got {other:?}"),
        }
        // c1 retried three times, c2 once, c3 and c4 never.
        assert_eq!(fetcher.urls_called(), vec!["c1", "c1", "c1", "c2"]);
    }

    #[tokio::test]
    async fn test_success_without_marker_moves_to_next_candidate() {
        let fetcher = Arc::new(ScriptedFetcher::default());
        fetcher.script("c1", vec![Ok(json!({"RESULT": []}))]);
        fetcher.script("c2", vec![Ok(json!({"questions": [{"id": "1"}]}))]);

        let candidates = vec![candidate("c1", "RESULT"), candidate("c2", "questions")];
        let outcome = chain(fetcher.clone())
            .run(Operation::TestQuestions, &candidates, &BTreeMap::new(), None)
            .await;

        assert!(matches!(
            outcome,
            ChainOutcome::Accepted {
                candidate_index: 1,
                ..
            }
        ));
        // a marker miss is not retried
        assert_eq!(fetcher.urls_called(), vec!["c1", "c2"]);
    }

    #[tokio::test]
    async fn test_exhaustion_reports_last_candidate_error() {
        let fetcher = Arc::new(ScriptedFetcher::default());
        fetcher.script("c1", vec![Err(FetchError::Timeout)]);
        fetcher.script("c2", vec![Err(FetchError::HttpStatus(502))]);

        let candidates = vec![candidate("c1", "jobs"), candidate("c2", "jobs")];
        let outcome = chain(fetcher.clone())
            .run(Operation::ListJobs, &candidates, &BTreeMap::new(), None)
            .await;

        match &outcome {
            ChainOutcome::Exhausted {
                attempted,
                last_failure,
            } => {
                assert_eq!(*attempted, 2);
                assert_eq!(
                    last_failure,
                    &Some(CandidateFailure::Fetch(FetchError::HttpStatus(502)))
                );
            }
            other => panic!("expected exhaustion, got {other:?}"),
        }
        assert!(outcome.failure_reason().contains("502"));
        assert_eq!(fetcher.urls_called().len(), 6);
    }

    #[tokio::test]
    async fn test_empty_candidate_list_is_exhausted_without_failure() {
        let fetcher = Arc::new(ScriptedFetcher::default());
        let outcome = chain(fetcher)
            .run(Operation::ListTests, &[], &BTreeMap::new(), None)
            .await;
        assert!(matches!(
            outcome,
            ChainOutcome::Exhausted {
                attempted: 0,
                last_failure: None
            }
        ));
    }

    #[tokio::test]
    async fn test_request_carries_rendered_params_and_api_key() {
        let fetcher = Arc::new(ScriptedFetcher::default());
        fetcher.script("v2/test", vec![Ok(json!({"result": [1]}))]);

        let mut c = candidate("v2/test", "result");
        c.params.insert("q".to_string(), "{test_id}".to_string());
        c.api_key_param = "apiKey".to_string();

        let inputs = BTreeMap::from([("test_id".to_string(), "7".to_string())]);
        chain(fetcher.clone())
            .run(Operation::TestQuestions, &[c], &inputs, None)
            .await;

        let calls = fetcher.calls.lock().unwrap();
        assert_eq!(
            calls[0].query,
            vec![
                ("q".to_string(), "7".to_string()),
                ("apiKey".to_string(), "secret".to_string())
            ]
        );
    }

    #[test]
    fn test_has_marker_rejects_empty_values() {
        let keys = vec!["RESULT".to_string()];
        assert!(!has_marker(&json!({"RESULT": null}), &keys));
        assert!(!has_marker(&json!({"RESULT": ""}), &keys));
        assert!(!has_marker(&json!({"RESULT": {}}), &keys));
        assert!(!has_marker(&json!({"other": [1]}), &keys));
        assert!(has_marker(&json!({"RESULT": {"a": 1}}), &keys));
    }
}
