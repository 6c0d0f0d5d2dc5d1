#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use vtscan_core::{FileSubmission, IndicatorKind};
use vtscan_engine::{ApiError, ApiResponse, ProgressSink, ScanEvent, VtApi};

#[derive(Default)]
pub struct TestSink {
    events: Arc<Mutex<Vec<ScanEvent>>>,
}

impl TestSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<ScanEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl ProgressSink for TestSink {
    fn emit(&self, event: ScanEvent) {
        self.events.lock().unwrap().push(event);
    }
}

pub fn ok(body: Value) -> ApiResponse {
    ApiResponse { status: 200, body }
}

pub fn status_body(status: &str) -> ApiResponse {
    ok(json!({ "data": { "attributes": { "status": status } } }))
}

/// In-memory API that replays scripted analysis responses and counts calls.
///
/// Once the script runs out every further status check reports `queued`.
#[derive(Default)]
pub struct ScriptedApi {
    analyses: Mutex<VecDeque<ApiResponse>>,
    analysis_calls: Mutex<u32>,
    other_calls: Mutex<Vec<String>>,
    precheck_error: Mutex<Option<ApiError>>,
    stall_lookups: bool,
}

impl ScriptedApi {
    pub fn with_statuses(statuses: &[&str]) -> Self {
        let api = Self::default();
        api.analyses
            .lock()
            .unwrap()
            .extend(statuses.iter().map(|status| status_body(status)));
        api
    }

    pub fn with_responses(responses: Vec<ApiResponse>) -> Self {
        let api = Self::default();
        api.analyses.lock().unwrap().extend(responses);
        api
    }

    /// The next file report request fails at the transport level.
    pub fn failing_precheck(self, err: ApiError) -> Self {
        *self.precheck_error.lock().unwrap() = Some(err);
        self
    }

    /// Indicator lookups never answer.
    pub fn stalling_lookups(mut self) -> Self {
        self.stall_lookups = true;
        self
    }

    pub fn analysis_calls(&self) -> u32 {
        *self.analysis_calls.lock().unwrap()
    }

    pub fn other_calls(&self) -> Vec<String> {
        self.other_calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.other_calls.lock().unwrap().push(call);
    }
}

fn report(id: &str) -> ApiResponse {
    ok(json!({ "data": { "id": id, "attributes": { "last_analysis_stats": { "harmless": 1 } } } }))
}

#[async_trait::async_trait]
impl VtApi for ScriptedApi {
    async fn file_report(&self, sha256: &str) -> Result<ApiResponse, ApiError> {
        self.record(format!("file_report {sha256}"));
        if let Some(err) = self.precheck_error.lock().unwrap().take() {
            return Err(err);
        }
        Ok(ApiResponse {
            status: 404,
            body: Value::Null,
        })
    }

    async fn upload_file(&self, file: &FileSubmission) -> Result<ApiResponse, ApiError> {
        self.record(format!("upload {}", file.name()));
        Ok(ok(json!({ "data": { "id": "analysis-1" } })))
    }

    async fn analysis(&self, _analysis_id: &str) -> Result<ApiResponse, ApiError> {
        *self.analysis_calls.lock().unwrap() += 1;
        let next = self.analyses.lock().unwrap().pop_front();
        Ok(next.unwrap_or_else(|| status_body("queued")))
    }

    async fn submit_url(&self, url: &str) -> Result<ApiResponse, ApiError> {
        self.record(format!("submit_url {url}"));
        Ok(ok(json!({ "data": { "id": "analysis-url" } })))
    }

    async fn url_report(&self, url_id: &str) -> Result<ApiResponse, ApiError> {
        self.record(format!("url_report {url_id}"));
        Ok(report(url_id))
    }

    async fn indicator_report(
        &self,
        kind: IndicatorKind,
        value: &str,
    ) -> Result<ApiResponse, ApiError> {
        self.record(format!("{} {value}", kind.resource()));
        if self.stall_lookups {
            std::future::pending::<()>().await;
        }
        Ok(report(value))
    }
}
