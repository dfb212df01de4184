//! Remote OCR backend: submit a document, then poll the operation until it
//! reaches a terminal status.

use std::fmt;
use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::model::Page;

/// Service contract version sent with every submit.
pub const DEFAULT_API_VERSION: &str = "2024-11-30";
/// Delay between two polls of a running operation.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);
/// Polls before a running operation is abandoned.
pub const DEFAULT_MAX_POLLS: u32 = 120;
/// Per-request HTTP timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const OPERATION_LOCATION_HEADER: &str = "Operation-Location";

/// Connection settings for the remote OCR service.
#[derive(Clone, PartialEq, Eq)]
pub struct OcrConfig {
    /// Analyze endpoint that accepts PDF bodies
    pub endpoint: String,

    /// Subscription key
    pub api_key: String,

    /// Value of the `api-version` query parameter
    pub api_version: String,

    /// Per-request HTTP timeout
    pub request_timeout: Duration,
}

impl OcrConfig {
    /// Create a configuration with the default API version.
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Set the API version.
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Set the per-request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Reject configurations that cannot reach a service.
    pub fn validate(&self) -> Result<()> {
        let endpoint = self.endpoint.trim();
        if endpoint.is_empty() {
            return Err(Error::Config("OCR endpoint is empty".to_string()));
        }
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(Error::Config(format!(
                "OCR endpoint must be an http(s) URL: {}",
                endpoint
            )));
        }
        if self.api_key.trim().is_empty() {
            return Err(Error::Config("OCR API key is empty".to_string()));
        }
        Ok(())
    }

    /// Submit URL with the `api-version` parameter appended unless the
    /// endpoint already carries one.
    pub fn submit_url(&self) -> String {
        let endpoint = self.endpoint.trim();
        if endpoint.contains("api-version=") {
            return endpoint.to_string();
        }
        let separator = if endpoint.contains('?') { '&' } else { '?' };
        format!("{}{}api-version={}", endpoint, separator, self.api_version)
    }
}

// The API key never reaches logs.
impl fmt::Debug for OcrConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OcrConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("api_version", &self.api_version)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// Opaque reference to a submitted operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OperationHandle(String);

impl OperationHandle {
    /// Wrap a handle string (for the HTTP client, the operation URL).
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    /// Handle as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OperationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Status reported by one poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationStatus {
    /// Not started or still running
    Running,
    /// Finished; pages carry backend-reported page numbers
    Succeeded(Vec<Page>),
    /// The service gave up on the document
    Failed(String),
}

/// A remote OCR service speaking the submit/poll protocol.
pub trait OcrBackend: Send + Sync {
    /// Submit document bytes and return a handle to poll.
    fn submit(&self, data: &[u8]) -> Result<OperationHandle>;

    /// Query the status of a submitted operation once.
    fn poll(&self, handle: &OperationHandle) -> Result<OperationStatus>;
}

/// Bounds on the poll loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay between polls
    pub interval: Duration,

    /// Maximum number of polls
    pub max_attempts: u32,
}

impl PollPolicy {
    /// Create a policy.
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }

    /// Set the poll interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Set the maximum number of polls.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Longest time the loop can spend sleeping.
    pub fn max_wait(&self) -> Duration {
        self.interval
            .saturating_mul(self.max_attempts.saturating_sub(1))
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL, DEFAULT_MAX_POLLS)
    }
}

enum PollState {
    Waiting { attempts: u32 },
    Done(Vec<Page>),
}

/// Submit `data` and poll until the operation finishes or the policy runs out.
///
/// Returns pages sorted by page number. A `failed` status is a
/// [`Error::RemoteService`]; running past `max_attempts` polls is
/// [`Error::PollTimeout`].
pub fn run_operation(
    backend: &dyn OcrBackend,
    data: &[u8],
    policy: &PollPolicy,
) -> Result<Vec<Page>> {
    let handle = backend.submit(data)?;
    log::debug!("Submitted OCR operation {}", handle);

    let mut state = PollState::Waiting { attempts: 0 };
    loop {
        state = match state {
            PollState::Done(mut pages) => {
                pages.sort_by_key(|p| p.number);
                return Ok(pages);
            }
            PollState::Waiting { attempts } if attempts >= policy.max_attempts => {
                return Err(Error::PollTimeout { attempts });
            }
            PollState::Waiting { attempts } => {
                if attempts > 0 && !policy.interval.is_zero() {
                    thread::sleep(policy.interval);
                }
                let attempts = attempts + 1;
                match backend.poll(&handle)? {
                    OperationStatus::Running => {
                        log::debug!(
                            "OCR operation {} still running (poll {}/{})",
                            handle,
                            attempts,
                            policy.max_attempts
                        );
                        PollState::Waiting { attempts }
                    }
                    OperationStatus::Succeeded(pages) => {
                        log::debug!(
                            "OCR operation {} succeeded after {} polls with {} pages",
                            handle,
                            attempts,
                            pages.len()
                        );
                        PollState::Done(pages)
                    }
                    OperationStatus::Failed(reason) => {
                        return Err(Error::RemoteService(format!(
                            "OCR operation failed: {}",
                            reason
                        )));
                    }
                }
            }
        };
    }
}

#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    status: String,
    #[serde(rename = "analyzeResult")]
    analyze_result: Option<AnalyzeResult>,
    error: Option<ServiceError>,
}

#[derive(Debug, Deserialize)]
struct AnalyzeResult {
    pages: Option<Vec<AnalyzedPage>>,
}

#[derive(Debug, Deserialize)]
struct AnalyzedPage {
    #[serde(rename = "pageNumber")]
    page_number: Option<u32>,
    lines: Option<Vec<Fragment>>,
    paragraphs: Option<Vec<Fragment>>,
}

#[derive(Debug, Deserialize)]
struct Fragment {
    content: String,
}

#[derive(Debug, Deserialize)]
struct ServiceError {
    code: Option<String>,
    message: Option<String>,
}

impl ServiceError {
    fn describe(&self) -> String {
        match (&self.code, &self.message) {
            (Some(code), Some(message)) => format!("{}: {}", code, message),
            (None, Some(message)) => message.clone(),
            (Some(code), None) => code.clone(),
            (None, None) => "no details".to_string(),
        }
    }
}

/// Parse one poll response body into an [`OperationStatus`].
///
/// A succeeded operation whose result cannot be turned into pages is
/// [`Error::MalformedResult`]; it is never treated as an empty document.
pub fn parse_poll_response(body: &str) -> Result<OperationStatus> {
    let response: AnalyzeResponse = serde_json::from_str(body)?;

    match response.status.to_ascii_lowercase().as_str() {
        "notstarted" | "running" => Ok(OperationStatus::Running),
        "failed" => Ok(OperationStatus::Failed(
            response
                .error
                .map(|e| e.describe())
                .unwrap_or_else(|| "no details".to_string()),
        )),
        "succeeded" => {
            let result = response.analyze_result.ok_or_else(|| {
                Error::MalformedResult("succeeded operation has no analyzeResult".to_string())
            })?;
            let pages = result.pages.ok_or_else(|| {
                Error::MalformedResult("analyzeResult has no pages".to_string())
            })?;
            pages
                .into_iter()
                .enumerate()
                .map(|(i, page)| normalize_page(i, page))
                .collect::<Result<Vec<_>>>()
                .map(OperationStatus::Succeeded)
        }
        other => Err(Error::MalformedResult(format!(
            "unknown operation status: {}",
            other
        ))),
    }
}

fn normalize_page(position: usize, page: AnalyzedPage) -> Result<Page> {
    let number = page.page_number.ok_or_else(|| {
        Error::MalformedResult(format!("page at position {} has no pageNumber", position))
    })?;
    let fragments = page.lines.or(page.paragraphs).ok_or_else(|| {
        Error::MalformedResult(format!("page {} has neither lines nor paragraphs", number))
    })?;
    let text = fragments
        .into_iter()
        .map(|f| f.content)
        .collect::<Vec<_>>()
        .join("\n");
    Ok(Page::new(number, text))
}

/// [`OcrBackend`] speaking HTTP with a blocking `reqwest` client.
#[derive(Debug, Clone)]
pub struct RemoteOcrClient {
    client: Client,
    config: OcrConfig,
}

impl RemoteOcrClient {
    /// Create a client after validating the configuration.
    pub fn new(config: OcrConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { client, config })
    }

    /// Active configuration.
    pub fn config(&self) -> &OcrConfig {
        &self.config
    }
}

impl OcrBackend for RemoteOcrClient {
    fn submit(&self, data: &[u8]) -> Result<OperationHandle> {
        let response = self
            .client
            .post(self.config.submit_url())
            .header(SUBSCRIPTION_KEY_HEADER, &self.config.api_key)
            .header(reqwest::header::CONTENT_TYPE, "application/pdf")
            .body(data.to_vec())
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().unwrap_or_default();
            return Err(Error::RemoteService(format!(
                "submit returned {}: {}",
                status, text
            )));
        }

        response
            .headers()
            .get(OPERATION_LOCATION_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(OperationHandle::new)
            .ok_or_else(|| {
                Error::RemoteService(format!(
                    "submit response is missing the {} header",
                    OPERATION_LOCATION_HEADER
                ))
            })
    }

    fn poll(&self, handle: &OperationHandle) -> Result<OperationStatus> {
        let response = self
            .client
            .get(handle.as_str())
            .header(SUBSCRIPTION_KEY_HEADER, &self.config.api_key)
            .send()?;

        let status = response.status();
        // Throttled polls count as attempts; the service is still working.
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Ok(OperationStatus::Running);
        }
        if !status.is_success() {
            let text = response.text().unwrap_or_default();
            return Err(Error::RemoteService(format!(
                "poll returned {}: {}",
                status, text
            )));
        }

        parse_poll_response(&response.text()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    struct ScriptedBackend {
        script: Mutex<VecDeque<OperationStatus>>,
        polls: AtomicU32,
    }

    impl ScriptedBackend {
        fn new(script: Vec<OperationStatus>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                polls: AtomicU32::new(0),
            }
        }

        fn polls(&self) -> u32 {
            self.polls.load(Ordering::SeqCst)
        }
    }

    impl OcrBackend for ScriptedBackend {
        fn submit(&self, _data: &[u8]) -> Result<OperationHandle> {
            Ok(OperationHandle::new("op-1"))
        }

        fn poll(&self, _handle: &OperationHandle) -> Result<OperationStatus> {
            self.polls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(OperationStatus::Running))
        }
    }

    fn fast_policy(max_attempts: u32) -> PollPolicy {
        PollPolicy::new(Duration::ZERO, max_attempts)
    }

    #[test]
    fn test_poll_until_succeeded() {
        let backend = ScriptedBackend::new(vec![
            OperationStatus::Running,
            OperationStatus::Running,
            OperationStatus::Succeeded(vec![Page::new(2, "second"), Page::new(1, "first")]),
        ]);

        let pages = run_operation(&backend, b"%PDF", &fast_policy(10)).unwrap();
        assert_eq!(backend.polls(), 3);
        assert_eq!(pages, vec![Page::new(1, "first"), Page::new(2, "second")]);
    }

    #[test]
    fn test_poll_timeout_after_exact_attempts() {
        let backend = ScriptedBackend::new(Vec::new());
        let err = run_operation(&backend, b"%PDF", &fast_policy(5)).unwrap_err();

        assert!(matches!(err, Error::PollTimeout { attempts: 5 }));
        assert_eq!(backend.polls(), 5);
    }

    #[test]
    fn test_failed_status_is_remote_error() {
        let backend = ScriptedBackend::new(vec![
            OperationStatus::Running,
            OperationStatus::Failed("InvalidContent".to_string()),
        ]);
        let err = run_operation(&backend, b"%PDF", &fast_policy(10)).unwrap_err();

        assert!(err.is_remote());
        assert!(err.to_string().contains("InvalidContent"));
        assert_eq!(backend.polls(), 2);
    }

    #[test]
    fn test_submit_url() {
        let config = OcrConfig::new("https://ocr.example.com/analyze", "key");
        assert_eq!(
            config.submit_url(),
            "https://ocr.example.com/analyze?api-version=2024-11-30"
        );

        let config = OcrConfig::new("https://ocr.example.com/analyze?model=read", "key")
            .with_api_version("2023-07-31");
        assert_eq!(
            config.submit_url(),
            "https://ocr.example.com/analyze?model=read&api-version=2023-07-31"
        );

        let config = OcrConfig::new("https://ocr.example.com/analyze?api-version=1", "key");
        assert_eq!(
            config.submit_url(),
            "https://ocr.example.com/analyze?api-version=1"
        );
    }

    #[test]
    fn test_config_validation() {
        assert!(OcrConfig::new("https://ocr.example.com", "key").validate().is_ok());
        assert!(matches!(
            OcrConfig::new("", "key").validate(),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            OcrConfig::new("ocr.example.com", "key").validate(),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            OcrConfig::new("https://ocr.example.com", " ").validate(),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_config_debug_redacts_key() {
        let config = OcrConfig::new("https://ocr.example.com", "secret-key");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_parse_running() {
        assert_eq!(
            parse_poll_response(r#"{"status":"notStarted"}"#).unwrap(),
            OperationStatus::Running
        );
        assert_eq!(
            parse_poll_response(r#"{"status":"running"}"#).unwrap(),
            OperationStatus::Running
        );
    }

    #[test]
    fn test_parse_succeeded_lines_and_paragraphs() {
        let body = r#"{
            "status": "succeeded",
            "analyzeResult": {
                "pages": [
                    {"pageNumber": 2, "paragraphs": [{"content": "Second page"}]},
                    {"pageNumber": 1, "lines": [{"content": "CHAPTER ONE"}, {"content": "Body text"}]}
                ]
            }
        }"#;

        let OperationStatus::Succeeded(pages) = parse_poll_response(body).unwrap() else {
            panic!("expected succeeded status");
        };
        assert_eq!(
            pages,
            vec![
                Page::new(2, "Second page"),
                Page::new(1, "CHAPTER ONE\nBody text"),
            ]
        );
    }

    #[test]
    fn test_parse_failed_with_details() {
        let body = r#"{"status":"failed","error":{"code":"InvalidRequest","message":"Corrupt file"}}"#;
        assert_eq!(
            parse_poll_response(body).unwrap(),
            OperationStatus::Failed("InvalidRequest: Corrupt file".to_string())
        );
    }

    #[test]
    fn test_parse_malformed_results() {
        let cases = [
            r#"{"status":"succeeded"}"#,
            r#"{"status":"succeeded","analyzeResult":{}}"#,
            r#"{"status":"succeeded","analyzeResult":{"pages":[{"lines":[]}]}}"#,
            r#"{"status":"succeeded","analyzeResult":{"pages":[{"pageNumber":1}]}}"#,
            r#"{"status":"paused"}"#,
            r#"{"analyzeResult":{}}"#,
            "not json",
        ];
        for body in cases {
            assert!(
                matches!(parse_poll_response(body), Err(Error::MalformedResult(_))),
                "expected malformed result for {}",
                body
            );
        }
    }

    #[test]
    fn test_empty_page_is_not_malformed() {
        let body = r#"{"status":"succeeded","analyzeResult":{"pages":[{"pageNumber":1,"lines":[]}]}}"#;
        assert_eq!(
            parse_poll_response(body).unwrap(),
            OperationStatus::Succeeded(vec![Page::new(1, "")])
        );
    }

    #[test]
    fn test_client_rejects_bad_config() {
        assert!(RemoteOcrClient::new(OcrConfig::new("", "")).is_err());
        assert!(RemoteOcrClient::new(OcrConfig::new("https://ocr.example.com", "key")).is_ok());
    }

    #[test]
    fn test_poll_policy() {
        let policy = PollPolicy::default();
        assert_eq!(policy.interval, Duration::from_secs(1));
        assert_eq!(policy.max_attempts, 120);
        assert_eq!(policy.max_wait(), Duration::from_secs(119));
    }
}
