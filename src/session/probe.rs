//! Session liveness probe
//!
//! Issues one lightweight read-only request and classifies the response as
//! authenticated or not. The portal sometimes answers an expired session
//! with HTTP 200 and an HTML login page instead of a clean redirect, so
//! classification looks at the content type as well as status and redirect
//! signals. The response body is never parsed.

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, LOCATION};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, trace};

use super::cookie::Session;

/// Substring that marks a redirect target as a login page
const LOGIN_MARKER: &str = "login";

#[async_trait]
pub trait SessionProbe: Send + Sync {
    /// Whether the session still passes authentication. Transport failures
    /// classify as not-authenticated rather than propagating.
    async fn is_authenticated(&self, session: &Session) -> bool;
}

pub struct HttpSessionProbe {
    client: reqwest::Client,
    probe_url: String,
}

impl HttpSessionProbe {
    pub fn new(base_url: &str, probe_path: &str, timeout_secs: u64) -> crate::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self {
            client,
            probe_url: format!("{}{}", base_url.trim_end_matches('/'), probe_path),
        })
    }
}

#[async_trait]
impl SessionProbe for HttpSessionProbe {
    async fn is_authenticated(&self, session: &Session) -> bool {
        let mut request = self
            .client
            .get(&self.probe_url)
            .header("accept", "application/json, text/plain, */*")
            .header("x-requested-with", "XMLHttpRequest")
            .header("cookie", session.header_value());
        if let Some(token) = session.xsrf_token() {
            request = request.header("x-xsrf-token", token);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                debug!("Probe transport failure: {}", e);
                return false;
            }
        };

        let status = response.status();
        let location = header_str(&response, LOCATION);
        let content_type = header_str(&response, CONTENT_TYPE);
        trace!(
            "Probe response: status={} location={:?} content-type={:?}",
            status,
            location,
            content_type
        );

        classify(status, location.as_deref(), content_type.as_deref())
    }
}

fn header_str(response: &reqwest::Response, name: reqwest::header::HeaderName) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}

/// Scripted probe for tests: answers from a queue and counts invocations
pub struct MockSessionProbe {
    answers: std::sync::Mutex<Vec<bool>>,
    calls: std::sync::atomic::AtomicUsize,
}

impl MockSessionProbe {
    pub fn new(answers: Vec<bool>) -> Self {
        Self {
            answers: std::sync::Mutex::new(answers),
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionProbe for MockSessionProbe {
    async fn is_authenticated(&self, _session: &Session) -> bool {
        self.calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        let mut answers = self.answers.lock().unwrap();
        if answers.is_empty() {
            false
        } else {
            answers.remove(0)
        }
    }
}

/// Pure classification over the probe response's signals
fn classify(status: StatusCode, location: Option<&str>, content_type: Option<&str>) -> bool {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return false;
    }
    if let Some(location) = location {
        if location.to_ascii_lowercase().contains(LOGIN_MARKER) {
            return false;
        }
    }
    if status.is_redirection() {
        return false;
    }
    status == StatusCode::OK
        && content_type
            .map(|ct| ct.to_ascii_lowercase().contains("json"))
            .unwrap_or(false)
}
