//! HTTP client for the scheduling service

use reqwest::Client as HttpClient;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use super::error::ServiceError;
use super::payload::SchedulePayload;
use super::request::GenerateRequest;

const LOGIN_FALLBACK: &str = "Login failed";

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    access_token: Option<String>,
}

pub struct ScheduleClient {
    http: HttpClient,
    base_url: String,
}

impl ScheduleClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ServiceError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ServiceError::MissingApiBase);
        }

        let http = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Exchange credentials for a bearer token
    pub async fn login(&self, username: &str, password: &str) -> Result<String, ServiceError> {
        let url = format!("{}/auth/login", self.base_url);
        log::debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .json(&LoginRequest { username, password })
            .send()
            .await?;

        let body = read_body(response, |_, is_json, body| login_error_message(is_json, body)).await?;
        let parsed: LoginResponse =
            serde_json::from_str(&body).map_err(|e| ServiceError::Decode(e.to_string()))?;

        parsed
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ServiceError::Decode("login response has no access_token".to_string()))
    }

    /// Submit a generation request and decode the result payload
    pub async fn generate(
        &self,
        token: &str,
        request: &GenerateRequest,
    ) -> Result<SchedulePayload, ServiceError> {
        if token.trim().is_empty() {
            return Err(ServiceError::MissingToken);
        }

        let url = format!("{}/schedule/generate", self.base_url);
        log::debug!(
            "POST {} ({} employees, {} {})",
            url,
            request.employees.len(),
            request.rules.month,
            request.rules.year
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(request)
            .send()
            .await?;

        let body = read_body(response, extract_error_message).await?;
        serde_json::from_str(&body).map_err(|e| ServiceError::Decode(e.to_string()))
    }
}

/// Read the body of a response, turning non-success statuses into
/// `ServiceError::Status` with the message chosen by `describe`
async fn read_body(
    response: reqwest::Response,
    describe: fn(u16, bool, &str) -> String,
) -> Result<String, ServiceError> {
    let status = response.status();
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("application/json"));
    let body = response.text().await?;

    if status.is_success() {
        return Ok(body);
    }

    let message = describe(status.as_u16(), is_json, &body);
    log::warn!("Service returned {}: {}", status, message);
    Err(ServiceError::Status {
        status: status.as_u16(),
        message,
    })
}

/// `detail`, else `message`, from a JSON error body. Empty strings and
/// nulls count as absent; structured values are stringified.
fn detail_or_message(value: &Value) -> Option<String> {
    ["detail", "message"]
        .into_iter()
        .find_map(|key| match value.get(key)? {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        })
}

/// Human-readable message for a failed service request.
///
/// JSON bodies use `detail`, then `message`, then the whole document.
/// Other bodies are used as-is. An empty body gives `Request failed (<status>)`.
pub fn extract_error_message(status: u16, is_json: bool, body: &str) -> String {
    if body.trim().is_empty() {
        return format!("Request failed ({})", status);
    }

    if is_json {
        if let Ok(value) = serde_json::from_str::<Value>(body) {
            return detail_or_message(&value).unwrap_or_else(|| value.to_string());
        }
    }

    body.to_string()
}

/// Message for a failed login: `detail` or `message` from a JSON body,
/// otherwise `Login failed`
pub fn login_error_message(is_json: bool, body: &str) -> String {
    is_json
        .then(|| serde_json::from_str::<Value>(body).ok())
        .flatten()
        .and_then(|value| detail_or_message(&value))
        .unwrap_or_else(|| LOGIN_FALLBACK.to_string())
}
