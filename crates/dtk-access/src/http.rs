//! Thin wrapper over `reqwest` for the service's `/api` surface.
//!
//! Centralizes URL building, credential headers and status classification
//! (401/403 → [`AccessError::Authorization`], other non-success →
//! [`AccessError::RemoteService`]) so the directory, login and key modules
//! stay focused on request construction and response mapping. Nothing here
//! retries.

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;

use dtk_config::ServerConfig;

use crate::credentials::{BearerToken, Credential};
use crate::error::AccessError;

const LOGIN_ENDPOINT: &str = "/v1/user/login";
const DETAIL_LIMIT: usize = 300;

/// HTTP client bound to one service base URL. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

/// Result of one raw login call. Transport failures are reported separately
/// as [`AccessError::Transport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawLogin {
    Accepted(BearerToken),
    Rejected { status: u16, reason: String },
}

impl ApiClient {
    /// # Errors
    ///
    /// Returns `AccessError::ClientBuild` if the underlying client cannot be
    /// constructed (e.g., TLS backend initialisation failure).
    pub fn new(
        base_url: &str,
        timeout: std::time::Duration,
        user_agent: &str,
    ) -> Result<Self, AccessError> {
        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(AccessError::ClientBuild)?;
        Ok(Self {
            http,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        })
    }

    /// # Errors
    ///
    /// Returns `AccessError::ClientBuild` if the client cannot be constructed.
    pub fn from_config(config: &ServerConfig) -> Result<Self, AccessError> {
        Self::new(config.base_url(), config.timeout(), &config.user_agent)
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/api{endpoint}", self.base_url)
    }

    /// Send an authorised request and return the body of a 2xx response.
    pub(crate) async fn call<C: Credential>(
        &self,
        method: Method,
        endpoint: &str,
        credential: &C,
    ) -> Result<String, AccessError> {
        let url = self.url(endpoint);
        tracing::debug!(%method, %url, scope = C::SCOPE, "sending request");

        let request = self
            .http
            .request(method.clone(), &url)
            .header(ACCEPT, "application/json");
        let response = credential
            .authorize(request)
            .send()
            .await
            .map_err(|source| AccessError::transport(&method, endpoint, source))?;
        tracing::debug!(status = response.status().as_u16(), "response received");

        let response = check_response(response, &method, endpoint).await?;
        response
            .text()
            .await
            .map_err(|source| AccessError::transport(&method, endpoint, source))
    }

    /// `GET` a JSON document.
    pub(crate) async fn get_json<T, C>(&self, endpoint: &str, credential: &C) -> Result<T, AccessError>
    where
        T: DeserializeOwned,
        C: Credential,
    {
        let body = self.call(Method::GET, endpoint, credential).await?;
        serde_json::from_str(&body)
            .map_err(|e| AccessError::invalid_response(&Method::GET, endpoint, e.to_string()))
    }

    /// Exchange a username and secret for a bearer token.
    ///
    /// A single attempt: HTTP 200 with a token-shaped body is `Accepted`,
    /// anything else is `Rejected`. Only network failures are errors.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::Transport` if the request cannot be completed.
    pub async fn raw_login(&self, username: &str, secret: &str) -> Result<RawLogin, AccessError> {
        let method = Method::POST;
        let body = format!(
            "username={}&password={}",
            urlencoding::encode(username),
            urlencoding::encode(secret)
        );

        tracing::info!(username, "authenticating");
        let response = self
            .http
            .post(self.url(LOGIN_ENDPOINT))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await
            .map_err(|source| AccessError::transport(&method, LOGIN_ENDPOINT, source))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|source| AccessError::transport(&method, LOGIN_ENDPOINT, source))?;

        let outcome = classify_login(status, &text);
        if let RawLogin::Rejected { status, reason } = &outcome {
            tracing::debug!(username, status, %reason, "login rejected");
        }
        Ok(outcome)
    }
}

pub(crate) fn classify_login(status: StatusCode, body: &str) -> RawLogin {
    if status != StatusCode::OK {
        return RawLogin::Rejected {
            status: status.as_u16(),
            reason: error_detail(status, body),
        };
    }
    BearerToken::parse(body).map_or_else(
        || RawLogin::Rejected {
            status: status.as_u16(),
            reason: format!("unexpected response format: {}", truncate(body.trim(), 100)),
        },
        RawLogin::Accepted,
    )
}

/// Map non-success statuses to the error taxonomy. Returns the response
/// unchanged on success.
pub(crate) async fn check_response(
    response: reqwest::Response,
    method: &Method,
    endpoint: &str,
) -> Result<reqwest::Response, AccessError> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(AccessError::Authorization {
            method: method.clone(),
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
        });
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AccessError::RemoteService {
            method: method.clone(),
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            detail: error_detail(status, &body),
        });
    }
    Ok(response)
}

/// Prefer a parsed JSON error body, then raw text, then the status line.
fn error_detail(status: StatusCode, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return format!("HTTP {status}");
    }
    serde_json::from_str::<serde_json::Value>(body)
        .map_or_else(|_| truncate(body, DETAIL_LIMIT), |value| value.to_string())
}

fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let mut out: String = text.chars().take(limit).collect();
    out.push('…');
    out
}
