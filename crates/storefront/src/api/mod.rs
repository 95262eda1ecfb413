//! HTTP gateway to the T-Express REST API.
//!
//! Every service goes through [`ApiClient`]: it builds the request, attaches
//! the bearer token from the injected [`Session`] when asked to, decodes the
//! JSON body and maps failures onto [`ApiError`]. It never retries.

pub mod envelope;
pub mod error;
pub mod session;

use std::collections::BTreeMap;
use std::sync::Arc;

use reqwest::header::{ACCEPT, CACHE_CONTROL, PRAGMA};
use reqwest::{RequestBuilder, StatusCode};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::config::ApiConfig;

pub use error::ApiError;
pub use session::{FileStorage, MemoryStorage, Session, SessionStorage, StorageError};

/// Per-request options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Attach `Authorization: Bearer <token>` when a session exists.
    pub requires_auth: bool,
    /// Ask intermediaries not to serve a cached response.
    pub fresh: bool,
}

impl RequestOptions {
    /// Anonymous request.
    #[must_use]
    pub const fn public() -> Self {
        Self {
            requires_auth: false,
            fresh: false,
        }
    }

    /// Request on behalf of the signed-in client.
    #[must_use]
    pub const fn authenticated() -> Self {
        Self {
            requires_auth: true,
            fresh: false,
        }
    }

    /// Bypass HTTP caches for this request.
    #[must_use]
    pub const fn fresh(mut self) -> Self {
        self.fresh = true;
        self
    }
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the T-Express REST API.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    config: ApiConfig,
    session: Session,
}

impl ApiClient {
    /// Create a new API client bound to `session`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig, session: Session) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                config: config.clone(),
                session,
            }),
        })
    }

    /// The session this client reads its token from.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.config.base_url
    }

    /// `POST` a JSON body and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport`, `ApiError::Api` or `ApiError::Decode`.
    #[instrument(skip(self, body, options), fields(endpoint = %endpoint))]
    pub async fn post<T, B>(
        &self,
        endpoint: &str,
        body: &B,
        options: RequestOptions,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self
            .inner
            .http
            .post(self.inner.config.endpoint(endpoint))
            .json(body);
        self.send(request, options).await
    }

    /// `GET` an endpoint and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport`, `ApiError::Api` or `ApiError::Decode`.
    #[instrument(skip(self, options), fields(endpoint = %endpoint))]
    pub async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let request = self.inner.http.get(self.inner.config.endpoint(endpoint));
        self.send(request, options).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        mut request: RequestBuilder,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        request = request.header(ACCEPT, "application/json");

        if options.requires_auth {
            match self.inner.session.token().await {
                Some(token) => request = request.bearer_auth(token.expose_secret()),
                None => debug!("No session token, sending request without credentials"),
            }
        }
        if options.fresh {
            request = request
                .header(CACHE_CONTROL, "no-cache")
                .header(PRAGMA, "no-cache");
        }

        let response = request.send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "T-Express API returned non-success status"
            );
            return Err(error_from_response(status, &response_text));
        }

        let body = if response_text.trim().is_empty() {
            "{}"
        } else {
            response_text.as_str()
        };

        serde_json::from_str(body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %response_text.chars().take(500).collect::<String>(),
                "Failed to decode T-Express API response"
            );
            ApiError::Decode(e.to_string())
        })
    }
}

/// Build an `ApiError::Api` from a non-success response.
///
/// Laravel answers with `{ "message": ..., "errors": { field: [..] } }`;
/// anything else falls back to a truncated body or the status reason.
fn error_from_response(status: StatusCode, body: &str) -> ApiError {
    let parsed = serde_json::from_str::<Value>(body).ok();

    let server_message = parsed.as_ref().and_then(|v| {
        v.get("message")
            .or_else(|| v.get("error"))
            .and_then(Value::as_str)
            .map(ToString::to_string)
    });

    let field_errors = parsed
        .as_ref()
        .and_then(|v| v.get("errors"))
        .and_then(|e| serde_json::from_value::<BTreeMap<String, Vec<String>>>(e.clone()).ok())
        .unwrap_or_default();

    let message = server_message
        .filter(|m| !m.is_empty())
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty() && parsed.is_none())
                .then(|| trimmed.chars().take(200).collect())
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        });

    ApiError::Api {
        status: status.as_u16(),
        message,
        field_errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_from_laravel_validation_body() {
        let body = r#"{"message":"Les données sont invalides.","errors":{"email":["L'email est déjà utilisé."]}}"#;
        let err = error_from_response(StatusCode::UNPROCESSABLE_ENTITY, body);
        let ApiError::Api {
            status,
            message,
            field_errors,
        } = err
        else {
            panic!("expected ApiError::Api");
        };
        assert_eq!(status, 422);
        assert_eq!(message, "Les données sont invalides.");
        assert_eq!(field_errors["email"], vec!["L'email est déjà utilisé.".to_string()]);
    }

    #[test]
    fn test_error_from_plain_text_body() {
        let err = error_from_response(StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(err.to_string(), "API error: 502 - upstream down");
    }

    #[test]
    fn test_error_from_empty_body_uses_reason() {
        let err = error_from_response(StatusCode::NOT_FOUND, "");
        assert_eq!(err.to_string(), "API error: 404 - Not Found");
    }

    #[test]
    fn test_request_options_builders() {
        assert!(!RequestOptions::public().requires_auth);
        let opts = RequestOptions::authenticated().fresh();
        assert!(opts.requires_auth);
        assert!(opts.fresh);
    }
}
