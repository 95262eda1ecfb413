//! Errors produced by the T-Express API gateway.

use std::collections::BTreeMap;

use thiserror::Error;

/// Errors that can occur when talking to the T-Express API.
///
/// Every variant propagates unchanged from the gateway through services and
/// stores; nothing in this layer retries.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never completed (DNS, connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Server-supplied `message`, or a fallback derived from the body.
        message: String,
        /// Laravel validation errors, keyed by field name.
        field_errors: BTreeMap<String, Vec<String>>,
    },

    /// The response body was not the JSON shape we expected.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Some calls of a fan-out operation failed.
    #[error("{failed} of {total} requests failed: {}", summarize(.errors))]
    Aggregate {
        /// Number of failed calls.
        failed: usize,
        /// Number of calls issued.
        total: usize,
        /// The individual failures.
        errors: Vec<Self>,
    },
}

impl ApiError {
    /// HTTP status of an API error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the server rejected the session (401).
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401))
    }

    /// Whether the server rejected the input (422).
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self.status(), Some(422))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

fn summarize(errors: &[ApiError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(status: u16, message: &str) -> ApiError {
        ApiError::Api {
            status,
            message: message.to_string(),
            field_errors: BTreeMap::new(),
        }
    }

    #[test]
    fn test_api_error_display() {
        assert_eq!(
            api(404, "Produit introuvable").to_string(),
            "API error: 404 - Produit introuvable"
        );
    }

    #[test]
    fn test_aggregate_error_display() {
        let err = ApiError::Aggregate {
            failed: 2,
            total: 3,
            errors: vec![api(500, "boom"), api(404, "Ligne introuvable")],
        };
        assert_eq!(
            err.to_string(),
            "2 of 3 requests failed: API error: 500 - boom; API error: 404 - Ligne introuvable"
        );
    }

    #[test]
    fn test_status_helpers() {
        assert!(api(401, "Non authentifié").is_unauthorized());
        assert!(api(422, "Données invalides").is_validation());
        assert_eq!(ApiError::Decode("x".into()).status(), None);
    }
}
