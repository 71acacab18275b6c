//! Unified client-side error model.
//! Every failure leaving the HTTP client or the session service is folded into
//! `ApiError`; callers never see raw reqwest or serde errors, and only the
//! HTTP client itself is allowed to react to an error with a hard redirect.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Rejected login credentials. The message is the backend's own wording
    /// (field-level `error`, first `non_field_errors` entry, or a fallback).
    #[error("{message}")]
    Credential { message: String },

    /// A 401 that was not eligible for recovery, or survived the single
    /// refresh-and-replay attempt.
    #[error("unauthorized")]
    Unauthorized,

    /// The refresh call itself failed (cookie missing or expired). By the
    /// time this surfaces, the token store has been cleared and the hard
    /// redirect to the login entry point has already fired.
    #[error("session expired")]
    SessionExpired,

    /// Transport-level failure. No automatic retry beyond the single 401
    /// replay.
    #[error("network error: {message}")]
    Network { message: String },

    /// Backend validation body (HTTP 400), passed through unmodified so the
    /// UI layer can render field errors.
    #[error("validation error")]
    Validation { body: Value },

    /// Any other non-2xx response.
    #[error("HTTP {status}")]
    Http { status: u16, body: Value },

    /// The backend answered with a payload we could not interpret.
    #[error("decode error: {message}")]
    Decode { message: String },
}

impl ApiError {
    pub fn network<S: Into<String>>(msg: S) -> Self {
        ApiError::Network { message: msg.into() }
    }

    pub fn decode<S: Into<String>>(msg: S) -> Self {
        ApiError::Decode { message: msg.into() }
    }

    pub fn credential<S: Into<String>>(msg: S) -> Self {
        ApiError::Credential { message: msg.into() }
    }

    /// HTTP status associated with the error, where one exists.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized | ApiError::SessionExpired => Some(401),
            ApiError::Validation { .. } => Some(400),
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw backend body, for errors that carry one.
    pub fn body(&self) -> Option<&Value> {
        match self {
            ApiError::Validation { body } | ApiError::Http { body, .. } => Some(body),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode { message: err.to_string() }
        } else {
            // Covers connect/timeout/body failures; reported as a generic
            // connectivity failure per the error-handling policy.
            ApiError::Network { message: err.to_string() }
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Extract the most specific human-readable message from a Django REST error
/// body: field-level `error`, then the first `non_field_errors` entry, then
/// the supplied fallback.
pub fn extract_error_message(body: &Value, fallback: &str) -> String {
    if let Some(msg) = body.get("error").and_then(|v| v.as_str()) {
        return msg.to_string();
    }
    if let Some(msg) = body
        .get("non_field_errors")
        .and_then(|v| v.as_array())
        .and_then(|a| a.first())
        .and_then(|v| v.as_str())
    {
        return msg.to_string();
    }
    fallback.to_string()
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
