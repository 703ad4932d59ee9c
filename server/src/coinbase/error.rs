//! Coinbase API errors.
//!
//! Upstream failures carry an error `id` (e.g. `not_found`) in the body.
//! When the id is absent or unknown the HTTP status decides the kind.

use serde::Deserialize;

/// Classified upstream failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    TwoFactorRequired,
    ParamRequired,
    Validation,
    InvalidRequest,
    PersonalDetailsRequired,
    Authentication,
    UnverifiedEmail,
    InvalidToken,
    RevokedToken,
    ExpiredToken,
    InvalidScope,
    NotFound,
    RateLimitExceeded,
    InternalServer,
    ServiceUnavailable,
    Other,
}

impl ApiErrorKind {
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        let kind = match id {
            "two_factor_required" => Self::TwoFactorRequired,
            "param_required" => Self::ParamRequired,
            "validation_error" => Self::Validation,
            "invalid_request" => Self::InvalidRequest,
            "personal_details_required" => Self::PersonalDetailsRequired,
            "authentication_error" => Self::Authentication,
            "unverified_email" => Self::UnverifiedEmail,
            "invalid_token" => Self::InvalidToken,
            "revoked_token" => Self::RevokedToken,
            "expired_token" => Self::ExpiredToken,
            "invalid_scope" => Self::InvalidScope,
            "not_found" => Self::NotFound,
            "rate_limit_exceeded" => Self::RateLimitExceeded,
            "internal_server_error" => Self::InternalServer,
            _ => return None,
        };
        Some(kind)
    }

    #[must_use]
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => Self::InvalidRequest,
            401 => Self::Authentication,
            402 => Self::TwoFactorRequired,
            403 => Self::InvalidScope,
            404 => Self::NotFound,
            422 => Self::Validation,
            429 => Self::RateLimitExceeded,
            500 => Self::InternalServer,
            503 => Self::ServiceUnavailable,
            _ => Self::Other,
        }
    }
}

/// Errors produced by Coinbase client operations.
#[derive(Debug, thiserror::Error)]
pub enum CoinbaseError {
    /// The upstream returned a non-2xx status.
    #[error("coinbase API error ({status}): {message}")]
    Api {
        kind: ApiErrorKind,
        status: u16,
        id: Option<String>,
        message: String,
    },

    /// A 2xx body did not carry the mandatory `data` key.
    #[error("coinbase response missing data (status {status})")]
    MissingData { status: u16 },

    /// The HTTP request itself failed.
    #[error("coinbase request failed: {0}")]
    Request(String),

    /// The body could not be decoded.
    #[error("coinbase response parse failed: {0}")]
    Parse(String),

    /// The base URI or a derived endpoint URI is malformed.
    #[error("invalid coinbase URI: {0}")]
    InvalidUri(String),

    /// The HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl CoinbaseError {
    /// Upstream status for `Api` errors, `None` for local failures.
    #[must_use]
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct ErrorEntry {
    id: Option<String>,
    message: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBlob {
    #[serde(default)]
    errors: Vec<ErrorEntry>,
    error: Option<String>,
    error_description: Option<String>,
}

/// Build an `Api` error from a non-2xx status and its raw body.
///
/// Accepts both the `{"errors": [{"id", "message"}]}` shape and the OAuth
/// `{"error", "error_description"}` shape. Unparseable bodies fall back to
/// the status mapping with the body text as message.
#[must_use]
pub fn build_api_error(status: u16, body: &str) -> CoinbaseError {
    let (id, message) = match serde_json::from_str::<ErrorBlob>(body) {
        Ok(blob) => {
            if let Some(error) = blob.error {
                (Some(error), blob.error_description)
            } else {
                blob.errors
                    .into_iter()
                    .next()
                    .map_or((None, None), |e| (e.id, e.message))
            }
        }
        Err(_) => (None, None),
    };

    let kind = id
        .as_deref()
        .and_then(ApiErrorKind::from_id)
        .unwrap_or_else(|| ApiErrorKind::from_status(status));
    let message = message.unwrap_or_else(|| {
        let trimmed = body.trim();
        if trimmed.is_empty() { format!("HTTP {status}") } else { trimmed.to_string() }
    });

    CoinbaseError::Api { kind, status, id, message }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
