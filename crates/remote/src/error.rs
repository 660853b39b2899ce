//! Remote error taxonomy.

use reqwest::StatusCode;
use serde::Deserialize;

/// Classified failure of a remote call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    #[error("unauthorized")]
    Unauthorized,

    #[error("remote rejected request ({status}): {reason}")]
    RemoteRejected { status: u16, reason: String },

    #[error("remote unavailable: {0}")]
    Unavailable(String),

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl RemoteError {
    /// Returns `true` for failures worth retrying (timeouts, resets, 5xx, 429).
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }

    /// Classifies a non-success HTTP status and its body.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        match status.as_u16() {
            401 | 403 => Self::Unauthorized,
            408 | 429 | 500..=599 => Self::Unavailable(format!("HTTP {}", status.as_u16())),
            code => Self::RemoteRejected {
                status: code,
                reason: remote_reason(body),
            },
        }
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Malformed(e.to_string())
        } else {
            Self::Unavailable(e.to_string())
        }
    }
}

impl From<serde_json::Error> for RemoteError {
    fn from(e: serde_json::Error) -> Self {
        Self::Malformed(e.to_string())
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: String,
    #[serde(default)]
    developer_message: String,
}

/// Extracts the remote-provided reason, falling back to the raw body.
fn remote_reason(body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        if !parsed.error.is_empty() {
            return parsed.error;
        }
        if !parsed.developer_message.is_empty() {
            return parsed.developer_message;
        }
    }
    body.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_statuses() {
        assert_eq!(
            RemoteError::from_status(StatusCode::UNAUTHORIZED, ""),
            RemoteError::Unauthorized
        );
        assert_eq!(
            RemoteError::from_status(StatusCode::FORBIDDEN, ""),
            RemoteError::Unauthorized
        );
    }

    #[test]
    fn transient_statuses() {
        for code in [408u16, 429, 500, 502, 503, 504] {
            let err = RemoteError::from_status(StatusCode::from_u16(code).unwrap(), "");
            assert!(err.is_transient(), "{code} should be transient");
        }
    }

    #[test]
    fn rejection_carries_remote_reason() {
        let err = RemoteError::from_status(
            StatusCode::BAD_REQUEST,
            r#"{"error":"You have reached your upload quota.","developer_message":"quota"}"#,
        );
        assert_eq!(
            err,
            RemoteError::RemoteRejected {
                status: 400,
                reason: "You have reached your upload quota.".into()
            }
        );
        assert!(!err.is_transient());
    }

    #[test]
    fn rejection_falls_back_to_developer_message_then_body() {
        let err = RemoteError::from_status(
            StatusCode::BAD_REQUEST,
            r#"{"developer_message":"size is required"}"#,
        );
        assert!(err.to_string().contains("size is required"));

        let err = RemoteError::from_status(StatusCode::CONFLICT, " offset conflict \n");
        assert_eq!(
            err,
            RemoteError::RemoteRejected {
                status: 409,
                reason: "offset conflict".into()
            }
        );
    }
}
