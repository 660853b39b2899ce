//! Client configuration, passed explicitly to [`Client::new`](crate::Client::new).

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.vimeo.com";

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Default ceiling advertised on upload tickets (5 GiB).
pub const DEFAULT_TICKET_MAX_BYTES: u64 = 5 * 1024 * 1024 * 1024;

/// Connection settings for one remote account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// API base URL without trailing slash.
    pub base_url: String,
    /// Bearer credential. Empty means unauthenticated (requests will be rejected).
    pub access_token: String,
    /// Per-request timeout.
    #[serde(with = "duration_secs")]
    pub request_timeout: Duration,
    /// Maximum payload advertised on direct-upload tickets.
    pub ticket_max_bytes: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            access_token: String::new(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            ticket_max_bytes: DEFAULT_TICKET_MAX_BYTES,
        }
    }
}

impl RemoteConfig {
    /// Returns `true` if a bearer credential is configured.
    pub fn has_credentials(&self) -> bool {
        !self.access_token.trim().is_empty()
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(d)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = RemoteConfig::default();
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert!(!cfg.has_credentials());
        assert_eq!(cfg.request_timeout, DEFAULT_REQUEST_TIMEOUT);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: RemoteConfig =
            serde_json::from_str(r#"{"access_token":"tok","request_timeout":5}"#).unwrap();
        assert!(cfg.has_credentials());
        assert_eq!(cfg.request_timeout, Duration::from_secs(5));
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.ticket_max_bytes, DEFAULT_TICKET_MAX_BYTES);
    }

    #[test]
    fn whitespace_token_is_not_a_credential() {
        let cfg = RemoteConfig {
            access_token: "  ".into(),
            ..Default::default()
        };
        assert!(!cfg.has_credentials());
    }
}
