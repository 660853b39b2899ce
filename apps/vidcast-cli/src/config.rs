//! CLI configuration.
//!
//! Read from `~/.config/vidcast/config.json` (or `--config`), then
//! overridden by `VIDCAST_ACCESS_TOKEN` and `VIDCAST_APP_ID`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use vidcast_remote::RemoteConfig;
use vidcast_upload::{PipelineConfig, PlayerConfig};

pub const ACCESS_TOKEN_ENV: &str = "VIDCAST_ACCESS_TOKEN";
pub const APP_ID_ENV: &str = "VIDCAST_APP_ID";

/// On-disk layout. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct ConfigFile {
    remote: RemoteConfig,
    player: PlayerConfig,
    upload: UploadSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct UploadSection {
    chunk_size: Option<u64>,
    inter_chunk_delay_ms: Option<u64>,
    max_retries: Option<u32>,
    poll_interval_secs: Option<u64>,
    processing_timeout_secs: Option<u64>,
    cleanup_on_failure: Option<bool>,
}

/// Resolved configuration for one CLI run.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub remote: RemoteConfig,
    pub pipeline: PipelineConfig,
}

impl CliConfig {
    /// Loads `path`, or the default location when `None`.
    ///
    /// A missing file yields defaults; an unparsable one is logged and
    /// ignored. Environment overrides are applied last.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => default_config_path(),
        };

        let mut config = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            match serde_json::from_str::<ConfigFile>(&content) {
                Ok(file) => Self::from_file(file),
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "failed to parse config, using defaults"
                    );
                    Self::default()
                }
            }
        } else {
            tracing::debug!(path = %path.display(), "no config file");
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        if !config.remote.has_credentials() {
            tracing::warn!("no access token configured; set {ACCESS_TOKEN_ENV}");
        }
        Ok(config)
    }

    fn from_file(file: ConfigFile) -> Self {
        let mut pipeline = PipelineConfig {
            player: file.player,
            ..Default::default()
        };
        let upload = file.upload;
        if let Some(size) = upload.chunk_size {
            pipeline.chunk_size = size;
        }
        if let Some(ms) = upload.inter_chunk_delay_ms {
            pipeline.inter_chunk_delay = Duration::from_millis(ms);
        }
        if let Some(retries) = upload.max_retries {
            pipeline.retry.max_retries = retries;
        }
        if let Some(secs) = upload.poll_interval_secs {
            pipeline.processing.poll_interval = Duration::from_secs(secs);
        }
        if let Some(secs) = upload.processing_timeout_secs {
            pipeline.processing.max_wait = Duration::from_secs(secs);
        }
        if let Some(cleanup) = upload.cleanup_on_failure {
            pipeline.cleanup_on_failure = cleanup;
        }

        Self {
            remote: file.remote,
            pipeline,
        }
    }

    /// Applies non-empty environment values over the file settings.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(token) = lookup(ACCESS_TOKEN_ENV).filter(|v| !v.trim().is_empty()) {
            self.remote.access_token = token;
        }
        if let Some(app_id) = lookup(APP_ID_ENV).filter(|v| !v.trim().is_empty()) {
            self.pipeline.player.app_id = app_id;
        }
    }
}

fn default_config_path() -> PathBuf {
    config_base_dir().join("vidcast").join("config.json")
}

fn config_base_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        PathBuf::from(appdata)
    }

    #[cfg(not(target_os = "windows"))]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        PathBuf::from(home).join(".config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = CliConfig::load(Some(dir.path().join("absent.json").as_path())).unwrap();
        assert_eq!(cfg.pipeline, PipelineConfig::default());
        assert_eq!(cfg.remote.base_url, RemoteConfig::default().base_url);
    }

    #[test]
    fn file_values_are_applied() {
        let file = write_config(
            r#"{
                "remote": { "access_token": "tok", "request_timeout": 30 },
                "player": { "app_id": "58479" },
                "upload": { "chunk_size": 4096, "max_retries": 5, "processing_timeout_secs": 60,
                            "cleanup_on_failure": false }
            }"#,
        );
        let cfg = CliConfig::load(Some(file.path())).unwrap();

        assert_eq!(cfg.remote.access_token, "tok");
        assert_eq!(cfg.remote.request_timeout, Duration::from_secs(30));
        assert_eq!(cfg.pipeline.player.app_id, "58479");
        assert_eq!(
            cfg.pipeline.player.base_url,
            PlayerConfig::default().base_url
        );
        assert_eq!(cfg.pipeline.chunk_size, 4096);
        assert_eq!(cfg.pipeline.retry.max_retries, 5);
        assert_eq!(cfg.pipeline.processing.max_wait, Duration::from_secs(60));
        assert!(!cfg.pipeline.cleanup_on_failure);
        assert_eq!(
            cfg.pipeline.inter_chunk_delay,
            PipelineConfig::default().inter_chunk_delay
        );
    }

    #[test]
    fn unparsable_file_falls_back_to_defaults() {
        let file = write_config("{ not json");
        let cfg = CliConfig::load(Some(file.path())).unwrap();
        assert_eq!(cfg.pipeline, PipelineConfig::default());
    }

    #[test]
    fn environment_overrides_file() {
        let mut cfg = CliConfig::from_file(
            serde_json::from_str(r#"{"remote":{"access_token":"file"},"player":{"app_id":"1"}}"#)
                .unwrap(),
        );
        cfg.apply_overrides(|key| match key {
            ACCESS_TOKEN_ENV => Some("env-token".into()),
            APP_ID_ENV => Some("  ".into()),
            _ => None,
        });
        assert_eq!(cfg.remote.access_token, "env-token");
        assert_eq!(cfg.pipeline.player.app_id, "1");
    }
}
