//! Pipeline configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use vidcast_transfer::{DEFAULT_CHUNK_SIZE, RetryPolicy};

/// Default base of resolved playback URLs.
pub const DEFAULT_PLAYER_BASE_URL: &str = "https://player.vimeo.com/video";

/// Tunables for one upload pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Bytes per chunk (0 = [`DEFAULT_CHUNK_SIZE`]).
    pub chunk_size: u64,
    /// Pause between consecutive chunks.
    pub inter_chunk_delay: Duration,
    pub retry: RetryPolicy,
    pub processing: ProcessingPolicy,
    pub player: PlayerConfig,
    /// Delete the remote video when a job fails after creating it.
    pub cleanup_on_failure: bool,
    /// Capacity of the progress channel.
    pub event_buffer: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            inter_chunk_delay: Duration::from_millis(100),
            retry: RetryPolicy::default(),
            processing: ProcessingPolicy::default(),
            player: PlayerConfig::default(),
            cleanup_on_failure: true,
            event_buffer: 256,
        }
    }
}

/// Bounds on the wait for remote processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingPolicy {
    /// Wait before the first status poll.
    pub initial_delay: Duration,
    pub poll_interval: Duration,
    /// Total wait before giving up.
    pub max_wait: Duration,
}

impl Default for ProcessingPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(2),
            poll_interval: Duration::from_secs(5),
            max_wait: Duration::from_secs(600),
        }
    }
}

/// Where resolved playback URLs point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub base_url: String,
    /// Application id appended to every playback URL.
    pub app_id: String,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_PLAYER_BASE_URL.to_string(),
            app_id: String::new(),
        }
    }
}
