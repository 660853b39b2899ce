use serde::{Deserialize, Serialize};

/// Percent band covered while the remote resource is being created.
pub const CREATING_BAND: (f64, f64) = (0.0, 5.0);

/// Percent band covered by the chunked byte transfer.
pub const UPLOADING_BAND: (f64, f64) = (5.0, 95.0);

/// Fixed percent reported while waiting for remote processing.
pub const PROCESSING_PERCENT: f64 = 95.0;

/// Percent reported once the playback URL is resolved.
pub const COMPLETE_PERCENT: f64 = 100.0;

/// Maps `done / total` linearly into `[floor, ceiling]`.
///
/// The result is clamped to the band. A zero `total` counts as fully done.
pub fn percent_for_progress(done: u64, total: u64, floor: f64, ceiling: f64) -> f64 {
    if total == 0 {
        return ceiling;
    }
    let fraction = (done as f64 / total as f64).clamp(0.0, 1.0);
    floor + fraction * (ceiling - floor)
}

/// Pipeline stage carried by each progress event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressStage {
    Creating,
    Uploading,
    Processing,
    Complete,
    Error,
}

/// Caller-facing progress event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadProgress {
    pub stage: ProgressStage,
    pub percent: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes_transferred: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_bytes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
    #[serde(
        default,
        rename = "playbackURL",
        skip_serializing_if = "Option::is_none"
    )]
    pub playback_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadProgress {
    /// A bare event for `stage` at `percent`.
    pub fn stage(stage: ProgressStage, percent: f64) -> Self {
        Self {
            stage,
            percent,
            bytes_transferred: None,
            total_bytes: None,
            video_id: None,
            playback_url: None,
            error: None,
        }
    }

    /// An `uploading` event placed in [`UPLOADING_BAND`].
    pub fn uploading(bytes_transferred: u64, total_bytes: u64) -> Self {
        let (floor, ceiling) = UPLOADING_BAND;
        Self {
            bytes_transferred: Some(bytes_transferred),
            total_bytes: Some(total_bytes),
            ..Self::stage(
                ProgressStage::Uploading,
                percent_for_progress(bytes_transferred, total_bytes, floor, ceiling),
            )
        }
    }

    /// The terminal `complete` event.
    pub fn complete(video_id: &str, playback_url: &str) -> Self {
        Self {
            video_id: Some(video_id.to_string()),
            playback_url: Some(playback_url.to_string()),
            ..Self::stage(ProgressStage::Complete, COMPLETE_PERCENT)
        }
    }

    /// The terminal `error` event, reported at the last percent reached.
    pub fn failed(percent: f64, error: &str) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::stage(ProgressStage::Error, percent)
        }
    }
}
