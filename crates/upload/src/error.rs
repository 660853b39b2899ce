//! Pipeline error types.

use std::time::Duration;

use vidcast_remote::RemoteError;
use vidcast_transfer::StateError;

/// Failure of the chunked byte transfer.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransferError {
    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),

    #[error("offset mismatch: expected {expected}, remote holds {actual}")]
    OffsetMismatch { expected: u64, actual: u64 },

    #[error("cancelled")]
    Cancelled,

    #[error("state error: {0}")]
    State(#[from] StateError),
}

/// Failure to turn a raw embed URL into a playback URL.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmbedError {
    #[error("invalid embed URL: {0}")]
    InvalidUrl(String),

    #[error("embed URL has no video id")]
    MissingVideoId,

    #[error("embed URL has no privacy hash")]
    MissingHash,
}

/// Errors produced by the upload pipeline.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),

    #[error("transfer error: {0}")]
    Transfer(#[from] TransferError),

    #[error("remote processing failed: {0}")]
    ProcessingFailed(String),

    #[error("video not ready after {}s", waited.as_secs())]
    ProcessingTimeout { waited: Duration },

    #[error("embed error: {0}")]
    Embed(#[from] EmbedError),

    #[error("state error: {0}")]
    State(#[from] StateError),

    #[error("cancelled")]
    Cancelled,

    /// The job failed after the remote resource was created.
    #[error("upload of video {video_id} failed ({}): {source}", cleanup_state(.cleaned_up))]
    Incomplete {
        video_id: String,
        cleaned_up: bool,
        #[source]
        source: Box<UploadError>,
    },
}

fn cleanup_state(cleaned_up: &bool) -> &'static str {
    if *cleaned_up {
        "remote video deleted"
    } else {
        "remote video left behind"
    }
}

impl UploadError {
    /// Returns `true` if the failure came from cancellation, however wrapped.
    pub fn is_cancelled(&self) -> bool {
        match self {
            Self::Cancelled | Self::Transfer(TransferError::Cancelled) => true,
            Self::Incomplete { source, .. } => source.is_cancelled(),
            _ => false,
        }
    }

    /// Remote id of a partially created video, if any.
    pub fn orphaned_video(&self) -> Option<&str> {
        match self {
            Self::Incomplete {
                video_id,
                cleaned_up: false,
                ..
            } => Some(video_id),
            _ => None,
        }
    }
}

/// Errors produced while attaching a cover image.
#[derive(Debug, thiserror::Error)]
pub enum ThumbnailError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),

    #[error("state error: {0}")]
    State(#[from] StateError),

    #[error("picture has no renditions")]
    NoRenditions,
}
