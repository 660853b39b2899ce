//! Transfer math and job state for offset-addressed chunked uploads.
//!
//! Everything in this crate is pure: chunk planning, progress-band mapping,
//! retry backoff and the state types that the upload pipeline drives.
//! No I/O happens here.

mod chunked;
mod progress;
mod retry;
mod types;

pub use chunked::{Chunk, ChunkPlan, plan_chunks};
pub use progress::{
    COMPLETE_PERCENT, CREATING_BAND, PROCESSING_PERCENT, ProgressStage, UPLOADING_BAND,
    UploadProgress, percent_for_progress,
};
pub use retry::RetryPolicy;
pub use types::{JobState, PictureJob, PictureSize, PictureState, UploadJob};

/// Default chunk size: 1 MiB.
pub const DEFAULT_CHUNK_SIZE: u64 = 1024 * 1024;

/// Errors produced by illegal job state transitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("illegal transition from {from} to {to}")]
    IllegalTransition {
        from: &'static str,
        to: &'static str,
    },

    #[error("cannot start transfer: {0} not assigned")]
    MissingRemote(&'static str),

    #[error("cannot mark ready without a playback URL")]
    MissingPlaybackUrl,

    #[error("progress must not go backwards ({current} -> {requested})")]
    Regression { current: u64, requested: u64 },

    #[error("progress {requested} exceeds payload size {total}")]
    Overrun { requested: u64, total: u64 },

    #[error("transfer incomplete: {transferred} of {total} bytes")]
    Incomplete { transferred: u64, total: u64 },
}
