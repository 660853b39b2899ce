use bytes::Bytes;
use uuid::Uuid;

use crate::StateError;

/// Lifecycle of a single video upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobState {
    Created,
    ResourceCreated,
    Transferring,
    Uploaded,
    Processing,
    Ready,
    Failed(String),
}

impl JobState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::ResourceCreated => "resource_created",
            Self::Transferring => "transferring",
            Self::Uploaded => "uploaded",
            Self::Processing => "processing",
            Self::Ready => "ready",
            Self::Failed(_) => "failed",
        }
    }

    /// `Ready` and `Failed` never move again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Ready | Self::Failed(_))
    }
}

/// One in-flight video transfer. Lives only for the duration of the call.
#[derive(Debug, Clone)]
pub struct UploadJob {
    id: Uuid,
    payload: Bytes,
    remote_video_id: Option<String>,
    transfer_locator: Option<String>,
    bytes_transferred: u64,
    playback_url: Option<String>,
    state: JobState,
}

impl UploadJob {
    /// Creates a job for `payload` in the `Created` state.
    pub fn new(payload: Bytes) -> Self {
        Self {
            id: Uuid::new_v4(),
            payload,
            remote_video_id: None,
            transfer_locator: None,
            bytes_transferred: 0,
            playback_url: None,
            state: JobState::Created,
        }
    }

    /// Local identifier used to correlate log lines.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    pub fn total_bytes(&self) -> u64 {
        self.payload.len() as u64
    }

    pub fn remote_video_id(&self) -> Option<&str> {
        self.remote_video_id.as_deref()
    }

    pub fn transfer_locator(&self) -> Option<&str> {
        self.transfer_locator.as_deref()
    }

    pub fn bytes_transferred(&self) -> u64 {
        self.bytes_transferred
    }

    pub fn playback_url(&self) -> Option<&str> {
        self.playback_url.as_deref()
    }

    pub fn state(&self) -> &JobState {
        &self.state
    }

    /// Records the remote resource: `Created -> ResourceCreated`.
    pub fn resource_created(
        &mut self,
        video_id: impl Into<String>,
        transfer_locator: impl Into<String>,
    ) -> Result<(), StateError> {
        self.expect(&JobState::Created, "resource_created")?;
        self.remote_video_id = Some(video_id.into());
        self.transfer_locator = Some(transfer_locator.into());
        self.state = JobState::ResourceCreated;
        Ok(())
    }

    /// `ResourceCreated -> Transferring`; requires both remote id and locator.
    pub fn start_transfer(&mut self) -> Result<(), StateError> {
        self.expect(&JobState::ResourceCreated, "transferring")?;
        if self.remote_video_id.as_deref().is_none_or(str::is_empty) {
            return Err(StateError::MissingRemote("remote video id"));
        }
        if self.transfer_locator.as_deref().is_none_or(str::is_empty) {
            return Err(StateError::MissingRemote("transfer locator"));
        }
        self.state = JobState::Transferring;
        Ok(())
    }

    /// Records the offset confirmed by the remote after a chunk.
    pub fn record_progress(&mut self, confirmed: u64) -> Result<(), StateError> {
        self.expect(&JobState::Transferring, "transferring")?;
        if confirmed < self.bytes_transferred {
            return Err(StateError::Regression {
                current: self.bytes_transferred,
                requested: confirmed,
            });
        }
        if confirmed > self.total_bytes() {
            return Err(StateError::Overrun {
                requested: confirmed,
                total: self.total_bytes(),
            });
        }
        self.bytes_transferred = confirmed;
        Ok(())
    }

    /// `Transferring -> Uploaded`; every byte must be confirmed.
    pub fn finish_transfer(&mut self) -> Result<(), StateError> {
        self.expect(&JobState::Transferring, "uploaded")?;
        if self.bytes_transferred != self.total_bytes() {
            return Err(StateError::Incomplete {
                transferred: self.bytes_transferred,
                total: self.total_bytes(),
            });
        }
        self.state = JobState::Uploaded;
        Ok(())
    }

    /// `Uploaded -> Processing`.
    pub fn start_processing(&mut self) -> Result<(), StateError> {
        self.expect(&JobState::Uploaded, "processing")?;
        self.state = JobState::Processing;
        Ok(())
    }

    /// `Processing -> Ready`; only after the playback URL is known.
    pub fn mark_ready(&mut self, playback_url: impl Into<String>) -> Result<(), StateError> {
        self.expect(&JobState::Processing, "ready")?;
        let url = playback_url.into();
        if url.is_empty() {
            return Err(StateError::MissingPlaybackUrl);
        }
        self.playback_url = Some(url);
        self.state = JobState::Ready;
        Ok(())
    }

    /// Moves any non-terminal state to `Failed`.
    pub fn fail(&mut self, reason: impl Into<String>) -> Result<(), StateError> {
        if self.state.is_terminal() {
            return Err(StateError::IllegalTransition {
                from: self.state.name(),
                to: "failed",
            });
        }
        self.state = JobState::Failed(reason.into());
        Ok(())
    }

    fn expect(&self, required: &JobState, to: &'static str) -> Result<(), StateError> {
        if &self.state == required {
            Ok(())
        } else {
            Err(StateError::IllegalTransition {
                from: self.state.name(),
                to,
            })
        }
    }
}

/// One rendition of a picture resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PictureSize {
    pub width: u32,
    pub height: u32,
    pub link: String,
}

/// Lifecycle of a cover-image activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PictureState {
    Created,
    PictureCreated,
    Uploaded,
    Active,
    Failed(String),
}

impl PictureState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::PictureCreated => "picture_created",
            Self::Uploaded => "uploaded",
            Self::Active => "active",
            Self::Failed(_) => "failed",
        }
    }
}

/// A cover image being attached to an existing remote video.
#[derive(Debug, Clone)]
pub struct PictureJob {
    video_id: String,
    picture_uri: Option<String>,
    upload_locator: Option<String>,
    sizes: Vec<PictureSize>,
    state: PictureState,
}

impl PictureJob {
    pub fn new(video_id: impl Into<String>) -> Self {
        Self {
            video_id: video_id.into(),
            picture_uri: None,
            upload_locator: None,
            sizes: Vec::new(),
            state: PictureState::Created,
        }
    }

    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    /// Remote identifier of the picture resource.
    pub fn picture_uri(&self) -> Option<&str> {
        self.picture_uri.as_deref()
    }

    /// One-shot destination for the image bytes.
    pub fn upload_locator(&self) -> Option<&str> {
        self.upload_locator.as_deref()
    }

    pub fn sizes(&self) -> &[PictureSize] {
        &self.sizes
    }

    pub fn state(&self) -> &PictureState {
        &self.state
    }

    /// `Created -> PictureCreated`.
    pub fn picture_created(
        &mut self,
        picture_uri: impl Into<String>,
        upload_locator: impl Into<String>,
        sizes: Vec<PictureSize>,
    ) -> Result<(), StateError> {
        self.expect(&PictureState::Created, "picture_created")?;
        self.picture_uri = Some(picture_uri.into());
        self.upload_locator = Some(upload_locator.into());
        self.sizes = sizes;
        self.state = PictureState::PictureCreated;
        Ok(())
    }

    /// `PictureCreated -> Uploaded`.
    pub fn mark_uploaded(&mut self) -> Result<(), StateError> {
        self.expect(&PictureState::PictureCreated, "uploaded")?;
        self.state = PictureState::Uploaded;
        Ok(())
    }

    /// `Uploaded -> Active`. Never allowed before the bytes are uploaded.
    pub fn mark_active(&mut self) -> Result<(), StateError> {
        self.expect(&PictureState::Uploaded, "active")?;
        self.state = PictureState::Active;
        Ok(())
    }

    /// Replaces the known sizes with freshly fetched ones.
    pub fn update_sizes(&mut self, sizes: Vec<PictureSize>) {
        self.sizes = sizes;
    }

    /// Largest rendition by width, then height.
    pub fn largest_size(&self) -> Option<&PictureSize> {
        self.sizes.iter().max_by_key(|s| (s.width, s.height))
    }

    pub fn fail(&mut self, reason: impl Into<String>) -> Result<(), StateError> {
        if matches!(self.state, PictureState::Active | PictureState::Failed(_)) {
            return Err(StateError::IllegalTransition {
                from: self.state.name(),
                to: "failed",
            });
        }
        self.state = PictureState::Failed(reason.into());
        Ok(())
    }

    fn expect(&self, required: &PictureState, to: &'static str) -> Result<(), StateError> {
        if &self.state == required {
            Ok(())
        } else {
            Err(StateError::IllegalTransition {
                from: self.state.name(),
                to,
            })
        }
    }
}
