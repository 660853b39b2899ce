//! Cover image activation.
//!
//! A picture goes through create → upload → activate. Activation is only
//! attempted after the bytes are uploaded; the state check happens before
//! any remote call.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, error, info, warn};
use vidcast_remote::types::id_from_uri;
use vidcast_transfer::{PictureJob, PictureSize, PictureState, StateError};

use crate::error::ThumbnailError;
use crate::host::MediaHost;
use crate::types::ThumbnailResult;

/// Content type sent with every cover image.
pub const JPEG_CONTENT_TYPE: &str = "image/jpeg";

/// Attaches cover images to existing remote videos.
pub struct ThumbnailActivator {
    host: Arc<dyn MediaHost>,
}

impl ThumbnailActivator {
    pub fn new(host: Arc<dyn MediaHost>) -> Self {
        Self { host }
    }

    /// Uploads `image` and makes it the active cover of `video_id`.
    ///
    /// Returns the link of the largest rendition.
    pub async fn upload_thumbnail(
        &self,
        video_id: &str,
        image: Bytes,
    ) -> Result<ThumbnailResult, ThumbnailError> {
        if image.is_empty() {
            return Err(ThumbnailError::InvalidInput("image is empty".into()));
        }

        let mut job = self.create(video_id).await?;
        match self.finish(&mut job, image).await {
            Ok(result) => {
                info!(video_id, picture = %result.picture_resource_id, "cover image active");
                Ok(result)
            }
            Err(e) => {
                if let Err(state) = job.fail(e.to_string()) {
                    debug!(error = %state, "picture job already terminal");
                }
                error!(video_id, error = %e, state = job.state().name(), "cover image failed");
                Err(e)
            }
        }
    }

    async fn finish(
        &self,
        job: &mut PictureJob,
        image: Bytes,
    ) -> Result<ThumbnailResult, ThumbnailError> {
        self.upload(job, image).await?;
        self.activate(job).await?;
        let thumbnail_url = self.refresh(job).await?;
        let picture_uri = job
            .picture_uri()
            .ok_or(StateError::MissingRemote("picture uri"))?;
        Ok(ThumbnailResult {
            thumbnail_url,
            picture_resource_id: id_from_uri(picture_uri).to_string(),
            picture_uri: picture_uri.to_string(),
        })
    }

    /// Creates a picture resource on `video_id`.
    pub async fn create(&self, video_id: &str) -> Result<PictureJob, ThumbnailError> {
        if video_id.trim().is_empty() {
            return Err(ThumbnailError::InvalidInput("video id is required".into()));
        }
        let mut job = PictureJob::new(video_id);
        let created = self.host.create_picture(video_id).await?;
        debug!(video_id, picture = %created.picture_uri, "picture resource created");
        job.picture_created(
            created.picture_uri,
            created.upload_locator,
            created.sizes.into_iter().map(to_size).collect(),
        )?;
        Ok(job)
    }

    /// Sends the image bytes to the picture's upload locator.
    pub async fn upload(&self, job: &mut PictureJob, image: Bytes) -> Result<(), ThumbnailError> {
        if image.is_empty() {
            return Err(ThumbnailError::InvalidInput("image is empty".into()));
        }
        require_state(job, &PictureState::PictureCreated, "uploaded")?;
        let locator = job
            .upload_locator()
            .ok_or(StateError::MissingRemote("picture upload locator"))?;

        let len = image.len();
        self.host
            .upload_picture(locator, image, JPEG_CONTENT_TYPE)
            .await?;
        debug!(video_id = job.video_id(), bytes = len, "picture uploaded");
        job.mark_uploaded()?;
        Ok(())
    }

    /// Marks the uploaded picture as the active cover.
    pub async fn activate(&self, job: &mut PictureJob) -> Result<(), ThumbnailError> {
        require_state(job, &PictureState::Uploaded, "active")?;
        let uri = job
            .picture_uri()
            .ok_or(StateError::MissingRemote("picture uri"))?;
        self.host.activate_picture(uri).await?;
        job.mark_active()?;
        Ok(())
    }

    /// Re-fetches the picture and returns the largest rendition's link.
    ///
    /// Falls back to the sizes known from creation when the fetch fails or
    /// lists nothing.
    pub async fn refresh(&self, job: &mut PictureJob) -> Result<String, ThumbnailError> {
        if let Some(uri) = job.picture_uri().map(str::to_string) {
            match self.host.get_picture(&uri).await {
                Ok(picture) if !picture.sizes.is_empty() => {
                    job.update_sizes(picture.sizes.into_iter().map(to_size).collect());
                }
                Ok(_) => warn!(picture = %uri, "picture lists no sizes, using creation sizes"),
                Err(e) => {
                    warn!(picture = %uri, error = %e, "picture re-fetch failed, using creation sizes");
                }
            }
        }

        job.largest_size()
            .map(|s| s.link.clone())
            .ok_or(ThumbnailError::NoRenditions)
    }
}

fn require_state(
    job: &PictureJob,
    required: &PictureState,
    to: &'static str,
) -> Result<(), StateError> {
    if job.state() == required {
        Ok(())
    } else {
        Err(StateError::IllegalTransition {
            from: job.state().name(),
            to,
        })
    }
}

fn to_size(size: vidcast_remote::PictureSize) -> PictureSize {
    PictureSize {
        width: size.width,
        height: size.height,
        link: size.link,
    }
}
