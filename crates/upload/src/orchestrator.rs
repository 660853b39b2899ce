//! Video upload orchestrator.
//!
//! Drives one job through create, transfer, processing wait and playback
//! URL resolution. Each call gets its own [`UploadControl`]: progress goes
//! to that job's channel and only that job's token aborts it.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use vidcast_remote::{UploadTicket, VideoMetadata, VideoPatch};
use vidcast_transfer::{
    CREATING_BAND, PROCESSING_PERCENT, ProgressStage, UploadJob, UploadProgress, plan_chunks,
};

use crate::config::PipelineConfig;
use crate::embed::EmbedResolver;
use crate::engine::ChunkTransferEngine;
use crate::error::UploadError;
use crate::events::ProgressSink;
use crate::host::MediaHost;
use crate::types::UploadResult;

/// Progress channel and cancellation for a single upload.
#[derive(Debug, Clone)]
pub struct UploadControl {
    events: Option<mpsc::Sender<UploadProgress>>,
    cancel: CancellationToken,
}

impl UploadControl {
    /// A control without progress events.
    pub fn new() -> Self {
        Self {
            events: None,
            cancel: CancellationToken::new(),
        }
    }

    /// A control whose events go to the returned receiver.
    pub fn with_events(buffer: usize) -> (Self, mpsc::Receiver<UploadProgress>) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        let control = Self {
            events: Some(tx),
            cancel: CancellationToken::new(),
        };
        (control, rx)
    }

    /// Token that aborts this upload when cancelled.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    fn sink(&self) -> ProgressSink {
        match &self.events {
            Some(tx) => ProgressSink::new(tx.clone()),
            None => ProgressSink::disabled(),
        }
    }
}

impl Default for UploadControl {
    fn default() -> Self {
        Self::new()
    }
}

/// Orchestrates video uploads against one remote host.
///
/// Holds no per-job state, so uploads may run concurrently on one instance.
pub struct UploadOrchestrator {
    host: Arc<dyn MediaHost>,
    config: PipelineConfig,
    resolver: EmbedResolver,
}

impl UploadOrchestrator {
    pub fn new(host: Arc<dyn MediaHost>, config: PipelineConfig) -> Self {
        Self {
            host,
            resolver: EmbedResolver::from_config(&config.player),
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Uploads `payload` as a new video and waits until it is playable.
    ///
    /// Progress bands: creating 0..5, uploading 5..95, processing 95,
    /// complete 100. If the job fails after the remote video exists, the
    /// video is deleted (when cleanup is enabled) and the error is wrapped
    /// in [`UploadError::Incomplete`].
    pub async fn upload_video(
        &self,
        payload: Bytes,
        title: &str,
        description: &str,
        control: &UploadControl,
    ) -> Result<UploadResult, UploadError> {
        if payload.is_empty() {
            return Err(UploadError::InvalidInput("payload is empty".into()));
        }
        if title.trim().is_empty() {
            return Err(UploadError::InvalidInput("title is required".into()));
        }

        let mut job = UploadJob::new(payload);
        self.drive(&mut job, title, description, control).await
    }

    /// Runs `job` to `Ready`, or to `Failed` with cleanup.
    async fn drive(
        &self,
        job: &mut UploadJob,
        title: &str,
        description: &str,
        control: &UploadControl,
    ) -> Result<UploadResult, UploadError> {
        let progress = control.sink();
        info!(job_id = %job.id(), bytes = job.total_bytes(), "upload started");

        match self
            .run(job, title, description, &progress, &control.cancel)
            .await
        {
            Ok(result) => {
                info!(
                    job_id = %job.id(),
                    video_id = %result.video_id,
                    duration = result.duration_seconds,
                    "upload completed"
                );
                Ok(result)
            }
            Err(e) => Err(self.handle_failure(job, e, &progress).await),
        }
    }

    async fn run(
        &self,
        job: &mut UploadJob,
        title: &str,
        description: &str,
        progress: &ProgressSink,
        cancel: &CancellationToken,
    ) -> Result<UploadResult, UploadError> {
        // 1. Create remote resource
        progress.emit(UploadProgress::stage(ProgressStage::Creating, CREATING_BAND.0));
        if cancel.is_cancelled() {
            return Err(UploadError::Cancelled);
        }
        let created = self
            .host
            .create_video(title, description, job.total_bytes())
            .await?;
        let video_id = created.remote_video_id.clone();
        job.resource_created(created.remote_video_id, created.transfer_locator)?;
        debug!(job_id = %job.id(), video_id = %video_id, "remote resource created");
        progress.emit(UploadProgress::stage(ProgressStage::Creating, CREATING_BAND.1));

        // 2. Transfer chunks
        job.start_transfer()?;
        let plan = plan_chunks(job.total_bytes(), self.config.chunk_size);
        ChunkTransferEngine::new(self.host.as_ref(), &self.config)
            .transfer(job, &plan, progress, cancel)
            .await?;
        job.finish_transfer()?;

        // 3. Wait for processing
        job.start_processing()?;
        progress.emit(UploadProgress {
            video_id: Some(video_id.clone()),
            ..UploadProgress::stage(ProgressStage::Processing, PROCESSING_PERCENT)
        });
        let meta = self.wait_until_ready(&video_id, cancel).await?;

        // 4. Resolve playback URL
        let playback_url = self.resolver.resolve(&meta.player_embed_url)?;
        job.mark_ready(playback_url.clone())?;
        progress.emit(UploadProgress::complete(&video_id, &playback_url));

        Ok(UploadResult {
            video_id,
            playback_url,
            canonical_link: meta.link,
            duration_seconds: meta.duration,
        })
    }

    /// Polls the video until the remote reports it playable.
    async fn wait_until_ready(
        &self,
        video_id: &str,
        cancel: &CancellationToken,
    ) -> Result<VideoMetadata, UploadError> {
        let policy = &self.config.processing;
        let started = Instant::now();
        let deadline = started + policy.max_wait;

        sleep(policy.initial_delay, cancel).await?;
        loop {
            match self.host.get_video(video_id).await {
                Ok(meta) if meta.is_ready() => return Ok(meta),
                Ok(meta) if meta.is_failed() => {
                    let reason = meta
                        .transcode
                        .map(|t| t.status)
                        .filter(|s| !s.is_empty())
                        .map_or(meta.status, |s| format!("transcode {s}"));
                    return Err(UploadError::ProcessingFailed(reason));
                }
                Ok(meta) => debug!(video_id, status = %meta.status, "still processing"),
                Err(e) if e.is_transient() => {
                    warn!(video_id, error = %e, "status poll failed, will retry");
                }
                Err(e) => return Err(e.into()),
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(UploadError::ProcessingTimeout {
                    waited: now.duration_since(started),
                });
            }
            sleep(policy.poll_interval.min(deadline - now), cancel).await?;
        }
    }

    /// Fails the job, cleans up any remote video and reports the failure.
    async fn handle_failure(
        &self,
        job: &mut UploadJob,
        err: UploadError,
        progress: &ProgressSink,
    ) -> UploadError {
        let reason = err.to_string();
        if let Err(e) = job.fail(reason.as_str()) {
            debug!(job_id = %job.id(), error = %e, "job already terminal");
        }
        progress.emit(UploadProgress {
            video_id: job.remote_video_id().map(str::to_string),
            ..UploadProgress::failed(progress.last_percent(), &reason)
        });
        error!(
            job_id = %job.id(),
            bytes_transferred = job.bytes_transferred(),
            error = %reason,
            "upload failed"
        );

        let Some(video_id) = job.remote_video_id().map(str::to_string) else {
            return err;
        };

        let cleaned_up = if self.config.cleanup_on_failure {
            match self.host.delete_video(&video_id).await {
                Ok(()) => {
                    info!(video_id = %video_id, "deleted incomplete remote video");
                    true
                }
                Err(e) => {
                    warn!(video_id = %video_id, error = %e, "failed to delete incomplete remote video");
                    false
                }
            }
        } else {
            false
        };

        UploadError::Incomplete {
            video_id,
            cleaned_up,
            source: Box::new(err),
        }
    }

    // -----------------------------------------------------------------------
    // Proxies
    // -----------------------------------------------------------------------

    /// Creates a video whose bytes a third party sends directly.
    pub async fn issue_upload_ticket(
        &self,
        title: &str,
        description: &str,
    ) -> Result<UploadTicket, UploadError> {
        if title.trim().is_empty() {
            return Err(UploadError::InvalidInput("title is required".into()));
        }
        let ticket = self.host.issue_upload_ticket(title, description).await?;
        info!(video_id = %ticket.remote_video_id, "upload ticket issued");
        Ok(ticket)
    }

    pub async fn get_video(&self, video_id: &str) -> Result<VideoMetadata, UploadError> {
        require_id(video_id)?;
        Ok(self.host.get_video(video_id).await?)
    }

    pub async fn update_video(
        &self,
        video_id: &str,
        patch: &VideoPatch,
    ) -> Result<VideoMetadata, UploadError> {
        require_id(video_id)?;
        if patch.is_empty() {
            return Err(UploadError::InvalidInput("nothing to update".into()));
        }
        Ok(self.host.update_video(video_id, patch).await?)
    }

    pub async fn delete_video(&self, video_id: &str) -> Result<(), UploadError> {
        require_id(video_id)?;
        self.host.delete_video(video_id).await?;
        info!(video_id, "video deleted");
        Ok(())
    }
}

async fn sleep(delay: Duration, cancel: &CancellationToken) -> Result<(), UploadError> {
    tokio::select! {
        _ = cancel.cancelled() => Err(UploadError::Cancelled),
        _ = tokio::time::sleep(delay) => Ok(()),
    }
}

fn require_id(video_id: &str) -> Result<(), UploadError> {
    if video_id.trim().is_empty() {
        Err(UploadError::InvalidInput("video id is required".into()))
    } else {
        Ok(())
    }
}
