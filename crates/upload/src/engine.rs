//! Sequential chunk transfer with bounded retry and offset resume.

use std::time::Duration;

use bytes::Bytes;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use vidcast_transfer::{Chunk, ChunkPlan, RetryPolicy, StateError, UploadJob, UploadProgress};

use crate::config::PipelineConfig;
use crate::error::TransferError;
use crate::events::ProgressSink;
use crate::host::MediaHost;

/// Sends a job's chunks to the remote, one at a time, in offset order.
pub struct ChunkTransferEngine<'a> {
    host: &'a dyn MediaHost,
    retry: &'a RetryPolicy,
    inter_chunk_delay: Duration,
}

impl<'a> ChunkTransferEngine<'a> {
    pub fn new(host: &'a dyn MediaHost, config: &'a PipelineConfig) -> Self {
        Self {
            host,
            retry: &config.retry,
            inter_chunk_delay: config.inter_chunk_delay,
        }
    }

    /// Transfers every chunk of `plan`, recording confirmed offsets on `job`.
    ///
    /// The job must be `Transferring`. On error the job keeps the last
    /// confirmed offset; it is up to the caller to fail it.
    pub async fn transfer(
        &self,
        job: &mut UploadJob,
        plan: &ChunkPlan,
        progress: &ProgressSink,
        cancel: &CancellationToken,
    ) -> Result<(), TransferError> {
        let locator = job
            .transfer_locator()
            .ok_or(StateError::MissingRemote("transfer locator"))?
            .to_string();
        if plan.total_bytes() > job.total_bytes() {
            return Err(StateError::Overrun {
                requested: plan.total_bytes(),
                total: job.total_bytes(),
            }
            .into());
        }

        let payload = job.payload().clone();
        let total = plan.total_bytes();
        let last = plan.len().saturating_sub(1);

        for (index, chunk) in plan.iter().enumerate() {
            check_cancelled(cancel)?;

            let confirmed = self.send_with_retry(&locator, &payload, chunk, cancel).await?;
            job.record_progress(confirmed)?;
            debug!(
                job_id = %job.id(),
                chunk = index,
                offset = chunk.offset,
                len = chunk.len,
                confirmed,
                "chunk confirmed"
            );
            progress.emit(UploadProgress {
                video_id: job.remote_video_id().map(str::to_string),
                ..UploadProgress::uploading(confirmed, total)
            });

            if index < last && !self.inter_chunk_delay.is_zero() {
                pause(self.inter_chunk_delay, cancel).await?;
            }
        }

        Ok(())
    }

    /// Sends one chunk until the remote confirms its end offset.
    ///
    /// A response confirming only part of the chunk continues from the
    /// confirmed offset. A transient failure is retried after backoff,
    /// resuming from wherever the remote says it is.
    async fn send_with_retry(
        &self,
        locator: &str,
        payload: &Bytes,
        chunk: &Chunk,
        cancel: &CancellationToken,
    ) -> Result<u64, TransferError> {
        let end = chunk.end();
        let mut start = chunk.offset;
        let mut attempt = 0u32;

        loop {
            check_cancelled(cancel)?;
            let data = payload.slice(start as usize..end as usize);

            let result = tokio::select! {
                _ = cancel.cancelled() => return Err(TransferError::Cancelled),
                r = self.host.send_chunk(locator, start, data) => r,
            };

            match result {
                Ok(offset) if offset == end => return Ok(offset),
                Ok(offset) if offset > start && offset < end => {
                    debug!(offset, end, "partial chunk accepted");
                    start = offset;
                }
                Ok(offset) => {
                    return Err(TransferError::OffsetMismatch {
                        expected: end,
                        actual: offset,
                    });
                }
                Err(e) if e.is_transient() && attempt < self.retry.max_retries => {
                    attempt += 1;
                    let delay = self.retry.delay_for_attempt(attempt);
                    warn!(
                        offset = start,
                        attempt,
                        max_retries = self.retry.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "chunk failed, retrying"
                    );
                    pause(delay, cancel).await?;

                    let queried = tokio::select! {
                        _ = cancel.cancelled() => return Err(TransferError::Cancelled),
                        r = self.host.query_offset(locator) => r,
                    };
                    match queried {
                        Ok(remote) if remote == end => return Ok(end),
                        Ok(remote) if remote >= chunk.offset && remote < end => {
                            debug!(remote, "resuming from remote offset");
                            start = remote;
                        }
                        Ok(remote) => {
                            return Err(TransferError::OffsetMismatch {
                                expected: start,
                                actual: remote,
                            });
                        }
                        Err(e) => {
                            debug!(error = %e, offset = start, "offset query failed, resending");
                        }
                    }
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

fn check_cancelled(cancel: &CancellationToken) -> Result<(), TransferError> {
    if cancel.is_cancelled() {
        Err(TransferError::Cancelled)
    } else {
        Ok(())
    }
}

async fn pause(delay: Duration, cancel: &CancellationToken) -> Result<(), TransferError> {
    tokio::select! {
        _ = cancel.cancelled() => Err(TransferError::Cancelled),
        _ = tokio::time::sleep(delay) => Ok(()),
    }
}
