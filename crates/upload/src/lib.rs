//! Video upload pipeline.
//!
//! This crate implements the **business logic** for getting a video onto
//! the remote media host. It talks to the remote through the [`MediaHost`]
//! trait, implemented for [`vidcast_remote::Client`], so every flow can be
//! driven against a mock in tests.
//!
//! # Pipeline
//!
//! 1. **Create**: register a video resource and obtain a transfer locator
//! 2. **Transfer**: send offset-addressed chunks with bounded retry
//! 3. **Process**: poll until the remote reports the video playable
//! 4. **Resolve**: rebuild a chrome-free playback URL from the embed URL
//!
//! Cover images follow a separate create → upload → activate lifecycle
//! in [`ThumbnailActivator`].

pub mod config;
pub mod embed;
pub mod engine;
pub mod error;
pub mod events;
pub mod host;
pub mod orchestrator;
pub mod thumbnail;
pub mod types;

#[cfg(test)]
mod mock;

pub use config::{PipelineConfig, PlayerConfig, ProcessingPolicy};
pub use embed::EmbedResolver;
pub use engine::ChunkTransferEngine;
pub use error::{EmbedError, ThumbnailError, TransferError, UploadError};
pub use events::ProgressSink;
pub use host::MediaHost;
pub use orchestrator::{UploadControl, UploadOrchestrator};
pub use thumbnail::ThumbnailActivator;
pub use types::{ThumbnailResult, UploadResult};
