//! Typed client for the remote media-hosting API.
//!
//! Async HTTP client using `reqwest` with bearer token authentication.
//! Covers video resource creation (offset-addressed `tus` and direct
//! `post` approaches), chunk transfer, metadata, and the picture
//! resource lifecycle.

pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use client::Client;
pub use config::RemoteConfig;
pub use error::RemoteError;
pub use types::{
    CreatedPicture, CreatedVideo, PictureResource, PictureSize, UploadTicket, VideoMetadata,
    VideoPatch,
};
