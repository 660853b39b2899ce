//! Remote media host trait.
//!
//! `MediaHost` is implemented for [`vidcast_remote::Client`]. Pipelines
//! only see the trait, so they can be driven against mocks in tests.

use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use vidcast_remote::{
    Client, CreatedPicture, CreatedVideo, PictureResource, RemoteError, UploadTicket,
    VideoMetadata, VideoPatch,
};

/// Boxed future returned by every [`MediaHost`] call.
pub type HostFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, RemoteError>> + Send + 'a>>;

/// Abstract connection to the remote media host.
pub trait MediaHost: Send + Sync {
    /// Creates a video resource for chunked transfer of `size` bytes.
    fn create_video<'a>(
        &'a self,
        title: &'a str,
        description: &'a str,
        size: u64,
    ) -> HostFuture<'a, CreatedVideo>;

    /// Creates a video resource for a direct third-party upload.
    fn issue_upload_ticket<'a>(
        &'a self,
        title: &'a str,
        description: &'a str,
    ) -> HostFuture<'a, UploadTicket>;

    /// Sends one chunk; resolves to the offset the remote now holds.
    fn send_chunk<'a>(&'a self, locator: &'a str, offset: u64, data: Bytes) -> HostFuture<'a, u64>;

    /// Asks the remote how many bytes it holds.
    fn query_offset<'a>(&'a self, locator: &'a str) -> HostFuture<'a, u64>;

    fn get_video<'a>(&'a self, video_id: &'a str) -> HostFuture<'a, VideoMetadata>;

    fn update_video<'a>(
        &'a self,
        video_id: &'a str,
        patch: &'a VideoPatch,
    ) -> HostFuture<'a, VideoMetadata>;

    fn delete_video<'a>(&'a self, video_id: &'a str) -> HostFuture<'a, ()>;

    fn create_picture<'a>(&'a self, video_id: &'a str) -> HostFuture<'a, CreatedPicture>;

    fn upload_picture<'a>(
        &'a self,
        locator: &'a str,
        data: Bytes,
        content_type: &'a str,
    ) -> HostFuture<'a, ()>;

    fn activate_picture<'a>(&'a self, picture_uri: &'a str) -> HostFuture<'a, ()>;

    fn get_picture<'a>(&'a self, picture_uri: &'a str) -> HostFuture<'a, PictureResource>;
}

impl MediaHost for Client {
    fn create_video<'a>(
        &'a self,
        title: &'a str,
        description: &'a str,
        size: u64,
    ) -> HostFuture<'a, CreatedVideo> {
        Box::pin(Client::create_video(self, title, description, size))
    }

    fn issue_upload_ticket<'a>(
        &'a self,
        title: &'a str,
        description: &'a str,
    ) -> HostFuture<'a, UploadTicket> {
        Box::pin(Client::issue_upload_ticket(self, title, description))
    }

    fn send_chunk<'a>(&'a self, locator: &'a str, offset: u64, data: Bytes) -> HostFuture<'a, u64> {
        Box::pin(Client::send_chunk(self, locator, offset, data))
    }

    fn query_offset<'a>(&'a self, locator: &'a str) -> HostFuture<'a, u64> {
        Box::pin(Client::query_offset(self, locator))
    }

    fn get_video<'a>(&'a self, video_id: &'a str) -> HostFuture<'a, VideoMetadata> {
        Box::pin(Client::get_video(self, video_id))
    }

    fn update_video<'a>(
        &'a self,
        video_id: &'a str,
        patch: &'a VideoPatch,
    ) -> HostFuture<'a, VideoMetadata> {
        Box::pin(Client::update_video(self, video_id, patch))
    }

    fn delete_video<'a>(&'a self, video_id: &'a str) -> HostFuture<'a, ()> {
        Box::pin(Client::delete_video(self, video_id))
    }

    fn create_picture<'a>(&'a self, video_id: &'a str) -> HostFuture<'a, CreatedPicture> {
        Box::pin(Client::create_picture(self, video_id))
    }

    fn upload_picture<'a>(
        &'a self,
        locator: &'a str,
        data: Bytes,
        content_type: &'a str,
    ) -> HostFuture<'a, ()> {
        Box::pin(Client::upload_picture(self, locator, data, content_type))
    }

    fn activate_picture<'a>(&'a self, picture_uri: &'a str) -> HostFuture<'a, ()> {
        Box::pin(Client::activate_picture(self, picture_uri))
    }

    fn get_picture<'a>(&'a self, picture_uri: &'a str) -> HostFuture<'a, PictureResource> {
        Box::pin(Client::get_picture(self, picture_uri))
    }
}
