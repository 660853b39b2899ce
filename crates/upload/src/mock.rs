//! Scriptable in-memory `MediaHost` shared by the pipeline tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use bytes::Bytes;
use vidcast_remote::{
    CreatedPicture, CreatedVideo, PictureResource, PictureSize, RemoteError, UploadTicket,
    VideoMetadata, VideoPatch,
};

use crate::host::{HostFuture, MediaHost};

pub const VIDEO_ID: &str = "42";
pub const TRANSFER_LOCATOR: &str = "https://upload.test/42";
pub const PICTURE_URI: &str = "/videos/42/pictures/7";
pub const PICTURE_LOCATOR: &str = "https://i.test/upload/7";

/// Scripted outcome of one chunk attempt at a given offset.
pub enum ChunkFailure {
    /// The remote never sees the bytes.
    Fail(RemoteError),
    /// The remote stores the bytes but the response is lost.
    StoreThenFail(RemoteError),
}

#[derive(Default)]
struct State {
    calls: Vec<String>,
    sent: Vec<(u64, u64)>,
    received: Vec<u8>,
    server_offset: u64,
    chunk_failures: HashMap<u64, VecDeque<ChunkFailure>>,
    confirm_override: Option<u64>,
    stall_offset_query: bool,
    create_error: Option<RemoteError>,
    videos: VecDeque<Result<VideoMetadata, RemoteError>>,
    delete_error: Option<RemoteError>,
    picture_create_error: Option<RemoteError>,
    picture_upload_error: Option<RemoteError>,
    picture_content_type: Option<String>,
    picture_fetch: Option<Result<PictureResource, RemoteError>>,
}

pub struct MockHost {
    state: Mutex<State>,
}

impl MockHost {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
        }
    }

    fn record(&self, call: &str) {
        self.state.lock().unwrap().calls.push(call.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count_calls(&self, name: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|c| *c == name)
            .count()
    }

    /// Every chunk attempt as `(offset, len)`, failed ones included.
    pub fn sent_chunks(&self) -> Vec<(u64, u64)> {
        self.state.lock().unwrap().sent.clone()
    }

    /// Bytes the remote has stored, in order.
    pub fn received_bytes(&self) -> Vec<u8> {
        self.state.lock().unwrap().received.clone()
    }

    pub fn fail_chunk_at(&self, offset: u64, failure: ChunkFailure) {
        self.state
            .lock()
            .unwrap()
            .chunk_failures
            .entry(offset)
            .or_default()
            .push_back(failure);
    }

    /// Makes every successful chunk report this offset instead of the real one.
    pub fn set_confirm_override(&self, offset: Option<u64>) {
        self.state.lock().unwrap().confirm_override = offset;
    }

    /// Makes `query_offset` never answer.
    pub fn stall_offset_query(&self) {
        self.state.lock().unwrap().stall_offset_query = true;
    }

    pub fn fail_create(&self, err: RemoteError) {
        self.state.lock().unwrap().create_error = Some(err);
    }

    /// Queues a status poll answer. The last one repeats forever.
    pub fn push_video(&self, video: Result<VideoMetadata, RemoteError>) {
        self.state.lock().unwrap().videos.push_back(video);
    }

    pub fn fail_delete(&self, err: RemoteError) {
        self.state.lock().unwrap().delete_error = Some(err);
    }

    pub fn fail_picture_create(&self, err: RemoteError) {
        self.state.lock().unwrap().picture_create_error = Some(err);
    }

    pub fn fail_picture_upload(&self, err: RemoteError) {
        self.state.lock().unwrap().picture_upload_error = Some(err);
    }

    pub fn set_picture_fetch(&self, result: Result<PictureResource, RemoteError>) {
        self.state.lock().unwrap().picture_fetch = Some(result);
    }

    pub fn picture_content_type(&self) -> Option<String> {
        self.state.lock().unwrap().picture_content_type.clone()
    }

    fn next_video(&self) -> Result<VideoMetadata, RemoteError> {
        let mut state = self.state.lock().unwrap();
        if state.videos.len() > 1 {
            state.videos.pop_front().unwrap()
        } else {
            state
                .videos
                .front()
                .cloned()
                .unwrap_or_else(|| Err(RemoteError::Unavailable("no video scripted".into())))
        }
    }
}

/// Metadata of a processed, playable video.
pub fn ready_video() -> VideoMetadata {
    VideoMetadata {
        uri: format!("/videos/{VIDEO_ID}"),
        name: "Title".into(),
        link: format!("https://vimeo.com/{VIDEO_ID}"),
        player_embed_url: format!("https://player.vimeo.com/video/{VIDEO_ID}?h=abc123"),
        duration: 12,
        status: "available".into(),
        ..Default::default()
    }
}

/// Metadata of a video still being transcoded.
pub fn processing_video() -> VideoMetadata {
    VideoMetadata {
        status: "transcoding".into(),
        player_embed_url: String::new(),
        ..ready_video()
    }
}

pub fn size(width: u32, height: u32) -> PictureSize {
    PictureSize {
        width,
        height,
        link: format!("https://i.test/7_{width}x{height}.jpg"),
    }
}

impl MediaHost for MockHost {
    fn create_video<'a>(
        &'a self,
        _title: &'a str,
        _description: &'a str,
        _size: u64,
    ) -> HostFuture<'a, CreatedVideo> {
        Box::pin(async move {
            self.record("create_video");
            let mut state = self.state.lock().unwrap();
            if let Some(err) = state.create_error.clone() {
                return Err(err);
            }
            // Each created video starts a fresh transfer.
            state.server_offset = 0;
            state.received.clear();
            Ok(CreatedVideo {
                remote_video_id: VIDEO_ID.into(),
                transfer_locator: TRANSFER_LOCATOR.into(),
            })
        })
    }

    fn issue_upload_ticket<'a>(
        &'a self,
        _title: &'a str,
        _description: &'a str,
    ) -> HostFuture<'a, UploadTicket> {
        Box::pin(async move {
            self.record("issue_upload_ticket");
            Ok(UploadTicket {
                remote_video_id: VIDEO_ID.into(),
                upload_locator: "https://upload.test/direct/42".into(),
                completion_locator: format!("/videos/{VIDEO_ID}"),
                max_payload_bytes: 1024,
                ticket_id: "t-42".into(),
            })
        })
    }

    fn send_chunk<'a>(&'a self, _locator: &'a str, offset: u64, data: Bytes) -> HostFuture<'a, u64> {
        Box::pin(async move {
            self.record("send_chunk");
            let mut state = self.state.lock().unwrap();
            let len = data.len() as u64;
            state.sent.push((offset, len));

            let failure = state
                .chunk_failures
                .get_mut(&offset)
                .and_then(VecDeque::pop_front);
            let lost_response = match failure {
                Some(ChunkFailure::Fail(err)) => return Err(err),
                Some(ChunkFailure::StoreThenFail(err)) => Some(err),
                None => None,
            };
            if offset != state.server_offset {
                return Err(RemoteError::RemoteRejected {
                    status: 409,
                    reason: "offset conflict".into(),
                });
            }
            state.received.extend_from_slice(&data);
            state.server_offset = offset + len;
            if let Some(err) = lost_response {
                return Err(err);
            }
            Ok(state.confirm_override.unwrap_or(state.server_offset))
        })
    }

    fn query_offset<'a>(&'a self, _locator: &'a str) -> HostFuture<'a, u64> {
        Box::pin(async move {
            self.record("query_offset");
            let (stalled, offset) = {
                let state = self.state.lock().unwrap();
                (state.stall_offset_query, state.server_offset)
            };
            if stalled {
                std::future::pending::<()>().await;
            }
            Ok(offset)
        })
    }

    fn get_video<'a>(&'a self, _video_id: &'a str) -> HostFuture<'a, VideoMetadata> {
        Box::pin(async move {
            self.record("get_video");
            self.next_video()
        })
    }

    fn update_video<'a>(
        &'a self,
        _video_id: &'a str,
        patch: &'a VideoPatch,
    ) -> HostFuture<'a, VideoMetadata> {
        Box::pin(async move {
            self.record("update_video");
            let mut video = ready_video();
            if let Some(name) = &patch.name {
                video.name = name.clone();
            }
            video.description = patch.description.clone();
            Ok(video)
        })
    }

    fn delete_video<'a>(&'a self, _video_id: &'a str) -> HostFuture<'a, ()> {
        Box::pin(async move {
            self.record("delete_video");
            match self.state.lock().unwrap().delete_error.clone() {
                Some(err) => Err(err),
                None => Ok(()),
            }
        })
    }

    fn create_picture<'a>(&'a self, _video_id: &'a str) -> HostFuture<'a, CreatedPicture> {
        Box::pin(async move {
            self.record("create_picture");
            if let Some(err) = self.state.lock().unwrap().picture_create_error.clone() {
                return Err(err);
            }
            Ok(CreatedPicture {
                picture_uri: PICTURE_URI.into(),
                upload_locator: PICTURE_LOCATOR.into(),
                sizes: vec![size(100, 75)],
            })
        })
    }

    fn upload_picture<'a>(
        &'a self,
        _locator: &'a str,
        _data: Bytes,
        content_type: &'a str,
    ) -> HostFuture<'a, ()> {
        Box::pin(async move {
            self.record("upload_picture");
            let mut state = self.state.lock().unwrap();
            state.picture_content_type = Some(content_type.to_string());
            match state.picture_upload_error.clone() {
                Some(err) => Err(err),
                None => Ok(()),
            }
        })
    }

    fn activate_picture<'a>(&'a self, _picture_uri: &'a str) -> HostFuture<'a, ()> {
        Box::pin(async move {
            self.record("activate_picture");
            Ok(())
        })
    }

    fn get_picture<'a>(&'a self, _picture_uri: &'a str) -> HostFuture<'a, PictureResource> {
        Box::pin(async move {
            self.record("get_picture");
            self.state
                .lock()
                .unwrap()
                .picture_fetch
                .clone()
                .unwrap_or_else(|| {
                    Ok(PictureResource {
                        uri: PICTURE_URI.into(),
                        link: None,
                        active: true,
                        sizes: vec![size(100, 75), size(1920, 1080), size(640, 360)],
                    })
                })
        })
    }
}
