//! Remote media-hosting API client.
//!
//! Async HTTP client using `reqwest` with bearer token authentication.
//! Chunk transfer follows the `tus` 1.0.0 protocol: every PATCH carries
//! its absolute offset and the server answers with the new offset.

use bytes::Bytes;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::RemoteConfig;
use crate::error::RemoteError;
use crate::types::{
    CreateVideoRequest, CreatedPicture, CreatedVideo, PictureResource, UploadApproach,
    UploadTicket, VideoMetadata, VideoPatch, VideoResource, id_from_uri,
};

/// Versioned media type requested from the API.
const API_ACCEPT: &str = "application/vnd.vimeo.*+json;version=3.4";

const TUS_RESUMABLE: &str = "Tus-Resumable";
const TUS_VERSION: &str = "1.0.0";
const UPLOAD_OFFSET: &str = "Upload-Offset";
const OFFSET_CONTENT_TYPE: &str = "application/offset+octet-stream";

/// Remote media-hosting API client.
///
/// Cheap to share behind an `Arc`; jobs using the same client share no
/// other state.
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    ticket_max_bytes: u64,
}

impl Client {
    /// Creates a client from explicit configuration.
    ///
    /// A missing credential is logged as a warning, not an error: the client
    /// is still built and remote calls will fail with `Unauthorized`.
    pub fn new(config: &RemoteConfig) -> Result<Self, RemoteError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(API_ACCEPT));

        if config.has_credentials() {
            let bearer = HeaderValue::from_str(&format!("Bearer {}", config.access_token.trim()))
                .map_err(|_| RemoteError::Malformed("invalid access token".into()))?;
            headers.insert(AUTHORIZATION, bearer);
        } else {
            warn!("no access token configured; remote calls will be rejected");
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            ticket_max_bytes: config.ticket_max_bytes,
        })
    }

    /// Resolves an API path (`/videos/1`) or passes through an absolute URL.
    fn endpoint(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url, path)
        }
    }

    /// Sends a request and turns non-success statuses into classified errors.
    async fn execute(&self, req: RequestBuilder) -> Result<Response, RemoteError> {
        let resp = req.send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(RemoteError::from_status(status, &body))
    }

    async fn execute_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, RemoteError> {
        let body = self.execute(req).await?.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    // -----------------------------------------------------------------------
    // Videos
    // -----------------------------------------------------------------------

    /// Creates a video resource for offset-addressed chunked transfer.
    pub async fn create_video(
        &self,
        title: &str,
        description: &str,
        size: u64,
    ) -> Result<CreatedVideo, RemoteError> {
        let body = CreateVideoRequest::new(title, description, UploadApproach::tus(size));
        let resource: VideoResource = self
            .execute_json(self.http.post(self.endpoint("/me/videos")).json(&body))
            .await?;

        let transfer_locator = resource
            .upload
            .map(|u| u.upload_link)
            .filter(|link| !link.is_empty())
            .ok_or_else(|| RemoteError::Malformed("missing upload link".into()))?;
        let remote_video_id = id_from_uri(&resource.uri).to_string();
        if remote_video_id.is_empty() {
            return Err(RemoteError::Malformed("missing video uri".into()));
        }

        debug!(video_id = %remote_video_id, size, "created video resource");
        Ok(CreatedVideo {
            remote_video_id,
            transfer_locator,
        })
    }

    /// Creates a video resource whose bytes a third party will send directly.
    pub async fn issue_upload_ticket(
        &self,
        title: &str,
        description: &str,
    ) -> Result<UploadTicket, RemoteError> {
        let body = CreateVideoRequest::new(title, description, UploadApproach::post());
        let resource: VideoResource = self
            .execute_json(self.http.post(self.endpoint("/me/videos")).json(&body))
            .await?;

        let upload = resource
            .upload
            .filter(|u| !u.upload_link.is_empty())
            .ok_or_else(|| RemoteError::Malformed("missing upload link".into()))?;
        let remote_video_id = id_from_uri(&resource.uri).to_string();
        if remote_video_id.is_empty() {
            return Err(RemoteError::Malformed("missing video uri".into()));
        }

        Ok(UploadTicket {
            completion_locator: upload.complete_uri.unwrap_or_else(|| resource.uri.clone()),
            ticket_id: upload.ticket_id.unwrap_or_else(|| remote_video_id.clone()),
            upload_locator: upload.upload_link,
            max_payload_bytes: self.ticket_max_bytes,
            remote_video_id,
        })
    }

    /// Sends one chunk at `offset`; returns the offset the server now holds.
    pub async fn send_chunk(
        &self,
        transfer_locator: &str,
        offset: u64,
        data: Bytes,
    ) -> Result<u64, RemoteError> {
        let req = self
            .http
            .patch(transfer_locator)
            .header(TUS_RESUMABLE, TUS_VERSION)
            .header(UPLOAD_OFFSET, offset.to_string())
            .header(CONTENT_TYPE, OFFSET_CONTENT_TYPE)
            .body(data);
        let resp = self.execute(req).await?;
        upload_offset(&resp)
    }

    /// Asks the server how many bytes it holds for this transfer.
    pub async fn query_offset(&self, transfer_locator: &str) -> Result<u64, RemoteError> {
        let req = self
            .http
            .head(transfer_locator)
            .header(TUS_RESUMABLE, TUS_VERSION);
        let resp = self.execute(req).await?;
        upload_offset(&resp)
    }

    /// Fetches a video's metadata.
    pub async fn get_video(&self, video_id: &str) -> Result<VideoMetadata, RemoteError> {
        self.execute_json(self.http.get(self.endpoint(&format!("/videos/{video_id}"))))
            .await
    }

    /// Applies a partial update to a video.
    pub async fn update_video(
        &self,
        video_id: &str,
        patch: &VideoPatch,
    ) -> Result<VideoMetadata, RemoteError> {
        self.execute_json(
            self.http
                .patch(self.endpoint(&format!("/videos/{video_id}")))
                .json(patch),
        )
        .await
    }

    /// Deletes a video. A video that no longer exists counts as deleted.
    pub async fn delete_video(&self, video_id: &str) -> Result<(), RemoteError> {
        let req = self.http.delete(self.endpoint(&format!("/videos/{video_id}")));
        match self.execute(req).await {
            Ok(_) => Ok(()),
            Err(RemoteError::RemoteRejected { status: 404, .. }) => {
                debug!(video_id, "video already gone");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    // -----------------------------------------------------------------------
    // Pictures
    // -----------------------------------------------------------------------

    /// Creates a picture resource on a video.
    pub async fn create_picture(&self, video_id: &str) -> Result<CreatedPicture, RemoteError> {
        let resource: PictureResource = self
            .execute_json(
                self.http
                    .post(self.endpoint(&format!("/videos/{video_id}/pictures"))),
            )
            .await?;

        let upload_locator = resource
            .link
            .filter(|link| !link.is_empty())
            .ok_or_else(|| RemoteError::Malformed("missing picture upload link".into()))?;

        Ok(CreatedPicture {
            picture_uri: resource.uri,
            upload_locator,
            sizes: resource.sizes,
        })
    }

    /// Sends the whole image to its one-shot upload locator.
    pub async fn upload_picture(
        &self,
        upload_locator: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<(), RemoteError> {
        let req = self
            .http
            .put(upload_locator)
            .header(CONTENT_TYPE, content_type)
            .body(data);
        self.execute(req).await?;
        Ok(())
    }

    /// Marks a picture as the video's active cover image.
    pub async fn activate_picture(&self, picture_uri: &str) -> Result<(), RemoteError> {
        let req = self
            .http
            .patch(self.endpoint(picture_uri))
            .json(&serde_json::json!({ "active": true }));
        self.execute(req).await?;
        Ok(())
    }

    /// Fetches a picture resource.
    pub async fn get_picture(&self, picture_uri: &str) -> Result<PictureResource, RemoteError> {
        self.execute_json(self.http.get(self.endpoint(picture_uri)))
            .await
    }
}

/// Reads the `Upload-Offset` response header.
fn upload_offset(resp: &Response) -> Result<u64, RemoteError> {
    resp.headers()
        .get(UPLOAD_OFFSET)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .ok_or_else(|| RemoteError::Malformed("missing Upload-Offset header".into()))
}
