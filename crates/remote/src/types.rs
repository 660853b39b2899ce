//! Request and response types for the remote API.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Body of a video-creation call.
///
/// Privacy and embed chrome are fixed policy, not configurable by callers.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct CreateVideoRequest<'a> {
    pub upload: UploadApproach,
    pub name: &'a str,
    #[serde(skip_serializing_if = "is_blank")]
    pub description: &'a str,
    pub privacy: Privacy,
    pub embed: EmbedPolicy,
}

fn is_blank(s: &&str) -> bool {
    s.trim().is_empty()
}

impl<'a> CreateVideoRequest<'a> {
    pub fn new(name: &'a str, description: &'a str, upload: UploadApproach) -> Self {
        Self {
            upload,
            name,
            description,
            privacy: Privacy::default(),
            embed: EmbedPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct UploadApproach {
    pub approach: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl UploadApproach {
    /// Offset-addressed chunked transfer of a known size.
    pub fn tus(size: u64) -> Self {
        Self {
            approach: "tus",
            size: Some(size),
        }
    }

    /// Direct single-request transfer performed by a third party.
    pub fn post() -> Self {
        Self {
            approach: "post",
            size: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct Privacy {
    pub view: &'static str,
    pub embed: &'static str,
    pub download: bool,
}

impl Default for Privacy {
    fn default() -> Self {
        Self {
            view: "unlisted",
            embed: "public",
            download: false,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct EmbedPolicy {
    pub buttons: EmbedButtons,
    pub logos: EmbedLogos,
    pub title: EmbedTitle,
}

impl Default for EmbedPolicy {
    fn default() -> Self {
        Self {
            buttons: EmbedButtons {
                like: false,
                watchlater: false,
                share: false,
                embed: false,
            },
            logos: EmbedLogos { vimeo: false },
            title: EmbedTitle {
                name: "hide",
                owner: "hide",
                portrait: "hide",
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct EmbedButtons {
    pub like: bool,
    pub watchlater: bool,
    pub share: bool,
    pub embed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct EmbedLogos {
    pub vimeo: bool,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct EmbedTitle {
    pub name: &'static str,
    pub owner: &'static str,
    pub portrait: &'static str,
}

/// Partial update of a video's editable fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl VideoPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Video resource as returned by creation calls.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct VideoResource {
    pub uri: String,
    #[serde(default)]
    pub upload: Option<UploadInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct UploadInfo {
    #[serde(default)]
    pub upload_link: String,
    #[serde(default)]
    pub complete_uri: Option<String>,
    #[serde(default)]
    pub ticket_id: Option<String>,
}

/// Result of creating a video resource for chunked transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedVideo {
    pub remote_video_id: String,
    pub transfer_locator: String,
}

/// Capability letting a third party transfer bytes directly to the remote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadTicket {
    pub remote_video_id: String,
    pub upload_locator: String,
    pub completion_locator: String,
    pub max_payload_bytes: u64,
    pub ticket_id: String,
}

/// Video metadata as returned by a fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub uri: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Canonical page link.
    #[serde(default)]
    pub link: String,
    /// Raw player embed URL (carries the privacy hash).
    #[serde(default)]
    pub player_embed_url: String,
    /// Duration in seconds; 0 until processed.
    #[serde(default)]
    pub duration: u64,
    /// Overall status, e.g. `available`, `uploading`, `transcoding`.
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub transcode: Option<TranscodeInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranscodeInfo {
    #[serde(default)]
    pub status: String,
}

impl VideoMetadata {
    /// Remote video id (last segment of `uri`).
    pub fn id(&self) -> &str {
        id_from_uri(&self.uri)
    }

    /// Remote processing has finished and a playable embed is available.
    pub fn is_ready(&self) -> bool {
        let transcoded = self
            .transcode
            .as_ref()
            .is_some_and(|t| t.status == "complete");
        (self.status == "available" || transcoded) && !self.player_embed_url.is_empty()
    }

    /// Processing failed on the remote side and will not recover.
    pub fn is_failed(&self) -> bool {
        let transcode_error = self
            .transcode
            .as_ref()
            .is_some_and(|t| t.status == "error");
        matches!(self.status.as_str(), "transcoding_error" | "uploading_error") || transcode_error
    }
}

/// One rendition of a picture.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PictureSize {
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub link: String,
}

/// Picture resource as returned by creation and fetch calls.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PictureResource {
    pub uri: String,
    /// One-shot upload destination (present on creation).
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub sizes: Vec<PictureSize>,
}

/// Result of creating a picture resource.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedPicture {
    pub picture_uri: String,
    pub upload_locator: String,
    pub sizes: Vec<PictureSize>,
}

/// Returns the last non-empty path segment of a resource URI.
pub fn id_from_uri(uri: &str) -> &str {
    uri.trim_end_matches('/').rsplit('/').next().unwrap_or(uri)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_carries_fixed_policy() {
        let req = CreateVideoRequest::new("Title", "Desc", UploadApproach::tus(42));
        let json = serde_json::to_value(&req).unwrap();

        assert_eq!(json["upload"]["approach"], "tus");
        assert_eq!(json["upload"]["size"], 42);
        assert_eq!(json["name"], "Title");
        assert_eq!(json["privacy"]["view"], "unlisted");
        assert_eq!(json["privacy"]["embed"], "public");
        assert_eq!(json["privacy"]["download"], false);
        for button in ["like", "watchlater", "share", "embed"] {
            assert_eq!(json["embed"]["buttons"][button], false, "{button}");
        }
        assert_eq!(json["embed"]["logos"]["vimeo"], false);
        assert_eq!(json["embed"]["title"]["name"], "hide");
        assert_eq!(json["embed"]["title"]["owner"], "hide");
        assert_eq!(json["embed"]["title"]["portrait"], "hide");
    }

    #[test]
    fn post_approach_omits_size_and_empty_description() {
        let req = CreateVideoRequest::new("Title", "", UploadApproach::post());
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["upload"]["approach"], "post");
        assert!(json["upload"].get("size").is_none());
        assert!(json.get("description").is_none());
    }

    #[test]
    fn id_from_uri_variants() {
        assert_eq!(id_from_uri("/videos/12345"), "12345");
        assert_eq!(id_from_uri("/videos/12345/"), "12345");
        assert_eq!(id_from_uri("/videos/1/pictures/99"), "99");
        assert_eq!(id_from_uri("777"), "777");
    }

    #[test]
    fn metadata_readiness() {
        let mut meta: VideoMetadata = serde_json::from_str(
            r#"{"uri":"/videos/5","status":"transcoding","player_embed_url":"https://p/video/5?h=a"}"#,
        )
        .unwrap();
        assert_eq!(meta.id(), "5");
        assert!(!meta.is_ready());

        meta.status = "available".into();
        assert!(meta.is_ready());

        meta.player_embed_url.clear();
        assert!(!meta.is_ready());
    }

    #[test]
    fn transcode_complete_counts_as_ready() {
        let meta: VideoMetadata = serde_json::from_str(
            r#"{"uri":"/videos/5","status":"uploading","transcode":{"status":"complete"},
                "player_embed_url":"https://p/video/5?h=a"}"#,
        )
        .unwrap();
        assert!(meta.is_ready());
    }

    #[test]
    fn metadata_failure_states() {
        let meta: VideoMetadata =
            serde_json::from_str(r#"{"uri":"/videos/5","transcode":{"status":"error"}}"#)
                .unwrap();
        assert!(meta.is_failed());
        assert!(!meta.is_ready());
    }

    #[test]
    fn ticket_serializes_camel_case() {
        let ticket = UploadTicket {
            remote_video_id: "5".into(),
            upload_locator: "https://up/5".into(),
            completion_locator: "/videos/5".into(),
            max_payload_bytes: 10,
            ticket_id: "t".into(),
        };
        let json = serde_json::to_value(&ticket).unwrap();
        assert_eq!(json["remoteVideoId"], "5");
        assert_eq!(json["maxPayloadBytes"], 10);
    }

    #[test]
    fn empty_patch() {
        assert!(VideoPatch::default().is_empty());
        let patch = VideoPatch {
            name: Some("n".into()),
            ..Default::default()
        };
        assert!(!patch.is_empty());
        let json = serde_json::to_value(&patch).unwrap();
        assert!(json.get("description").is_none());
    }
}
