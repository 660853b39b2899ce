//! Pipeline result types.

use serde::{Deserialize, Serialize};

/// Outcome of a completed video upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    pub video_id: String,
    /// Chrome-free player URL.
    #[serde(rename = "playbackURL")]
    pub playback_url: String,
    /// Canonical page link on the remote.
    pub canonical_link: String,
    pub duration_seconds: u64,
}

/// Outcome of a cover image activation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThumbnailResult {
    /// Link of the largest rendition.
    #[serde(rename = "thumbnailURL")]
    pub thumbnail_url: String,
    /// Id of the picture resource, the last segment of its URI.
    pub picture_resource_id: String,
    /// Full resource path, e.g. `/videos/42/pictures/7`.
    pub picture_uri: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_result_wire_names() {
        let result = UploadResult {
            video_id: "42".into(),
            playback_url: "https://p/42".into(),
            canonical_link: "https://v/42".into(),
            duration_seconds: 12,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["videoId"], "42");
        assert_eq!(json["playbackURL"], "https://p/42");
        assert_eq!(json["canonicalLink"], "https://v/42");
        assert_eq!(json["durationSeconds"], 12);
    }

    #[test]
    fn thumbnail_result_wire_names() {
        let result = ThumbnailResult {
            thumbnail_url: "https://i.test/7_1920x1080.jpg".into(),
            picture_resource_id: "7".into(),
            picture_uri: "/videos/42/pictures/7".into(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["thumbnailURL"], "https://i.test/7_1920x1080.jpg");
        assert_eq!(json["pictureResourceId"], "7");
        assert_eq!(json["pictureUri"], "/videos/42/pictures/7");
        assert!(json.get("thumbnailUrl").is_none());
    }
}
