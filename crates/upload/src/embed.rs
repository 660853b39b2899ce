//! Playback URL resolution.

use url::Url;

use crate::config::PlayerConfig;
use crate::error::EmbedError;

/// Player flags that strip every overlay from the embedded player.
const PLAYER_FLAGS: &str = "title=0&byline=0&portrait=0&badge=0&autopause=0&player_id=0";

/// Rebuilds a raw player embed URL into a chrome-free playback URL.
#[derive(Debug, Clone)]
pub struct EmbedResolver {
    base: String,
    app_id: String,
}

impl EmbedResolver {
    pub fn new(base: impl Into<String>, app_id: impl Into<String>) -> Self {
        Self {
            base: base.into().trim_end_matches('/').to_string(),
            app_id: app_id.into(),
        }
    }

    pub fn from_config(player: &PlayerConfig) -> Self {
        Self::new(player.base_url.clone(), player.app_id.clone())
    }

    /// Resolves `raw` into
    /// `{base}/{id}?h={hash}&title=0&...&app_id={app_id}`.
    ///
    /// The output depends only on `raw`: any query parameters other than
    /// the privacy hash are discarded.
    pub fn resolve(&self, raw: &str) -> Result<String, EmbedError> {
        let parsed = Url::parse(raw).map_err(|e| EmbedError::InvalidUrl(e.to_string()))?;

        let video_id = parsed
            .path_segments()
            .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
            .ok_or(EmbedError::MissingVideoId)?;

        let hash = parsed
            .query_pairs()
            .find(|(k, _)| k == "h")
            .map(|(_, v)| v.into_owned())
            .filter(|v| !v.is_empty())
            .ok_or(EmbedError::MissingHash)?;

        Ok(format!(
            "{}/{}?h={}&{}&app_id={}",
            self.base,
            video_id,
            encode(&hash),
            PLAYER_FLAGS,
            encode(&self.app_id)
        ))
    }
}

fn encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
