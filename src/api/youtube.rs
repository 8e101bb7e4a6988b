//! Client for the video-search endpoint, plus the URL builders used by the
//! inline player and the external fallback page.

use once_cell::sync::Lazy;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

const YOUTUBE_API_BASE: &str = "https://www.googleapis.com/youtube/v3";
const SEARCH_QUALIFIER: &str = "official audio";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Errors from the playback lookup. The caller treats every variant the same
/// way (degrade to the external search page), so the distinctions exist for
/// logging, not control flow.
#[derive(Error, Debug)]
pub enum PlaybackError {
    /// No credential configured; detected before any network call.
    #[error("No YouTube API key is configured")]
    MissingKey,

    /// Transport-level failure while talking to the endpoint.
    #[error("API communication failure: {0}")]
    Api(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("YouTube answered with status {0}")]
    Status(u16),

    /// A well-formed reply with nothing playable in it.
    #[error("No playable video found")]
    NoResults,
}

pub struct YouTubeClient {
    api_key: String,
    base_url: String,
}

impl YouTubeClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, YOUTUBE_API_BASE.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Look up the top matching video for a song and return its opaque id.
    /// Only the first result is consulted.
    pub async fn search_top_video(
        &self,
        title: &str,
        artist: &str,
    ) -> Result<String, PlaybackError> {
        if self.api_key.trim().is_empty() {
            return Err(PlaybackError::MissingKey);
        }

        let query = build_search_query(title, artist);
        let url = format!("{}/search", self.base_url);
        let response = HTTP_CLIENT
            .get(&url)
            .query(&[
                ("part", "snippet"),
                ("q", query.as_str()),
                ("type", "video"),
                ("maxResults", "1"),
                ("key", self.api_key.as_str()),
            ])
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(PlaybackError::Status(response.status().as_u16()));
        }

        let payload: Value = response.json().await?;
        payload
            .get("items")
            .and_then(Value::as_array)
            .and_then(|items| items.first())
            .and_then(|item| item.get("id"))
            .and_then(|id| id.get("videoId"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or(PlaybackError::NoResults)
    }
}

/// Title, artist and a fixed qualifier compacted into one free-text query.
pub fn build_search_query(title: &str, artist: &str) -> String {
    [title, artist, SEARCH_QUALIFIER]
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Embed URL consumed by the inline overlay player.
pub fn embed_url(video_id: &str) -> String {
    format!(
        "https://www.youtube.com/embed/{}?autoplay=1",
        urlencoding::encode(video_id)
    )
}

/// External search-results page, opened in a new browsing context whenever
/// the in-app playback path cannot be completed.
pub fn fallback_search_url(title: &str, artist: &str) -> String {
    let query = [title.trim(), artist.trim()]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ");

    format!(
        "https://www.youtube.com/results?search_query={}",
        urlencoding::encode(&query)
    )
}
