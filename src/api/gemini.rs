//! Client for the Gemini text-completion endpoint.
//!
//! One prompt in, one free-text reply out. The reply is expected (but never
//! guaranteed) to be a raw JSON array of song records, so the parser strips
//! markdown fences defensively before the single parse attempt.

use crate::api::models::Recommendation;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const GEMINI_MODEL: &str = "gemini-2.0-flash";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const RECOMMENDATION_COUNT: usize = 10;

/// Errors from the recommendation request path. Nothing here is retried;
/// each variant maps to one user-facing message at the view seam.
#[derive(Error, Debug)]
pub enum RecommendError {
    /// No credential configured; detected before any network call.
    #[error("No Gemini API key is configured")]
    MissingKey,

    /// Transport-level failure while talking to the endpoint.
    #[error("API communication failure: {0}")]
    Api(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("Gemini answered with status {0}")]
    Status(u16),

    /// Transport succeeded but the reply was not a usable song list.
    #[error("The model reply could not be read as a song list")]
    MalformedResponse,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<RequestContent>,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<TextPart>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct TextPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize, Default)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize, Default)]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
}

#[derive(Debug, Deserialize, Default)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<TextPart>,
}

pub struct GeminiClient {
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, GEMINI_API_BASE.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Ask the model for songs matching the selection. One request, one
    /// parse; anything unusable collapses into [`RecommendError::MalformedResponse`].
    pub async fn recommend(
        &self,
        mood: &str,
        language: &str,
        era: &str,
    ) -> Result<Vec<Recommendation>, RecommendError> {
        if self.api_key.trim().is_empty() {
            return Err(RecommendError::MissingKey);
        }

        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![TextPart {
                    text: build_prompt(mood, language, era),
                }],
            }],
        };

        let url = format!("{}/models/{}:generateContent", self.base_url, GEMINI_MODEL);
        let response = HTTP_CLIENT
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RecommendError::Status(response.status().as_u16()));
        }

        let payload: GenerateContentResponse = response
            .json()
            .await
            .map_err(|_| RecommendError::MalformedResponse)?;

        let text = payload
            .candidates
            .first()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .iter()
                    .map(|part| part.text.as_str())
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .unwrap_or_default();

        parse_recommendations(&text).ok_or(RecommendError::MalformedResponse)
    }
}

/// Fixed prompt template. The model is told to skip markdown fencing, but
/// the parser still strips fences since that instruction is best-effort.
fn build_prompt(mood: &str, language: &str, era: &str) -> String {
    format!(
        "You are a music expert. Recommend {RECOMMENDATION_COUNT} songs for a listener who is \
         feeling \"{mood}\". Language preference: {language}. Era preference: {era}. \
         Reply with raw JSON only: no markdown fences, no commentary. The reply must be a JSON \
         array of objects, each with string keys \"title\", \"artist\", \"reason\" and an \
         optional \"history\" note about the song's background."
    )
}

/// Remove ```json fences the model may add despite instructions, then slice
/// down to the outermost array.
fn strip_code_fences(text: &str) -> &str {
    let mut cleaned = text.trim();
    for fence in ["```json", "```JSON", "```"] {
        if let Some(rest) = cleaned.strip_prefix(fence) {
            cleaned = rest;
            break;
        }
    }
    if let Some(rest) = cleaned.strip_suffix("```") {
        cleaned = rest;
    }
    let cleaned = cleaned.trim();

    if let (Some(start), Some(end)) = (cleaned.find('['), cleaned.rfind(']')) {
        if start < end {
            return &cleaned[start..=end];
        }
    }

    cleaned
}

/// Single best-effort parse: the cleaned text must be a JSON array, and each
/// element is converted field-by-field. `None` means malformed.
fn parse_recommendations(text: &str) -> Option<Vec<Recommendation>> {
    let cleaned = strip_code_fences(text);
    let value: Value = serde_json::from_str(cleaned).ok()?;
    let items = value.as_array()?;
    Some(items.iter().map(Recommendation::from_value).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SONG_ARRAY: &str = r#"[
        {"title": "Here Comes the Sun", "artist": "The Beatles", "reason": "Bright and hopeful."},
        {"title": "Walking on Sunshine", "artist": "Katrina and the Waves", "reason": "Pure energy.", "history": "A 1983 single that found its audience in 1985."}
    ]"#;

    #[test]
    fn prompt_interpolates_every_selection() {
        let prompt = build_prompt("melancholic but hopeful", "Spanish", "1990s");

        assert!(prompt.contains("melancholic but hopeful"));
        assert!(prompt.contains("Language preference: Spanish"));
        assert!(prompt.contains("Era preference: 1990s"));
        assert!(prompt.contains("Recommend 10 songs"));
    }

    #[test]
    fn fences_are_stripped_from_a_json_block() {
        let text = format!("```json\n{SONG_ARRAY}\n```");

        assert_eq!(strip_code_fences(&text), SONG_ARRAY.trim());
    }

    #[test]
    fn bare_fences_and_surrounding_prose_are_stripped() {
        let text = format!("Sure! Here are the songs:\n```\n{SONG_ARRAY}\n```\nEnjoy!");

        assert_eq!(strip_code_fences(&text), SONG_ARRAY.trim());
    }

    #[test]
    fn unfenced_raw_json_passes_through() {
        assert_eq!(strip_code_fences(SONG_ARRAY), SONG_ARRAY.trim());
    }

    #[test]
    fn parse_keeps_array_order() {
        let songs = parse_recommendations(SONG_ARRAY).unwrap();

        assert_eq!(songs.len(), 2);
        assert_eq!(songs[0].title, "Here Comes the Sun");
        assert_eq!(songs[1].artist, "Katrina and the Waves");
        assert_eq!(songs[0].history, None);
        assert!(songs[1].history.is_some());
    }

    #[test]
    fn parse_rejects_non_array_payloads() {
        assert!(parse_recommendations(r#"{"title": "not a list"}"#).is_none());
        assert!(parse_recommendations("I could not come up with songs today.").is_none());
        assert!(parse_recommendations("").is_none());
    }

    fn gemini_body(text: &str) -> serde_json::Value {
        json!({
            "candidates": [
                { "content": { "parts": [ { "text": text } ] } }
            ]
        })
    }

    #[tokio::test]
    async fn recommend_parses_a_fenced_reply() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(format!("/models/{GEMINI_MODEL}:generateContent")))
            .and(header("x-goog-api-key", "test-gen-key"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(gemini_body(&format!("```json\n{SONG_ARRAY}\n```"))),
            )
            .mount(&server)
            .await;

        let client = GeminiClient::with_base_url("test-gen-key".to_string(), server.uri());
        let songs = client
            .recommend("Happy", "English", "1960s")
            .await
            .expect("recommendation request failed");

        assert_eq!(songs.len(), 2);
        assert_eq!(songs[0].artist, "The Beatles");
    }

    #[tokio::test]
    async fn recommend_maps_unparseable_replies_to_malformed() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(format!("/models/{GEMINI_MODEL}:generateContent")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(gemini_body("Sorry, I can only chat about music in prose.")),
            )
            .mount(&server)
            .await;

        let client = GeminiClient::with_base_url("test-gen-key".to_string(), server.uri());
        let result = client.recommend("Happy", "English", "1960s").await;

        match result {
            Err(RecommendError::MalformedResponse) => {}
            other => panic!("expected MalformedResponse, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn recommend_surfaces_http_status_failures() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(format!("/models/{GEMINI_MODEL}:generateContent")))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let client = GeminiClient::with_base_url("bad-key".to_string(), server.uri());
        let result = client.recommend("Happy", "English", "1960s").await;

        match result {
            Err(RecommendError::Status(403)) => {}
            other => panic!("expected Status(403), got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_key_short_circuits_without_a_request() {
        let server = MockServer::start().await;

        // The mock verifies on drop that nothing ever reached the server.
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = GeminiClient::with_base_url("   ".to_string(), server.uri());
        let result = client.recommend("Happy", "English", "1960s").await;

        match result {
            Err(RecommendError::MissingKey) => {}
            other => panic!("expected MissingKey, got {other:?}"),
        }
    }
}
