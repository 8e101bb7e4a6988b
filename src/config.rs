//! Credential surface for the two external services.
//!
//! Both keys are read once at startup. Native builds read the process
//! environment (after `dotenv` has loaded a local `.env`); browser builds get
//! values baked in at compile time, which is how the Dioxus CLI forwards
//! environment variables to a pure wasm bundle.

/// The generative-model key drives recommendations, the video-search key
/// drives inline playback. Either may be absent; every caller must cope.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppConfig {
    pub gemini_api_key: Option<String>,
    pub youtube_api_key: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_values(read_env("GEMINI_API_KEY"), read_env("YOUTUBE_API_KEY"))
    }

    pub fn from_values(gemini: Option<String>, youtube: Option<String>) -> Self {
        Self {
            gemini_api_key: normalize(gemini),
            youtube_api_key: normalize(youtube),
        }
    }

    /// The playback key can also be supplied through the in-app field when
    /// the environment did not provide one. Blank input clears it again.
    pub fn set_youtube_api_key(&mut self, key: String) {
        self.youtube_api_key = normalize(Some(key));
    }
}

fn normalize(value: Option<String>) -> Option<String> {
    let trimmed = value.map(|value| value.trim().to_string());
    match trimmed {
        Some(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn read_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

#[cfg(target_arch = "wasm32")]
fn read_env(name: &str) -> Option<String> {
    match name {
        "GEMINI_API_KEY" => option_env!("GEMINI_API_KEY").map(str::to_string),
        "YOUTUBE_API_KEY" => option_env!("YOUTUBE_API_KEY").map(str::to_string),
        _ => None,
    }
}
