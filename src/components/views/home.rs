use crate::api::{
    fallback_search_url, GeminiClient, Recommendation, RecommendError, YouTubeClient,
};
use crate::components::{
    Icon, PlayerController, RecommendState, ERA_PRESETS, LANGUAGE_PRESETS, MOOD_PRESETS,
};
use crate::config::AppConfig;
use dioxus::logger::tracing::{info, warn};
use dioxus::prelude::*;

const MISSING_GENERATION_KEY_MESSAGE: &str =
    "No Gemini API key is configured. Set GEMINI_API_KEY and reload to get recommendations.";

#[component]
pub fn HomeView() -> Element {
    let mut state = use_context::<Signal<RecommendState>>();
    let config = use_context::<Signal<AppConfig>>();
    let player = use_context::<PlayerController>();

    let mut key_draft = use_signal(String::new);

    let snapshot = state();
    let config_snapshot = config();
    let song_count = snapshot.songs.len();

    rsx! {
        div { class: "home",
            section { class: "selection-card",
                div { class: "field",
                    label { class: "field-label", "How are you feeling?" }
                    div { class: "chip-row",
                        for preset in MOOD_PRESETS {
                            button {
                                key: "{preset}",
                                class: if snapshot.mood == preset { "chip chip-selected" } else { "chip" },
                                onclick: move |_| state.with_mut(|s| s.set_mood(preset.to_string())),
                                "{preset}"
                            }
                        }
                    }
                    input {
                        class: "mood-input",
                        placeholder: "...or describe the mood in your own words",
                        value: "{snapshot.mood}",
                        oninput: move |e| state.with_mut(|s| s.set_mood(e.value())),
                        onkeydown: move |e| {
                            if e.key() == Key::Enter {
                                request_recommendations(state, config);
                            }
                        },
                    }
                }

                div { class: "field",
                    label { class: "field-label", "Language" }
                    div { class: "chip-row",
                        for preset in LANGUAGE_PRESETS {
                            button {
                                key: "{preset}",
                                class: if snapshot.language == preset { "chip chip-selected" } else { "chip" },
                                onclick: move |_| state.with_mut(|s| s.set_language(preset.to_string())),
                                "{preset}"
                            }
                        }
                    }
                }

                div { class: "field",
                    label { class: "field-label", "Era" }
                    div { class: "chip-row",
                        for preset in ERA_PRESETS {
                            button {
                                key: "{preset}",
                                class: if snapshot.era == preset { "chip chip-selected" } else { "chip" },
                                onclick: move |_| state.with_mut(|s| s.set_era(preset.to_string())),
                                "{preset}"
                            }
                        }
                    }
                }

                button {
                    class: "submit-button",
                    disabled: !snapshot.can_submit(),
                    onclick: move |_| request_recommendations(state, config),
                    if snapshot.is_loading {
                        Icon { name: "loader".to_string(), class: "icon-sm".to_string() }
                        "Finding songs..."
                    } else {
                        Icon { name: "sparkles".to_string(), class: "icon-sm".to_string() }
                        "Recommend songs"
                    }
                }
            }

            if let Some(error) = snapshot.error.clone() {
                div { class: "error-banner",
                    Icon { name: "alert".to_string(), class: "icon-sm".to_string() }
                    span { "{error}" }
                }
            }

            if config_snapshot.youtube_api_key.is_none() {
                div { class: "key-notice",
                    Icon { name: "key".to_string(), class: "icon-sm key-notice-icon".to_string() }
                    div { class: "key-notice-body",
                        p { class: "key-notice-title", "No playback key configured" }
                        p { class: "key-notice-text",
                            "Songs will open on YouTube in a new tab. Paste a YouTube Data API key to play them right here."
                        }
                        div { class: "key-notice-row",
                            input {
                                class: "key-input",
                                r#type: "password",
                                placeholder: "••••••••",
                                value: "{key_draft}",
                                oninput: move |e| key_draft.set(e.value()),
                            }
                            button {
                                class: "key-save",
                                disabled: key_draft().trim().is_empty(),
                                onclick: {
                                    let mut config = config.clone();
                                    move |_| {
                                        let draft = key_draft.peek().clone();
                                        config.with_mut(|c| c.set_youtube_api_key(draft));
                                        key_draft.set(String::new());
                                    }
                                },
                                "Use key"
                            }
                        }
                    }
                }
            }

            if !snapshot.songs.is_empty() {
                section { class: "results",
                    h2 { class: "results-title", "Your mix" }
                    p { class: "results-subtitle", "{song_count} songs for a \"{snapshot.mood}\" mood" }
                    div { class: "results-list",
                        for (index , song) in snapshot.songs.iter().enumerate() {
                            RecommendationCard {
                                key: "{index}-{song.title}-{song.artist}",
                                index: index + 1,
                                song: song.clone(),
                                onplay: {
                                    let player = player.clone();
                                    let config = config.clone();
                                    let title = song.title.clone();
                                    let artist = song.artist.clone();
                                    move |_| {
                                        resolve_playback(
                                            player.clone(),
                                            config,
                                            title.clone(),
                                            artist.clone(),
                                        )
                                    }
                                },
                            }
                        }
                    }
                }
            } else if !snapshot.is_loading && snapshot.error.is_none() {
                div { class: "empty-state",
                    Icon { name: "music".to_string(), class: "icon-xl empty-icon".to_string() }
                    p { class: "empty-text", "Pick a mood and we'll put a mix together." }
                }
            }
        }
    }
}

#[component]
fn RecommendationCard(index: usize, song: Recommendation, onplay: EventHandler<MouseEvent>) -> Element {
    // Every field came from the model; render defensively.
    let title = if song.title.trim().is_empty() {
        "Unknown title".to_string()
    } else {
        song.title.clone()
    };
    let artist = if song.artist.trim().is_empty() {
        "Unknown artist".to_string()
    } else {
        song.artist.clone()
    };
    let reason = Some(song.reason.clone()).filter(|reason| !reason.trim().is_empty());
    let history = song.history.clone().filter(|history| !history.trim().is_empty());

    rsx! {
        div { class: "song-row",
            span { class: "song-index", "{index}" }
            div { class: "song-meta",
                p { class: "song-title", "{title}" }
                p { class: "song-artist", "{artist}" }
                if let Some(reason) = reason {
                    p { class: "song-reason", "{reason}" }
                }
                if let Some(history) = history {
                    p { class: "song-history", "{history}" }
                }
            }
            button {
                class: "song-play",
                aria_label: "Play {title}",
                onclick: move |e| onplay.call(e),
                Icon { name: "play".to_string(), class: "icon-sm".to_string() }
            }
        }
    }
}

/// Kick off the recommendation flow. Submission is ignored while a request
/// is in flight or the trimmed mood is empty; a missing key short-circuits
/// before any network work starts.
fn request_recommendations(mut state: Signal<RecommendState>, config: Signal<AppConfig>) {
    if !state.peek().can_submit() {
        return;
    }

    let Some(api_key) = config.peek().gemini_api_key.clone() else {
        state.with_mut(|s| s.fail_before_request(MISSING_GENERATION_KEY_MESSAGE.to_string()));
        return;
    };

    let (mood, language, era) = {
        let snapshot = state.peek();
        (
            snapshot.mood.clone(),
            snapshot.language.clone(),
            snapshot.era.clone(),
        )
    };
    let generation = state.with_mut(|s| s.begin_request());

    spawn(async move {
        let client = GeminiClient::new(api_key);
        match client.recommend(&mood, &language, &era).await {
            Ok(songs) => {
                info!("received {} recommendations", songs.len());
                state.with_mut(|s| s.finish_with_songs(generation, songs));
            }
            Err(error) => {
                warn!("recommendation request failed: {error}");
                state.with_mut(|s| s.finish_with_error(generation, recommend_error_message(&error)));
            }
        }
    });
}

/// Resolve a song to a playable video and open the overlay. Every failure,
/// including a missing key, degrades to the external search page so the
/// user always has a next action.
fn resolve_playback(
    mut player: PlayerController,
    config: Signal<AppConfig>,
    title: String,
    artist: String,
) {
    let api_key = config.peek().youtube_api_key.clone();

    spawn(async move {
        let Some(api_key) = api_key else {
            open_external(&fallback_search_url(&title, &artist));
            return;
        };

        let client = YouTubeClient::new(api_key);
        match client.search_top_video(&title, &artist).await {
            Ok(video_id) => {
                info!("playing video {video_id}");
                player.open(video_id);
            }
            Err(error) => {
                warn!("playback lookup failed: {error}");
                open_external(&fallback_search_url(&title, &artist));
            }
        }
    });
}

fn recommend_error_message(error: &RecommendError) -> String {
    match error {
        RecommendError::MissingKey => MISSING_GENERATION_KEY_MESSAGE.to_string(),
        RecommendError::Api(detail) => format!(
            "Could not reach the recommendation service: {detail}. Check your network and API key."
        ),
        RecommendError::Status(code) => format!(
            "The recommendation service answered with status {code}. Check your API key."
        ),
        RecommendError::MalformedResponse => {
            "The model sent back something that was not a song list. Try again.".to_string()
        }
    }
}

/// Open a page in a new browsing context. The wasm build talks to the
/// browser window directly; webview targets go through script eval.
#[cfg(target_arch = "wasm32")]
fn open_external(url: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    if window.open_with_url_and_target(url, "_blank").is_err() {
        warn!("failed to open external page");
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn open_external(url: &str) {
    let script = format!("window.open({url:?}, \"_blank\");");
    let _ = document::eval(&script);
}
