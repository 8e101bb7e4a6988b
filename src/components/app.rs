use crate::api::Recommendation;
use crate::components::views::HomeView;
use crate::components::{Icon, PlayerController, PlayerOverlay, PlayerState};
use crate::config::AppConfig;
use dioxus::prelude::*;

pub const MOOD_PRESETS: [&str; 6] = [
    "Happy",
    "Sad",
    "Energetic",
    "Relaxed",
    "Romantic",
    "Nostalgic",
];

pub const LANGUAGE_PRESETS: [&str; 6] = [
    "English",
    "Spanish",
    "Hindi",
    "Korean",
    "French",
    "Portuguese",
];

pub const ERA_PRESETS: [&str; 6] = ["2020s", "2010s", "2000s", "1990s", "1980s", "1970s"];

/// The whole recommendation surface as one record. Components never poke
/// fields directly; every change goes through a named transition, which
/// keeps the update surface auditable.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendState {
    pub mood: String,
    pub language: String,
    pub era: String,
    pub is_loading: bool,
    pub error: Option<String>,
    pub songs: Vec<Recommendation>,
    request_generation: u64,
}

impl Default for RecommendState {
    fn default() -> Self {
        Self {
            mood: String::new(),
            language: LANGUAGE_PRESETS[0].to_string(),
            era: ERA_PRESETS[0].to_string(),
            is_loading: false,
            error: None,
            songs: Vec::new(),
            request_generation: 0,
        }
    }
}

impl RecommendState {
    pub fn set_mood(&mut self, mood: String) {
        self.mood = mood;
    }

    pub fn set_language(&mut self, language: String) {
        self.language = language;
    }

    pub fn set_era(&mut self, era: String) {
        self.era = era;
    }

    /// Submit is allowed once the trimmed mood is non-empty and no request
    /// is already in flight.
    pub fn can_submit(&self) -> bool {
        !self.mood.trim().is_empty() && !self.is_loading
    }

    /// Missing-credential short-circuit: no request starts, the previous
    /// list survives, and the message shows immediately.
    pub fn fail_before_request(&mut self, message: String) {
        self.error = Some(message);
    }

    /// Start a request: previous results and error are dropped before the
    /// network call, and the returned generation tags its completion.
    pub fn begin_request(&mut self) -> u64 {
        self.is_loading = true;
        self.error = None;
        self.songs.clear();
        self.request_generation = self.request_generation.wrapping_add(1);
        self.request_generation
    }

    /// Completions carry the generation returned by [`Self::begin_request`].
    /// A stale generation means a newer request has started since, so the
    /// completion is dropped: the last request issued wins, not the last
    /// response to arrive.
    pub fn finish_with_songs(&mut self, generation: u64, songs: Vec<Recommendation>) {
        if generation != self.request_generation {
            return;
        }
        self.is_loading = false;
        self.songs = songs;
    }

    pub fn finish_with_error(&mut self, generation: u64, message: String) {
        if generation != self.request_generation {
            return;
        }
        self.is_loading = false;
        self.error = Some(message);
    }
}

#[component]
pub fn AppShell() -> Element {
    let recommend_state = use_signal(RecommendState::default);
    let player_state = use_signal(PlayerState::default);
    let player = PlayerController::new(player_state);
    let config = use_signal(AppConfig::from_env);

    // Provide state via context
    use_context_provider(|| recommend_state);
    use_context_provider(|| config);
    use_context_provider(|| player.clone());

    rsx! {
        div { class: "app-container",
            header { class: "app-header",
                div { class: "header-brand",
                    Icon { name: "music".to_string(), class: "icon-lg header-logo".to_string() }
                    div {
                        h1 { class: "header-title", "MoodTune" }
                        p { class: "header-tagline", "Tell us the mood, we find the songs" }
                    }
                }
            }

            main { class: "app-main",
                HomeView {}
            }
        }

        PlayerOverlay { controller: player.clone() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn song(title: &str) -> Recommendation {
        Recommendation {
            title: title.to_string(),
            artist: "Artist".to_string(),
            reason: "Reason".to_string(),
            history: None,
        }
    }

    #[test]
    fn selecting_a_preset_touches_only_its_own_category() {
        let mut state = RecommendState::default();

        state.set_mood(MOOD_PRESETS[2].to_string());
        assert_eq!(state.mood, "Energetic");
        assert_eq!(state.language, "English");
        assert_eq!(state.era, "2020s");

        state.set_language(LANGUAGE_PRESETS[3].to_string());
        assert_eq!(state.mood, "Energetic");
        assert_eq!(state.language, "Korean");
        assert_eq!(state.era, "2020s");

        state.set_era(ERA_PRESETS[4].to_string());
        assert_eq!(state.mood, "Energetic");
        assert_eq!(state.language, "Korean");
        assert_eq!(state.era, "1980s");
    }

    #[test]
    fn whitespace_only_mood_cannot_submit() {
        let mut state = RecommendState::default();

        assert!(!state.can_submit());

        state.set_mood("   \t ".to_string());
        assert!(!state.can_submit());

        state.set_mood(" wistful ".to_string());
        assert!(state.can_submit());
    }

    #[test]
    fn an_in_flight_request_blocks_resubmission() {
        let mut state = RecommendState::default();
        state.set_mood("Happy".to_string());

        let _generation = state.begin_request();

        assert!(state.is_loading);
        assert!(!state.can_submit());
    }

    #[test]
    fn beginning_a_request_clears_previous_results_and_error() {
        let mut state = RecommendState::default();
        state.set_mood("Happy".to_string());
        let generation = state.begin_request();
        state.finish_with_error(generation, "boom".to_string());
        assert!(state.error.is_some());

        state.begin_request();

        assert!(state.songs.is_empty());
        assert_eq!(state.error, None);
        assert!(state.is_loading);
    }

    #[test]
    fn a_missing_key_failure_keeps_the_previous_list() {
        let mut state = RecommendState::default();
        state.set_mood("Happy".to_string());
        let generation = state.begin_request();
        state.finish_with_songs(generation, vec![song("Kept")]);

        state.fail_before_request("No key".to_string());

        assert_eq!(state.songs.len(), 1);
        assert_eq!(state.error, Some("No key".to_string()));
        assert!(!state.is_loading);
    }

    #[test]
    fn successful_completion_replaces_the_list_in_order() {
        let mut state = RecommendState::default();
        state.set_mood("Happy".to_string());
        let generation = state.begin_request();

        state.finish_with_songs(generation, vec![song("First"), song("Second")]);

        assert!(!state.is_loading);
        assert_eq!(state.songs[0].title, "First");
        assert_eq!(state.songs[1].title, "Second");
    }

    #[test]
    fn failed_completion_leaves_the_list_empty_and_sets_the_message() {
        let mut state = RecommendState::default();
        state.set_mood("Happy".to_string());
        let generation = state.begin_request();

        state.finish_with_error(generation, "The model reply could not be read".to_string());

        assert!(!state.is_loading);
        assert!(state.songs.is_empty());
        assert_eq!(
            state.error,
            Some("The model reply could not be read".to_string())
        );
    }

    #[test]
    fn stale_completions_are_discarded() {
        let mut state = RecommendState::default();
        state.set_mood("Happy".to_string());

        let first = state.begin_request();
        let second = state.begin_request();

        // The slow first response lands after the second request started.
        state.finish_with_songs(first, vec![song("Stale")]);
        assert!(state.is_loading);
        assert!(state.songs.is_empty());

        state.finish_with_songs(second, vec![song("Fresh")]);
        assert!(!state.is_loading);
        assert_eq!(state.songs[0].title, "Fresh");

        // A stale error afterwards cannot clobber the fresh result either.
        state.finish_with_error(first, "late failure".to_string());
        assert_eq!(state.error, None);
        assert_eq!(state.songs[0].title, "Fresh");
    }
}
