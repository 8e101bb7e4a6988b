use crate::api::embed_url;
use crate::components::Icon;
use dioxus::prelude::*;

/// Playback overlay state. The opaque video id and the visibility flag live
/// and die together: dismissal clears both in one transition, so re-opening
/// always requires a fresh successful lookup.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlayerState {
    pub video_id: Option<String>,
    pub is_open: bool,
}

impl PlayerState {
    pub fn open(&mut self, video_id: String) {
        self.video_id = Some(video_id);
        self.is_open = true;
    }

    pub fn close(&mut self) {
        self.video_id = None;
        self.is_open = false;
    }
}

#[derive(Clone, PartialEq)]
pub struct PlayerController {
    state: Signal<PlayerState>,
}

impl PlayerController {
    pub fn new(state: Signal<PlayerState>) -> Self {
        Self { state }
    }

    pub fn open(&mut self, video_id: String) {
        self.state.with_mut(|state| state.open(video_id));
    }

    pub fn close(&mut self) {
        self.state.with_mut(|state| state.close());
    }

    pub fn current(&self) -> PlayerState {
        (self.state)()
    }
}

#[component]
pub fn PlayerOverlay(controller: PlayerController) -> Element {
    let state = controller.current();
    let embed_src = state.video_id.as_deref().map(embed_url);

    rsx! {
        if state.is_open {
            if let Some(src) = embed_src {
                div { class: "player-overlay",
                    div {
                        class: "player-backdrop",
                        onclick: {
                            let mut controller = controller.clone();
                            move |_| controller.close()
                        },
                    }
                    div { class: "player-panel",
                        div { class: "player-panel-header",
                            span { class: "player-panel-title", "Now playing" }
                            button {
                                class: "player-close",
                                aria_label: "Close player",
                                onclick: {
                                    let mut controller = controller.clone();
                                    move |_| controller.close()
                                },
                                Icon { name: "x".to_string(), class: "icon-sm".to_string() }
                            }
                        }
                        iframe {
                            class: "player-frame",
                            src: "{src}",
                            title: "Song player",
                            allow: "autoplay; encrypted-media; picture-in-picture",
                            allowfullscreen: true,
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn opening_sets_id_and_visibility_together() {
        let mut state = PlayerState::default();

        state.open("mrZRURcb1cM".to_string());

        assert_eq!(state.video_id, Some("mrZRURcb1cM".to_string()));
        assert!(state.is_open);
    }

    #[test]
    fn dismissal_clears_both_fields() {
        let mut state = PlayerState::default();
        state.open("mrZRURcb1cM".to_string());

        state.close();

        assert_eq!(state.video_id, None);
        assert!(!state.is_open);
    }
}
