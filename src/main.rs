use dioxus::prelude::*;

mod api;
mod components;
mod config;

use components::AppShell;

const FAVICON: Asset = asset!("/assets/icon.svg");
const APP_CSS: Asset = asset!("/assets/styling/app.css");

fn main() {
    dioxus::logger::initialize_default();

    #[cfg(not(target_arch = "wasm32"))]
    let _ = dotenv::dotenv();

    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        document::Link { rel: "icon", r#type: "image/svg+xml", href: FAVICON }

        // Theme color for mobile browsers
        document::Meta { name: "theme-color", content: "#18181b" }
        document::Meta { name: "mobile-web-app-capable", content: "yes" }
        document::Meta { name: "apple-mobile-web-app-title", content: "MoodTune" }

        document::Stylesheet { href: APP_CSS }

        AppShell {}
    }
}
