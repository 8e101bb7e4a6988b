//! The components module contains all shared components for our app.

mod app;
mod icons;
mod player;
pub mod views;

pub use app::*;
pub use icons::*;
pub use player::*;
