//! HTTP clients for the two external services and the records they exchange.

mod gemini;
mod models;
mod youtube;

pub use gemini::*;
pub use models::*;
pub use youtube::*;
