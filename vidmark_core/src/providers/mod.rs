// src/providers/mod.rs

pub mod groq;
pub mod youtube;

pub(crate) const USER_AGENT: &str = concat!("vidmark/", env!("CARGO_PKG_VERSION"));

pub use groq::GroqClassifier;
pub use youtube::YouTubeDataApi;
