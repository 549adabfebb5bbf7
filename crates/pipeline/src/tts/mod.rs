//! Text-to-speech backends

mod chunker;
mod google;

pub use chunker::split_for_speech;
pub use google::{GoogleTts, GoogleTtsConfig};
