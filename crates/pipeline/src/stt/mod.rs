//! Speech-to-text backends

mod groq;

pub use groq::{GroqSttConfig, GroqWhisperStt};
