//! Capability traits for the remote services the assistant depends on
//!
//! Every remote dependency sits behind one narrow trait so backends can be
//! swapped, mocked in tests, or wrapped with retry/backoff without touching
//! pipeline logic.
//!
//! ```text
//! Speech:
//!   - SpeechToText: audio -> text
//!   - TextToSpeech: text + language -> audio
//!
//! Language model:
//!   - LanguageModel: chat and vision completion
//!
//! Text processing:
//!   - Translator: pivot language -> target language
//!
//! Weather:
//!   - WeatherProvider: location -> raw provider payload
//! ```

mod llm;
mod speech;
mod text_processing;
mod weather;

pub use llm::LanguageModel;
pub use speech::{SpeechToText, TextToSpeech, TranscriptionOptions};
pub use text_processing::Translator;
pub use weather::WeatherProvider;
