//! Centralized constants for the assistant
//!
//! Default endpoints, model identifiers and prompt texts live here so the
//! settings defaults and the tests agree on a single value.

/// Remote service endpoints
pub mod endpoints {
    /// Gemini REST API base
    pub const GEMINI: &str = "https://generativelanguage.googleapis.com";

    /// Groq OpenAI-compatible API base
    pub const GROQ: &str = "https://api.groq.com/openai/v1";

    /// Google Translate speech endpoint
    pub const GOOGLE_TTS: &str = "https://translate.google.com/translate_tts";

    /// Google Translate public endpoint
    pub const GOOGLE_TRANSLATE: &str = "https://translate.googleapis.com/translate_a/single";

    /// OpenWeather current conditions
    pub const OPENWEATHER: &str = "https://api.openweathermap.org/data/2.5/weather";
}

/// Model identifiers
pub mod models {
    pub const CHAT: &str = "gemini-2.5-flash";
    pub const TRANSCRIPTION: &str = "whisper-large-v3-turbo";
}

/// Timing defaults
pub mod timeouts {
    /// Uniform bound on every remote call (seconds)
    pub const REMOTE_CALL_SECS: u64 = 10;

    /// Idle time before a chat session is evicted (seconds)
    pub const SESSION_IDLE_SECS: u64 = 3600;

    /// Interval between idle-session sweeps (seconds)
    pub const SESSION_CLEANUP_SECS: u64 = 300;
}

/// Limits
pub mod limits {
    /// Longest text chunk sent to the speech endpoint in one request
    pub const TTS_CHUNK_CHARS: usize = 100;

    /// Longest text the translation endpoint accepts
    pub const TRANSLATION_MAX_CHARS: usize = 5000;

    /// Request body limit for uploads (10 MiB)
    pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

    /// Turns kept per chat session (20 exchanges)
    pub const MAX_HISTORY_TURNS: usize = 40;
}

/// Fixed prompt texts
pub mod prompts {
    /// Policy block prepended to every chat turn
    pub const SYSTEM_POLICY: &str = "You are AgroBot, a friendly farming assistant.\n\
        ALWAYS respond in ENGLISH, no matter which language the question is asked in. \
        Translation happens separately.\n\
        Keep answers short, simple and conversational, a few plain sentences.\n\
        Do not use markdown, bullet points, numbered lists or special symbols.\n\
        Only answer questions about farming, crops, soil, irrigation, livestock, weather \
        and related agriculture topics. If the question is unrelated to farming, politely \
        decline and invite a farming question instead.\n\
        If the user only greets you or shares their name, greet them back warmly and ask \
        how you can help with their farm.";

    /// Single-shot prompt for plant photos
    pub const IMAGE_ANALYSIS: &str = "Analyze the uploaded plant image. Identify the plant \
        name, the disease name, and the level of infection (mild, medium, or severe). Give \
        a short, simple, and friendly reply a farmer can follow. Suggest an organic \
        solution only, and do not recommend chemical fertilizers or pesticides unless the \
        user asks for chemical treatment. Do not use any symbols or markdown.";

    /// Reply to blank chat input, sent without calling the model
    pub const EMPTY_INPUT_REPLY: &str = "Please enter a valid question.";
}

/// Service identity reported by the health endpoint
pub mod service {
    pub const NAME: &str = "AgroBot API";
    pub const VERSION: &str = "1.0.0";
}
