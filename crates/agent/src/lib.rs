//! Conversational agent for farmers
//!
//! Features:
//! - Chat orchestration with weather grounding and bounded history
//! - Per-session conversation store with per-session turn locks
//! - Single-shot plant image analysis

pub mod image;
pub mod orchestrator;
pub mod session;

pub use image::ImageAnalyzer;
pub use orchestrator::ChatOrchestrator;
pub use session::{SessionStore, SessionView, SharedSession};
