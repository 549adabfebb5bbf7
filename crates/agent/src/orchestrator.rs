//! Chat orchestration
//!
//! One farmer turn: validate, assemble the prompt from policy, weather and
//! history, call the model under the uniform deadline, then record the
//! exchange in the session.

use std::sync::Arc;
use std::time::Duration;

use agrobot_config::Settings;
use agrobot_core::{with_timeout, ConversationSession, Error, LanguageModel, Result, Service};
use agrobot_llm::ContextAssembler;
use agrobot_weather::WeatherSnapshot;

use crate::session::SharedSession;

/// Produces pivot-language answers for chat turns
#[derive(Clone)]
pub struct ChatOrchestrator {
    llm: Arc<dyn LanguageModel>,
    assembler: ContextAssembler,
    empty_input_reply: String,
    timeout: Duration,
    max_history_turns: usize,
}

impl ChatOrchestrator {
    pub fn new(
        llm: Arc<dyn LanguageModel>,
        assembler: ContextAssembler,
        empty_input_reply: impl Into<String>,
        timeout: Duration,
        max_history_turns: usize,
    ) -> Self {
        Self {
            llm,
            assembler,
            empty_input_reply: empty_input_reply.into(),
            timeout,
            max_history_turns,
        }
    }

    pub fn from_settings(llm: Arc<dyn LanguageModel>, settings: &Settings) -> Self {
        Self::new(
            llm,
            ContextAssembler::from_settings(settings),
            settings.prompts.empty_input_reply.clone(),
            settings.agent.remote_timeout(),
            settings.agent.max_history_turns,
        )
    }

    /// Answer `user_text` within `session`.
    ///
    /// Blank input returns the fixed prompt-for-input reply without calling
    /// the model and leaves the session untouched. On model failure, a
    /// blank answer included, the session is also left untouched.
    pub async fn respond(
        &self,
        session: &mut ConversationSession,
        user_text: &str,
        weather: Option<&WeatherSnapshot>,
    ) -> Result<String> {
        let user_text = user_text.trim();
        if user_text.is_empty() {
            return Ok(self.empty_input_reply.clone());
        }

        let advisory = weather.map(|snapshot| snapshot.advisory().into_text());
        let request = self
            .assembler
            .assemble(advisory.as_deref(), session.turns(), user_text);

        let start = std::time::Instant::now();
        let response = with_timeout(Service::LanguageModel, self.timeout, self.llm.generate(request)).await?;
        let answer = response.text.trim().to_string();
        if answer.is_empty() {
            tracing::warn!(session_id = session.id(), model = self.llm.model_name(), "Model returned an empty answer");
            return Err(Error::upstream(Service::LanguageModel, "Model returned an empty answer"));
        }

        session.record_exchange(user_text, answer.clone());
        let evicted = session.evict_oldest(self.max_history_turns);

        tracing::debug!(
            session_id = session.id(),
            model = self.llm.model_name(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            turns = session.len(),
            evicted,
            grounded = advisory.is_some(),
            "Chat turn complete"
        );
        Ok(answer)
    }

    /// Run a whole turn under the session's lock
    pub async fn respond_in(
        &self,
        session: &SharedSession,
        user_text: &str,
        weather: Option<&WeatherSnapshot>,
    ) -> Result<String> {
        let mut guard = session.lock().await;
        self.respond(&mut guard, user_text, weather).await
    }
}
