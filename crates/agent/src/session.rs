//! Per-session conversation store
//!
//! Each chat session owns its history behind its own async mutex, so turns
//! on one session run one at a time while different sessions proceed in
//! parallel. Idle sessions are swept by a background task.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use serde::Serialize;
use tokio::sync::{watch, Mutex};

use agrobot_config::AgentSettings;
use agrobot_core::{ConversationSession, ConversationTurn};

/// A session's history behind its turn lock
pub type SharedSession = Arc<Mutex<ConversationSession>>;

/// Read-only view of a session for inspection endpoints
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: String,
    pub turn_count: usize,
    pub turns: Vec<ConversationTurn>,
}

impl SessionView {
    pub fn of(session: &ConversationSession) -> Self {
        Self {
            session_id: session.id().to_string(),
            turn_count: session.len(),
            turns: session.turns().to_vec(),
        }
    }
}

/// In-memory session registry
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SharedSession>>,
    idle_timeout: Duration,
    cleanup_interval: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(Duration::from_secs(3600), Duration::from_secs(300))
    }
}

impl SessionStore {
    pub fn new(idle_timeout: Duration, cleanup_interval: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_timeout,
            cleanup_interval,
        }
    }

    pub fn from_settings(settings: &AgentSettings) -> Self {
        Self::new(settings.session_idle_timeout(), settings.cleanup_interval())
    }

    /// Issue a fresh session id
    pub fn new_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    /// Fetch the session for `id`, creating it on first use
    pub fn get_or_create(&self, id: &str) -> SharedSession {
        if let Some(session) = self.sessions.read().get(id) {
            return session.clone();
        }

        let mut sessions = self.sessions.write();
        sessions
            .entry(id.to_string())
            .or_insert_with(|| {
                tracing::info!(session_id = %id, "Created session");
                Arc::new(Mutex::new(ConversationSession::new(id)))
            })
            .clone()
    }

    pub fn get(&self, id: &str) -> Option<SharedSession> {
        self.sessions.read().get(id).cloned()
    }

    /// Remove a session, returning whether it existed
    pub fn remove(&self, id: &str) -> bool {
        let removed = self.sessions.write().remove(id).is_some();
        if removed {
            tracing::info!(session_id = %id, "Removed session");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    /// Drop sessions idle longer than the timeout.
    ///
    /// A session whose lock is held, or whose handle is held outside the
    /// store, belongs to an in-flight request and never counts as idle.
    /// Handles are only handed out under the map lock, so the count is
    /// exact while the sweep holds the write lock.
    pub fn cleanup_expired(&self) -> usize {
        let idle = match chrono::Duration::from_std(self.idle_timeout) {
            Ok(idle) => idle,
            Err(_) => return 0,
        };

        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|id, session| {
            if Arc::strong_count(session) > 1 {
                return true;
            }
            match session.try_lock() {
                Ok(conversation) if conversation.is_idle_for(idle) => {
                    tracing::info!(session_id = %id, "Expired session");
                    false
                }
                _ => true,
            }
        });
        before - sessions.len()
    }

    /// Start the periodic idle sweep.
    ///
    /// Send `true` on the returned channel to stop the task.
    pub fn start_cleanup_task(self: &Arc<Self>) -> watch::Sender<bool> {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let store = Arc::clone(self);
        let period = store.cleanup_interval;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let removed = store.cleanup_expired();
                        if removed > 0 {
                            tracing::info!(
                                "Session cleanup: removed {} idle sessions ({} remaining)",
                                removed,
                                store.len()
                            );
                        }
                    }
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            tracing::info!("Session cleanup task shutting down");
                            break;
                        }
                    }
                }
            }
        });

        shutdown_tx
    }
}
