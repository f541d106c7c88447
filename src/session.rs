//! # Session Store Module
//!
//! Per-chat storage of [`SupportDialogueState`]. The state machines receive a
//! store instead of reaching for global state, so tests and the bot can share
//! the same machines over different backends.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::dialogue::SupportDialogueState;

/// Identifies one conversation (the Telegram chat id)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionKey(pub i64);

impl std::fmt::Display for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Get/set/clear access to session state
///
/// Callers must not run two transitions for the same key at once; the bot
/// relies on the dispatcher handling one update per chat at a time.
pub trait SessionStore: Send + Sync {
    /// Current state, `Idle` when the session does not exist yet
    fn get(&self, key: SessionKey) -> SupportDialogueState;

    fn set(&self, key: SessionKey, state: SupportDialogueState);

    /// Drop the session and everything collected in it
    fn clear(&self, key: SessionKey);
}

/// Process-local session store, lost on restart
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<SessionKey, SupportDialogueState>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<SessionKey, SupportDialogueState>> {
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, key: SessionKey) -> SupportDialogueState {
        self.lock().get(&key).cloned().unwrap_or_default()
    }

    fn set(&self, key: SessionKey, state: SupportDialogueState) {
        let mut sessions = self.lock();
        if state == SupportDialogueState::Idle {
            sessions.remove(&key);
        } else {
            sessions.insert(key, state);
        }
    }

    fn clear(&self, key: SessionKey) {
        self.lock().remove(&key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored_sessions(store: &InMemorySessionStore) -> usize {
        store.lock().len()
    }

    #[test]
    fn test_missing_session_reads_idle() {
        let store = InMemorySessionStore::new();
        assert_eq!(store.get(SessionKey(1)), SupportDialogueState::Idle);
        assert_eq!(stored_sessions(&store), 0);
    }

    #[test]
    fn test_sessions_are_isolated() {
        let store = InMemorySessionStore::new();
        let blocked = SupportDialogueState::WaitingForName {
            issue_type: "User Blocked".to_string(),
        };

        store.set(SessionKey(1), blocked.clone());

        assert_eq!(store.get(SessionKey(1)), blocked);
        assert_eq!(store.get(SessionKey(2)), SupportDialogueState::Idle);
    }

    #[test]
    fn test_clear_and_idle_release_session() {
        let store = InMemorySessionStore::new();
        store.set(
            SessionKey(1),
            SupportDialogueState::WaitingForSearch {
                category: "Blocked_Users".to_string(),
            },
        );
        store.set(
            SessionKey(2),
            SupportDialogueState::WaitingForSearch {
                category: "Blocked_Users".to_string(),
            },
        );
        assert_eq!(stored_sessions(&store), 2);

        store.clear(SessionKey(1));
        store.set(SessionKey(2), SupportDialogueState::Idle);

        assert_eq!(stored_sessions(&store), 0);
    }
}
