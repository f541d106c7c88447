//! # Helpdesk Services Module
//!
//! Wires the session store, report store and lookup index into the two state
//! machines. One instance is shared by every handler of the bot.

use std::path::Path;
use std::sync::Arc;

use crate::intake::IntakeStateMachine;
use crate::lookup::LookupStateMachine;
use crate::lookup_index::ReportLookupIndex;
use crate::report_store::ReportLogStore;
use crate::session::{InMemorySessionStore, SessionKey, SessionStore};

/// Shared state machines over one session store
pub struct HelpdeskServices {
    pub sessions: Arc<dyn SessionStore>,
    pub intake: IntakeStateMachine,
    pub lookup: LookupStateMachine,
}

impl HelpdeskServices {
    /// Services backed by an in-memory session store
    pub fn new(reports_dir: &Path, solved_dir: &Path) -> Self {
        Self::with_sessions(Arc::new(InMemorySessionStore::new()), reports_dir, solved_dir)
    }

    /// Services backed by the given session store
    pub fn with_sessions(
        sessions: Arc<dyn SessionStore>,
        reports_dir: &Path,
        solved_dir: &Path,
    ) -> Self {
        let store = Arc::new(ReportLogStore::new(reports_dir));
        let index = Arc::new(ReportLookupIndex::new(solved_dir));

        Self {
            intake: IntakeStateMachine::new(Arc::clone(&sessions), store),
            lookup: LookupStateMachine::new(Arc::clone(&sessions), index),
            sessions,
        }
    }

    /// Drop any flow in progress for `key`
    pub fn reset(&self, key: SessionKey) {
        self.sessions.clear(key);
    }
}
