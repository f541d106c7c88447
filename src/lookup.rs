//! # Resolved Issue Lookup Module
//!
//! Session-driven search of the resolved-issue area by phone number.

use std::sync::Arc;
use tracing::{debug, error, info};

use crate::dialogue::SupportDialogueState;
use crate::errors::HelpdeskError;
use crate::lookup_index::{LookupMatch, ReportLookupIndex};
use crate::phone::normalize_for_search;
use crate::report_store::ReportCategory;
use crate::session::{SessionKey, SessionStore};

/// Fewest digits a search key needs before the index is queried
pub const MIN_SEARCH_DIGITS: usize = 7;

/// Result of one lookup step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// Waiting for the phone number to search for
    AwaitingPhone { category: String },
    /// Fewer than seven digits; still waiting, nothing was queried
    TooShort,
    /// First matching resolved record; session cleared
    Found {
        category: String,
        search_key: String,
        record: LookupMatch,
    },
    /// Nothing matched; session cleared
    NotFound { category: String, query: String },
    /// The session is not in a lookup flow
    NotInFlow,
}

/// Session-driven lookup state machine
pub struct LookupStateMachine {
    sessions: Arc<dyn SessionStore>,
    index: Arc<ReportLookupIndex>,
}

impl LookupStateMachine {
    pub fn new(sessions: Arc<dyn SessionStore>, index: Arc<ReportLookupIndex>) -> Self {
        Self { sessions, index }
    }

    /// Start a lookup in the resolved files of `category`
    ///
    /// A report category label also covers the older file prefixes of that
    /// category; any other value is used as the file prefix itself.
    pub fn begin(&self, key: SessionKey, category: &str) -> LookupOutcome {
        self.sessions.set(
            key,
            SupportDialogueState::WaitingForSearch {
                category: category.to_string(),
            },
        );
        debug!(chat_id = %key, category, "Lookup started");

        LookupOutcome::AwaitingPhone {
            category: category.to_string(),
        }
    }

    /// Feed one text message into the flow
    ///
    /// Only the first match is returned. The session is cleared once the
    /// index answers, whether or not anything was found; a failing index
    /// leaves it waiting so the search can be retried.
    pub fn handle_text(&self, key: SessionKey, text: &str) -> Result<LookupOutcome, HelpdeskError> {
        let SupportDialogueState::WaitingForSearch { category } = self.sessions.get(key) else {
            return Ok(LookupOutcome::NotInFlow);
        };

        let search_key = normalize_for_search(text);
        if search_key.len() < MIN_SEARCH_DIGITS {
            debug!(chat_id = %key, digits = search_key.len(), "Search input too short");
            return Ok(LookupOutcome::TooShort);
        }

        let found = match ReportCategory::from_label(&category) {
            Some(known) => self.index.find_any(text, known.resolved_prefixes()),
            None => self.index.find(text, &category),
        };
        let matches = match found {
            Ok(matches) => matches,
            Err(e) => {
                error!(chat_id = %key, category = %category, error = %e, "Lookup failed");
                return Err(e);
            }
        };

        self.sessions.clear(key);
        info!(chat_id = %key, category = %category, matches = matches.len(), "Lookup answered");

        Ok(match matches.into_iter().next() {
            Some(record) => LookupOutcome::Found {
                category,
                search_key,
                record,
            },
            None => LookupOutcome::NotFound {
                category,
                query: text.to_string(),
            },
        })
    }

    /// Abandon whatever flow the session is in
    pub fn reset(&self, key: SessionKey) {
        self.sessions.clear(key);
    }
}
