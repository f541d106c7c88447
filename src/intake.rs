//! # Report Intake Module
//!
//! Two-step guided capture of a customer issue report: full name, then phone
//! number. A valid phone number is converted to storage form and appended to
//! the category log; an invalid one keeps the flow waiting for a retry.

use std::sync::Arc;
use tracing::{debug, error, info};

use crate::dialogue::{accept_full_name, SupportDialogueState};
use crate::errors::HelpdeskError;
use crate::phone::format_for_storage;
use crate::report_store::{ReportLogStore, StoredReport};
use crate::session::{SessionKey, SessionStore};

/// Result of one intake step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeOutcome {
    /// Flow started, the customer name is expected next
    AwaitingName { issue_type: String },
    /// Name recorded, the phone number is expected next
    AwaitingPhone { full_name: String },
    /// Name input was blank; still waiting for the name
    InvalidName,
    /// Phone input did not match an accepted format; still waiting for it
    InvalidPhone,
    /// Report stored and session cleared
    Reported {
        issue_type: String,
        report: StoredReport,
    },
    /// The session is not in an intake flow
    NotInFlow,
}

/// Session-driven intake state machine
pub struct IntakeStateMachine {
    sessions: Arc<dyn SessionStore>,
    store: Arc<ReportLogStore>,
}

impl IntakeStateMachine {
    pub fn new(sessions: Arc<dyn SessionStore>, store: Arc<ReportLogStore>) -> Self {
        Self { sessions, store }
    }

    /// Start (or restart) a report for `issue_type`
    ///
    /// Whatever the session held before is discarded: the last selection wins.
    pub fn begin(&self, key: SessionKey, issue_type: &str) -> IntakeOutcome {
        let previous = self.sessions.get(key);
        if previous != SupportDialogueState::Idle {
            debug!(chat_id = %key, previous = ?previous, "Restarting flow with new issue type");
        }

        self.sessions.set(
            key,
            SupportDialogueState::WaitingForName {
                issue_type: issue_type.to_string(),
            },
        );
        debug!(chat_id = %key, issue_type, "Intake started");

        IntakeOutcome::AwaitingName {
            issue_type: issue_type.to_string(),
        }
    }

    /// Feed one text message into the flow
    ///
    /// A storage failure is returned as an error and leaves the session in
    /// `WaitingForPhone`, so the user can resend the number without typing
    /// the name again.
    pub fn handle_text(&self, key: SessionKey, text: &str) -> Result<IntakeOutcome, HelpdeskError> {
        match self.sessions.get(key) {
            SupportDialogueState::WaitingForName { issue_type } => {
                let full_name = match accept_full_name(text) {
                    Ok(name) => name,
                    Err(_) => return Ok(IntakeOutcome::InvalidName),
                };

                self.sessions.set(
                    key,
                    SupportDialogueState::WaitingForPhone {
                        issue_type,
                        full_name: full_name.clone(),
                    },
                );
                debug!(chat_id = %key, "Full name recorded");

                Ok(IntakeOutcome::AwaitingPhone { full_name })
            }
            SupportDialogueState::WaitingForPhone {
                issue_type,
                full_name,
            } => {
                let Some(phone) = format_for_storage(text) else {
                    debug!(chat_id = %key, "Rejected phone number format");
                    return Ok(IntakeOutcome::InvalidPhone);
                };

                let report = match self.store.append(&full_name, &phone, &issue_type) {
                    Ok(report) => report,
                    Err(e) => {
                        error!(chat_id = %key, error = %e, "Failed to store report; session kept");
                        return Err(e);
                    }
                };

                self.sessions.clear(key);
                info!(
                    chat_id = %key,
                    category = report.category.label(),
                    "Issue reported"
                );

                Ok(IntakeOutcome::Reported { issue_type, report })
            }
            SupportDialogueState::Idle | SupportDialogueState::WaitingForSearch { .. } => {
                Ok(IntakeOutcome::NotInFlow)
            }
        }
    }

    /// Abandon whatever flow the session is in
    pub fn reset(&self, key: SessionKey) {
        self.sessions.clear(key);
    }
}
