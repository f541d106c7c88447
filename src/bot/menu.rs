//! Menu module mapping reply-keyboard labels to helpdesk actions

use crate::report_store::ReportCategory;

pub const BACK: &str = "🔙 Back";
pub const MAIN_MENU: &str = "🏠 Main Menu";
pub const REPORT_ISSUE: &str = "Report Issue";
pub const REPORTED_AND_FIXED: &str = "Reported And Fixed Issues";

pub const REPORT_PHONE_EXISTS: &str = "Phone Number Already Exists";
pub const REPORT_BLOCKED: &str = "Blocked User/Account";
pub const REPORT_AUTO_RETURN: &str = "\"Automatically Returning to Login Screen\"";

pub const FIXED_PHONE_EXISTS: &str = "Fixed Phone Number Already Exists Issues";
pub const FIXED_BLOCKED: &str = "Fixed Blocked User/Account Issues";
pub const FIXED_AUTO_RETURN: &str = "\"Fixed Automatically Returning to Login Screen Issues\"";

/// Issue types recorded for each report button
pub const ISSUE_PHONE_EXISTS: &str = "Phone Already Exists";
pub const ISSUE_BLOCKED: &str = "User Blocked";
pub const ISSUE_AUTO_RETURN: &str = "Automatically Returning to Login Screen";

/// Action selected by a keyboard label or command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    /// Back / main menu / start / cancel: abandon any flow
    Reset,
    /// Open the issue type menu
    ReportMenu,
    /// Open the resolved issue search menu
    LookupMenu,
    /// Start reporting an issue of this type
    Report { issue_type: &'static str },
    /// Start searching resolved issues of this category
    Search { category: ReportCategory },
    Help,
}

impl MenuAction {
    /// Parse a message text; `None` means free text for the active flow
    pub fn from_label(text: &str) -> Option<Self> {
        let action = match text.trim() {
            BACK | MAIN_MENU | "/start" | "/cancel" => MenuAction::Reset,
            REPORT_ISSUE => MenuAction::ReportMenu,
            REPORTED_AND_FIXED => MenuAction::LookupMenu,
            REPORT_PHONE_EXISTS => MenuAction::Report {
                issue_type: ISSUE_PHONE_EXISTS,
            },
            REPORT_BLOCKED => MenuAction::Report {
                issue_type: ISSUE_BLOCKED,
            },
            REPORT_AUTO_RETURN => MenuAction::Report {
                issue_type: ISSUE_AUTO_RETURN,
            },
            FIXED_PHONE_EXISTS => MenuAction::Search {
                category: ReportCategory::AlreadyExistedPhone,
            },
            FIXED_BLOCKED => MenuAction::Search {
                category: ReportCategory::BlockedUsers,
            },
            FIXED_AUTO_RETURN => MenuAction::Search {
                category: ReportCategory::AutoReturnToLogin,
            },
            "/help" => MenuAction::Help,
            _ => return None,
        };
        Some(action)
    }

    /// Actions recognized only when no flow is waiting for input
    ///
    /// A plain "help" typed during a report is a customer name, not a request.
    pub fn from_idle_text(text: &str) -> Option<Self> {
        text.trim()
            .eq_ignore_ascii_case("help")
            .then_some(MenuAction::Help)
    }

    /// Whether the action starts or opens a flow that handles customer data
    pub fn requires_private_chat(self) -> bool {
        matches!(
            self,
            MenuAction::ReportMenu
                | MenuAction::LookupMenu
                | MenuAction::Report { .. }
                | MenuAction::Search { .. }
        )
    }

    /// Whether the action discards the current session before running
    pub fn resets_session(self) -> bool {
        matches!(
            self,
            MenuAction::Reset | MenuAction::ReportMenu | MenuAction::LookupMenu
        )
    }
}
