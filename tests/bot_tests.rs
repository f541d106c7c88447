use anbesa_helper::bot::menu::{
    MenuAction, FIXED_AUTO_RETURN, FIXED_BLOCKED, FIXED_PHONE_EXISTS, ISSUE_AUTO_RETURN,
    ISSUE_BLOCKED, ISSUE_PHONE_EXISTS, REPORT_AUTO_RETURN, REPORT_BLOCKED, REPORT_PHONE_EXISTS,
};
use anbesa_helper::bot::message_handler::bot_was_added;
use anbesa_helper::bot::ui_builder::{
    create_issue_report_keyboard, create_main_keyboard, create_resolved_issues_keyboard,
    format_group_welcome, format_report_confirmation, format_storage_failure,
};
use teloxide::types::UserId;
use anbesa_helper::report_store::{ReportCategory, ReportRecord, StoredReport};

#[cfg(test)]
mod tests {
    use super::*;

    /// Test navigation labels reset the session
    #[test]
    fn test_reset_labels() {
        for label in ["🔙 Back", "🏠 Main Menu", "/start", "/cancel"] {
            let action = MenuAction::from_label(label).unwrap();
            assert_eq!(action, MenuAction::Reset);
            assert!(action.resets_session());
            assert!(!action.requires_private_chat());
        }
    }

    /// Test report buttons map to issue types of the right category
    #[test]
    fn test_report_labels_classify() {
        let cases = [
            (REPORT_PHONE_EXISTS, ISSUE_PHONE_EXISTS, ReportCategory::AlreadyExistedPhone),
            (REPORT_BLOCKED, ISSUE_BLOCKED, ReportCategory::BlockedUsers),
            (REPORT_AUTO_RETURN, ISSUE_AUTO_RETURN, ReportCategory::AutoReturnToLogin),
        ];

        for (label, expected_issue, expected_category) in cases {
            let action = MenuAction::from_label(label).unwrap();
            assert_eq!(
                action,
                MenuAction::Report {
                    issue_type: expected_issue
                }
            );
            assert_eq!(ReportCategory::classify(expected_issue), expected_category);
            assert!(action.requires_private_chat());
            assert!(!action.resets_session());
        }
    }

    /// Test search buttons map to the report file categories
    #[test]
    fn test_search_labels() {
        assert_eq!(
            MenuAction::from_label(FIXED_PHONE_EXISTS),
            Some(MenuAction::Search {
                category: ReportCategory::AlreadyExistedPhone
            })
        );
        assert_eq!(
            MenuAction::from_label(FIXED_BLOCKED),
            Some(MenuAction::Search {
                category: ReportCategory::BlockedUsers
            })
        );
        assert_eq!(
            MenuAction::from_label(FIXED_AUTO_RETURN),
            Some(MenuAction::Search {
                category: ReportCategory::AutoReturnToLogin
            })
        );
    }

    /// Test free text is left to the active flow
    #[test]
    fn test_free_text_not_an_action() {
        assert_eq!(MenuAction::from_label("Abebe Kebede"), None);
        assert_eq!(MenuAction::from_label("0912345678"), None);
    }

    /// Test plain "help" is left to an active flow while /help is not
    #[test]
    fn test_help_routing() {
        assert_eq!(MenuAction::from_label("/help"), Some(MenuAction::Help));
        for text in ["help", "Help", " HELP "] {
            assert_eq!(MenuAction::from_label(text), None);
            assert_eq!(MenuAction::from_idle_text(text), Some(MenuAction::Help));
        }
        assert_eq!(MenuAction::from_idle_text("Helpdesk"), None);
    }

    /// Test the group welcome only fires for the bot itself
    #[test]
    fn test_group_welcome() {
        let bot_id = UserId(777);
        assert!(bot_was_added([UserId(1), bot_id], bot_id));
        assert!(!bot_was_added([UserId(1), UserId(2)], bot_id));
        assert!(!bot_was_added(Vec::new(), bot_id));

        let welcome = format_group_welcome();
        assert!(welcome.contains("/start"));
    }

    /// Test menu opening clears any flow in progress
    #[test]
    fn test_menus_reset_session() {
        assert!(MenuAction::ReportMenu.resets_session());
        assert!(MenuAction::LookupMenu.resets_session());
        assert!(!MenuAction::Help.resets_session());
    }

    /// Test keyboards carry the labels understood by the router
    #[test]
    fn test_keyboards_route_back_to_actions() {
        for keyboard in [
            create_main_keyboard(),
            create_issue_report_keyboard(),
            create_resolved_issues_keyboard(),
        ] {
            assert!(!keyboard.keyboard.is_empty());
            for row in &keyboard.keyboard {
                for button in row {
                    assert!(
                        MenuAction::from_label(&button.text).is_some(),
                        "unrouted label {}",
                        button.text
                    );
                }
            }
        }
    }

    /// Test confirmation and failure messages
    #[test]
    fn test_report_messages() {
        let report = StoredReport {
            category: ReportCategory::BlockedUsers,
            path: "reports/Blocked_Users_2025-01-10.csv".into(),
            record: ReportRecord {
                time: "10:00:00".to_string(),
                name: "Almaz".to_string(),
                phone: "+251912345678".to_string(),
            },
        };

        let message = format_report_confirmation("User Blocked", &report);
        assert!(message.contains("Almaz"));
        assert!(message.contains("+251912345678"));
        assert!(message.contains("User Blocked"));
        assert!(!message.contains("reports/"));

        assert!(!format_storage_failure().contains('/'));
    }
}
