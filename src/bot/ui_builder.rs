//! UI Builder module for creating keyboards and formatting messages

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup};

use crate::lookup::MIN_SEARCH_DIGITS;
use crate::lookup_index::LookupMatch;
use crate::report_store::{ReportCategory, StoredReport};

use super::menu;

/// Callback data prefix of the "search again" button
pub const SEARCH_CALLBACK_PREFIX: &str = "search_";

fn reply_keyboard(rows: &[&[&str]]) -> KeyboardMarkup {
    let rows: Vec<Vec<KeyboardButton>> = rows
        .iter()
        .map(|row| row.iter().map(|label| KeyboardButton::new(*label)).collect())
        .collect();
    KeyboardMarkup::new(rows).resize_keyboard()
}

/// Top-level menu
pub fn create_main_keyboard() -> KeyboardMarkup {
    reply_keyboard(&[&[menu::REPORT_ISSUE], &[menu::REPORTED_AND_FIXED]])
}

/// Issue types that can be reported
pub fn create_issue_report_keyboard() -> KeyboardMarkup {
    reply_keyboard(&[
        &[menu::REPORT_PHONE_EXISTS],
        &[menu::REPORT_BLOCKED],
        &[menu::REPORT_AUTO_RETURN],
        &[menu::BACK],
    ])
}

/// Resolved issue categories that can be searched
pub fn create_resolved_issues_keyboard() -> KeyboardMarkup {
    reply_keyboard(&[
        &[menu::FIXED_PHONE_EXISTS],
        &[menu::FIXED_BLOCKED],
        &[menu::FIXED_AUTO_RETURN],
        &[menu::BACK],
    ])
}

/// Inline shortcut re-entering the search for `category`
pub fn create_search_again_keyboard(category: &str) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        "🔍 Search Another",
        format!("{SEARCH_CALLBACK_PREFIX}{category}"),
    )]])
}

/// Category carried by a "search again" callback
pub fn parse_search_callback(data: &str) -> Option<ReportCategory> {
    data.strip_prefix(SEARCH_CALLBACK_PREFIX)
        .and_then(ReportCategory::from_label)
}

pub fn format_name_prompt(issue_type: &str) -> String {
    format!("📝 {issue_type} reporting...\n\nPlease enter the customer's Full Name:")
}

pub fn format_phone_prompt(full_name: &str) -> String {
    format!("Full Name recorded: {full_name}\n\nNow, please enter the Phone Number:")
}

pub fn format_invalid_phone() -> String {
    "❌ Invalid Format. Please use 09..., 07... or +251...".to_string()
}

pub fn format_report_confirmation(issue_type: &str, report: &StoredReport) -> String {
    format!(
        "🚀 Issue Reported Successfully\n\n👤 Full Name: {}\n📱 Phone: {}\n📝 Type: {}",
        report.record.name, report.record.phone, issue_type
    )
}

pub fn format_search_prompt(category: &str) -> String {
    format!(
        "🔍 Search in {}\n\nPlease enter the customer's Phone Number:",
        category.replace('_', " ")
    )
}

pub fn format_search_too_short() -> String {
    format!("⚠️ Please enter a valid number (at least {MIN_SEARCH_DIGITS}-9 digits).")
}

pub fn format_lookup_found(search_key: &str, record: &LookupMatch) -> String {
    format!(
        "✅ Record Found:\n\n📱 Phone: 0{}\n🚩 Status: {} ✅\n📅 Resolved: {}",
        search_key, record.status, record.date
    )
}

pub fn format_lookup_not_found(query: &str) -> String {
    format!("❌ No record found for {query}.")
}

/// Generic failure text; never includes paths or error details
pub fn format_storage_failure() -> String {
    "⚠️ Something went wrong while saving or reading records. Please try again in a moment."
        .to_string()
}

pub fn format_private_chat_required() -> String {
    "🛡️ Privacy & Security Notice\n\nTo protect customer phone numbers, reporting and searching \
     must be done in a private chat with the bot."
        .to_string()
}

pub fn format_group_welcome() -> String {
    "AnbesaPlus Helper Bot has joined!\nTo start: Type /start or select from menu below".to_string()
}

pub fn format_help() -> String {
    [
        "Available Commands:",
        "/start - Show the main menu",
        "/cancel - Abandon the current report or search",
        "/help - Show this help message",
        "",
        "Use \"Report Issue\" to record a customer problem and \"Reported And Fixed Issues\" \
         to check whether a reported number has been resolved.",
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_callback_round_trip() {
        let keyboard = create_search_again_keyboard("Blocked_Users");
        assert_eq!(keyboard.inline_keyboard.len(), 1);

        assert_eq!(
            parse_search_callback("search_Blocked_Users"),
            Some(ReportCategory::BlockedUsers)
        );
        assert_eq!(parse_search_callback("search_Unknown"), None);
        assert_eq!(parse_search_callback("edit_0"), None);
    }

    #[test]
    fn test_search_prompt_humanizes_category() {
        assert!(format_search_prompt("Blocked_Users").contains("Blocked Users"));
    }

    #[test]
    fn test_found_message_shows_local_form() {
        let record = LookupMatch {
            date: "2025-01-10".to_string(),
            status: "Fixed".to_string(),
        };
        let message = format_lookup_found("912345678", &record);
        assert!(message.contains("0912345678"));
        assert!(message.contains("2025-01-10"));
    }
}
