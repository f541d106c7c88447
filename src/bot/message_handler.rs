//! Message Handler module for processing incoming Telegram messages

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::UserId;
use tracing::{debug, error, info, warn};

use crate::attachment_guard::{blocked_extension, security_notice};
use crate::errors::HelpdeskError;
use crate::helpdesk::HelpdeskServices;
use crate::intake::IntakeOutcome;
use crate::lookup::LookupOutcome;
use crate::session::SessionKey;

use super::menu::MenuAction;
use super::ui_builder::{
    create_issue_report_keyboard, create_main_keyboard, create_resolved_issues_keyboard,
    create_search_again_keyboard, format_group_welcome, format_help, format_invalid_phone, format_lookup_found,
    format_lookup_not_found, format_name_prompt, format_phone_prompt,
    format_private_chat_required, format_report_confirmation, format_search_prompt,
    format_search_too_short, format_storage_failure,
};

async fn handle_menu_action(
    bot: &Bot,
    msg: &Message,
    action: MenuAction,
    services: &HelpdeskServices,
) -> Result<()> {
    let key = SessionKey(msg.chat.id.0);

    if action.requires_private_chat() && !msg.chat.is_private() {
        debug!(chat_id = %key, action = ?action, "Refusing customer data action outside private chat");
        bot.send_message(msg.chat.id, format_private_chat_required())
            .await?;
        return Ok(());
    }

    if action.resets_session() {
        services.reset(key);
    }

    match action {
        MenuAction::Reset => {
            bot.send_message(msg.chat.id, "Returned to the main menu.")
                .reply_markup(create_main_keyboard())
                .await?;
        }
        MenuAction::ReportMenu => {
            bot.send_message(
                msg.chat.id,
                "Select Issue Type:\n\n⚠️ Only report an issue if it matches one of the listed types.",
            )
            .reply_markup(create_issue_report_keyboard())
            .await?;
        }
        MenuAction::LookupMenu => {
            bot.send_message(
                msg.chat.id,
                "📋 Reported And Fixed Issues\n\nSelect the issue type you reported, then search with the same phone number.",
            )
            .reply_markup(create_resolved_issues_keyboard())
            .await?;
        }
        MenuAction::Report { issue_type } => {
            services.intake.begin(key, issue_type);
            bot.send_message(msg.chat.id, format_name_prompt(issue_type))
                .await?;
        }
        MenuAction::Search { category } => {
            services.lookup.begin(key, category.label());
            bot.send_message(msg.chat.id, format_search_prompt(category.label()))
                .await?;
        }
        MenuAction::Help => {
            bot.send_message(msg.chat.id, format_help())
                .reply_markup(create_main_keyboard())
                .await?;
        }
    }

    Ok(())
}

async fn handle_intake_input(
    bot: &Bot,
    msg: &Message,
    text: &str,
    services: Arc<HelpdeskServices>,
) -> Result<()> {
    let key = SessionKey(msg.chat.id.0);
    let text = text.to_string();
    let outcome =
        tokio::task::spawn_blocking(move || services.intake.handle_text(key, &text)).await?;

    match outcome {
        Ok(IntakeOutcome::AwaitingPhone { full_name }) => {
            bot.send_message(msg.chat.id, format_phone_prompt(&full_name))
                .await?;
        }
        Ok(IntakeOutcome::InvalidName) => {
            bot.send_message(msg.chat.id, "Please enter the customer's Full Name:")
                .await?;
        }
        Ok(IntakeOutcome::InvalidPhone) => {
            bot.send_message(msg.chat.id, format_invalid_phone()).await?;
        }
        Ok(IntakeOutcome::Reported { issue_type, report }) => {
            bot.send_message(msg.chat.id, format_report_confirmation(&issue_type, &report))
                .reply_markup(create_main_keyboard())
                .await?;
        }
        Ok(IntakeOutcome::AwaitingName { .. }) | Ok(IntakeOutcome::NotInFlow) => {
            warn!(chat_id = %key, "Intake input arrived outside an intake step");
        }
        Err(e) => send_failure(bot, msg, &e).await?,
    }

    Ok(())
}

async fn handle_lookup_input(
    bot: &Bot,
    msg: &Message,
    text: &str,
    services: Arc<HelpdeskServices>,
) -> Result<()> {
    let key = SessionKey(msg.chat.id.0);
    let query = text.to_string();
    let outcome =
        tokio::task::spawn_blocking(move || services.lookup.handle_text(key, &query)).await?;

    match outcome {
        Ok(LookupOutcome::TooShort) => {
            bot.send_message(msg.chat.id, format_search_too_short())
                .await?;
        }
        Ok(LookupOutcome::Found {
            category,
            search_key,
            record,
        }) => {
            bot.send_message(msg.chat.id, format_lookup_found(&search_key, &record))
                .reply_markup(create_search_again_keyboard(&category))
                .await?;
        }
        Ok(LookupOutcome::NotFound { category, query }) => {
            bot.send_message(msg.chat.id, format_lookup_not_found(&query))
                .reply_markup(create_search_again_keyboard(&category))
                .await?;
        }
        Ok(LookupOutcome::AwaitingPhone { .. }) | Ok(LookupOutcome::NotInFlow) => {
            warn!(chat_id = %key, "Lookup input arrived outside a lookup step");
        }
        Err(e) => send_failure(bot, msg, &e).await?,
    }

    Ok(())
}

async fn send_failure(bot: &Bot, msg: &Message, err: &HelpdeskError) -> Result<()> {
    error!(chat_id = %msg.chat.id, error = %err, storage = err.is_storage_failure(), "Helpdesk operation failed");
    bot.send_message(msg.chat.id, format_storage_failure())
        .await?;
    Ok(())
}

async fn handle_text_message(
    bot: &Bot,
    msg: &Message,
    text: &str,
    services: Arc<HelpdeskServices>,
) -> Result<()> {
    debug!(chat_id = %msg.chat.id, message_length = text.len(), "Received text message");

    // Menu labels and commands always win over an active flow
    if let Some(action) = MenuAction::from_label(text) {
        return handle_menu_action(bot, msg, action, &services).await;
    }

    let state = services.sessions.get(SessionKey(msg.chat.id.0));
    if state.is_intake() {
        handle_intake_input(bot, msg, text, services).await
    } else if state.is_lookup() {
        handle_lookup_input(bot, msg, text, services).await
    } else if let Some(action) = MenuAction::from_idle_text(text) {
        handle_menu_action(bot, msg, action, &services).await
    } else if msg.chat.is_private() {
        bot.send_message(msg.chat.id, "Select an option from the menu below.")
            .reply_markup(create_main_keyboard())
            .await?;
        Ok(())
    } else {
        Ok(())
    }
}

async fn handle_document_message(bot: &Bot, msg: &Message) -> Result<()> {
    let Some(file_name) = msg.document().and_then(|doc| doc.file_name.as_deref()) else {
        return Ok(());
    };
    let Some(extension) = blocked_extension(file_name) else {
        return Ok(());
    };

    let sender = msg
        .from
        .as_ref()
        .map(|user| user.username.clone().unwrap_or_else(|| user.first_name.clone()))
        .unwrap_or_default();
    warn!(chat_id = %msg.chat.id, sender = %sender, extension, "Removing blocked attachment");

    if let Err(e) = bot.delete_message(msg.chat.id, msg.id).await {
        error!(chat_id = %msg.chat.id, error = %e, "Failed to delete blocked attachment");
    }
    bot.send_message(msg.chat.id, security_notice(extension))
        .await?;

    Ok(())
}

pub async fn message_handler(
    bot: Bot,
    msg: Message,
    services: Arc<HelpdeskServices>,
) -> Result<()> {
    if let Some(text) = msg.text() {
        handle_text_message(&bot, &msg, text, services).await?;
    } else if msg.document().is_some() {
        handle_document_message(&bot, &msg).await?;
    }

    Ok(())
}

/// Whether the bot itself is among the members just added to a chat
pub fn bot_was_added(members: impl IntoIterator<Item = UserId>, bot_id: UserId) -> bool {
    members.into_iter().any(|id| id == bot_id)
}

/// Greet a group the bot has just been added to
pub async fn new_members_handler(bot: Bot, msg: Message) -> Result<()> {
    let Some(members) = msg.new_chat_members() else {
        return Ok(());
    };

    let me = bot.get_me().await?;
    if !bot_was_added(members.iter().map(|member| member.id), me.id) {
        return Ok(());
    }

    info!(chat_id = %msg.chat.id, title = ?msg.chat.title(), "Bot added to group");
    bot.send_message(msg.chat.id, format_group_welcome())
        .reply_markup(create_main_keyboard())
        .await?;

    Ok(())
}
