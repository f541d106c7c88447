//! Callback Handler module for processing inline keyboard callback queries

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::CallbackQuery;
use tracing::{debug, error};

use crate::helpdesk::HelpdeskServices;
use crate::session::SessionKey;

use super::ui_builder::{format_search_prompt, parse_search_callback};

/// Handle callback queries from inline keyboards
///
/// The only inline button is "search again", which re-enters the lookup for
/// the category it carries.
pub async fn callback_handler(
    bot: Bot,
    q: CallbackQuery,
    services: Arc<HelpdeskServices>,
) -> Result<()> {
    debug!(user_id = %q.from.id, data = ?q.data, "Received callback query from user");

    bot.answer_callback_query(q.id.clone()).await?;

    let Some(category) = q.data.as_deref().and_then(parse_search_callback) else {
        return Ok(());
    };
    let Some(message) = &q.message else {
        return Ok(());
    };

    let chat = message.chat();
    if !chat.is_private() {
        return Ok(());
    }

    services.lookup.begin(SessionKey(chat.id.0), category.label());

    let prompt = format_search_prompt(category.label());
    if let Err(e) = bot.edit_message_text(chat.id, message.id(), prompt.clone()).await {
        error!(user_id = %q.from.id, error = %e, "Failed to edit search prompt, sending a new one");
        bot.send_message(chat.id, prompt).await?;
    }

    Ok(())
}
