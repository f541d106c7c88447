use anyhow::{Context, Result};
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use anbesa_helper::bot::{callback_handler, message_handler, new_members_handler};
use anbesa_helper::config::{BotConfig, LogFormat};
use anbesa_helper::helpdesk::HelpdeskServices;

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormat::Text => subscriber.init(),
        LogFormat::Json => subscriber.json().init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration (reads .env when present)
    let config = BotConfig::from_env().context("Failed to load configuration")?;

    init_tracing(config.log_format);

    info!(
        reports_dir = %config.reports_dir.display(),
        solved_dir = %config.solved_dir.display(),
        "Starting AnbesaPlus Helper Bot"
    );

    let services = Arc::new(HelpdeskServices::new(
        &config.reports_dir,
        &config.solved_dir,
    ));

    let bot = Bot::new(config.bot_token);

    info!("Bot initialized, starting dispatcher");

    let handler = dptree::entry()
        .branch(
            Update::filter_message()
                .filter(|msg: Message| msg.new_chat_members().is_some())
                .endpoint(new_members_handler),
        )
        .branch(Update::filter_message().endpoint(message_handler))
        .branch(Update::filter_callback_query().endpoint(callback_handler));

    // Updates of one chat are handled one at a time, which keeps session
    // transitions sequential
    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![services])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
