//! Filter commands: keyword-triggered auto replies.

use teloxide::prelude::*;
use tracing::info;

use super::notes::{bullet_list, captured_content};
use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::database::{Filter, normalize_key};
use crate::error::CommandError;
use crate::utils::{command_args, reply_error, reply_html, reply_text};

/// Handle /filter command.
///
/// Usage: reply to a message with /filter <keyword>
pub async fn filter_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let usage = CommandError::Usage("Reply to a message with /filter <keyword>");
    let Some(keyword) = command_args(msg.text().unwrap_or_default())
        .first()
        .map(|k| normalize_key(k))
    else {
        return reply_error(&bot, &msg, usage).await;
    };
    let Some(body) = captured_content(&msg) else {
        return reply_error(&bot, &msg, usage).await;
    };

    state
        .filters
        .save(&Filter::new(msg.chat.id.0, keyword.clone(), body))
        .await?;
    info!("Added filter '{}' in chat {}", keyword, msg.chat.id);

    reply_text(&bot, &msg, format!("Filter '{}' added!", keyword)).await
}

/// Handle /stop command.
pub async fn stop_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let Some(keyword) = command_args(msg.text().unwrap_or_default())
        .first()
        .map(|k| normalize_key(k))
    else {
        return reply_error(&bot, &msg, CommandError::Usage("/stop <keyword>")).await;
    };

    if state.filters.delete(msg.chat.id.0, &keyword).await? {
        info!("Removed filter '{}' in chat {}", keyword, msg.chat.id);
        reply_text(&bot, &msg, format!("Filter '{}' removed!", keyword)).await
    } else {
        reply_text(&bot, &msg, "Filter not found!").await
    }
}

/// Handle /filters command.
pub async fn filters_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let filters = state.filters.list(msg.chat.id.0).await?;
    if filters.is_empty() {
        return reply_text(&bot, &msg, "No filters in this chat!").await;
    }

    let keywords: Vec<String> = filters.into_iter().map(|f| f.keyword).collect();
    reply_html(
        &bot,
        &msg,
        format!("🔍 <b>Filters in this chat:</b>\n\n{}", bullet_list(&keywords)),
    )
    .await
}
