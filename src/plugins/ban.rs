//! Ban management commands.
//!
//! Commands for banning, unbanning, and kicking users.

use teloxide::prelude::*;
use tracing::info;

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::utils::{SelfCheck, html_escape, reason_after, reply_html, reply_text, require_target};

const NO_REASON: &str = "No reason given";

fn reason(msg: &Message, consumed: usize) -> String {
    reason_after(msg.text().unwrap_or_default(), consumed).unwrap_or_else(|| NO_REASON.to_string())
}

/// Handle /ban command.
pub async fn ban_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let Some(target) = require_target(
        &bot,
        &msg,
        &state,
        "/ban <user> <reason> or reply to a message with /ban <reason>",
        SelfCheck::BotAndInvoker("ban"),
    )
    .await?
    else {
        return Ok(());
    };
    let reason = reason(&msg, target.consumed);

    match bot.ban_chat_member(msg.chat.id, target.id).await {
        Ok(_) => {
            info!("Banned user {} in chat {}", target.id, msg.chat.id);
            reply_html(
                &bot,
                &msg,
                format!(
                    "🚫 {} has been banned.\n📝 Reason: {}",
                    target.mention(),
                    html_escape(&reason)
                ),
            )
            .await
        }
        Err(e) => reply_text(&bot, &msg, format!("Failed to ban user: {}", e)).await,
    }
}

/// Handle /unban command.
pub async fn unban_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let Some(target) = require_target(
        &bot,
        &msg,
        &state,
        "/unban <user> or reply to a message with /unban",
        SelfCheck::Off,
    )
    .await?
    else {
        return Ok(());
    };

    match bot.unban_chat_member(msg.chat.id, target.id).only_if_banned(true).await {
        Ok(_) => {
            info!("Unbanned user {} in chat {}", target.id, msg.chat.id);
            reply_html(&bot, &msg, format!("✅ {} has been unbanned.", target.mention())).await
        }
        Err(e) => reply_text(&bot, &msg, format!("Failed to unban user: {}", e)).await,
    }
}

/// Handle /kick command.
///
/// There is no native kick: ban, then lift the ban straight away.
pub async fn kick_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let Some(target) = require_target(
        &bot,
        &msg,
        &state,
        "/kick <user> <reason> or reply to a message with /kick <reason>",
        SelfCheck::BotAndInvoker("kick"),
    )
    .await?
    else {
        return Ok(());
    };
    let reason = reason(&msg, target.consumed);
    let chat_id = msg.chat.id;

    let kicked = async {
        bot.ban_chat_member(chat_id, target.id).await?;
        bot.unban_chat_member(chat_id, target.id).await?;
        Ok::<_, teloxide::RequestError>(())
    };

    match kicked.await {
        Ok(()) => {
            info!("Kicked user {} from chat {}", target.id, chat_id);
            reply_html(
                &bot,
                &msg,
                format!(
                    "👢 {} has been kicked.\n📝 Reason: {}",
                    target.mention(),
                    html_escape(&reason)
                ),
            )
            .await
        }
        Err(e) => reply_text(&bot, &msg, format!("Failed to kick user: {}", e)).await,
    }
}
