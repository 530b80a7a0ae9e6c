//! Admin management commands.
//!
//! Commands for promoting and demoting group administrators.

use teloxide::prelude::*;
use tracing::info;

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::utils::{SelfCheck, reply_html, reply_text, require_target};

/// Handle /promote command.
///
/// Grants delete, restrict, pin and invite rights.
pub async fn promote_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let Some(target) = require_target(
        &bot,
        &msg,
        &state,
        "/promote <user> or reply to a message with /promote",
        SelfCheck::Bot("promote"),
    )
    .await?
    else {
        return Ok(());
    };

    let result = bot
        .promote_chat_member(msg.chat.id, target.id)
        .can_delete_messages(true)
        .can_restrict_members(true)
        .can_pin_messages(true)
        .can_invite_users(true)
        .await;

    match result {
        Ok(_) => {
            info!("Promoted user {} in chat {}", target.id, msg.chat.id);
            reply_html(
                &bot,
                &msg,
                format!("👤 {} has been promoted to admin.", target.mention()),
            )
            .await
        }
        Err(e) => reply_text(&bot, &msg, format!("Failed to promote user: {}", e)).await,
    }
}

/// Handle /demote command.
pub async fn demote_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let Some(target) = require_target(
        &bot,
        &msg,
        &state,
        "/demote <user> or reply to a message with /demote",
        SelfCheck::Off,
    )
    .await?
    else {
        return Ok(());
    };

    let result = bot
        .promote_chat_member(msg.chat.id, target.id)
        .can_delete_messages(false)
        .can_restrict_members(false)
        .can_pin_messages(false)
        .can_invite_users(false)
        .await;

    match result {
        Ok(_) => {
            info!("Demoted user {} in chat {}", target.id, msg.chat.id);
            reply_html(
                &bot,
                &msg,
                format!("👤 {} has been demoted from admin.", target.mention()),
            )
            .await
        }
        Err(e) => reply_text(&bot, &msg, format!("Failed to demote user: {}", e)).await,
    }
}
