//! Pin commands.

use teloxide::prelude::*;
use tracing::info;

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::utils::reply_text;

/// Handle /pin command (reply to the message to pin).
pub async fn pin_command(bot: ThrottledBot, msg: Message, _state: AppState) -> anyhow::Result<()> {
    let Some(reply) = msg.reply_to_message() else {
        return reply_text(&bot, &msg, "Please reply to a message to pin it.").await;
    };

    match bot.pin_chat_message(msg.chat.id, reply.id).await {
        Ok(_) => {
            info!("Pinned message {} in chat {}", reply.id, msg.chat.id);
            reply_text(&bot, &msg, "📌 Message pinned!").await
        }
        Err(e) => reply_text(&bot, &msg, format!("Failed to pin message: {}", e)).await,
    }
}

/// Handle /unpin command (most recent pin).
pub async fn unpin_command(bot: ThrottledBot, msg: Message, _state: AppState) -> anyhow::Result<()> {
    match bot.unpin_chat_message(msg.chat.id).await {
        Ok(_) => reply_text(&bot, &msg, "📌 Message unpinned!").await,
        Err(e) => reply_text(&bot, &msg, format!("Failed to unpin message: {}", e)).await,
    }
}
