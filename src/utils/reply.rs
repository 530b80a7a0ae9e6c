//! Reply helper utilities.
//!
//! Every command answer is a reply to the command message.

use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardMarkup, ParseMode, ReplyParameters};

use crate::bot::dispatcher::ThrottledBot;
use crate::error::CommandError;

/// Reply with plain text.
pub async fn reply_text(bot: &ThrottledBot, msg: &Message, text: impl Into<String>) -> anyhow::Result<()> {
    bot.send_message(msg.chat.id, text)
        .reply_parameters(ReplyParameters::new(msg.id))
        .await?;
    Ok(())
}

/// Reply with HTML text.
pub async fn reply_html(bot: &ThrottledBot, msg: &Message, text: impl Into<String>) -> anyhow::Result<()> {
    bot.send_message(msg.chat.id, text)
        .parse_mode(ParseMode::Html)
        .reply_parameters(ReplyParameters::new(msg.id))
        .await?;
    Ok(())
}

/// Reply with HTML text and an inline keyboard.
pub async fn reply_with_keyboard(
    bot: &ThrottledBot,
    msg: &Message,
    text: impl Into<String>,
    keyboard: InlineKeyboardMarkup,
) -> anyhow::Result<()> {
    bot.send_message(msg.chat.id, text)
        .parse_mode(ParseMode::Html)
        .reply_markup(keyboard)
        .reply_parameters(ReplyParameters::new(msg.id))
        .await?;
    Ok(())
}

/// Tell the invoker why their command was refused.
pub async fn reply_error(bot: &ThrottledBot, msg: &Message, err: CommandError) -> anyhow::Result<()> {
    reply_text(bot, msg, err.to_string()).await
}
