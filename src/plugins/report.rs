//! /report: point the admins at a message.

use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use url::Url;

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::permissions::human_admins;
use crate::utils::{mention_html, message_link, reply_text, reply_with_keyboard};

/// Handle /report command. Must reply to the reported message.
pub async fn report_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let Some(reported) = msg.reply_to_message() else {
        return reply_text(&bot, &msg, "Please reply to a message to report it.").await;
    };
    let (Some(reporter), Some(offender)) = (msg.from.as_ref(), reported.from.as_ref()) else {
        return Ok(());
    };

    let admins = state.permissions.admins(msg.chat.id).await?;
    let mentions: Vec<String> = human_admins(&admins)
        .map(|member| mention_html(member.user.id.0, &member.user.first_name))
        .collect();

    let link = Url::parse(&message_link(msg.chat.id.0, reported.id.0))?;
    let keyboard = InlineKeyboardMarkup::new([[InlineKeyboardButton::url("🔗 View Message", link)]]);

    let text = format!(
        "🚨 {} reported a message from {}.\n\nAdmins: {}",
        mention_html(reporter.id.0, &reporter.first_name),
        mention_html(offender.id.0, &offender.first_name),
        mentions.join(" ")
    );

    reply_with_keyboard(&bot, &msg, text, keyboard).await
}
