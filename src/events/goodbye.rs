//! Goodbye event handler.

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::ChatMemberUpdated;
use tracing::debug;

use super::send_member_card;
use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::utils::{format_template, html_escape, mention_html};

/// Returns the handler for member leave events.
pub fn handler() -> UpdateHandler<anyhow::Error> {
    dptree::filter(is_member_leaving).endpoint(goodbye_handler)
}

/// Left or kicked after having been present.
fn is_member_leaving(update: ChatMemberUpdated) -> bool {
    update.old_chat_member.is_present() && !update.new_chat_member.is_present()
}

async fn goodbye_handler(
    bot: ThrottledBot,
    update: ChatMemberUpdated,
    state: AppState,
) -> anyhow::Result<()> {
    let chat = &update.chat;
    let user = &update.new_chat_member.user;

    if user.id == state.bot_id {
        return Ok(());
    }
    debug!("Member {} left chat {}", user.id, chat.id);

    let chat_title = chat.title().unwrap_or_default();
    let template = state
        .settings
        .goodbye_or(chat.id.0, &state.config.default_goodbye)
        .await?;

    let text = format!(
        "👋 <b>Goodbye from {}!</b> 👋\n\n\
         👤 <b>Name:</b> {}\n\
         📱 <b>Username:</b> @{}\n\
         🆔 <b>ID:</b> <code>{}</code>\n\n\
         {}",
        html_escape(chat_title),
        mention_html(user.id.0, &user.first_name),
        user.username.as_deref().unwrap_or("None"),
        user.id,
        format_template(&template, user.id.0, &user.first_name, chat_title),
    );

    send_member_card(&bot, chat.id, user.id, text, None).await
}
