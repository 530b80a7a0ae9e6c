//! Welcome event handler.
//!
//! Greets new members, or bans them on sight when they are globally banned.

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::{ChatMemberUpdated, InlineKeyboardButton, InlineKeyboardMarkup};
use tracing::{debug, info, warn};
use url::Url;

use super::send_member_card;
use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::utils::{format_template, html_escape, mention_html};

/// Returns the handler for new member events.
pub fn handler() -> UpdateHandler<anyhow::Error> {
    dptree::filter(is_new_member).endpoint(welcome_handler)
}

/// Check if this is a new member joining.
fn is_new_member(update: ChatMemberUpdated) -> bool {
    let old = &update.old_chat_member;
    let new = &update.new_chat_member;

    !old.is_present() && new.is_present() && !new.user.is_bot
}

/// Deep link that opens this chat's rules in the bot's DM.
pub fn rules_link(bot_username: &str, chat_id: ChatId) -> String {
    format!("https://t.me/{}?start=rules_{}", bot_username, chat_id.0)
}

async fn welcome_handler(
    bot: ThrottledBot,
    update: ChatMemberUpdated,
    state: AppState,
) -> anyhow::Result<()> {
    let chat = &update.chat;
    let user = &update.new_chat_member.user;

    if let Some(ban) = state.gbans.get(user.id.0).await? {
        info!(
            "Globally banned user {} joined chat {}, banning ({})",
            user.id, chat.id, ban.reason
        );
        if let Err(e) = bot.ban_chat_member(chat.id, user.id).await {
            warn!("Could not enforce global ban in chat {}: {}", chat.id, e);
        }
        return Ok(());
    }

    debug!("New member {} joined chat {}", user.id, chat.id);
    state.users.upsert(user).await?;

    let chat_title = chat.title().unwrap_or_default();
    let template = state
        .settings
        .welcome_or(chat.id.0, &state.config.default_welcome)
        .await?;

    let text = format!(
        "🌙 <b>Welcome to {}!</b> 🌙\n\n\
         👤 <b>Name:</b> {}\n\
         📱 <b>Username:</b> @{}\n\
         🆔 <b>ID:</b> <code>{}</code>\n\
         📅 <b>Join Date:</b> {}\n\n\
         {}",
        html_escape(chat_title),
        mention_html(user.id.0, &user.first_name),
        user.username.as_deref().unwrap_or("None"),
        user.id,
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S"),
        format_template(&template, user.id.0, &user.first_name, chat_title),
    );

    let rules = Url::parse(&rules_link(&state.bot_username, chat.id))?;
    let keyboard = InlineKeyboardMarkup::new([[InlineKeyboardButton::url("📜 Rules", rules)]]);

    send_member_card(&bot, chat.id, user.id, text, Some(keyboard)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rules_link() {
        assert_eq!(
            rules_link("moon_bot", ChatId(-1001234)),
            "https://t.me/moon_bot?start=rules_-1001234"
        );
        assert!(Url::parse(&rules_link("moon_bot", ChatId(-1001234))).is_ok());
    }
}
