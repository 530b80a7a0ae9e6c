//! /start, /help and the start card.

use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use url::Url;

use super::rules;
use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::config::Config;
use crate::utils::{html_escape, reply_text, reply_with_keyboard};

/// Rights requested when the bot is added to a group.
const ADMIN_RIGHTS: &str = "delete_messages+manage_video_chats+pin_messages+invite_users";

const HELP_TEMPLATE: &str = "\
🌙 <b>{bot} - Help Menu</b> 🌙

✨ <b>User Commands</b>
/start - Start the bot and get the welcome menu
/help - Show this help menu
/info - Get info about yourself or another user
/id - Get chat and user IDs
/afk &lt;reason&gt; - Set your AFK status
/endafk - Remove your AFK status
/report - Report a message to admins
/rules - View group rules
/notes - List saved notes
/filters - List active filters
/get &lt;name&gt; - Retrieve a saved note
/admins - List group administrators
/ping - Check if the bot is online

👮‍♂️ <b>Admin Commands</b>
/warn &lt;user&gt; &lt;reason&gt; - Warn a user
/unwarn &lt;user&gt; - Remove warnings
/ban &lt;user&gt; &lt;reason&gt; - Ban a user
/unban &lt;user&gt; - Unban a user
/mute &lt;user&gt; &lt;time&gt; &lt;reason&gt; - Mute a user
/unmute &lt;user&gt; - Unmute a user
/kick &lt;user&gt; &lt;reason&gt; - Kick a user
/pin - Pin a replied message
/unpin - Unpin the pinned message
/setwelcome &lt;message&gt; - Set custom welcome message
/setgoodbye &lt;message&gt; - Set custom goodbye message
/clean &lt;amount&gt; - Delete recent messages
/setrules &lt;text&gt; - Set group rules
/save &lt;name&gt; - Save a note
/clear &lt;name&gt; - Delete a note
/filter &lt;keyword&gt; - Add a filter
/stop &lt;keyword&gt; - Remove a filter
/lock &lt;type&gt; - Lock chat features (messages, media, stickers, polls, links, bots)
/unlock &lt;type&gt; - Unlock chat features
/promote &lt;user&gt; - Promote a user to admin
/demote &lt;user&gt; - Demote a user from admin
/purge - Delete messages from replied message

👑 <b>Owner Commands (DM only)</b>
/stats - View bot statistics
/broadcast - Broadcast a message to all users and groups
/gban &lt;user_id&gt; &lt;reason&gt; - Globally ban a user
/ungban &lt;user_id&gt; - Remove global ban
/post - Post a message to all groups
/update - Update bot data
/logs - View error logs

📢 Join our support group: {support}";

pub fn help_text(config: &Config) -> String {
    HELP_TEMPLATE
        .replace("{bot}", &html_escape(&config.bot_name))
        .replace("{support}", &html_escape(&config.support_chat_link))
}

pub fn start_text(config: &Config) -> String {
    format!(
        "🌙 <b>Welcome to {}!</b> 🌙\n\n\
         I'm your ultimate group management bot, packed with powerful features to keep your chats organized and fun!\n\n\
         👉 <b>Add me to your group</b> to unlock moderation tools, custom welcomes, filters, and more!\n\
         👉 Join our <b>support group</b> for updates and help.\n\
         👉 Check out my <b>commands</b> to get started!",
        html_escape(&config.bot_name)
    )
}

/// Lay buttons out two per row.
pub fn two_columns(buttons: Vec<InlineKeyboardButton>) -> InlineKeyboardMarkup {
    let rows: Vec<Vec<InlineKeyboardButton>> = buttons.chunks(2).map(<[_]>::to_vec).collect();
    InlineKeyboardMarkup::new(rows)
}

pub fn add_to_group_link(bot_username: &str) -> String {
    format!("https://t.me/{}?startgroup=s&admin={}", bot_username, ADMIN_RIGHTS)
}

/// Start card buttons. The owner panel only shows for the owner in DM.
pub fn start_keyboard(state: &AppState, with_owner_panel: bool) -> anyhow::Result<InlineKeyboardMarkup> {
    let mut buttons = vec![
        InlineKeyboardButton::url("➕ Add to Group", Url::parse(&add_to_group_link(&state.bot_username))?),
        InlineKeyboardButton::url("🚀 Support", Url::parse(&state.config.support_chat_link)?),
        InlineKeyboardButton::callback("📜 Commands", "user_commands"),
    ];
    if with_owner_panel {
        buttons.push(InlineKeyboardButton::callback("👑 Owner Panel", "owner_panel"));
    }
    Ok(two_columns(buttons))
}

pub fn back_to_start_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new([[InlineKeyboardButton::callback("🔙 Back to Start", "back_to_start")]])
}

/// Handle /start command, with optional deep-link payload.
pub async fn start_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    payload: String,
) -> anyhow::Result<()> {
    if let Some(user) = msg.from.as_ref() {
        state.users.upsert(user).await?;
    }

    let payload = payload.trim();
    if let Some(chat_id) = payload.strip_prefix("rules_") {
        return rules::rules_deeplink(&bot, &msg, &state, chat_id).await;
    }
    if payload == "help" {
        return send_help(&bot, &msg, &state).await;
    }

    let with_owner_panel =
        msg.chat.is_private() && msg.from.as_ref().is_some_and(|u| state.is_owner(u.id));
    let keyboard = start_keyboard(&state, with_owner_panel)?;

    reply_with_keyboard(&bot, &msg, start_text(&state.config), keyboard).await
}

async fn send_help(bot: &ThrottledBot, msg: &Message, state: &AppState) -> anyhow::Result<()> {
    reply_with_keyboard(bot, msg, help_text(&state.config), back_to_start_keyboard()).await
}

/// Handle /help command. Groups get a button into the DM.
pub async fn help_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    if msg.chat.is_private() {
        return send_help(&bot, &msg, &state).await;
    }

    let link = Url::parse(&format!("https://t.me/{}?start=help", state.bot_username))?;
    let keyboard = InlineKeyboardMarkup::new([[InlineKeyboardButton::url("📜 View Commands in DM", link)]]);

    bot.send_message(msg.chat.id, "Please use /help in my DM to view all commands!")
        .reply_markup(keyboard)
        .reply_parameters(teloxide::types::ReplyParameters::new(msg.id))
        .await?;
    Ok(())
}

/// Handle /ping command.
pub async fn ping_command(bot: ThrottledBot, msg: Message, _state: AppState) -> anyhow::Result<()> {
    reply_text(&bot, &msg, "🏓 Pong! I'm alive and ready to assist!").await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_columns() {
        let buttons = (0..5)
            .map(|i| InlineKeyboardButton::callback(i.to_string(), i.to_string()))
            .collect();
        let markup = two_columns(buttons);
        let widths: Vec<usize> = markup.inline_keyboard.iter().map(Vec::len).collect();
        assert_eq!(widths, vec![2, 2, 1]);
    }

    #[test]
    fn test_add_to_group_link_parses() {
        let link = add_to_group_link("moon_bot");
        assert!(link.starts_with("https://t.me/moon_bot?startgroup=s&admin="));
        assert!(Url::parse(&link).is_ok());
    }
}
