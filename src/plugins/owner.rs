//! Owner tooling: stats, chat refresh, logs and the owner panel.

use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use tracing::info;

use super::start::two_columns;
use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::database::ChatRecord;
use crate::utils::{FanoutReport, fanout, html_escape, reply_html, reply_text};

pub const LOGS_TEXT: &str = "📜 Logs are sent to your DM when errors occur.";
pub const GBAN_HINT: &str = "🚫 Please use /gban <user_id> <reason> to globally ban a user.";
pub const POST_HINT: &str = "📝 Please use /post by replying to a message to post to all groups.";
pub const BROADCAST_HINT: &str = "📢 Please use /broadcast by replying to a message to broadcast it.";

fn chat_line(chat: &ChatRecord) -> String {
    let mut line = format!("• {} (ID: {})", html_escape(&chat.chat_title), chat.chat_id);
    if let Some(link) = chat.public_link() {
        line.push_str(&format!(" Link: {}", link));
    }
    line
}

/// Bot-wide counts plus every known group.
pub async fn stats_text(state: &AppState) -> anyhow::Result<String> {
    let chat_count = state.chats.count().await?;
    let user_count = state.users.count().await?;
    let gban_count = state.gbans.count().await?;
    let chats = state.chats.all().await?;

    let listing: Vec<String> = chats.iter().map(chat_line).collect();

    Ok(format!(
        "📊 <b>Bot Statistics</b>\n\n\
         • Groups: <code>{}</code>\n\
         • Users: <code>{}</code>\n\
         • GBanned Users: <code>{}</code>\n\n\
         <b>Groups:</b>\n{}\n\n\
         <b>Version:</b> {}",
        chat_count,
        user_count,
        gban_count,
        listing.join("\n"),
        env!("CARGO_PKG_VERSION")
    ))
}

/// Re-fetch every known chat and store its current title and username.
pub async fn refresh_chats(bot: &ThrottledBot, state: &AppState) -> anyhow::Result<FanoutReport> {
    let ids: Vec<i64> = state.chats.all().await?.iter().map(|c| c.chat_id).collect();

    let report = fanout(ids, |id| async move {
        let chat = bot.get_chat(ChatId(id)).await?;
        let record = ChatRecord::new(
            id,
            chat.title().unwrap_or_default(),
            chat.username().map(str::to_string),
        );
        state.chats.upsert(&record).await
    })
    .await;

    info!("Refreshed {} chats, {} unreachable", report.success, report.failed);
    Ok(report)
}

pub fn refresh_text(report: FanoutReport) -> String {
    format!(
        "🔄 Bot data updated successfully!\n✅ Refreshed: {}\n❌ Unreachable: {}",
        report.success, report.failed
    )
}

pub fn panel_text(state: &AppState) -> String {
    format!(
        "👑 <b>Owner Panel - {}</b> 👑\n\nYou have access to special owner commands:",
        html_escape(&state.config.bot_name)
    )
}

pub fn panel_keyboard() -> InlineKeyboardMarkup {
    let mut markup = two_columns(vec![
        InlineKeyboardButton::callback("📊 Stats", "owner_stats"),
        InlineKeyboardButton::callback("📢 Broadcast", "owner_broadcast"),
        InlineKeyboardButton::callback("🚫 GBan User", "owner_gban"),
        InlineKeyboardButton::callback("📝 Post to Groups", "owner_post"),
        InlineKeyboardButton::callback("🔄 Update Bot", "owner_update"),
        InlineKeyboardButton::callback("📜 Logs", "owner_logs"),
    ]);
    markup
        .inline_keyboard
        .push(vec![InlineKeyboardButton::callback("🔙 Back to Start", "back_to_start")]);
    markup
}

pub fn back_to_panel_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new([[InlineKeyboardButton::callback("🔙 Back", "owner_back")]])
}

/// Handle /stats command.
pub async fn stats_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    reply_html(&bot, &msg, stats_text(&state).await?).await
}

/// Handle /update command.
pub async fn update_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let report = refresh_chats(&bot, &state).await?;
    reply_text(&bot, &msg, refresh_text(report)).await
}

/// Handle /logs command.
pub async fn logs_command(bot: ThrottledBot, msg: Message, _state: AppState) -> anyhow::Result<()> {
    reply_text(&bot, &msg, LOGS_TEXT).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_line_links_public_groups() {
        let public = ChatRecord::new(-1001, "Rust <Fans>", Some("rustfans".to_string()));
        assert_eq!(
            chat_line(&public),
            "• Rust &lt;Fans&gt; (ID: -1001) Link: https://t.me/rustfans"
        );

        let private = ChatRecord::new(-1002, "Secret", None);
        assert_eq!(chat_line(&private), "• Secret (ID: -1002)");
    }

    #[test]
    fn test_panel_layout() {
        let markup = panel_keyboard();
        let widths: Vec<usize> = markup.inline_keyboard.iter().map(Vec::len).collect();
        assert_eq!(widths, vec![2, 2, 2, 1]);
    }

    #[test]
    fn test_refresh_text() {
        let text = refresh_text(FanoutReport { success: 4, failed: 1 });
        assert!(text.contains("Refreshed: 4"));
        assert!(text.contains("Unreachable: 1"));
    }
}
