//! Rules command handlers.

use teloxide::prelude::*;
use tracing::info;

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::error::CommandError;
use crate::utils::{command_tail, html_escape, reply_error, reply_html, reply_text};

fn rules_card(heading: &str, rules: &str) -> String {
    format!("📜 <b>{}</b>\n\n{}", heading, html_escape(rules))
}

/// Handle /rules command.
pub async fn rules_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    match state.settings.rules(msg.chat.id.0).await? {
        Some(rules) => reply_html(&bot, &msg, rules_card("Group Rules:", &rules)).await,
        None => reply_text(&bot, &msg, "No rules set for this group.").await,
    }
}

/// Handle /setrules command.
pub async fn setrules_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let rules = command_tail(msg.text().unwrap_or_default());
    if rules.is_empty() {
        return reply_error(&bot, &msg, CommandError::Usage("/setrules <rules text>")).await;
    }

    state.settings.set_rules(msg.chat.id.0, rules).await?;
    info!("Rules updated in chat {}", msg.chat.id);
    reply_text(&bot, &msg, "Rules updated!").await
}

/// `/start rules_<chat_id>`: a group's rules, shown in DM.
pub async fn rules_deeplink(
    bot: &ThrottledBot,
    msg: &Message,
    state: &AppState,
    chat_id: &str,
) -> anyhow::Result<()> {
    let Ok(chat_id) = chat_id.parse::<i64>() else {
        return reply_text(bot, msg, "Invalid rules link.").await;
    };

    let Some(rules) = state.settings.rules(chat_id).await? else {
        return reply_text(bot, msg, "No rules set for this group.").await;
    };

    let title = bot
        .get_chat(ChatId(chat_id))
        .await
        .ok()
        .and_then(|chat| chat.title().map(str::to_string))
        .unwrap_or_else(|| "this group".to_string());

    reply_html(
        bot,
        msg,
        rules_card(&format!("Rules for {}:", html_escape(&title)), &rules),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rules_card_escapes_body() {
        assert_eq!(
            rules_card("Group Rules:", "1. No <spam>"),
            "📜 <b>Group Rules:</b>\n\n1. No &lt;spam&gt;"
        );
    }
}
