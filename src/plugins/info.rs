//! /info, /id and /admins.

use teloxide::prelude::*;
use teloxide::types::{ChatMemberStatus, UserId};
use tracing::debug;

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::error::CommandError;
use crate::events::send_member_card;
use crate::permissions::human_admins;
use crate::utils::{Target, html_escape, mention_html, reply_error, reply_html, resolve_target};

fn status_label(status: ChatMemberStatus) -> &'static str {
    match status {
        ChatMemberStatus::Owner => "creator",
        ChatMemberStatus::Administrator => "administrator",
        ChatMemberStatus::Member => "member",
        ChatMemberStatus::Restricted => "restricted",
        ChatMemberStatus::Left => "left",
        ChatMemberStatus::Banned => "kicked",
    }
}

fn user_card(user_id: UserId, first_name: &str, username: Option<&str>, status: Option<&str>) -> String {
    let mut text = format!(
        "👤 <b>User Info</b>\n• Name: {}\n• Username: @{}\n• ID: <code>{}</code>\n",
        mention_html(user_id.0, first_name),
        html_escape(username.unwrap_or("None")),
        user_id
    );
    if let Some(status) = status {
        text.push_str(&format!("• Status: {}\n", status));
    }
    text
}

/// Handle /info command.
///
/// Without a target the card describes the invoker.
pub async fn info_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let has_args = msg.text().is_some_and(|t| t.split_whitespace().nth(1).is_some());

    let target = match resolve_target(&bot, &msg, &state).await {
        Some(target) => target,
        None if has_args => return reply_error(&bot, &msg, CommandError::UserNotFound).await,
        None => {
            let Some(user) = msg.from.as_ref() else {
                return Ok(());
            };
            Target {
                id: user.id,
                first_name: user.first_name.clone(),
                consumed: 0,
            }
        }
    };

    let mut username = msg
        .from
        .as_ref()
        .filter(|u| u.id == target.id)
        .and_then(|u| u.username.clone());
    let mut status = None;

    if !msg.chat.is_private() {
        match bot.get_chat_member(msg.chat.id, target.id).await {
            Ok(member) => {
                status = Some(status_label(member.status()));
                username = username.or(member.user.username);
            }
            Err(e) => debug!("Member lookup for {} in chat {} failed: {}", target.id, msg.chat.id, e),
        }
    }

    if username.is_none()
        && let Some(record) = state.users.get_by_id(target.id.0).await?
    {
        username = record.username_display;
    }

    let card = user_card(target.id, &target.first_name, username.as_deref(), status);
    send_member_card(&bot, msg.chat.id, target.id, card, None).await
}

/// Handle /id command.
pub async fn id_command(bot: ThrottledBot, msg: Message, _state: AppState) -> anyhow::Result<()> {
    let mut text = format!("🆔 <b>Chat ID:</b> <code>{}</code>", msg.chat.id);
    if !msg.chat.is_private() {
        text.push_str(&format!(
            "\n👥 <b>Title:</b> {}",
            html_escape(msg.chat.title().unwrap_or_default())
        ));
    }

    if let Some(user) = msg.reply_to_message().and_then(|r| r.from.as_ref()) {
        text.push_str(&format!("\n\n👤 <b>User ID:</b> <code>{}</code>", user.id));
        if let Some(username) = &user.username {
            text.push_str(&format!("\n📱 <b>Username:</b> @{}", username));
        }
    }

    reply_html(&bot, &msg, text).await
}

/// Handle /admins command.
pub async fn admins_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let admins = state.permissions.admins(msg.chat.id).await?;
    let list: Vec<String> = human_admins(&admins)
        .map(|member| format!("• {}", mention_html(member.user.id.0, &member.user.first_name)))
        .collect();

    reply_html(
        &bot,
        &msg,
        format!(
            "👮‍♂️ <b>Admins in {}</b> 👮‍♂️\n\n{}",
            html_escape(msg.chat.title().unwrap_or_default()),
            list.join("\n")
        ),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_card_without_username() {
        let card = user_card(UserId(42), "Ann", None, None);
        assert!(card.contains("@None"));
        assert!(card.contains("<code>42</code>"));
        assert!(!card.contains("Status"));
    }

    #[test]
    fn test_user_card_in_group() {
        let card = user_card(UserId(42), "Ann", Some("ann"), Some(status_label(ChatMemberStatus::Owner)));
        assert!(card.contains("@ann"));
        assert!(card.ends_with("• Status: creator\n"));
    }
}
