//! Notes: named messages saved per chat.

use teloxide::prelude::*;
use tracing::info;

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::database::{Note, StoredContent, normalize_key};
use crate::error::CommandError;
use crate::utils::{command_args, html_escape, reply_error, reply_html, reply_text, send_stored};

/// Content for /save and /filter: the replied message, else inline text
/// after the name.
pub(crate) fn captured_content(msg: &Message) -> Option<StoredContent> {
    if let Some(reply) = msg.reply_to_message() {
        return StoredContent::from_message(reply);
    }

    let text = msg.text()?;
    let mut words = text.splitn(3, char::is_whitespace);
    let inline = words.nth(2)?.trim();
    (!inline.is_empty()).then(|| StoredContent::text(inline))
}

/// Bulleted list for /notes and /filters.
pub(crate) fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("• {}", html_escape(item)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Handle /save command.
///
/// Usage: reply to a message with /save <name>
pub async fn save_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let usage = CommandError::Usage("Reply to a message with /save <name>");
    let Some(name) = command_args(msg.text().unwrap_or_default()).first().map(|n| normalize_key(n)) else {
        return reply_error(&bot, &msg, usage).await;
    };
    let Some(body) = captured_content(&msg) else {
        return reply_error(&bot, &msg, usage).await;
    };

    state.notes.save(&Note::new(msg.chat.id.0, name.clone(), body)).await?;
    info!("Saved note '{}' in chat {}", name, msg.chat.id);

    reply_text(&bot, &msg, format!("Note '{}' saved!", name)).await
}

/// Handle /get command.
pub async fn get_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let Some(name) = command_args(msg.text().unwrap_or_default()).first().copied() else {
        return reply_error(&bot, &msg, CommandError::Usage("/get <name>")).await;
    };

    match state.notes.get(msg.chat.id.0, name).await? {
        Some(note) => send_stored(&bot, &msg, &note.body).await,
        None => reply_text(&bot, &msg, "Note not found!").await,
    }
}

/// Handle /clear command.
pub async fn clear_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let Some(name) = command_args(msg.text().unwrap_or_default()).first().map(|n| normalize_key(n)) else {
        return reply_error(&bot, &msg, CommandError::Usage("/clear <name>")).await;
    };

    if state.notes.delete(msg.chat.id.0, &name).await? {
        info!("Deleted note '{}' in chat {}", name, msg.chat.id);
        reply_text(&bot, &msg, format!("Note '{}' deleted!", name)).await
    } else {
        reply_text(&bot, &msg, "Note not found!").await
    }
}

/// Handle /notes command.
pub async fn notes_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let names = state.notes.names(msg.chat.id.0).await?;
    if names.is_empty() {
        return reply_text(&bot, &msg, "No notes in this chat!").await;
    }

    reply_html(
        &bot,
        &msg,
        format!("📝 <b>Notes in this chat:</b>\n\n{}", bullet_list(&names)),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bullet_list_escapes() {
        let items = vec!["rules".to_string(), "<faq>".to_string()];
        assert_eq!(bullet_list(&items), "• rules\n• &lt;faq&gt;");
    }
}
