//! Event handlers: passive group messages and member joins/leaves.

pub mod antispam;
pub mod filters;
pub mod goodbye;
pub mod welcome;

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardMarkup, InputFile, ParseMode, UserId};
use tracing::{debug, error, warn};

pub use antispam::{SpamGuard, SpamVerdict};

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::plugins::afk;
use crate::utils::{mention_html, reply_html};

/// Build the combined event handler for chat member updates.
pub fn member_handler() -> UpdateHandler<anyhow::Error> {
    dptree::entry()
        .branch(welcome::handler())
        .branch(goodbye::handler())
}

/// Build the message event handler for non-command group messages.
pub fn message_event_handler() -> UpdateHandler<anyhow::Error> {
    dptree::filter(is_passive_group_message).endpoint(passive_message_handler)
}

fn is_passive_group_message(msg: Message) -> bool {
    let in_group = msg.chat.is_group() || msg.chat.is_supergroup();
    let is_command = msg.text().is_some_and(|t| t.starts_with('/'));
    in_group && !is_command && msg.from.is_some()
}

/// Anti-spam first; a suppressed message goes no further.
///
/// Filters and AFK run independently: one failing doesn't skip the other.
async fn passive_message_handler(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    spam_guard: SpamGuard,
) -> anyhow::Result<()> {
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };

    match spam_guard.check(user.id) {
        SpamVerdict::Allow => {}
        SpamVerdict::Warn => {
            let text = format!(
                "⚠️ {}, please slow down! You're sending messages too quickly.",
                mention_html(user.id.0, &user.first_name)
            );
            reply_html(&bot, &msg, text).await?;
            return Ok(());
        }
        SpamVerdict::Silence => {
            debug!("Dropped message from {} in chat {}", user.id, msg.chat.id);
            return Ok(());
        }
    }

    if let Err(e) = filters::check_filters(&bot, &msg, &state).await {
        error!("Filters error in chat {}: {}", msg.chat.id, e);
    }

    if let Err(e) = afk::afk_watch(&bot, &msg, &state).await {
        error!("AFK handler error in chat {}: {}", msg.chat.id, e);
    }

    Ok(())
}

/// Member card as a profile-photo caption, falling back to plain text.
pub(crate) async fn send_member_card(
    bot: &ThrottledBot,
    chat_id: ChatId,
    user_id: UserId,
    text: String,
    keyboard: Option<InlineKeyboardMarkup>,
) -> anyhow::Result<()> {
    let photo = match bot.get_user_profile_photos(user_id).limit(1).await {
        Ok(photos) => photos
            .photos
            .into_iter()
            .next()
            .and_then(|sizes| sizes.into_iter().last()),
        Err(e) => {
            warn!("Profile photo lookup for {} failed: {}", user_id, e);
            None
        }
    };

    if let Some(photo) = photo {
        let mut req = bot
            .send_photo(chat_id, InputFile::file_id(photo.file.id))
            .caption(text.clone())
            .parse_mode(ParseMode::Html);
        if let Some(kb) = keyboard.clone() {
            req = req.reply_markup(kb);
        }
        match req.await {
            Ok(_) => return Ok(()),
            Err(e) => warn!("Photo card failed in chat {}, sending text: {}", chat_id, e),
        }
    }

    let mut req = bot.send_message(chat_id, text).parse_mode(ParseMode::Html);
    if let Some(kb) = keyboard {
        req = req.reply_markup(kb);
    }
    req.await?;
    Ok(())
}
