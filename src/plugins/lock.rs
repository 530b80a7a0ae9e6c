//! Chat-wide permission locks.

use std::str::FromStr;

use teloxide::prelude::*;
use teloxide::types::ChatPermissions;
use tracing::info;

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::error::CommandError;
use crate::utils::{command_args, reply_error, reply_text};

/// Everything a regular member may do in an unlocked group.
pub fn full_permissions() -> ChatPermissions {
    ChatPermissions::SEND_MESSAGES
        | media_permissions()
        | ChatPermissions::SEND_POLLS
        | ChatPermissions::SEND_OTHER_MESSAGES
        | ChatPermissions::ADD_WEB_PAGE_PREVIEWS
        | ChatPermissions::CHANGE_INFO
        | ChatPermissions::INVITE_USERS
        | ChatPermissions::PIN_MESSAGES
}

pub fn media_permissions() -> ChatPermissions {
    ChatPermissions::SEND_AUDIOS
        | ChatPermissions::SEND_DOCUMENTS
        | ChatPermissions::SEND_PHOTOS
        | ChatPermissions::SEND_VIDEOS
        | ChatPermissions::SEND_VIDEO_NOTES
        | ChatPermissions::SEND_VOICE_NOTES
}

/// A lockable capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockType {
    Messages,
    Media,
    Stickers,
    Polls,
    Links,
    Bots,
}

impl LockType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Messages => "messages",
            Self::Media => "media",
            Self::Stickers => "stickers",
            Self::Polls => "polls",
            Self::Links => "links",
            Self::Bots => "bots",
        }
    }

    /// Permission bits this lock clears.
    pub fn permissions(self) -> ChatPermissions {
        match self {
            Self::Messages => ChatPermissions::SEND_MESSAGES,
            Self::Media => media_permissions(),
            // Stickers, GIFs and inline bots
            Self::Stickers => ChatPermissions::SEND_OTHER_MESSAGES,
            Self::Polls => ChatPermissions::SEND_POLLS,
            Self::Links => ChatPermissions::ADD_WEB_PAGE_PREVIEWS,
            // Members can't add bots without invite rights
            Self::Bots => ChatPermissions::INVITE_USERS,
        }
    }

    /// "Messages", "Media", ...
    fn title(self) -> String {
        let name = self.as_str();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl FromStr for LockType {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "messages" => Ok(Self::Messages),
            "media" => Ok(Self::Media),
            "stickers" => Ok(Self::Stickers),
            "polls" => Ok(Self::Polls),
            "links" => Ok(Self::Links),
            "bots" => Ok(Self::Bots),
            _ => Err(CommandError::InvalidLockType),
        }
    }
}

/// Parse the lock type argument, replying on failure.
async fn lock_arg(bot: &ThrottledBot, msg: &Message, usage: &'static str) -> anyhow::Result<Option<LockType>> {
    let Some(arg) = command_args(msg.text().unwrap_or_default()).first().copied() else {
        reply_error(bot, msg, CommandError::Usage(usage)).await?;
        return Ok(None);
    };

    match arg.parse::<LockType>() {
        Ok(lock) => Ok(Some(lock)),
        Err(e) => {
            reply_error(bot, msg, e).await?;
            Ok(None)
        }
    }
}

/// Handle /lock command.
pub async fn lock_command(bot: ThrottledBot, msg: Message, _state: AppState) -> anyhow::Result<()> {
    let usage = "/lock <type>\nTypes: messages, media, stickers, polls, links, bots";
    let Some(lock) = lock_arg(&bot, &msg, usage).await? else {
        return Ok(());
    };

    let permissions = full_permissions() - lock.permissions();
    let result = bot
        .set_chat_permissions(msg.chat.id, permissions)
        .use_independent_chat_permissions(true)
        .await;

    match result {
        Ok(_) => {
            info!("Locked {} in chat {}", lock.as_str(), msg.chat.id);
            reply_text(&bot, &msg, format!("🔒 {} locked for non-admins.", lock.title())).await
        }
        Err(e) => reply_text(&bot, &msg, format!("Failed to lock {}: {}", lock.as_str(), e)).await,
    }
}

/// Handle /unlock command.
///
/// Starts from the chat's current permissions so other locks stay.
pub async fn unlock_command(bot: ThrottledBot, msg: Message, _state: AppState) -> anyhow::Result<()> {
    let usage = "/unlock <type>\nTypes: messages, media, stickers, polls, links, bots";
    let Some(lock) = lock_arg(&bot, &msg, usage).await? else {
        return Ok(());
    };

    let current = bot
        .get_chat(msg.chat.id)
        .await
        .ok()
        .and_then(|chat| chat.permissions())
        .unwrap_or_else(full_permissions);

    let result = bot
        .set_chat_permissions(msg.chat.id, current | lock.permissions())
        .use_independent_chat_permissions(true)
        .await;

    match result {
        Ok(_) => {
            info!("Unlocked {} in chat {}", lock.as_str(), msg.chat.id);
            reply_text(&bot, &msg, format!("🔓 {} unlocked for non-admins.", lock.title())).await
        }
        Err(e) => reply_text(&bot, &msg, format!("Failed to unlock {}: {}", lock.as_str(), e)).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lock_types() {
        assert_eq!("messages".parse::<LockType>(), Ok(LockType::Messages));
        assert_eq!("Media".parse::<LockType>(), Ok(LockType::Media));
        assert_eq!("BOTS".parse::<LockType>(), Ok(LockType::Bots));
        assert_eq!("gifs".parse::<LockType>(), Err(CommandError::InvalidLockType));
    }

    #[test]
    fn test_lock_clears_only_its_capability() {
        let locked = full_permissions() - LockType::Stickers.permissions();
        assert!(!locked.contains(ChatPermissions::SEND_OTHER_MESSAGES));
        assert!(locked.contains(ChatPermissions::SEND_MESSAGES));
        assert!(locked.contains(ChatPermissions::SEND_PHOTOS));

        let no_media = full_permissions() - LockType::Media.permissions();
        assert!(!no_media.intersects(media_permissions()));
        assert!(no_media.contains(ChatPermissions::SEND_POLLS));
    }

    #[test]
    fn test_unlock_restores_capability() {
        let locked = full_permissions() - LockType::Links.permissions();
        assert_eq!(locked | LockType::Links.permissions(), full_permissions());
    }

    #[test]
    fn test_title() {
        assert_eq!(LockType::Polls.title(), "Polls");
    }
}
