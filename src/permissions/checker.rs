//! Live administrator checks.

use teloxide::prelude::*;
use teloxide::types::{ChatId, ChatMember, UserId};
use tracing::debug;

use crate::bot::dispatcher::ThrottledBot;

/// Answers "is this user an admin here" straight from the platform.
///
/// Nothing is cached: every check fetches the current administrator list,
/// so promotions and demotions take effect immediately.
#[derive(Clone)]
pub struct Permissions {
    bot: ThrottledBot,
    owner_id: UserId,
}

impl Permissions {
    pub fn new(bot: ThrottledBot, owner_id: u64) -> Self {
        Self {
            bot,
            owner_id: UserId(owner_id),
        }
    }

    /// Check if a user is the configured bot owner.
    #[inline]
    pub fn is_bot_owner(&self, user_id: UserId) -> bool {
        user_id == self.owner_id
    }

    /// Current administrators of a chat, owner included.
    pub async fn admins(&self, chat_id: ChatId) -> anyhow::Result<Vec<ChatMember>> {
        Ok(self.bot.get_chat_administrators(chat_id).await?)
    }

    /// Check if a user is an admin (including the chat owner).
    pub async fn is_admin(&self, chat_id: ChatId, user_id: UserId) -> anyhow::Result<bool> {
        let admins = self.admins(chat_id).await?;
        let found = is_listed(&admins, user_id);
        debug!("Admin check for user {} in chat {}: {}", user_id, chat_id, found);
        Ok(found)
    }
}

/// Whether `user_id` appears in an administrator list.
pub fn is_listed(admins: &[ChatMember], user_id: UserId) -> bool {
    admins.iter().any(|member| member.user.id == user_id)
}

/// Administrators that are people, not bots.
pub fn human_admins(admins: &[ChatMember]) -> impl Iterator<Item = &ChatMember> {
    admins.iter().filter(|member| !member.user.is_bot)
}
