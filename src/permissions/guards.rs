//! Guard handlers chained in front of command endpoints.
//!
//! A guard either lets the update through or replies with the refusal and
//! stops the branch.

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use tracing::{debug, warn};

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::error::CommandError;
use crate::utils::reply_error;

async fn refuse(bot: &ThrottledBot, msg: &Message, err: CommandError) {
    debug!("Refused command in chat {}: {}", msg.chat.id, err);
    if let Err(e) = reply_error(bot, msg, err).await {
        warn!("Failed to send refusal in chat {}: {}", msg.chat.id, e);
    }
}

fn is_group(msg: &Message) -> bool {
    msg.chat.is_group() || msg.chat.is_supergroup()
}

/// Only groups and supergroups.
pub fn group_only() -> UpdateHandler<anyhow::Error> {
    dptree::filter_async(|bot: ThrottledBot, msg: Message| async move {
        if is_group(&msg) {
            return true;
        }
        refuse(&bot, &msg, CommandError::NotInGroup).await;
        false
    })
}

/// Administrators of the current group. Direct messages pass.
pub fn admin_only() -> UpdateHandler<anyhow::Error> {
    dptree::filter_async(|bot: ThrottledBot, msg: Message, state: AppState| async move {
        if !is_group(&msg) {
            return true;
        }
        let Some(user) = msg.from.as_ref() else {
            return false;
        };

        match state.permissions.is_admin(msg.chat.id, user.id).await {
            Ok(true) => true,
            Ok(false) => {
                refuse(&bot, &msg, CommandError::NotAdmin).await;
                false
            }
            Err(e) => {
                warn!("Admin lookup failed in chat {}: {}", msg.chat.id, e);
                refuse(&bot, &msg, CommandError::NotAdmin).await;
                false
            }
        }
    })
}

/// The configured owner, and only in the owner's DM.
pub fn owner_dm_only() -> UpdateHandler<anyhow::Error> {
    dptree::filter_async(|bot: ThrottledBot, msg: Message, state: AppState| async move {
        let is_owner = msg
            .from
            .as_ref()
            .is_some_and(|user| state.permissions.is_bot_owner(user.id));

        if !is_owner {
            refuse(&bot, &msg, CommandError::NotOwner).await;
            return false;
        }
        if !msg.chat.is_private() {
            refuse(&bot, &msg, CommandError::OwnerDmOnly).await;
            return false;
        }
        true
    })
}
