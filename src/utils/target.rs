//! Target resolution for moderation commands.
//!
//! A command can name its target by replying to them, by numeric id, by a
//! text mention (users without a username), or by `@username`.

use teloxide::prelude::*;
use teloxide::types::{Message, MessageEntityKind, UserId};

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::error::CommandError;
use crate::utils::parser::mention_html;
use crate::utils::reply::reply_error;

/// The user a command acts on.
#[derive(Debug, Clone)]
pub struct Target {
    pub id: UserId,
    pub first_name: String,
    /// Leading arguments used to name the target; 0 for replies.
    pub consumed: usize,
}

impl Target {
    pub fn mention(&self) -> String {
        mention_html(self.id.0, &self.first_name)
    }
}

/// Resolve the target of a command message.
///
/// Resolution order:
/// 1. Reply message → `reply.from`
/// 2. Numeric argument → `users` collection, then `get_chat`
/// 3. TextMention entity
/// 4. `@username` → `users` collection, then `get_chat`
pub async fn resolve_target(bot: &ThrottledBot, msg: &Message, state: &AppState) -> Option<Target> {
    if let Some(reply) = msg.reply_to_message()
        && let Some(user) = &reply.from
    {
        return Some(Target {
            id: user.id,
            first_name: user.first_name.clone(),
            consumed: 0,
        });
    }

    let text = msg.text()?;
    let arg = text.split_whitespace().nth(1)?;

    if let Ok(id) = arg.parse::<u64>() {
        let first_name = match state.users.get_by_id(id).await {
            Ok(Some(user)) => user.first_name,
            _ => match bot.get_chat(ChatId(id as i64)).await {
                Ok(chat) => chat.first_name().unwrap_or("User").to_string(),
                Err(_) => format!("User {}", id),
            },
        };
        return Some(Target {
            id: UserId(id),
            first_name,
            consumed: 1,
        });
    }

    if let Some(entities) = msg.entities() {
        for entity in entities {
            if let MessageEntityKind::TextMention { user } = &entity.kind {
                return Some(Target {
                    id: user.id,
                    first_name: user.first_name.clone(),
                    consumed: 1,
                });
            }
        }
    }

    if arg.starts_with('@') {
        if let Ok(Some(user)) = state.users.get_by_username(arg).await {
            return Some(Target {
                id: UserId(user.user_id),
                first_name: user.first_name,
                consumed: 1,
            });
        }
        if let Ok(chat) = bot.get_chat(arg.to_string()).await
            && chat.is_private()
        {
            return Some(Target {
                id: UserId(chat.id.0 as u64),
                first_name: chat.first_name().unwrap_or("User").to_string(),
                consumed: 1,
            });
        }
    }

    None
}

/// Which targets a command refuses.
#[derive(Debug, Clone, Copy)]
pub enum SelfCheck {
    /// Anyone goes (undo commands).
    Off,
    /// Not the bot. Carries the verb for the refusal.
    Bot(&'static str),
    /// Neither the bot nor the invoker.
    BotAndInvoker(&'static str),
}

/// Resolve a target or reply with why there is none.
///
/// `Ok(None)` means the invoker has already been told.
pub async fn require_target(
    bot: &ThrottledBot,
    msg: &Message,
    state: &AppState,
    usage: &'static str,
    check: SelfCheck,
) -> anyhow::Result<Option<Target>> {
    let has_args = msg.text().is_some_and(|t| t.split_whitespace().nth(1).is_some());
    if msg.reply_to_message().is_none() && !has_args {
        reply_error(bot, msg, CommandError::Usage(usage)).await?;
        return Ok(None);
    }

    let Some(target) = resolve_target(bot, msg, state).await else {
        reply_error(bot, msg, CommandError::UserNotFound).await?;
        return Ok(None);
    };

    let invoker = msg.from.as_ref().map(|u| u.id);
    let refusal = match check {
        SelfCheck::Off => None,
        SelfCheck::Bot(verb) | SelfCheck::BotAndInvoker(verb) if target.id == state.bot_id => {
            Some(CommandError::BotTarget(verb))
        }
        SelfCheck::BotAndInvoker(verb) if Some(target.id) == invoker => {
            Some(CommandError::SelfTarget(verb))
        }
        _ => None,
    };

    if let Some(err) = refusal {
        reply_error(bot, msg, err).await?;
        return Ok(None);
    }
    Ok(Some(target))
}

/// Arguments left after the target, joined back into a reason.
pub fn reason_after(text: &str, consumed: usize) -> Option<String> {
    let rest: Vec<&str> = text.split_whitespace().skip(1 + consumed).collect();
    if rest.is_empty() {
        None
    } else {
        Some(rest.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_after_target() {
        assert_eq!(reason_after("/warn @bob spamming links", 1).as_deref(), Some("spamming links"));
        assert_eq!(reason_after("/warn flooding", 0).as_deref(), Some("flooding"));
        assert_eq!(reason_after("/warn @bob", 1), None);
        assert_eq!(reason_after("/warn", 0), None);
    }
}
