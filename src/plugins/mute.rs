//! Mute management commands.

use chrono::{DateTime, TimeDelta, Utc};
use teloxide::prelude::*;
use teloxide::types::ChatPermissions;
use tracing::info;

use super::lock::full_permissions;
use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::error::CommandError;
use crate::utils::{
    SelfCheck, html_escape, parse_duration, reason_after, reply_error, reply_html, reply_text,
    require_target,
};

const NO_REASON: &str = "No reason given";

/// End of a timed mute, `None` when it can't be represented.
fn mute_until(now: DateTime<Utc>, secs: u64) -> Option<DateTime<Utc>> {
    let secs = i64::try_from(secs).ok()?;
    now.checked_add_signed(TimeDelta::try_seconds(secs)?)
}

/// Handle /mute command.
///
/// Usage: /mute <user> [time] [reason], or reply with /mute [time] [reason].
/// Time is `30m`, `2h`, `1d` or bare seconds; without it the mute is
/// indefinite.
pub async fn mute_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let Some(target) = require_target(
        &bot,
        &msg,
        &state,
        "/mute <user> <time> <reason> or reply to a message with /mute <time> <reason>",
        SelfCheck::BotAndInvoker("mute"),
    )
    .await?
    else {
        return Ok(());
    };

    let text = msg.text().unwrap_or_default();
    let time_token = text.split_whitespace().nth(1 + target.consumed);
    let reason = reason_after(text, target.consumed + 1).unwrap_or_else(|| NO_REASON.to_string());

    let duration = match time_token {
        Some(token) => match parse_duration(token) {
            Some(secs) => Some((token, secs)),
            None => return reply_error(&bot, &msg, CommandError::InvalidDuration).await,
        },
        None => None,
    };

    let mut req = bot
        .restrict_chat_member(msg.chat.id, target.id, ChatPermissions::empty())
        .use_independent_chat_permissions(true);
    if let Some((_, secs)) = duration {
        let Some(until) = mute_until(Utc::now(), secs) else {
            return reply_error(&bot, &msg, CommandError::InvalidDuration).await;
        };
        req = req.until_date(until);
    }

    if let Err(e) = req.await {
        return reply_text(&bot, &msg, format!("Failed to mute user: {}", e)).await;
    }

    let span = match duration {
        Some((token, _)) => format!("for {}", html_escape(token)),
        None => "indefinitely".to_string(),
    };
    info!("Muted user {} in chat {} {}", target.id, msg.chat.id, span);

    reply_html(
        &bot,
        &msg,
        format!(
            "🔇 {} has been muted {}.\n📝 Reason: {}",
            target.mention(),
            span,
            html_escape(&reason)
        ),
    )
    .await
}

/// Handle /unmute command.
pub async fn unmute_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let Some(target) = require_target(
        &bot,
        &msg,
        &state,
        "/unmute <user> or reply to a message with /unmute",
        SelfCheck::Off,
    )
    .await?
    else {
        return Ok(());
    };

    let result = bot
        .restrict_chat_member(msg.chat.id, target.id, full_permissions())
        .use_independent_chat_permissions(true)
        .await;

    match result {
        Ok(_) => {
            info!("Unmuted user {} in chat {}", target.id, msg.chat.id);
            reply_html(&bot, &msg, format!("🔊 {} has been unmuted.", target.mention())).await
        }
        Err(e) => reply_text(&bot, &msg, format!("Failed to unmute user: {}", e)).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::parse_duration;

    #[test]
    fn test_mute_until_adds_duration() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let until = mute_until(now, parse_duration("2h").unwrap()).unwrap();
        assert_eq!(until.timestamp(), 1_700_007_200);
    }

    #[test]
    fn test_mute_until_rejects_overflow() {
        let now = Utc::now();
        assert!(mute_until(now, u64::MAX).is_none());
        assert!(mute_until(now, 100_000_000_000_000).is_none());
        assert!(mute_until(DateTime::<Utc>::MAX_UTC, 60).is_none());
    }
}
