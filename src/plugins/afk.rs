//! AFK commands and the passive AFK watcher.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use teloxide::prelude::*;
use teloxide::types::{MessageEntityKind, User};
use tracing::info;

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::database::AfkStatus;
use crate::utils::{command_tail, format_minutes, html_escape, mention_html, reply_html, reply_text};

const NO_REASON: &str = "No reason provided";

/// Handle /afk command.
///
/// Usage: /afk [reason]
pub async fn afk_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };

    let reason = match command_tail(msg.text().unwrap_or_default()) {
        "" => NO_REASON,
        reason => reason,
    };

    state.afk.set(&AfkStatus::new(user.id.0, reason)).await?;
    info!("User {} went AFK in chat {}", user.id, msg.chat.id);

    reply_html(
        &bot,
        &msg,
        format!(
            "🌙 {} is now AFK.\n📝 Reason: {}",
            mention_html(user.id.0, &user.first_name),
            html_escape(reason)
        ),
    )
    .await
}

/// Handle /endafk command.
pub async fn endafk_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };

    let Some(status) = state.afk.take(user.id.0).await? else {
        return reply_text(&bot, &msg, "You are not AFK!").await;
    };

    let elapsed = status.elapsed(chrono::Utc::now().timestamp());
    reply_html(
        &bot,
        &msg,
        format!(
            "🌙 {} is no longer AFK.\n⏰ Was AFK for {}.",
            mention_html(user.id.0, &user.first_name),
            format_minutes(elapsed)
        ),
    )
    .await
}

/// Something the watcher has to announce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AfkNotice {
    /// The sender was AFK and just spoke.
    Back { elapsed: u64 },
    /// A mentioned user is still away.
    Away {
        user_id: u64,
        first_name: String,
        reason: String,
        elapsed: u64,
    },
}

/// Decide what to announce for one message.
///
/// `returning` is the sender's own status, already cleared. Each mentioned
/// user gets at most one notice; the sender and expired statuses get none.
pub fn afk_notices(
    sender: u64,
    returning: Option<&AfkStatus>,
    mentioned: &[(u64, String)],
    statuses: &HashMap<u64, AfkStatus>,
    now: i64,
    timeout: Duration,
) -> Vec<AfkNotice> {
    let mut notices: Vec<AfkNotice> = returning
        .map(|status| AfkNotice::Back {
            elapsed: status.elapsed(now),
        })
        .into_iter()
        .collect();

    let mut seen = HashSet::from([sender]);
    for (user_id, first_name) in mentioned {
        if !seen.insert(*user_id) {
            continue;
        }
        let Some(status) = statuses.get(user_id) else {
            continue;
        };
        if status.is_expired(now, timeout) {
            continue;
        }
        notices.push(AfkNotice::Away {
            user_id: *user_id,
            first_name: first_name.clone(),
            reason: status.reason.clone(),
            elapsed: status.elapsed(now),
        });
    }

    notices
}

fn notice_text(notice: &AfkNotice, sender: &User) -> String {
    match notice {
        AfkNotice::Back { elapsed } => format!(
            "🌙 {} is back!\n⏰ Was AFK for {}.",
            mention_html(sender.id.0, &sender.first_name),
            format_minutes(*elapsed)
        ),
        AfkNotice::Away {
            user_id,
            first_name,
            reason,
            elapsed,
        } => format!(
            "🌙 {} is AFK.\n📝 Reason: {}\n⏰ AFK for {}.",
            mention_html(*user_id, first_name),
            html_escape(reason),
            format_minutes(*elapsed)
        ),
    }
}

/// Runs on every passive group message.
///
/// Clears the sender's own AFK status, then answers once for each AFK user
/// the message mentions.
pub async fn afk_watch(bot: &ThrottledBot, msg: &Message, state: &AppState) -> anyhow::Result<()> {
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };
    let now = chrono::Utc::now().timestamp();

    let returning = state.afk.take(user.id.0).await?;
    let mentioned = mentioned_users(msg, state).await;

    let mut statuses = HashMap::new();
    for (user_id, _) in &mentioned {
        if *user_id == user.id.0 || statuses.contains_key(user_id) {
            continue;
        }
        if let Some(status) = state.afk.get(*user_id).await? {
            statuses.insert(*user_id, status);
        }
    }

    let notices = afk_notices(
        user.id.0,
        returning.as_ref(),
        &mentioned,
        &statuses,
        now,
        state.config.afk_timeout,
    );
    for notice in &notices {
        reply_html(bot, msg, notice_text(notice, user)).await?;
    }

    Ok(())
}

/// Users named in a message, by text mention or a known `@username`.
async fn mentioned_users(msg: &Message, state: &AppState) -> Vec<(u64, String)> {
    let Some(entities) = msg.parse_entities() else {
        return Vec::new();
    };

    let mut found = Vec::new();
    for entity in entities {
        match entity.kind() {
            MessageEntityKind::TextMention { user } => {
                found.push((user.id.0, user.first_name.clone()));
            }
            MessageEntityKind::Mention => {
                if let Ok(Some(record)) = state.users.get_by_username(entity.text()).await {
                    found.push((record.user_id, record.first_name));
                }
            }
            _ => {}
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(3600);
    const NOW: i64 = 100_000;

    fn away(user_id: u64, since: i64) -> AfkStatus {
        AfkStatus {
            user_id,
            reason: "lunch".to_string(),
            since,
        }
    }

    fn mention(user_id: u64) -> (u64, String) {
        (user_id, format!("user{}", user_id))
    }

    #[test]
    fn test_sender_returning_is_announced() {
        let own = away(1, NOW - 600);
        let notices = afk_notices(1, Some(&own), &[], &HashMap::new(), NOW, TIMEOUT);
        assert_eq!(notices, vec![AfkNotice::Back { elapsed: 600 }]);
    }

    #[test]
    fn test_mention_within_timeout_answers_once() {
        let statuses = HashMap::from([(2, away(2, NOW - 120))]);
        let notices = afk_notices(1, None, &[mention(2), mention(2)], &statuses, NOW, TIMEOUT);

        assert_eq!(
            notices,
            vec![AfkNotice::Away {
                user_id: 2,
                first_name: "user2".to_string(),
                reason: "lunch".to_string(),
                elapsed: 120,
            }]
        );
    }

    #[test]
    fn test_mention_after_timeout_is_silent() {
        let statuses = HashMap::from([(2, away(2, NOW - 3600))]);
        let notices = afk_notices(1, None, &[mention(2)], &statuses, NOW, TIMEOUT);
        assert!(notices.is_empty());
    }

    #[test]
    fn test_self_mention_is_skipped() {
        let statuses = HashMap::from([(1, away(1, NOW - 60))]);
        let notices = afk_notices(1, None, &[mention(1)], &statuses, NOW, TIMEOUT);
        assert!(notices.is_empty());
    }

    #[test]
    fn test_return_then_mentions() {
        let own = away(1, NOW - 60);
        let statuses = HashMap::from([(2, away(2, NOW - 30)), (3, away(3, NOW - 7200))]);
        let notices = afk_notices(
            1,
            Some(&own),
            &[mention(3), mention(2), mention(4)],
            &statuses,
            NOW,
            TIMEOUT,
        );

        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0], AfkNotice::Back { elapsed: 60 });
        assert!(matches!(notices[1], AfkNotice::Away { user_id: 2, .. }));
    }
}
