//! Warning command handlers.
//!
//! Three warnings in a chat get the user banned there, after which their
//! slate for that chat is wiped.

use std::fmt::Display;
use std::future::Future;

use teloxide::prelude::*;
use tracing::info;

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::database::{WARN_LIMIT, WarnLedger, Warning};
use crate::utils::{SelfCheck, html_escape, reason_after, reply_html, reply_text, require_target};

const NO_REASON: &str = "No reason given";

/// What a warning led to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarnOutcome {
    Warned { count: u64 },
    /// Threshold reached, user banned and warnings cleared.
    Banned { count: u64 },
    /// Threshold reached but the ban was refused; warnings are kept.
    BanFailed { count: u64, error: String },
}

/// Record a warning and ban once the pair reaches `limit`.
pub async fn apply_warning<L, B, Fut, E>(
    ledger: &L,
    warning: Warning,
    limit: u64,
    ban: B,
) -> anyhow::Result<WarnOutcome>
where
    L: WarnLedger,
    B: FnOnce() -> Fut,
    Fut: Future<Output = Result<(), E>>,
    E: Display,
{
    let (user_id, chat_id) = (warning.user_id, warning.chat_id);

    ledger.add(warning).await?;
    let count = ledger.count(user_id, chat_id).await?;

    if count < limit {
        return Ok(WarnOutcome::Warned { count });
    }

    match ban().await {
        Ok(()) => {
            ledger.clear(user_id, chat_id).await?;
            Ok(WarnOutcome::Banned { count })
        }
        Err(e) => Ok(WarnOutcome::BanFailed {
            count,
            error: e.to_string(),
        }),
    }
}

/// Drop all warnings for a pair. `None` when there were none; nothing is
/// written in that case.
pub async fn revoke_warnings<L: WarnLedger>(
    ledger: &L,
    user_id: u64,
    chat_id: i64,
) -> anyhow::Result<Option<u64>> {
    if ledger.count(user_id, chat_id).await? == 0 {
        return Ok(None);
    }
    Ok(Some(ledger.clear(user_id, chat_id).await?))
}

/// Handle /warn command.
///
/// Usage: /warn <user> <reason> or reply with /warn <reason>
pub async fn warn_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let Some(target) = require_target(
        &bot,
        &msg,
        &state,
        "/warn <user> <reason> or reply to a message with /warn <reason>",
        SelfCheck::BotAndInvoker("warn"),
    )
    .await?
    else {
        return Ok(());
    };

    let chat_id = msg.chat.id;
    let admin_id = msg.from.as_ref().map(|u| u.id.0).unwrap_or_default();
    let reason = reason_after(msg.text().unwrap_or_default(), target.consumed)
        .unwrap_or_else(|| NO_REASON.to_string());

    let warning = Warning::new(target.id.0, chat_id.0, reason.clone(), admin_id);
    let outcome = apply_warning(state.warns.as_ref(), warning, WARN_LIMIT, || async {
        bot.ban_chat_member(chat_id, target.id).await.map(|_| ())
    })
    .await?;

    match outcome {
        WarnOutcome::Warned { count } => {
            info!("User {} warned in chat {} ({}/{})", target.id, chat_id, count, WARN_LIMIT);
            reply_html(
                &bot,
                &msg,
                format!(
                    "⚠️ {} has been warned.\n📝 Reason: {}\n🔢 Warns: {}/{}",
                    target.mention(),
                    html_escape(&reason),
                    count,
                    WARN_LIMIT
                ),
            )
            .await
        }
        WarnOutcome::Banned { .. } => {
            info!("User {} banned in chat {} after {} warnings", target.id, chat_id, WARN_LIMIT);
            reply_html(
                &bot,
                &msg,
                format!(
                    "🚫 {} has been banned for reaching {} warnings.",
                    target.mention(),
                    WARN_LIMIT
                ),
            )
            .await
        }
        WarnOutcome::BanFailed { error, .. } => {
            reply_text(&bot, &msg, format!("Failed to ban user: {}", error)).await
        }
    }
}

/// Handle /unwarn command.
pub async fn unwarn_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let Some(target) = require_target(
        &bot,
        &msg,
        &state,
        "/unwarn <user> or reply to a message with /unwarn",
        SelfCheck::Off,
    )
    .await?
    else {
        return Ok(());
    };

    match revoke_warnings(state.warns.as_ref(), target.id.0, msg.chat.id.0).await? {
        None => reply_text(&bot, &msg, "This user has no warnings!").await,
        Some(_) => {
            reply_html(
                &bot,
                &msg,
                format!("✅ All warnings for {} have been removed.", target.mention()),
            )
            .await
        }
    }
}

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;

    use super::*;

    /// Warnings kept in memory, counting writes.
    #[derive(Default)]
    struct MemoryLedger {
        warnings: Mutex<Vec<Warning>>,
        writes: Mutex<usize>,
    }

    impl WarnLedger for MemoryLedger {
        async fn add(&self, warning: Warning) -> anyhow::Result<()> {
            *self.writes.lock() += 1;
            self.warnings.lock().push(warning);
            Ok(())
        }

        async fn count(&self, user_id: u64, chat_id: i64) -> anyhow::Result<u64> {
            let warnings = self.warnings.lock();
            Ok(warnings
                .iter()
                .filter(|w| w.user_id == user_id && w.chat_id == chat_id)
                .count() as u64)
        }

        async fn clear(&self, user_id: u64, chat_id: i64) -> anyhow::Result<u64> {
            *self.writes.lock() += 1;
            let mut warnings = self.warnings.lock();
            let before = warnings.len();
            warnings.retain(|w| !(w.user_id == user_id && w.chat_id == chat_id));
            Ok((before - warnings.len()) as u64)
        }
    }

    async fn warn(ledger: &MemoryLedger, user_id: u64, chat_id: i64, bans: &Mutex<u32>) -> WarnOutcome {
        apply_warning(ledger, Warning::new(user_id, chat_id, "spam", 99), WARN_LIMIT, || async {
            *bans.lock() += 1;
            Ok::<(), String>(())
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_third_warning_bans_and_clears() {
        let ledger = MemoryLedger::default();
        let bans = Mutex::new(0);

        assert_eq!(warn(&ledger, 1, -100, &bans).await, WarnOutcome::Warned { count: 1 });
        assert_eq!(warn(&ledger, 1, -100, &bans).await, WarnOutcome::Warned { count: 2 });
        assert_eq!(*bans.lock(), 0);

        assert_eq!(warn(&ledger, 1, -100, &bans).await, WarnOutcome::Banned { count: 3 });
        assert_eq!(*bans.lock(), 1);
        assert_eq!(ledger.count(1, -100).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_warnings_are_scoped_per_chat() {
        let ledger = MemoryLedger::default();
        let bans = Mutex::new(0);

        warn(&ledger, 1, -100, &bans).await;
        warn(&ledger, 1, -100, &bans).await;
        assert_eq!(warn(&ledger, 1, -200, &bans).await, WarnOutcome::Warned { count: 1 });
        assert_eq!(warn(&ledger, 2, -100, &bans).await, WarnOutcome::Warned { count: 1 });
        assert_eq!(*bans.lock(), 0);
    }

    #[tokio::test]
    async fn test_failed_ban_keeps_warnings() {
        let ledger = MemoryLedger::default();
        for _ in 0..2 {
            ledger.add(Warning::new(1, -100, "spam", 99)).await.unwrap();
        }

        let outcome = apply_warning(&ledger, Warning::new(1, -100, "spam", 99), WARN_LIMIT, || async {
            Err::<(), _>("not enough rights")
        })
        .await
        .unwrap();

        assert_eq!(
            outcome,
            WarnOutcome::BanFailed {
                count: 3,
                error: "not enough rights".to_string()
            }
        );
        assert_eq!(ledger.count(1, -100).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_revoke_without_warnings_writes_nothing() {
        let ledger = MemoryLedger::default();

        assert_eq!(revoke_warnings(&ledger, 1, -100).await.unwrap(), None);
        assert_eq!(*ledger.writes.lock(), 0);
    }

    #[tokio::test]
    async fn test_revoke_clears_pair() {
        let ledger = MemoryLedger::default();
        ledger.add(Warning::new(1, -100, "a", 99)).await.unwrap();
        ledger.add(Warning::new(1, -100, "b", 99)).await.unwrap();
        ledger.add(Warning::new(1, -200, "c", 99)).await.unwrap();

        assert_eq!(revoke_warnings(&ledger, 1, -100).await.unwrap(), Some(2));
        assert_eq!(ledger.count(1, -200).await.unwrap(), 1);
    }
}
