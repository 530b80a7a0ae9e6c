//! Dispatcher-level error handler.

use std::sync::Arc;

use futures::future::BoxFuture;
use teloxide::error_handlers::ErrorHandler;
use teloxide::prelude::*;
use tracing::{error, warn};

use super::dispatcher::ThrottledBot;

/// Telegram rejects messages longer than this.
const MAX_MESSAGE_CHARS: usize = 4096;

/// Logs every escaped handler error and mirrors it to the owner's DM.
pub struct OwnerErrorMirror {
    bot: ThrottledBot,
    owner: ChatId,
}

impl OwnerErrorMirror {
    pub fn new(bot: ThrottledBot, owner: ChatId) -> Self {
        Self { bot, owner }
    }
}

impl ErrorHandler<anyhow::Error> for OwnerErrorMirror {
    fn handle_error(self: Arc<Self>, error: anyhow::Error) -> BoxFuture<'static, ()> {
        Box::pin(async move {
            let details = format!("{:#}", error);
            error!("Handler error: {}", details);

            if let Err(e) = self.bot.send_message(self.owner, error_log_text(&details)).await {
                warn!("Failed to mirror error to owner: {}", e);
            }
        })
    }
}

/// Plain-text owner notification, cut to fit one message.
fn error_log_text(details: &str) -> String {
    let header = "⚠️ Error Log:\n\n";
    let budget = MAX_MESSAGE_CHARS - header.chars().count();
    let body: String = details.chars().take(budget).collect();
    format!("{}{}", header, body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_log_text() {
        assert_eq!(error_log_text("db down"), "⚠️ Error Log:\n\ndb down");
    }

    #[test]
    fn test_long_errors_are_truncated() {
        let text = error_log_text(&"x".repeat(10_000));
        assert_eq!(text.chars().count(), MAX_MESSAGE_CHARS);
    }
}
