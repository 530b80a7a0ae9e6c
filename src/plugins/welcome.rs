//! Welcome and goodbye template commands.
//!
//! Templates accept `{first_name}` and `{chat_title}`.

use teloxide::prelude::*;
use tracing::info;

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::error::CommandError;
use crate::utils::{command_tail, reply_error, reply_text};

/// Argument of /setwelcome and /setgoodbye.
#[derive(Debug, PartialEq, Eq)]
pub enum TemplateArg<'a> {
    Reset,
    Custom(&'a str),
}

pub fn template_arg(text: &str) -> Option<TemplateArg<'_>> {
    match command_tail(text) {
        "" => None,
        tail if tail.eq_ignore_ascii_case("default") => Some(TemplateArg::Reset),
        tail => Some(TemplateArg::Custom(tail)),
    }
}

/// Handle /setwelcome command.
pub async fn setwelcome_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let chat_id = msg.chat.id.0;
    match template_arg(msg.text().unwrap_or_default()) {
        None => {
            reply_error(
                &bot,
                &msg,
                CommandError::Usage("/setwelcome <message> or /setwelcome default to reset"),
            )
            .await
        }
        Some(TemplateArg::Reset) => {
            state.settings.set_welcome(chat_id, &state.config.default_welcome).await?;
            info!("Welcome reset in chat {}", chat_id);
            reply_text(&bot, &msg, "Welcome message reset to default.").await
        }
        Some(TemplateArg::Custom(text)) => {
            state.settings.set_welcome(chat_id, text).await?;
            info!("Welcome updated in chat {}", chat_id);
            reply_text(&bot, &msg, "Welcome message updated!").await
        }
    }
}

/// Handle /setgoodbye command.
pub async fn setgoodbye_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let chat_id = msg.chat.id.0;
    match template_arg(msg.text().unwrap_or_default()) {
        None => {
            reply_error(
                &bot,
                &msg,
                CommandError::Usage("/setgoodbye <message> or /setgoodbye default to reset"),
            )
            .await
        }
        Some(TemplateArg::Reset) => {
            state.settings.set_goodbye(chat_id, &state.config.default_goodbye).await?;
            info!("Goodbye reset in chat {}", chat_id);
            reply_text(&bot, &msg, "Goodbye message reset to default.").await
        }
        Some(TemplateArg::Custom(text)) => {
            state.settings.set_goodbye(chat_id, text).await?;
            info!("Goodbye updated in chat {}", chat_id);
            reply_text(&bot, &msg, "Goodbye message updated!").await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_arg() {
        assert_eq!(template_arg("/setwelcome"), None);
        assert_eq!(template_arg("/setwelcome Default"), Some(TemplateArg::Reset));
        assert_eq!(
            template_arg("/setwelcome Hi {first_name}!"),
            Some(TemplateArg::Custom("Hi {first_name}!"))
        );
    }
}
