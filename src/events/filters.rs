//! Passive keyword filters.

use teloxide::prelude::*;
use tracing::debug;

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::database::first_match;
use crate::utils::send_stored;

/// Reply with the first stored filter whose keyword the text contains.
///
/// Returns whether a filter fired.
pub async fn check_filters(bot: &ThrottledBot, msg: &Message, state: &AppState) -> anyhow::Result<bool> {
    let Some(text) = msg.text() else {
        return Ok(false);
    };

    let filters = state.filters.list(msg.chat.id.0).await?;
    let Some(filter) = first_match(&filters, text) else {
        return Ok(false);
    };

    debug!("Filter '{}' fired in chat {}", filter.keyword, msg.chat.id);
    send_stored(bot, msg, &filter.body).await?;
    Ok(true)
}
