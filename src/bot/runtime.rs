//! Bot runtime - long polling.

use teloxide::prelude::*;
use teloxide::types::AllowedUpdate;
use teloxide::update_listeners::Polling;
use tracing::info;

use super::dispatcher::ThrottledBot;

/// Join/leave events are only delivered when asked for explicitly.
const ALLOWED_UPDATES: [AllowedUpdate; 3] = [
    AllowedUpdate::Message,
    AllowedUpdate::ChatMember,
    AllowedUpdate::CallbackQuery,
];

/// Run the dispatcher until Ctrl-C.
pub async fn run(
    bot: ThrottledBot,
    mut dispatcher: Dispatcher<ThrottledBot, anyhow::Error, teloxide::dispatching::DefaultKey>,
) {
    info!("Starting bot in polling mode...");

    let listener = Polling::builder(bot)
        .allowed_updates(ALLOWED_UPDATES.to_vec())
        .drop_pending_updates()
        .build();

    dispatcher
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("An error from the update listener"),
        )
        .await;

    info!("Dispatcher stopped");
}
