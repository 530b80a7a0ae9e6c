//! MoonBot - Telegram group management bot.
//!
//! ## Architecture
//!
//! - `config` - Environment configuration
//! - `database` - MongoDB repositories
//! - `cache` - Moka-backed in-process caches
//! - `permissions` - Live admin checks and command guards
//! - `bot` - Dispatcher, error mirror, background jobs
//! - `plugins` - Command and callback handlers
//! - `events` - Passive message and member events
//! - `utils` - Utility functions

mod bot;
mod cache;
mod config;
mod database;
mod error;
mod events;
mod permissions;
mod plugins;
mod utils;

use std::sync::Arc;

use teloxide::adaptors::throttle::Limits;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::Config;
use database::Database;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file first (before anything else)
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("moonbot=info,teloxide=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting MoonBot...");

    let config = Arc::new(Config::from_env()?);
    info!("Configuration loaded, owner: {}", config.owner_id);

    info!("Connecting to MongoDB...");
    let db = Arc::new(Database::connect(&config.mongodb_uri, &config.mongodb_database).await?);
    info!("Database connected");

    // Throttle keeps us inside Telegram's global and per-chat send limits
    let bot = Bot::new(&config.bot_token).throttle(Limits::default());

    let me = bot.get_me().await?;
    let bot_username = config
        .bot_username
        .clone()
        .unwrap_or_else(|| me.username().to_string());
    info!("Running as @{}", bot_username);

    if let Err(e) = bot.set_my_commands(plugins::Command::bot_commands()).await {
        warn!("Failed to register command menu: {}", e);
    }

    let dispatcher = bot::build_dispatcher(bot.clone(), &db, config.clone(), me.id, bot_username);

    bot::jobs::spawn_afk_sweep(Arc::new(database::AfkRepository::new(&db)), config.afk_timeout);
    bot::jobs::spawn_retention_cleanup(db);

    bot::run(bot, dispatcher).await;

    Ok(())
}
