use anyhow::Result;
use plan_eat::bot::{self, BotServices};
use plan_eat::config::AppConfig;
use plan_eat::db;
use plan_eat::dialogue::{CalorieDialogue, ChatState};
use plan_eat::errors::error_logging;
use plan_eat::image_fetch::{self, ImageFetcher};
use plan_eat::localization;
use plan_eat::observability;
use plan_eat::reminders::{self, ReminderRegistry, ReminderSchedule};
use std::sync::Arc;
use std::time::Duration;
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::prelude::*;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file first
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    observability::init_tracing(&config.observability)?;

    if let Err(e) = config.validate() {
        error_logging::log_config_error(&e, "app_config", "startup_validation");
        return Err(e.into());
    }
    info!("{}", config.summary());

    let pool = db::connect_pool(&config.database).await?;

    // Schema and seed data are in place before any update is handled
    let seed_report = db::init_database(&pool).await?;
    info!(seeded = ?seed_report, "Database ready");

    observability::init_metrics(&config.observability, Some(pool.clone())).await?;

    let localization_manager = localization::create_localization_manager()?;

    let image_fetcher = ImageFetcher::new(Duration::from_secs(config.bot.image_fetch_timeout_secs))?;
    image_fetch::check_recipe_images(&pool, &image_fetcher).await;

    let reminder_registry = Arc::new(ReminderRegistry::new(ReminderSchedule::from_config(
        &config.reminders,
    )));

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.bot.http_timeout_secs))
        .build()?;
    let bot = Bot::with_client(config.bot.token.clone(), client);

    let shutdown = CancellationToken::new();
    let reminder_task = tokio::spawn(reminders::run_reminder_loop(
        bot.clone(),
        Arc::clone(&reminder_registry),
        Arc::clone(&localization_manager),
        Duration::from_secs(1),
        shutdown.clone(),
    ));

    let services = Arc::new(BotServices {
        pool: pool.clone(),
        localization: localization_manager,
        reminders: reminder_registry,
        image_fetcher,
    });

    info!(
        http_timeout_secs = config.bot.http_timeout_secs,
        "Bot initialized, starting dispatcher"
    );

    let dialogue_storage = InMemStorage::<ChatState>::new();

    let handler = dptree::entry().branch(Update::filter_message().endpoint({
        let storage = dialogue_storage.clone();
        let services = Arc::clone(&services);
        move |bot: Bot, msg: Message| {
            let storage = storage.clone();
            let services = Arc::clone(&services);
            let dialogue = CalorieDialogue::new(storage, msg.chat.id);
            async move { bot::message_handler(bot, msg, dialogue, services).await }
        }
    }));

    Dispatcher::builder(bot, handler)
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("Dispatcher stopped, shutting down reminder loop");
    shutdown.cancel();
    if let Err(e) = reminder_task.await {
        error_logging::log_internal_error(&e, "reminders", "join_reminder_loop", None);
    }
    pool.close().await;

    Ok(())
}
