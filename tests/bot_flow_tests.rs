//! End-to-end handler flows against a local stand-in for the Bot API.

mod common;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use common::{seeded_pool, CannedResponse, FakeServer, RecordedRequest};
use plan_eat::bot::{deliver_recipe_image, message_handler, BotServices, ImageDelivery};
use plan_eat::db::{self, Recipe};
use plan_eat::dialogue::{CalorieDialogue, ChatState};
use plan_eat::image_fetch::ImageFetcher;
use plan_eat::localization::create_localization_manager;
use plan_eat::reminders::{ReminderRegistry, ReminderSchedule};
use serde_json::json;
use sqlx::SqlitePool;
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::prelude::*;
use teloxide::types::Message;

const TOKEN: &str = "123456:TEST-TOKEN";
const CHAT_ID: i64 = 4242;
const USER_ID: i64 = 77;
const IMAGE_NOT_AVAILABLE: &str = "Изображение блюда недоступно";

fn sent_message() -> serde_json::Value {
    json!({
        "message_id": 500,
        "date": 1_700_000_000,
        "chat": { "id": CHAT_ID, "type": "private", "first_name": "Анна" },
        "from": { "id": 1, "is_bot": true, "first_name": "PlanEat", "username": "PlanEatBot" },
        "text": "ok"
    })
}

fn telegram_ok() -> CannedResponse {
    CannedResponse::json(200, json!({ "ok": true, "result": sent_message() }))
}

fn telegram_rejects_url() -> CannedResponse {
    CannedResponse::json(
        400,
        json!({
            "ok": false,
            "error_code": 400,
            "description": "Bad Request: wrong file identifier/HTTP URL specified"
        }),
    )
}

/// Bot API plus image host. Direct photo sends carry the image URL in their
/// body; uploads carry the bytes instead.
async fn start_fake_api(direct_photo_ok: bool, image_status: u16, image_len: usize) -> Result<FakeServer> {
    FakeServer::start(move |request: &RecordedRequest| {
        if request.path.starts_with("/img/") {
            return CannedResponse::image(image_status, image_len);
        }
        if request.path_ends_with("/sendPhoto") && request.body_contains("/img/") && !direct_photo_ok {
            return telegram_rejects_url();
        }
        telegram_ok()
    })
    .await
}

fn bot_for(server: &FakeServer) -> Result<Bot> {
    Ok(Bot::new(TOKEN).set_api_url(reqwest::Url::parse(&server.base_url)?))
}

fn fetcher() -> Result<ImageFetcher> {
    ImageFetcher::new(Duration::from_secs(5))
}

fn recipe_with_image(image_url: Option<String>) -> Recipe {
    Recipe {
        id: 1,
        meal_type: "Завтрак".to_string(),
        name: "Омлет с овощами и сыром".to_string(),
        instructions: "Взбить яйца".to_string(),
        calories: "Около 350 ккал".to_string(),
        image_url,
        ingredients: vec!["3 яйца".to_string()],
    }
}

fn incoming(text: &str) -> Message {
    serde_json::from_value(json!({
        "message_id": 1,
        "date": 1_700_000_000,
        "chat": { "id": CHAT_ID, "type": "private", "first_name": "Анна" },
        "from": {
            "id": USER_ID,
            "is_bot": false,
            "first_name": "Анна",
            "username": "anna",
            "language_code": "ru"
        },
        "text": text
    }))
    .expect("valid incoming message")
}

fn services(pool: &SqlitePool) -> Result<Arc<BotServices>> {
    Ok(Arc::new(BotServices {
        pool: pool.clone(),
        localization: create_localization_manager()?,
        reminders: Arc::new(ReminderRegistry::new(ReminderSchedule::default())),
        image_fetcher: fetcher()?,
    }))
}

async fn send(
    bot: &Bot,
    services: &Arc<BotServices>,
    storage: &Arc<InMemStorage<ChatState>>,
    text: &str,
) -> Result<()> {
    let dialogue = CalorieDialogue::new(Arc::clone(storage), ChatId(CHAT_ID));
    message_handler(bot.clone(), incoming(text), dialogue, Arc::clone(services)).await
}

fn last_message_text(server: &FakeServer) -> String {
    server
        .requests_to("/sendMessage")
        .last()
        .map(RecordedRequest::body_text)
        .unwrap_or_default()
}

async fn point_breakfast_image_at(pool: &SqlitePool, url: &str) -> Result<()> {
    sqlx::query("UPDATE recipes SET image_url = ? WHERE meal_type = 'Завтрак'")
        .bind(url)
        .execute(pool)
        .await?;
    Ok(())
}

#[tokio::test]
async fn test_direct_photo_send_is_delivered() -> Result<()> {
    let server = start_fake_api(true, 200, 4096).await?;
    let bot = bot_for(&server)?;
    let recipe = recipe_with_image(Some(server.url("/img/omelette.jpg")));

    let outcome = deliver_recipe_image(&bot, ChatId(CHAT_ID), &recipe, &fetcher()?).await;

    assert_eq!(outcome, ImageDelivery::Delivered);
    assert_eq!(server.requests_to("/sendPhoto").len(), 1);
    assert!(server.requests_to("/img/omelette.jpg").is_empty());
    Ok(())
}

#[tokio::test]
async fn test_rejected_url_falls_back_to_upload() -> Result<()> {
    let server = start_fake_api(false, 200, 4096).await?;
    let bot = bot_for(&server)?;
    let recipe = recipe_with_image(Some(server.url("/img/omelette.jpg")));

    let outcome = deliver_recipe_image(&bot, ChatId(CHAT_ID), &recipe, &fetcher()?).await;

    assert_eq!(outcome, ImageDelivery::DeliveredViaFallback);
    assert_eq!(server.requests_to("/img/omelette.jpg").len(), 1);

    let photos = server.requests_to("/sendPhoto");
    assert_eq!(photos.len(), 2);
    assert!(photos[0].body_contains("/img/omelette.jpg"));
    assert!(!photos[1].body_contains("/img/omelette.jpg"));
    Ok(())
}

#[tokio::test]
async fn test_missing_image_is_unavailable() -> Result<()> {
    let server = start_fake_api(false, 404, 4096).await?;
    let bot = bot_for(&server)?;
    let recipe = recipe_with_image(Some(server.url("/img/gone.jpg")));

    let outcome = deliver_recipe_image(&bot, ChatId(CHAT_ID), &recipe, &fetcher()?).await;

    assert_eq!(outcome, ImageDelivery::Unavailable);
    assert_eq!(server.requests_to("/sendPhoto").len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_tiny_image_is_unavailable() -> Result<()> {
    let server = start_fake_api(false, 200, 42).await?;
    let bot = bot_for(&server)?;
    let recipe = recipe_with_image(Some(server.url("/img/pixel.jpg")));

    let outcome = deliver_recipe_image(&bot, ChatId(CHAT_ID), &recipe, &fetcher()?).await;

    assert_eq!(outcome, ImageDelivery::Unavailable);
    assert_eq!(server.requests_to("/sendPhoto").len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_recipe_without_url_sends_nothing() -> Result<()> {
    let server = start_fake_api(true, 200, 4096).await?;
    let bot = bot_for(&server)?;

    let outcome = deliver_recipe_image(&bot, ChatId(CHAT_ID), &recipe_with_image(None), &fetcher()?).await;

    assert_eq!(outcome, ImageDelivery::Unavailable);
    assert!(server.requests().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_recipe_card_notes_unavailable_image() -> Result<()> {
    let server = start_fake_api(false, 404, 4096).await?;
    let bot = bot_for(&server)?;
    let (_dir, pool) = seeded_pool().await?;
    point_breakfast_image_at(&pool, &server.url("/img/gone.jpg")).await?;
    let services = services(&pool)?;
    let storage = InMemStorage::<ChatState>::new();

    send(&bot, &services, &storage, "Завтрак 🍳").await?;

    let card = last_message_text(&server);
    assert!(card.contains("Омлет с овощами и сыром"));
    assert!(card.contains(IMAGE_NOT_AVAILABLE));
    Ok(())
}

#[tokio::test]
async fn test_recipe_card_after_fallback_has_no_note() -> Result<()> {
    let server = start_fake_api(false, 200, 4096).await?;
    let bot = bot_for(&server)?;
    let (_dir, pool) = seeded_pool().await?;
    point_breakfast_image_at(&pool, &server.url("/img/omelette.jpg")).await?;
    let services = services(&pool)?;
    let storage = InMemStorage::<ChatState>::new();

    send(&bot, &services, &storage, "Завтрак 🍳").await?;

    assert_eq!(server.requests_to("/sendPhoto").len(), 2);
    let card = last_message_text(&server);
    assert!(card.contains("Омлет с овощами и сыром"));
    assert!(!card.contains(IMAGE_NOT_AVAILABLE));
    Ok(())
}

#[tokio::test]
async fn test_start_greets_without_registering() -> Result<()> {
    let server = start_fake_api(true, 200, 4096).await?;
    let bot = bot_for(&server)?;
    let (_dir, pool) = seeded_pool().await?;
    let services = services(&pool)?;
    let storage = InMemStorage::<ChatState>::new();

    send(&bot, &services, &storage, "/start").await?;
    assert!(!db::user_exists(&pool, USER_ID).await?);
    assert!(last_message_text(&server).contains("/reg"));

    send(&bot, &services, &storage, "/reg").await?;
    assert!(db::user_exists(&pool, USER_ID).await?);
    assert!(last_message_text(&server).contains("Ты успешно зарегистрирован"));

    let users = db::get_all_users(&pool).await?;
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].chat_id, CHAT_ID);
    assert_eq!(users[0].username.as_deref(), Some("anna"));

    send(&bot, &services, &storage, "/start").await?;
    assert!(last_message_text(&server).contains("С возвращением, Анна!"));

    send(&bot, &services, &storage, "/reg").await?;
    assert!(last_message_text(&server).contains("Ты уже зарегистрирован"));
    assert_eq!(db::get_all_users(&pool).await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_track_then_description_estimates() -> Result<()> {
    let server = start_fake_api(true, 200, 4096).await?;
    let bot = bot_for(&server)?;
    let (_dir, pool) = seeded_pool().await?;
    let services = services(&pool)?;
    let storage = InMemStorage::<ChatState>::new();

    send(&bot, &services, &storage, "/track").await?;
    let dialogue = CalorieDialogue::new(Arc::clone(&storage), ChatId(CHAT_ID));
    assert_eq!(dialogue.get_or_default().await?, ChatState::AwaitingFoodDescription);

    send(&bot, &services, &storage, "курица и рис").await?;
    let reply = last_message_text(&server);
    assert!(reply.contains("295 ккал"));
    assert!(reply.contains("33.7 г"));
    assert_eq!(dialogue.get_or_default().await?, ChatState::Idle);
    Ok(())
}
