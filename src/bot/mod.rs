//! Bot module for handling Telegram interactions
//!
//! - `routing`: pure mapping from text and chat state to a route
//! - `message_handler`: entry point, dispatches routes and keyboard selections
//! - `command_handlers`: one handler per slash command
//! - `ui_builder`: keyboards and message formatting
//! - `image_delivery`: recipe photo sending with a download fallback

pub mod command_handlers;
pub mod image_delivery;
pub mod message_handler;
pub mod routing;
pub mod ui_builder;

use std::sync::Arc;

use sqlx::SqlitePool;
use teloxide::prelude::*;

use crate::image_fetch::ImageFetcher;
use crate::localization::LocalizationManager;
use crate::reminders::ReminderRegistry;

/// Long-lived dependencies shared by every handler
#[derive(Debug, Clone)]
pub struct BotServices {
    pub pool: SqlitePool,
    pub localization: Arc<LocalizationManager>,
    pub reminders: Arc<ReminderRegistry>,
    pub image_fetcher: ImageFetcher,
}

/// Per-message context for handler functions
#[derive(Debug)]
pub struct HandlerContext<'a> {
    pub bot: &'a Bot,
    pub msg: &'a Message,
    pub localization: &'a Arc<LocalizationManager>,
    pub language_code: Option<&'a str>,
}

impl HandlerContext<'_> {
    pub fn chat_id(&self) -> ChatId {
        self.msg.chat.id
    }
}

pub use image_delivery::{deliver_recipe_image, ImageDelivery};
pub use message_handler::message_handler;
pub use routing::{next_state, route_message, settled_state, Command, Goal, MealType, Route};
