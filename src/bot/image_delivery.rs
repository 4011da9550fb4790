//! Recipe photo delivery with a download-and-upload fallback.

use teloxide::prelude::*;
use teloxide::types::InputFile;
use tracing::{info, warn};

use crate::db::Recipe;
use crate::errors::error_logging;
use crate::image_fetch::{parse_image_url, ImageFetcher};
use crate::observability::record_image_delivery;

/// How (and whether) a recipe photo reached the chat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageDelivery {
    /// Telegram fetched the stored URL itself
    Delivered,
    /// The bot downloaded the image and uploaded the bytes
    DeliveredViaFallback,
    Unavailable,
}

impl ImageDelivery {
    pub fn is_delivered(self) -> bool {
        !matches!(self, ImageDelivery::Unavailable)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ImageDelivery::Delivered => "direct",
            ImageDelivery::DeliveredViaFallback => "fallback",
            ImageDelivery::Unavailable => "unavailable",
        }
    }
}

/// Send the recipe photo. Failures never propagate; they only change the result.
pub async fn deliver_recipe_image(
    bot: &Bot,
    chat_id: ChatId,
    recipe: &Recipe,
    fetcher: &ImageFetcher,
) -> ImageDelivery {
    let outcome = try_deliver(bot, chat_id, recipe, fetcher).await;
    record_image_delivery(outcome.as_str());
    outcome
}

async fn try_deliver(bot: &Bot, chat_id: ChatId, recipe: &Recipe, fetcher: &ImageFetcher) -> ImageDelivery {
    let Some(raw_url) = recipe.image_url.as_deref().filter(|url| !url.is_empty()) else {
        return ImageDelivery::Unavailable;
    };

    let url = match parse_image_url(raw_url) {
        Ok(url) => url,
        Err(e) => {
            warn!(recipe = %recipe.name, error = %e, "Stored recipe image URL is malformed");
            return ImageDelivery::Unavailable;
        }
    };

    match bot.send_photo(chat_id, InputFile::url(url)).await {
        Ok(_) => {
            info!(recipe = %recipe.name, "Recipe image sent by URL");
            return ImageDelivery::Delivered;
        }
        Err(e) => warn!(recipe = %recipe.name, error = %e, "Direct image send failed, downloading"),
    }

    let bytes = match fetcher.fetch(raw_url).await {
        Ok(bytes) => bytes,
        Err(e) => {
            error_logging::log_network_error(&e, "fetch_recipe_image", Some(raw_url), Some(1));
            return ImageDelivery::Unavailable;
        }
    };

    let photo = InputFile::memory(bytes).file_name(format!("{}.jpg", recipe.name));
    match bot.send_photo(chat_id, photo).await {
        Ok(_) => {
            info!(recipe = %recipe.name, "Recipe image sent from downloaded bytes");
            ImageDelivery::DeliveredViaFallback
        }
        Err(e) => {
            error_logging::log_network_error(&e, "upload_recipe_image", Some(raw_url), Some(2));
            ImageDelivery::Unavailable
        }
    }
}
