//! Message Handler module for processing incoming Telegram messages

use std::sync::Arc;

use anyhow::Result;
use sqlx::SqlitePool;
use teloxide::prelude::*;
use teloxide::types::{KeyboardRemove, ParseMode, ReplyParameters};
use tracing::{debug, Instrument};

use super::command_handlers::{
    handle_healthtip_command, handle_help_command, handle_plan_command, handle_recipe_command,
    handle_reg_command, handle_setreminder_command, handle_start_command, handle_track_command,
    handle_unrecognized_message,
};
use super::image_delivery::deliver_recipe_image;
use super::routing::{route_message, settled_state, Command, Goal, MealType, Route};
use super::ui_builder::{format_calorie_estimate, format_meal_plan, format_recipe};
use super::{BotServices, HandlerContext};
use crate::db;
use crate::dialogue::CalorieDialogue;
use crate::errors::{error_logging, AppError};
use crate::localization::t_lang;
use crate::nutrition::estimate_calories;
use crate::observability;

/// Entry point for every inbound message
pub async fn message_handler(
    bot: Bot,
    msg: Message,
    dialogue: CalorieDialogue,
    services: Arc<BotServices>,
) -> Result<()> {
    let span = observability::telegram_span("message_handler", msg.chat.id.0);

    async move {
        let language_code = msg
            .from
            .as_ref()
            .and_then(|user| user.language_code.as_deref());

        let ctx = HandlerContext {
            bot: &bot,
            msg: &msg,
            localization: &services.localization,
            language_code,
        };

        let Some(text) = msg.text() else {
            observability::record_telegram_message("non_text");
            return handle_unrecognized_message(&ctx).await;
        };
        observability::record_telegram_message("text");

        let state = dialogue.get_or_default().await?;
        let route = route_message(text, &state);
        debug!(user_id = %msg.chat.id, route = ?route, "Routing message");

        let result = handle_route(&ctx, &services, &route).await;
        dialogue.update(settled_state(&route, result.is_ok())).await?;

        if let Err(e) = result {
            let app_error = AppError::from(e);
            match &app_error {
                AppError::Database(_) => {
                    error_logging::log_database_error(&app_error, "handle_route", Some(msg.chat.id.0))
                }
                _ => error_logging::log_internal_error(
                    &app_error,
                    "message_handler",
                    "handle_route",
                    Some(msg.chat.id.0),
                ),
            }
            bot.send_message(
                msg.chat.id,
                t_lang(&services.localization, "error-generic", language_code),
            )
            .await?;
        }

        Ok(())
    }
    .instrument(span)
    .await
}

async fn handle_route(ctx: &HandlerContext<'_>, services: &BotServices, route: &Route) -> Result<()> {
    match route {
        Route::Command(command) => {
            observability::record_command(command.name());
            match command {
                Command::Start => handle_start_command(ctx, &services.pool).await,
                Command::Reg => handle_reg_command(ctx, &services.pool).await,
                Command::Plan => handle_plan_command(ctx).await,
                Command::Recipe => handle_recipe_command(ctx).await,
                Command::Track => handle_track_command(ctx).await,
                Command::Help => handle_help_command(ctx).await,
                Command::HealthTip => handle_healthtip_command(ctx, &services.pool).await,
                Command::SetReminder => handle_setreminder_command(ctx, &services.reminders).await,
            }
        }
        Route::GoalSelected(goal) => handle_goal_selected(ctx, &services.pool, *goal).await,
        Route::MealTypeSelected(meal_type) => handle_meal_type_selected(ctx, services, *meal_type).await,
        Route::FoodDescription(description) => {
            handle_food_description(ctx, &services.pool, description).await
        }
        Route::Unrecognized => handle_unrecognized_message(ctx).await,
    }
}

/// Send the weekly plan for a goal picked from the keyboard
async fn handle_goal_selected(ctx: &HandlerContext<'_>, pool: &SqlitePool, goal: Goal) -> Result<()> {
    let rows = db::get_meal_plan(pool, goal.category()).await?;

    let text = if rows.is_empty() {
        t_lang(ctx.localization, "plan-not-found", ctx.language_code)
    } else {
        format_meal_plan(ctx.localization, goal, &rows, ctx.language_code)
    };

    ctx.bot
        .send_message(ctx.chat_id(), text)
        .reply_parameters(ReplyParameters::new(ctx.msg.id))
        .reply_markup(KeyboardRemove::new())
        .await?;

    ctx.bot
        .send_message(
            ctx.chat_id(),
            t_lang(ctx.localization, "plan-recipe-suggestion", ctx.language_code),
        )
        .await?;
    Ok(())
}

/// Send the photo and recipe card for a meal type picked from the keyboard
async fn handle_meal_type_selected(
    ctx: &HandlerContext<'_>,
    services: &BotServices,
    meal_type: MealType,
) -> Result<()> {
    let Some(recipe) = db::get_recipe(&services.pool, meal_type.category()).await? else {
        ctx.bot
            .send_message(
                ctx.chat_id(),
                t_lang(ctx.localization, "recipe-not-found", ctx.language_code),
            )
            .reply_parameters(ReplyParameters::new(ctx.msg.id))
            .await?;
        return Ok(());
    };

    let delivery =
        deliver_recipe_image(ctx.bot, ctx.chat_id(), &recipe, &services.image_fetcher).await;
    debug!(recipe = %recipe.name, delivery = delivery.as_str(), "Recipe image delivery finished");

    ctx.bot
        .send_message(
            ctx.chat_id(),
            format_recipe(ctx.localization, &recipe, delivery.is_delivered(), ctx.language_code),
        )
        .parse_mode(ParseMode::Html)
        .reply_parameters(ReplyParameters::new(ctx.msg.id))
        .reply_markup(KeyboardRemove::new())
        .await?;
    Ok(())
}

/// Estimate nutrition for the reply to a `/track` prompt
async fn handle_food_description(
    ctx: &HandlerContext<'_>,
    pool: &SqlitePool,
    description: &str,
) -> Result<()> {
    let foods = db::get_food_data(pool).await?;
    let estimate = estimate_calories(description, &foods);
    observability::record_calorie_estimation(estimate.is_some());

    let request = match estimate {
        Some(estimate) => ctx
            .bot
            .send_message(
                ctx.chat_id(),
                format_calorie_estimate(ctx.localization, description, &estimate, ctx.language_code),
            )
            .parse_mode(ParseMode::Html),
        None => ctx.bot.send_message(
            ctx.chat_id(),
            t_lang(ctx.localization, "calories-not-recognized", ctx.language_code),
        ),
    };

    request
        .reply_parameters(ReplyParameters::new(ctx.msg.id))
        .await?;
    Ok(())
}
