//! Command Handlers module for processing bot commands

use anyhow::Result;
use chrono::Local;
use rand::seq::IndexedRandom;
use sqlx::SqlitePool;
use teloxide::prelude::*;
use teloxide::types::{ForceReply, ParseMode, ReplyParameters};
use tracing::{debug, info};

use super::ui_builder::{
    create_goal_keyboard, create_meal_type_keyboard, format_health_tip, format_help,
    format_registration_success, format_reminder_confirmation, format_welcome,
    format_welcome_back,
};
use super::HandlerContext;
use crate::db::{self, NewUser};
use crate::localization::t_lang;
use crate::reminders::{RegistrationOutcome, ReminderRegistry};

fn display_name(ctx: &HandlerContext<'_>) -> String {
    ctx.msg
        .from
        .as_ref()
        .map(|user| user.first_name.clone())
        .unwrap_or_else(|| t_lang(ctx.localization, "default-name", ctx.language_code))
}

/// Handle the /start command. Greets but does not register.
pub async fn handle_start_command(ctx: &HandlerContext<'_>, pool: &SqlitePool) -> Result<()> {
    let Some(user) = ctx.msg.from.as_ref() else {
        return handle_unrecognized_message(ctx).await;
    };
    let user_id = user.id.0 as i64;
    let name = display_name(ctx);

    let text = if db::user_exists(pool, user_id).await? {
        debug!(user_id = %user_id, "Known user started the bot");
        format_welcome_back(ctx.localization, &name, ctx.language_code)
    } else {
        debug!(user_id = %user_id, "New user started the bot");
        format_welcome(ctx.localization, &name, ctx.language_code)
    };

    ctx.bot
        .send_message(ctx.chat_id(), text)
        .reply_parameters(ReplyParameters::new(ctx.msg.id))
        .await?;
    Ok(())
}

/// Handle the /reg command
pub async fn handle_reg_command(ctx: &HandlerContext<'_>, pool: &SqlitePool) -> Result<()> {
    let Some(user) = ctx.msg.from.as_ref() else {
        return handle_unrecognized_message(ctx).await;
    };
    let user_id = user.id.0 as i64;

    let text = if db::user_exists(pool, user_id).await? {
        t_lang(ctx.localization, "reg-already", ctx.language_code)
    } else {
        let new_user = NewUser {
            user_id,
            username: user.username.as_deref(),
            first_name: Some(user.first_name.as_str()),
            last_name: user.last_name.as_deref(),
            chat_id: ctx.chat_id().0,
        };
        db::add_user(pool, &new_user).await?;
        format_registration_success(ctx.localization, ctx.language_code)
    };

    ctx.bot
        .send_message(ctx.chat_id(), text)
        .reply_parameters(ReplyParameters::new(ctx.msg.id))
        .await?;
    Ok(())
}

/// Handle the /plan command
pub async fn handle_plan_command(ctx: &HandlerContext<'_>) -> Result<()> {
    ctx.bot
        .send_message(
            ctx.chat_id(),
            t_lang(ctx.localization, "plan-choose-goal", ctx.language_code),
        )
        .reply_parameters(ReplyParameters::new(ctx.msg.id))
        .reply_markup(create_goal_keyboard())
        .await?;
    Ok(())
}

/// Handle the /recipe command
pub async fn handle_recipe_command(ctx: &HandlerContext<'_>) -> Result<()> {
    ctx.bot
        .send_message(
            ctx.chat_id(),
            t_lang(ctx.localization, "recipe-choose-type", ctx.language_code),
        )
        .reply_parameters(ReplyParameters::new(ctx.msg.id))
        .reply_markup(create_meal_type_keyboard())
        .await?;
    Ok(())
}

/// Handle the /track command. The caller moves the chat to
/// `AwaitingFoodDescription`.
pub async fn handle_track_command(ctx: &HandlerContext<'_>) -> Result<()> {
    ctx.bot
        .send_message(
            ctx.chat_id(),
            t_lang(ctx.localization, "track-prompt", ctx.language_code),
        )
        .reply_markup(ForceReply::new().selective())
        .await?;
    Ok(())
}

/// Handle the /help command
pub async fn handle_help_command(ctx: &HandlerContext<'_>) -> Result<()> {
    ctx.bot
        .send_message(ctx.chat_id(), format_help(ctx.localization, ctx.language_code))
        .parse_mode(ParseMode::Html)
        .reply_parameters(ReplyParameters::new(ctx.msg.id))
        .await?;
    Ok(())
}

/// Uniform pick over the stored tips
pub fn choose_tip(tips: &[String]) -> Option<&str> {
    tips.choose(&mut rand::rng()).map(String::as_str)
}

/// Handle the /healthtip command
pub async fn handle_healthtip_command(ctx: &HandlerContext<'_>, pool: &SqlitePool) -> Result<()> {
    let tips = db::get_health_tips(pool).await?;

    let text = match choose_tip(&tips) {
        Some(tip) => format_health_tip(ctx.localization, tip, ctx.language_code),
        None => t_lang(ctx.localization, "healthtip-none", ctx.language_code),
    };

    ctx.bot
        .send_message(ctx.chat_id(), text)
        .reply_parameters(ReplyParameters::new(ctx.msg.id))
        .await?;
    Ok(())
}

/// Handle the /setreminder command
pub async fn handle_setreminder_command(
    ctx: &HandlerContext<'_>,
    reminders: &ReminderRegistry,
) -> Result<()> {
    let chat_id = ctx.chat_id();
    let outcome = reminders.register(
        chat_id.0,
        ctx.language_code.map(str::to_string),
        Local::now().naive_local(),
    );

    match outcome {
        RegistrationOutcome::Created => info!(chat_id = %chat_id, "Meal reminders registered"),
        RegistrationOutcome::Replaced => info!(chat_id = %chat_id, "Meal reminders re-registered, previous ones replaced"),
    }

    ctx.bot
        .send_message(
            chat_id,
            format_reminder_confirmation(ctx.localization, reminders.schedule(), ctx.language_code),
        )
        .reply_parameters(ReplyParameters::new(ctx.msg.id))
        .await?;
    Ok(())
}

/// Guidance for text that matched nothing and for non-text messages
pub async fn handle_unrecognized_message(ctx: &HandlerContext<'_>) -> Result<()> {
    debug!(user_id = %ctx.chat_id(), "Received unrecognized message");

    ctx.bot
        .send_message(
            ctx.chat_id(),
            t_lang(ctx.localization, "unrecognized-message", ctx.language_code),
        )
        .await?;
    Ok(())
}
