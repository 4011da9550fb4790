//! UI Builder module for creating keyboards and formatting messages

use std::collections::BTreeMap;

use teloxide::types::{KeyboardButton, KeyboardMarkup};
use teloxide::utils::html;

use super::routing::{Goal, MealType};
use crate::db::{MealPlanRow, Recipe};
use crate::localization::{t_args_lang, t_lang, LocalizationManager};
use crate::nutrition::CalorieEstimate;
use crate::reminders::{MealReminder, ReminderSchedule};

/// One goal button per row
pub fn create_goal_keyboard() -> KeyboardMarkup {
    let rows: Vec<Vec<KeyboardButton>> = Goal::ALL
        .into_iter()
        .map(|goal| vec![KeyboardButton::new(goal.label())])
        .collect();
    KeyboardMarkup::new(rows).resize_keyboard()
}

/// Meal-type buttons, two per row
pub fn create_meal_type_keyboard() -> KeyboardMarkup {
    let rows: Vec<Vec<KeyboardButton>> = MealType::ALL
        .chunks(2)
        .map(|chunk| chunk.iter().map(|meal| KeyboardButton::new(meal.label())).collect())
        .collect();
    KeyboardMarkup::new(rows).resize_keyboard()
}

pub fn format_welcome(localization: &LocalizationManager, name: &str, language_code: Option<&str>) -> String {
    format!(
        "{}\n\n{}\n\n{}\n{}\n{}\n{}\n\n{}\n\n{}",
        t_args_lang(localization, "welcome-greeting", &[("name", name)], language_code),
        t_lang(localization, "welcome-intro", language_code),
        t_lang(localization, "welcome-can-do", language_code),
        t_lang(localization, "welcome-feature-track", language_code),
        t_lang(localization, "welcome-feature-control", language_code),
        t_lang(localization, "welcome-feature-goals", language_code),
        t_lang(localization, "welcome-start-now", language_code),
        t_lang(localization, "welcome-register-hint", language_code)
    )
}

pub fn format_welcome_back(localization: &LocalizationManager, name: &str, language_code: Option<&str>) -> String {
    format!(
        "{}\n\n{}",
        t_args_lang(localization, "welcome-back", &[("name", name)], language_code),
        t_lang(localization, "welcome-back-body", language_code)
    )
}

pub fn format_registration_success(localization: &LocalizationManager, language_code: Option<&str>) -> String {
    [
        "reg-success",
        "reg-commands-intro",
        "reg-command-plan",
        "reg-command-recipe",
        "reg-command-track",
        "reg-command-help",
    ]
    .iter()
    .map(|key| t_lang(localization, key, language_code))
    .collect::<Vec<_>>()
    .join("\n")
}

/// Command overview, HTML formatted
pub fn format_help(localization: &LocalizationManager, language_code: Option<&str>) -> String {
    let commands = [
        "help-start",
        "help-reg",
        "help-plan",
        "help-recipe",
        "help-track",
        "help-healthtip",
        "help-setreminder",
        "help-help",
    ]
    .iter()
    .map(|key| html::escape(&t_lang(localization, key, language_code)))
    .collect::<Vec<_>>()
    .join("\n");

    format!(
        "{}\n\n{}\n{}\n\n{}",
        html::bold(&html::escape(&t_lang(localization, "help-title", language_code))),
        html::bold(&html::escape(&t_lang(localization, "help-commands", language_code))),
        commands,
        html::escape(&t_lang(localization, "help-footer", language_code))
    )
}

/// Weekly plan grouped per day.
///
/// Days are listed in lexical order of their names, meals in the order the
/// rows arrive.
pub fn format_meal_plan(
    localization: &LocalizationManager,
    goal: Goal,
    rows: &[MealPlanRow],
    language_code: Option<&str>,
) -> String {
    let mut days: BTreeMap<&str, Vec<&MealPlanRow>> = BTreeMap::new();
    for row in rows {
        days.entry(row.day.as_str()).or_default().push(row);
    }

    let goal_name = goal.category().to_lowercase();
    let mut text = t_args_lang(localization, "plan-header", &[("goal", goal_name.as_str())], language_code);
    text.push_str("\n\n");

    for (day, meals) in &days {
        text.push_str(&format!("🔸 {}:\n", day));
        for row in meals {
            let calories = row.calories.to_string();
            let line = t_args_lang(
                localization,
                "plan-line",
                &[
                    ("meal", row.meal.as_str()),
                    ("dish", row.dish.as_str()),
                    ("calories", calories.as_str()),
                ],
                language_code,
            );
            text.push_str(&format!("  {}\n", line));
        }
        text.push('\n');
    }

    text.push_str(&t_lang(localization, "plan-footer", language_code));
    text
}

/// Recipe card, HTML formatted
pub fn format_recipe(
    localization: &LocalizationManager,
    recipe: &Recipe,
    image_delivered: bool,
    language_code: Option<&str>,
) -> String {
    let label = |key: &str| html::bold(&html::escape(&t_lang(localization, key, language_code)));

    let mut text = format!("🍽️ {}\n\n", html::bold(&html::escape(&recipe.name)));
    if !image_delivered {
        text.push_str(&format!("{}\n\n", label("recipe-image-unavailable")));
    }

    text.push_str(&format!("{}\n", label("recipe-ingredients")));
    for ingredient in &recipe.ingredients {
        text.push_str(&format!("• {}\n", html::escape(ingredient)));
    }

    text.push_str(&format!(
        "\n{}\n{}\n\n{} {}",
        label("recipe-instructions"),
        html::escape(&recipe.instructions),
        label("recipe-calories"),
        html::escape(&recipe.calories)
    ));
    text
}

/// Calorie totals, HTML formatted
pub fn format_calorie_estimate(
    localization: &LocalizationManager,
    description: &str,
    estimate: &CalorieEstimate,
    language_code: Option<&str>,
) -> String {
    let title = t_args_lang(localization, "calories-title", &[("text", description)], language_code);
    let calories = format!("{:.0}", estimate.calories);
    let protein = format!("{:.1}", estimate.protein);
    let fats = format!("{:.1}", estimate.fats);
    let carbs = format!("{:.1}", estimate.carbs);

    let nutrient = |key: &str, value: &str| {
        html::escape(&t_args_lang(localization, key, &[("value", value)], language_code))
    };

    format!(
        "{}\n\n{} {}\n\n{}\n{}\n{}\n{}\n{}\n\n{}",
        html::bold(&html::escape(&title)),
        html::bold(&html::escape(&t_lang(localization, "calories-found-foods", language_code))),
        html::escape(&estimate.found_foods.join(", ")),
        html::bold(&html::escape(&t_lang(localization, "calories-nutrition-header", language_code))),
        nutrient("calories-kcal", &calories),
        nutrient("calories-protein", &protein),
        nutrient("calories-fats", &fats),
        nutrient("calories-carbs", &carbs),
        html::escape(&t_lang(localization, "calories-disclaimer", language_code))
    )
}

/// Confirmation listing the configured reminder times
pub fn format_reminder_confirmation(
    localization: &LocalizationManager,
    schedule: &ReminderSchedule,
    language_code: Option<&str>,
) -> String {
    let time_of = |meal: MealReminder| {
        schedule
            .time_of(meal)
            .map(|time| time.format("%-H:%M").to_string())
            .unwrap_or_default()
    };
    let breakfast = time_of(MealReminder::Breakfast);
    let lunch = time_of(MealReminder::Lunch);
    let dinner = time_of(MealReminder::Dinner);

    t_args_lang(
        localization,
        "reminder-set",
        &[
            ("breakfast", breakfast.as_str()),
            ("lunch", lunch.as_str()),
            ("dinner", dinner.as_str()),
        ],
        language_code,
    )
}

pub fn format_health_tip(localization: &LocalizationManager, tip: &str, language_code: Option<&str>) -> String {
    t_args_lang(localization, "healthtip", &[("tip", tip)], language_code)
}
