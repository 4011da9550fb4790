//! # PlanEat Telegram Bot
//!
//! A Telegram bot that helps users track calories and offers weekly meal
//! plans, recipes with photos, health tips and daily meal reminders, backed
//! by a small seeded SQLite database.

pub mod bot;
pub mod config;
pub mod db;
pub mod dialogue;
pub mod errors;
pub mod image_fetch;
pub mod localization;
pub mod nutrition;
pub mod observability;
pub mod observability_config;
pub mod reminders;
pub mod seed_data;

// Re-export types for easier access
pub use db::{FoodItem, MealPlanRow, Recipe};
pub use dialogue::ChatState;
pub use nutrition::{estimate_calories, CalorieEstimate};
