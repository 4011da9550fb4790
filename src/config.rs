//! # Unified Application Configuration
//!
//! All runtime settings live in one [`AppConfig`] loaded from environment
//! variables (after `.env` is read by `dotenvy`) and validated section by
//! section before the bot starts.

use crate::errors::{AppError, AppResult};
use crate::observability_config::ObservabilityConfig;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::env;

/// Bot-specific configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Telegram bot token
    pub token: String,
    /// HTTP client timeout for Telegram API calls, in seconds
    pub http_timeout_secs: u64,
    /// Bound on a single recipe image download, in seconds
    pub image_fetch_timeout_secs: u64,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            http_timeout_secs: 30,
            image_fetch_timeout_secs: crate::image_fetch::DEFAULT_FETCH_TIMEOUT_SECS,
        }
    }
}

impl BotConfig {
    /// Validate bot configuration
    pub fn validate(&self) -> AppResult<()> {
        if self.token.trim().is_empty() {
            return Err(AppError::Config("Bot token cannot be empty".to_string()));
        }

        let parts: Vec<&str> = self.token.split(':').collect();
        if parts.len() != 2 {
            return Err(AppError::Config(
                "Bot token format is invalid. Expected format: 'bot_id:bot_token'".to_string(),
            ));
        }

        if parts[0].parse::<u64>().is_err() {
            return Err(AppError::Config("Bot token bot ID must be numeric".to_string()));
        }

        if parts[1].len() < 20 {
            return Err(AppError::Config(
                "Bot token appears to be too short. Please verify it's a valid token".to_string(),
            ));
        }

        if self.http_timeout_secs == 0 || self.http_timeout_secs > 300 {
            return Err(AppError::Config(
                "HTTP timeout must be between 1 and 300 seconds".to_string(),
            ));
        }

        if self.image_fetch_timeout_secs == 0 || self.image_fetch_timeout_secs > 120 {
            return Err(AppError::Config(
                "Image fetch timeout must be between 1 and 120 seconds".to_string(),
            ));
        }

        Ok(())
    }
}

/// Database configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// How long a connection waits on a locked database, in seconds
    pub busy_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://planeat.db".to_string(),
            max_connections: 5,
            busy_timeout_secs: 5,
        }
    }
}

impl DatabaseConfig {
    /// Validate database configuration
    pub fn validate(&self) -> AppResult<()> {
        if self.url.trim().is_empty() {
            return Err(AppError::Config("Database URL cannot be empty".to_string()));
        }

        if !self.url.starts_with("sqlite:") {
            return Err(AppError::Config(
                "Database URL must start with 'sqlite:'".to_string(),
            ));
        }

        if self.max_connections == 0 {
            return Err(AppError::Config("Max connections cannot be 0".to_string()));
        }

        if self.max_connections > 100 {
            return Err(AppError::Config(
                "Max connections cannot be greater than 100".to_string(),
            ));
        }

        if self.busy_timeout_secs == 0 {
            return Err(AppError::Config("Busy timeout cannot be 0".to_string()));
        }

        Ok(())
    }
}

/// Daily reminder times, local clock
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderConfig {
    pub breakfast: NaiveTime,
    pub lunch: NaiveTime,
    pub dinner: NaiveTime,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            breakfast: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN),
            lunch: NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN),
            dinner: NaiveTime::from_hms_opt(18, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

impl ReminderConfig {
    /// Parse a "HH:MM,HH:MM,HH:MM" list into breakfast, lunch and dinner times
    pub fn parse(raw: &str) -> AppResult<Self> {
        let times = raw
            .split(',')
            .map(|part| {
                NaiveTime::parse_from_str(part.trim(), "%H:%M").map_err(|_| {
                    AppError::Config(format!("Invalid reminder time '{}', expected HH:MM", part.trim()))
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        match times.as_slice() {
            [breakfast, lunch, dinner] => Ok(Self {
                breakfast: *breakfast,
                lunch: *lunch,
                dinner: *dinner,
            }),
            _ => Err(AppError::Config(format!(
                "REMINDER_TIMES must list exactly 3 times, got {}",
                times.len()
            ))),
        }
    }

    /// Validate reminder configuration
    pub fn validate(&self) -> AppResult<()> {
        if !(self.breakfast < self.lunch && self.lunch < self.dinner) {
            return Err(AppError::Config(
                "Reminder times must be in breakfast < lunch < dinner order".to_string(),
            ));
        }
        Ok(())
    }
}

/// Unified application configuration
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub bot: BotConfig,
    pub database: DatabaseConfig,
    pub reminders: ReminderConfig,
    pub observability: ObservabilityConfig,
}

fn parse_env<T: std::str::FromStr>(key: &str, default: &str) -> AppResult<T> {
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .map_err(|_| AppError::Config(format!("{} must be a valid number", key)))
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> AppResult<Self> {
        let mut config = Self::default();

        config.bot.token = env::var("TELEGRAM_BOT_TOKEN").map_err(|_| {
            AppError::Config("TELEGRAM_BOT_TOKEN environment variable is required".to_string())
        })?;
        config.bot.http_timeout_secs = parse_env("HTTP_CLIENT_TIMEOUT_SECS", "30")?;
        config.bot.image_fetch_timeout_secs = parse_env("IMAGE_FETCH_TIMEOUT_SECS", "10")?;

        if let Ok(url) = env::var("DATABASE_URL") {
            config.database.url = url;
        }
        config.database.max_connections = parse_env("DATABASE_MAX_CONNECTIONS", "5")?;
        config.database.busy_timeout_secs = parse_env("DATABASE_BUSY_TIMEOUT_SECS", "5")?;

        if let Ok(raw) = env::var("REMINDER_TIMES") {
            config.reminders = ReminderConfig::parse(&raw)?;
        }

        config.observability = ObservabilityConfig::from_env();

        Ok(config)
    }

    /// Validate all configuration sections
    pub fn validate(&self) -> AppResult<()> {
        self.bot.validate()?;
        self.database.validate()?;
        self.reminders.validate()?;
        self.observability.validate().map_err(AppError::Config)?;
        Ok(())
    }

    /// Get a summary of the current configuration for logging
    pub fn summary(&self) -> String {
        format!(
            "Configuration: bot_token=[REDACTED], db_url={}, reminders={}/{}/{}, image_timeout={}s, metrics_port={}, metrics_enabled={}",
            self.database.url,
            self.reminders.breakfast.format("%H:%M"),
            self.reminders.lunch.format("%H:%M"),
            self.reminders.dinner.format("%H:%M"),
            self.bot.image_fetch_timeout_secs,
            self.observability.metrics_port,
            self.observability.enable_metrics_export
        )
    }
}
