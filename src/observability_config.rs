//! # Observability Configuration
//!
//! Environment-specific settings for logging and metrics export.

use std::env;

/// Observability configuration for different environments
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Environment name (development, staging, production)
    pub environment: String,
    /// Prometheus metrics endpoint port
    pub metrics_port: u16,
    /// Log level for the bot's own targets
    pub log_level: String,
    /// Log output format: "pretty" or "json"
    pub log_format: String,
    /// Whether to serve the metrics/health endpoint
    pub enable_metrics_export: bool,
    /// Global labels attached to every exported metric
    pub tags: Vec<(String, String)>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            metrics_port: 9090,
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            enable_metrics_export: true,
            tags: Vec::new(),
        }
    }
}

impl ObservabilityConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        let default_format = if environment == "development" { "pretty" } else { "json" };

        let mut config = Self {
            log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| default_format.to_string()),
            environment,
            metrics_port: env::var("METRICS_PORT")
                .unwrap_or_else(|_| "9090".to_string())
                .parse()
                .unwrap_or(9090),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            enable_metrics_export: env::var("ENABLE_METRICS_EXPORT")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap_or(true),
            tags: env::var("SERVICE_TAGS")
                .map(|raw| parse_tags(&raw))
                .unwrap_or_default(),
        };
        config.add_default_tags();
        config
    }

    fn add_default_tags(&mut self) {
        self.tags.push(("environment".to_string(), self.environment.clone()));
        self.tags.push(("service".to_string(), "plan-eat-bot".to_string()));

        if let Ok(hostname) = env::var("HOSTNAME") {
            self.tags.push(("hostname".to_string(), hostname));
        }
    }

    /// Whether log lines are emitted as JSON
    pub fn uses_json_logs(&self) -> bool {
        self.log_format == "json"
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.metrics_port == 0 {
            return Err(format!("Invalid metrics port: {}", self.metrics_port));
        }

        if !matches!(self.log_format.as_str(), "pretty" | "json") {
            return Err(format!("Invalid log format: {}", self.log_format));
        }

        if !matches!(
            self.log_level.as_str(),
            "trace" | "debug" | "info" | "warn" | "error"
        ) {
            return Err(format!("Invalid log level: {}", self.log_level));
        }

        Ok(())
    }
}

/// Parse tags from a "key1=value1,key2=value2" string
fn parse_tags(tags_str: &str) -> Vec<(String, String)> {
    tags_str
        .split(',')
        .filter_map(|pair| {
            let mut parts = pair.splitn(2, '=');
            match (parts.next(), parts.next()) {
                (Some(key), Some(value)) if !key.trim().is_empty() => {
                    Some((key.trim().to_string(), value.trim().to_string()))
                }
                _ => None,
            }
        })
        .collect()
}
