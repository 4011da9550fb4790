//! Observability module for logging, metrics and health endpoints.
//!
//! This module provides:
//! - Structured logging with configurable levels and output format
//! - Metrics collection and Prometheus export
//! - Liveness and readiness endpoints for monitoring

use std::net::SocketAddr;

use anyhow::Result;
use hyper::server::conn::http1;
use hyper_util::rt::TokioIo;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sqlx::SqlitePool;
use tokio::net::TcpListener;
use tracing_subscriber::prelude::*;

use crate::observability_config::ObservabilityConfig;

/// Initialize structured logging with tracing and configuration
pub fn init_tracing(config: &ObservabilityConfig) -> Result<()> {
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid observability configuration: {}", e))?;

    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(format!("plan_eat={}", config.log_level).parse()?)
        .add_directive(format!("planeat_admin={}", config.log_level).parse()?)
        .add_directive("sqlx=warn".parse()?)
        .add_directive("teloxide=warn".parse()?);

    if config.uses_json_logs() {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_thread_names(false),
            )
            .init();
    }

    tracing::info!(
        environment = %config.environment,
        log_level = %config.log_level,
        log_format = %config.log_format,
        "Tracing initialized with structured logging"
    );
    Ok(())
}

/// Install the Prometheus recorder and serve `/metrics` plus health checks.
///
/// Does nothing when metrics export is disabled; the `metrics` macros then
/// record into the no-op recorder.
pub async fn init_metrics(config: &ObservabilityConfig, db_pool: Option<SqlitePool>) -> Result<()> {
    if !config.enable_metrics_export {
        tracing::info!("Metrics export disabled");
        return Ok(());
    }

    let handle = prometheus_builder(config).install_recorder()?;

    start_metrics_server(handle, config.metrics_port, db_pool).await?;

    tracing::info!(
        metrics_port = %config.metrics_port,
        environment = %config.environment,
        global_labels = config.tags.len(),
        "Metrics collection initialized"
    );
    Ok(())
}

/// Prometheus exporter carrying the deployment tags as global labels
pub fn prometheus_builder(config: &ObservabilityConfig) -> PrometheusBuilder {
    config
        .tags
        .iter()
        .fold(PrometheusBuilder::new(), |builder, (key, value)| {
            builder.add_global_label(key.as_str(), value.as_str())
        })
}

async fn start_metrics_server(
    metrics_handle: PrometheusHandle,
    port: u16,
    db_pool: Option<SqlitePool>,
) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Metrics server listening on {}", addr);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((stream, _)) => {
                    let metrics_handle = metrics_handle.clone();
                    let db_pool = db_pool.clone();

                    tokio::spawn(async move {
                        let io = TokioIo::new(stream);

                        let service = hyper::service::service_fn(
                            move |req: hyper::Request<hyper::body::Incoming>| {
                                let metrics_handle = metrics_handle.clone();
                                let db_pool = db_pool.clone();
                                async move {
                                    match (req.method(), req.uri().path()) {
                                        (&hyper::Method::GET, "/metrics") => {
                                            let mut response =
                                                hyper::Response::new(metrics_handle.render());
                                            response.headers_mut().insert(
                                                "content-type",
                                                hyper::header::HeaderValue::from_static(
                                                    "text/plain; version=0.0.4; charset=utf-8",
                                                ),
                                            );
                                            Ok::<_, std::convert::Infallible>(response)
                                        }
                                        (&hyper::Method::GET, "/health/live") => {
                                            Ok(hyper::Response::new("OK".to_string()))
                                        }
                                        (&hyper::Method::GET, "/health/ready") => {
                                            match perform_readiness_checks(db_pool.as_ref()).await {
                                                Ok(()) => Ok(hyper::Response::new("OK".to_string())),
                                                Err(e) => {
                                                    let mut response = hyper::Response::new(
                                                        format!("NOT READY: {}", e),
                                                    );
                                                    *response.status_mut() =
                                                        hyper::StatusCode::SERVICE_UNAVAILABLE;
                                                    Ok(response)
                                                }
                                            }
                                        }
                                        _ => {
                                            let mut response =
                                                hyper::Response::new("Not Found".to_string());
                                            *response.status_mut() = hyper::StatusCode::NOT_FOUND;
                                            Ok(response)
                                        }
                                    }
                                }
                            },
                        );

                        if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                            tracing::error!("Error serving connection: {:?}", err);
                        }
                    });
                }
                Err(e) => {
                    tracing::error!("Error accepting connection: {}", e);
                }
            }
        }
    });

    Ok(())
}

/// Readiness: the database answers a trivial query
pub async fn perform_readiness_checks(db_pool: Option<&SqlitePool>) -> Result<()> {
    if let Some(pool) = db_pool {
        crate::db::check_database_health(pool).await?;
    }
    Ok(())
}

/// Create a span for Telegram bot operations
pub fn telegram_span(operation: &str, chat_id: i64) -> tracing::Span {
    tracing::info_span!(
        "telegram_operation",
        operation = operation,
        chat_id = chat_id,
        component = "telegram"
    )
}

/// Record database operation metrics
pub fn record_db_metrics(operation: &str, duration: std::time::Duration) {
    let operation = operation.to_string();
    metrics::counter!("db_operations_total", "operation" => operation).increment(1);
    metrics::histogram!("db_operation_duration_seconds").record(duration.as_secs_f64());
}

/// Record Telegram message processing metrics
pub fn record_telegram_message(message_type: &str) {
    let message_type = message_type.to_string();
    metrics::counter!("telegram_messages_total", "type" => message_type).increment(1);
}

pub fn record_command(command: &str) {
    let command = command.to_string();
    metrics::counter!("bot_commands_total", "command" => command).increment(1);
}

/// Record how a recipe image reached the chat
pub fn record_image_delivery(outcome: &str) {
    let outcome = outcome.to_string();
    metrics::counter!("recipe_image_delivery_total", "outcome" => outcome).increment(1);
}

pub fn record_calorie_estimation(recognized: bool) {
    metrics::counter!(
        "calorie_estimations_total",
        "result" => if recognized { "recognized" } else { "unrecognized" }
    )
    .increment(1);
}

pub fn record_reminder_fired(meal: &str, delivered: bool) {
    let meal = meal.to_string();
    metrics::counter!(
        "reminders_fired_total",
        "meal" => meal,
        "result" => if delivered { "sent" } else { "failed" }
    )
    .increment(1);
}
