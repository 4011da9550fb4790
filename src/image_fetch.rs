//! # Recipe Image Fetching
//!
//! Downloads recipe images from their stored URLs with a browser-like header
//! set, used as the fallback path when Telegram cannot fetch a URL itself.

use std::time::Duration;

use anyhow::Result;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER, USER_AGENT};
use reqwest::{StatusCode, Url};
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

/// Smallest payload accepted as an image
pub const MIN_IMAGE_BYTES: usize = 100;

/// Default bound on a single image download
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Custom error types for image fetch operations
#[derive(Debug, Clone, PartialEq)]
pub enum ImageFetchError {
    /// Stored URL could not be parsed
    InvalidUrl(String),
    /// Transport-level failure (DNS, TLS, connection reset)
    Request(String),
    /// Download exceeded the configured timeout
    Timeout(String),
    /// Server answered with something other than 200
    Status(u16),
    /// Body was smaller than [`MIN_IMAGE_BYTES`]
    TooSmall(usize),
}

impl std::fmt::Display for ImageFetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageFetchError::InvalidUrl(msg) => write!(f, "[IMAGE_URL] Invalid image URL: {}", msg),
            ImageFetchError::Request(msg) => write!(f, "[IMAGE_REQUEST] Image request failed: {}", msg),
            ImageFetchError::Timeout(msg) => write!(f, "[IMAGE_TIMEOUT] Image download timed out: {}", msg),
            ImageFetchError::Status(code) => write!(f, "[IMAGE_STATUS] Unexpected status code: {}", code),
            ImageFetchError::TooSmall(len) => write!(f, "[IMAGE_SIZE] Image payload too small: {} bytes", len),
        }
    }
}

impl std::error::Error for ImageFetchError {}

impl From<reqwest::Error> for ImageFetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ImageFetchError::Timeout(err.to_string())
        } else {
            ImageFetchError::Request(err.to_string())
        }
    }
}

/// Acceptance rule for a downloaded image: status 200 and at least
/// [`MIN_IMAGE_BYTES`] of payload.
pub fn validate_image_response(status: StatusCode, len: usize) -> Result<(), ImageFetchError> {
    if status != StatusCode::OK {
        return Err(ImageFetchError::Status(status.as_u16()));
    }
    if len < MIN_IMAGE_BYTES {
        return Err(ImageFetchError::TooSmall(len));
    }
    Ok(())
}

/// Parse a stored image URL
pub fn parse_image_url(raw: &str) -> Result<Url, ImageFetchError> {
    Url::parse(raw).map_err(|e| ImageFetchError::InvalidUrl(format!("{raw}: {e}")))
}

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("image/jpeg,image/png,image/*;q=0.8,*/*;q=0.5"),
    );
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("ru-RU,ru;q=0.8,en-US;q=0.5,en;q=0.3"),
    );
    headers.insert(REFERER, HeaderValue::from_static("https://www.google.com/"));
    headers
}

/// HTTP client wrapper for recipe image downloads
#[derive(Debug, Clone)]
pub struct ImageFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl ImageFetcher {
    /// Build a fetcher whose requests are bounded by `timeout`
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .default_headers(browser_headers())
            .timeout(timeout)
            .build()?;
        Ok(Self { client, timeout })
    }

    /// Download an image, rejecting non-200 answers and tiny payloads
    pub async fn fetch(&self, raw_url: &str) -> Result<Vec<u8>, ImageFetchError> {
        let url = parse_image_url(raw_url)?;
        debug!(url = %url, timeout_ms = self.timeout.as_millis() as u64, "Fetching recipe image");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(ImageFetchError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        validate_image_response(status, body.len())?;

        debug!(bytes = body.len(), "Recipe image downloaded");
        Ok(body.to_vec())
    }
}

/// Check at startup that the breakfast recipe image is reachable. Only logs.
pub async fn check_recipe_images(pool: &SqlitePool, fetcher: &ImageFetcher) {
    info!("Checking recipe image URL availability");

    let recipe = match crate::db::get_recipe(pool, "Завтрак").await {
        Ok(Some(recipe)) => recipe,
        Ok(None) => {
            warn!("No breakfast recipe to check");
            return;
        }
        Err(e) => {
            crate::errors::error_logging::log_database_error(&e, "check_recipe_images", None);
            return;
        }
    };

    let Some(image_url) = recipe.image_url.as_deref().filter(|url| !url.is_empty()) else {
        warn!(recipe = %recipe.name, "Breakfast recipe has no image URL");
        return;
    };

    match fetcher.fetch(image_url).await {
        Ok(bytes) => info!(
            recipe = %recipe.name,
            bytes = bytes.len(),
            "Sample image URL is reachable"
        ),
        Err(e) => warn!(
            recipe = %recipe.name,
            url = %image_url,
            error = %e,
            "Sample image URL is not usable"
        ),
    }
}
