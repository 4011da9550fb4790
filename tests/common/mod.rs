//! Shared fixtures: a seeded throwaway database and a tiny HTTP server that
//! stands in for both the Telegram Bot API and remote image hosts.

#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use parking_lot::Mutex;
use plan_eat::config::DatabaseConfig;
use plan_eat::db;
use sqlx::SqlitePool;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// Fresh seeded database. Keep the `TempDir` alive while the pool is used.
pub async fn seeded_pool() -> Result<(TempDir, SqlitePool)> {
    let dir = tempfile::tempdir().context("Failed to create temp dir")?;
    let config = DatabaseConfig {
        url: format!("sqlite://{}", dir.path().join("planeat-flow.db").display()),
        ..DatabaseConfig::default()
    };

    let pool = db::connect_pool(&config).await?;
    db::init_database(&pool).await?;
    Ok((dir, pool))
}

/// One request as the server received it
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn body_contains(&self, needle: &str) -> bool {
        let needle = needle.as_bytes();
        !needle.is_empty() && self.body.windows(needle.len()).any(|w| w == needle)
    }

    /// Telegram method names are case-insensitive; teloxide sends "SendPhoto"
    pub fn path_ends_with(&self, suffix: &str) -> bool {
        self.path.to_ascii_lowercase().ends_with(&suffix.to_ascii_lowercase())
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }
}

/// Response the server writes back
#[derive(Debug, Clone)]
pub struct CannedResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl CannedResponse {
    pub fn json(status: u16, value: serde_json::Value) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: value.to_string().into_bytes(),
        }
    }

    pub fn image(status: u16, len: usize) -> Self {
        Self {
            status,
            content_type: "image/jpeg",
            body: vec![0xD8; len],
        }
    }
}

type Responder = dyn Fn(&RecordedRequest) -> CannedResponse + Send + Sync;

/// Local HTTP/1.1 server answering every request through `respond`
pub struct FakeServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    handle: JoinHandle<()>,
}

impl FakeServer {
    pub async fn start<F>(respond: F) -> Result<Self>
    where
        F: Fn(&RecordedRequest) -> CannedResponse + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let base_url = format!("http://{}", listener.local_addr()?);
        let requests = Arc::new(Mutex::new(Vec::new()));
        let respond: Arc<Responder> = Arc::new(respond);

        let recorded = Arc::clone(&requests);
        let handle = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let recorded = Arc::clone(&recorded);
                let respond = Arc::clone(&respond);
                tokio::spawn(async move {
                    let _ = serve_connection(stream, recorded, respond).await;
                });
            }
        });

        Ok(Self {
            base_url,
            requests,
            handle,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    /// Requests whose path ends with `suffix`, e.g. "/sendPhoto"
    pub fn requests_to(&self, suffix: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|request| request.path_ends_with(suffix))
            .collect()
    }
}

impl Drop for FakeServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn serve_connection(
    mut stream: TcpStream,
    recorded: Arc<Mutex<Vec<RecordedRequest>>>,
    respond: Arc<Responder>,
) -> std::io::Result<()> {
    let Some(request) = read_request(&mut stream).await? else {
        return Ok(());
    };

    let response = respond(&request);
    recorded.lock().push(request);

    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        response.status,
        if response.status == 200 { "OK" } else { "Error" },
        response.content_type,
        response.body.len()
    );
    stream.write_all(head.as_bytes()).await?;
    stream.write_all(&response.body).await?;
    stream.shutdown().await
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

async fn read_more(stream: &mut TcpStream, buf: &mut Vec<u8>) -> std::io::Result<bool> {
    let mut chunk = [0u8; 8192];
    let n = stream.read(&mut chunk).await?;
    buf.extend_from_slice(&chunk[..n]);
    Ok(n > 0)
}

async fn read_request(stream: &mut TcpStream) -> std::io::Result<Option<RecordedRequest>> {
    let mut buf = Vec::new();
    let head_end = loop {
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            break pos + 4;
        }
        if !read_more(stream, &mut buf).await? {
            return Ok(None);
        }
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next().unwrap_or_default().split_whitespace();
    let method = request_line.next().unwrap_or_default().to_string();
    let path = request_line.next().unwrap_or_default().to_string();

    let mut content_length = 0usize;
    let mut chunked = false;
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim().to_ascii_lowercase();
            let value = value.trim();
            if name == "content-length" {
                content_length = value.parse().unwrap_or(0);
            } else if name == "transfer-encoding" && value.eq_ignore_ascii_case("chunked") {
                chunked = true;
            }
        }
    }

    let mut body = buf[head_end..].to_vec();
    if chunked {
        body = loop {
            if let Some(decoded) = decode_chunked(&body) {
                break decoded;
            }
            if !read_more(stream, &mut body).await? {
                break Vec::new();
            }
        };
    } else {
        while body.len() < content_length {
            if !read_more(stream, &mut body).await? {
                break;
            }
        }
        body.truncate(content_length);
    }

    Ok(Some(RecordedRequest { method, path, body }))
}

/// Decode a complete chunked body, or `None` while the final chunk is missing
fn decode_chunked(mut raw: &[u8]) -> Option<Vec<u8>> {
    let mut out = Vec::new();
    loop {
        let line_end = find(raw, b"\r\n")?;
        let size_line = String::from_utf8_lossy(&raw[..line_end]).to_string();
        let size_hex = size_line.split(';').next().unwrap_or_default().trim();
        let size = usize::from_str_radix(size_hex, 16).ok()?;
        raw = &raw[line_end + 2..];

        if size == 0 {
            return Some(out);
        }
        if raw.len() < size + 2 {
            return None;
        }
        out.extend_from_slice(&raw[..size]);
        raw = &raw[size + 2..];
    }
}
