//! Logging setup and middleware for logging requests and responses.

use std::{fs::OpenOptions, io, path::Path, sync::Arc};

use axum::{extract::Request, middleware::Next, response::Response};
use tracing_subscriber::{
    EnvFilter, Layer, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Response bodies longer than this many bytes are truncated in `info` logs.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Install the global tracing subscriber.
///
/// Logs go to stdout at the level set by `RUST_LOG` (default `info`) and to
/// the file at `log_path` at `debug` level.
///
/// # Errors
/// Returns an error if the log file cannot be opened.
pub fn setup_logging(log_path: &Path) -> Result<(), io::Error> {
    let stdout_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;

    let debug_log = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(Arc::new(log_file))
        .with_filter(LevelFilter::DEBUG);

    tracing_subscriber::registry()
        .with(stdout_log)
        .with(debug_log)
        .init();

    Ok(())
}

/// Log the request and response for each request.
///
/// The request line and the response status are logged at the `info` level.
/// If the response body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is
/// truncated and the full body is logged at the `debug` level.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    tracing::info!("Received request: {method} {uri}");

    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("Could not read response body for {method} {uri}: {error}");
            return Response::from_parts(parts, axum::body::Body::empty());
        }
    };

    log_response(&parts, &String::from_utf8_lossy(&body_bytes));

    Response::from_parts(parts, body_bytes.into())
}

fn log_response(parts: &axum::http::response::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Sending response: {}\nbody: {}...",
            parts.status,
            truncate(body, LOG_BODY_LENGTH_LIMIT)
        );
        tracing::debug!("Full response body: {body:?}");
    } else {
        tracing::info!("Sending response: {}\nbody: {body:?}", parts.status);
    }
}

/// Cut `text` to at most `limit` bytes without splitting a character.
fn truncate(text: &str, limit: usize) -> &str {
    let mut end = limit.min(text.len());

    while !text.is_char_boundary(end) {
        end -= 1;
    }

    &text[..end]
}
