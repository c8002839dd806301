//! Rate limiting middleware
//!
//! Fixed-window counters per client IP and endpoint bucket, kept in Redis.
//! If Redis is unreachable the request is let through.

use axum::{
    body::Body,
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use redis::AsyncCommands;
use std::net::SocketAddr;
use tracing::warn;

use crate::{constants, error::AppError, state::AppState};

/// Rate limit middleware
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let path = request.uri().path();
    let bucket = path_bucket(path);
    let (limit, window) = rate_limit_for(bucket);

    let key = format!("rate_limit:{}:{}", addr.ip(), bucket);
    let mut redis = state.redis();

    let count: i64 = match redis.incr(&key, 1).await {
        Ok(count) => count,
        Err(e) => {
            warn!(error = %e, bucket, "Rate limiter unavailable, allowing request");
            return Ok(next.run(request).await);
        }
    };

    if count == 1 {
        // Set expiry on first request of the window
        if let Err(e) = redis.expire::<_, ()>(&key, window).await {
            warn!(error = %e, key = %key, "Failed to set rate limit window");
        }
    }

    if count > limit {
        return Err(AppError::TooManyRequests);
    }

    Ok(next.run(request).await)
}

/// Limits for a bucket
fn rate_limit_for(bucket: &str) -> (i64, i64) {
    match bucket {
        "submissions" => (
            constants::rate_limits::SUBMISSION_MAX_REQUESTS,
            constants::rate_limits::SUBMISSION_WINDOW_SECS,
        ),
        "queue" => (
            constants::rate_limits::QUEUE_MAX_REQUESTS,
            constants::rate_limits::QUEUE_WINDOW_SECS,
        ),
        _ => (
            constants::rate_limits::GENERAL_MAX_REQUESTS,
            constants::rate_limits::GENERAL_WINDOW_SECS,
        ),
    }
}

/// Get bucket for path (for grouping similar endpoints)
fn path_bucket(path: &str) -> &'static str {
    let path = path
        .strip_prefix(constants::API_BASE_PATH)
        .unwrap_or(path);

    if path.starts_with("/submissions") {
        "submissions"
    } else if path.starts_with("/queue") {
        "queue"
    } else {
        "general"
    }
}
