use axum::{
    Json,
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, HeaderName, HeaderValue},
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;
use std::sync::Arc;

use crate::error::{ApiError, QuotaExceeded};
use crate::identity::{client_ip, ip_key, scoped_key, user_id};
use crate::models::{ToolUseRequest, ToolUseResponse};
use crate::rate_limit::Decision;
use crate::state::{AppState, FREE_TOOL_SCOPE, FREE_TOOLS};

pub const LIMIT_HEADER: HeaderName = HeaderName::from_static("x-ratelimit-limit");
pub const REMAINING_HEADER: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
pub const RESET_HEADER: HeaderName = HeaderName::from_static("x-ratelimit-reset");

// Free tool usage. Signed-in users are limited per account, everyone else
// per client IP.
pub async fn use_tool_handler(
    State(state): State<Arc<AppState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Path(slug): Path<String>,
    Json(_payload): Json<ToolUseRequest>,
) -> Result<Response, ApiError> {
    let key = match user_id(&headers) {
        Some(id) => scoped_key(FREE_TOOL_SCOPE, &id),
        None => ip_key(&client_ip(&headers, peer)),
    };

    let (remaining, reset_at) = match state.free_tools.check(&key) {
        Decision::Allowed {
            remaining,
            reset_at,
        } => (remaining, reset_at),
        Decision::Denied { reset_at } => {
            return Err(ApiError::rate_limited(
                FREE_TOOLS,
                QuotaExceeded { reset_at },
            ));
        }
    };

    let limit = state.free_tools.limiter().settings().max();
    let rate_headers = [
        (LIMIT_HEADER, HeaderValue::from(limit)),
        (REMAINING_HEADER, HeaderValue::from(remaining)),
        (RESET_HEADER, HeaderValue::from(reset_at.timestamp())),
    ];

    let body = ToolUseResponse {
        tool: slug,
        status: "ok".to_string(),
        remaining,
        reset_at,
    };

    Ok((rate_headers, Json(body)).into_response())
}
