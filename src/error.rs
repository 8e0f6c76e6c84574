use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("quota exceeded, window resets at {reset_at}")]
pub struct QuotaExceeded {
    pub reset_at: DateTime<Utc>,
}

impl QuotaExceeded {
    // whole seconds for Retry-After, rounded up, at least 1
    pub fn retry_after_secs(&self, now: DateTime<Utc>) -> u64 {
        let ms = (self.reset_at - now).num_milliseconds();
        if ms <= 0 {
            return 1;
        }
        (ms as u64).div_ceil(1000).max(1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("quota must allow at least one request per window")]
    ZeroQuota,
    #[error("window must be longer than zero")]
    ZeroWindow,
    #[error("window {0:?} is out of range")]
    WindowOutOfRange(Duration),
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("too many requests, retry after {retry_after}s")]
    RateLimited {
        scope: &'static str,
        reset_at: DateTime<Utc>,
        retry_after: u64,
    },
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn rate_limited(scope: &'static str, exceeded: QuotaExceeded) -> Self {
        Self::RateLimited {
            scope,
            reset_at: exceeded.reset_at,
            retry_after: exceeded.retry_after_secs(Utc::now()),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::RateLimited { .. } => "rate_limited",
            Self::BadRequest(_) => "bad_request",
            Self::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let mut body = serde_json::json!({
            "error": self.code(),
            "message": self.to_string(),
        });

        let retry_after = match &self {
            Self::RateLimited {
                scope,
                reset_at,
                retry_after,
            } => {
                body["scope"] = serde_json::json!(scope);
                body["reset_at"] = serde_json::json!(reset_at.to_rfc3339());
                Some(*retry_after)
            }
            _ => None,
        };

        let mut response = (status, Json(body)).into_response();
        if let Some(secs) = retry_after {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}

impl From<prometheus::Error> for ApiError {
    fn from(err: prometheus::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    #[test]
    fn retry_after_rounds_up_to_whole_seconds() {
        let now = Utc::now();
        let exceeded = QuotaExceeded {
            reset_at: now + TimeDelta::milliseconds(1200),
        };
        assert_eq!(exceeded.retry_after_secs(now), 2);
    }

    #[test]
    fn retry_after_is_at_least_one_second() {
        let now = Utc::now();
        let past = QuotaExceeded {
            reset_at: now - TimeDelta::seconds(5),
        };
        assert_eq!(past.retry_after_secs(now), 1);

        let exact = QuotaExceeded {
            reset_at: now + TimeDelta::seconds(3),
        };
        assert_eq!(exact.retry_after_secs(now), 3);
    }

    #[test]
    fn rate_limited_maps_to_429_with_retry_after() {
        let exceeded = QuotaExceeded {
            reset_at: Utc::now() + TimeDelta::seconds(30),
        };
        let response = ApiError::rate_limited("invitations", exceeded).into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(response.headers().contains_key(header::RETRY_AFTER));
    }

    #[test]
    fn bad_request_has_no_retry_after() {
        let response = ApiError::BadRequest("missing user id".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(!response.headers().contains_key(header::RETRY_AFTER));
    }
}
