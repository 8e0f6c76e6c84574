pub mod clock;
pub mod config;
pub mod error;
pub mod guard;
pub mod handlers;
pub mod identity;
pub mod metrics;
pub mod models;
pub mod rate_limit;
pub mod state;
pub mod sweeper;

use axum::{
    Router,
    routing::{get, post},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ApiError, ConfigError, QuotaExceeded};
pub use guard::Guard;
pub use rate_limit::{Admission, Bucket, Decision, FixedWindowLimiter, LimitSettings};
pub use state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/metrics", get(handlers::metrics_handler))
        .route(
            "/api/invitations/{token}/accept",
            post(handlers::accept_invitation_handler),
        )
        .route("/api/tools/{slug}/use", post(handlers::use_tool_handler))
        .with_state(state)
}

// peer addresses are needed for IP-keyed limits
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> std::io::Result<()> {
    axum::serve(
        listener,
        router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
}
