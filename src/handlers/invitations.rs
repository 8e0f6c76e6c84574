use axum::{
    Json,
    body::Bytes,
    extract::{ConnectInfo, Path, State},
    http::HeaderMap,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use crate::error::ApiError;
use crate::identity::{client_ip, fingerprint, ip_key};
use crate::models::{AcceptInvitationRequest, AcceptInvitationResponse};
use crate::state::{AppState, INVITATIONS};

// Invitation acceptance, limited per client IP so tokens cannot be guessed
// at speed. The quota is spent before the body is parsed, so malformed
// attempts count too.
pub async fn accept_invitation_handler(
    State(state): State<Arc<AppState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Path(token): Path<String>,
    body: Bytes,
) -> Result<Json<AcceptInvitationResponse>, ApiError> {
    let key = ip_key(&client_ip(&headers, peer));

    let admission = state
        .invitations
        .admit(&key)
        .map_err(|exceeded| ApiError::rate_limited(INVITATIONS, exceeded))?;

    let payload: AcceptInvitationRequest = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("invalid request body: {e}")))?;

    let token = token.trim();
    if token.is_empty() {
        return Err(ApiError::BadRequest("invitation token is empty".into()));
    }
    let user_id = payload.user_id.trim();
    if user_id.is_empty() {
        return Err(ApiError::BadRequest("user_id is required".into()));
    }

    info!(
        invitation = %fingerprint(token),
        user = %fingerprint(user_id),
        "invitation accepted"
    );

    Ok(Json(AcceptInvitationResponse {
        status: "accepted".to_string(),
        user_id: user_id.to_string(),
        remaining: admission.remaining,
        reset_at: admission.reset_at,
    }))
}
