use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// body of POST /api/invitations/{token}/accept
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct AcceptInvitationRequest {
    pub user_id: String,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct AcceptInvitationResponse {
    pub status: String,
    pub user_id: String,
    pub remaining: u32,
    pub reset_at: DateTime<Utc>,
}

// body of POST /api/tools/{slug}/use
#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct ToolUseRequest {
    #[serde(default)]
    pub input: String,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct ToolUseResponse {
    pub tool: String,
    pub status: String,
    pub remaining: u32,
    pub reset_at: DateTime<Utc>,
}
