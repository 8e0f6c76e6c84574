use crate::config::Args;
use crate::error::ConfigError;
use crate::guard::Guard;

pub const INVITATIONS: &str = "invitations";
pub const FREE_TOOLS: &str = "free_tools";

// key prefix for per-user free-tool quotas
pub const FREE_TOOL_SCOPE: &str = "free-tool";

// app's shared state, one guard per rate-limited action
#[derive(Clone)]
pub struct AppState {
    pub invitations: Guard,
    pub free_tools: Guard,
}

impl AppState {
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        Ok(Self {
            invitations: Guard::new(INVITATIONS, args.invite_limits()?),
            free_tools: Guard::new(FREE_TOOLS, args.tool_limits()?),
        })
    }

    pub fn guards(&self) -> Vec<Guard> {
        vec![self.invitations.clone(), self.free_tools.clone()]
    }
}
