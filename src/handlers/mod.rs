mod health;
mod invitations;
mod metrics;
mod tools;

pub use health::health_handler;
pub use invitations::accept_invitation_handler;
pub use metrics::metrics_handler;
pub use tools::use_tool_handler;
