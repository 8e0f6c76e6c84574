use clap::Parser;
use std::time::Duration;

use crate::error::ConfigError;
use crate::rate_limit::LimitSettings;

// CLI argument structure
#[derive(Parser, Debug, Clone)]
#[command(name = "admission-gateway")]
#[command(about = "Rate-limited gateway for invitation and free-tool endpoints")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, default_value_t = 8080)]
    pub port: u16,

    // Invitation acceptances allowed per client IP per window
    #[arg(long, default_value_t = 10)]
    pub invite_limit: u32,

    // Invitation window in seconds
    #[arg(long, default_value_t = 60)]
    pub invite_window: u64,

    // Free-tool uses allowed per user (or IP) per window
    #[arg(long, default_value_t = 5)]
    pub tool_limit: u32,

    // Free-tool window in seconds
    #[arg(long, default_value_t = 86_400)]
    pub tool_window: u64,

    // Expired bucket sweep interval in seconds, 0 disables
    #[arg(long, default_value_t = 300)]
    pub sweep_interval: u64,

    // Log level, overridden by RUST_LOG
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    pub fn invite_limits(&self) -> Result<LimitSettings, ConfigError> {
        LimitSettings::new(Duration::from_secs(self.invite_window), self.invite_limit)
    }

    pub fn tool_limits(&self) -> Result<LimitSettings, ConfigError> {
        LimitSettings::new(Duration::from_secs(self.tool_window), self.tool_limit)
    }

    // None when sweeping is turned off
    pub fn sweep_every(&self) -> Option<Duration> {
        (self.sweep_interval > 0).then(|| Duration::from_secs(self.sweep_interval))
    }
}
