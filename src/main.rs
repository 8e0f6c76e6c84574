use admission_gateway::{AppState, config::Args, serve, sweeper::spawn_sweeper};
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // RUST_LOG wins over --log-level
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(e) = run(args).await {
        error!("gateway stopped: {e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let state = Arc::new(AppState::from_args(&args)?);

    if let Some(every) = args.sweep_every() {
        spawn_sweeper(state.guards(), every);
    }

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Gateway running on http://localhost:{}", args.port);
    info!(
        "Invitation limit: {} requests per {} seconds per IP",
        args.invite_limit, args.invite_window
    );
    info!(
        "Free tool limit: {} uses per {} seconds per user",
        args.tool_limit, args.tool_window
    );

    serve(listener, state).await?;
    Ok(())
}
