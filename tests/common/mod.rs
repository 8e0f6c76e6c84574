//! Shared helpers for gateway integration tests.

#![allow(dead_code)]

use admission_gateway::{AppState, config::Args, serve};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("debug")
        .try_init();
}

/// Args with the given extra flags on top of the defaults.
pub fn args(extra: &[&str]) -> Args {
    let mut argv = vec!["admission-gateway"];
    argv.extend_from_slice(extra);
    Args::parse_from(argv)
}

/// Binds the gateway on an ephemeral port and returns its address.
pub async fn start_gateway(args: &Args) -> (SocketAddr, Arc<AppState>, JoinHandle<()>) {
    let state = Arc::new(AppState::from_args(args).expect("test args must be valid"));
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind test listener");
    let addr = listener.local_addr().expect("listener has no address");

    let server_state = Arc::clone(&state);
    let handle = tokio::spawn(async move {
        let _ = serve(listener, server_state).await;
    });

    (addr, state, handle)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::new()
}
