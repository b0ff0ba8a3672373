//! `Taskboard` development server library.
//!
//! An axum server exposing the PostgREST-style `tasks` endpoints the client
//! talks to, backed by an in-memory table. Used for local runs and as the
//! in-process backend of the REST integration tests.

pub mod api;
pub mod config;
pub mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::api::{DEFAULT_MAX_BODY_SIZE, ServerState};

/// Starts a server with an empty table and no API key.
///
/// Pass `127.0.0.1:0` to let the OS pick a free port; the bound address is
/// returned alongside the server task.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the given address.
pub async fn start_server(
    addr: &str,
) -> Result<(SocketAddr, JoinHandle<()>), Box<dyn std::error::Error + Send + Sync>> {
    start_server_with_state(addr, Arc::new(ServerState::default()), DEFAULT_MAX_BODY_SIZE).await
}

/// Starts a server over pre-built [`ServerState`].
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the given address.
pub async fn start_server_with_state(
    addr: &str,
    state: Arc<ServerState>,
    max_body_size: usize,
) -> Result<(SocketAddr, JoinHandle<()>), Box<dyn std::error::Error + Send + Sync>> {
    let app = api::router(state, max_body_size);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "task server error");
        }
    });

    Ok((bound_addr, handle))
}
