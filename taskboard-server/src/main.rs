//! `Taskboard` development server.
//!
//! Serves the REST subset of the hosted store from an in-memory table.
//!
//! ```bash
//! # Default address 127.0.0.1:54321, empty table
//! cargo run --bin taskboard-server
//!
//! # Sample data and a required key
//! cargo run --bin taskboard-server -- --seed-demo --api-key dev-key
//! ```

use std::sync::Arc;

use clap::Parser;
use taskboard_server::api::ServerState;
use taskboard_server::config::{ServerCliArgs, ServerConfig};
use taskboard_server::store::TaskTable;

#[tokio::main]
async fn main() {
    let cli = ServerCliArgs::parse();

    let config = match ServerConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let table = if config.seed_demo {
        TaskTable::with_demo_rows(chrono::Local::now().date_naive())
    } else {
        TaskTable::new()
    };
    tracing::info!(
        addr = %config.bind_addr,
        seed_demo = config.seed_demo,
        api_key_required = config.api_key.is_some(),
        "starting taskboard server"
    );

    let state = Arc::new(ServerState::new(table, config.api_key.clone()));
    match taskboard_server::start_server_with_state(&config.bind_addr, state, config.max_body_size)
        .await
    {
        Ok((bound_addr, handle)) => {
            tracing::info!(addr = %bound_addr, "taskboard server listening");
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "server task failed");
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to start server");
            std::process::exit(1);
        }
    }
}
