//! `Taskboard`: terminal task dashboard.
//!
//! Connects to a hosted PostgREST-style store when a URL is configured,
//! otherwise runs an offline demo against an in-memory table.
//!
//! ```bash
//! # Offline demo mode
//! cargo run --bin taskboard
//!
//! # Against a hosted project
//! cargo run --bin taskboard -- --store-url https://xyz.supabase.co --api-key "$ANON_KEY"
//!
//! # Against the local development server
//! cargo run --bin taskboard-server &
//! TASKBOARD_URL=http://127.0.0.1:54321 cargo run --bin taskboard
//! ```

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;

use taskboard::app::App;
use taskboard::config::{CliArgs, ClientConfig};
use taskboard::net::{self, StoreCommand, StoreEvent};
use taskboard::notify::{Notifier, Toast, ToastQueue};
use taskboard::store::{StoreError, TaskStore};
use taskboard::store::memory::InMemoryStore;
use taskboard::store::rest::RestStore;
use taskboard::tasks::{TaskForm, TaskList};
use taskboard::ui::{self, DrawContext};

#[tokio::main]
async fn main() -> io::Result<()> {
    let cli = CliArgs::parse();

    // Logs go to a file; the terminal belongs to ratatui.
    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    tracing::info!("taskboard starting");

    let (config, config_error) = match ClientConfig::load(&cli) {
        Ok(c) => (c, None),
        Err(e) => {
            tracing::warn!(error = %e, "config file ignored, using CLI and env values");
            (ClientConfig::from_cli(&cli), Some(e))
        }
    };

    let toasts = Arc::new(ToastQueue::new(config.toast_ttl));
    if let Some(e) = config_error {
        toasts.notify(Toast::error("Config file ignored").with_description(e.to_string()));
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = match config.to_rest_config() {
        Some(rest) => match RestStore::new(&rest) {
            Ok(store) => {
                let source = format!("store: {}", rest.base_url);
                run_app(&mut terminal, Arc::new(store), &config, toasts, &source).await
            }
            Err(e) => {
                tracing::error!(error = %e, "could not build store client, using demo data");
                toasts.notify(
                    Toast::error("Could not reach the store, showing demo data")
                        .with_description(e.message()),
                );
                run_demo(&mut terminal, &config, toasts).await
            }
        },
        None => run_demo(&mut terminal, &config, toasts).await,
    };

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("taskboard exiting");
    result
}

/// Initialize file-based logging.
///
/// Returns a [`WorkerGuard`] that must be held until shutdown so buffered
/// entries are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = std::env::temp_dir().join("taskboard.log");
    let log_path = file_path.unwrap_or(&default_path);

    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

async fn run_demo(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: &ClientConfig,
    toasts: Arc<ToastQueue>,
) -> io::Result<()> {
    let store = InMemoryStore::demo(chrono::Local::now().date_naive());
    run_app(terminal, Arc::new(store), config, toasts, "offline demo").await
}

/// Main application loop.
async fn run_app<S: TaskStore + 'static>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    store: Arc<S>,
    config: &ClientConfig,
    toasts: Arc<ToastQueue>,
    source: &str,
) -> io::Result<()> {
    let notifier: Arc<dyn Notifier> = toasts.clone();
    let mut app = App::new(
        TaskList::new(Arc::clone(&notifier)),
        TaskForm::new(notifier, config.success_message_ttl),
        toasts,
    );

    let (cmd_tx, mut evt_rx) = net::spawn_store_worker(store, config.channel_capacity);

    if let Some(cmd) = app.mount() {
        dispatch(&mut app, &cmd_tx, cmd);
    }

    loop {
        let now = Instant::now();
        app.tick(now);

        // Step 1: Draw the UI frame.
        let ctx = DrawContext {
            today: chrono::Local::now().date_naive(),
            now,
            date_format: &config.date_format,
            source,
        };
        terminal.draw(|frame| ui::draw(frame, &app, &ctx))?;

        // Step 2: Drain store results (non-blocking).
        drain_store_events(&mut app, &mut evt_rx, &cmd_tx);

        // Step 3: Poll for terminal input events.
        if event::poll(config.poll_timeout)?
            && let Event::Key(key) = event::read()?
        {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if let Some(cmd) = app.handle_key_event(key) {
                dispatch(&mut app, &cmd_tx, cmd);
            }
        }

        if app.should_quit {
            let _ = cmd_tx.try_send(StoreCommand::Shutdown);
            return Ok(());
        }
    }
}

/// Hand a command to the store worker without blocking the UI loop.
///
/// A command that cannot be queued settles immediately as a failure, so an
/// optimistic status change is reverted and the form leaves its loading state.
fn dispatch(app: &mut App, tx: &mpsc::Sender<StoreCommand>, cmd: StoreCommand) {
    let (cmd, reason) = match tx.try_send(cmd) {
        Ok(()) => return,
        Err(mpsc::error::TrySendError::Full(cmd)) => (cmd, "Store busy, try again"),
        Err(mpsc::error::TrySendError::Closed(cmd)) => (cmd, "Store connection closed"),
    };
    tracing::warn!(?cmd, reason, "store command not dispatched");
    if let Some(event) = cmd.into_failure(StoreError::Unavailable(reason.to_string())) {
        // Failure events never produce follow-up commands.
        let _ = app.apply_store_event(event, Instant::now());
    }
}

/// Drain all pending `StoreEvent`s and apply them to the app.
fn drain_store_events(
    app: &mut App,
    rx: &mut mpsc::Receiver<StoreEvent>,
    tx: &mpsc::Sender<StoreCommand>,
) {
    while let Ok(event) = rx.try_recv() {
        if let Some(cmd) = app.apply_store_event(event, Instant::now()) {
            dispatch(app, tx, cmd);
        }
    }
}
