//! Main TUI runner - entry point and event loop

use tokio::sync::{mpsc, watch};

use blockspy_app::actions::{self, handle_action, Services};
use blockspy_app::config;
use blockspy_app::handler;
use blockspy_app::message::Message;
use blockspy_app::process;
use blockspy_app::signals;
use blockspy_app::state::AppState;
use blockspy_client::{ApiClient, IconCache};
use blockspy_core::prelude::*;

use super::startup::{self, LaunchOptions};
use super::{event, render, terminal};

/// Run the dashboard until the user quits
pub async fn run(options: LaunchOptions) -> Result<()> {
    let settings = startup::resolve_settings(&options);
    let api = ApiClient::new(&settings.backend.url)?;
    let mut state = startup::prepare_state(&options, settings, config::config_dir());

    let icons = IconCache::init().await;
    let services = Services::new(api.clone(), icons, api.base_url().clone());

    // Install panic hook for terminal restoration
    terminal::install_panic_hook();
    let mut term = ratatui::init();

    let (msg_tx, msg_rx) = mpsc::channel::<Message>(256);
    signals::spawn_signal_handler(msg_tx.clone());

    // Shutdown signal for background tasks
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let poller = actions::spawn_server_list_polling(
        state.settings.polling.server_list_secs,
        msg_tx.clone(),
        shutdown_rx,
    );

    if let Some(path) = options.import.clone() {
        info!("Importing addresses from {:?}", path);
        let action = handler::start_import(&mut state, path);
        handle_action(action, msg_tx.clone(), &services);
    }

    let result = run_loop(&mut term, &mut state, msg_rx, msg_tx, &services);

    let _ = shutdown_tx.send(true);
    state.console.teardown();
    poller.abort();

    ratatui::restore();
    info!("BlockSpy exiting");
    result
}

/// Main event loop
fn run_loop(
    terminal: &mut ratatui::DefaultTerminal,
    state: &mut AppState,
    mut msg_rx: mpsc::Receiver<Message>,
    msg_tx: mpsc::Sender<Message>,
    services: &Services<ApiClient>,
) -> Result<()> {
    while !state.should_quit() {
        // Results from background tasks, timers and the signal handler
        while let Ok(msg) = msg_rx.try_recv() {
            process::process_message(state, msg, &msg_tx, services);
        }

        terminal.draw(|frame| render::view(frame, state))?;

        if let Some(message) = event::poll()? {
            process::process_message(state, message, &msg_tx, services);
        }
    }

    Ok(())
}
