mod auth;
mod config;
mod controller;
mod logging;
mod model;
mod util;
mod view;

#[cfg(test)]
mod test_support;

use std::io;
use std::sync::Arc;
use anyhow::Result;
use clap::Parser;
use std::time::Duration;
use tokio::sync::Mutex;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use view::AppView;
use auth::TokenStore;
use config::Config;
use controller::{AppController, Players};
use model::{AppModel, MediaClient};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let config = Config::parse();

    if let Err(e) = logging::init_logging(&config.log_dir) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::info!(api_url = %config.api_url, "=== Media Library Client Starting ===");

    let client = MediaClient::new(&config.api_url, config.timeout())?;
    let tokens = TokenStore::new(&config.cache_dir);

    // A stored token skips the sign-in form when the backend still accepts it
    let start = auth::restore_session(&tokens, &client).await;

    let model = Arc::new(Mutex::new(AppModel::new(client)));
    let players = Players {
        player: config.player.clone(),
        opener: config.opener.clone(),
    };
    let controller = AppController::new(model.clone(), tokens, players);
    controller.begin(start).await;

    tracing::info!("Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, model, controller.clone()).await;

    controller.shutdown().await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    tracing::info!("Media Library Client shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    model: Arc<Mutex<AppModel>>,
    controller: AppController,
) -> io::Result<()> {
    loop {
        // Notice players the user closed themselves
        controller.reap_playback().await;

        // Get current state
        let (ui_state, login, dashboard, admin, now_playing, should_quit) = {
            let model_guard = model.lock().await;

            // Auto-clear old errors (after 5 seconds)
            model_guard.auto_clear_old_errors().await;

            (
                model_guard.get_ui_state().await,
                model_guard.get_login_state().await,
                model_guard.get_dashboard_state().await,
                model_guard.get_admin_state().await,
                model_guard.now_playing().await,
                model_guard.should_quit().await,
            )
        };

        // Draw UI
        terminal.draw(|f| {
            AppView::render(f, &ui_state, &login, &dashboard, &admin, now_playing.as_ref());
        })?;

        // Handle input with shorter poll time for smoother UI updates
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Err(e) = controller.handle_key_event(key).await {
                    tracing::warn!(error = %e, "Key handling failed");
                }
            }
        }

        if should_quit {
            break;
        }
    }

    Ok(())
}
