//! Controller module - Application logic and event handling
//!
//! This module contains the application controller that handles user input,
//! coordinates between the model and view, and talks to the backend.
//! It is organized into submodules by responsibility:
//!
//! - `input`: Key event handling
//! - `session`: Sign-in, session restore and logout
//! - `dashboard`: Catalog loading, previews, opening cards, search
//! - `admin`: Admin lists, forms and mutations
//! - `playback`: External player hand-off

mod input;
mod session;
mod dashboard;
mod admin;
mod playback;

use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::auth::TokenStore;
use crate::model::{ApiError, AppModel, MediaClient};
use crate::util::task::TaskManager;

pub use playback::Players;
use playback::ActivePlayback;

#[derive(Clone)]
pub struct AppController {
    pub(crate) model: Arc<Mutex<AppModel>>,
    pub(crate) tokens: TokenStore,
    players: Players,
    tasks: Arc<Mutex<TaskManager>>,
    playback: Arc<Mutex<Option<ActivePlayback>>>,
}

impl AppController {
    pub fn new(model: Arc<Mutex<AppModel>>, tokens: TokenStore, players: Players) -> Self {
        Self {
            model,
            tokens,
            players,
            tasks: Arc::new(Mutex::new(TaskManager::new())),
            playback: Arc::new(Mutex::new(None)),
        }
    }

    /// Client and bearer token for an authenticated call. `None` when
    /// signed out.
    pub(crate) async fn session(&self) -> Option<(MediaClient, String)> {
        let model = self.model.lock().await;
        let token = model.token().await?;
        Some((model.client.clone(), token))
    }

    /// Run `action` in the background under `key`. A task already running
    /// under the same key is aborted.
    pub(crate) async fn spawn_keyed<F, Fut>(&self, key: &str, action: F)
    where
        F: FnOnce(AppController) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(action(self.clone()));
        self.tasks.lock().await.spawn(key, handle);
    }

    /// Stop background work and the external player before exit.
    pub async fn shutdown(&self) {
        self.tasks.lock().await.abort_all();
        self.stop_playback().await;
        tracing::debug!("Controller shut down");
    }

    pub(crate) fn format_error(error: &ApiError) -> String {
        match error.status() {
            Some(401) => "Session expired. Sign in again (L).".to_string(),
            Some(403) => "Admin access required.".to_string(),
            Some(404) => format!("{error}: not found."),
            Some(409) => match error.detail() {
                Some(detail) => format!("{error}: {detail}"),
                None => format!("{error}: conflict."),
            },
            _ => error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(status: u16, detail: Option<&str>) -> ApiError {
        ApiError::Status {
            context: "Failed to delete genre".to_string(),
            status,
            detail: detail.map(str::to_string),
        }
    }

    #[test]
    fn auth_statuses_get_fixed_hints() {
        assert_eq!(
            AppController::format_error(&status(401, None)),
            "Session expired. Sign in again (L)."
        );
        assert_eq!(AppController::format_error(&status(403, None)), "Admin access required.");
    }

    #[test]
    fn not_found_and_conflict_keep_context() {
        assert_eq!(
            AppController::format_error(&status(404, None)),
            "Failed to delete genre: not found."
        );
        assert_eq!(
            AppController::format_error(&status(409, Some("Genre in use"))),
            "Failed to delete genre: Genre in use"
        );
        assert_eq!(
            AppController::format_error(&status(409, None)),
            "Failed to delete genre: conflict."
        );
    }

    #[test]
    fn other_errors_show_operation_message() {
        assert_eq!(AppController::format_error(&status(500, Some("boom"))), "Failed to delete genre");
        assert_eq!(
            AppController::format_error(&ApiError::InvalidInput("Title is required".into())),
            "Title is required"
        );
    }
}
