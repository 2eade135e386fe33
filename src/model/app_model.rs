//! Main application model with state management

use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;

use super::api_client::MediaClient;
use super::content::{AdminState, DashboardState};
use super::entities::Profile;
use super::media::NowPlaying;
use super::types::{LoginState, Screen, UiState};

const ERROR_TTL_SECS: u64 = 5;

/// Main application model containing all state
pub struct AppModel {
    pub client: MediaClient,
    token: Arc<Mutex<Option<String>>>,
    pub ui_state: Arc<Mutex<UiState>>,
    pub login_state: Arc<Mutex<LoginState>>,
    pub dashboard_state: Arc<Mutex<DashboardState>>,
    pub admin_state: Arc<Mutex<AdminState>>,
    now_playing: Arc<Mutex<Option<NowPlaying>>>,
    pub should_quit: Arc<Mutex<bool>>,
}

impl AppModel {
    pub fn new(client: MediaClient) -> Self {
        Self {
            client,
            token: Arc::new(Mutex::new(None)),
            ui_state: Arc::new(Mutex::new(UiState::default())),
            login_state: Arc::new(Mutex::new(LoginState::default())),
            dashboard_state: Arc::new(Mutex::new(DashboardState::default())),
            admin_state: Arc::new(Mutex::new(AdminState::default())),
            now_playing: Arc::new(Mutex::new(None)),
            should_quit: Arc::new(Mutex::new(false)),
        }
    }

    // ========================================================================
    // Session
    // ========================================================================

    pub async fn token(&self) -> Option<String> {
        self.token.lock().await.clone()
    }

    pub async fn set_token(&self, token: Option<String>) {
        *self.token.lock().await = token;
    }

    pub async fn profile(&self) -> Option<Profile> {
        self.dashboard_state.lock().await.profile.clone()
    }

    pub async fn is_admin(&self) -> bool {
        self.profile().await.is_some_and(|p| p.is_admin())
    }

    // ========================================================================
    // Screens
    // ========================================================================

    pub async fn screen(&self) -> Screen {
        self.ui_state.lock().await.screen
    }

    pub async fn set_screen(&self, screen: Screen) {
        tracing::debug!(?screen, "Switching screen");
        self.ui_state.lock().await.screen = screen;
    }

    /// Drop everything tied to the signed-in user and show the login form.
    pub async fn reset_to_login(&self) {
        *self.token.lock().await = None;
        *self.login_state.lock().await = LoginState::default();
        *self.dashboard_state.lock().await = DashboardState::default();
        *self.admin_state.lock().await = AdminState::default();
        *self.now_playing.lock().await = None;
        let mut ui = self.ui_state.lock().await;
        ui.screen = Screen::Login;
        ui.show_help_popup = false;
    }

    // ========================================================================
    // Playback status
    // ========================================================================

    pub async fn now_playing(&self) -> Option<NowPlaying> {
        self.now_playing.lock().await.clone()
    }

    pub async fn set_now_playing(&self, now_playing: Option<NowPlaying>) {
        *self.now_playing.lock().await = now_playing;
    }

    // ========================================================================
    // Errors, help, quit
    // ========================================================================

    pub async fn should_quit(&self) -> bool {
        *self.should_quit.lock().await
    }

    pub async fn set_should_quit(&self, quit: bool) {
        *self.should_quit.lock().await = quit;
    }

    pub async fn get_ui_state(&self) -> UiState {
        self.ui_state.lock().await.clone()
    }

    pub async fn get_login_state(&self) -> LoginState {
        self.login_state.lock().await.clone()
    }

    pub async fn get_dashboard_state(&self) -> DashboardState {
        self.dashboard_state.lock().await.clone()
    }

    pub async fn get_admin_state(&self) -> AdminState {
        self.admin_state.lock().await.clone()
    }

    pub async fn set_error(&self, message: String) {
        tracing::warn!(error = %message, "Showing error");
        let mut state = self.ui_state.lock().await;
        state.error_message = Some(message);
        state.error_timestamp = Some(Instant::now());
    }

    pub async fn clear_error(&self) {
        let mut state = self.ui_state.lock().await;
        state.error_message = None;
        state.error_timestamp = None;
    }

    pub async fn has_error(&self) -> bool {
        self.ui_state.lock().await.error_message.is_some()
    }

    pub async fn auto_clear_old_errors(&self) {
        let mut state = self.ui_state.lock().await;
        if let Some(timestamp) = state.error_timestamp {
            if timestamp.elapsed().as_secs() > ERROR_TTL_SECS {
                state.error_message = None;
                state.error_timestamp = None;
            }
        }
    }

    pub async fn show_help_popup(&self) {
        self.ui_state.lock().await.show_help_popup = true;
    }

    pub async fn hide_help_popup(&self) {
        self.ui_state.lock().await.show_help_popup = false;
    }

    pub async fn is_help_popup_open(&self) -> bool {
        self.ui_state.lock().await.show_help_popup
    }
}
