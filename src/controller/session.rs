//! Sign-in, session restore and logout

use crate::auth::SessionStart;
use crate::model::Screen;

use super::AppController;

const SIGN_IN_FALLBACK: &str = "Sign-in failed";

impl AppController {
    /// Apply the outcome of the startup token check.
    pub async fn begin(&self, start: SessionStart) {
        match start {
            SessionStart::SignedOut => {
                let model = self.model.lock().await;
                model.set_screen(Screen::Login).await;
            }
            SessionStart::Authenticated { token, .. } => {
                {
                    let model = self.model.lock().await;
                    model.set_token(Some(token)).await;
                    model.set_screen(Screen::Dashboard).await;
                }
                self.load_dashboard().await;
            }
            SessionStart::Unverified { token, error } => {
                let model = self.model.lock().await;
                model.set_token(Some(token)).await;
                model.set_screen(Screen::Dashboard).await;
                model.dashboard_state.lock().await.load_error = Some(format!("Load error: {error}"));
            }
        }
    }

    pub async fn submit_login(&self) {
        let (client, phone, password) = {
            let model = self.model.lock().await;
            let mut login = model.login_state.lock().await;
            if login.submitting {
                return;
            }
            login.submitting = true;
            login.error = None;
            (model.client.clone(), login.phone.trim().to_string(), login.password.clone())
        };

        tracing::info!(phone, "Signing in");
        let result = match client.sign_in(&phone, &password).await {
            Ok(pair) => {
                if let Err(e) = self.tokens.save(&pair.access_token) {
                    tracing::warn!(error = %e, "Could not persist access token");
                }
                client.me(&pair.access_token).await.map(|profile| (pair.access_token, profile))
            }
            Err(e) => Err(e),
        };

        match result {
            Ok((token, profile)) => {
                tracing::info!(user_id = %profile.id, "Signed in");
                {
                    let model = self.model.lock().await;
                    model.set_token(Some(token)).await;
                    model.dashboard_state.lock().await.profile = Some(profile);
                    let mut login = model.login_state.lock().await;
                    login.submitting = false;
                    login.password.clear();
                    drop(login);
                    model.set_screen(Screen::Dashboard).await;
                }
                self.load_dashboard().await;
            }
            Err(e) => {
                let message = e.to_string();
                let model = self.model.lock().await;
                let mut login = model.login_state.lock().await;
                login.submitting = false;
                login.error = Some(if message.is_empty() {
                    SIGN_IN_FALLBACK.to_string()
                } else {
                    message
                });
            }
        }
    }

    /// Forget the token and return to the login form.
    pub async fn logout(&self) {
        tracing::info!("Logging out");
        self.tasks.lock().await.abort_all();
        self.stop_playback().await;
        if let Err(e) = self.tokens.clear() {
            tracing::warn!(error = %e, "Could not clear stored token");
        }
        let model = self.model.lock().await;
        model.reset_to_login().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::restore_session;
    use crate::model::LoginField;
    use crate::test_support::{GOOD_TOKEN, healthy_client, signed_in_controller, test_controller};

    async fn type_credentials(controller: &AppController, password: &str) {
        let model = controller.model.lock().await;
        let mut login = model.login_state.lock().await;
        login.phone = "+70000000000".to_string();
        login.focus = LoginField::Password;
        login.password = password.to_string();
    }

    #[tokio::test]
    async fn login_stores_token_and_opens_dashboard() {
        let (controller, _dir) = test_controller(healthy_client().await).await;
        type_credentials(&controller, "admin123").await;

        controller.submit_login().await;

        assert_eq!(controller.tokens.get().as_deref(), Some(GOOD_TOKEN));
        let model = controller.model.lock().await;
        assert_eq!(model.screen().await, Screen::Dashboard);
        assert_eq!(model.token().await.as_deref(), Some(GOOD_TOKEN));
        let dashboard = model.get_dashboard_state().await;
        assert_eq!(dashboard.profile.unwrap().display_name(), "Admin User");
        assert_eq!(dashboard.videos.len(), 1);
        assert!(model.get_login_state().await.password.is_empty());
    }

    #[tokio::test]
    async fn failed_login_shows_message_and_stays() {
        let (controller, _dir) = test_controller(healthy_client().await).await;
        type_credentials(&controller, "wrong").await;

        controller.submit_login().await;

        assert_eq!(controller.tokens.get(), None);
        let model = controller.model.lock().await;
        assert_eq!(model.screen().await, Screen::Login);
        let login = model.get_login_state().await;
        assert_eq!(login.error.as_deref(), Some("Auth failed"));
        assert!(!login.submitting);
    }

    #[tokio::test]
    async fn restored_session_skips_login() {
        let (controller, _dir) = test_controller(healthy_client().await).await;
        controller.tokens.save(GOOD_TOKEN).unwrap();
        let client = controller.model.lock().await.client.clone();

        let start = restore_session(&controller.tokens, &client).await;
        controller.begin(start).await;

        let model = controller.model.lock().await;
        assert_eq!(model.screen().await, Screen::Dashboard);
        assert!(model.get_dashboard_state().await.load_error.is_none());
    }

    #[tokio::test]
    async fn logout_clears_everything() {
        let (controller, _dir) = signed_in_controller(healthy_client().await).await;
        controller.logout().await;

        assert_eq!(controller.tokens.get(), None);
        let model = controller.model.lock().await;
        assert_eq!(model.screen().await, Screen::Login);
        assert_eq!(model.token().await, None);
    }
}
