//! View module - UI rendering
//!
//! This module handles all UI rendering for the application using ratatui.
//! It is organized into submodules by component type:
//!
//! - `utils`: Shared utility functions (truncation, centring, scrollable lists)
//! - `layout`: Main layout structure (top bar, tabs)
//! - `login`: Sign-in form
//! - `dashboard`: Card lists, detail pane and search
//! - `admin`: Admin tables
//! - `status`: Now-playing status bar
//! - `overlays`: Modal overlays (error, help, confirm, forms)

mod utils;
mod layout;
mod login;
mod dashboard;
mod admin;
mod status;
mod overlays;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::model::{AdminState, DashboardState, LoginState, NowPlaying, Screen, UiState};

pub struct AppView;

impl AppView {
    pub fn render(
        frame: &mut Frame,
        ui_state: &UiState,
        login: &LoginState,
        dashboard: &DashboardState,
        admin: &AdminState,
        now_playing: Option<&NowPlaying>,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title + user
                Constraint::Min(0),    // Screen content
                Constraint::Length(3), // Now playing
            ])
            .split(frame.area());

        let profile = match ui_state.screen {
            Screen::Login => None,
            _ => dashboard.profile.as_ref(),
        };
        layout::render_top_bar(frame, chunks[0], ui_state.screen, profile);

        match ui_state.screen {
            Screen::Login => login::render_login(frame, chunks[1], login),
            Screen::Dashboard => dashboard::render_dashboard(frame, chunks[1], dashboard),
            Screen::Admin => admin::render_admin(frame, chunks[1], admin),
        }

        status::render_status_bar(frame, chunks[2], now_playing);

        if ui_state.screen == Screen::Admin {
            if let Some(ref form) = admin.form {
                overlays::render_form(frame, form);
            }
            if let Some(ref prompt) = admin.confirm {
                overlays::render_confirm_prompt(frame, prompt);
            }
        }

        // Error notification overlay (if there's an error)
        if ui_state.error_message.is_some() {
            overlays::render_error_notification(frame, ui_state);
        }

        // Help popup overlay (if open)
        if ui_state.show_help_popup {
            overlays::render_help_popup(frame, ui_state.screen);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Book, Category, ConfirmPrompt, AdminSection, MediaKind, Video};
    use ratatui::{backend::TestBackend, Terminal};

    fn render_to_text(
        ui_state: &UiState,
        login: &LoginState,
        dashboard: &DashboardState,
        admin: &AdminState,
        now_playing: Option<&NowPlaying>,
    ) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal
            .draw(|frame| AppView::render(frame, ui_state, login, dashboard, admin, now_playing))
            .unwrap();
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn login_masks_password() {
        let ui = UiState::default();
        let login = LoginState { password: "hunter2".into(), ..LoginState::default() };
        let text = render_to_text(&ui, &login, &DashboardState::default(), &AdminState::default(), None);
        assert!(text.contains("+7"));
        assert!(!text.contains("hunter2"));
        assert!(text.contains("•••••••"));
    }

    #[test]
    fn dashboard_lists_cards_and_now_playing() {
        let ui = UiState { screen: Screen::Dashboard, ..UiState::default() };
        let dashboard = DashboardState {
            videos: vec![Video {
                id: "v1".into(),
                title: "Intro".into(),
                description: "Welcome reel".into(),
                ..Default::default()
            }],
            books: vec![Book { id: "b1".into(), ..Default::default() }],
            category: Category::Videos,
            ..DashboardState::default()
        };
        let playing = NowPlaying {
            title: "Intro".into(),
            kind: MediaKind::Video,
            location: "https://cdn/intro.mp4".into(),
            from_manifest: false,
        };
        let text = render_to_text(
            &ui,
            &LoginState::default(),
            &dashboard,
            &AdminState::default(),
            Some(&playing),
        );
        assert!(text.contains("Intro"));
        assert!(text.contains("Welcome reel"));
        assert!(text.contains("Books (1)"));
        assert!(text.contains("https://cdn/intro.mp4"));
    }

    #[test]
    fn load_error_offers_relogin() {
        let ui = UiState { screen: Screen::Dashboard, ..UiState::default() };
        let dashboard = DashboardState {
            load_error: Some("Failed to load: music".into()),
            ..DashboardState::default()
        };
        let text = render_to_text(&ui, &LoginState::default(), &dashboard, &AdminState::default(), None);
        assert!(text.contains("Failed to load: music"));
        assert!(text.contains("Press L to sign in again"));
    }

    #[test]
    fn admin_confirm_prompt_is_drawn() {
        let ui = UiState { screen: Screen::Admin, ..UiState::default() };
        let admin = AdminState {
            confirm: Some(ConfirmPrompt {
                section: AdminSection::Videos,
                id: "v1".into(),
                label: "Intro".into(),
            }),
            ..AdminState::default()
        };
        let text = render_to_text(&ui, &LoginState::default(), &DashboardState::default(), &admin, None);
        assert!(text.contains("Delete videos \"Intro\"? (y/n)"));
    }
}
