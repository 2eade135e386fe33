//! Key event handling

use std::future::Future;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::model::{Category, Screen};
use super::AppController;
use super::dashboard::OPEN_TASK;

impl AppController {
    /// Run a network-bound action without blocking the render loop.
    fn in_background<F, Fut>(&self, action: F)
    where
        F: FnOnce(AppController) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        tokio::spawn(action(self.clone()));
    }

    pub async fn handle_key_event(&self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        let model = self.model.lock().await;

        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
        {
            model.set_should_quit(true).await;
            return Ok(());
        }

        // Handle error message first (blocks all other interactions)
        if model.has_error().await {
            match key.code {
                KeyCode::Esc | KeyCode::Enter => model.clear_error().await,
                // The session-expired message offers L from any signed-in screen
                KeyCode::Char('L') if model.screen().await != Screen::Login => {
                    model.clear_error().await;
                    drop(model);
                    self.relogin().await;
                }
                _ => {}
            }
            return Ok(());
        }

        if model.is_help_popup_open().await {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('?')) {
                model.hide_help_popup().await;
            }
            return Ok(());
        }

        let screen = model.screen().await;
        drop(model);

        match screen {
            Screen::Login => self.handle_login_key(key).await,
            Screen::Dashboard => self.handle_dashboard_key(key).await,
            Screen::Admin => self.handle_admin_key(key).await,
        }
        Ok(())
    }

    async fn handle_login_key(&self, key: KeyEvent) {
        let model = self.model.lock().await;
        let mut login = model.login_state.lock().await;
        match key.code {
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                login.focus = login.focus.toggle();
            }
            KeyCode::Enter => {
                if !login.submitting {
                    self.in_background(|c| async move { c.submit_login().await });
                }
            }
            KeyCode::Backspace => {
                login.focused_value_mut().pop();
            }
            KeyCode::Char(c) => {
                login.focused_value_mut().push(c);
            }
            KeyCode::Esc => {
                drop(login);
                model.set_should_quit(true).await;
            }
            _ => {}
        }
    }

    async fn handle_dashboard_key(&self, key: KeyEvent) {
        let state = self.model.lock().await.get_dashboard_state().await;

        // The load error replaces the whole dashboard
        if state.load_error.is_some() {
            match key.code {
                KeyCode::Char('L') | KeyCode::Char('l') => self.relogin().await,
                KeyCode::Char('r') => self.in_background(|c| async move { c.load_dashboard().await }),
                KeyCode::Char('q') => self.model.lock().await.set_should_quit(true).await,
                _ => {}
            }
            return;
        }

        if state.search.prompt_open {
            match key.code {
                KeyCode::Esc => self.close_search().await,
                KeyCode::Enter => self.submit_search().await,
                KeyCode::Backspace | KeyCode::Char(_) => {
                    let model = self.model.lock().await;
                    let mut dashboard = model.dashboard_state.lock().await;
                    match key.code {
                        KeyCode::Char(c) => dashboard.search.query.push(c),
                        _ => {
                            dashboard.search.query.pop();
                        }
                    }
                }
                _ => {}
            }
            return;
        }

        if state.search.visible {
            match key.code {
                KeyCode::Up => self.move_search_selection(false).await,
                KeyCode::Down => self.move_search_selection(true).await,
                KeyCode::Enter => self.open_search_hit().await,
                KeyCode::Esc => self.close_search().await,
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Left | KeyCode::BackTab => self.cycle_category(false).await,
            KeyCode::Right | KeyCode::Tab => self.cycle_category(true).await,
            KeyCode::Char(c @ '1'..='4') => {
                let index = c as usize - '1' as usize;
                if let Some(category) = Category::from_index(index) {
                    self.select_category(category).await;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => self.move_card_selection(false).await,
            KeyCode::Down | KeyCode::Char('j') => self.move_card_selection(true).await,
            KeyCode::Enter => {
                self.spawn_keyed(OPEN_TASK, |c| async move { c.toggle_selected_card().await })
                    .await
            }
            KeyCode::Esc => self.close_card().await,
            KeyCode::Char('/') => self.open_search_prompt().await,
            KeyCode::Char('a') => {
                let is_admin = state.profile.as_ref().is_some_and(|p| p.is_admin());
                if is_admin {
                    self.in_background(|c| async move { c.open_admin().await });
                }
            }
            KeyCode::Char('o') => self.logout().await,
            KeyCode::Char('L') => self.relogin().await,
            KeyCode::Char('r') => self.in_background(|c| async move { c.load_dashboard().await }),
            KeyCode::Char('h') | KeyCode::Char('?') => self.model.lock().await.show_help_popup().await,
            KeyCode::Char('q') => self.model.lock().await.set_should_quit(true).await,
            _ => {}
        }
    }

    async fn handle_admin_key(&self, key: KeyEvent) {
        let state = self.model.lock().await.get_admin_state().await;

        if state.confirm.is_some() {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    self.in_background(|c| async move { c.confirm_delete().await })
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => self.cancel_confirm().await,
                _ => {}
            }
            return;
        }

        if let Some(form) = state.form.as_ref() {
            if form.submitting {
                return;
            }
            match key.code {
                KeyCode::Esc => self.cancel_form().await,
                KeyCode::Enter => self.in_background(|c| async move { c.submit_form().await }),
                _ => self.edit_form(key).await,
            }
            return;
        }

        match key.code {
            KeyCode::Tab | KeyCode::Right => self.cycle_admin_section(true).await,
            KeyCode::BackTab | KeyCode::Left => self.cycle_admin_section(false).await,
            KeyCode::Up | KeyCode::Char('k') => self.move_admin_selection(false).await,
            KeyCode::Down | KeyCode::Char('j') => self.move_admin_selection(true).await,
            KeyCode::Char('n') => self.open_create_form().await,
            KeyCode::Char('e') => {
                if state.section.supports_edit() {
                    self.open_edit_form().await;
                }
            }
            KeyCode::Char('d') => self.request_delete().await,
            KeyCode::Char('A') => self.in_background(|c| async move { c.archive_selected(false).await }),
            KeyCode::Char('R') => self.in_background(|c| async move { c.archive_selected(true).await }),
            KeyCode::Char('r') => self.in_background(|c| async move { c.refresh_admin().await }),
            KeyCode::Char('L') => self.relogin().await,
            KeyCode::Esc | KeyCode::Char('b') => {
                self.in_background(|c| async move { c.leave_admin().await })
            }
            KeyCode::Char('h') | KeyCode::Char('?') => self.model.lock().await.show_help_popup().await,
            KeyCode::Char('q') => self.model.lock().await.set_should_quit(true).await,
            _ => {}
        }
    }

    /// Typing inside the open admin form.
    async fn edit_form(&self, key: KeyEvent) {
        let model = self.model.lock().await;
        let mut state = model.admin_state.lock().await;
        let Some(form) = state.form.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Tab | KeyCode::Down => form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
            KeyCode::Left | KeyCode::Right => {
                if let Some(field) = form.focused_mut() {
                    field.cycle(key.code == KeyCode::Right);
                }
            }
            KeyCode::Backspace => {
                if let Some(field) = form.focused_mut().filter(|f| !f.is_choice()) {
                    field.value.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(field) = form.focused_mut().filter(|f| !f.is_choice()) {
                    field.value.push(c);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AdminSection, LoginField};
    use crate::test_support::{healthy_client, signed_in_controller, test_controller};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    async fn type_text(controller: &AppController, text: &str) {
        for c in text.chars() {
            controller.handle_key_event(press(KeyCode::Char(c))).await.unwrap();
        }
    }

    #[tokio::test]
    async fn login_typing_fills_focused_field() {
        let (controller, _dir) = test_controller(healthy_client().await).await;
        type_text(&controller, "9001").await;
        controller.handle_key_event(press(KeyCode::Tab)).await.unwrap();
        type_text(&controller, "pw").await;
        controller.handle_key_event(press(KeyCode::Backspace)).await.unwrap();

        let login = controller.model.lock().await.get_login_state().await;
        assert_eq!(login.phone, "+79001");
        assert_eq!(login.password, "p");
        assert_eq!(login.focus, LoginField::Password);
    }

    #[tokio::test]
    async fn error_overlay_swallows_keys_until_dismissed() {
        let (controller, _dir) = test_controller(healthy_client().await).await;
        controller.model.lock().await.set_error("Boom".into()).await;

        type_text(&controller, "5").await;
        assert_eq!(controller.model.lock().await.get_login_state().await.phone, "+7");

        controller.handle_key_event(press(KeyCode::Esc)).await.unwrap();
        assert!(!controller.model.lock().await.has_error().await);
    }

    #[tokio::test]
    async fn ctrl_c_quits_from_anywhere() {
        let (controller, _dir) = test_controller(healthy_client().await).await;
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        controller.handle_key_event(key).await.unwrap();
        assert!(controller.model.lock().await.should_quit().await);
    }

    #[tokio::test]
    async fn dashboard_number_keys_switch_category_and_slash_searches() {
        let (controller, _dir) = signed_in_controller(healthy_client().await).await;
        controller.load_dashboard().await;
        controller.model.lock().await.set_screen(Screen::Dashboard).await;

        controller.handle_key_event(press(KeyCode::Char('3'))).await.unwrap();
        assert_eq!(
            controller.model.lock().await.get_dashboard_state().await.category,
            Category::Music
        );

        controller.handle_key_event(press(KeyCode::Char('/'))).await.unwrap();
        type_text(&controller, "dune").await;
        let search = controller.model.lock().await.get_dashboard_state().await.search;
        assert!(search.prompt_open);
        assert_eq!(search.query, "dune");

        controller.handle_key_event(press(KeyCode::Esc)).await.unwrap();
        assert!(!controller.model.lock().await.get_dashboard_state().await.search.prompt_open);
    }

    #[tokio::test]
    async fn expired_session_overlay_offers_sign_in_again() {
        let (controller, _dir) = signed_in_controller(healthy_client().await).await;
        {
            let model = controller.model.lock().await;
            model.set_screen(Screen::Dashboard).await;
            model.set_token(Some("expired".into())).await;
        }
        controller.perform_search("intro").await;
        let error = controller.model.lock().await.get_ui_state().await.error_message;
        assert_eq!(error.as_deref(), Some("Session expired. Sign in again (L)."));

        controller.handle_key_event(press(KeyCode::Char('L'))).await.unwrap();
        let model = controller.model.lock().await;
        assert_eq!(model.screen().await, Screen::Login);
        assert!(!model.has_error().await);
        assert_eq!(model.token().await, None);
        assert_eq!(controller.tokens.get(), None);
    }

    #[tokio::test]
    async fn expired_admin_notice_key_returns_to_login() {
        let (controller, _dir) = signed_in_controller(healthy_client().await).await;
        controller.model.lock().await.set_screen(Screen::Admin).await;

        controller.handle_key_event(press(KeyCode::Char('L'))).await.unwrap();
        assert_eq!(controller.model.lock().await.screen().await, Screen::Login);
        assert_eq!(controller.tokens.get(), None);
    }

    #[tokio::test]
    async fn admin_tab_cycles_sections_and_form_typing() {
        let (controller, _dir) = signed_in_controller(healthy_client().await).await;
        controller.model.lock().await.set_screen(Screen::Admin).await;

        controller.handle_key_event(press(KeyCode::Tab)).await.unwrap();
        controller.handle_key_event(press(KeyCode::Tab)).await.unwrap();
        controller.handle_key_event(press(KeyCode::Tab)).await.unwrap();
        controller.handle_key_event(press(KeyCode::Tab)).await.unwrap();
        assert_eq!(
            controller.model.lock().await.get_admin_state().await.section,
            AdminSection::Genres
        );

        controller.handle_key_event(press(KeyCode::Char('n'))).await.unwrap();
        type_text(&controller, "Jazz").await;
        controller.handle_key_event(press(KeyCode::Tab)).await.unwrap();
        controller.handle_key_event(press(KeyCode::Right)).await.unwrap();
        type_text(&controller, "x").await;

        let form = controller.model.lock().await.get_admin_state().await.form.unwrap();
        assert_eq!(form.value("name"), "Jazz");
        assert_eq!(form.value("type"), "movie");

        controller.handle_key_event(press(KeyCode::Esc)).await.unwrap();
        assert!(controller.model.lock().await.get_admin_state().await.form.is_none());
    }
}
