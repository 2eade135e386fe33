//! Admin panel controller methods (lists, forms, mutations)

use crate::model::{
    AdminLists, AdminSection, ApiResult, ConfirmPrompt, FormState, MediaClient, Mutation, Notice,
    Screen,
};

use super::AppController;

impl AppController {
    /// Reload all six lists at once. Any failure leaves the previous lists
    /// in place and shows the first error.
    pub async fn refresh_admin(&self) {
        let Some((client, token)) = self.session().await else {
            return;
        };
        // The error is already on screen
        let _ = self.reload_admin(&client, &token).await;
    }

    async fn reload_admin(&self, client: &MediaClient, token: &str) -> ApiResult<()> {
        {
            let model = self.model.lock().await;
            let mut state = model.admin_state.lock().await;
            state.loading = true;
            state.error = None;
        }

        let result = Self::fetch_admin_lists(client, token).await;

        let model = self.model.lock().await;
        let mut state = model.admin_state.lock().await;
        state.loading = false;
        match result {
            Ok(lists) => {
                state.replace_lists(lists);
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Admin refresh failed");
                state.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    async fn fetch_admin_lists(client: &MediaClient, token: &str) -> ApiResult<AdminLists> {
        let (videos, books, music, playlists, genres, users) = tokio::try_join!(
            client.list_videos(token),
            client.list_books(token),
            client.list_music(token),
            client.list_playlists(token),
            client.list_genres(token),
            client.list_users(token),
        )?;
        Ok(AdminLists { videos, books, music, playlists, genres, users })
    }

    pub async fn leave_admin(&self) {
        {
            let model = self.model.lock().await;
            let mut state = model.admin_state.lock().await;
            state.form = None;
            state.confirm = None;
            state.notice = None;
            drop(state);
            model.set_screen(Screen::Dashboard).await;
        }
        self.load_dashboard().await;
    }

    pub async fn cycle_admin_section(&self, forward: bool) {
        let model = self.model.lock().await;
        let mut state = model.admin_state.lock().await;
        state.section = if forward { state.section.next() } else { state.section.prev() };
    }

    pub async fn move_admin_selection(&self, down: bool) {
        let model = self.model.lock().await;
        let mut state = model.admin_state.lock().await;
        if down {
            state.move_down();
        } else {
            state.move_up();
        }
    }

    pub async fn open_create_form(&self) {
        let model = self.model.lock().await;
        let mut state = model.admin_state.lock().await;
        state.form = Some(FormState::create(state.section));
    }

    /// Edit form pre-filled from the selected row.
    pub async fn open_edit_form(&self) {
        let model = self.model.lock().await;
        let mut state = model.admin_state.lock().await;
        let index = state.selected_index();
        let form = match state.section {
            AdminSection::Videos => state.lists.videos.get(index).map(FormState::edit_video),
            AdminSection::Books => state.lists.books.get(index).map(FormState::edit_book),
            AdminSection::Genres => state.lists.genres.get(index).map(FormState::edit_genre),
            AdminSection::Users => state.lists.users.get(index).map(FormState::edit_user),
            AdminSection::Music | AdminSection::Playlists => None,
        };
        if form.is_some() {
            state.form = form;
        }
    }

    pub async fn cancel_form(&self) {
        let model = self.model.lock().await;
        model.admin_state.lock().await.form = None;
    }

    pub async fn request_delete(&self) {
        let model = self.model.lock().await;
        let mut state = model.admin_state.lock().await;
        if let Some((id, label)) = state.selected_identity() {
            state.confirm = Some(ConfirmPrompt { section: state.section, id, label });
        }
    }

    pub async fn cancel_confirm(&self) {
        let model = self.model.lock().await;
        model.admin_state.lock().await.confirm = None;
    }

    pub async fn confirm_delete(&self) {
        let prompt = {
            let model = self.model.lock().await;
            let prompt = model.admin_state.lock().await.confirm.take();
            prompt
        };
        if let Some(prompt) = prompt {
            self.run(Mutation::delete(prompt.section, prompt.id)).await;
        }
    }

    /// Archive (or restore) the selected video.
    pub async fn archive_selected(&self, restore: bool) {
        let id = {
            let model = self.model.lock().await;
            let state = model.admin_state.lock().await;
            if state.section != AdminSection::Videos {
                return;
            }
            match state.selected_identity() {
                Some((id, _)) => id,
                None => return,
            }
        };
        let mutation = if restore {
            Mutation::RestoreVideo(id)
        } else {
            Mutation::ArchiveVideo(id)
        };
        self.run(mutation).await;
    }

    /// Validate the open form and send it. Validation errors stay on the
    /// form and nothing is sent.
    pub async fn submit_form(&self) {
        let form = {
            let model = self.model.lock().await;
            let mut state = model.admin_state.lock().await;
            match state.form.as_mut() {
                Some(form) if !form.submitting => {
                    form.submitting = true;
                    form.error = None;
                    form.clone()
                }
                _ => return,
            }
        };

        let mutation = match form.into_mutation().await {
            Ok(mutation) => mutation,
            Err(e) => {
                tracing::debug!(error = %e, "Form rejected locally");
                let model = self.model.lock().await;
                let mut state = model.admin_state.lock().await;
                if let Some(open) = state.form.as_mut() {
                    open.submitting = false;
                    open.error = Some(e.to_string());
                }
                return;
            }
        };

        let succeeded = self.run(mutation).await;

        let model = self.model.lock().await;
        let mut state = model.admin_state.lock().await;
        if succeeded {
            state.form = None;
            return;
        }
        let message = state.notice.as_ref().map(|n| n.text.clone());
        if let Some(open) = state.form.as_mut() {
            open.submitting = false;
            open.error = message;
        }
    }

    /// Send one mutation, then refresh every list. Returns whether both
    /// the mutation and the refresh succeeded.
    pub async fn run(&self, mutation: Mutation) -> bool {
        let Some((client, token)) = self.session().await else {
            return false;
        };
        let success_text = mutation.success_text();
        let target = mutation.target_id().map(str::to_string);
        {
            let model = self.model.lock().await;
            model.admin_state.lock().await.notice = None;
        }

        tracing::info!(action = success_text, target = ?target, "Running admin mutation");
        // A mutation only counts once the lists reflect it
        let outcome = match Self::apply(&client, &token, mutation).await {
            Ok(()) => self.reload_admin(&client, &token).await,
            Err(e) => Err(e),
        };
        match outcome {
            Ok(()) => {
                let model = self.model.lock().await;
                let mut state = model.admin_state.lock().await;
                state.notice = Some(Notice::success(success_text));
                let editing_target = state
                    .form
                    .as_ref()
                    .and_then(|f| f.kind.target_id())
                    .is_some_and(|id| Some(id) == target.as_deref());
                if editing_target {
                    state.form = None;
                }
                true
            }
            Err(e) => {
                let model = self.model.lock().await;
                model.admin_state.lock().await.notice = Some(Notice::error(Self::format_error(&e)));
                false
            }
        }
    }

    async fn apply(client: &MediaClient, token: &str, mutation: Mutation) -> ApiResult<()> {
        match mutation {
            Mutation::CreateVideo(upload) => client.create_video(token, upload).await.map(drop),
            Mutation::UpdateVideo(id, patch) => client.update_video(token, &id, patch).await.map(drop),
            Mutation::DeleteVideo(id) => client.delete_video(token, &id).await,
            Mutation::ArchiveVideo(id) => client.archive_video(token, &id).await.map(drop),
            Mutation::RestoreVideo(id) => client.restore_video(token, &id).await.map(drop),
            Mutation::CreateBook(upload) => client.create_book(token, upload).await.map(drop),
            Mutation::UpdateBook(id, patch) => client.update_book(token, &id, &patch).await.map(drop),
            Mutation::DeleteBook(id) => client.delete_book(token, &id).await,
            Mutation::CreateMusic(upload) => client.create_music(token, upload).await.map(drop),
            Mutation::DeleteMusic(id) => client.delete_music(token, &id).await,
            Mutation::CreatePlaylist(upload) => client.create_playlist(token, upload).await.map(drop),
            Mutation::DeletePlaylist(id) => client.delete_playlist(token, &id).await,
            Mutation::CreateGenre(draft) => client.create_genre(token, &draft).await.map(drop),
            Mutation::UpdateGenre(id, patch) => client.update_genre(token, &id, &patch).await.map(drop),
            Mutation::DeleteGenre(id) => client.delete_genre(token, &id).await,
            Mutation::CreateUser(draft) => client.create_user(token, &draft).await.map(drop),
            Mutation::UpdateUser(id, patch) => client.update_user(token, &id, &patch).await.map(drop),
            Mutation::DeleteUser(id) => client.delete_user(token, &id).await,
        }
    }
}
