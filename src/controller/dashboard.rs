//! Dashboard controller methods (catalog loading, previews, cards, search)

use crate::model::{
    ApiResult, CatalogItem, Category, MediaClient, MediaKind, OpenCard, PlayTarget, PreviewLookup,
    PreviewSlot, Screen,
};

use super::AppController;

pub const SEARCH_LIMIT: u32 = 20;

const PREVIEW_TASK: &str = "preview";
const SEARCH_TASK: &str = "search";
/// Key of the background task resolving and launching an opened card.
pub(crate) const OPEN_TASK: &str = "open";

/// Keep a list on success; record its name on failure.
fn settle<T>(result: ApiResult<Vec<T>>, category: Category, failed: &mut Vec<&'static str>) -> Vec<T> {
    match result {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(category = category.key(), error = %e, "List failed to load");
            failed.push(category.key());
            Vec::new()
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl AppController {
    /// Fetch the profile, then all four lists concurrently. A failed list
    /// comes back empty and is named in the error.
    pub async fn load_dashboard(&self) {
        let Some((client, token)) = self.session().await else {
            let model = self.model.lock().await;
            model.reset_to_login().await;
            return;
        };

        {
            let model = self.model.lock().await;
            let mut state = model.dashboard_state.lock().await;
            state.loading = true;
            state.load_error = None;
        }

        let profile = match client.me(&token).await {
            Ok(profile) => profile,
            Err(e) => {
                let model = self.model.lock().await;
                let mut state = model.dashboard_state.lock().await;
                state.loading = false;
                state.load_error = Some(format!("Load error: {e}"));
                return;
            }
        };

        let (videos, books, music, playlists) = futures::join!(
            client.list_videos(&token),
            client.list_books(&token),
            client.list_music(&token),
            client.list_playlists(&token),
        );

        let mut failed = Vec::new();
        {
            let model = self.model.lock().await;
            let mut state = model.dashboard_state.lock().await;
            state.profile = Some(profile);
            state.videos = settle(videos, Category::Videos, &mut failed);
            state.books = settle(books, Category::Books, &mut failed);
            state.music = settle(music, Category::Music, &mut failed);
            state.playlists = settle(playlists, Category::Playlists, &mut failed);
            state.loading = false;
            state.clamp_selection();
            if !failed.is_empty() {
                state.load_error = Some(format!("Failed to load: {}", failed.join(", ")));
            }
            tracing::info!(
                videos = state.videos.len(),
                books = state.books.len(),
                music = state.music.len(),
                playlists = state.playlists.len(),
                failed = failed.len(),
                "Dashboard loaded"
            );
        }

        self.refresh_preview().await;
    }

    /// Clear the token and go back to the login form (the `L` prompt).
    pub async fn relogin(&self) {
        self.logout().await;
    }

    pub async fn select_category(&self, category: Category) {
        {
            let model = self.model.lock().await;
            model.dashboard_state.lock().await.set_category(category);
        }
        self.refresh_preview().await;
    }

    pub async fn cycle_category(&self, forward: bool) {
        let current = {
            let model = self.model.lock().await;
            let category = model.dashboard_state.lock().await.category;
            category
        };
        let next = if forward { current.next() } else { current.prev() };
        self.select_category(next).await;
    }

    pub async fn move_card_selection(&self, down: bool) {
        {
            let model = self.model.lock().await;
            let mut state = model.dashboard_state.lock().await;
            if down {
                state.move_down();
            } else {
                state.move_up();
            }
        }
        self.refresh_preview().await;
    }

    /// Resolve the preview of the selected card if it is not known yet.
    /// Lookups run in the background; a newer selection supersedes them.
    pub async fn refresh_preview(&self) {
        let item = {
            let model = self.model.lock().await;
            let mut state = model.dashboard_state.lock().await;
            let Some(item) = state.selected_item() else {
                state.preview = PreviewSlot::default();
                return;
            };
            if state.preview.item_id == item.id() {
                return;
            }
            let plan = item.preview_plan();
            state.preview = PreviewSlot {
                item_id: item.id().to_string(),
                url: plan.direct,
                resolved: plan.lookup.is_none(),
            };
            match plan.lookup {
                Some(lookup) => (item.id().to_string(), lookup),
                None => return,
            }
        };

        let Some((client, token)) = self.session().await else {
            return;
        };
        let controller = self.clone();
        let handle = tokio::spawn(async move {
            let (item_id, lookup) = item;
            let url = Self::lookup_preview(&client, &token, &item_id, lookup).await;
            controller.apply_preview(&item_id, url).await;
        });
        self.tasks.lock().await.spawn(PREVIEW_TASK, handle);
    }

    /// Secondary preview lookup. Failures are swallowed.
    pub(crate) async fn lookup_preview(
        client: &MediaClient,
        token: &str,
        item_id: &str,
        lookup: PreviewLookup,
    ) -> Option<String> {
        let url = match lookup {
            PreviewLookup::VideoPlay => client
                .video_play(token, item_id)
                .await
                .ok()
                .and_then(|links| links.preview_url),
            PreviewLookup::MusicLinks => client
                .music_links(token, item_id)
                .await
                .ok()
                .and_then(|links| links.preview_img),
            PreviewLookup::BookLinks => client
                .book_links(token, item_id)
                .await
                .ok()
                .and_then(|links| links.cover_url),
        };
        non_blank(url)
    }

    /// Store a looked-up preview unless the selection has moved on.
    pub(crate) async fn apply_preview(&self, item_id: &str, url: Option<String>) {
        let model = self.model.lock().await;
        let mut state = model.dashboard_state.lock().await;
        if state.preview.item_id != item_id {
            tracing::debug!(item_id, "Discarding stale preview");
            return;
        }
        if url.is_some() {
            state.preview.url = url;
        }
        state.preview.resolved = true;
    }

    /// Enter on a card: close it if open, otherwise resolve what to play and
    /// hand it to the external player.
    pub async fn toggle_selected_card(&self) {
        let item = {
            let model = self.model.lock().await;
            let state = model.dashboard_state.lock().await;
            state.selected_item()
        };
        let Some(item) = item else {
            return;
        };
        if !item.is_openable() {
            return;
        }

        let already_open = {
            let model = self.model.lock().await;
            let state = model.dashboard_state.lock().await;
            state.is_open(item.id())
        };
        if already_open {
            self.release_card().await;
            return;
        }

        self.open_card(item).await;
    }

    /// Close the open card, cancelling a lookup still in flight for it.
    pub async fn close_card(&self) {
        self.tasks.lock().await.abort(OPEN_TASK);
        self.release_card().await;
    }

    async fn release_card(&self) {
        self.stop_playback().await;
        let model = self.model.lock().await;
        model.dashboard_state.lock().await.open = None;
    }

    async fn card_is_open(&self, item_id: &str) -> bool {
        let model = self.model.lock().await;
        let state = model.dashboard_state.lock().await;
        state.is_open(item_id)
    }

    async fn open_card(&self, item: CatalogItem) {
        self.stop_playback().await;
        {
            let model = self.model.lock().await;
            model.dashboard_state.lock().await.open = Some(OpenCard {
                category: item.category(),
                item_id: item.id().to_string(),
                location: None,
                from_manifest: false,
                launch_error: None,
            });
        }

        let Some((client, token)) = self.session().await else {
            return;
        };
        let (kind, target) = match Self::resolve_target(&client, &token, &item).await {
            Some(resolved) => resolved,
            None => return,
        };

        if !self.card_is_open(item.id()).await {
            tracing::debug!(id = item.id(), "Card closed before its target resolved");
            return;
        }

        let location = target.location();
        let from_manifest = target.is_manifest();
        let launched = self.start_playback(item.title(), kind, target).await;

        // Closed while the player was starting
        if !self.card_is_open(item.id()).await {
            self.stop_playback_of(&location).await;
            return;
        }

        let model = self.model.lock().await;
        {
            let mut state = model.dashboard_state.lock().await;
            if let Some(card) = state.open.as_mut().filter(|c| c.item_id == item.id()) {
                card.location = Some(location);
                card.from_manifest = from_manifest;
                card.launch_error = launched.as_ref().err().cloned();
            }
        }
        if let Err(message) = launched {
            model.set_error(message).await;
        }
    }

    /// Streams prefer the inline playlist; books open their file URL.
    /// Lookup failures are logged and leave the card without a target.
    async fn resolve_target(
        client: &MediaClient,
        token: &str,
        item: &CatalogItem,
    ) -> Option<(MediaKind, PlayTarget)> {
        let resolved = match item {
            CatalogItem::Video(video) => match client.video_play(token, &video.id).await {
                Ok(links) => PlayTarget::resolve(links.playlist.as_deref(), links.video_url.as_deref())
                    .map(|t| t.map(|t| (MediaKind::Video, t))),
                Err(e) => {
                    tracing::warn!(id = %video.id, error = %e, "No play link");
                    return None;
                }
            },
            CatalogItem::Music(music) => match client.music_links(token, &music.id).await {
                Ok(links) => PlayTarget::resolve(links.playlist.as_deref(), links.music_url.as_deref())
                    .map(|t| t.map(|t| (MediaKind::Audio, t))),
                Err(e) => {
                    tracing::warn!(id = %music.id, error = %e, "No music link");
                    return None;
                }
            },
            CatalogItem::Book(book) => match client.book_links(token, &book.id).await {
                Ok(links) => PlayTarget::resolve(None, links.file_url.as_deref())
                    .map(|t| t.map(|t| (MediaKind::Document, t))),
                Err(e) => {
                    tracing::warn!(id = %book.id, error = %e, "No book link");
                    return None;
                }
            },
            CatalogItem::Playlist(_) => return None,
        };

        match resolved {
            Ok(target) => target,
            Err(e) => {
                tracing::error!(error = %e, "Could not write playlist manifest");
                None
            }
        }
    }

    /// Leave the dashboard for the admin panel (admins only).
    pub async fn open_admin(&self) {
        let is_admin = self.model.lock().await.is_admin().await;
        if !is_admin {
            let model = self.model.lock().await;
            model.set_error("Admin access required.".to_string()).await;
            return;
        }
        self.tasks.lock().await.abort(PREVIEW_TASK);
        self.close_card().await;
        {
            let model = self.model.lock().await;
            model.set_screen(Screen::Admin).await;
        }
        self.refresh_admin().await;
    }

    // ========================================================================
    // Search
    // ========================================================================

    pub async fn open_search_prompt(&self) {
        let model = self.model.lock().await;
        let mut state = model.dashboard_state.lock().await;
        state.search.prompt_open = true;
        state.search.query.clear();
    }

    pub async fn close_search(&self) {
        self.tasks.lock().await.abort(SEARCH_TASK);
        let model = self.model.lock().await;
        let mut state = model.dashboard_state.lock().await;
        state.search.prompt_open = false;
        state.search.visible = false;
        state.search.loading = false;
    }

    /// Run the typed query in the background.
    pub async fn submit_search(&self) {
        let query = {
            let model = self.model.lock().await;
            let mut state = model.dashboard_state.lock().await;
            let query = state.search.query.trim().to_string();
            if query.is_empty() {
                return;
            }
            state.search.prompt_open = false;
            state.search.loading = true;
            query
        };
        let controller = self.clone();
        let handle = tokio::spawn(async move {
            controller.perform_search(&query).await;
        });
        self.tasks.lock().await.spawn(SEARCH_TASK, handle);
    }

    pub async fn perform_search(&self, query: &str) {
        let Some((client, token)) = self.session().await else {
            return;
        };
        tracing::debug!(query, "Performing search");
        let result = client.search(&token, query, SEARCH_LIMIT).await;

        let model = self.model.lock().await;
        match result {
            Ok(hits) => {
                tracing::info!(query, hits = hits.len(), "Search completed");
                let mut state = model.dashboard_state.lock().await;
                state.search.results = hits;
                state.search.selected = 0;
                state.search.visible = true;
                state.search.loading = false;
            }
            Err(e) => {
                model.dashboard_state.lock().await.search.loading = false;
                model.set_error(Self::format_error(&e)).await;
            }
        }
    }

    pub async fn move_search_selection(&self, down: bool) {
        let model = self.model.lock().await;
        let mut state = model.dashboard_state.lock().await;
        let search = &mut state.search;
        if down {
            if search.selected + 1 < search.results.len() {
                search.selected += 1;
            }
        } else {
            search.selected = search.selected.saturating_sub(1);
        }
    }

    /// Jump to the selected hit's category and select it if it is loaded.
    pub async fn open_search_hit(&self) {
        {
            let model = self.model.lock().await;
            let mut state = model.dashboard_state.lock().await;
            let Some(hit) = state.search.results.get(state.search.selected).cloned() else {
                return;
            };
            let category = hit.kind.category();
            if !state.select_by_id(category, &hit.id) {
                tracing::debug!(id = %hit.id, "Search hit not in loaded list");
                state.set_category(category);
            }
            state.search.visible = false;
        }
        self.refresh_preview().await;
    }
}
