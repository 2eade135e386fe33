//! Media library backend client with one method per REST operation

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::entities::{
    Book, BookLinks, Genre, Music, MusicLinks, Playlist, Profile, SearchHit, TokenPair, User,
    Video, VideoPlayLinks,
};
use super::error::{ApiError, ApiResult};
use super::requests::{
    BookPatch, BookUpload, GenreDraft, GenrePatch, MusicUpload, PlaylistUpload, UserDraft,
    UserPatch, VideoPatch, VideoUpload,
};
use crate::logging::redact_phone;
use crate::{log_api_request, log_api_result};

const API_PREFIX: &str = "/api/v1";
const VIDEO_PAGE_LIMIT: u32 = 50;

/// Thin wrapper over the backend. Holds no token: every authenticated call
/// takes the bearer token explicitly.
#[derive(Clone)]
pub struct MediaClient {
    http: reqwest::Client,
    api_base: Arc<str>,
}

impl MediaClient {
    pub fn new(api_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("medialib-rs/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            api_base: api_base(api_url).into(),
        })
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let builder = self.http.request(method, format!("{}{}", self.api_base, path));
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send and turn any non-success status into `ApiError::Status`.
    async fn send(&self, context: &str, request: RequestBuilder) -> ApiResult<Response> {
        let response = request.send().await.map_err(|source| ApiError::Transport {
            context: context.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<Value>()
                .await
                .ok()
                .and_then(|body| extract_detail(&body));
            tracing::debug!(status = status.as_u16(), detail = ?detail, context, "Backend rejected request");
            return Err(ApiError::Status {
                context: context.to_string(),
                status: status.as_u16(),
                detail,
            });
        }
        Ok(response)
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        context: &str,
        request: RequestBuilder,
    ) -> ApiResult<T> {
        let response = self.send(context, request).await?;
        response.json::<T>().await.map_err(|source| ApiError::Decode {
            context: context.to_string(),
            source,
        })
    }

    /// For endpoints whose body is irrelevant (deletes may answer 204).
    async fn execute_discard(&self, context: &str, request: RequestBuilder) -> ApiResult<()> {
        self.send(context, request).await.map(|_| ())
    }

    // ========================================================================
    // Auth
    // ========================================================================

    pub async fn sign_in(&self, phone: &str, password: &str) -> ApiResult<TokenPair> {
        log_api_request!("sign_in", phone = %redact_phone(phone));
        let request = self
            .request(Method::POST, "/auth/sign-in", None)
            .json(&serde_json::json!({ "phone": phone, "password": password }));
        let result = self.execute("Auth failed", request).await;
        log_api_result!("sign_in", result);
        result
    }

    pub async fn me(&self, token: &str) -> ApiResult<Profile> {
        log_api_request!("me");
        let result = self
            .execute("Unauthorized", self.request(Method::GET, "/auth/me", Some(token)))
            .await;
        log_api_result!("me", result);
        result
    }

    // ========================================================================
    // Videos
    // ========================================================================

    pub async fn list_videos(&self, token: &str) -> ApiResult<Vec<Video>> {
        log_api_request!("list_videos");
        let request = self
            .request(Method::GET, "/videos", Some(token))
            .query(&[("limit", VIDEO_PAGE_LIMIT), ("offset", 0)]);
        let result = self.execute("Failed to load videos", request).await;
        log_api_result!("list_videos", result);
        result
    }

    pub async fn video_play(&self, token: &str, id: &str) -> ApiResult<VideoPlayLinks> {
        log_api_request!("video_play", id);
        let request = self.request(Method::GET, &format!("/videos/{id}/play"), Some(token));
        let result = self.execute("Failed to load video link", request).await;
        log_api_result!("video_play", result);
        result
    }

    pub async fn create_video(&self, token: &str, upload: VideoUpload) -> ApiResult<Video> {
        log_api_request!("create_video", title = %upload.title);
        let request = self
            .request(Method::POST, "/videos", Some(token))
            .multipart(upload.into_form()?);
        let result = self.execute("Failed to create video", request).await;
        log_api_result!("create_video", result);
        result
    }

    pub async fn update_video(&self, token: &str, id: &str, patch: VideoPatch) -> ApiResult<Video> {
        log_api_request!("update_video", id);
        let request = self
            .request(Method::PATCH, &format!("/videos/{id}"), Some(token))
            .multipart(patch.into_form());
        let result = self.execute("Failed to update video", request).await;
        log_api_result!("update_video", result);
        result
    }

    pub async fn delete_video(&self, token: &str, id: &str) -> ApiResult<()> {
        log_api_request!("delete_video", id);
        let request = self.request(Method::DELETE, &format!("/videos/{id}"), Some(token));
        let result = self.execute_discard("Failed to delete video", request).await;
        log_api_result!("delete_video", result);
        result
    }

    pub async fn archive_video(&self, token: &str, id: &str) -> ApiResult<Video> {
        log_api_request!("archive_video", id);
        let request = self.request(Method::POST, &format!("/videos/{id}/archive"), Some(token));
        let result = self.execute("Failed to archive video", request).await;
        log_api_result!("archive_video", result);
        result
    }

    pub async fn restore_video(&self, token: &str, id: &str) -> ApiResult<Video> {
        log_api_request!("restore_video", id);
        let request = self.request(Method::POST, &format!("/videos/{id}/restore"), Some(token));
        let result = self.execute("Failed to restore video", request).await;
        log_api_result!("restore_video", result);
        result
    }

    // ========================================================================
    // Books
    // ========================================================================

    pub async fn list_books(&self, token: &str) -> ApiResult<Vec<Book>> {
        log_api_request!("list_books");
        let request = self.request(Method::GET, "/books/books", Some(token));
        let result = self.execute("Failed to load books", request).await;
        log_api_result!("list_books", result);
        result
    }

    pub async fn book_links(&self, token: &str, id: &str) -> ApiResult<BookLinks> {
        log_api_request!("book_links", id);
        let request = self.request(Method::GET, &format!("/books/books/{id}/links"), Some(token));
        let result = self.execute("Failed to load book link", request).await;
        log_api_result!("book_links", result);
        result
    }

    pub async fn create_book(&self, token: &str, upload: BookUpload) -> ApiResult<Book> {
        log_api_request!("create_book", title = %upload.title);
        let request = self
            .request(Method::POST, "/books/books", Some(token))
            .multipart(upload.into_form()?);
        let result = self.execute("Failed to create book", request).await;
        log_api_result!("create_book", result);
        result
    }

    pub async fn update_book(&self, token: &str, id: &str, patch: &BookPatch) -> ApiResult<Book> {
        log_api_request!("update_book", id);
        let request = self
            .request(Method::PATCH, &format!("/books/books/{id}"), Some(token))
            .json(patch);
        let result = self.execute("Failed to update book", request).await;
        log_api_result!("update_book", result);
        result
    }

    pub async fn delete_book(&self, token: &str, id: &str) -> ApiResult<()> {
        log_api_request!("delete_book", id);
        let request = self.request(Method::DELETE, &format!("/books/books/{id}"), Some(token));
        let result = self.execute_discard("Failed to delete book", request).await;
        log_api_result!("delete_book", result);
        result
    }

    // ========================================================================
    // Music & playlists
    // ========================================================================

    pub async fn list_music(&self, token: &str) -> ApiResult<Vec<Music>> {
        log_api_request!("list_music");
        let request = self.request(Method::GET, "/music/musics/", Some(token));
        let result = self.execute("Failed to load music", request).await;
        log_api_result!("list_music", result);
        result
    }

    pub async fn music_links(&self, token: &str, id: &str) -> ApiResult<MusicLinks> {
        log_api_request!("music_links", id);
        let request = self.request(Method::GET, &format!("/music/musics/{id}/links"), Some(token));
        let result = self.execute("Failed to load music link", request).await;
        log_api_result!("music_links", result);
        result
    }

    pub async fn create_music(&self, token: &str, upload: MusicUpload) -> ApiResult<Music> {
        log_api_request!("create_music", title = %upload.title);
        let request = self
            .request(Method::POST, "/music/musics/", Some(token))
            .multipart(upload.into_form()?);
        let result = self.execute("Failed to create music", request).await;
        log_api_result!("create_music", result);
        result
    }

    pub async fn delete_music(&self, token: &str, id: &str) -> ApiResult<()> {
        log_api_request!("delete_music", id);
        let request = self.request(Method::DELETE, &format!("/music/musics/{id}"), Some(token));
        let result = self.execute_discard("Failed to delete music", request).await;
        log_api_result!("delete_music", result);
        result
    }

    pub async fn list_playlists(&self, token: &str) -> ApiResult<Vec<Playlist>> {
        log_api_request!("list_playlists");
        let request = self.request(Method::GET, "/playlists/playlists/", Some(token));
        let result = self.execute("Failed to load playlists", request).await;
        log_api_result!("list_playlists", result);
        result
    }

    pub async fn create_playlist(&self, token: &str, upload: PlaylistUpload) -> ApiResult<Playlist> {
        log_api_request!("create_playlist", title = %upload.title);
        let request = self
            .request(Method::POST, "/playlists/playlists/", Some(token))
            .multipart(upload.into_form()?);
        let result = self.execute("Failed to create playlist", request).await;
        log_api_result!("create_playlist", result);
        result
    }

    pub async fn delete_playlist(&self, token: &str, id: &str) -> ApiResult<()> {
        log_api_request!("delete_playlist", id);
        let request =
            self.request(Method::DELETE, &format!("/playlists/playlists/{id}"), Some(token));
        let result = self.execute_discard("Failed to delete playlist", request).await;
        log_api_result!("delete_playlist", result);
        result
    }

    // ========================================================================
    // Genres
    // ========================================================================

    pub async fn list_genres(&self, token: &str) -> ApiResult<Vec<Genre>> {
        log_api_request!("list_genres");
        let request = self.request(Method::GET, "/genres/genres/", Some(token));
        let result = self.execute("Failed to load genres", request).await;
        log_api_result!("list_genres", result);
        result
    }

    pub async fn create_genre(&self, token: &str, draft: &GenreDraft) -> ApiResult<Genre> {
        log_api_request!("create_genre", name = %draft.name);
        let request = self
            .request(Method::POST, "/genres/genres/", Some(token))
            .json(draft);
        let result = self.execute("Failed to create genre", request).await;
        log_api_result!("create_genre", result);
        result
    }

    pub async fn update_genre(&self, token: &str, id: &str, patch: &GenrePatch) -> ApiResult<Genre> {
        log_api_request!("update_genre", id);
        let request = self
            .request(Method::PUT, &format!("/genres/genres/{id}"), Some(token))
            .json(patch);
        let result = self.execute("Failed to update genre", request).await;
        log_api_result!("update_genre", result);
        result
    }

    pub async fn delete_genre(&self, token: &str, id: &str) -> ApiResult<()> {
        log_api_request!("delete_genre", id);
        let request = self.request(Method::DELETE, &format!("/genres/genres/{id}"), Some(token));
        let result = self.execute_discard("Failed to delete genre", request).await;
        log_api_result!("delete_genre", result);
        result
    }

    // ========================================================================
    // Users
    // ========================================================================

    pub async fn list_users(&self, token: &str) -> ApiResult<Vec<User>> {
        log_api_request!("list_users");
        let request = self.request(Method::GET, "/users/users/", Some(token));
        let result = self.execute("Failed to load users", request).await;
        log_api_result!("list_users", result);
        result
    }

    pub async fn create_user(&self, token: &str, draft: &UserDraft) -> ApiResult<User> {
        log_api_request!("create_user", phone = %redact_phone(&draft.phone));
        let request = self
            .request(Method::POST, "/users/users/", Some(token))
            .json(draft);
        let result = self.execute("Failed to create user", request).await;
        log_api_result!("create_user", result);
        result
    }

    pub async fn update_user(&self, token: &str, id: &str, patch: &UserPatch) -> ApiResult<User> {
        log_api_request!("update_user", id);
        let request = self
            .request(Method::PATCH, &format!("/users/users/{id}"), Some(token))
            .json(patch);
        let result = self.execute("Failed to update user", request).await;
        log_api_result!("update_user", result);
        result
    }

    pub async fn delete_user(&self, token: &str, id: &str) -> ApiResult<()> {
        log_api_request!("delete_user", id);
        let request = self.request(Method::DELETE, &format!("/users/users/{id}"), Some(token));
        let result = self.execute_discard("Failed to delete user", request).await;
        log_api_result!("delete_user", result);
        result
    }

    // ========================================================================
    // Search
    // ========================================================================

    pub async fn search(&self, token: &str, query: &str, limit: u32) -> ApiResult<Vec<SearchHit>> {
        log_api_request!("search", query, limit);
        let request = self
            .request(Method::GET, "/search", Some(token))
            .query(&[("q", query.to_string()), ("limit", limit.to_string())]);
        let result = self.execute("Search failed", request).await;
        log_api_result!("search", result);
        result
    }
}

fn api_base(api_url: &str) -> String {
    format!("{}{}", api_url.trim_end_matches('/'), API_PREFIX)
}

/// FastAPI reports errors as `{"detail": "..."}` or, for validation
/// failures, `{"detail": [{"msg": "..."}, ...]}`.
fn extract_detail(body: &Value) -> Option<String> {
    match body.get("detail")? {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            (!msgs.is_empty()).then(|| msgs.join("; "))
        }
        _ => None,
    }
}
