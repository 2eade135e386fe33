//! In-process fake backend shared by the client and controller tests

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    body::Bytes,
    extract::Path,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post},
};
use serde_json::{Value, json};
use tempfile::TempDir;
use tokio::sync::Mutex;

use crate::auth::TokenStore;
use crate::controller::{AppController, Players};
use crate::model::{AppModel, MediaClient};

pub const GOOD_TOKEN: &str = "token-123";

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {GOOD_TOKEN}"))
        .unwrap_or(false)
}

/// Spawn an in-process fake backend and return its base URL.
pub async fn spawn_backend(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/")
}

async fn music_list(music_up: bool) -> impl IntoResponse {
    if music_up {
        (
            StatusCode::OK,
            Json(json!([{"id": "m1", "playlist_id": "p1", "title": "Song", "preview_img": "", "duration": 185}])),
        )
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"detail": "db down"})))
    }
}

/// Backend with the auth endpoints and a full catalog. With `music_up`
/// false the music listing answers 500.
pub fn backend(music_up: bool) -> Router {
    backend_with(music_up, Duration::ZERO)
}

/// Like [`backend`], with video play links answering after `play_delay`.
pub fn backend_with(music_up: bool, play_delay: Duration) -> Router {
    Router::new()
        .route(
            "/api/v1/auth/sign-in",
            post(|Json(body): Json<Value>| async move {
                if body["password"] == "admin123" {
                    (
                        StatusCode::OK,
                        Json(json!({"access_token": GOOD_TOKEN, "refresh_token": "r"})),
                    )
                } else {
                    (StatusCode::UNAUTHORIZED, Json(json!({"detail": "Invalid credentials"})))
                }
            }),
        )
        .route(
            "/api/v1/auth/me",
            get(|headers: HeaderMap| async move {
                if authorized(&headers) {
                    (
                        StatusCode::OK,
                        Json(json!({"id": "u1", "fullname": "Admin User", "phone": "+70000000000", "role": "admin"})),
                    )
                } else {
                    (StatusCode::UNAUTHORIZED, Json(json!({"detail": "Invalid or expired token"})))
                }
            }),
        )
        .route(
            "/api/v1/videos",
            get(|| async {
                Json(json!([{"id": "v1", "title": "Intro", "description": "First", "preview_img": "previews/v1.jpg", "status": "ACTIVE"}]))
            })
            .post(|body: Bytes| async move {
                let text = String::from_utf8_lossy(&body);
                if text.contains("name=\"preview\"") && text.contains("name=\"file\"") {
                    (StatusCode::CREATED, Json(json!({"id": "v2", "title": "New", "status": "PROCESSING"})))
                } else {
                    (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({"detail": "files missing"})))
                }
            }),
        )
        .route(
            "/api/v1/videos/{id}",
            delete(|Path(_id): Path<String>| async { StatusCode::NO_CONTENT }).patch(
                |Path(id): Path<String>| async move {
                    Json(json!({"id": id, "title": "Edited", "status": "ACTIVE"}))
                },
            ),
        )
        .route(
            "/api/v1/videos/{id}/play",
            get(move |Path(id): Path<String>| async move {
                tokio::time::sleep(play_delay).await;
                Json(json!({
                    "video_url": format!("http://cdn/{id}.mp4"),
                    "playlist": "#EXTM3U\n#EXT-X-ENDLIST\n",
                    "preview_url": format!("http://cdn/{id}.jpg"),
                    "status": "ACTIVE"
                }))
            }),
        )
        .route(
            "/api/v1/videos/{id}/archive",
            post(|Path(id): Path<String>| async move {
                Json(json!({"id": id, "title": "Intro", "status": "ARCHIVED"}))
            }),
        )
        .route(
            "/api/v1/videos/{id}/restore",
            post(|Path(id): Path<String>| async move {
                Json(json!({"id": id, "title": "Intro", "status": "ACTIVE"}))
            }),
        )
        .route(
            "/api/v1/books/books",
            get(|| async {
                Json(json!([{"id": "b1", "title": "", "author": "Herbert", "description": "", "cover_url": "http://cdn/b1.jpg", "file_url": "books/b1.pdf"}]))
            }),
        )
        .route(
            "/api/v1/books/books/{id}",
            delete(|Path(_id): Path<String>| async { StatusCode::NO_CONTENT }),
        )
        .route(
            "/api/v1/books/books/{id}/links",
            get(|Path(id): Path<String>| async move {
                Json(json!({"file_url": format!("http://cdn/{id}.pdf"), "cover_url": format!("http://cdn/{id}.jpg")}))
            }),
        )
        .route("/api/v1/music/musics/", get(move || music_list(music_up)))
        .route(
            "/api/v1/music/musics/{id}/links",
            get(|Path(id): Path<String>| async move {
                Json(json!({"music_url": format!("http://cdn/{id}.mp3"), "preview_img": format!("http://cdn/{id}.png")}))
            }),
        )
        .route(
            "/api/v1/playlists/playlists/",
            get(|| async { Json(json!([{"id": "p1", "title": "Mix", "preview_img": "", "musics": []}])) }),
        )
        .route(
            "/api/v1/genres/genres/",
            get(|| async { Json(json!([{"id": "g1", "name": "Jazz", "type": "music"}, {"id": "locked", "name": "Rock", "type": "music"}])) })
                .post(|Json(body): Json<Value>| async move {
                    if body["name"].as_str().unwrap_or_default().is_empty() {
                        (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({"detail": [{"msg": "name too short"}]})))
                    } else {
                        (StatusCode::OK, Json(json!({"id": "g2", "name": body["name"], "type": body["type"]})))
                    }
                }),
        )
        .route(
            "/api/v1/genres/genres/{id}",
            delete(|Path(id): Path<String>| async move {
                if id == "locked" {
                    (StatusCode::CONFLICT, Json(json!({"detail": "Genre in use"}))).into_response()
                } else {
                    StatusCode::NO_CONTENT.into_response()
                }
            }),
        )
        .route(
            "/api/v1/users/users/",
            get(|| async { Json(json!([{"id": "u1", "fullname": "Admin User", "phone": "+70000000000", "role": "admin"}])) }),
        )
        .route(
            "/api/v1/search",
            get(|headers: HeaderMap| async move {
                if authorized(&headers) {
                    Json(json!([{"id": "v1", "type": "video", "title": "Intro", "score": 0.8}])).into_response()
                } else {
                    (StatusCode::UNAUTHORIZED, Json(json!({"detail": "Invalid or expired token"}))).into_response()
                }
            }),
        )
}

/// Client against a backend whose music listing fails.
pub async fn fake_client() -> MediaClient {
    let base = spawn_backend(backend(false)).await;
    MediaClient::new(&base, Duration::from_secs(5)).unwrap()
}

/// Client against a backend where every listing succeeds.
pub async fn healthy_client() -> MediaClient {
    let base = spawn_backend(backend(true)).await;
    MediaClient::new(&base, Duration::from_secs(5)).unwrap()
}

/// Client whose video play links take 400 ms to arrive.
pub async fn slow_play_client() -> MediaClient {
    let base = spawn_backend(backend_with(true, Duration::from_millis(400))).await;
    MediaClient::new(&base, Duration::from_secs(5)).unwrap()
}

/// Controller with a scratch token directory. Both programs are `true`, so
/// launches succeed without opening anything.
pub async fn test_controller(client: MediaClient) -> (AppController, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let model = Arc::new(Mutex::new(AppModel::new(client)));
    let players = Players {
        player: "true".to_string(),
        opener: "true".to_string(),
    };
    let controller = AppController::new(model, TokenStore::new(dir.path()), players);
    (controller, dir)
}

/// Like [`test_controller`], already holding a valid token.
pub async fn signed_in_controller(client: MediaClient) -> (AppController, TempDir) {
    let (controller, dir) = test_controller(client).await;
    controller.tokens.save(GOOD_TOKEN).unwrap();
    controller.model.lock().await.set_token(Some(GOOD_TOKEN.to_string())).await;
    (controller, dir)
}
