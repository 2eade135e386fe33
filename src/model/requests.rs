//! Request payloads for catalog mutations

use std::path::{Path, PathBuf};

use reqwest::multipart::{Form, Part};
use serde::Serialize;

use super::entities::{GenreType, Role, VideoStatus};
use super::error::{ApiError, ApiResult};

/// A local file staged for a multipart upload.
#[derive(Clone, Debug)]
pub struct UploadFile {
    pub path: PathBuf,
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub async fn load(path: impl AsRef<Path>) -> ApiResult<Self> {
        let path = path.as_ref().to_path_buf();
        let bytes = tokio::fs::read(&path).await.map_err(|source| ApiError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload".to_string());
        let mime = detect_mime(&bytes, &file_name);
        tracing::debug!(file = %file_name, mime = %mime, size = bytes.len(), "Staged upload");
        Ok(Self { path, file_name, mime, bytes })
    }

    fn into_part(self) -> ApiResult<Part> {
        Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(&self.mime)
            .map_err(|e| ApiError::InvalidInput(format!("Bad content type: {e}")))
    }
}

/// Sniff the content first; the extension is only a fallback because the
/// backend checks real image/video signatures.
pub fn detect_mime(bytes: &[u8], file_name: &str) -> String {
    if let Some(kind) = infer::get(bytes) {
        return kind.mime_type().to_string();
    }
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mkv" => "video/x-matroska",
        "mov" => "video/quicktime",
        "mp3" => "audio/mpeg",
        "flac" => "audio/flac",
        "ogg" => "audio/ogg",
        "wav" => "audio/wav",
        "m4a" => "audio/mp4",
        "pdf" => "application/pdf",
        "epub" => "application/epub+zip",
        _ => "application/octet-stream",
    }
    .to_string()
}

fn push_text(form: Form, name: &'static str, value: Option<String>) -> Form {
    match value {
        Some(v) if !v.is_empty() => form.text(name, v),
        _ => form,
    }
}

#[derive(Clone, Debug)]
pub struct VideoUpload {
    pub title: String,
    pub description: String,
    pub genre_id: Option<String>,
    pub preview: UploadFile,
    pub file: UploadFile,
}

impl VideoUpload {
    pub fn into_form(self) -> ApiResult<Form> {
        let form = Form::new()
            .text("title", self.title)
            .text("description", self.description);
        let form = push_text(form, "genre_id", self.genre_id);
        Ok(form
            .part("preview", self.preview.into_part()?)
            .part("file", self.file.into_part()?))
    }
}

#[derive(Clone, Debug, Default)]
pub struct VideoPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<VideoStatus>,
    pub genre_id: Option<String>,
}

impl VideoPatch {
    pub fn into_form(self) -> Form {
        let form = push_text(Form::new(), "title", self.title);
        let form = push_text(form, "description", self.description);
        let form = push_text(form, "status", self.status.map(|s| s.as_str().to_string()));
        push_text(form, "genre_id", self.genre_id)
    }
}

#[derive(Clone, Debug)]
pub struct BookUpload {
    pub title: String,
    pub author: String,
    pub description: String,
    pub genre: Option<String>,
    pub published_year: Option<i32>,
    pub file: UploadFile,
    pub cover: Option<UploadFile>,
}

impl BookUpload {
    pub fn into_form(self) -> ApiResult<Form> {
        let form = Form::new()
            .text("title", self.title)
            .text("author", self.author)
            .text("description", self.description);
        let form = push_text(form, "genre", self.genre);
        let form = push_text(form, "published_year", self.published_year.map(|y| y.to_string()));
        let form = form.part("file", self.file.into_part()?);
        Ok(match self.cover {
            Some(cover) => form.part("cover", cover.into_part()?),
            None => form,
        })
    }
}

#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct BookPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_year: Option<i32>,
}

#[derive(Clone, Debug)]
pub struct MusicUpload {
    pub playlist_id: String,
    pub title: String,
    pub description: String,
    pub genre_id: Option<String>,
    pub preview_img: UploadFile,
    pub music: UploadFile,
}

impl MusicUpload {
    pub fn into_form(self) -> ApiResult<Form> {
        let form = Form::new()
            .text("playlist_id", self.playlist_id)
            .text("title", self.title)
            .text("description", self.description);
        let form = push_text(form, "genre_id", self.genre_id);
        Ok(form
            .part("preview_img", self.preview_img.into_part()?)
            .part("music", self.music.into_part()?))
    }
}

#[derive(Clone, Debug)]
pub struct PlaylistUpload {
    pub title: String,
    pub description: String,
    pub preview_img: UploadFile,
}

impl PlaylistUpload {
    pub fn into_form(self) -> ApiResult<Form> {
        Ok(Form::new()
            .text("title", self.title)
            .text("description", self.description)
            .part("preview_img", self.preview_img.into_part()?))
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct GenreDraft {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: GenreType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct GenrePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<GenreType>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct UserDraft {
    pub fullname: String,
    pub phone: String,
    pub password: String,
    pub role: Role,
}

#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fullname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_prefers_magic_bytes_over_extension() {
        let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
        assert_eq!(detect_mime(&png, "cover.jpg"), "image/png");
    }

    #[test]
    fn mime_falls_back_to_extension() {
        assert_eq!(detect_mime(b"plain", "book.EPUB"), "application/epub+zip");
        assert_eq!(detect_mime(b"plain", "noext"), "application/octet-stream");
    }

    #[test]
    fn patches_omit_unset_fields() {
        let patch = BookPatch {
            title: Some("New".to_string()),
            published_year: Some(1999),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            serde_json::json!({"title": "New", "published_year": 1999})
        );

        let genre = GenrePatch {
            kind: Some(GenreType::Book),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&genre).unwrap(), serde_json::json!({"type": "book"}));
    }

    #[test]
    fn user_draft_serializes_role_lowercase() {
        let draft = UserDraft {
            fullname: "Ada".to_string(),
            phone: "+70000000001".to_string(),
            password: "secret123".to_string(),
            role: Role::Admin,
        };
        assert_eq!(serde_json::to_value(&draft).unwrap()["role"], "admin");
    }

    #[tokio::test]
    async fn upload_file_reads_name_and_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp3");
        std::fs::write(&path, b"not really audio").unwrap();

        let upload = UploadFile::load(&path).await.unwrap();
        assert_eq!(upload.file_name, "clip.mp3");
        assert_eq!(upload.mime, "audio/mpeg");
        assert_eq!(upload.bytes, b"not really audio");
    }

    #[tokio::test]
    async fn upload_file_missing_is_io_error() {
        let err = UploadFile::load("/definitely/not/here.png").await.unwrap_err();
        assert!(matches!(err, ApiError::Io { .. }));
    }
}
