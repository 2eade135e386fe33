//! Records mirrored from backend responses
//!
//! The backend owns every one of these; the client only deserializes,
//! displays and drops them. Unknown fields are ignored and missing optional
//! fields default so partially populated rows still render.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum VideoStatus {
    Active,
    Archived,
    #[default]
    Processing,
    Failed,
    #[serde(other)]
    Unknown,
}

impl VideoStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            VideoStatus::Active => "ACTIVE",
            VideoStatus::Archived => "ARCHIVED",
            VideoStatus::Processing => "PROCESSING",
            VideoStatus::Failed => "FAILED",
            VideoStatus::Unknown => "UNKNOWN",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GenreType {
    #[default]
    Music,
    Movie,
    Book,
}

impl GenreType {
    pub const ALL: [GenreType; 3] = [GenreType::Music, GenreType::Movie, GenreType::Book];

    pub fn as_str(self) -> &'static str {
        match self {
            GenreType::Music => "music",
            GenreType::Movie => "movie",
            GenreType::Book => "book",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "user" => Some(Role::User),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct Video {
    pub id: String,
    pub title: String,
    pub description: String,
    pub preview_img: String,
    pub video: String,
    pub status: VideoStatus,
    pub genre_id: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    pub description: String,
    pub genre: Option<String>,
    pub file_url: String,
    pub cover_url: Option<String>,
    pub published_year: Option<i32>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct Music {
    pub id: String,
    pub playlist_id: String,
    pub title: String,
    pub description: String,
    pub preview_img: String,
    pub music_url: String,
    pub duration: i64,
    pub genre_id: Option<String>,
    pub status: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct Playlist {
    pub id: String,
    pub title: String,
    pub name: Option<String>,
    pub description: String,
    pub preview_img: String,
    pub musics: Vec<Music>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct Genre {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: GenreType,
}

#[derive(Clone, Debug, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct User {
    pub id: String,
    pub fullname: String,
    pub phone: String,
    pub role: Role,
}

/// Payload of `/auth/me`: the claims of the current token.
#[derive(Clone, Debug, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Profile {
    pub id: String,
    pub fullname: Option<String>,
    pub phone: String,
    pub role: Role,
}

impl Profile {
    pub fn display_name(&self) -> &str {
        match self.fullname.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.phone,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Clone, Debug, Deserialize, Default)]
#[serde(default)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct VideoPlayLinks {
    pub video_url: Option<String>,
    pub playlist: Option<String>,
    pub preview_url: Option<String>,
    pub status: Option<VideoStatus>,
}

#[derive(Clone, Debug, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct MusicLinks {
    pub music_url: Option<String>,
    pub playlist: Option<String>,
    pub preview_img: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct BookLinks {
    pub file_url: Option<String>,
    pub cover_url: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
    Book,
    Video,
    Music,
}

impl SearchKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SearchKind::Book => "book",
            SearchKind::Video => "video",
            SearchKind::Music => "music",
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct SearchHit {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: SearchKind,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub score: f64,
}

/// Parse a backend timestamp. The backend emits RFC 3339 for timezone-aware
/// columns and naive ISO strings for the rest; naive values are taken as UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Returns the value unless it is absent or blank.
pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_tolerates_missing_and_extra_fields() {
        let video: Video = serde_json::from_str(
            r#"{"id":"v1","title":"Intro","status":"ARCHIVED","extra":1}"#,
        )
        .unwrap();
        assert_eq!(video.id, "v1");
        assert_eq!(video.status, VideoStatus::Archived);
        assert!(video.preview_img.is_empty());
    }

    #[test]
    fn unknown_video_status_does_not_fail() {
        let video: Video = serde_json::from_str(r#"{"id":"v1","status":"QUEUED"}"#).unwrap();
        assert_eq!(video.status, VideoStatus::Unknown);
    }

    #[test]
    fn genre_type_uses_wire_field_name() {
        let genre: Genre =
            serde_json::from_str(r#"{"id":"g1","name":"Jazz","type":"music"}"#).unwrap();
        assert_eq!(genre.kind, GenreType::Music);
        assert_eq!(GenreType::parse("movie"), Some(GenreType::Movie));
        assert_eq!(GenreType::parse("cartoon"), None);
    }

    #[test]
    fn profile_display_name_falls_back_to_phone() {
        let profile: Profile =
            serde_json::from_str(r#"{"id":"u1","phone":"+70000000000","role":"admin"}"#).unwrap();
        assert_eq!(profile.display_name(), "+70000000000");
        assert!(profile.is_admin());

        let named = Profile {
            fullname: Some("Ada".to_string()),
            ..profile
        };
        assert_eq!(named.display_name(), "Ada");
    }

    #[test]
    fn playlist_embeds_music() {
        let playlist: Playlist = serde_json::from_str(
            r#"{"id":"p1","title":"Mix","musics":[{"id":"m1","playlist_id":"p1","title":"Song","duration":180}]}"#,
        )
        .unwrap();
        assert_eq!(playlist.musics.len(), 1);
        assert_eq!(playlist.musics[0].duration, 180);
    }

    #[test]
    fn timestamps_parse_aware_and_naive() {
        let aware = parse_timestamp("2024-05-01T10:00:00+00:00").unwrap();
        let naive = parse_timestamp("2024-05-01T10:00:00.123456").unwrap();
        assert_eq!(aware.date_naive(), naive.date_naive());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn search_hit_decodes() {
        let hit: SearchHit = serde_json::from_str(
            r#"{"id":"b1","type":"book","title":"Dune","score":0.9}"#,
        )
        .unwrap();
        assert_eq!(hit.kind, SearchKind::Book);
        assert!(hit.description.is_none());
    }
}
