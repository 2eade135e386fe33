//! Play-target resolution and the transient HLS manifest lifecycle

use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

pub const HLS_MIME: &str = "application/vnd.apple.mpegurl";

/// An HLS playlist returned inline by the backend, written to a temp file so
/// an external player can open it. The file is removed on drop.
#[derive(Debug)]
pub struct PlaylistManifest {
    file: NamedTempFile,
}

impl PlaylistManifest {
    pub fn materialize(contents: &str) -> io::Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("medialib-")
            .suffix(".m3u8")
            .tempfile()?;
        file.write_all(contents.as_bytes())?;
        file.flush()?;
        tracing::debug!(path = %file.path().display(), mime = HLS_MIME, "Materialized playlist manifest");
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

impl Drop for PlaylistManifest {
    fn drop(&mut self) {
        tracing::debug!(path = %self.file.path().display(), "Releasing playlist manifest");
    }
}

/// What the external player should open.
#[derive(Debug)]
pub enum PlayTarget {
    Url(String),
    Manifest(PlaylistManifest),
}

impl PlayTarget {
    /// Prefer the inline playlist (adaptive streaming) over the direct file URL.
    pub fn resolve(playlist: Option<&str>, direct_url: Option<&str>) -> io::Result<Option<Self>> {
        if let Some(playlist) = playlist.filter(|p| !p.is_empty()) {
            return PlaylistManifest::materialize(playlist).map(|m| Some(PlayTarget::Manifest(m)));
        }
        Ok(direct_url
            .filter(|u| !u.is_empty())
            .map(|u| PlayTarget::Url(u.to_string())))
    }

    pub fn location(&self) -> String {
        match self {
            PlayTarget::Url(url) => url.clone(),
            PlayTarget::Manifest(manifest) => manifest.path().display().to_string(),
        }
    }

    pub fn is_manifest(&self) -> bool {
        matches!(self, PlayTarget::Manifest(_))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Audio,
    Document,
}

impl MediaKind {
    pub fn label(self) -> &'static str {
        match self {
            MediaKind::Video => "video",
            MediaKind::Audio => "audio",
            MediaKind::Document => "book",
        }
    }
}

/// What the status bar shows about the running external player
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NowPlaying {
    pub title: String,
    pub kind: MediaKind,
    pub location: String,
    pub from_manifest: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playlist_wins_over_direct_url() {
        let target = PlayTarget::resolve(Some("#EXTM3U\n"), Some("http://cdn/a.mp4"))
            .unwrap()
            .unwrap();
        assert!(target.is_manifest());
        assert!(target.location().ends_with(".m3u8"));
        assert_eq!(std::fs::read_to_string(target.location()).unwrap(), "#EXTM3U\n");
    }

    #[test]
    fn empty_playlist_falls_back_to_url() {
        let target = PlayTarget::resolve(Some(""), Some("http://cdn/a.mp4"))
            .unwrap()
            .unwrap();
        assert_eq!(target.location(), "http://cdn/a.mp4");
    }

    #[test]
    fn nothing_to_play_resolves_to_none() {
        assert!(PlayTarget::resolve(None, None).unwrap().is_none());
        assert!(PlayTarget::resolve(None, Some("")).unwrap().is_none());
    }

    #[test]
    fn manifest_file_is_removed_on_drop() {
        let manifest = PlaylistManifest::materialize("#EXTM3U\n").unwrap();
        let path = manifest.path().to_path_buf();
        assert!(path.exists());
        drop(manifest);
        assert!(!path.exists());
    }

    #[test]
    fn superseding_a_target_releases_the_old_manifest() {
        let mut current = PlayTarget::resolve(Some("#EXTM3U\n# one\n"), None)
            .unwrap()
            .unwrap();
        let first = current.location();
        current = PlayTarget::resolve(Some("#EXTM3U\n# two\n"), None)
            .unwrap()
            .unwrap();
        assert!(!Path::new(&first).exists());
        assert!(Path::new(&current.location()).exists());
    }
}
