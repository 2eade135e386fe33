//! External player hand-off

use std::process::Stdio;
use tokio::process::{Child, Command};

use crate::model::{MediaKind, NowPlaying, PlayTarget};

use super::AppController;

/// Commands used to hand media off to other programs
#[derive(Clone, Debug)]
pub struct Players {
    pub player: String,
    pub opener: String,
}

impl Players {
    fn program(&self, kind: MediaKind) -> &str {
        match kind {
            MediaKind::Document => &self.opener,
            MediaKind::Video | MediaKind::Audio => &self.player,
        }
    }
}

/// The resolved target plus the process showing it. The target outlives a
/// failed launch so its location stays inspectable until the card closes.
pub(crate) struct ActivePlayback {
    target: PlayTarget,
    child: Option<Child>,
}

impl ActivePlayback {
    fn stop(&mut self) {
        if let Some(child) = self.child.as_mut() {
            if let Err(e) = child.start_kill() {
                tracing::debug!(error = %e, "Player already gone");
            }
        }
        self.child = None;
    }
}

impl AppController {
    /// Replace whatever is playing with `target`. Returns the launch error
    /// message when the program could not be started.
    pub(crate) async fn start_playback(
        &self,
        title: &str,
        kind: MediaKind,
        target: PlayTarget,
    ) -> Result<(), String> {
        self.stop_playback().await;

        let program = self.players.program(kind).to_string();
        let location = target.location();
        let from_manifest = target.is_manifest();
        tracing::info!(program, location, from_manifest, kind = kind.label(), "Launching player");

        let spawned = Command::new(&program)
            .arg(&location)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn();

        let (child, outcome) = match spawned {
            Ok(child) => (Some(child), Ok(())),
            Err(e) => {
                tracing::error!(program, error = %e, "Failed to launch player");
                (None, Err(format!("Could not start {program}: {e}")))
            }
        };

        if outcome.is_ok() {
            let model = self.model.lock().await;
            model
                .set_now_playing(Some(NowPlaying {
                    title: title.to_string(),
                    kind,
                    location,
                    from_manifest,
                }))
                .await;
        }

        *self.playback.lock().await = Some(ActivePlayback { target, child });
        outcome
    }

    /// Kill the player and release its target (removing any manifest file).
    pub(crate) async fn stop_playback(&self) {
        if let Some(mut active) = self.playback.lock().await.take() {
            active.stop();
            tracing::debug!(location = %active.target.location(), "Playback stopped");
        }
        let model = self.model.lock().await;
        model.set_now_playing(None).await;
    }

    /// Stop playback only while it still shows `location`, leaving a newer
    /// target alone.
    pub(crate) async fn stop_playback_of(&self, location: &str) {
        let stopped = {
            let mut slot = self.playback.lock().await;
            if slot.as_ref().is_some_and(|active| active.target.location() == location) {
                slot.take()
            } else {
                None
            }
        };
        if let Some(mut active) = stopped {
            active.stop();
            tracing::debug!(location, "Playback of a closed card stopped");
            let model = self.model.lock().await;
            model.set_now_playing(None).await;
        }
    }

    /// Notice a player that exited on its own and clear the status bar.
    pub async fn reap_playback(&self) {
        let mut slot = self.playback.lock().await;
        let Some(active) = slot.as_mut() else {
            return;
        };
        let exited = match active.child.as_mut() {
            Some(child) => matches!(child.try_wait(), Ok(Some(_))),
            None => false,
        };
        if exited {
            tracing::debug!("Player exited");
            active.child = None;
            drop(slot);
            let model = self.model.lock().await;
            model.set_now_playing(None).await;
        }
    }

    #[cfg(test)]
    pub(crate) async fn playback_location(&self) -> Option<String> {
        self.playback.lock().await.as_ref().map(|a| a.target.location())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{healthy_client, test_controller};

    #[tokio::test]
    async fn superseding_playback_removes_previous_manifest() {
        let (controller, _dir) = test_controller(healthy_client().await).await;
        let first = PlayTarget::resolve(Some("#EXTM3U\n"), None).unwrap().unwrap();
        let first_path = first.location();

        controller.start_playback("One", MediaKind::Video, first).await.unwrap();
        assert!(std::path::Path::new(&first_path).exists());

        let second = PlayTarget::resolve(None, Some("http://cdn/two.mp3")).unwrap().unwrap();
        controller.start_playback("Two", MediaKind::Audio, second).await.unwrap();
        assert!(!std::path::Path::new(&first_path).exists());

        let now = controller.model.lock().await.now_playing().await.unwrap();
        assert_eq!(now.title, "Two");
        assert_eq!(now.kind, MediaKind::Audio);
        assert!(!now.from_manifest);
    }

    #[tokio::test]
    async fn launch_failure_keeps_target() {
        let (mut controller, _dir) = test_controller(healthy_client().await).await;
        controller.players.player = "/nonexistent/medialib-player".to_string();
        let target = PlayTarget::resolve(None, Some("http://cdn/a.mp4")).unwrap().unwrap();

        let err = controller.start_playback("A", MediaKind::Video, target).await.unwrap_err();
        assert!(err.starts_with("Could not start /nonexistent/medialib-player"));
        assert_eq!(controller.playback_location().await.as_deref(), Some("http://cdn/a.mp4"));
        assert!(controller.model.lock().await.now_playing().await.is_none());

        controller.stop_playback().await;
        assert!(controller.playback_location().await.is_none());
    }
}
