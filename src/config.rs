//! Command-line and environment configuration

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

/// Terminal client for the media library
#[derive(Parser, Debug, Clone)]
#[command(name = "medialib-rs")]
#[command(about = "Browse, play and administer a media library from the terminal")]
#[command(version)]
pub struct Config {
    /// Backend root URL; `/api/v1` is appended
    #[arg(long, default_value = "http://localhost:8000", env = "MEDIALIB_API_URL")]
    pub api_url: String,

    /// Command used to play video and audio
    #[arg(long, default_value = "mpv", env = "MEDIALIB_PLAYER")]
    pub player: String,

    /// Command used to open book files
    #[arg(long, default_value = "xdg-open", env = "MEDIALIB_OPENER")]
    pub opener: String,

    /// Directory holding the stored access token
    #[arg(long, default_value = ".cache", env = "MEDIALIB_CACHE_DIR")]
    pub cache_dir: PathBuf,

    /// Directory for the daily log files
    #[arg(long, default_value = ".logs", env = "MEDIALIB_LOG_DIR")]
    pub log_dir: PathBuf,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "30", env = "MEDIALIB_REQUEST_TIMEOUT")]
    pub request_timeout: u64,
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let config = Config::parse_from([
            "medialib-rs",
            "--api-url",
            "http://media.local:9000/",
            "--player",
            "vlc",
            "--request-timeout",
            "0",
        ]);
        assert_eq!(config.api_url, "http://media.local:9000/");
        assert_eq!(config.player, "vlc");
        assert_eq!(config.timeout(), Duration::from_secs(1));
        assert_eq!(config.log_dir, PathBuf::from(".logs"));
    }

    #[test]
    fn command_definition_is_consistent() {
        use clap::CommandFactory;
        Config::command().debug_assert();
    }
}
