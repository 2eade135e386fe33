//! File-based logging for medialib-rs
//!
//! The TUI owns the terminal, so every event goes to a daily log file.
//! Phone numbers are redacted before they reach a log line and bearer
//! tokens are never passed to the macros below.

use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

const LOG_FILE_PREFIX: &str = "medialib-rs";
const DEFAULT_FILTER: &str = "medialib_rs=debug,reqwest=info,warn";

/// Digits of a phone number left readable in logs.
const PHONE_VISIBLE_DIGITS: usize = 2;

/// Initialize logging into `log_dir/medialib-rs.YYYY-MM-DD.log`.
///
/// `RUST_LOG` overrides the default filter (`medialib_rs` at DEBUG,
/// `reqwest` at INFO, everything else at WARN).
pub fn init_logging(log_dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Flushes on drop, so it must live until exit
    Box::leak(Box::new(guard));

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();

    tracing::info!(log_dir = %log_dir.display(), "Logging initialized");

    Ok(())
}

/// Mask all but the last couple of digits, keeping the `+` prefix.
pub fn redact_phone(phone: &str) -> String {
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    let mut seen = 0;
    phone
        .chars()
        .map(|c| {
            if !c.is_ascii_digit() {
                return c;
            }
            seen += 1;
            if seen + PHONE_VISIBLE_DIGITS > digits { c } else { '*' }
        })
        .collect()
}

/// Log a backend request's outcome, with the HTTP status when there is one
#[macro_export]
macro_rules! log_api_result {
    ($operation:expr, $result:expr) => {
        match &$result {
            Ok(_) => tracing::info!(operation = $operation, "API request successful"),
            Err(e) => tracing::error!(
                operation = $operation,
                status = ?e.status(),
                error = %e,
                "API request failed"
            ),
        }
    };
}

/// Log the start of a backend request, optionally with extra fields
#[macro_export]
macro_rules! log_api_request {
    ($operation:expr) => {
        tracing::debug!(operation = $operation, "API request started");
    };
    ($operation:expr, $($field:tt)+) => {
        tracing::debug!(operation = $operation, $($field)+, "API request started");
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_keeps_prefix_and_last_digits() {
        assert_eq!(redact_phone("+79001234567"), "+*********67");
        assert_eq!(redact_phone("+7"), "+7");
        assert_eq!(redact_phone(""), "");
    }

    #[test]
    fn failed_result_logs_without_panicking() {
        let result: crate::model::ApiResult<()> =
            Err(crate::model::ApiError::InvalidInput("Title is required".into()));
        log_api_result!("create_video", result);
        log_api_request!("create_video", title = "x");
    }
}
