//! Structured logging (§6, component L): `logs/latest.log`, rotated to
//! `logs/proxy-YYYY-MM-DD-N.log` on startup, mirrored to stdout.

use std::fs;
use std::path::Path;

use time::macros::format_description;
use time::OffsetDateTime;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Renames an existing `logs/latest.log` to `logs/proxy-YYYY-MM-DD-N.log`,
/// picking the smallest `N` not already on disk for today's date.
fn rotate_latest_log(log_dir: &Path) {
    let latest = log_dir.join("latest.log");
    if !latest.exists() {
        return;
    }

    let format = format_description!("[year]-[month]-[day]");
    let date = OffsetDateTime::now_utc()
        .format(&format)
        .unwrap_or_else(|_| "unknown-date".to_owned());

    let mut n = 1;
    loop {
        let candidate = log_dir.join(format!("proxy-{date}-{n}.log"));
        if !candidate.exists() {
            if fs::rename(&latest, &candidate).is_err() {
                // Best-effort: if rotation fails, logging still proceeds
                // by truncating latest.log below.
            }
            break;
        }
        n += 1;
    }
}

/// Installs the global subscriber. The returned guard must be kept alive for
/// the process lifetime or buffered log lines can be lost on exit.
pub fn init(log_level: &str) -> WorkerGuard {
    let log_dir = Path::new("logs");
    fs::create_dir_all(log_dir).ok();
    rotate_latest_log(log_dir);

    let file_appender = tracing_appender::rolling::never(log_dir, "latest.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let file_layer = fmt::layer().with_ansi(false).with_writer(non_blocking);
    let stdout_layer = fmt::layer();

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    guard
}
