use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Keeps the background log writer alive; drop it last.
pub struct FileLogGuard {
    _guard: WorkerGuard,
}

fn env_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Log to stderr, leaving stdout for command output.
pub fn init_stderr(filter: &str) {
    tracing_subscriber::registry()
        .with(env_filter(filter))
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}

/// Log to `<dir>/chairside.log`, for when the terminal belongs to the TUI.
pub fn init_file(dir: &Path, filter: &str) -> FileLogGuard {
    let appender = tracing_appender::rolling::never(dir, "chairside.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(env_filter(filter))
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    FileLogGuard { _guard: guard }
}
