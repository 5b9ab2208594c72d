//! Logging setup for the keypad tools
//!
//! Console output goes to stderr so it never mixes with results on stdout.
//! An optional log file receives the same events without ANSI colors.

use std::fs;
use std::path::Path;

use tracing::Level;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{
    fmt::{self, format::Writer, FmtContext, FormatEvent, FormatFields},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::{Error, Result};

/// Bracketed tag and ANSI color for a level
fn level_style(level: Level) -> (&'static str, &'static str) {
    match level {
        Level::TRACE => ("[TRACE]", "\x1b[35m"),
        Level::DEBUG => ("[DEBUG]", "\x1b[34m"),
        Level::INFO => ("[INFO]", "\x1b[32m"),
        Level::WARN => ("[WARN]", "\x1b[33m"),
        Level::ERROR => ("[ERROR]", "\x1b[31m"),
    }
}

/// One line per event: `2026-10-16T09:12:44.809211Z [DEBUG] Evaluated expression expr=2+3 result=5`
pub struct BracketedLevelFormat;

impl<S, N> FormatEvent<S, N> for BracketedLevelFormat
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.6fZ");
        let (tag, color) = level_style(*event.metadata().level());
        let (open, close) = if writer.has_ansi_escapes() {
            (color, "\x1b[0m")
        } else {
            ("", "")
        };
        write!(writer, "{timestamp} {open}{tag}{close} ")?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Build the level filter: `RUST_LOG` wins, otherwise `level`
pub fn env_filter(level: &str) -> Result<EnvFilter> {
    match std::env::var("RUST_LOG") {
        Ok(env) if !env.trim().is_empty() => EnvFilter::try_new(&env)
            .map_err(|e| Error::Logging(format!("Invalid RUST_LOG '{}': {}", env, e))),
        _ => EnvFilter::try_new(level)
            .map_err(|e| Error::Logging(format!("Invalid log level '{}': {}", level, e))),
    }
}

/// Open `path` for appending through a non-blocking writer
fn file_writer(path: &Path) -> Result<(NonBlocking, WorkerGuard)> {
    let file_name = path
        .file_name()
        .ok_or_else(|| Error::Logging(format!("Invalid log file path: {}", path.display())))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    Ok(tracing_appender::non_blocking(appender))
}

/// Install the global subscriber
///
/// The returned guard flushes the log file when dropped; keep it alive for
/// the lifetime of the program.
pub fn init_logging(level: &str, file: Option<&Path>, ansi: bool) -> Result<Option<WorkerGuard>> {
    let filter = env_filter(level)?;

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(ansi)
        .event_format(BracketedLevelFormat);

    let (file_layer, guard) = match file {
        Some(path) => {
            let (writer, guard) = file_writer(path)?;
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .event_format(BracketedLevelFormat);
            (Some(layer), Some(guard))
        },
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))?;

    if let Some(path) = file {
        tracing::debug!("Logging to {}", path.display());
    }
    Ok(guard)
}
