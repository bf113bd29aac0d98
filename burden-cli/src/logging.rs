//! Log output for the `burden` binary.
//!
//! The subscriber is built once from the command line: a level filter, an
//! optional stderr layer and an optional append-mode file layer. Reports go
//! to stdout, so logs never mix with them.

use std::fmt;
use std::fs::File;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{Event, Level, Subscriber, error};
use tracing_subscriber::{
    EnvFilter,
    fmt::{
        FmtContext,
        format::{FormatEvent, FormatFields, Writer},
    },
    layer::SubscriberExt,
    registry::LookupSpan,
};

/// Filter used when neither `--log-level` nor `RUST_LOG` is given.
const DEFAULT_FILTER: &str = "warn";

/// Where and how much to log, as chosen on the command line.
#[derive(Debug, Clone, Default)]
pub struct LogSettings {
    /// EnvFilter directive; falls back to `RUST_LOG`, then [`DEFAULT_FILTER`].
    pub level: Option<String>,
    /// File to append log lines to.
    pub file: Option<PathBuf>,
    /// Drop the stderr layer.
    pub quiet: bool,
}

/// `HH:MM:SS.mmm LEVEL target: fields`, with the level coloured on a terminal.
struct LineFormat;

impl LineFormat {
    fn level_color(level: Level) -> &'static str {
        match level {
            Level::ERROR => "31",
            Level::WARN => "33",
            Level::INFO => "32",
            Level::DEBUG => "34",
            Level::TRACE => "35",
        }
    }
}

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();
        let time = Local::now().format("%H:%M:%S%.3f");

        if writer.has_ansi_escapes() {
            let color = Self::level_color(*meta.level());
            write!(writer, "{time} \x1b[1;{color}m{:>5}\x1b[0m ", meta.level())?;
        } else {
            write!(writer, "{time} {:>5} ", meta.level())?;
        }
        write!(writer, "{}: ", meta.target())?;

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn make_filter(level: Option<&str>) -> Result<EnvFilter> {
    match level {
        Some(level) => {
            EnvFilter::try_new(level).with_context(|| format!("Invalid log level '{level}'"))
        }
        None => Ok(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))),
    }
}

fn open_log_file(path: &Path) -> Result<File> {
    File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Cannot open log file: {}", path.display()))
}

/// Builds the subscriber described by `settings` without installing it.
fn build_subscriber(settings: &LogSettings) -> Result<impl Subscriber + Send + Sync + 'static> {
    let filter = make_filter(settings.level.as_deref())?;

    let console = (!settings.quiet).then(|| {
        tracing_subscriber::fmt::layer()
            .event_format(LineFormat)
            .with_ansi(io::stderr().is_terminal())
            .with_writer(io::stderr)
    });

    let file = match &settings.file {
        Some(path) => Some(
            tracing_subscriber::fmt::layer()
                .event_format(LineFormat)
                .with_ansi(false)
                .with_writer(Mutex::new(open_log_file(path)?)),
        ),
        None => None,
    };

    Ok(tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file))
}

/// Installs the global subscriber. Call once at startup.
pub fn init_logging(settings: &LogSettings) -> Result<()> {
    tracing::subscriber::set_global_default(build_subscriber(settings)?)
        .context("Logging is already initialized")
}

/// Logs a failed command with its full context chain before exit.
pub fn log_command_error(
    command: &'static str,
    error: &anyhow::Error,
) {
    error!(command, error = %format!("{error:#}"), "command failed");
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tracing::{info, warn};

    use super::*;

    fn file_settings(
        path: &Path,
        level: &str,
    ) -> LogSettings {
        LogSettings {
            level: Some(level.to_string()),
            file: Some(path.to_path_buf()),
            quiet: true,
        }
    }

    #[test]
    fn make_filter_rejects_invalid_level() {
        let err = make_filter(Some("burden_core=loud")).unwrap_err();

        assert!(err.to_string().contains("Invalid log level"));
    }

    #[test]
    fn file_layer_writes_formatted_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("burden.log");
        let subscriber = build_subscriber(&file_settings(&path, "info")).unwrap();

        tracing::subscriber::with_default(subscriber, || {
            warn!(rows = 3, "Batch had problems");
        });

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains(" WARN "), "unexpected log: {contents}");
        assert!(contents.contains("Batch had problems rows=3"));
        assert!(!contents.contains("\x1b["));
    }

    #[test]
    fn file_layer_respects_level() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("burden.log");
        let subscriber = build_subscriber(&file_settings(&path, "warn")).unwrap();

        tracing::subscriber::with_default(subscriber, || {
            info!("Computing reports");
        });

        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn file_logging_appends_to_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("burden.log");
        fs::write(&path, "earlier line\n").unwrap();
        let subscriber = build_subscriber(&file_settings(&path, "info")).unwrap();

        tracing::subscriber::with_default(subscriber, || {
            info!("Loaded rates");
        });

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("earlier line\n"));
        assert!(contents.contains("Loaded rates"));
    }

    #[test]
    fn build_subscriber_reports_unopenable_log_file() {
        let settings = file_settings(Path::new("/nonexistent/dir/burden.log"), "info");

        let err = build_subscriber(&settings).err().unwrap();

        assert!(err.to_string().contains("Cannot open log file"));
    }
}
