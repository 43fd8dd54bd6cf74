//! Logging bootstrap for programs embedding the frame loader.
//!
//! Library code only emits `tracing` events. Binaries and notebooks driving a batch ingest call
//! [`init`] once to install an env-filtered subscriber with a rolling file sink and a stderr
//! console layer. Later calls return the handle installed by the first one.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::SystemTime;

use anyhow::{Context, Result, anyhow};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{Builder as RollingBuilder, Rotation};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, filter::LevelFilter, util::SubscriberInitExt};

/// Environment variables consulted for a filter directive, in priority order.
const FILTER_VARS: [&str; 2] = ["FRAMESET_LOG", "RUST_LOG"];

static LOG_HANDLE: OnceLock<LogHandle> = OnceLock::new();

pub use tracing_subscriber::filter::LevelFilter as LogLevel;

/// How often the file sink starts a new log file.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum LogRolling {
    Hourly,
    Daily,
    /// Single append-only file.
    Never,
}

impl From<LogRolling> for Rotation {
    fn from(rolling: LogRolling) -> Self {
        match rolling {
            LogRolling::Hourly => Rotation::HOURLY,
            LogRolling::Daily => Rotation::DAILY,
            LogRolling::Never => Rotation::NEVER,
        }
    }
}

/// Settings for [`init`].
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Directory holding the rolling log files.
    pub directory: PathBuf,
    /// File name prefix; files end in `.log`.
    pub file_prefix: String,
    /// Number of log files kept after pruning. `None` keeps everything.
    pub retention: Option<usize>,
    pub file_level: LevelFilter,
    pub console_level: LevelFilter,
    /// Forward records from the `log` facade into `tracing`.
    pub capture_log: bool,
    /// Filter directive such as `frameset_core=debug,fs::locator=trace`. Falls back to the
    /// `FRAMESET_LOG` and `RUST_LOG` environment variables.
    pub env_filter: Option<String>,
    pub rolling: LogRolling,
}

impl Default for LogConfig {
    fn default() -> Self {
        // Batch ingests are chatty at debug level; keep the console quiet in release builds.
        let console_level =
            if cfg!(debug_assertions) { LevelFilter::INFO } else { LevelFilter::WARN };

        Self {
            directory: default_log_directory(),
            file_prefix: "frameset".to_string(),
            retention: Some(7),
            file_level: LevelFilter::DEBUG,
            console_level,
            capture_log: true,
            env_filter: directive_from_env(),
            rolling: LogRolling::Daily,
        }
    }
}

impl LogConfig {
    pub fn with_directory<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.directory = path.into();
        self
    }

    pub fn with_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.file_prefix = prefix.into();
        self
    }

    /// Override the console threshold, e.g. `LogLevel::DEBUG` while tuning a channel token.
    pub fn with_console_level(mut self, level: LevelFilter) -> Self {
        self.console_level = level;
        self
    }
}

/// Keeps the background file writer alive for the lifetime of the process.
#[derive(Debug)]
pub struct LogHandle {
    _guard: WorkerGuard,
    directory: PathBuf,
    file_prefix: String,
}

impl LogHandle {
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn file_prefix(&self) -> &str {
        &self.file_prefix
    }
}

/// Install the global subscriber.
///
/// The first invocation wins. Later calls ignore their configuration and return the handle
/// installed by the first call.
pub fn init(config: LogConfig) -> Result<&'static LogHandle> {
    if let Some(handle) = LOG_HANDLE.get() {
        return Ok(handle);
    }

    let handle = install(config)?;
    let _ = LOG_HANDLE.set(handle);
    Ok(LOG_HANDLE.get().expect("log handle initialised"))
}

fn install(config: LogConfig) -> Result<LogHandle> {
    let LogConfig {
        directory,
        file_prefix,
        retention,
        file_level,
        console_level,
        capture_log,
        env_filter,
        rolling,
    } = config;

    if capture_log {
        capture_log_records(file_level.max(console_level));
    }

    fs::create_dir_all(&directory)
        .with_context(|| format!("creating log directory at {}", directory.display()))?;

    if let Some(keep) = retention.filter(|keep| *keep > 0) {
        prune_old_logs(&directory, &file_prefix, keep).context("applying log retention")?;
    }

    let appender = RollingBuilder::new()
        .rotation(rolling.into())
        .filename_prefix(&file_prefix)
        .filename_suffix("log")
        .build(&directory)
        .context("creating rolling log appender")?;
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    let directive = env_filter.or_else(directive_from_env).unwrap_or_else(|| {
        if cfg!(debug_assertions) { "debug" } else { "info" }.to_string()
    });
    let filter = EnvFilter::try_new(&directive)
        .with_context(|| format!("parsing filter directive {directive:?}"))?;

    let file_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(file_writer)
        .with_file(true)
        .with_line_number(true)
        .with_filter(file_level);

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(console_level);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|err| anyhow!(err))?;

    Ok(LogHandle { _guard: guard, directory, file_prefix })
}

fn directive_from_env() -> Option<String> {
    FILTER_VARS
        .iter()
        .find_map(|var| std::env::var(var).ok())
        .filter(|directive| !directive.trim().is_empty())
}

fn capture_log_records(level: LevelFilter) {
    let level = match level {
        LevelFilter::OFF => log::LevelFilter::Off,
        LevelFilter::ERROR => log::LevelFilter::Error,
        LevelFilter::WARN => log::LevelFilter::Warn,
        LevelFilter::INFO => log::LevelFilter::Info,
        LevelFilter::DEBUG => log::LevelFilter::Debug,
        LevelFilter::TRACE => log::LevelFilter::Trace,
    };

    // Fails only when another logger already owns the `log` facade.
    let _ = tracing_log::LogTracer::builder().with_max_level(level).init();
}

/// Delete the oldest `<prefix>*` files so at most `keep` remain.
fn prune_old_logs(dir: &Path, prefix: &str, keep: usize) -> Result<()> {
    let mut logs: Vec<(SystemTime, PathBuf)> = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let Ok(entry) = entry else { continue };
        let Ok(meta) = entry.metadata() else { continue };
        let path = entry.path();
        if meta.is_file() && has_prefix(&path, prefix) {
            logs.push((meta.modified().unwrap_or(SystemTime::UNIX_EPOCH), path));
        }
    }

    if logs.len() <= keep {
        return Ok(());
    }

    logs.sort();
    let excess = logs.len() - keep;
    for (_, path) in logs.drain(..excess) {
        let _ = fs::remove_file(&path);
    }

    Ok(())
}

fn has_prefix(path: &Path, prefix: &str) -> bool {
    path.file_stem().and_then(OsStr::to_str).is_some_and(|stem| stem.starts_with(prefix))
}

fn default_log_directory() -> PathBuf {
    match directories::ProjectDirs::from("org", "Frameset", "frameset") {
        Some(dirs) => dirs.cache_dir().join("logs"),
        None => std::env::temp_dir().join("frameset-logs"),
    }
}
