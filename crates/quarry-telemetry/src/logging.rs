//! Logging configuration and setup.
//!
//! A run logs to the console and, optionally, to a log file at the same
//! time. Both sinks share one level filter and one format.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, MakeWriter},
    layer::{Layered, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::error::{TelemetryError, TelemetryResult};

/// Subscriber the output layers are stacked on.
type Filtered = Layered<EnvFilter, Registry>;

/// A boxed output layer.
type Sink = Box<dyn Layer<Filtered> + Send + Sync + 'static>;

fn init_err<E: std::fmt::Display>(e: E) -> TelemetryError {
    TelemetryError::InitError(e.to_string())
}

/// File rotation strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileRotation {
    /// Rotate daily.
    Daily,
    /// Rotate hourly.
    Hourly,
    /// Never rotate; always append to `<prefix>.log`.
    #[default]
    Never,
}

impl FileRotation {
    fn rotation(self) -> Rotation {
        match self {
            Self::Daily => Rotation::DAILY,
            Self::Hourly => Rotation::HOURLY,
            Self::Never => Rotation::NEVER,
        }
    }
}

/// Log format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line human-readable format.
    Pretty,
    /// Single-line format (default).
    #[default]
    Compact,
    /// JSON lines.
    Json,
    /// Default `tracing-subscriber` format with all fields.
    Full,
}

/// Console stream for log output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogTarget {
    /// Log to stdout.
    Stdout,
    /// Log to stderr.
    #[default]
    Stderr,
    /// No console output; only the log file, if configured.
    None,
}

/// Log file configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileLogConfig {
    /// Directory to write log files to.
    #[serde(default = "default_file_directory")]
    pub directory: PathBuf,
    /// File name prefix; files are named `<prefix>.log`, with a date
    /// suffix when rotating.
    #[serde(default = "default_file_prefix")]
    pub prefix: String,
    /// Rotation strategy.
    #[serde(default)]
    pub rotation: FileRotation,
}

fn default_file_directory() -> PathBuf {
    PathBuf::from("logs")
}

fn default_file_prefix() -> String {
    "plugin_manager".to_string()
}

impl Default for FileLogConfig {
    fn default() -> Self {
        Self {
            directory: default_file_directory(),
            prefix: default_file_prefix(),
            rotation: FileRotation::default(),
        }
    }
}

impl FileLogConfig {
    /// Log file config writing to `directory` with the default prefix.
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            ..Self::default()
        }
    }

    /// Open the appender, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the file
    /// cannot be opened.
    pub fn appender(&self) -> TelemetryResult<RollingFileAppender> {
        std::fs::create_dir_all(&self.directory).map_err(|e| {
            TelemetryError::ConfigError(format!(
                "failed to create log directory {}: {e}",
                self.directory.display()
            ))
        })?;

        RollingFileAppender::builder()
            .rotation(self.rotation.rotation())
            .filename_prefix(&self.prefix)
            .filename_suffix("log")
            .build(&self.directory)
            .map_err(init_err)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    #[serde(default = "default_level")]
    pub level: String,
    /// Log format.
    #[serde(default)]
    pub format: LogFormat,
    /// Console stream.
    #[serde(default)]
    pub target: LogTarget,
    /// Log file written alongside the console output.
    #[serde(default)]
    pub file: Option<FileLogConfig>,
    /// Whether to include timestamps.
    #[serde(default = "default_true")]
    pub timestamps: bool,
    /// Whether to include file/line info.
    #[serde(default)]
    pub file_info: bool,
    /// Whether to use ANSI colors on the console.
    #[serde(default = "default_true")]
    pub ansi: bool,
    /// Directive overrides (e.g., `quarry_plugins=debug`).
    #[serde(default)]
    pub directives: Vec<String>,
}

fn default_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
            target: LogTarget::default(),
            file: None,
            timestamps: true,
            file_info: false,
            ansi: true,
            directives: Vec::new(),
        }
    }
}

impl LogConfig {
    /// Create a new log config with the specified level.
    #[must_use]
    pub fn new(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            ..Default::default()
        }
    }

    /// Set the log format.
    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the console stream.
    #[must_use]
    pub fn with_target(mut self, target: LogTarget) -> Self {
        self.target = target;
        self
    }

    /// Also write logs to a file in `directory`.
    #[must_use]
    pub fn with_file(mut self, file: FileLogConfig) -> Self {
        self.file = Some(file);
        self
    }

    /// Add a directive override.
    #[must_use]
    pub fn with_directive(mut self, directive: impl Into<String>) -> Self {
        self.directives.push(directive.into());
        self
    }

    /// Disable timestamps.
    #[must_use]
    pub fn without_timestamps(mut self) -> Self {
        self.timestamps = false;
        self
    }

    /// Enable file/line info.
    #[must_use]
    pub fn with_file_info(mut self) -> Self {
        self.file_info = true;
        self
    }

    /// Disable ANSI colors.
    #[must_use]
    pub fn without_ansi(mut self) -> Self {
        self.ansi = false;
        self
    }

    fn build_filter(&self) -> TelemetryResult<EnvFilter> {
        let mut filter = EnvFilter::try_new(&self.level)
            .map_err(|e| TelemetryError::ConfigError(e.to_string()))?;

        for directive in &self.directives {
            filter = filter.add_directive(directive.parse().map_err(
                |e: tracing_subscriber::filter::ParseError| {
                    TelemetryError::ConfigError(e.to_string())
                },
            )?);
        }

        Ok(filter)
    }

    fn sink<W>(&self, writer: W, ansi: bool) -> Sink
    where
        W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        let layer = fmt::layer()
            .with_writer(writer)
            .with_ansi(ansi)
            .with_file(self.file_info)
            .with_line_number(self.file_info);

        match (self.format, self.timestamps) {
            (LogFormat::Pretty, true) => layer.pretty().boxed(),
            (LogFormat::Pretty, false) => layer.pretty().without_time().boxed(),
            (LogFormat::Compact, true) => layer.compact().boxed(),
            (LogFormat::Compact, false) => layer.compact().without_time().boxed(),
            (LogFormat::Json, true) => layer.json().boxed(),
            (LogFormat::Json, false) => layer.json().without_time().boxed(),
            (LogFormat::Full, true) => layer.boxed(),
            (LogFormat::Full, false) => layer.without_time().boxed(),
        }
    }

    fn sinks(&self) -> TelemetryResult<Vec<Sink>> {
        let mut sinks = Vec::with_capacity(2);
        match self.target {
            LogTarget::Stdout => sinks.push(self.sink(std::io::stdout, self.ansi)),
            LogTarget::Stderr => sinks.push(self.sink(std::io::stderr, self.ansi)),
            LogTarget::None => {},
        }
        if let Some(file) = &self.file {
            sinks.push(self.sink(file.appender()?, false));
        }
        if sinks.is_empty() {
            return Err(TelemetryError::ConfigError(
                "no log output configured: console target is none and no file is set".to_string(),
            ));
        }
        Ok(sinks)
    }
}

/// Set up logging with the given configuration.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the log file cannot be
/// opened, or a global subscriber is already installed.
pub fn setup_logging(config: &LogConfig) -> TelemetryResult<()> {
    let filter = config.build_filter()?;
    let sinks = config.sinks()?;

    tracing_subscriber::registry()
        .with(filter)
        .with(sinks)
        .try_init()
        .map_err(init_err)
}

/// Set up default logging (info level, stderr, compact format).
///
/// # Errors
///
/// Returns an error if logging cannot be initialized.
pub fn setup_default_logging() -> TelemetryResult<()> {
    setup_logging(&LogConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_log_config_default() {
        let config = LogConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.format, LogFormat::Compact);
        assert_eq!(config.target, LogTarget::Stderr);
        assert!(config.file.is_none());
        assert!(config.timestamps);
    }

    #[test]
    fn test_log_config_builder() {
        let config = LogConfig::new("debug")
            .with_format(LogFormat::Json)
            .with_target(LogTarget::Stdout)
            .without_timestamps()
            .with_file_info()
            .with_directive("quarry_plugins=trace");

        assert_eq!(config.level, "debug");
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.target, LogTarget::Stdout);
        assert!(!config.timestamps);
        assert!(config.file_info);
        assert_eq!(config.directives, vec!["quarry_plugins=trace"]);
    }

    #[test]
    fn test_log_config_from_toml() {
        let config: LogConfig = toml::from_str(
            r#"
            level = "warn"
            format = "pretty"
            target = "stdout"

            [file]
            directory = "var/log"
            "#,
        )
        .unwrap();

        assert_eq!(config.level, "warn");
        assert_eq!(config.format, LogFormat::Pretty);
        assert_eq!(config.target, LogTarget::Stdout);
        let file = config.file.unwrap();
        assert_eq!(file.directory, PathBuf::from("var/log"));
        assert_eq!(file.prefix, "plugin_manager");
        assert_eq!(file.rotation, FileRotation::Never);
    }

    #[test]
    fn test_log_config_serialization() {
        let config = LogConfig::new("warn").with_format(LogFormat::Compact);

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"level\":\"warn\""));
        assert!(json.contains("\"format\":\"compact\""));

        let parsed: LogConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_build_filter() {
        let config = LogConfig::new("debug").with_directive("quarry=trace");
        assert!(config.build_filter().is_ok());
    }

    #[test]
    fn test_build_filter_invalid() {
        let config = LogConfig::new("debug").with_directive("[invalid=syntax");
        assert!(config.build_filter().is_err());
    }

    #[test]
    fn test_file_appender_creates_log_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = FileLogConfig::new(temp_dir.path().join("logs"));

        let _appender = file.appender().unwrap();

        assert!(temp_dir.path().join("logs").join("plugin_manager.log").exists());
    }

    #[test]
    fn test_sinks_console_and_file() {
        let temp_dir = TempDir::new().unwrap();
        let config = LogConfig::default().with_file(FileLogConfig::new(temp_dir.path()));
        assert_eq!(config.sinks().unwrap().len(), 2);
    }

    #[test]
    fn test_sinks_none_configured() {
        let config = LogConfig::default().with_target(LogTarget::None);
        assert!(matches!(config.sinks(), Err(TelemetryError::ConfigError(_))));
    }
}
