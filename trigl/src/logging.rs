use std::path::PathBuf;

use color_eyre::Report;
use directories::ProjectDirs;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{Layer, filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Configuration for the logging system
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Log level for file output
    pub file_level: Level,
    /// Log level for console output
    pub console_level: Level,
    /// Directory where log files should be written
    pub log_dir: Option<PathBuf>,
    /// Whether to enable JSON formatted logs for structured output
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file_level: Level::DEBUG,
            console_level: Level::WARN,
            log_dir: Some(Self::default_log_dir()),
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// Get the OS-appropriate default log directory
    pub fn default_log_dir() -> PathBuf {
        match ProjectDirs::from("", "", "trigl") {
            // On Linux: ~/.cache/trigl
            Some(proj_dirs) => proj_dirs.cache_dir().to_path_buf(),
            None => PathBuf::from("trigl-logs"),
        }
    }

    /// Create logging configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create logging configuration from any `TRIGL_*` variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let level = |key: &str| lookup(key).and_then(|v| v.parse::<Level>().ok());

        if let Some(parsed_level) = level("TRIGL_LOG_LEVEL") {
            config.file_level = parsed_level;
            config.console_level = parsed_level;
        }

        if let Some(parsed_level) = level("TRIGL_FILE_LOG_LEVEL") {
            config.file_level = parsed_level;
        }

        if let Some(parsed_level) = level("TRIGL_CONSOLE_LOG_LEVEL") {
            config.console_level = parsed_level;
        }

        if let Some(log_dir) = lookup("TRIGL_LOG_DIR") {
            config.log_dir = Some(PathBuf::from(log_dir));
        }

        // Disable file logging if requested
        if lookup("TRIGL_NO_FILE_LOGS").is_some() {
            config.log_dir = None;
        }

        if lookup("TRIGL_JSON_LOGS").is_some() {
            config.json_format = true;
        }

        config
    }

    /// Console level from the command line wins over the environment
    #[must_use]
    pub fn with_console_level(mut self, level: Option<Level>) -> Self {
        if let Some(level) = level {
            self.console_level = level;
        }
        self
    }
}

/// Initialize the logging system with the given configuration.
///
/// The returned guard flushes the file writer when dropped and must be
/// kept alive for the lifetime of the program. A log directory that cannot
/// be created only disables the file layer.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>, Report> {
    let mut layers = vec![];
    let mut guard = None;
    let mut log_dir_error = None;

    let usable_log_dir = config
        .log_dir
        .as_ref()
        .filter(|log_dir| match std::fs::create_dir_all(log_dir) {
            Ok(()) => true,
            Err(e) => {
                log_dir_error = Some(e);
                false
            },
        });

    if let Some(log_dir) = usable_log_dir {
        let file_appender = tracing_appender::rolling::daily(log_dir, "trigl.log");
        let (non_blocking, file_guard) = tracing_appender::non_blocking(file_appender);
        guard = Some(file_guard);

        let file_filter = EnvFilter::builder()
            .with_default_directive(config.file_level.into())
            .from_env_lossy();

        let file_layer = if config.json_format {
            fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(file_filter)
                .boxed()
        } else {
            fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking)
                .with_filter(file_filter)
                .boxed()
        };

        layers.push(file_layer);
    }

    let console_filter = EnvFilter::builder()
        .with_default_directive(config.console_level.into())
        .from_env_lossy();

    let console_layer = fmt::layer()
        .with_target(false) // Hide module paths for cleaner console output
        .with_writer(std::io::stderr)
        .with_filter(console_filter)
        .boxed();

    layers.push(console_layer);

    tracing_subscriber::registry().with(layers).try_init()?;

    if let (Some(log_dir), Some(e)) = (&config.log_dir, log_dir_error) {
        tracing::warn!(
            log_dir = %log_dir.display(),
            error = %e,
            "cannot create log directory, file logging disabled"
        );
    }

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> LoggingConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        LoggingConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_no_overrides_keeps_defaults() {
        assert_eq!(config_from(&[]), LoggingConfig::default());
    }

    #[test]
    fn test_specific_levels_override_shared_level() {
        let config = config_from(&[
            ("TRIGL_LOG_LEVEL", "info"),
            ("TRIGL_CONSOLE_LOG_LEVEL", "error"),
        ]);
        assert_eq!(config.file_level, Level::INFO);
        assert_eq!(config.console_level, Level::ERROR);
    }

    #[test]
    fn test_unparseable_level_is_ignored() {
        let config = config_from(&[("TRIGL_LOG_LEVEL", "loud")]);
        assert_eq!(config.console_level, Level::WARN);
    }

    #[test]
    fn test_no_file_logs_wins_over_log_dir() {
        let config = config_from(&[
            ("TRIGL_LOG_DIR", "/tmp/trigl"),
            ("TRIGL_NO_FILE_LOGS", "1"),
            ("TRIGL_JSON_LOGS", "1"),
        ]);
        assert_eq!(config.log_dir, None);
        assert!(config.json_format);

        let config = config_from(&[("TRIGL_LOG_DIR", "/tmp/trigl")]);
        assert_eq!(config.log_dir, Some(PathBuf::from("/tmp/trigl")));
    }

    // Installs the global subscriber; the only test in this binary that does.
    #[test]
    fn test_unusable_log_dir_disables_file_logging() {
        let blocker = std::env::temp_dir()
            .join(format!("trigl-log-blocker-{}", std::process::id()));
        std::fs::write(&blocker, b"not a directory").unwrap();

        let config = LoggingConfig {
            log_dir: Some(blocker.join("logs")),
            ..LoggingConfig::default()
        };
        let guard = init_logging(&config);
        std::fs::remove_file(&blocker).unwrap();

        assert!(guard.is_ok(), "{:?}", guard.as_ref().err());
        assert!(guard.unwrap().is_none());
    }

    #[test]
    fn test_cli_console_level() {
        let config = LoggingConfig::default().with_console_level(Some(Level::TRACE));
        assert_eq!(config.console_level, Level::TRACE);

        let config = LoggingConfig::default().with_console_level(None);
        assert_eq!(config.console_level, Level::WARN);
    }
}
