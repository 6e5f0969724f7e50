//! Structured logging bootstrap for art hosts.
//!
//! Installs one global `tracing` subscriber with console output, optional rolling log
//! files and `RUST_LOG`-style filtering. Configure it with [`LoggerBuilder`] or map the
//! `logging` section of the framework settings through [`Logger::from_settings`].
//!
//! ```rust
//! # use art_logger::{LevelFilter, Logger};
//! let logger = Logger::builder().name("art-host").level(LevelFilter::DEBUG).init();
//! assert!(logger.is_ok());
//! ```

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use art_domain::settings::LoggingSettings;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const DEFAULT_NAME: &str = "art";
const DEFAULT_MAX_FILES: usize = 7;
const LOG_FILE_SUFFIX: &str = "log";

/// Configures and installs the global subscriber.
#[derive(Debug, Clone)]
#[must_use = "The builder does nothing until `init` is called."]
pub struct LoggerBuilder {
    name: String,
    level: LevelFilter,
    env_filter: Option<String>,
    console: bool,
    json: bool,
    directory: Option<PathBuf>,
    rotation: Rotation,
    max_files: usize,
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_owned(),
            level: LevelFilter::INFO,
            env_filter: None,
            console: true,
            json: false,
            directory: None,
            rotation: Rotation::DAILY,
            max_files: DEFAULT_MAX_FILES,
        }
    }
}

impl LoggerBuilder {
    /// Starts from the `logging` section of the framework settings.
    ///
    /// # Errors
    /// [`LoggerError::InvalidConfiguration`] if `settings.level` is not a level name.
    pub fn from_settings(settings: &LoggingSettings) -> Result<Self, LoggerError> {
        let level = LevelFilter::from_str(&settings.level).map_err(|e| {
            LoggerError::InvalidConfiguration {
                message: format!("Unknown log level '{}': {e}", settings.level).into(),
                context: Some("logging.level".into()),
            }
        })?;

        let builder = Self::default().level(level).json(settings.json);
        Ok(match &settings.directory {
            Some(directory) => builder.directory(directory),
            None => builder,
        })
    }

    /// Identifies the process in file names (`<name>.<date>.log`).
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    /// Module directives such as `art_kernel=debug,art_scheduler=trace`. Takes
    /// precedence over `RUST_LOG`.
    pub fn env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    pub const fn console(mut self, enabled: bool) -> Self {
        self.console = enabled;
        self
    }

    /// Emit JSON lines instead of the compact text format.
    pub const fn json(mut self, enabled: bool) -> Self {
        self.json = enabled;
        self
    }

    /// Also write rolling log files into `directory`.
    pub fn directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = Some(directory.into());
        self
    }

    pub const fn rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    pub const fn max_files(mut self, max: usize) -> Self {
        self.max_files = max;
        self
    }

    /// Installs the global subscriber.
    ///
    /// Keep the returned [`Logger`] alive for as long as the process logs; dropping it
    /// stops the background file writer.
    ///
    /// # Errors
    /// - [`LoggerError::InvalidConfiguration`] for an empty name, zero `max_files`, an
    ///   unparsable env filter or when neither console nor file output is enabled.
    /// - [`LoggerError::Appender`] / [`LoggerError::Internal`] if the log directory
    ///   cannot be prepared.
    /// - [`LoggerError::Subscriber`] if a global subscriber is already installed.
    pub fn init(self) -> Result<Logger, LoggerError> {
        self.validate()?;
        let filter = self.build_env_filter()?;

        let mut layers = Vec::new();
        if self.console {
            let console = layer().with_ansi(true);
            layers.push(if self.json { console.json().boxed() } else { console.compact().boxed() });
        }

        let guard = match &self.directory {
            Some(directory) => {
                let (writer, guard) = tracing_appender::non_blocking(self.appender(directory)?);
                let file = layer().with_writer(writer).with_ansi(false);
                layers.push(if self.json { file.json().boxed() } else { file.boxed() });
                Some(guard)
            }
            None => None,
        };

        tracing_subscriber::registry()
            .with(filter)
            .with(layers)
            .try_init()
            .context(format!("Installing logger '{}'", self.name))?;

        tracing::debug!(name = %self.name, level = %self.level, json = self.json, "Logger installed");
        Ok(Logger { guard, directory: self.directory })
    }

    fn validate(&self) -> Result<(), LoggerError> {
        let problem = if self.name.trim().is_empty() {
            "Logger name cannot be empty"
        } else if self.max_files == 0 {
            "max_files must be greater than zero"
        } else if !self.console && self.directory.is_none() {
            "No output enabled; enable the console or set a log directory"
        } else {
            return Ok(());
        };
        Err(LoggerError::InvalidConfiguration { message: problem.into(), context: None })
    }

    fn build_env_filter(&self) -> Result<EnvFilter, LoggerError> {
        let builder = EnvFilter::builder().with_default_directive(self.level.into());
        match &self.env_filter {
            Some(filter) => builder.parse(filter).map_err(|e| LoggerError::InvalidConfiguration {
                message: format!("Invalid env filter '{filter}': {e}").into(),
                context: None,
            }),
            None => Ok(builder.from_env_lossy()),
        }
    }

    fn appender(&self, directory: &Path) -> Result<RollingFileAppender, LoggerError> {
        fs::create_dir_all(directory)
            .context(format!("Creating log directory {}", directory.display()))?;

        Ok(RollingFileAppender::builder()
            .rotation(self.rotation.clone())
            .filename_prefix(&self.name)
            .filename_suffix(LOG_FILE_SUFFIX)
            .max_log_files(self.max_files)
            .build(directory)?)
    }
}

/// Handle to the installed logging system.
#[must_use = "Dropping this handle stops the background log writer."]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
    directory: Option<PathBuf>,
}

impl Logger {
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::default()
    }

    /// Installs a logger named `name` configured from the framework's logging settings.
    ///
    /// # Errors
    /// See [`LoggerBuilder::from_settings`] and [`LoggerBuilder::init`].
    pub fn from_settings(
        name: impl Into<String>,
        settings: &LoggingSettings,
    ) -> Result<Self, LoggerError> {
        LoggerBuilder::from_settings(settings)?.name(name).init()
    }

    /// Guard of the non-blocking file writer, present only with file output.
    #[must_use]
    pub const fn guard(&self) -> Option<&WorkerGuard> {
        self.guard.as_ref()
    }

    #[must_use]
    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::info!("Logging system shutting down, flushing buffers...");
        }
    }
}
