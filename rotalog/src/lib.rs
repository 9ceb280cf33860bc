//! # rotalog
//! Leveled logger writing to size-rotated files with count-based retention.
//!
//! ## Usage
//! ```toml
//! // Cargo.toml
//! ...
//! [dependencies]
//! rotalog = "0.1.0"
//! ```
//!
//! ```rust
//! use rotalog::{Level, logger_config};
//!
//! let folder = std::env::temp_dir().join("rotalog_doc_usage");
//! let logger = logger_config()
//!     .with_folder(&folder)
//!     .with_file_name_base("app")
//!     .with_level(Level::Info)
//!     .build()
//!     .expect("Unable to create logger");
//! logger.purge();
//! logger.info("Hello, world!");
//! assert!(logger.current_log_content().ends_with("Hello, world!\n"));
//! ```
//!
//! ## Rotation and retention
//! Once the current file grows past `max_file_size_kb`, the next record goes
//! to a fresh file. When `max_files` files exist, the oldest is deleted first.
//! The ordered file list is kept in `{file_name_base}_status.txt` so a restarted
//! process keeps appending to the same file.
//!
//! ```rust
//! use rotalog::{Level, MemoryStorage, logger_config};
//!
//! let logger = logger_config()
//!     .with_storage(MemoryStorage::new())
//!     .with_file_name_base("app")
//!     .with_max_files(2)
//!     .with_max_file_size_kb(1)
//!     .with_level(Level::All)
//!     .build()
//!     .unwrap();
//! for i in 0..10 {
//!     logger.debug(&format!("record {i} {}", "x".repeat(2048)));
//! }
//! assert_eq!(logger.log_files().len(), 2);
//! ```
//!
//! ## Logging through the `log` crate
//! ```rust
//! use rotalog::{Level, MemoryStorage, logger_config};
//!
//! let logger = logger_config()
//!     .with_storage(MemoryStorage::new())
//!     .with_level(Level::Info)
//!     .init_global()
//!     .expect("Unable to install logger");
//! log::info!("Hello, world!");
//! assert!(logger.current_log_content().ends_with("Hello, world!\n"));
//! ```

mod console;
mod error;

pub use console::LogStdout;
pub use error::InitError;
pub use rotalog_core::{
    ConfigError, FileStorage, Level, LogConfig, LogStorage, MemoryStorage, RotatingLog,
    UnsupportedStorage,
};

use log::Log;
use rotalog_core::{EnvConfig, platform_storage};
use std::{
    error::Error,
    path::{Path, PathBuf},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

/// Default folder used by [`logger_config`] when no storage is given.
pub const DEFAULT_FOLDER: &str = "logs";

/// Handle to a rotating log. Share it behind an `Arc` between threads.
pub struct Logger {
    log: RotatingLog<Box<dyn LogStorage>>,
    stdout: Option<LogStdout>,
    /// Set once installed as the `log` crate logger.
    global: AtomicBool,
}

impl Logger {
    fn write(&self, level: Level, message: &str, error: Option<&dyn Error>) -> bool {
        self.log.log_with(level, message, error, |record| {
            if let Some(stdout) = &self.stdout {
                stdout.regular(level, record);
            }
        })
    }

    /// Logs a debug record. Returns whether it reached storage.
    pub fn debug(&self, message: &str) -> bool {
        self.write(Level::Debug, message, None)
    }

    /// Logs an info record. Returns whether it reached storage.
    pub fn info(&self, message: &str) -> bool {
        self.write(Level::Info, message, None)
    }

    /// Logs a warning record. Returns whether it reached storage.
    pub fn warning(&self, message: &str) -> bool {
        self.write(Level::Warning, message, None)
    }

    /// Logs an error record with the error message and its source chain.
    pub fn error(&self, message: &str, error: &dyn Error) -> bool {
        self.write(Level::Error, message, Some(error))
    }

    pub fn current_log_content(&self) -> String {
        self.log.current_log_content()
    }

    pub fn all_log_content(&self) -> String {
        self.log.all_log_content()
    }

    pub fn log_content(&self, name: &str) -> String {
        self.log.log_content(name)
    }

    pub fn log_files(&self) -> Vec<String> {
        self.log.log_files()
    }

    pub fn purge(&self) -> bool {
        self.log.purge()
    }

    /// Applies new limits and level. The persisted file list is kept.
    pub fn configure(&self, config: LogConfig) -> Result<(), ConfigError> {
        let level = config.level;
        self.log.configure(config)?;
        if self.global.load(Ordering::SeqCst) {
            log::set_max_level(level.to_level_filter());
        }
        Ok(())
    }

    pub fn config(&self) -> LogConfig {
        self.log.config()
    }

    pub fn engine(&self) -> &RotatingLog<Box<dyn LogStorage>> {
        &self.log
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        Level::from(metadata.level()) >= self.log.level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        self.write(Level::from(record.level()), &record.args().to_string(), None);
    }

    fn flush(&self) {}
}

/// Forwards `log` crate records to a shared [`Logger`].
struct GlobalLogger(Arc<Logger>);

impl Log for GlobalLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.0.enabled(metadata)
    }

    fn log(&self, record: &log::Record) {
        self.0.log(record)
    }

    fn flush(&self) {}
}

/// Builder for configuring and creating a [`Logger`].
pub struct ConfigBuilder {
    folder: PathBuf,
    storage: Option<Box<dyn LogStorage>>,
    config: LogConfig,
    stdout: bool,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self {
            folder: PathBuf::from(DEFAULT_FOLDER),
            storage: None,
            config: LogConfig::default(),
            stdout: false,
        }
    }
}

impl ConfigBuilder {
    /// Starts from the `ROTALOG_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let env = EnvConfig::load()?;
        Ok(Self {
            folder: PathBuf::from(&env.FOLDER),
            config: env.log_config()?,
            ..Self::default()
        })
    }

    /// Sets the folder holding log files. Ignored when a storage is set.
    pub fn with_folder<P: AsRef<Path>>(self, folder: P) -> Self {
        Self {
            folder: folder.as_ref().to_path_buf(),
            ..self
        }
    }
    /// Sets a custom storage backend.
    pub fn with_storage<S: LogStorage + 'static>(self, storage: S) -> Self {
        Self {
            storage: Some(Box::new(storage)),
            ..self
        }
    }
    /// Sets the file name base; files are named `{base}{N}.log`.
    pub fn with_file_name_base(self, base: &str) -> Self {
        Self {
            config: LogConfig {
                file_name_base: base.into(),
                ..self.config
            },
            ..self
        }
    }
    pub fn with_max_files(self, max_files: u32) -> Self {
        Self {
            config: self.config.with_max_files(max_files),
            ..self
        }
    }
    pub fn with_max_file_size_kb(self, max_file_size_kb: u64) -> Self {
        Self {
            config: self.config.with_max_file_size_kb(max_file_size_kb),
            ..self
        }
    }
    /// Sets the minimum level of written records.
    pub fn with_level(self, level: Level) -> Self {
        Self {
            config: self.config.with_level(level),
            ..self
        }
    }
    /// Replaces naming, limits and level at once.
    pub fn with_config(self, config: LogConfig) -> Self {
        Self { config, ..self }
    }
    /// Dynamically set the stdout echo flag.
    pub fn with_stdout(self, yes: bool) -> Self {
        Self {
            stdout: yes,
            ..self
        }
    }

    /// Creates the logger, loading any file list persisted by a previous run.
    pub fn build(self) -> Result<Logger, InitError> {
        let Self {
            folder,
            storage,
            config,
            stdout,
        } = self;
        let storage = match storage {
            Some(storage) => storage,
            None => platform_storage(folder)?,
        };
        Ok(Logger {
            log: RotatingLog::new(storage, config)?,
            stdout: stdout.then_some(LogStdout),
            global: AtomicBool::new(false),
        })
    }

    /// Creates the logger and installs it as the `log` crate logger.
    /// Returns a handle for direct calls.
    pub fn init_global(self) -> Result<Arc<Logger>, InitError> {
        let logger = Arc::new(self.build()?);
        log::set_boxed_logger(Box::new(GlobalLogger(Arc::clone(&logger))))?;
        log::set_max_level(logger.log.level().to_level_filter());
        logger.global.store(true, Ordering::SeqCst);
        Ok(logger)
    }
}

/// Returns a default ConfigBuilder for configuring the logger.
pub fn logger_config() -> ConfigBuilder {
    ConfigBuilder::default()
}
