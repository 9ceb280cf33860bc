//! # rotalog-core
//! Core of rotalog - a leveled text log spread over size-rotated files.
//!
//! [`RotatingLog`] appends records to the newest file of an ordered list,
//! starts a new file once the current one grows past the size limit and
//! deletes the oldest file once the list is full. The list is persisted next
//! to the logs so it survives restarts. Storage is injected through
//! [`LogStorage`].
//!
//! ```rust
//! use rotalog_core::{Level, LogConfig, MemoryStorage, RotatingLog};
//!
//! let log = RotatingLog::new(
//!     MemoryStorage::new(),
//!     LogConfig::new("app").with_level(Level::Info),
//! )
//! .unwrap();
//! log.info("Hello, world!");
//! assert_eq!(log.log_files(), vec!["app1.log"]);
//! assert!(log.current_log_content().ends_with("Hello, world!\n"));
//! ```

mod config;
mod error;
mod level;
mod log_rotation;
mod storage;
mod utils;

pub use config::{
    DEFAULT_FILE_NAME_BASE, DEFAULT_MAX_FILE_SIZE_KB, DEFAULT_MAX_FILES, EnvConfig, LogConfig,
    SEPARATOR,
};
pub use error::ConfigError;
pub use level::Level;
pub use log_rotation::RotatingLog;
pub use storage::{
    FileStorage, LogStorage, MAX_NAME_PROBES, MemoryStorage, UnsupportedStorage, platform_storage,
};
pub use utils::{error_trace, format_record};
