use derive_from_env::FromEnv;

use crate::{ConfigError, Level};

/// Separator used in the persisted file list.
pub const SEPARATOR: char = ';';

pub const DEFAULT_FILE_NAME_BASE: &str = "app_events";
pub const DEFAULT_MAX_FILES: u32 = 3;
pub const DEFAULT_MAX_FILE_SIZE_KB: u64 = 100;

/// Settings read from `ROTALOG_*` environment variables.
#[derive(FromEnv)]
#[from_env(prefix = "ROTALOG")]
#[allow(non_snake_case)]
pub struct EnvConfig {
    #[from_env(default = "logs")]
    pub FOLDER: String,
    #[from_env(default = "app_events")]
    pub FILE_NAME_BASE: String,
    #[from_env(default = "3")]
    pub MAX_FILES: u32,
    #[from_env(default = "100")]
    pub MAX_FILE_SIZE_KB: u64,
    #[from_env(default = "warning")]
    pub LEVEL: String,
}

impl EnvConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_env().map_err(|e| ConfigError::Env(format!("{e:?}")))
    }

    /// Converts the raw environment values into a validated [`LogConfig`].
    pub fn log_config(&self) -> Result<LogConfig, ConfigError> {
        let config = LogConfig::new(self.FILE_NAME_BASE.as_str())
            .with_max_files(self.MAX_FILES)
            .with_max_file_size_kb(self.MAX_FILE_SIZE_KB)
            .with_level(self.LEVEL.parse()?);
        config.validate()?;
        Ok(config)
    }
}

/// Limits and naming of a rotating log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub file_name_base: String,
    pub max_files: u32,
    pub max_file_size_kb: u64,
    pub level: Level,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::new(DEFAULT_FILE_NAME_BASE)
    }
}

impl LogConfig {
    pub fn new(file_name_base: impl Into<String>) -> Self {
        Self {
            file_name_base: file_name_base.into(),
            max_files: DEFAULT_MAX_FILES,
            max_file_size_kb: DEFAULT_MAX_FILE_SIZE_KB,
            level: Level::Warning,
        }
    }

    pub fn with_max_files(self, max_files: u32) -> Self {
        Self { max_files, ..self }
    }

    pub fn with_max_file_size_kb(self, max_file_size_kb: u64) -> Self {
        Self {
            max_file_size_kb,
            ..self
        }
    }

    pub fn with_level(self, level: Level) -> Self {
        Self { level, ..self }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_files < 1 {
            return Err(ConfigError::invalid("max_files", "must be at least 1"));
        }
        if self.max_file_size_kb < 1 {
            return Err(ConfigError::invalid(
                "max_file_size_kb",
                "must be at least 1",
            ));
        }
        if self.file_name_base.is_empty() {
            return Err(ConfigError::Missing {
                field: "file_name_base",
            });
        }
        if self.file_name_base.contains(SEPARATOR) {
            return Err(ConfigError::invalid(
                "file_name_base",
                format!("{SEPARATOR:?} is not allowed"),
            ));
        }
        Ok(())
    }

    /// Name of the record holding the persisted file list.
    pub fn status_file_name(&self) -> String {
        format!("{}_status.txt", self.file_name_base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LogConfig::new("app");
        assert_eq!(config.max_files, 3);
        assert_eq!(config.max_file_size_kb, 100);
        assert_eq!(config.level, Level::Warning);
        assert!(config.validate().is_ok());
        assert_eq!(LogConfig::default().file_name_base, "app_events");
    }

    #[test]
    fn test_validation() {
        let err = LogConfig::new("").validate().unwrap_err();
        assert!(err.is_missing());

        let err = LogConfig::new("a;b").validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "file_name_base",
                ..
            }
        ));

        let err = LogConfig::new("app").with_max_files(0).validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "max_files", .. }));

        let err = LogConfig::new("app")
            .with_max_file_size_kb(0)
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "max_file_size_kb",
                ..
            }
        ));
    }

    #[test]
    fn test_status_file_name() {
        assert_eq!(LogConfig::new("app").status_file_name(), "app_status.txt");
    }

    #[test]
    fn test_env_config_to_log_config() {
        let env = EnvConfig {
            FOLDER: "logs".into(),
            FILE_NAME_BASE: "svc".into(),
            MAX_FILES: 5,
            MAX_FILE_SIZE_KB: 10,
            LEVEL: "info".into(),
        };
        let config = env.log_config().unwrap();
        assert_eq!(
            config,
            LogConfig::new("svc")
                .with_max_files(5)
                .with_max_file_size_kb(10)
                .with_level(Level::Info)
        );

        let env = EnvConfig {
            LEVEL: "loud".into(),
            ..env
        };
        assert!(env.log_config().is_err());
    }
}
