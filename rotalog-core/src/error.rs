use thiserror::Error;

/// Rejected configuration. The previous configuration stays active.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required value: {field}")]
    Missing { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("unable to read configuration from environment: {0}")]
    Env(String),
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }

    /// True when a required value was absent rather than malformed.
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_is_distinguished_from_invalid() {
        assert!(ConfigError::Missing { field: "file_name_base" }.is_missing());
        assert!(!ConfigError::invalid("max_files", "must be at least 1").is_missing());
    }

    #[test]
    fn test_display() {
        let err = ConfigError::invalid("max_file_size_kb", "must be at least 1");
        assert_eq!(
            err.to_string(),
            "invalid value for max_file_size_kb: must be at least 1"
        );
    }
}
