use std::path::PathBuf;

/// Errors raised while loading or validating a [`GridConfig`](crate::GridConfig).
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration: {0}")]
    Parse(String),

    #[error("failed to serialize configuration: {0}")]
    Serialize(String),

    #[error("no configuration directory available on this platform")]
    NoConfigDir,
}

impl ConfigError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes_are_stable() {
        assert!(
            ConfigError::invalid("x")
                .to_string()
                .starts_with("invalid configuration:")
        );
        assert!(
            ConfigError::Parse("x".into())
                .to_string()
                .starts_with("failed to parse")
        );
    }

    #[test]
    fn test_read_error_names_path() {
        let err = ConfigError::Read {
            path: PathBuf::from("/tmp/grid.toml"),
            source: std::io::Error::other("boom"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/grid.toml"));
        assert!(msg.contains("boom"));
    }
}
