//! Error types for plugin option resolution.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown merge mode '{0}' (expected off, project or module)")]
    InvalidMode(String),

    #[error("unknown grouping '{0}' (expected name, directory or pattern)")]
    InvalidGrouping(String),

    #[error("grouping by pattern requires a `pattern` option")]
    MissingPattern,

    #[error("invalid module pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("failed to read merge-modules options: {0}")]
    Figment(#[source] Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(error: figment::Error) -> Self {
        Self::Figment(Box::new(error))
    }
}
