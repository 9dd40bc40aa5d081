use thiserror::Error;

/// Unified error type for git-vertag operations
#[derive(Error, Debug)]
pub enum VertagError {
    #[error("Invalid version syntax: {0}")]
    Syntax(String),

    #[error("Putting pre-release ID rewinds version order: {current} -> {next}")]
    OrderRewind { current: String, next: String },

    #[error("Version number overflows when incrementing {current}")]
    Overflow { current: String },

    #[error("Tag store operation failed: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in git-vertag
pub type Result<T> = std::result::Result<T, VertagError>;

impl VertagError {
    /// Create a syntax error with context
    pub fn syntax(msg: impl Into<String>) -> Self {
        VertagError::Syntax(msg.into())
    }

    /// Create a tag store error with context
    pub fn store(msg: impl Into<String>) -> Self {
        VertagError::Store(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        VertagError::Config(msg.into())
    }

    /// Whether the error comes from parsing a version string.
    ///
    /// Syntax errors are recoverable: a tag that fails to parse is simply skipped.
    pub fn is_syntax(&self) -> bool {
        matches!(self, VertagError::Syntax(_))
    }
}
