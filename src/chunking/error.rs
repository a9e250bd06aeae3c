//! Error types for chunk hierarchy assembly

/// Errors that invalidate an entire chunking run.
///
/// Per-document problems are deliberately not represented here: an empty
/// document yields zero chunks plus a diagnostic, and an oversized atomic
/// unit is emitted verbatim as an oversized chunk. Only problems that
/// would corrupt every document in the run are fatal.
#[derive(thiserror::Error, Debug)]
pub enum ChunkingError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Environment error: {0}")]
    Environment(String),
}

/// Result type for chunking operations
pub type Result<T> = std::result::Result<T, ChunkingError>;

impl ChunkingError {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create an environment error
    pub fn environment<S: Into<String>>(msg: S) -> Self {
        Self::Environment(msg.into())
    }

    /// Get error category for logging/monitoring
    pub fn category(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::Environment(_) => "environment",
        }
    }
}
