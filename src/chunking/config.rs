//! Configuration for hierarchical chunk production

use serde::{Deserialize, Serialize};

use super::error::{ChunkingError, Result};

/// Character budgets and context-window assumptions for one chunking run.
///
/// Invariant enforced by [`ChunkingConfig::validate`]:
/// `0 < overlap_size < child_size <= parent_size`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Target characters per parent chunk (broad context pieces)
    pub parent_size: usize,
    /// Target characters per child chunk (retrieval-optimized)
    pub child_size: usize,
    /// Trailing characters carried from one segment into the next
    pub overlap_size: usize,
    /// Documents shorter than this are skipped before chunking
    pub min_chunk_size: usize,
    /// Context window of the target model, in tokens
    pub model_context_window: usize,
    /// Fraction of the context window reserved for retrieved content
    pub target_context_usage: f64,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            parent_size: 1200,
            child_size: 400,
            overlap_size: 50,
            min_chunk_size: 100,
            model_context_window: 4096,
            target_context_usage: 0.70,
        }
    }
}

impl ChunkingConfig {
    /// Create configuration for a model with the given context window
    pub fn for_context_window(tokens: usize) -> Self {
        Self {
            model_context_window: tokens,
            ..Default::default()
        }
    }

    /// Load configuration from `CHUNKING_`-prefixed environment variables,
    /// falling back to defaults for anything unset
    pub fn from_env() -> Result<Self> {
        envy::prefixed("CHUNKING_")
            .from_env::<ChunkingConfig>()
            .map_err(|e| ChunkingError::environment(e.to_string()))
    }

    /// Characters available for retrieved chunk content per query
    pub fn available_context(&self) -> usize {
        (self.model_context_window as f64 * self.target_context_usage) as usize
    }

    /// Validate configuration settings
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.parent_size == 0
            || self.child_size == 0
            || self.overlap_size == 0
            || self.min_chunk_size == 0
        {
            return Err("all chunk sizes must be greater than 0".to_string());
        }

        if self.overlap_size >= self.child_size {
            return Err(format!(
                "overlap_size ({}) must be less than child_size ({})",
                self.overlap_size, self.child_size
            ));
        }

        if self.child_size > self.parent_size {
            return Err(format!(
                "child_size ({}) must not exceed parent_size ({})",
                self.child_size, self.parent_size
            ));
        }

        if self.model_context_window == 0 {
            return Err("model_context_window must be greater than 0".to_string());
        }

        if self.target_context_usage <= 0.0 || self.target_context_usage > 1.0 {
            return Err(format!(
                "target_context_usage ({}) must be within (0, 1]",
                self.target_context_usage
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ChunkingConfig::default();
        assert_eq!(config.parent_size, 1200);
        assert_eq!(config.child_size, 400);
        assert_eq!(config.overlap_size, 50);
        assert_eq!(config.min_chunk_size, 100);
        assert_eq!(config.model_context_window, 4096);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_available_context() {
        let config = ChunkingConfig::default();
        // 70% of a 4096-token window
        assert_eq!(config.available_context(), 2867);

        let large = ChunkingConfig::for_context_window(128_000);
        assert_eq!(large.available_context(), 89_600);
        assert_eq!(large.parent_size, 1200);
    }

    #[test]
    fn test_config_validation() {
        let mut config = ChunkingConfig::default();
        assert!(config.validate().is_ok());

        config.overlap_size = 400;
        assert!(config.validate().is_err());

        config.overlap_size = 50;
        config.child_size = 2000;
        assert!(config.validate().is_err());

        config.child_size = 0;
        assert!(config.validate().is_err());

        config.child_size = 400;
        assert!(config.validate().is_ok());

        config.target_context_usage = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_env_defaults() {
        // No CHUNKING_* variables are set in the test environment, so every
        // field falls back to its serde default.
        let config = ChunkingConfig::from_env().unwrap();
        assert_eq!(config, ChunkingConfig::default());
    }
}
