// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Engine configuration.
//!
//! This module defines the [`EngineConfig`] struct, which carries the options
//! handed to the inference engine when a model is imported.

/// Options applied when importing a model.
///
/// # Example
///
/// ```rust
/// use benchmark_app::EngineConfig;
///
/// let config = EngineConfig::new()
///     .with_threads(4)
///     .with_parallel_execution(true);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineConfig {
    /// Number of intra-op threads.
    /// Setting this to `0` allows the engine to choose the optimal number.
    pub num_threads: usize,
    /// Run independent graph branches in parallel. Favours throughput over latency.
    pub parallel_execution: bool,
}

impl EngineConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of threads for inference.
    ///
    /// # Arguments
    ///
    /// * `threads` - The number of intra-op threads. Set to `0` for auto-configuration.
    #[must_use]
    pub const fn with_threads(mut self, threads: usize) -> Self {
        self.num_threads = threads;
        self
    }

    /// Enable or disable parallel execution of independent graph branches.
    #[must_use]
    pub const fn with_parallel_execution(mut self, enabled: bool) -> Self {
        self.parallel_execution = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = EngineConfig::default();
        assert_eq!(config.num_threads, 0);
        assert!(!config.parallel_execution);
    }

    #[test]
    fn test_config_builder() {
        let config = EngineConfig::new().with_threads(8).with_parallel_execution(true);
        assert_eq!(config.num_threads, 8);
        assert!(config.parallel_execution);
    }
}
