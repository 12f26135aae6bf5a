//! Configuration for duplicate resolution.

use std::num::NonZeroUsize;

use crate::error::ResolveError;

/// Configuration for [`resolve_duplicates`](crate::resolve_duplicates).
///
/// # Example
///
/// ```
/// use kdmatch_resolve::ResolveConfig;
///
/// let config = ResolveConfig::new(2).with_threads(4);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.final_k(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct ResolveConfig {
    /// Number of candidates each anchor keeps after resolution.
    final_k: usize,
    /// Worker pool size for community solves.
    threads: usize,
}

impl ResolveConfig {
    /// Creates a configuration keeping `final_k` candidates per anchor.
    ///
    /// Defaults `threads` to the available parallelism of the machine.
    pub fn new(final_k: usize) -> Self {
        Self {
            final_k,
            threads: std::thread::available_parallelism().map_or(1, NonZeroUsize::get),
        }
    }

    /// Sets the worker pool size.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Returns the number of candidates kept per anchor.
    pub fn final_k(&self) -> usize {
        self.final_k
    }

    /// Returns the worker pool size.
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Validates this configuration.
    ///
    /// Returns an error if `final_k` or `threads` is zero.
    pub fn validate(&self) -> Result<(), ResolveError> {
        if self.final_k < 1 {
            return Err(ResolveError::InvalidFinalK { k: self.final_k });
        }
        if self.threads < 1 {
            return Err(ResolveError::InvalidThreads {
                threads: self.threads,
            });
        }
        Ok(())
    }
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self::new(1)
    }
}
