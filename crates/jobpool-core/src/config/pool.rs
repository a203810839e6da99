use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

/// Multiplier applied to the host's parallelism for the default pool size.
pub const DEFAULT_POOL_MULTIPLIER: usize = 8;

/// Number of workers for `multiplier` workers per available core.
///
/// Falls back to a single core when the host cannot report its parallelism.
pub fn pool_size(multiplier: usize) -> usize {
    let cores = std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1);
    multiplier.saturating_mul(cores)
}

/// Worker pool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Fixed number of workers.
    #[serde(default = "default_workers")]
    pub workers: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
        }
    }
}

fn default_workers() -> usize {
    pool_size(DEFAULT_POOL_MULTIPLIER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_size_scales_with_cores() {
        let one = pool_size(1);
        assert!(one >= 1);
        assert_eq!(pool_size(3), one * 3);
        assert_eq!(pool_size(0), 0);
    }

    #[test]
    fn test_default_workers() {
        let config = PoolConfig::default();
        assert_eq!(config.workers, pool_size(DEFAULT_POOL_MULTIPLIER));
    }
}
