use crate::domain::rules::DEFAULT_BIG_TXN_THRESHOLD;
use crate::error::{AuthorizationError, Result};

/// Tuning knobs for the authorization engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Number of partition workers. Each card number is owned by exactly one.
    pub partitions: usize,
    /// Capacity of each partition's inbound queue.
    pub channel_capacity: usize,
    /// Amounts strictly above this are declined as big transactions.
    pub big_txn_threshold: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            partitions: 4,
            channel_capacity: 1024,
            big_txn_threshold: DEFAULT_BIG_TXN_THRESHOLD,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.partitions == 0 {
            return Err(AuthorizationError::ValidationError(
                "partitions must be at least 1".to_string(),
            ));
        }
        if self.channel_capacity == 0 {
            return Err(AuthorizationError::ValidationError(
                "channel capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
