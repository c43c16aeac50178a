use std::time::Duration;
use common::config::Validate;
use serde::{Deserialize, Serialize};

/// How often the leaderboard and player list are refreshed while visible.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct PollingConfig {
    pub interval_ms: u32,
}

impl PollingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms as u64)
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self { interval_ms: 5000 }
    }
}

impl Validate for PollingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.interval_ms < 100 {
            return Err("polling interval_ms must be at least 100".to_string());
        }
        Ok(())
    }
}
