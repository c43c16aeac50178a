use std::time::Duration;
use serde::{Deserialize, Serialize};

use crate::config::Validate;
use super::grid::GRID_SIZE;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SnakeSettings {
    pub grid_size: i32,
    pub initial_tick_interval_ms: u64,
    pub min_tick_interval_ms: u64,
    pub tick_interval_step_ms: u64,
    pub food_reward: u32,
    pub speed_up_every: u32,
    pub food_spawn_attempts: u32,
}

impl Default for SnakeSettings {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            initial_tick_interval_ms: 150,
            min_tick_interval_ms: 50,
            tick_interval_step_ms: 10,
            food_reward: 10,
            speed_up_every: 50,
            food_spawn_attempts: 100,
        }
    }
}

impl SnakeSettings {
    pub fn initial_tick_interval(&self) -> Duration {
        Duration::from_millis(self.initial_tick_interval_ms)
    }

    /// Interval after one speed-up step, never below the floor.
    pub fn next_tick_interval(&self, current: Duration) -> Duration {
        let floor = Duration::from_millis(self.min_tick_interval_ms);
        current
            .saturating_sub(Duration::from_millis(self.tick_interval_step_ms))
            .max(floor)
    }
}

impl Validate for SnakeSettings {
    fn validate(&self) -> Result<(), String> {
        if self.grid_size < 5 || self.grid_size > 100 {
            return Err("grid_size must be between 5 and 100".to_string());
        }
        if self.min_tick_interval_ms == 0 {
            return Err("min_tick_interval_ms must be greater than 0".to_string());
        }
        if self.initial_tick_interval_ms < self.min_tick_interval_ms {
            return Err("initial_tick_interval_ms must not be below min_tick_interval_ms".to_string());
        }
        if self.food_reward == 0 {
            return Err("food_reward must be greater than 0".to_string());
        }
        if self.speed_up_every == 0 {
            return Err("speed_up_every must be greater than 0".to_string());
        }
        if self.food_spawn_attempts == 0 {
            return Err("food_spawn_attempts must be at least 1".to_string());
        }
        Ok(())
    }
}
