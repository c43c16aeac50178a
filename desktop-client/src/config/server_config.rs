use std::time::Duration;
use common::config::Validate;
use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct ServerConfig {
    pub address: String,
    pub request_timeout_ms: u32,
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms as u64)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "http://127.0.0.1:8000".to_string(),
            request_timeout_ms: 5000,
        }
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), String> {
        if !self.address.starts_with("http://") {
            return Err("server address must start with http://".to_string());
        }
        if self.request_timeout_ms == 0 {
            return Err("request_timeout_ms must be greater than 0".to_string());
        }
        Ok(())
    }
}
