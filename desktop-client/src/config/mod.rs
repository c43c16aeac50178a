mod main_config;
mod polling_config;
mod server_config;

pub use main_config::{Config, exe_relative_path, get_config_manager};
pub use polling_config::PollingConfig;
pub use server_config::ServerConfig;
