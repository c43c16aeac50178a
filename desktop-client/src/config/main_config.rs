use std::path::PathBuf;
use common::config::{ConfigManager, FileContentConfigProvider, Validate, YamlConfigSerializer};
use common::games::snake::SnakeSettings;
use serde::{Deserialize, Serialize};

use super::{PollingConfig, ServerConfig};

const CONFIG_FILE_NAME: &str = "snake_client_config.yaml";

pub type ClientConfigManager = ConfigManager<FileContentConfigProvider, Config, YamlConfigSerializer>;

/// Places `file_name` next to the executable, falling back to the working directory.
pub fn exe_relative_path(file_name: &str) -> PathBuf {
    if let Ok(exe_path) = std::env::current_exe()
        && let Some(exe_dir) = exe_path.parent()
    {
        return exe_dir.join(file_name);
    }
    PathBuf::from(file_name)
}

pub fn get_config_manager() -> ClientConfigManager {
    ConfigManager::from_yaml_file(exe_relative_path(CONFIG_FILE_NAME))
}

#[derive(Debug, Default, PartialEq, Serialize, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub polling: PollingConfig,
    #[serde(default)]
    pub game: SnakeSettings,
}

impl Validate for Config {
    fn validate(&self) -> Result<(), String> {
        self.server.validate()?;
        self.polling.validate()?;
        self.game.validate()?;
        Ok(())
    }
}
