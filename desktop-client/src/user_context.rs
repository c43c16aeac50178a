use common::config::{
    ConfigContentProvider, ConfigManager, FileContentConfigProvider, Validate, YamlConfigSerializer,
};
use common::log;
use common::protocol::LoginResponse;
use common::UserId;
use serde::{Deserialize, Serialize};

use crate::config::exe_relative_path;

const SESSION_FILE_NAME: &str = "snake_client_session.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub username: String,
    pub is_logged_in: bool,
}

/// What survives a restart: the bearer token and who it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    pub token: String,
    pub user: CurrentUser,
}

impl Validate for StoredSession {
    fn validate(&self) -> Result<(), String> {
        if self.token.is_empty() {
            return Err("token must not be empty".to_string());
        }
        if self.user.username.trim().is_empty() {
            return Err("username must not be empty".to_string());
        }
        Ok(())
    }
}

pub struct UserContext<P: ConfigContentProvider = FileContentConfigProvider> {
    storage: ConfigManager<P, StoredSession, YamlConfigSerializer>,
    session: Option<StoredSession>,
}

impl UserContext<FileContentConfigProvider> {
    pub fn from_default_file() -> Self {
        Self::load(FileContentConfigProvider::new(exe_relative_path(SESSION_FILE_NAME)))
    }
}

impl<P: ConfigContentProvider> UserContext<P> {
    /// Restores the saved login. A file that can't be read back is removed.
    pub fn load(provider: P) -> Self {
        let storage: ConfigManager<P, StoredSession, YamlConfigSerializer> =
            ConfigManager::new(provider, YamlConfigSerializer::new());

        let session = match storage.load() {
            Ok(session) => session.filter(|s| s.user.is_logged_in),
            Err(e) => {
                log!("Discarding stored session: {}", e);
                if let Err(e) = storage.clear() {
                    log!("Failed to remove stored session: {}", e);
                }
                None
            }
        };

        Self { storage, session }
    }

    pub fn current_user(&self) -> Option<&CurrentUser> {
        self.session.as_ref().map(|s| &s.user)
    }

    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.token.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn sign_in(&mut self, login: LoginResponse) -> Result<(), String> {
        let session = StoredSession {
            token: login.token,
            user: CurrentUser {
                id: login.id,
                username: login.username,
                is_logged_in: true,
            },
        };
        self.storage.store(&session)?;
        self.session = Some(session);
        Ok(())
    }

    /// Forgets the user in memory even when the file can't be removed.
    pub fn sign_out(&mut self) -> Result<(), String> {
        self.session = None;
        self.storage.clear()
    }
}
