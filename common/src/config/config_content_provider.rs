use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Raw storage behind a [`super::ConfigManager`]: a file on disk for the
/// binaries, a shared string for tests.
pub trait ConfigContentProvider {
    fn get_config_content(&self) -> Result<Option<String>, String>;
    fn set_config_content(&self, content: &str) -> Result<(), String>;
    /// Removing content that does not exist is not an error.
    fn clear_config_content(&self) -> Result<(), String>;
}

pub struct FileContentConfigProvider {
    file_path: PathBuf,
}

impl FileContentConfigProvider {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self { file_path: file_path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.file_path
    }
}

impl ConfigContentProvider for FileContentConfigProvider {
    fn get_config_content(&self) -> Result<Option<String>, String> {
        match std::fs::read_to_string(&self.file_path) {
            Ok(content) => Ok(Some(content)),
            Err(err) => match err.kind() {
                ErrorKind::NotFound => Ok(None),
                _ => Err(format!("Failed to read {}: {}", self.file_path.display(), err)),
            },
        }
    }

    fn set_config_content(&self, content: &str) -> Result<(), String> {
        if let Some(parent) = self.file_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {}", parent.display(), e))?;
        }
        std::fs::write(&self.file_path, content)
            .map_err(|e| format!("Failed to write {}: {}", self.file_path.display(), e))
    }

    fn clear_config_content(&self) -> Result<(), String> {
        match std::fs::remove_file(&self.file_path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(format!("Failed to remove {}: {}", self.file_path.display(), err)),
        }
    }
}

#[derive(Clone, Default)]
pub struct MemoryContentProvider {
    content: Arc<Mutex<Option<String>>>,
}

impl MemoryContentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content(content: &str) -> Self {
        Self {
            content: Arc::new(Mutex::new(Some(content.to_string()))),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.content.lock().unwrap().clone()
    }
}

impl ConfigContentProvider for MemoryContentProvider {
    fn get_config_content(&self) -> Result<Option<String>, String> {
        Ok(self.content.lock().unwrap().clone())
    }

    fn set_config_content(&self, content: &str) -> Result<(), String> {
        *self.content.lock().unwrap() = Some(content.to_string());
        Ok(())
    }

    fn clear_config_content(&self) -> Result<(), String> {
        *self.content.lock().unwrap() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_temp_file_path() -> PathBuf {
        let random_number: u32 = rand::random();
        std::env::temp_dir().join(format!("snake_content_provider_{}.yaml", random_number))
    }

    #[test]
    fn test_missing_file_reads_as_none() {
        let provider = FileContentConfigProvider::new(get_temp_file_path());
        assert_eq!(provider.get_config_content(), Ok(None));
    }

    #[test]
    fn test_file_write_read_clear() {
        let provider = FileContentConfigProvider::new(get_temp_file_path());
        provider.set_config_content("a: 1").unwrap();
        assert_eq!(provider.get_config_content().unwrap().as_deref(), Some("a: 1"));

        provider.clear_config_content().unwrap();
        assert_eq!(provider.get_config_content(), Ok(None));
        assert!(provider.clear_config_content().is_ok());
    }

    #[test]
    fn test_memory_provider_shares_content_between_clones() {
        let provider = MemoryContentProvider::new();
        let clone = provider.clone();
        clone.set_config_content("x").unwrap();
        assert_eq!(provider.raw().as_deref(), Some("x"));
        provider.clear_config_content().unwrap();
        assert_eq!(clone.raw(), None);
    }
}
