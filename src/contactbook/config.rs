use crate::error::{ContactsError, Result};
use crate::list_model::DEFAULT_MIN_SEARCH_LEN;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_LIST_WIDTH: usize = 100;
const MIN_LIST_WIDTH: usize = 40;

/// Configuration for contactbook, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContactsConfig {
    /// Shortest search query that hits the store
    #[serde(default = "default_min_search_len")]
    pub min_search_len: usize,

    /// Line width used when listing contacts
    #[serde(default = "default_list_width")]
    pub list_width: usize,
}

fn default_min_search_len() -> usize {
    DEFAULT_MIN_SEARCH_LEN
}

fn default_list_width() -> usize {
    DEFAULT_LIST_WIDTH
}

impl Default for ContactsConfig {
    fn default() -> Self {
        Self {
            min_search_len: default_min_search_len(),
            list_width: default_list_width(),
        }
    }
}

/// Keys accepted by `contactbook config`.
pub const CONFIG_KEYS: &[&str] = &["min-search-len", "list-width"];

impl ContactsConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(ContactsError::Io)?;
        let config: ContactsConfig =
            serde_json::from_str(&content).map_err(ContactsError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(ContactsError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(ContactsError::Serialization)?;
        fs::write(config_path, content).map_err(ContactsError::Io)?;
        Ok(())
    }

    /// Current value of a config key, as shown to the user
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "min-search-len" => Some(self.min_search_len.to_string()),
            "list-width" => Some(self.list_width.to_string()),
            _ => None,
        }
    }

    /// Parse and set a config key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parsed: usize = value.parse().map_err(|_| {
            ContactsError::Config(format!("{} must be a number, got '{}'", key, value))
        })?;

        match key {
            "min-search-len" => self.min_search_len = parsed.max(1),
            "list-width" => self.list_width = parsed.max(MIN_LIST_WIDTH),
            _ => {
                return Err(ContactsError::Config(format!(
                    "Unknown config key: {} (expected one of: {})",
                    key,
                    CONFIG_KEYS.join(", ")
                )))
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ContactsConfig::default();
        assert_eq!(config.min_search_len, 3);
        assert_eq!(config.list_width, 100);
    }

    #[test]
    fn test_load_missing_config() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = ContactsConfig::load(temp_dir.path()).unwrap();
        assert_eq!(config, ContactsConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested = temp_dir.path().join("data");

        let mut config = ContactsConfig::default();
        config.set("min-search-len", "5").unwrap();
        config.save(&nested).unwrap();

        let loaded = ContactsConfig::load(&nested).unwrap();
        assert_eq!(loaded.min_search_len, 5);
        assert_eq!(loaded.list_width, 100);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let parsed: ContactsConfig = serde_json::from_str(r#"{"list_width": 80}"#).unwrap();
        assert_eq!(parsed.list_width, 80);
        assert_eq!(parsed.min_search_len, 3);
    }

    #[test]
    fn test_set_clamps_values() {
        let mut config = ContactsConfig::default();
        config.set("min-search-len", "0").unwrap();
        config.set("list-width", "10").unwrap();
        assert_eq!(config.get("min-search-len").as_deref(), Some("1"));
        assert_eq!(config.get("list-width").as_deref(), Some("40"));
    }

    #[test]
    fn test_set_rejects_bad_input() {
        let mut config = ContactsConfig::default();
        assert!(config.set("list-width", "wide").is_err());
        assert!(config.set("colour", "3").is_err());
        assert_eq!(config.get("colour"), None);
        assert_eq!(config, ContactsConfig::default());
    }

    #[test]
    fn test_corrupt_config_is_an_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILENAME), "{not json").unwrap();
        assert!(matches!(
            ContactsConfig::load(temp_dir.path()),
            Err(ContactsError::Serialization(_))
        ));
    }
}
