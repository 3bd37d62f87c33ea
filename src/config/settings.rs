//! Dotted-path application configuration.

use std::path::Path;

use serde_json::{Map, Value};
use thiserror::Error;

use super::{CONFIG_CLIENT_ID, CONFIG_COMMAND_PREFIX, CONFIG_TOKEN};

/// Environment variables that override configuration keys.
const ENV_OVERRIDES: [(&str, &str); 3] = [
    ("DISCORD_CLIENT_ID", CONFIG_CLIENT_ID),
    ("DISCORD_TOKEN", CONFIG_TOKEN),
    ("DISCORD_COMMAND_PREFIX", CONFIG_COMMAND_PREFIX),
];

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required configuration key: {0}")]
    MissingKey(&'static str),

    #[error("Configuration key {0} must be a string or number")]
    InvalidValue(&'static str),

    #[error("Configuration root must be a JSON object")]
    NotAnObject,

    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Application configuration addressed by dotted paths such as
/// `discord.token`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    data: Map<String, Value>,
}

impl AppConfig {
    /// Creates an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotAnObject`] unless the value is an object.
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        match value {
            Value::Object(data) => Ok(Self { data }),
            _ => Err(ConfigError::NotAnObject),
        }
    }

    /// Loads configuration from a JSON file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_value(serde_json::from_str(&content)?)
    }

    /// Saves configuration to a JSON file.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(&self.data)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Looks up the value stored at a dotted path.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.data.get(segments.next()?)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Looks up a value as text. Numbers and booleans are rendered,
    /// since client ids are often written unquoted.
    #[must_use]
    pub fn get_str(&self, path: &str) -> Option<String> {
        match self.get(path)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Checks whether a non-null value exists at the path.
    #[must_use]
    pub fn has(&self, path: &str) -> bool {
        self.get(path).is_some_and(|v| !v.is_null())
    }

    /// Stores a value at a dotted path, creating intermediate objects.
    ///
    /// Non-object values found along the way are replaced.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) {
        let mut segments: Vec<&str> = path.split('.').collect();
        let Some(last) = segments.pop() else {
            return;
        };

        let mut current = &mut self.data;
        for segment in segments {
            let entry = current
                .entry(segment.to_owned())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            let Value::Object(map) = entry else {
                return;
            };
            current = map;
        }

        current.insert(last.to_owned(), value.into());
    }

    /// Applies `DISCORD_*` environment variables on top of the loaded file.
    pub fn apply_env_overrides(&mut self) {
        for (var, path) in ENV_OVERRIDES {
            if let Ok(value) = std::env::var(var) {
                self.set(path, value);
            }
        }
    }

    /// Creates an example configuration for users to reference.
    #[must_use]
    pub fn example() -> Self {
        let mut config = Self::new();
        config.set(CONFIG_CLIENT_ID, "000000000000000000");
        config.set(CONFIG_TOKEN, "your-bot-token");
        config.set(CONFIG_COMMAND_PREFIX, "!");
        config
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample() -> AppConfig {
        AppConfig::from_value(json!({
            "discord": { "client_id": 1234, "token": "abc", "commandPrefix": "/", "extra": null }
        }))
        .unwrap()
    }

    #[test]
    fn test_get_dotted_path() {
        let config = sample();
        assert_eq!(config.get("discord.token"), Some(&json!("abc")));
        assert_eq!(config.get("discord.missing"), None);
        assert_eq!(config.get("discord.token.deeper"), None);
        assert_eq!(config.get(""), None);
    }

    #[test]
    fn test_get_str_renders_numbers() {
        let config = sample();
        assert_eq!(config.get_str("discord.client_id").as_deref(), Some("1234"));
        assert_eq!(config.get_str("discord.commandPrefix").as_deref(), Some("/"));
        assert_eq!(config.get_str("discord"), None);
    }

    #[test]
    fn test_has_ignores_null() {
        let config = sample();
        assert!(config.has("discord.token"));
        assert!(!config.has("discord.extra"));
        assert!(!config.has("discord.nope"));
    }

    #[test]
    fn test_set_creates_intermediate_objects() {
        let mut config = AppConfig::new();
        config.set("discord.token", "xyz");
        assert_eq!(config.get_str("discord.token").as_deref(), Some("xyz"));

        config.set("discord.token.nested", "replaced");
        assert_eq!(config.get_str("discord.token.nested").as_deref(), Some("replaced"));
    }

    #[test]
    fn test_from_value_rejects_non_object() {
        assert!(matches!(
            AppConfig::from_value(json!([1, 2])),
            Err(ConfigError::NotAnObject)
        ));
    }

    #[test]
    fn test_example_has_required_keys() {
        let config = AppConfig::example();
        assert!(config.has(CONFIG_CLIENT_ID));
        assert!(config.has(CONFIG_TOKEN));
        assert!(config.has(CONFIG_COMMAND_PREFIX));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("chat_command_bot_{}.json", std::process::id()));
        let config = sample();
        config.save_to_file(&path).unwrap();
        let loaded = AppConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, config);
    }
}
