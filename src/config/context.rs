//! Application context shared by the lifecycle-driven parts of the bot.

use super::AppConfig;

/// Application-level context: its name and its configuration.
#[derive(Debug, Clone)]
pub struct AppContext {
    name: String,
    config: AppConfig,
}

impl AppContext {
    /// Creates a new application context.
    #[must_use]
    pub fn new(name: impl Into<String>, config: AppConfig) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }

    /// Returns the application name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the application configuration.
    #[must_use]
    pub const fn config(&self) -> &AppConfig {
        &self.config
    }
}
