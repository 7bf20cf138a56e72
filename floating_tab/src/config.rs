use serde::Deserialize;
use std::{collections::HashSet, time::Duration};
use thiserror::Error;
use types::MessageContent;

pub const DEFAULT_TIME_TO_SHOW_MS: u64 = 5_000;
pub const DEFAULT_TIME_TO_HIDE_MS: u64 = 1_000;
pub const DEFAULT_STORAGE_KEY: &str = "floating-tab__closedAt";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("at least one message is required")]
    NoMessages,
    #[error("duplicate message title: {0}")]
    DuplicateTitle(String),
    #[error("action_url must not be empty")]
    MissingActionUrl,
    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),
    #[error("storage_key must not be empty")]
    MissingStorageKey,
}

/// Initialization input for a floating tab instance.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WidgetConfig {
    pub action_url: String,

    pub action_text: String,

    pub messages: Vec<MessageContent>,

    /// Route analytics to the local log instead of the configured sink.
    #[serde(default)]
    pub dev_mode: bool,

    #[serde(default = "default_time_to_show_ms")]
    pub time_to_show_ms: u64,

    #[serde(default = "default_time_to_hide_ms")]
    pub time_to_hide_ms: u64,

    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

const fn default_time_to_show_ms() -> u64 {
    DEFAULT_TIME_TO_SHOW_MS
}

const fn default_time_to_hide_ms() -> u64 {
    DEFAULT_TIME_TO_HIDE_MS
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

impl WidgetConfig {
    pub fn new(
        action_url: impl Into<String>,
        action_text: impl Into<String>,
        messages: Vec<MessageContent>,
    ) -> Self {
        Self {
            action_url: action_url.into(),
            action_text: action_text.into(),
            messages,
            dev_mode: false,
            time_to_show_ms: DEFAULT_TIME_TO_SHOW_MS,
            time_to_hide_ms: DEFAULT_TIME_TO_HIDE_MS,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }

    #[must_use]
    pub const fn with_timing(
        mut self,
        time_to_show_ms: u64,
        time_to_hide_ms: u64,
    ) -> Self {
        self.time_to_show_ms = time_to_show_ms;
        self.time_to_hide_ms = time_to_hide_ms;
        self
    }

    #[must_use]
    pub const fn with_dev_mode(mut self, dev_mode: bool) -> Self {
        self.dev_mode = dev_mode;
        self
    }

    pub const fn time_to_show(&self) -> Duration {
        Duration::from_millis(self.time_to_show_ms)
    }

    pub const fn time_to_hide(&self) -> Duration {
        Duration::from_millis(self.time_to_hide_ms)
    }

    /// Check the configuration before any widget state is created.
    ///
    /// # Errors
    /// Returns the first problem found: an empty message list, a repeated
    /// title, an empty action URL or storage key, or a zero phase duration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.messages.is_empty() {
            return Err(ConfigError::NoMessages);
        }

        let mut titles = HashSet::new();
        for message in &self.messages {
            if !titles.insert(message.title.as_str()) {
                return Err(ConfigError::DuplicateTitle(message.title.clone()));
            }
        }

        if self.action_url.trim().is_empty() {
            return Err(ConfigError::MissingActionUrl);
        }

        if self.storage_key.is_empty() {
            return Err(ConfigError::MissingStorageKey);
        }

        if self.time_to_show_ms == 0 {
            return Err(ConfigError::ZeroDuration("time_to_show_ms"));
        }

        if self.time_to_hide_ms == 0 {
            return Err(ConfigError::ZeroDuration("time_to_hide_ms"));
        }

        Ok(())
    }
}
