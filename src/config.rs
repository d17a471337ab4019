use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Web client the scraper drives by default.
pub const DEFAULT_BASE_URL: &str = "https://messages.google.com/web/";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// URL of the messaging client
    pub base_url: String,
    /// Chrome/Chromium executable to launch (browser default when unset)
    pub executable: Option<String>,
    /// Browser profile directory; reusing one keeps the QR pairing alive
    /// between runs
    pub user_data_dir: Option<String>,
    /// Run the browser without a window. The QR login needs a visible
    /// window, so this only makes sense with an already-paired profile.
    pub headless: bool,
    /// Wait bounds and settle delays for the scrape phases
    pub timeouts: Timeouts,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            executable: None,
            user_data_dir: None,
            headless: false,
            timeouts: Timeouts::default(),
        }
    }
}

/// Every wait bound and fixed delay of the run, tunable from the config
/// file. Defaults reproduce the documented scrape timings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    /// Bound on initial navigation settling
    pub navigation_secs: u64,
    /// Default bound of the element waiter (QR marker wait)
    pub selector_secs: u64,
    /// Bound on the whole QR login poll
    pub login_secs: u64,
    /// Bound on the conversation list appearing after login
    pub conversation_list_secs: u64,
    /// Bound on the message list appearing after opening a conversation
    pub message_list_secs: u64,
    /// Settle delay after login and before listing conversations
    pub settle_secs: u64,
    /// Settle delay after the message list appears
    pub message_settle_secs: u64,
    /// Delay between consecutive conversations
    pub between_conversations_secs: u64,
    /// Poll interval of the element waiter and login poll
    pub poll_interval_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            navigation_secs: 60,
            selector_secs: 60,
            login_secs: 300,
            conversation_list_secs: 30,
            message_list_secs: 5,
            settle_secs: 5,
            message_settle_secs: 2,
            between_conversations_secs: 1,
            poll_interval_ms: 1000,
        }
    }
}

impl Timeouts {
    pub fn navigation(&self) -> Duration {
        Duration::from_secs(self.navigation_secs)
    }

    pub fn selector(&self) -> Duration {
        Duration::from_secs(self.selector_secs)
    }

    pub fn login(&self) -> Duration {
        Duration::from_secs(self.login_secs)
    }

    pub fn conversation_list(&self) -> Duration {
        Duration::from_secs(self.conversation_list_secs)
    }

    pub fn message_list(&self) -> Duration {
        Duration::from_secs(self.message_list_secs)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_secs(self.settle_secs)
    }

    pub fn message_settle(&self) -> Duration {
        Duration::from_secs(self.message_settle_secs)
    }

    pub fn between_conversations(&self) -> Duration {
        Duration::from_secs(self.between_conversations_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Config {
    /// Load configuration from file, falling back to defaults when the
    /// file does not exist
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = path.unwrap_or_else(Self::default_path);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: Option<PathBuf>) -> Result<()> {
        let config_path = path.unwrap_or_else(Self::default_path);

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    fn default_path() -> PathBuf {
        let home_dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home_dir.join(".msgscrape").join("config.toml")
    }

    pub fn executable_path(&self) -> Option<PathBuf> {
        self.executable.as_deref().map(expand_path)
    }

    pub fn user_data_dir_path(&self) -> Option<PathBuf> {
        self.user_data_dir.as_deref().map(expand_path)
    }
}

fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(!config.headless);
        assert_eq!(config.timeouts.login_secs, 300);
        assert_eq!(config.timeouts.poll_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.headless = true;
        config.timeouts.between_conversations_secs = 3;
        config.save(Some(path.clone())).expect("save config");

        let loaded = Config::load(Some(path)).expect("load config");
        assert!(loaded.headless);
        assert_eq!(loaded.timeouts.between_conversations_secs, 3);
        assert_eq!(loaded.timeouts.login_secs, 300);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let loaded = Config::load(Some(dir.path().join("nope.toml"))).expect("load");
        assert_eq!(loaded.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "headless = true\n").expect("write");

        let loaded = Config::load(Some(path)).expect("load");
        assert!(loaded.headless);
        assert_eq!(loaded.timeouts, Timeouts::default());
    }

    #[test]
    fn test_expand_path_tilde() {
        let expanded = expand_path("~/chrome-profile");
        assert!(!expanded.to_string_lossy().starts_with('~'));
    }
}
