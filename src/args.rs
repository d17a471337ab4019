use crate::config::Config;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "msgscrape",
    version,
    about = "Scrape conversations and message threads from a web messaging client"
)]
pub struct Cli {
    /// Path to a config.toml file (default: ~/.msgscrape/config.toml)
    #[arg(short = 'c', long, value_name = "PATH", env = "MSGSCRAPE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Base URL of the messaging client
    #[arg(long, value_name = "URL", env = "MSGSCRAPE_URL")]
    pub url: Option<String>,

    /// Run the browser headless (QR login needs a visible window, so only
    /// useful with an already-paired profile directory)
    #[arg(long, env = "MSGSCRAPE_HEADLESS")]
    pub headless: bool,

    /// Chrome/Chromium executable to launch
    #[arg(long, value_name = "PATH", env = "MSGSCRAPE_EXECUTABLE")]
    pub executable: Option<String>,

    /// Browser profile directory; reuse one to keep the QR pairing
    #[arg(long, value_name = "DIR", env = "MSGSCRAPE_USER_DATA_DIR")]
    pub user_data_dir: Option<String>,

    /// Output format for the scraped mapping
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub output: OutputFormat,

    /// Verbose logging
    #[arg(long, short)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON mapping of conversation name to messages
    Json,
    /// Human-readable thread listing
    Text,
}

impl Cli {
    /// Load the config file and fold the command-line overrides into it.
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load(self.config.clone())?;
        if let Some(url) = &self.url {
            config.base_url = url.clone();
        }
        if self.headless {
            config.headless = true;
        }
        if let Some(executable) = &self.executable {
            config.executable = Some(executable.clone());
        }
        if let Some(dir) = &self.user_data_dir {
            config.user_data_dir = Some(dir.clone());
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["msgscrape"]);
        assert_eq!(cli.output, OutputFormat::Json);
        assert!(!cli.headless);
    }

    #[test]
    fn test_overrides_fold_into_config() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("config.toml");
        let cli = Cli::parse_from([
            "msgscrape",
            "--config",
            missing.to_str().expect("utf-8 path"),
            "--headless",
            "--url",
            "https://example.test/web/",
            "--user-data-dir",
            "/tmp/profile",
        ]);

        let config = cli.load_config().expect("load config");
        assert!(config.headless);
        assert_eq!(config.base_url, "https://example.test/web/");
        assert_eq!(config.user_data_dir.as_deref(), Some("/tmp/profile"));
        // Untouched settings keep their file/default values
        assert_eq!(config.timeouts.login_secs, 300);
    }
}
