//! Browser session lifecycle.
//!
//! Owns the chromiumoxide browser, its CDP handler task, and the single
//! page every phase of the scrape runs against.

use crate::config::Config;
use crate::model::{Conversation, Message};
use crate::scrape::ScrapeSession;
use crate::{conversations, login, messages};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures_util::StreamExt;
use tracing::{debug, info, warn};

pub struct BrowserSession {
    browser: Browser,
    page: Page,
    handler: tokio::task::JoinHandle<()>,
    config: Config,
    closed: bool,
}

impl BrowserSession {
    /// Launch the browser and open the page the run will drive.
    pub async fn launch(config: Config) -> Result<Self> {
        let mut builder = BrowserConfig::builder().viewport(None);
        if !config.headless {
            builder = builder.with_head();
        }
        if let Some(path) = config.executable_path() {
            builder = builder.chrome_executable(path);
        }
        if let Some(dir) = config.user_data_dir_path() {
            builder = builder.user_data_dir(dir);
        }
        let browser_config = builder
            .build()
            .map_err(|err| anyhow!("failed to build browser config: {err}"))?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .context("failed to launch browser")?;

        // The handler stream must be drained for the CDP connection to
        // make progress.
        let handler = tokio::spawn(async move {
            while let Some(_event) = handler.next().await {}
        });

        let page = browser
            .new_page("about:blank")
            .await
            .context("failed to open page")?;

        info!(headless = config.headless, "browser session started");
        Ok(Self {
            browser,
            page,
            handler,
            config,
            closed: false,
        })
    }

    pub fn page(&self) -> &Page {
        &self.page
    }
}

#[async_trait]
impl ScrapeSession for BrowserSession {
    async fn login(&self) -> Result<()> {
        login::login(&self.page, &self.config).await
    }

    async fn conversations(&self) -> Result<Vec<Conversation>> {
        conversations::list_conversations(&self.page).await
    }

    async fn messages(&self, conversation: &Conversation) -> Result<Vec<Message>> {
        messages::extract_messages(&self.page, conversation, &self.config.timeouts).await
    }

    async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(err) = self.browser.close().await {
            warn!(error = %err, "browser close reported an error");
        }
        self.handler.abort();
        debug!("browser session released");
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        // Close normally runs first; this only reaps the handler task if
        // the session is dropped without it.
        if !self.closed {
            self.handler.abort();
        }
    }
}
