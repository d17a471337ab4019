//! Orchestrator: login, list, then extract each conversation in turn.
//!
//! Two failure tiers. Login is fatal and aborts the run. Listing and
//! per-conversation extraction are degraded: errors are logged and turn
//! into empty results so one bad conversation cannot sink the batch.
//! The session is released exactly once, on success and failure alike.

use crate::model::{Conversation, Message};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{info, warn};

/// One browser session scoped to a single scrape run. The orchestrator is
/// the session's exclusive owner; everything happens strictly
/// sequentially on its one page.
#[async_trait]
pub trait ScrapeSession {
    /// Drive the login flow to completion.
    async fn login(&self) -> Result<()>;
    /// List conversations currently visible in the client.
    async fn conversations(&self) -> Result<Vec<Conversation>>;
    /// Extract the messages of one conversation.
    async fn messages(&self, conversation: &Conversation) -> Result<Vec<Message>>;
    /// Release the underlying browser. Called exactly once per run.
    async fn close(&mut self);
}

/// Run the full scrape over `session`, releasing it afterwards regardless
/// of outcome. `settle` is the pause between login and listing, `delay`
/// the pause between consecutive conversations.
pub async fn scrape_messages<S>(
    mut session: S,
    settle: Duration,
    delay: Duration,
) -> Result<HashMap<String, Vec<Message>>>
where
    S: ScrapeSession + Send + Sync,
{
    let outcome = drive(&session, settle, delay).await;
    session.close().await;
    outcome
}

async fn drive<S>(
    session: &S,
    settle: Duration,
    delay: Duration,
) -> Result<HashMap<String, Vec<Message>>>
where
    S: ScrapeSession + Sync,
{
    session.login().await.context("login failed")?;
    tokio::time::sleep(settle).await;

    let conversations = match session.conversations().await {
        Ok(list) => list,
        Err(err) => {
            warn!(
                error = %format!("{err:#}"),
                "conversation listing failed, continuing with none"
            );
            Vec::new()
        }
    };
    info!(count = conversations.len(), "conversations discovered");

    let mut results = HashMap::new();
    let total = conversations.len();
    for (index, conversation) in conversations.iter().enumerate() {
        info!(
            conversation = %conversation.name,
            position = index + 1,
            total,
            "extracting messages"
        );
        let messages = match session.messages(conversation).await {
            Ok(messages) => messages,
            Err(err) => {
                warn!(
                    conversation = %conversation.name,
                    error = %format!("{err:#}"),
                    "message extraction failed, storing empty thread"
                );
                Vec::new()
            }
        };
        // Keyed by display name, matching the emitted mapping. Two
        // conversations sharing a name will collide here.
        results.insert(conversation.name.clone(), messages);
        if index + 1 < total {
            tokio::time::sleep(delay).await;
        }
    }
    Ok(results)
}
