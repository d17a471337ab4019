//! Message extraction for a single conversation.
//!
//! Navigation is a click on the anchor carrying the conversation id, the
//! same way a user opens the thread; the client routes internally, so
//! there is no direct URL navigation. Timestamps only exist in the
//! accessibility label of each message part, with the fixed shape
//! `"Received on {date} at {time}."`.

use crate::config::Timeouts;
use crate::model::{Conversation, Message, RawMessage};
use crate::wait;
use anyhow::{Context, Result};
use chromiumoxide::Page;
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

/// Message thread container.
pub const MESSAGE_LIST_SELECTOR: &str = "mws-messages-list";

/// Collects one record per message wrapper, in document order.
const EXTRACT_MESSAGES_JS: &str = r#"
(() => {
    return Array.from(document.querySelectorAll('mws-message-wrapper')).map((wrapper) => {
        const text = wrapper.querySelector('mws-text-message-part .text-msg-content');
        const part = wrapper.querySelector('mws-message-part-content');
        return {
            text: text ? text.textContent.trim() : '',
            label: part ? (part.getAttribute('aria-label') || '') : '',
            has_part: !!part,
            outgoing: wrapper.getAttribute('is-outgoing') === 'true',
            unread: wrapper.hasAttribute('unread'),
        };
    });
})()
"#;

static RECEIVED_LABEL_RE: OnceLock<Regex> = OnceLock::new();

fn received_label_re() -> &'static Regex {
    RECEIVED_LABEL_RE
        .get_or_init(|| Regex::new(r"Received on (.*?) at (.*?)\.").expect("valid receipt pattern"))
}

/// Open a conversation and extract its messages in document order.
pub async fn extract_messages(
    page: &Page,
    conversation: &Conversation,
    timeouts: &Timeouts,
) -> Result<Vec<Message>> {
    let anchor = format!("a[href*=\"{}\"]", conversation.id);
    let link = page.find_element(anchor).await.with_context(|| {
        format!(
            "no navigable link for conversation id {}",
            conversation.id
        )
    })?;
    link.click()
        .await
        .with_context(|| format!("failed to open conversation {}", conversation.id))?;

    if !wait::wait_for_selector(
        page,
        MESSAGE_LIST_SELECTOR,
        timeouts.message_list(),
        timeouts.poll_interval(),
    )
    .await
    {
        debug!(
            conversation = %conversation.name,
            "message list container missing, extracting whatever rendered"
        );
    }
    tokio::time::sleep(timeouts.message_settle()).await;

    let raw: Vec<RawMessage> = page
        .evaluate(EXTRACT_MESSAGES_JS)
        .await
        .context("failed to evaluate message extraction script")?
        .into_value()
        .context("message extraction returned an unexpected shape")?;
    Ok(messages_from_raw(raw))
}

/// Convert raw wrapper records into `Message`s. Wrappers missing either
/// required sub-node, or with empty text, are dropped; document order is
/// preserved.
pub fn messages_from_raw(raw: Vec<RawMessage>) -> Vec<Message> {
    raw.into_iter()
        .filter(|record| record.has_part && !record.text.is_empty())
        .map(|record| {
            let (date, time) = parse_received_label(&record.label);
            Message {
                text: record.text,
                date,
                time,
                is_outgoing: record.outgoing,
                is_unread: record.unread,
            }
        })
        .collect()
}

/// Pull `date`/`time` out of an accessibility label. A label without the
/// receipt pattern yields two empty strings.
pub fn parse_received_label(label: &str) -> (String, String) {
    match received_label_re().captures(label) {
        Some(caps) => (caps[1].to_string(), caps[2].to_string()),
        None => (String::new(), String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(text: &str, label: &str) -> RawMessage {
        RawMessage {
            text: text.to_string(),
            label: label.to_string(),
            has_part: true,
            outgoing: false,
            unread: false,
        }
    }

    #[test]
    fn test_label_with_receipt_pattern() {
        let (date, time) = parse_received_label("Alice said: hi. Received on Jan 5 at 3:00 PM.");
        assert_eq!(date, "Jan 5");
        assert_eq!(time, "3:00 PM");
    }

    #[test]
    fn test_label_without_receipt_pattern() {
        let (date, time) = parse_received_label("Alice said: hi.");
        assert_eq!(date, "");
        assert_eq!(time, "");
    }

    #[test]
    fn test_empty_text_is_dropped() {
        let records = vec![
            raw("hello", "Received on Jan 5 at 3:00 PM."),
            raw("", "Received on Jan 5 at 3:01 PM."),
        ];
        let messages = messages_from_raw(records);
        assert_eq!(messages.len(), 1);
        assert!(messages.iter().all(|m| !m.text.is_empty()));
    }

    #[test]
    fn test_missing_part_node_is_dropped() {
        let mut record = raw("hello", "");
        record.has_part = false;
        assert!(messages_from_raw(vec![record]).is_empty());
    }

    #[test]
    fn test_flags_and_order_carry_over() {
        let mut first = raw("first", "Received on Jan 5 at 3:00 PM.");
        first.outgoing = true;
        let mut second = raw("second", "no receipt here");
        second.unread = true;

        let messages = messages_from_raw(vec![first, second]);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].text, "first");
        assert!(messages[0].is_outgoing);
        assert_eq!(messages[0].date, "Jan 5");
        assert_eq!(messages[1].text, "second");
        assert!(messages[1].is_unread);
        assert_eq!(messages[1].time, "");
    }
}
