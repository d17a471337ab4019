//! Conversation listing.
//!
//! One page-context pass collects a raw record per list item; each field
//! comes from its own sub-selector and degrades to empty/false when that
//! sub-selector misses. Host-side conversion filters out items without a
//! name and derives the opaque id from the link path.

use crate::model::{Conversation, RawConversation};
use anyhow::{Context, Result};
use chromiumoxide::Page;

/// Collects one record per list item. An absent container yields an empty
/// array, not an error.
const LIST_CONVERSATIONS_JS: &str = r#"
(() => {
    const container =
        document.querySelector('[role="list"][aria-label*="Conversation"]') ||
        document.querySelector('mws-conversations-list');
    if (!container) return [];
    return Array.from(container.querySelectorAll('mws-conversation-list-item')).map((item) => {
        const name = item.querySelector('h3.name');
        const snippet = item.querySelector('mws-conversation-snippet');
        const timestamp = item.querySelector('mws-relative-timestamp');
        const link = item.querySelector('a[href*="/conversations/"]');
        return {
            name: name ? name.textContent.trim() : '',
            snippet: snippet ? snippet.textContent.trim() : '',
            timestamp: timestamp ? timestamp.textContent.trim() : '',
            href: link ? (link.getAttribute('href') || '') : '',
            unread: !!item.querySelector('.text-content.unread'),
        };
    });
})()
"#;

/// List the conversations currently rendered in the client.
pub async fn list_conversations(page: &Page) -> Result<Vec<Conversation>> {
    let raw: Vec<RawConversation> = page
        .evaluate(LIST_CONVERSATIONS_JS)
        .await
        .context("failed to evaluate conversation listing script")?
        .into_value()
        .context("conversation listing returned an unexpected shape")?;
    Ok(conversations_from_raw(raw))
}

/// Convert raw list-item records into `Conversation`s, dropping entries
/// without a name.
pub fn conversations_from_raw(raw: Vec<RawConversation>) -> Vec<Conversation> {
    raw.into_iter()
        .filter(|item| !item.name.is_empty())
        .map(|item| Conversation {
            id: id_from_href(&item.href),
            name: item.name,
            last_message: item.snippet,
            timestamp: item.timestamp,
            is_unread: item.unread,
        })
        .collect()
}

/// Last path segment of the conversation link, the client's opaque
/// conversation identifier.
fn id_from_href(href: &str) -> String {
    href.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(name: &str, href: &str) -> RawConversation {
        RawConversation {
            name: name.to_string(),
            snippet: "last words".to_string(),
            timestamp: "2:15 PM".to_string(),
            href: href.to_string(),
            unread: false,
        }
    }

    #[test]
    fn test_id_from_href() {
        assert_eq!(id_from_href("/web/conversations/42"), "42");
        assert_eq!(id_from_href("/web/conversations/42/"), "42");
        assert_eq!(id_from_href(""), "");
    }

    #[test]
    fn test_nameless_items_are_dropped() {
        let items = vec![
            raw("Alice", "/web/conversations/1"),
            raw("", "/web/conversations/2"),
            raw("Bob", "/web/conversations/3"),
        ];
        let conversations = conversations_from_raw(items);
        assert_eq!(conversations.len(), 2);
        assert!(conversations.iter().all(|c| !c.name.is_empty()));
        assert_eq!(conversations[0].id, "1");
        assert_eq!(conversations[1].name, "Bob");
    }

    #[test]
    fn test_fields_carry_over() {
        let mut item = raw("Alice", "/web/conversations/7");
        item.unread = true;
        let conversations = conversations_from_raw(vec![item]);
        assert_eq!(conversations[0].last_message, "last words");
        assert_eq!(conversations[0].timestamp, "2:15 PM");
        assert!(conversations[0].is_unread);
    }

    #[test]
    fn test_empty_listing() {
        assert!(conversations_from_raw(Vec::new()).is_empty());
    }
}
