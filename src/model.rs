//! Plain records extracted from the messaging client.
//!
//! `Conversation` and `Message` are the host-side records the run emits.
//! The `Raw*` mirrors are what the page-context extraction scripts return;
//! conversion from raw to final records is a pure function in the
//! `conversations` / `messages` modules so it can be tested without a browser.

use serde::{Deserialize, Serialize};

/// One entry of the conversation list. Identity is `id`, an opaque
/// segment pulled out of the conversation link's path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub name: String,
    pub last_message: String,
    /// Display text of the list timestamp, left unparsed.
    pub timestamp: String,
    pub id: String,
    pub is_unread: bool,
}

/// One message of a conversation thread. No identity beyond its position
/// in the thread's ordered sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    /// Date parsed from the accessibility label, empty when the label
    /// does not carry the receipt pattern.
    pub date: String,
    /// Time parsed from the accessibility label, empty when absent.
    pub time: String,
    pub is_outgoing: bool,
    pub is_unread: bool,
}

/// Per-list-item record emitted by the conversation listing script.
/// Every field defaults so a missing sub-selector degrades silently.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConversation {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub href: String,
    #[serde(default)]
    pub unread: bool,
}

/// Per-wrapper record emitted by the message extraction script.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMessage {
    #[serde(default)]
    pub text: String,
    /// Accessibility label of the message part, source of the timestamp.
    #[serde(default)]
    pub label: String,
    /// Whether the wrapper carried a message-part node at all.
    #[serde(default)]
    pub has_part: bool,
    #[serde(default)]
    pub outgoing: bool,
    #[serde(default)]
    pub unread: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_json_shape() {
        let message = Message {
            text: "hi".to_string(),
            date: "Jan 5".to_string(),
            time: "3:00 PM".to_string(),
            is_outgoing: true,
            is_unread: false,
        };
        let value = serde_json::to_value(&message).expect("serialize");
        assert_eq!(value["text"], "hi");
        assert_eq!(value["is_outgoing"], true);
        assert_eq!(value["is_unread"], false);
    }

    #[test]
    fn test_raw_records_tolerate_missing_fields() {
        let conversation: RawConversation = serde_json::from_str("{}").expect("deserialize");
        assert_eq!(conversation.name, "");
        assert!(!conversation.unread);

        let message: RawMessage = serde_json::from_str(r#"{"text":"hi"}"#).expect("deserialize");
        assert_eq!(message.text, "hi");
        assert!(!message.has_part);
    }
}
