pub mod args;
pub mod config;
pub mod conversations;
pub mod logging;
pub mod login;
pub mod messages;
pub mod model;
pub mod scrape;
pub mod session;
pub mod wait;

// Re-export the record types at crate root for convenience
pub use model::{Conversation, Message};
pub use scrape::{ScrapeSession, scrape_messages};
