//! Storage traits implemented by the Postgres and in-memory backends.

pub mod conversation;
pub mod notification;

pub use conversation::ConversationStore;
pub use notification::{InsertOutcome, NotificationStore};
