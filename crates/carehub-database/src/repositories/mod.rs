//! PostgreSQL implementations of the storage traits.

pub mod conversation;
pub mod notification;
mod rows;

pub use conversation::PgConversationStore;
pub use notification::PgNotificationStore;
