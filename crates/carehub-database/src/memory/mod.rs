//! In-memory implementations of the storage traits.

pub mod conversation;
pub mod notification;

pub use conversation::MemoryConversationStore;
pub use notification::MemoryNotificationStore;
