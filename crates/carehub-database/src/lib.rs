//! # carehub-database
//!
//! PostgreSQL connection management, migrations, and the storage traits
//! behind notifications and conversations. Each trait has a Postgres
//! implementation under [`repositories`] and an in-memory one under
//! [`memory`] used by tests and database-less local runs.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::{MemoryConversationStore, MemoryNotificationStore};
pub use repositories::{PgConversationStore, PgNotificationStore};
pub use store::{ConversationStore, InsertOutcome, NotificationStore};
