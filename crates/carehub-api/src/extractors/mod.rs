//! Custom Axum extractors.

pub mod identity;
pub mod pagination;

pub use identity::CurrentUser;
pub use pagination::NotificationQuery;
