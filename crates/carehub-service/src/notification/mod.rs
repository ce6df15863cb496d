//! Notification creation, retrieval, read-state, and retention.

pub mod service;
pub mod templates;

pub use service::{NotificationListing, NotificationService};
