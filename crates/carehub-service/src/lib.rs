//! # carehub-service
//!
//! Business logic service layer for CareHub. The notification service is
//! the sole writer of notification records; the message service enforces
//! the participant check on every write. Both hand freshly-written records
//! to an optional [`EventPublisher`] so the real-time layer can push them.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod context;
pub mod message;
pub mod notification;
pub mod publisher;

pub use context::RequestContext;
pub use message::MessageService;
pub use notification::{NotificationListing, NotificationService};
pub use publisher::EventPublisher;
