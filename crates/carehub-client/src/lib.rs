//! # carehub-client
//!
//! Consumer-side pieces of CareHub:
//!
//! - [`NotificationCache`]: paginated notification list with an unread
//!   badge, optimistic read-state updates, and a background badge poll
//! - [`InvitationList`]: the in-memory legacy group invitation list
//! - [`RealtimeClient`]: a WebSocket client that re-joins its rooms after
//!   every reconnect

pub mod api;
pub mod cache;
pub mod invitations;
pub mod realtime;

pub use api::{HttpNotificationApi, NotificationApi, NotificationPage, Pagination};
pub use cache::{CacheState, NotificationCache, PollingGuard};
pub use invitations::InvitationList;
pub use realtime::{RealtimeClient, RoomMembership};
