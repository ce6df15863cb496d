//! Room system: named groups of connections that receive the same events.

pub mod membership;
pub mod registry;
pub mod room;
pub mod types;

pub use registry::RoomRegistry;
pub use types::RoomName;
