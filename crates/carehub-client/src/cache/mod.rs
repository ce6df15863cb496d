//! Client notification cache: list, badge, and polling.

pub mod polling;
pub mod state;
pub mod store;

pub use polling::PollingGuard;
pub use state::CacheState;
pub use store::NotificationCache;
