//! Core traits defined in `carehub-core` and implemented by other crates.

pub mod clock;

pub use clock::{Clock, ManualClock, SystemClock};
