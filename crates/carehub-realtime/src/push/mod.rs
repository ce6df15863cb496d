//! Server-initiated pushes of freshly written records.

pub mod dispatcher;

pub use dispatcher::PushDispatcher;
