//! Message write path.

pub mod service;

pub use service::MessageService;
