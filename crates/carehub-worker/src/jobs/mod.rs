//! Built-in job implementations.

pub mod cleanup;
