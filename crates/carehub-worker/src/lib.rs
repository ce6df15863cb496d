//! Scheduled background tasks for CareHub.
//!
//! This crate provides:
//! - A cron scheduler for periodic maintenance tasks
//! - The notification retention purge

pub mod jobs;
pub mod scheduler;

pub use jobs::cleanup::NotificationCleanupJob;
pub use scheduler::CronScheduler;
