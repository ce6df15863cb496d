//! # carehub-entity
//!
//! Domain entity models for CareHub. Every struct in this crate is a plain
//! value type: notifications with their denormalized actor snapshots,
//! conversations and messages, the legacy group invitation record, and the
//! JSON frames exchanged over the real-time connection.
//!
//! Nothing here touches the database; row mapping lives in
//! `carehub-database`.

pub mod conversation;
pub mod invitation;
pub mod notification;
pub mod presence;
pub mod realtime;
