//! Legacy group invitation entities.

pub mod model;

pub use model::{GroupInvitation, InvitationStatus};
