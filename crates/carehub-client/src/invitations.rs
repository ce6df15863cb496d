//! In-memory group invitation list.
//!
//! Invitations live only for the client session and are not routed through
//! the notification service.

use carehub_core::error::AppError;
use carehub_core::result::AppResult;
use carehub_core::types::InvitationId;
use carehub_entity::invitation::{GroupInvitation, InvitationStatus};

/// Group invitations, newest first.
#[derive(Debug, Clone, Default)]
pub struct InvitationList {
    invitations: Vec<GroupInvitation>,
}

impl InvitationList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend an invitation. An invitation with the same id is replaced.
    pub fn add_group_invitation(&mut self, invitation: GroupInvitation) {
        self.invitations.retain(|i| i.id != invitation.id);
        self.invitations.insert(0, invitation);
    }

    /// Resolve a pending invitation.
    ///
    /// Fails with not-found for an unknown id and with conflict when the
    /// invitation is already resolved or `status` is not a legal next state.
    pub fn update_invitation_status(
        &mut self,
        id: InvitationId,
        status: InvitationStatus,
    ) -> AppResult<GroupInvitation> {
        let invitation = self
            .invitations
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| AppError::not_found(format!("Invitation {id} not found")))?;

        if !invitation.status.can_transition_to(status) {
            return Err(AppError::conflict(format!(
                "Invitation {id} cannot move from {} to {status}",
                invitation.status
            )));
        }

        invitation.status = status;
        Ok(invitation.clone())
    }

    /// Number of invitations still pending, computed from the list.
    pub fn pending_invitations_count(&self) -> usize {
        self.invitations.iter().filter(|i| i.is_pending()).count()
    }

    pub fn invitations(&self) -> &[GroupInvitation] {
        &self.invitations
    }

    pub fn get(&self, id: InvitationId) -> Option<&GroupInvitation> {
        self.invitations.iter().find(|i| i.id == id)
    }
}
