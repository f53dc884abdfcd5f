//! Departure Synchronization
//!
//! When a user leaves the primary group they lose their claim to the
//! secondary one. Plain members are removed; secondary-group administrators
//! and creators are deliberately left alone.

use crate::telegram::{ChatId, MemberStatus, MembershipLookup, TelegramClient, TelegramResult, User};
use tracing::{debug, error, info};

/// Removes departed primary-group members from the secondary group
pub struct DepartureSync<C: TelegramClient> {
    client: C,
    primary_group: ChatId,
    secondary_group: ChatId,
}

impl<C: TelegramClient> DepartureSync<C> {
    pub fn new(client: C, primary_group: ChatId, secondary_group: ChatId) -> Self {
        Self {
            client,
            primary_group,
            secondary_group,
        }
    }

    /// Handle one member-left event.
    ///
    /// Departures from chats other than the primary group are ignored. No
    /// notification is sent to a removed user.
    pub async fn handle(&self, chat: ChatId, user: &User) -> TelegramResult<()> {
        if chat != self.primary_group {
            return Ok(());
        }

        match self
            .client
            .member_status(self.secondary_group, user.id)
            .await?
        {
            MembershipLookup::Known(MemberStatus::Member) => {
                // Unban kicks a current member without a ban record
                self.client
                    .unban_member(self.secondary_group, user.id)
                    .await?;
                info!(
                    "{} left the primary group and was removed from the secondary group",
                    user.label()
                );
            }
            MembershipLookup::Known(status) => {
                debug!(
                    "{} left the primary group, secondary status {} needs no action",
                    user.label(),
                    status
                );
            }
            MembershipLookup::NotFound(reason) => {
                error!("secondary-group lookup for {} failed: {}", user.label(), reason);
            }
        }

        Ok(())
    }
}
