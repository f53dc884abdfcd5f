//! Join Gatekeeper
//!
//! Resolves join requests to the secondary group against the requester's
//! standing in the primary group. Every request is resolved exactly once:
//! active primary members are approved, everyone else is declined with a
//! notification.

use crate::telegram::{ChatId, JoinRequest, MembershipLookup, TelegramClient, TelegramResult};
use tracing::{debug, info};

/// Resolves join requests against primary-group membership
pub struct Gatekeeper<C: TelegramClient> {
    client: C,
    primary_group: ChatId,
    decline_message: String,
}

impl<C: TelegramClient> Gatekeeper<C> {
    pub fn new(client: C, primary_group: ChatId, decline_message: String) -> Self {
        Self {
            client,
            primary_group,
            decline_message,
        }
    }

    /// Resolve one join request.
    ///
    /// The anticipated "no membership record" lookup outcome declines like
    /// any inactive status. Transport and unexpected API errors propagate to
    /// the dispatch boundary.
    pub async fn handle(&self, request: &JoinRequest) -> TelegramResult<()> {
        let user = &request.user;
        debug!(
            "join request for chat {} from user {}",
            request.chat, user.id
        );

        match self
            .client
            .member_status(self.primary_group, user.id)
            .await?
        {
            MembershipLookup::Known(status) if status.is_active() => {
                self.client
                    .approve_join_request(request.chat, user.id)
                    .await?;
                info!("{} was approved", user.label());
            }
            MembershipLookup::Known(status) => {
                self.decline(request).await?;
                info!("{} was declined (primary status: {})", user.label(), status);
            }
            MembershipLookup::NotFound(reason) => {
                self.decline(request).await?;
                info!("{} was declined, lookup failed: {}", user.label(), reason);
            }
        }

        Ok(())
    }

    /// Notify first, then decline. The order matters: once declined, the
    /// user may no longer be reachable for a direct message.
    async fn decline(&self, request: &JoinRequest) -> TelegramResult<()> {
        self.client
            .send_message(request.user_chat, &self.decline_message)
            .await?;
        self.client
            .decline_join_request(request.chat, request.user.id)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telegram::mock::{ClientCall, MockTelegramClient};
    use crate::telegram::{MemberStatus, TelegramError, User, UserId};

    const PRIMARY: ChatId = ChatId(-1001);
    const SECONDARY: ChatId = ChatId(-1002);
    const DECLINE_TEXT: &str = "You must be a member of the main group to join.";

    fn request(user_id: i64) -> JoinRequest {
        JoinRequest {
            user: User {
                id: UserId(user_id),
                first_name: "Ada".to_string(),
                last_name: Some("Lovelace".to_string()),
                username: Some("ada".to_string()),
            },
            chat: SECONDARY,
            user_chat: ChatId(user_id),
        }
    }

    fn gatekeeper(client: &MockTelegramClient) -> Gatekeeper<MockTelegramClient> {
        Gatekeeper::new(client.clone(), PRIMARY, DECLINE_TEXT.to_string())
    }

    #[tokio::test]
    async fn test_active_member_is_approved() {
        for status in [
            MemberStatus::Member,
            MemberStatus::Administrator,
            MemberStatus::Creator,
        ] {
            let client = MockTelegramClient::new();
            client.set_status(PRIMARY, UserId(42), status);

            gatekeeper(&client).handle(&request(42)).await.unwrap();

            // Approval only, no message
            assert_eq!(
                client.side_effects(),
                vec![ClientCall::Approve {
                    chat: SECONDARY,
                    user: UserId(42)
                }]
            );
        }
    }

    #[tokio::test]
    async fn test_inactive_member_is_declined_with_notification() {
        for status in [
            MemberStatus::Left,
            MemberStatus::Banned,
            MemberStatus::Restricted,
        ] {
            let client = MockTelegramClient::new();
            client.set_status(PRIMARY, UserId(42), status);

            gatekeeper(&client).handle(&request(42)).await.unwrap();

            // Notification reaches the user's private chat BEFORE the decline
            assert_eq!(
                client.side_effects(),
                vec![
                    ClientCall::SendMessage {
                        chat: ChatId(42),
                        text: DECLINE_TEXT.to_string()
                    },
                    ClientCall::Decline {
                        chat: SECONDARY,
                        user: UserId(42)
                    },
                ]
            );
        }
    }

    #[tokio::test]
    async fn test_unknown_user_is_declined_like_inactive() {
        let client = MockTelegramClient::new();
        // No status programmed: lookup answers NotFound

        gatekeeper(&client).handle(&request(42)).await.unwrap();

        assert_eq!(
            client.side_effects(),
            vec![
                ClientCall::SendMessage {
                    chat: ChatId(42),
                    text: DECLINE_TEXT.to_string()
                },
                ClientCall::Decline {
                    chat: SECONDARY,
                    user: UserId(42)
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let client = MockTelegramClient::new();
        client.fail_lookup(PRIMARY, UserId(42));

        let result = gatekeeper(&client).handle(&request(42)).await;

        assert!(matches!(result, Err(TelegramError::Network(_))));
        // The request was not resolved either way
        assert!(client.side_effects().is_empty());
    }
}
