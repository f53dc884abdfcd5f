//! Groupsync Bot
//!
//! Wires the three handlers to the update stream and runs the event loop.
//! Each event is dispatched independently: a handler failure is logged and
//! contained, it never stops the loop or affects other events.

use super::{departure::DepartureSync, gatekeeper::Gatekeeper, greeter::Greeter};
use crate::telegram::{ChatEvent, ChatId, TelegramClient, TelegramResult};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Pause before retrying after a failed update poll
const POLL_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Bot configuration, immutable for the process lifetime
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// The group whose membership is authoritative for admission
    pub primary_group: ChatId,
    /// The gated group, kept in sync on departure
    pub secondary_group: ChatId,
    /// Message sent to users whose join request is declined
    pub decline_message: String,
}

/// Groupsync bot: dispatch plus the three handlers
pub struct GroupSyncBot<C: TelegramClient> {
    client: C,
    secondary_group: ChatId,
    greeter: Greeter<C>,
    gatekeeper: Gatekeeper<C>,
    departure: DepartureSync<C>,
}

impl<C: TelegramClient> GroupSyncBot<C> {
    pub fn new(client: C, config: BotConfig) -> Self {
        let greeter = Greeter::new(client.clone());
        let gatekeeper = Gatekeeper::new(
            client.clone(),
            config.primary_group,
            config.decline_message,
        );
        let departure = DepartureSync::new(
            client.clone(),
            config.primary_group,
            config.secondary_group,
        );

        Self {
            client,
            secondary_group: config.secondary_group,
            greeter,
            gatekeeper,
            departure,
        }
    }

    /// Dispatch one event to its handler.
    ///
    /// Join requests for chats other than the secondary group are ignored,
    /// as are commands other than /start.
    pub async fn handle_event(&self, event: &ChatEvent) -> TelegramResult<()> {
        match event {
            ChatEvent::Command { name, chat, user } if name == "start" => {
                self.greeter.handle(*chat, user).await
            }
            ChatEvent::Command { name, .. } => {
                debug!("ignoring command /{}", name);
                Ok(())
            }
            ChatEvent::JoinRequest(request) if request.chat == self.secondary_group => {
                self.gatekeeper.handle(request).await
            }
            ChatEvent::JoinRequest(request) => {
                debug!("ignoring join request for unrelated chat {}", request.chat);
                Ok(())
            }
            ChatEvent::MemberLeft { chat, user } => self.departure.handle(*chat, user).await,
        }
    }

    /// Run the event loop indefinitely.
    ///
    /// A failed poll is retried after a short pause. A handler error is
    /// logged and the loop moves on; a daemon must survive individual event
    /// handling failures.
    pub async fn run(&self) -> TelegramResult<()> {
        info!(
            "groupsync running: gating chat {} on membership in the primary group",
            self.secondary_group
        );

        loop {
            let events = match self.client.next_events().await {
                Ok(events) => events,
                Err(e) => {
                    warn!("error receiving updates, will retry: {}", e);
                    tokio::time::sleep(POLL_RETRY_DELAY).await;
                    continue;
                }
            };

            for event in events {
                if let Err(e) = self.handle_event(&event).await {
                    warn!("error handling event {:?}: {}", event, e);
                }
            }
        }
    }
}
