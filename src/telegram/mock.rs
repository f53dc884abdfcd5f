//! Mock Telegram Client for Testing
//!
//! Provides MockTelegramClient for full handler coverage without the real
//! Bot API. Every trait call is appended to an ordered log so tests can
//! assert both which external calls were made and in what order.

use super::traits::*;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// Mock Telegram client for testing
#[derive(Clone, Default)]
pub struct MockTelegramClient {
    state: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    /// Programmed membership directory
    memberships: HashMap<(ChatId, UserId), MemberStatus>,
    /// Lookups forced to fail with a transport error
    broken_lookups: HashSet<(ChatId, UserId)>,
    /// Ordered record of every trait call
    calls: Vec<ClientCall>,
    /// Events queued for next_events
    pending_events: Vec<ChatEvent>,
}

/// One recorded external call, in issue order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCall {
    MemberStatus { chat: ChatId, user: UserId },
    Approve { chat: ChatId, user: UserId },
    Decline { chat: ChatId, user: UserId },
    SendMessage { chat: ChatId, text: String },
    Unban { chat: ChatId, user: UserId },
}

impl MockTelegramClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Program the directory: (chat, user) has the given status
    pub fn set_status(&self, chat: ChatId, user: UserId, status: MemberStatus) {
        let mut state = self.state.lock().unwrap();
        state.memberships.insert((chat, user), status);
    }

    /// Force member_status for (chat, user) to fail with a network error
    pub fn fail_lookup(&self, chat: ChatId, user: UserId) {
        let mut state = self.state.lock().unwrap();
        state.broken_lookups.insert((chat, user));
    }

    /// Queue an incoming event for next_events
    pub fn queue_event(&self, event: ChatEvent) {
        let mut state = self.state.lock().unwrap();
        state.pending_events.push(event);
    }

    /// All recorded calls, in issue order
    pub fn calls(&self) -> Vec<ClientCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Recorded calls excluding lookups (the side-effecting subset)
    pub fn side_effects(&self) -> Vec<ClientCall> {
        self.calls()
            .into_iter()
            .filter(|call| !matches!(call, ClientCall::MemberStatus { .. }))
            .collect()
    }

    /// Messages sent, as (chat, text) pairs
    pub fn sent_messages(&self) -> Vec<(ChatId, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ClientCall::SendMessage { chat, text } => Some((chat, text)),
                _ => None,
            })
            .collect()
    }

    /// Users removed, as (chat, user) pairs
    pub fn unbanned(&self) -> Vec<(ChatId, UserId)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ClientCall::Unban { chat, user } => Some((chat, user)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: ClientCall) {
        self.state.lock().unwrap().calls.push(call);
    }
}

#[async_trait]
impl TelegramClient for MockTelegramClient {
    async fn member_status(
        &self,
        chat: ChatId,
        user: UserId,
    ) -> TelegramResult<MembershipLookup> {
        self.record(ClientCall::MemberStatus { chat, user });

        let state = self.state.lock().unwrap();
        if state.broken_lookups.contains(&(chat, user)) {
            return Err(TelegramError::Network("connection reset".to_string()));
        }

        Ok(match state.memberships.get(&(chat, user)) {
            Some(status) => MembershipLookup::Known(*status),
            None => MembershipLookup::NotFound("Bad Request: user not found".to_string()),
        })
    }

    async fn approve_join_request(&self, chat: ChatId, user: UserId) -> TelegramResult<()> {
        self.record(ClientCall::Approve { chat, user });
        Ok(())
    }

    async fn decline_join_request(&self, chat: ChatId, user: UserId) -> TelegramResult<()> {
        self.record(ClientCall::Decline { chat, user });
        Ok(())
    }

    async fn send_message(&self, chat: ChatId, text: &str) -> TelegramResult<()> {
        self.record(ClientCall::SendMessage {
            chat,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn unban_member(&self, chat: ChatId, user: UserId) -> TelegramResult<()> {
        self.record(ClientCall::Unban { chat, user });
        Ok(())
    }

    async fn next_events(&self) -> TelegramResult<Vec<ChatEvent>> {
        let mut state = self.state.lock().unwrap();
        Ok(state.pending_events.drain(..).collect())
    }
}
