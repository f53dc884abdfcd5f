//! Telegram Client Trait Abstractions
//!
//! These traits enable full handler coverage via MockTelegramClient. Any
//! platform offering this capability set is substitutable.

use async_trait::async_trait;
use std::fmt;

/// Telegram chat identifier (groups are negative, private chats positive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ChatId(pub i64);

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Telegram user identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A Telegram user as carried by events. Never stored, only referenced
/// per-event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

impl User {
    /// Display name ("First Last", or just "First")
    pub fn full_name(&self) -> String {
        match &self.last_name {
            Some(last) => format!("{} {}", self.first_name, last),
            None => self.first_name.clone(),
        }
    }

    /// Log-friendly identification: full name plus handle or id
    pub fn label(&self) -> String {
        match &self.username {
            Some(username) => format!("{} (@{})", self.full_name(), username),
            None => format!("{} (id {})", self.full_name(), self.id),
        }
    }
}

/// Membership status of a user in a chat, as reported by the directory.
///
/// The wire value for `Banned` is "kicked".
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Member,
    Administrator,
    Creator,
    Restricted,
    Left,
    #[serde(rename = "kicked")]
    Banned,
}

impl MemberStatus {
    /// Active membership gates admission to the secondary group.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            MemberStatus::Member | MemberStatus::Administrator | MemberStatus::Creator
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStatus::Member => "member",
            MemberStatus::Administrator => "administrator",
            MemberStatus::Creator => "creator",
            MemberStatus::Restricted => "restricted",
            MemberStatus::Left => "left",
            MemberStatus::Banned => "kicked",
        }
    }
}

impl fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a membership lookup.
///
/// The directory signals "no membership record" (the user never interacted
/// with the queried chat) as a bad-request error. That anticipated class is
/// an explicit variant here so handlers branch on it instead of matching
/// error types; transport and other API failures stay in the `Err` channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembershipLookup {
    /// The directory returned a status for the (chat, user) pair
    Known(MemberStatus),
    /// No record exists; carries the platform's error description
    NotFound(String),
}

/// A pending request to enter a chat, awaiting approve/decline.
///
/// `user_chat` is the private channel Telegram opens for replying to the
/// requester.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinRequest {
    pub user: User,
    pub chat: ChatId,
    pub user_chat: ChatId,
}

/// Events delivered by the update subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// A slash command ("/start" arrives as name "start")
    Command { name: String, chat: ChatId, user: User },
    /// A join request targeting some chat
    JoinRequest(JoinRequest),
    /// A user left (or was removed from) some chat
    MemberLeft { chat: ChatId, user: User },
}

/// Result type for Telegram operations
pub type TelegramResult<T> = Result<T, TelegramError>;

/// Telegram client errors
#[derive(Debug, thiserror::Error)]
pub enum TelegramError {
    #[error("network error: {0}")]
    Network(String),

    #[error("telegram api error {code}: {description}")]
    Api { code: i64, description: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Telegram client abstraction.
///
/// This is the full capability surface the bot depends on; the production
/// implementation is `BotApiClient`, tests use `MockTelegramClient`.
#[async_trait]
pub trait TelegramClient: Clone {
    /// Look up the membership status of a user in a chat.
    ///
    /// The anticipated "no record" failure is returned as
    /// `MembershipLookup::NotFound`, not as an error.
    async fn member_status(&self, chat: ChatId, user: UserId)
        -> TelegramResult<MembershipLookup>;

    /// Approve a pending join request
    async fn approve_join_request(&self, chat: ChatId, user: UserId) -> TelegramResult<()>;

    /// Decline a pending join request
    async fn decline_join_request(&self, chat: ChatId, user: UserId) -> TelegramResult<()>;

    /// Send a text message to a chat
    async fn send_message(&self, chat: ChatId, text: &str) -> TelegramResult<()>;

    /// Remove a user from a chat.
    ///
    /// Unbanning a current member kicks them without leaving a ban record,
    /// so they may rejoin later.
    async fn unban_member(&self, chat: ChatId, user: UserId) -> TelegramResult<()>;

    /// Receive the next batch of events (blocks until updates arrive or the
    /// poll window elapses)
    async fn next_events(&self) -> TelegramResult<Vec<ChatEvent>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_statuses() {
        assert!(MemberStatus::Member.is_active());
        assert!(MemberStatus::Administrator.is_active());
        assert!(MemberStatus::Creator.is_active());
        assert!(!MemberStatus::Restricted.is_active());
        assert!(!MemberStatus::Left.is_active());
        assert!(!MemberStatus::Banned.is_active());
    }

    #[test]
    fn test_status_wire_values() {
        let status: MemberStatus = serde_json::from_str("\"member\"").unwrap();
        assert_eq!(status, MemberStatus::Member);

        // "kicked" is the wire value for a ban
        let status: MemberStatus = serde_json::from_str("\"kicked\"").unwrap();
        assert_eq!(status, MemberStatus::Banned);

        let status: MemberStatus = serde_json::from_str("\"creator\"").unwrap();
        assert_eq!(status, MemberStatus::Creator);
    }

    #[test]
    fn test_user_full_name() {
        let user = User {
            id: UserId(7),
            first_name: "Ada".to_string(),
            last_name: Some("Lovelace".to_string()),
            username: Some("ada".to_string()),
        };
        assert_eq!(user.full_name(), "Ada Lovelace");
        assert_eq!(user.label(), "Ada Lovelace (@ada)");
    }

    #[test]
    fn test_user_label_without_username() {
        let user = User {
            id: UserId(7),
            first_name: "Ada".to_string(),
            last_name: None,
            username: None,
        };
        assert_eq!(user.full_name(), "Ada");
        assert_eq!(user.label(), "Ada (id 7)");
    }
}
