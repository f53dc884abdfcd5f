//! Production Telegram Client Implementation
//!
//! Implements the TelegramClient trait against the Telegram Bot API over
//! HTTPS + JSON (reqwest), with long-polling `getUpdates` as the event
//! subscription. No connection management beyond what reqwest provides.

use super::traits::*;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Default Bot API endpoint
pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Long-poll window for getUpdates, in seconds
const POLL_TIMEOUT_SECS: u64 = 50;

/// Production Telegram client.
///
/// Cheap to clone; clones share the HTTP connection pool and the update
/// offset.
#[derive(Clone)]
pub struct BotApiClient {
    http: reqwest::Client,
    /// Base URL including the bot token, e.g. "https://api.telegram.org/bot<token>"
    base_url: String,
    /// Next update offset for getUpdates (confirmed-through + 1)
    offset: Arc<AtomicI64>,
}

/// Bot API response envelope
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    error_code: Option<i64>,
    description: Option<String>,
}

/// A single update from getUpdates
#[derive(Debug, Deserialize)]
struct Update {
    update_id: i64,
    message: Option<ApiMessage>,
    chat_join_request: Option<ApiChatJoinRequest>,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    chat: ApiChat,
    from: Option<ApiUser>,
    text: Option<String>,
    left_chat_member: Option<ApiUser>,
}

#[derive(Debug, Deserialize)]
struct ApiChat {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct ApiUser {
    id: i64,
    first_name: String,
    last_name: Option<String>,
    username: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiChatJoinRequest {
    chat: ApiChat,
    from: ApiUser,
    user_chat_id: i64,
}

#[derive(Debug, Deserialize)]
struct ApiChatMember {
    status: MemberStatus,
}

impl From<ApiUser> for User {
    fn from(u: ApiUser) -> Self {
        User {
            id: UserId(u.id),
            first_name: u.first_name,
            last_name: u.last_name,
            username: u.username,
        }
    }
}

/// Extract the slash-command name from message text.
///
/// "/start", "/start@groupsync_bot" and "/start foo" all yield "start".
fn command_name(text: &str) -> Option<&str> {
    let command = text.strip_prefix('/')?;
    let command = command.split_whitespace().next()?;
    let command = command.split('@').next()?;
    if command.is_empty() {
        None
    } else {
        Some(command)
    }
}

/// Decode one update into at most one event.
///
/// Updates outside the bot's vocabulary (plain chatter, other service
/// messages) decode to None and are skipped; the caller still advances the
/// offset past them.
fn event_from_update(update: Update) -> Option<ChatEvent> {
    if let Some(request) = update.chat_join_request {
        return Some(ChatEvent::JoinRequest(JoinRequest {
            user: request.from.into(),
            chat: ChatId(request.chat.id),
            user_chat: ChatId(request.user_chat_id),
        }));
    }

    let message = update.message?;
    let chat = ChatId(message.chat.id);

    if let Some(left) = message.left_chat_member {
        return Some(ChatEvent::MemberLeft {
            chat,
            user: left.into(),
        });
    }

    let name = command_name(message.text.as_deref()?)?.to_string();
    Some(ChatEvent::Command {
        name,
        chat,
        user: message.from?.into(),
    })
}

impl BotApiClient {
    /// Create a client for the given bot token against the default endpoint
    pub fn new(token: &str) -> TelegramResult<Self> {
        Self::with_api_url(token, DEFAULT_API_URL)
    }

    /// Create a client against a custom endpoint (local Bot API server)
    pub fn with_api_url(token: &str, api_url: &str) -> TelegramResult<Self> {
        // Request timeout must exceed the long-poll window or every idle
        // getUpdates call would error out.
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(POLL_TIMEOUT_SECS + 10))
            .build()
            .map_err(|e| TelegramError::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: format!("{}/bot{}", api_url.trim_end_matches('/'), token),
            offset: Arc::new(AtomicI64::new(0)),
        })
    }

    /// Call a Bot API method and decode its envelope
    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> TelegramResult<T> {
        let url = format!("{}/{}", self.base_url, method);

        let response = self
            .http
            .post(&url)
            .json(&params)
            .send()
            .await
            .map_err(|e| TelegramError::Network(format!("{} failed: {}", method, e)))?;

        let envelope: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| TelegramError::InvalidResponse(format!("{}: {}", method, e)))?;

        if !envelope.ok {
            return Err(TelegramError::Api {
                code: envelope.error_code.unwrap_or(0),
                description: envelope
                    .description
                    .unwrap_or_else(|| "no description".to_string()),
            });
        }

        envelope.result.ok_or_else(|| {
            TelegramError::InvalidResponse(format!("{}: ok response without result", method))
        })
    }
}

#[async_trait]
impl TelegramClient for BotApiClient {
    async fn member_status(
        &self,
        chat: ChatId,
        user: UserId,
    ) -> TelegramResult<MembershipLookup> {
        let result: Result<ApiChatMember, TelegramError> = self
            .call(
                "getChatMember",
                json!({ "chat_id": chat.0, "user_id": user.0 }),
            )
            .await;

        match result {
            Ok(member) => Ok(MembershipLookup::Known(member.status)),
            // 400 is how the directory signals "no membership record"
            // (e.g. "Bad Request: user not found")
            Err(TelegramError::Api {
                code: 400,
                description,
            }) => Ok(MembershipLookup::NotFound(description)),
            Err(e) => Err(e),
        }
    }

    async fn approve_join_request(&self, chat: ChatId, user: UserId) -> TelegramResult<()> {
        let _: bool = self
            .call(
                "approveChatJoinRequest",
                json!({ "chat_id": chat.0, "user_id": user.0 }),
            )
            .await?;
        Ok(())
    }

    async fn decline_join_request(&self, chat: ChatId, user: UserId) -> TelegramResult<()> {
        let _: bool = self
            .call(
                "declineChatJoinRequest",
                json!({ "chat_id": chat.0, "user_id": user.0 }),
            )
            .await?;
        Ok(())
    }

    async fn send_message(&self, chat: ChatId, text: &str) -> TelegramResult<()> {
        let _: serde_json::Value = self
            .call("sendMessage", json!({ "chat_id": chat.0, "text": text }))
            .await?;
        Ok(())
    }

    async fn unban_member(&self, chat: ChatId, user: UserId) -> TelegramResult<()> {
        let _: bool = self
            .call(
                "unbanChatMember",
                json!({ "chat_id": chat.0, "user_id": user.0 }),
            )
            .await?;
        Ok(())
    }

    async fn next_events(&self) -> TelegramResult<Vec<ChatEvent>> {
        let offset = self.offset.load(Ordering::SeqCst);
        let updates: Vec<Update> = self
            .call(
                "getUpdates",
                json!({
                    "offset": offset,
                    "timeout": POLL_TIMEOUT_SECS,
                    "allowed_updates": ["message", "chat_join_request"],
                }),
            )
            .await?;

        if let Some(last) = updates.iter().map(|u| u.update_id).max() {
            self.offset.store(last + 1, Ordering::SeqCst);
        }

        let events: Vec<ChatEvent> = updates.into_iter().filter_map(event_from_update).collect();
        if !events.is_empty() {
            debug!("decoded {} event(s) from update batch", events.len());
        }

        Ok(events)
    }
}
