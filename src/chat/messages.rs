//! Chat relay frame types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A message posted in a chat channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub channel_id: String,
    pub author_id: String,
    pub content: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Text posted back to the channel a message came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub channel_id: String,
    pub content: String,
}

/// Frames received from the relay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatInbound {
    /// Identify accepted; carries the bot's own user id
    Ready { user_id: String },
    Message(ChatMessage),
    Ping,
    Pong,
}

/// Frames sent to the relay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatOutbound {
    Identify { token: Option<String> },
    Reply(ChatReply),
    Ping,
    Pong,
}
