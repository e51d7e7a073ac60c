//! Channel type definitions for inter-task communication

use tokio::sync::mpsc;

use crate::chat::messages::{ChatMessage, ChatOutbound};

/// Default channel buffer size
pub const DEFAULT_CHANNEL_SIZE: usize = 100;

/// Create a channel carrying accepted chat messages to the dispatcher
pub fn create_message_channel() -> (mpsc::Sender<ChatMessage>, mpsc::Receiver<ChatMessage>) {
    mpsc::channel(DEFAULT_CHANNEL_SIZE)
}

/// Create a channel carrying frames to the websocket writer
pub fn create_outbound_channel() -> (mpsc::Sender<ChatOutbound>, mpsc::Receiver<ChatOutbound>) {
    mpsc::channel(DEFAULT_CHANNEL_SIZE)
}
