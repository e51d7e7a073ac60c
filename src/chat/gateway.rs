//! WebSocket client for the chat relay

use futures_util::{SinkExt, StreamExt};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};
use tracing::{debug, error, info, instrument, warn};

use super::messages::{ChatInbound, ChatMessage, ChatOutbound, ChatReply};
use crate::common::channels::{create_message_channel, create_outbound_channel};
use crate::common::errors::{BridgeError, Result};
use crate::config::types::ChatConfig;
use crate::dispatch::{acknowledgments, DispatchCoordinator};

/// Decides which chat messages are trade signals for us
#[derive(Debug, Clone, Default)]
pub struct MessageFilter {
    /// Our own user id; replies we post come back and must be skipped
    pub bot_user_id: Option<String>,
    /// Allowed channels, empty means every channel
    pub channels: Vec<String>,
}

impl MessageFilter {
    pub fn accepts(&self, message: &ChatMessage) -> bool {
        if self.bot_user_id.as_deref() == Some(message.author_id.as_str()) {
            return false;
        }
        self.channels.is_empty() || self.channels.contains(&message.channel_id)
    }
}

/// Limits consecutive failed connection attempts
///
/// A session that connected and later dropped resets the count, so the limit
/// only ends the process when the relay is unreachable.
#[derive(Debug, Clone)]
pub struct ReconnectPolicy {
    /// 0 means unlimited
    max_attempts: u32,
    failures: u32,
}

impl ReconnectPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            failures: 0,
        }
    }

    /// Record how a session ended; `false` once the limit is reached
    pub fn should_retry(&mut self, session_established: bool) -> bool {
        if session_established {
            self.failures = 0;
            return true;
        }
        self.failures += 1;
        self.max_attempts == 0 || self.failures < self.max_attempts
    }

    pub fn failures(&self) -> u32 {
        self.failures
    }
}

/// Chat relay connection
///
/// Reads frames on a spawned task and writes on another, while the caller's
/// task runs the dispatcher. Messages are dispatched one at a time so the
/// replies for a message are queued, in line order, before the next message
/// is looked at.
pub struct ChatGateway {
    /// WebSocket URL
    url: String,
    /// Token for the identify frame
    token: Option<String>,
    filter: MessageFilter,
    /// Heartbeat interval in seconds
    heartbeat_interval: u64,
    /// Connected state flag
    is_connected: Arc<AtomicBool>,
}

impl ChatGateway {
    pub fn new(config: &ChatConfig) -> Self {
        Self {
            url: config.gateway_url.clone(),
            token: config.token.clone(),
            filter: MessageFilter {
                bot_user_id: config.bot_user_id.clone(),
                channels: config.channels.clone(),
            },
            heartbeat_interval: 30,
            is_connected: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Set the heartbeat interval
    pub fn with_heartbeat_interval(mut self, seconds: u64) -> Self {
        self.heartbeat_interval = seconds.max(1);
        self
    }

    /// Check if connected
    pub fn is_connected(&self) -> bool {
        self.is_connected.load(Ordering::SeqCst)
    }

    /// Connect, identify and dispatch messages until the relay closes
    #[instrument(skip(self, coordinator), fields(url = %self.url))]
    pub async fn run(&self, coordinator: &DispatchCoordinator) -> Result<()> {
        info!("Connecting to chat relay: {}", self.url);

        let (ws_stream, _response) = connect_async(&self.url)
            .await
            .map_err(|e| BridgeError::WebSocketConnection(e.to_string()))?;

        info!("Chat relay connection established");
        self.is_connected.store(true, Ordering::SeqCst);

        let (mut write, mut read) = ws_stream.split();

        let identify = serde_json::to_string(&ChatOutbound::Identify {
            token: self.token.clone(),
        })?;
        write.send(Message::Text(identify)).await?;

        let (message_tx, mut message_rx) = create_message_channel();
        let (outbound_tx, mut outbound_rx) = create_outbound_channel();

        // Writer: replies, pongs and heartbeats
        let heartbeat_interval = self.heartbeat_interval;
        let writer = tokio::spawn(async move {
            let mut ping_interval = interval(Duration::from_secs(heartbeat_interval));
            ping_interval.tick().await;

            loop {
                let frame = tokio::select! {
                    frame = outbound_rx.recv() => match frame {
                        Some(frame) => frame,
                        None => break,
                    },
                    _ = ping_interval.tick() => ChatOutbound::Ping,
                };

                let text = match serde_json::to_string(&frame) {
                    Ok(text) => text,
                    Err(e) => {
                        error!("Failed to encode frame: {}", e);
                        continue;
                    }
                };
                if let Err(e) = write.send(Message::Text(text)).await {
                    error!("Failed to send frame: {}", e);
                    break;
                }
            }

            let _ = write.close().await;
        });

        // Reader: frames to accepted messages
        let mut filter = self.filter.clone();
        let pong_tx = outbound_tx.clone();
        let is_connected = self.is_connected.clone();
        let reader = tokio::spawn(async move {
            while let Some(frame) = read.next().await {
                match frame {
                    Ok(Message::Text(text)) => match Self::parse_frame(&text) {
                        Ok(ChatInbound::Message(message)) => {
                            if !filter.accepts(&message) {
                                debug!("Ignoring message {} from {}", message.id, message.author_id);
                                continue;
                            }
                            if message_tx.send(message).await.is_err() {
                                break;
                            }
                        }
                        Ok(ChatInbound::Ready { user_id }) => {
                            info!("Chat relay ready as {}", user_id);
                            if filter.bot_user_id.is_none() {
                                filter.bot_user_id = Some(user_id);
                            }
                        }
                        Ok(ChatInbound::Ping) => {
                            let _ = pong_tx.send(ChatOutbound::Pong).await;
                        }
                        Ok(ChatInbound::Pong) => debug!("Received pong"),
                        Err(e) => warn!("Failed to parse frame: {} - {}", e, text),
                    },
                    Ok(Message::Close(frame)) => {
                        info!("Chat relay closed: {:?}", frame);
                        break;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        error!("Chat relay error: {}", e);
                        break;
                    }
                }
            }
            is_connected.store(false, Ordering::SeqCst);
        });

        while let Some(message) = message_rx.recv().await {
            info!("Processing message {} in {}", message.id, message.channel_id);

            let outcomes = coordinator.handle(&message.content).await;
            for content in acknowledgments(&outcomes) {
                let reply = ChatOutbound::Reply(ChatReply {
                    channel_id: message.channel_id.clone(),
                    content,
                });
                if outbound_tx.send(reply).await.is_err() {
                    warn!("Writer stopped, dropping remaining acknowledgments");
                    break;
                }
            }
        }

        drop(outbound_tx);
        let _ = reader.await;
        let _ = writer.await;
        self.is_connected.store(false, Ordering::SeqCst);

        info!("Chat relay session ended");
        Ok(())
    }

    fn parse_frame(text: &str) -> Result<ChatInbound> {
        Ok(serde_json::from_str(text)?)
    }
}
