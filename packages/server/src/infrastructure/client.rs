//! Channel-backed `ChatClient`.
//!
//! Each connection owns a bounded mpsc channel drained by its WebSocket send
//! task. Invoking a client method encodes the call as a JSON frame and pushes
//! it onto that channel, so calls to one client stay in send order.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::{
    domain::{ChatClient, DeliveryError, MessageBody, UserName},
    infrastructure::dto::websocket::ServerMessage,
};

/// `ChatClient` that writes encoded frames to a connection's send channel
#[derive(Debug, Clone)]
pub struct ChannelChatClient {
    sender: mpsc::Sender<String>,
}

impl ChannelChatClient {
    /// Wrap the sending half of a connection's outbound channel
    pub fn new(sender: mpsc::Sender<String>) -> Self {
        Self { sender }
    }

    /// Push an arbitrary server frame onto the channel
    pub async fn send_frame(&self, frame: &ServerMessage) -> Result<(), DeliveryError> {
        let json =
            serde_json::to_string(frame).map_err(|e| DeliveryError::Encode(e.to_string()))?;
        self.sender
            .send(json)
            .await
            .map_err(|_| DeliveryError::ChannelClosed)
    }
}

#[async_trait]
impl ChatClient for ChannelChatClient {
    async fn receive_message(
        &self,
        user: &UserName,
        message: &MessageBody,
    ) -> Result<(), DeliveryError> {
        let frame = ServerMessage::ReceiveMessage {
            user: user.as_str().to_string(),
            message: message.as_str().to_string(),
        };
        self.send_frame(&frame).await
    }
}
