//! WebSocket transport adapter for the chat hub.
//!
//! Drives one connection's lifecycle: generates the id, calls
//! `ChatHub::on_connect`, dispatches inbound frames to hub operations and
//! finally calls `ChatHub::on_disconnect` with the termination reason.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::{
    domain::{
        ConnectionId, ConnectionIdFactory, DeliveryError, GroupName, MessageBody, UserName,
        ValueObjectError,
    },
    infrastructure::{
        ChannelChatClient,
        dto::websocket::{ClientMessage, ServerMessage},
    },
    ui::state::AppState,
    usecase::{ChatHub, HubError},
};

/// Reasons an inbound frame could not be served
#[derive(Debug, Error)]
enum DispatchError {
    #[error("invalid frame: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid argument: {0}")]
    Invalid(#[from] ValueObjectError),

    #[error("{0}")]
    Hub(#[from] HubError),

    #[error("failed to reply: {0}")]
    Reply(#[from] DeliveryError),
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, StatusCode> {
    let connection_id = ConnectionIdFactory::generate().map_err(|e| {
        tracing::error!("Failed to generate connection id: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, connection_id)))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, connection_id: ConnectionId) {
    let hub = state.hub.clone();
    let (tx, mut rx) = mpsc::channel::<String>(state.channel_capacity.max(1));
    let client = ChannelChatClient::new(tx);

    // Queued before registration so it precedes every broadcast
    let connected = ServerMessage::Connected {
        connection_id: connection_id.as_str().to_string(),
        group: hub.default_group().as_str().to_string(),
    };
    if let Err(e) = client.send_frame(&connected).await {
        tracing::error!("Failed to queue connected frame for '{}': {}", connection_id, e);
        return;
    }

    if let Err(e) = hub
        .on_connect(connection_id.clone(), Arc::new(client.clone()))
        .await
    {
        tracing::error!("Failed to register connection '{}': {}", connection_id, e);
        return;
    }

    let (mut sender, mut receiver) = socket.split();

    // Drain this connection's outbound channel into the socket
    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if let Err(e) = sender.send(Message::Text(frame.into())).await {
                return Some(format!("failed to write to socket: {e}"));
            }
        }
        None
    });

    // Dispatch inbound frames to the hub
    let recv_hub = hub.clone();
    let recv_id = connection_id.clone();
    let reply = client;
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => return Some(e.to_string()),
            };

            match msg {
                Message::Text(text) => {
                    dispatch(&recv_hub, &recv_id, &reply, text.as_str()).await;
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::debug!("Connection '{}' requested close", recv_id);
                    return None;
                }
                _ => {}
            }
        }
        None
    });

    // If any one of the tasks completes, abort the other
    let reason = tokio::select! {
        result = &mut recv_task => {
            send_task.abort();
            result.unwrap_or_else(|e| Some(format!("receive task failed: {e}")))
        }
        result = &mut send_task => {
            recv_task.abort();
            result.unwrap_or_else(|e| Some(format!("send task failed: {e}")))
        }
    };

    hub.on_disconnect(&connection_id, reason.as_deref()).await;
}

async fn dispatch(hub: &ChatHub, caller: &ConnectionId, reply: &ChannelChatClient, text: &str) {
    let result = match serde_json::from_str::<ClientMessage>(text) {
        Ok(message) => handle_client_message(hub, caller, reply, message).await,
        Err(e) => Err(DispatchError::from(e)),
    };

    let Err(e) = result else {
        return;
    };
    match &e {
        DispatchError::Hub(HubError::Registry(_) | HubError::InvalidState { .. }) => {
            tracing::error!("Hub call from '{}' violated the lifecycle: {}", caller, e);
        }
        _ => tracing::warn!("Rejected frame from '{}': {}", caller, e),
    }

    let frame = ServerMessage::Error {
        message: e.to_string(),
    };
    if let Err(e) = reply.send_frame(&frame).await {
        tracing::warn!("Failed to send error frame to '{}': {}", caller, e);
    }
}

async fn handle_client_message(
    hub: &ChatHub,
    caller: &ConnectionId,
    reply: &ChannelChatClient,
    message: ClientMessage,
) -> Result<(), DispatchError> {
    match message {
        ClientMessage::SendMessage { user, message } => {
            let (user, body) = chat_arguments(user, message)?;
            hub.send_message(caller, &user, &body).await?;
        }
        ClientMessage::SendMessageToCaller { user, message } => {
            let (user, body) = chat_arguments(user, message)?;
            hub.send_message_to_caller(caller, &user, &body).await?;
        }
        ClientMessage::SendMessageToGroup { user, message } => {
            let (user, body) = chat_arguments(user, message)?;
            hub.send_message_to_group(caller, &user, &body).await?;
        }
        ClientMessage::JoinGroup { group } => {
            hub.add_to_group(caller, &GroupName::new(group)?).await?;
        }
        ClientMessage::LeaveGroup { group } => {
            hub.remove_from_group(caller, &GroupName::new(group)?)
                .await?;
        }
        ClientMessage::CacheLookup { cache, key } => {
            let value = hub.lookup_cache(caller, &cache, &key).await?;
            reply
                .send_frame(&ServerMessage::CacheValue { cache, key, value })
                .await?;
        }
    }
    Ok(())
}

fn chat_arguments(user: String, message: String) -> Result<(UserName, MessageBody), DispatchError> {
    Ok((UserName::new(user)?, MessageBody::new(message)?))
}
