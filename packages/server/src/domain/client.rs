//! Client-facing typed contract.
//!
//! The server invokes these methods on a connected client. The transport
//! decides how a call is carried over the wire.

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::{
    error::DeliveryError,
    value_object::{MessageBody, UserName},
};

/// Methods the server can invoke on a connected client.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Deliver a chat message to the client.
    ///
    /// Resolves once the call is accepted by the connection's send channel.
    async fn receive_message(
        &self,
        user: &UserName,
        message: &MessageBody,
    ) -> Result<(), DeliveryError>;
}
