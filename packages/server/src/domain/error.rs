//! Domain layer error definitions.

use std::time::Duration;

use thiserror::Error;

use super::value_object::ConnectionId;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// ConnectionId validation error
    #[error("ConnectionId cannot be empty")]
    ConnectionIdEmpty,

    /// ConnectionId too long error
    #[error("ConnectionId cannot exceed {max} characters (got {actual})")]
    ConnectionIdTooLong { max: usize, actual: usize },

    /// GroupName validation error
    #[error("GroupName cannot be empty")]
    GroupNameEmpty,

    /// GroupName too long error
    #[error("GroupName cannot exceed {max} characters (got {actual})")]
    GroupNameTooLong { max: usize, actual: usize },

    /// UserName validation error
    #[error("UserName cannot be empty")]
    UserNameEmpty,

    /// UserName too long error
    #[error("UserName cannot exceed {max} characters (got {actual})")]
    UserNameTooLong { max: usize, actual: usize },

    /// MessageBody validation error
    #[error("MessageBody cannot be empty")]
    MessageBodyEmpty,

    /// MessageBody too long error
    #[error("MessageBody cannot exceed {max} characters (got {actual})")]
    MessageBodyTooLong { max: usize, actual: usize },
}

/// Errors raised by the connection registry.
///
/// Under correct use of the registry by the transport adapter these never occur.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A live connection with the same id is already registered
    #[error("connection '{0}' is already registered")]
    DuplicateConnection(ConnectionId),

    /// No live connection with this id
    #[error("connection '{0}' is not registered")]
    UnknownConnection(ConnectionId),
}

/// Reason a single `ReceiveMessage` delivery failed.
///
/// Recorded per recipient in a delivery report; never aborts a fan-out.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    /// The connection's send channel is closed
    #[error("send channel closed")]
    ChannelClosed,

    /// The send did not complete within the configured bound
    #[error("send timed out after {0:?}")]
    Timeout(Duration),

    /// The connection disappeared between recipient resolution and send
    #[error("connection no longer registered")]
    ConnectionGone,

    /// The outbound frame could not be encoded
    #[error("failed to encode frame: {0}")]
    Encode(String),
}
