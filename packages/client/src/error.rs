//! Client error definitions.

use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Errors that end a client session
#[derive(Debug, Error)]
pub enum ClientError {
    /// Could not connect to the hub
    #[error("failed to connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: Box<tungstenite::Error>,
    },

    /// Writing to the socket failed
    #[error("failed to send frame: {0}")]
    Send(#[source] Box<tungstenite::Error>),

    /// Reading from the socket failed
    #[error("connection error: {0}")]
    Receive(#[source] Box<tungstenite::Error>),

    /// A frame could not be encoded
    #[error("failed to encode frame: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors in a typed command line
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The command needs an argument
    #[error("usage: {usage}")]
    MissingArgument { usage: &'static str },

    /// The command does not exist
    #[error("unknown command '{0}' (try /help)")]
    UnknownCommand(String),
}
