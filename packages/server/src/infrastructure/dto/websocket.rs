//! WebSocket frame DTOs for the chat hub.
//!
//! Frames are JSON objects tagged by a kebab-case `type` field.

use serde::{Deserialize, Serialize};

/// Frames sent by a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientMessage {
    /// Broadcast to every connection
    SendMessage { user: String, message: String },
    /// Send back to the invoking connection only
    SendMessageToCaller { user: String, message: String },
    /// Broadcast to the default group
    SendMessageToGroup { user: String, message: String },
    /// Join a group
    JoinGroup { group: String },
    /// Leave a group
    LeaveGroup { group: String },
    /// Resolve `key` from the cache registered as `cache`
    CacheLookup { cache: String, key: String },
}

/// Frames sent by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerMessage {
    /// First frame of every session
    Connected {
        connection_id: String,
        group: String,
    },
    /// Typed `ReceiveMessage(user, message)` client call
    ReceiveMessage { user: String, message: String },
    /// Answer to a cache lookup
    CacheValue {
        cache: String,
        key: String,
        value: String,
    },
    /// A request could not be served; the connection stays open
    Error { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_message_parse_send_message_to_group() {
        // テスト項目: type フィールドでクライアントフレームの種類が決まる
        // given (前提条件):
        let json = r#"{"type":"send-message-to-group","user":"alice","message":"hi"}"#;

        // when (操作):
        let parsed: ClientMessage = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        assert_eq!(
            parsed,
            ClientMessage::SendMessageToGroup {
                user: "alice".to_string(),
                message: "hi".to_string()
            }
        );
    }

    #[test]
    fn test_client_message_unknown_type_fails() {
        // テスト項目: 未知の type は解析エラーになる
        let json = r#"{"type":"invoke","target":"SendMessage","arguments":[]}"#;
        assert!(serde_json::from_str::<ClientMessage>(json).is_err());
    }

    #[test]
    fn test_server_message_connected_shape() {
        // テスト項目: connected フレームの JSON 形式
        // given (前提条件):
        let frame = ServerMessage::Connected {
            connection_id: "abc".to_string(),
            group: "SignalR Users".to_string(),
        };

        // when (操作):
        let value = serde_json::to_value(&frame).unwrap();

        // then (期待する結果):
        assert_eq!(
            value,
            serde_json::json!({
                "type": "connected",
                "connection_id": "abc",
                "group": "SignalR Users"
            })
        );
    }
}
