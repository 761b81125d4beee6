//! Rendering of server frames for the terminal.

use tsudoi_server::infrastructure::dto::websocket::ServerMessage;
use tsudoi_shared::time::timestamp_to_jst_clock;

/// Render a server frame received at `received_at` (Unix milliseconds)
pub fn render_server_message(message: &ServerMessage, received_at: i64) -> String {
    let clock = timestamp_to_jst_clock(received_at);
    match message {
        ServerMessage::Connected {
            connection_id,
            group,
        } => format!("[{clock}] connected as {connection_id} (joined \"{group}\")"),
        ServerMessage::ReceiveMessage { user, message } => format!("[{clock}] {user}: {message}"),
        ServerMessage::CacheValue { cache, key, value } => {
            format!("[{clock}] cache {cache}/{key}: {value}")
        }
        ServerMessage::Error { message } => format!("[{clock}] error: {message}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2023-01-01T00:00:00+09:00
    const RECEIVED_AT: i64 = 1672498800000;

    #[test]
    fn test_render_receive_message() {
        // テスト項目: receive-message は時刻・ユーザー名・本文で表示される
        // given (前提条件):
        let message = ServerMessage::ReceiveMessage {
            user: "alice".to_string(),
            message: "hi".to_string(),
        };

        // when (操作):
        let rendered = render_server_message(&message, RECEIVED_AT);

        // then (期待する結果):
        assert_eq!(rendered, "[00:00:00] alice: hi");
    }

    #[test]
    fn test_render_error() {
        // テスト項目: error フレームは error: 付きで表示される
        let message = ServerMessage::Error {
            message: "no cache registered as 'huge'".to_string(),
        };
        assert_eq!(
            render_server_message(&message, RECEIVED_AT),
            "[00:00:00] error: no cache registered as 'huge'"
        );
    }
}
