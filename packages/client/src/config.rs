//! Client configuration.

use clap::Parser;

/// CLI chat client for the Tsudoi hub
#[derive(Debug, Clone, Parser)]
#[command(name = "tsudoi-client", version, about, long_about = None)]
pub struct ClientConfig {
    /// WebSocket endpoint of the hub
    #[arg(long, default_value = "ws://127.0.0.1:8080/chat")]
    pub url: String,

    /// Display name sent with every message
    #[arg(short, long)]
    pub user: String,

    /// Default log level when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_requires_user() {
        // テスト項目: --user は必須
        let result = ClientConfig::try_parse_from(["tsudoi-client"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_defaults() {
        // テスト項目: URL の既定値はローカルのハブ
        // when (操作):
        let config = ClientConfig::parse_from(["tsudoi-client", "-u", "alice"]);

        // then (期待する結果):
        assert_eq!(config.url, "ws://127.0.0.1:8080/chat");
        assert_eq!(config.user, "alice");
    }
}
