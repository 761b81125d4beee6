//! Server configuration.

use std::time::Duration;

use clap::Parser;

/// Typed real-time chat hub server
#[derive(Debug, Clone, Parser)]
#[command(name = "tsudoi-server", version, about, long_about = None)]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 8080)]
    pub port: u16,

    /// Capacity of each connection's outbound channel
    #[arg(long, default_value_t = 64)]
    pub channel_capacity: usize,

    /// Upper bound for a single recipient's send, in milliseconds
    #[arg(long, default_value_t = 5000)]
    pub send_timeout_ms: u64,

    /// Default log level when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl ServerConfig {
    /// `host:port` to bind
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Per-recipient send timeout
    pub fn send_timeout(&self) -> Duration {
        Duration::from_millis(self.send_timeout_ms)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            channel_capacity: 64,
            send_timeout_ms: 5000,
            log_level: "info".to_string(),
        }
    }
}
