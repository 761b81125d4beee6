//! Test fixtures shared by the integration tests.
//!
//! `TestServer` runs the full router in-process on an ephemeral port;
//! `WsClient` is a thin JSON-frame client on top of tokio-tungstenite.

#![allow(dead_code)]

use std::{sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::{net::TcpStream, task::JoinHandle};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};
use tsudoi_server::{ServerConfig, build_hub, create_app, ui::state::AppState};

const RECV_TIMEOUT: Duration = Duration::from_secs(2);

pub struct TestServer {
    addr: std::net::SocketAddr,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Self {
        let config = ServerConfig {
            port: 0,
            send_timeout_ms: 500,
            ..ServerConfig::default()
        };
        let state = Arc::new(AppState {
            hub: build_hub(&config),
            channel_capacity: config.channel_capacity,
        });
        let app = create_app(state);

        let listener = tokio::net::TcpListener::bind(config.bind_address())
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local address");
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server failed");
        });

        Self { addr, handle }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/chat", self.addr)
    }

    /// Poll `/api/hub` until `predicate` holds or the timeout expires
    pub async fn wait_for_hub(&self, predicate: impl Fn(&Value) -> bool) -> Value {
        let client = reqwest::Client::new();
        let deadline = tokio::time::Instant::now() + RECV_TIMEOUT;
        loop {
            let body: Value = client
                .get(format!("{}/api/hub", self.base_url()))
                .send()
                .await
                .expect("Failed to send request")
                .json()
                .await
                .expect("Failed to parse JSON");
            if predicate(&body) || tokio::time::Instant::now() >= deadline {
                return body;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub struct WsClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    pub connection_id: String,
}

impl WsClient {
    /// Connect and consume the `connected` frame
    pub async fn connect(server: &TestServer) -> Self {
        let (stream, _) = connect_async(server.ws_url())
            .await
            .expect("Failed to connect");
        let mut client = Self {
            stream,
            connection_id: String::new(),
        };

        let connected = client.recv_json().await;
        assert_eq!(connected["type"], "connected");
        assert_eq!(connected["group"], "SignalR Users");
        client.connection_id = connected["connection_id"]
            .as_str()
            .expect("connection_id should be a string")
            .to_string();
        client
    }

    pub async fn send_json(&mut self, value: Value) {
        self.send_text(value.to_string()).await;
    }

    pub async fn send_text(&mut self, text: String) {
        self.stream
            .send(Message::Text(text.into()))
            .await
            .expect("Failed to send frame");
    }

    pub async fn recv_json(&mut self) -> Value {
        loop {
            let msg = tokio::time::timeout(RECV_TIMEOUT, self.stream.next())
                .await
                .expect("Timed out waiting for a frame")
                .expect("Stream ended")
                .expect("WebSocket error");
            if let Message::Text(text) = msg {
                return serde_json::from_str(text.as_str()).expect("Frame is not JSON");
            }
        }
    }

    /// Assert that no text frame arrives within `wait`
    pub async fn expect_silence(&mut self, wait: Duration) {
        if let Ok(Some(Ok(Message::Text(text)))) =
            tokio::time::timeout(wait, self.stream.next()).await
        {
            panic!("Unexpected frame: {}", text.as_str());
        }
    }

    pub async fn close(mut self) {
        self.stream.close(None).await.expect("Failed to close");
    }
}
