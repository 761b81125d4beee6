//! CLI chat client for the Tsudoi hub.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin tsudoi-client -- --user alice
//! ```

use clap::Parser;
use tsudoi_client::ClientConfig;
use tsudoi_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    let config = ClientConfig::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &config.log_level);

    if let Err(e) = tsudoi_client::run_client(config).await {
        tracing::error!("Client error: {}", e);
        eprintln!("{e}");
        std::process::exit(1);
    }
}
