//! Client session loop.

use futures_util::{SinkExt, StreamExt};
use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tsudoi_server::infrastructure::dto::websocket::ServerMessage;
use tsudoi_shared::time::get_jst_timestamp;

use crate::{
    command::{Command, HELP, parse_line},
    config::ClientConfig,
    error::ClientError,
    render::render_server_message,
};

/// Connect to the hub and run until `/quit`, Ctrl+C, EOF or server close
pub async fn run_client(config: ClientConfig) -> Result<(), ClientError> {
    let (stream, _) =
        connect_async(config.url.as_str())
            .await
            .map_err(|source| ClientError::Connect {
                url: config.url.clone(),
                source: Box::new(source),
            })?;
    tracing::info!("Connected to {}", config.url);
    println!("Type /help for commands.");

    let (mut sink, mut source) = stream.split();
    let mut lines = spawn_line_reader(format!("{}> ", config.user));

    loop {
        tokio::select! {
            incoming = source.next() => match incoming {
                Some(Ok(Message::Text(text))) => print_frame(text.as_str()),
                Some(Ok(Message::Close(_))) | None => {
                    println!("Connection closed by server.");
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(ClientError::Receive(Box::new(e))),
            },
            line = lines.recv() => {
                // Reader thread ended (Ctrl+C or EOF)
                let Some(line) = line else {
                    break;
                };
                match parse_line(&line, &config.user) {
                    Ok(None) => {}
                    Ok(Some(Command::Help)) => println!("{HELP}"),
                    Ok(Some(Command::Quit)) => break,
                    Ok(Some(Command::Frame(frame))) => {
                        let json = serde_json::to_string(&frame)?;
                        sink.send(Message::Text(json.into()))
                            .await
                            .map_err(|e| ClientError::Send(Box::new(e)))?;
                    }
                    Err(e) => println!("{e}"),
                }
            }
        }
    }

    if let Err(e) = sink.close().await {
        tracing::debug!("Failed to close socket cleanly: {}", e);
    }
    Ok(())
}

fn print_frame(text: &str) {
    match serde_json::from_str::<ServerMessage>(text) {
        Ok(message) => println!("{}", render_server_message(&message, get_jst_timestamp())),
        Err(e) => tracing::warn!("Ignoring unexpected frame ({}): {}", e, text),
    }
}

/// Read lines on a dedicated thread; rustyline blocks
fn spawn_line_reader(prompt: String) -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        let mut editor = match DefaultEditor::new() {
            Ok(editor) => editor,
            Err(e) => {
                tracing::error!("Failed to start line editor: {}", e);
                return;
            }
        };

        loop {
            match editor.readline(&prompt) {
                Ok(line) => {
                    let _ = editor.add_history_entry(line.as_str());
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
                Err(e) => {
                    tracing::error!("Failed to read line: {}", e);
                    break;
                }
            }
        }
    });
    rx
}
