//! Parsing of typed input lines into hub frames.

use tsudoi_server::infrastructure::dto::websocket::ClientMessage;

use crate::error::CommandError;

/// Help text printed by `/help`
pub const HELP: &str = "\
<text>               send to everyone
/caller <text>       send back to yourself only
/group <text>        send to the \"SignalR Users\" group
/join <group>        join a group
/leave <group>       leave a group
/cache <name> <key>  resolve a key from the \"small\" or \"big\" cache
/help                show this help
/quit                leave the chat";

/// What a typed line asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Send a frame to the hub
    Frame(ClientMessage),
    /// Print the help text
    Help,
    /// End the session
    Quit,
}

/// Parse a typed line. Blank lines yield `None`.
pub fn parse_line(line: &str, user: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let Some(rest) = line.strip_prefix('/') else {
        return Ok(Some(Command::Frame(ClientMessage::SendMessage {
            user: user.to_string(),
            message: line.to_string(),
        })));
    };

    let (name, argument) = match rest.split_once(char::is_whitespace) {
        Some((name, argument)) => (name, argument.trim()),
        None => (rest, ""),
    };

    let command = match name {
        "caller" => Command::Frame(ClientMessage::SendMessageToCaller {
            user: user.to_string(),
            message: required(argument, "/caller <text>")?,
        }),
        "group" => Command::Frame(ClientMessage::SendMessageToGroup {
            user: user.to_string(),
            message: required(argument, "/group <text>")?,
        }),
        "join" => Command::Frame(ClientMessage::JoinGroup {
            group: required(argument, "/join <group>")?,
        }),
        "leave" => Command::Frame(ClientMessage::LeaveGroup {
            group: required(argument, "/leave <group>")?,
        }),
        "cache" => {
            let usage = "/cache <name> <key>";
            let (cache, key) = argument
                .split_once(char::is_whitespace)
                .ok_or(CommandError::MissingArgument { usage })?;
            Command::Frame(ClientMessage::CacheLookup {
                cache: cache.to_string(),
                key: required(key.trim(), usage)?,
            })
        }
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(CommandError::UnknownCommand(other.to_string())),
    };
    Ok(Some(command))
}

fn required(argument: &str, usage: &'static str) -> Result<String, CommandError> {
    if argument.is_empty() {
        return Err(CommandError::MissingArgument { usage });
    }
    Ok(argument.to_string())
}
