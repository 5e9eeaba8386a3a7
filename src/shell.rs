use std::error::Error;

use chrono::Utc;
use serde_json::json;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::common::{ChatMessage, RegistryCommand, RegistryEvent};
use crate::registry::{FixedClock, Registry};

const USAGE: &str = "commands: register <name> | send <from> <to> <text...> | inbox <name> | \
                     sent <name> | conversation <a> <b> | help | quit";

#[derive(Debug, PartialEq, Eq)]
pub enum ShellInput {
    Command(RegistryCommand),
    Help,
    Quit,
    Empty,
}

/// Parse one shell line. Names are single whitespace-separated words; the
/// message text of `send` is the rest of the line.
pub fn parse_line(line: &str) -> Result<ShellInput, String> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim_start()),
        None => (line, ""),
    };
    let mut args = rest.split_whitespace();

    let input = match verb {
        "" => ShellInput::Empty,
        "help" => ShellInput::Help,
        "quit" | "exit" => ShellInput::Quit,
        "register" => ShellInput::Command(RegistryCommand::Register {
            username: single_arg(&mut args, "register <name>")?,
        }),
        "inbox" => ShellInput::Command(RegistryCommand::MessagesFor {
            username: single_arg(&mut args, "inbox <name>")?,
        }),
        "sent" => ShellInput::Command(RegistryCommand::MessagesFrom {
            username: single_arg(&mut args, "sent <name>")?,
        }),
        "conversation" => {
            let (first, second) = match (args.next(), args.next(), args.next()) {
                (Some(first), Some(second), None) => (first, second),
                _ => return Err("usage: conversation <a> <b>".to_string()),
            };
            ShellInput::Command(RegistryCommand::Conversation {
                first: first.to_string(),
                second: second.to_string(),
            })
        }
        "send" => {
            let mut parts = rest.splitn(3, char::is_whitespace);
            match (parts.next(), parts.next(), parts.next()) {
                (Some(sender), Some(recipient), Some(body))
                    if !sender.is_empty() && !recipient.is_empty() =>
                {
                    ShellInput::Command(RegistryCommand::Send {
                        sender: sender.to_string(),
                        recipient: recipient.to_string(),
                        body: body.trim_start().to_string(),
                    })
                }
                _ => return Err("usage: send <from> <to> <text...>".to_string()),
            }
        }
        other => return Err(format!("unknown command `{other}`; {USAGE}")),
    };

    Ok(input)
}

fn single_arg<'a>(
    args: &mut impl Iterator<Item = &'a str>,
    usage: &str,
) -> Result<String, String> {
    match (args.next(), args.next()) {
        (Some(name), None) => Ok(name.to_string()),
        _ => Err(format!("usage: {usage}")),
    }
}

/// Render a registry outcome for the terminal.
pub fn format_event(event: &RegistryEvent, as_json: bool, timestamp_format: &str) -> String {
    if as_json {
        return event_json(event).to_string();
    }

    match event {
        RegistryEvent::Registered { confirmation, .. } => confirmation.clone(),
        RegistryEvent::RegistrationRejected { reason, .. }
        | RegistryEvent::QueryRejected { reason, .. } => format!("error: {reason}"),
        RegistryEvent::SendRejected {
            sender,
            recipient,
            reason,
        } => format!("error: {reason} ({sender} -> {recipient})"),
        RegistryEvent::MessageSent(_) => "Message sent successfully.".to_string(),
        RegistryEvent::Inbox { username, messages } => {
            message_list(&format!("inbox of {username}"), messages, timestamp_format)
        }
        RegistryEvent::Outbox { username, messages } => {
            message_list(&format!("sent by {username}"), messages, timestamp_format)
        }
        RegistryEvent::Conversation {
            first,
            second,
            messages,
        } => message_list(
            &format!("conversation {first} <-> {second}"),
            messages,
            timestamp_format,
        ),
    }
}

fn message_list(title: &str, messages: &[ChatMessage], timestamp_format: &str) -> String {
    if messages.is_empty() {
        return format!("{title}: (no messages)");
    }

    let mut out = format!("{title}:");
    for message in messages {
        out.push_str(&format!(
            "\n  {} -> {}",
            message.display_line(timestamp_format),
            message.recipient
        ));
    }
    out
}

fn event_json(event: &RegistryEvent) -> serde_json::Value {
    match event {
        RegistryEvent::Registered { confirmation, .. } => {
            json!({ "ok": true, "message": confirmation })
        }
        RegistryEvent::RegistrationRejected { reason, .. }
        | RegistryEvent::SendRejected { reason, .. }
        | RegistryEvent::QueryRejected { reason } => json!({
            "ok": false,
            "error": reason.kind(),
            "user": reason.username(),
            "message": reason.to_string(),
        }),
        RegistryEvent::MessageSent(message) => json!({ "ok": true, "sent": message }),
        RegistryEvent::Inbox { messages, .. }
        | RegistryEvent::Outbox { messages, .. }
        | RegistryEvent::Conversation { messages, .. } => {
            json!({ "ok": true, "messages": messages })
        }
    }
}

/// Read commands from stdin until EOF or `quit`, forwarding them to the
/// registry service and printing each outcome.
pub async fn run_shell(
    command_sender: mpsc::Sender<RegistryCommand>,
    mut event_receiver: mpsc::Receiver<RegistryEvent>,
    as_json: bool,
    timestamp_format: &str,
) -> Result<(), Box<dyn Error>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("{USAGE}");

    while let Some(line) = lines.next_line().await? {
        let command = match parse_line(&line) {
            Ok(ShellInput::Command(command)) => command,
            Ok(ShellInput::Help) => {
                println!("{USAGE}");
                continue;
            }
            Ok(ShellInput::Quit) => break,
            Ok(ShellInput::Empty) => continue,
            Err(hint) => {
                eprintln!("{hint}");
                continue;
            }
        };

        command_sender.send(command).await?;
        match event_receiver.recv().await {
            Some(event) => println!("{}", format_event(&event, as_json, timestamp_format)),
            None => {
                log::error!("Registry service stopped unexpectedly");
                break;
            }
        }
    }

    Ok(())
}

/// Scripted Alice/Bob walkthrough against a fresh registry.
pub fn run_demo(as_json: bool, timestamp_format: &str) {
    let mut registry = Registry::new(Box::new(FixedClock(Utc::now())));

    for username in ["Alice", "Bob", "Alice"] {
        let event = match registry.register(username) {
            Ok(confirmation) => RegistryEvent::Registered {
                username: username.to_string(),
                confirmation,
            },
            Err(reason) => RegistryEvent::RegistrationRejected {
                username: username.to_string(),
                reason,
            },
        };
        println!("{}", format_event(&event, as_json, timestamp_format));
    }

    for (sender, recipient, body) in [
        ("Alice", "Bob", "Hello Bob!"),
        ("Bob", "Alice", "Hi Alice!"),
        ("Carol", "Bob", "hi"),
    ] {
        let event = match registry.send(sender, recipient, body) {
            Ok(message) => RegistryEvent::MessageSent(message),
            Err(reason) => RegistryEvent::SendRejected {
                sender: sender.to_string(),
                recipient: recipient.to_string(),
                reason,
            },
        };
        println!("{}", format_event(&event, as_json, timestamp_format));
    }

    for username in ["Alice", "Bob"] {
        let event = match registry.messages_for(username) {
            Ok(messages) => RegistryEvent::Inbox {
                username: username.to_string(),
                messages,
            },
            Err(reason) => RegistryEvent::QueryRejected { reason },
        };
        println!("{}", format_event(&event, as_json, timestamp_format));
    }

    log::info!("Demo finished with {} messages in the log", registry.log_len());
}
