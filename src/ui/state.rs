use crate::common::{RegistryCommand, RegistryEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Message,
    System,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaneLine {
    pub kind: LineKind,
    pub text: String,
}

/// Một cột chat: ô tên, trạng thái đăng ký và khung tin nhắn.
#[derive(Debug, Default)]
pub struct Participant {
    pub name_input: String,
    /// Set once the registry confirmed the registration
    pub username: Option<String>,
    /// Name sent with the last `Register` that has no answer yet
    pub pending: Option<String>,
    pub input_text: String,
    pub lines: Vec<PaneLine>,
}

impl Participant {
    fn new(name: &str) -> Self {
        Self {
            name_input: name.to_string(),
            ..Self::default()
        }
    }

    fn push(&mut self, kind: LineKind, text: String) {
        self.lines.push(PaneLine { kind, text });
    }
}

/// Trạng thái cục bộ của UI.
pub struct AppState {
    pub participants: [Participant; 2],
    pub timestamp_format: String,
}

impl AppState {
    pub fn new(names: &[String; 2], timestamp_format: &str) -> Self {
        Self {
            participants: [Participant::new(&names[0]), Participant::new(&names[1])],
            timestamp_format: timestamp_format.to_string(),
        }
    }

    pub fn is_chatting(&self) -> bool {
        self.participants.iter().all(|p| p.username.is_some())
    }

    /// Register commands for every participant not yet registered. Empty or
    /// identical names are refused before reaching the registry.
    pub fn start_chat(&mut self) -> Vec<RegistryCommand> {
        let names = [
            self.participants[0].name_input.trim().to_string(),
            self.participants[1].name_input.trim().to_string(),
        ];

        let mut invalid = false;
        for (participant, name) in self.participants.iter_mut().zip(&names) {
            if participant.username.is_none() && name.is_empty() {
                participant.push(LineKind::Error, "Please enter a username.".to_string());
                invalid = true;
            }
        }
        if invalid {
            return Vec::new();
        }
        if names[0] == names[1] {
            self.participants[1].push(
                LineKind::Error,
                "Both participants need different usernames.".to_string(),
            );
            return Vec::new();
        }

        self.participants
            .iter_mut()
            .zip(names)
            .filter(|(participant, _)| {
                participant.username.is_none() && participant.pending.is_none()
            })
            .map(|(participant, username)| {
                participant.pending = Some(username.clone());
                RegistryCommand::Register { username }
            })
            .collect()
    }

    /// Take the input of column `index` as a message to the other participant.
    pub fn compose(&mut self, index: usize) -> Option<RegistryCommand> {
        let recipient = self.participants[1 - index].username.clone()?;
        let participant = &mut self.participants[index];
        let sender = participant.username.clone()?;

        if participant.input_text.trim().is_empty() {
            return None;
        }
        let body = std::mem::take(&mut participant.input_text);

        Some(RegistryCommand::Send {
            sender,
            recipient,
            body,
        })
    }

    pub fn apply_event(&mut self, event: RegistryEvent) {
        match event {
            RegistryEvent::Registered {
                username,
                confirmation,
            } => {
                if let Some(participant) = self.pending_mut(&username) {
                    participant.pending = None;
                    participant.username = Some(username);
                    participant.push(LineKind::System, confirmation);
                }
            }
            RegistryEvent::RegistrationRejected { username, reason } => {
                if let Some(participant) = self.pending_mut(&username) {
                    participant.pending = None;
                    participant.push(LineKind::Error, reason.to_string());
                }
            }
            RegistryEvent::MessageSent(message) => {
                let line = message.display_line(&self.timestamp_format);
                for participant in &mut self.participants {
                    let involved = participant.username.as_deref() == Some(message.sender.as_str())
                        || participant.username.as_deref() == Some(message.recipient.as_str());
                    if involved {
                        participant.push(LineKind::Message, line.clone());
                    }
                }
            }
            RegistryEvent::SendRejected { sender, reason, .. } => {
                if let Some(participant) = self
                    .participants
                    .iter_mut()
                    .find(|p| p.username.as_deref() == Some(sender.as_str()))
                {
                    participant.push(LineKind::Error, reason.to_string());
                }
            }
            other => log::debug!("Ignoring registry event in UI: {other:?}"),
        }
    }

    /// Undo what `start_chat`/`compose` did for a command that never reached
    /// the registry.
    pub fn command_failed(&mut self, command: RegistryCommand, reason: &str) {
        match command {
            RegistryCommand::Register { username } => {
                if let Some(participant) = self.pending_mut(&username) {
                    participant.pending = None;
                    participant.push(
                        LineKind::Error,
                        format!("Could not register {username}: {reason}"),
                    );
                }
            }
            RegistryCommand::Send { sender, body, .. } => {
                if let Some(participant) = self
                    .participants
                    .iter_mut()
                    .find(|p| p.username.as_deref() == Some(sender.as_str()))
                {
                    if participant.input_text.is_empty() {
                        participant.input_text = body;
                    }
                    participant.push(
                        LineKind::Error,
                        format!("Message not sent: {reason}"),
                    );
                }
            }
            other => log::debug!("Dropped UI command: {other:?}"),
        }
    }

    fn pending_mut(&mut self, username: &str) -> Option<&mut Participant> {
        self.participants
            .iter_mut()
            .find(|p| p.pending.as_deref() == Some(username))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::DEFAULT_TIMESTAMP_FORMAT;
    use crate::registry::{Registry, RegistryError};

    fn state(first: &str, second: &str) -> AppState {
        AppState::new(
            &[first.to_string(), second.to_string()],
            DEFAULT_TIMESTAMP_FORMAT,
        )
    }

    /// Feed commands straight into a registry, the way the service would.
    fn run(registry: &mut Registry, state: &mut AppState, commands: Vec<RegistryCommand>) {
        for command in commands {
            let event = match command {
                RegistryCommand::Register { username } => match registry.register(&username) {
                    Ok(confirmation) => RegistryEvent::Registered {
                        username,
                        confirmation,
                    },
                    Err(reason) => RegistryEvent::RegistrationRejected { username, reason },
                },
                RegistryCommand::Send {
                    sender,
                    recipient,
                    body,
                } => match registry.send(&sender, &recipient, &body) {
                    Ok(message) => RegistryEvent::MessageSent(message),
                    Err(reason) => RegistryEvent::SendRejected {
                        sender,
                        recipient,
                        reason,
                    },
                },
                other => panic!("UI issued unexpected command {other:?}"),
            };
            state.apply_event(event);
        }
    }

    #[test]
    fn start_chat_trims_and_registers_both() {
        let mut state = state("  Alice ", "Bob");
        let commands = state.start_chat();
        assert_eq!(
            commands,
            vec![
                RegistryCommand::Register {
                    username: "Alice".to_string()
                },
                RegistryCommand::Register {
                    username: "Bob".to_string()
                },
            ]
        );
        assert!(!state.is_chatting());

        let mut registry = Registry::with_system_clock();
        run(&mut registry, &mut state, commands);
        assert!(state.is_chatting());
        assert_eq!(
            state.participants[0].lines[0].text,
            "Alice registered successfully."
        );
    }

    #[test]
    fn start_chat_refuses_empty_or_identical_names() {
        let mut blank = state(" ", "Bob");
        assert!(blank.start_chat().is_empty());
        assert_eq!(blank.participants[0].lines[0].kind, LineKind::Error);

        let mut same = state("Alice", " Alice");
        assert!(same.start_chat().is_empty());
        assert_eq!(same.participants[1].lines.len(), 1);
    }

    #[test]
    fn rejected_registration_can_be_retried() {
        let mut registry = Registry::with_system_clock();
        registry.register("Alice").unwrap();

        let mut state = state("Alice", "Bob");
        let commands = state.start_chat();
        run(&mut registry, &mut state, commands);

        assert_eq!(state.participants[0].username, None);
        assert_eq!(
            state.participants[0].lines[0].text,
            RegistryError::DuplicateUser("Alice".to_string()).to_string()
        );
        assert_eq!(state.participants[1].username.as_deref(), Some("Bob"));

        state.participants[0].name_input = "Alicia".to_string();
        let retry = state.start_chat();
        assert_eq!(
            retry,
            vec![RegistryCommand::Register {
                username: "Alicia".to_string()
            }]
        );
        run(&mut registry, &mut state, retry);
        assert!(state.is_chatting());
    }

    #[test]
    fn sent_message_appears_in_both_panes() {
        let mut registry = Registry::with_system_clock();
        let mut state = state("Alice", "Bob");
        let commands = state.start_chat();
        run(&mut registry, &mut state, commands);

        state.participants[0].input_text = "Hello Bob!".to_string();
        let send = state.compose(0).unwrap();
        assert_eq!(
            send,
            RegistryCommand::Send {
                sender: "Alice".to_string(),
                recipient: "Bob".to_string(),
                body: "Hello Bob!".to_string(),
            }
        );
        assert!(state.participants[0].input_text.is_empty());
        run(&mut registry, &mut state, vec![send]);

        for participant in &state.participants {
            let last = participant.lines.last().unwrap();
            assert_eq!(last.kind, LineKind::Message);
            assert!(last.text.ends_with("Alice: Hello Bob!"));
        }
        assert_eq!(registry.messages_for("Bob").unwrap().len(), 1);
    }

    #[test]
    fn compose_needs_registration_and_text() {
        let mut state = state("Alice", "Bob");
        state.participants[0].input_text = "early".to_string();
        assert_eq!(state.compose(0), None);

        let mut registry = Registry::with_system_clock();
        let commands = state.start_chat();
        run(&mut registry, &mut state, commands);

        state.participants[1].input_text = "   ".to_string();
        assert_eq!(state.compose(1), None);
    }

    #[test]
    fn send_rejection_lands_in_sender_pane() {
        let mut state = state("Alice", "Bob");
        let commands = state.start_chat();
        let mut registry = Registry::with_system_clock();
        run(&mut registry, &mut state, commands);

        state.apply_event(RegistryEvent::SendRejected {
            sender: "Bob".to_string(),
            recipient: "Alice".to_string(),
            reason: RegistryError::UnknownUser("Alice".to_string()),
        });
        assert_eq!(state.participants[1].lines.last().unwrap().kind, LineKind::Error);
        assert_eq!(state.participants[0].lines.len(), 1);
    }

    #[test]
    fn failed_register_clears_pending() {
        let mut state = state("Alice", "Bob");
        let mut commands = state.start_chat();
        assert_eq!(state.participants[1].pending.as_deref(), Some("Bob"));

        let bob = commands.pop().unwrap();
        state.command_failed(bob, "channel closed");
        assert_eq!(state.participants[1].pending, None);
        assert_eq!(state.participants[1].username, None);
        assert_eq!(state.participants[1].lines.last().unwrap().kind, LineKind::Error);

        // Only Bob is retried, Alice still waits for her answer
        assert_eq!(
            state.start_chat(),
            vec![RegistryCommand::Register {
                username: "Bob".to_string()
            }]
        );
    }

    #[test]
    fn failed_send_restores_the_text() {
        let mut registry = Registry::with_system_clock();
        let mut state = state("Alice", "Bob");
        let commands = state.start_chat();
        run(&mut registry, &mut state, commands);

        state.participants[0].input_text = "Hello Bob!".to_string();
        let send = state.compose(0).unwrap();
        assert!(state.participants[0].input_text.is_empty());

        state.command_failed(send, "channel full");
        assert_eq!(state.participants[0].input_text, "Hello Bob!");
        let last = state.participants[0].lines.last().unwrap();
        assert_eq!(last.kind, LineKind::Error);
        assert_eq!(last.text, "Message not sent: channel full");
        assert_eq!(state.participants[1].lines.len(), 1);
        assert_eq!(registry.log_len(), 0);
    }
}
