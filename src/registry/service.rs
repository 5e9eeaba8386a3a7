use tokio::sync::mpsc;

use crate::common::{RegistryCommand, RegistryEvent};

use super::Registry;

/// Owns a [`Registry`] and applies commands one at a time, so every
/// check-then-act step is atomic no matter how many senders share the
/// command channel.
pub struct RegistryService {
    registry: Registry,
    event_sender: mpsc::Sender<RegistryEvent>,
    command_receiver: mpsc::Receiver<RegistryCommand>,
}

impl RegistryService {
    pub fn new(
        registry: Registry,
        event_sender: mpsc::Sender<RegistryEvent>,
        command_receiver: mpsc::Receiver<RegistryCommand>,
    ) -> Self {
        Self {
            registry,
            event_sender,
            command_receiver,
        }
    }

    /// Runs until every command sender is dropped, then hands the registry
    /// back.
    pub async fn run(mut self) -> Registry {
        log::info!("Registry service started");

        while let Some(command) = self.command_receiver.recv().await {
            let event = self.handle_command(command);
            if let Err(err) = self.event_sender.send(event).await {
                log::warn!("Failed to deliver registry event: {err}");
            }
        }

        log::info!(
            "Registry service stopped ({} users, {} messages)",
            self.registry.user_count(),
            self.registry.log_len()
        );
        self.registry
    }

    fn handle_command(&mut self, command: RegistryCommand) -> RegistryEvent {
        match command {
            RegistryCommand::Register { username } => match self.registry.register(&username) {
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
            } => match self.registry.send(&sender, &recipient, &body) {
                Ok(message) => RegistryEvent::MessageSent(message),
                Err(reason) => RegistryEvent::SendRejected {
                    sender,
                    recipient,
                    reason,
                },
            },
            RegistryCommand::MessagesFor { username } => {
                match self.registry.messages_for(&username) {
                    Ok(messages) => RegistryEvent::Inbox { username, messages },
                    Err(reason) => RegistryEvent::QueryRejected { reason },
                }
            }
            RegistryCommand::MessagesFrom { username } => {
                match self.registry.messages_from(&username) {
                    Ok(messages) => RegistryEvent::Outbox { username, messages },
                    Err(reason) => RegistryEvent::QueryRejected { reason },
                }
            }
            RegistryCommand::Conversation { first, second } => {
                match self.registry.conversation(&first, &second) {
                    Ok(messages) => RegistryEvent::Conversation {
                        first,
                        second,
                        messages,
                    },
                    Err(reason) => RegistryEvent::QueryRejected { reason },
                }
            }
        }
    }
}
