pub mod clock;
pub mod error;
pub mod service;

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::common::ChatMessage;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::RegistryError;
pub use service::RegistryService;

/// In-memory users, inboxes and the chronological message log.
///
/// Each inbox stores indices into `log`, so an inbox is always the
/// subsequence of the log addressed to that user.
pub struct Registry {
    users: BTreeMap<String, Vec<usize>>,
    log: Vec<ChatMessage>,
    clock: Box<dyn Clock>,
}

impl Registry {
    pub fn new(clock: Box<dyn Clock>) -> Self {
        Self {
            users: BTreeMap::new(),
            log: Vec::new(),
            clock,
        }
    }

    pub fn with_system_clock() -> Self {
        Self::new(Box::new(SystemClock))
    }

    /// Add a user with an empty inbox. Returns the confirmation text.
    pub fn register(&mut self, username: &str) -> Result<String, RegistryError> {
        if self.users.contains_key(username) {
            log::info!("Registration rejected, `{username}` already taken");
            return Err(RegistryError::DuplicateUser(username.to_string()));
        }

        self.users.insert(username.to_string(), Vec::new());
        log::debug!("Registered `{username}` ({} users)", self.users.len());
        Ok(format!("{username} registered successfully."))
    }

    /// Deliver `body` from `sender` to `recipient`.
    ///
    /// The message goes to the log and the recipient's inbox only; the
    /// sender's inbox is not touched. Use [`Registry::messages_from`] for the
    /// sent view.
    pub fn send(
        &mut self,
        sender: &str,
        recipient: &str,
        body: &str,
    ) -> Result<ChatMessage, RegistryError> {
        self.ensure_registered(sender)?;
        self.ensure_registered(recipient)?;

        let message = ChatMessage {
            id: Uuid::new_v4().to_string(),
            sender: sender.to_string(),
            recipient: recipient.to_string(),
            body: body.to_string(),
            timestamp: self.clock.now(),
        };

        let index = self.log.len();
        self.log.push(message.clone());
        if let Some(inbox) = self.users.get_mut(recipient) {
            inbox.push(index);
        }

        log::debug!("Message {} from `{sender}` to `{recipient}`", message.id);
        Ok(message)
    }

    /// Copy of the user's inbox, oldest first.
    pub fn messages_for(&self, username: &str) -> Result<Vec<ChatMessage>, RegistryError> {
        let inbox = self
            .users
            .get(username)
            .ok_or_else(|| RegistryError::UnknownUser(username.to_string()))?;

        Ok(inbox.iter().map(|&index| self.log[index].clone()).collect())
    }

    /// Messages the user has sent, oldest first.
    pub fn messages_from(&self, username: &str) -> Result<Vec<ChatMessage>, RegistryError> {
        self.ensure_registered(username)?;
        Ok(self
            .log
            .iter()
            .filter(|message| message.sender == username)
            .cloned()
            .collect())
    }

    /// Messages exchanged between two users in either direction, oldest first.
    pub fn conversation(
        &self,
        first: &str,
        second: &str,
    ) -> Result<Vec<ChatMessage>, RegistryError> {
        self.ensure_registered(first)?;
        self.ensure_registered(second)?;
        Ok(self
            .log
            .iter()
            .filter(|message| {
                (message.sender == first && message.recipient == second)
                    || (message.sender == second && message.recipient == first)
            })
            .cloned()
            .collect())
    }

    #[cfg(test)]
    pub fn log(&self) -> &[ChatMessage] {
        &self.log
    }

    pub fn log_len(&self) -> usize {
        self.log.len()
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn is_registered(&self, username: &str) -> bool {
        self.users.contains_key(username)
    }

    fn ensure_registered(&self, username: &str) -> Result<(), RegistryError> {
        if self.is_registered(username) {
            Ok(())
        } else {
            log::info!("Unknown user `{username}`");
            Err(RegistryError::UnknownUser(username.to_string()))
        }
    }
}
