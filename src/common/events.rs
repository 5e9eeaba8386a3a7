use crate::common::types::ChatMessage;
use crate::registry::RegistryError;

/// Sự kiện từ registry service gửi lên UI / shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    Registered {
        username: String,
        confirmation: String,
    },
    RegistrationRejected {
        username: String,
        reason: RegistryError,
    },
    MessageSent(ChatMessage),
    SendRejected {
        sender: String,
        recipient: String,
        reason: RegistryError,
    },
    Inbox {
        username: String,
        messages: Vec<ChatMessage>,
    },
    Outbox {
        username: String,
        messages: Vec<ChatMessage>,
    },
    Conversation {
        first: String,
        second: String,
        messages: Vec<ChatMessage>,
    },
    /// The error names the unknown user
    QueryRejected {
        reason: RegistryError,
    },
}
