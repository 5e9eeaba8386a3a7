/// Lệnh UI (hoặc shell) gửi xuống registry service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryCommand {
    Register {
        username: String,
    },
    Send {
        sender: String,
        recipient: String,
        body: String,
    },
    /// Inbox của một user (tin nhắn user đó nhận được)
    MessagesFor {
        username: String,
    },
    /// Tin nhắn user đã gửi
    MessagesFrom {
        username: String,
    },
    Conversation {
        first: String,
        second: String,
    },
}
