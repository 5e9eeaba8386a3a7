pub mod commands;
pub mod events;
pub mod types;

pub use commands::RegistryCommand;
pub use events::RegistryEvent;
pub use types::{ChatMessage, DEFAULT_TIMESTAMP_FORMAT};
