use std::fmt::Write;

use chrono::{DateTime, Local, SecondsFormat, Utc};
use serde::Serialize;

/// Mirrors the `toLocaleString()` shape: `5/13/2024, 12:00:00 PM`.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// A sent message. Immutable once the registry has created it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub id: String,
    pub sender: String,
    pub recipient: String,
    pub body: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Timestamp rendered in the local timezone. Falls back to RFC 3339 when
    /// `format` holds a specifier chrono cannot render.
    pub fn timestamp_label(&self, format: &str) -> String {
        let mut label = String::new();
        let local = self.timestamp.with_timezone(&Local);
        match write!(label, "{}", local.format(format)) {
            Ok(()) => label,
            Err(_) => local.to_rfc3339_opts(SecondsFormat::Secs, false),
        }
    }

    /// One display line, as appended to a chat pane or printed by the shell.
    pub fn display_line(&self, format: &str) -> String {
        format!(
            "[{}] {}: {}",
            self.timestamp_label(format),
            self.sender,
            self.body
        )
    }
}
