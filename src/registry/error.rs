/// Errors returned by registry operations. A failed operation leaves the
/// registry exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("{0} already exists. Please choose another username.")]
    DuplicateUser(String),
    #[error("{0} does not exist.")]
    UnknownUser(String),
}

impl RegistryError {
    /// Variant name, as reported in JSON outcomes.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DuplicateUser(_) => "DuplicateUser",
            Self::UnknownUser(_) => "UnknownUser",
        }
    }

    /// The username the error is about.
    pub fn username(&self) -> &str {
        match self {
            Self::DuplicateUser(name) | Self::UnknownUser(name) => name,
        }
    }
}
