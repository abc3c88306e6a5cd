//! Error types for Leasehub

use thiserror::Error;

/// Result type alias using Leasehub's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Leasehub error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    #[error("{kind} already exists: {id}")]
    AlreadyExists { kind: EntityKind, id: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Catalog is read-only")]
    ReadOnly,

    #[error("Admin credential missing or invalid")]
    Unauthorized,

    #[error("Admin API disabled (no admin token configured)")]
    AdminDisabled,

    #[error("Remote catalog error ({status}): {message}")]
    Remote { status: u16, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Entity named in not-found / conflict errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Unit,
    Building,
    Appointment,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unit => write!(f, "Unit"),
            Self::Building => write!(f, "Building"),
            Self::Appointment => write!(f, "Appointment"),
        }
    }
}

impl Error {
    pub fn unit_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: EntityKind::Unit,
            id: id.into(),
        }
    }

    pub fn building_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: EntityKind::Building,
            id: id.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// True for errors caused by a missing entity rather than I/O
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. }) || matches!(self, Self::Remote { status: 404, .. })
    }
}
