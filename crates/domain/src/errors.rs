//! Domain and repository error definitions.
//!
//! The `Display` text of every [`DomainError`] is the message shown to end users,
//! so it is kept in the product's display language.

use thiserror::Error;

/// Business rule failures raised by the domain and application layers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{field}: {reason}")]
    InvalidArgument { field: String, reason: String },

    #[error("Usuario no encontrado")]
    UserNotFound,

    #[error("Email o alias ya están en uso")]
    UserAlreadyExists,

    #[error("Publicación no encontrada")]
    PostNotFound,

    #[error("Ya has dado like a esta publicación")]
    AlreadyLiked,

    #[error("No has dado like a esta publicación")]
    LikeNotFound,
}

impl DomainError {
    pub fn invalid_argument(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// `true` for the "resource does not exist" family.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound | Self::PostNotFound | Self::LikeNotFound
        )
    }

    /// `true` for uniqueness violations (duplicate user, duplicate like).
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::UserAlreadyExists | Self::AlreadyLiked)
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

/// Errors reported by record store implementations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,

    /// A unique constraint rejected the write.
    #[error("unique constraint violated")]
    Conflict,

    #[error("storage error: {message}")]
    Storage { message: String },
}

impl RepositoryError {
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}
