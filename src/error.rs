//! Playground error types

use thiserror::Error;

/// Result type alias using the playground error
pub type Result<T> = std::result::Result<T, PlaygroundError>;

#[derive(Debug, Error)]
pub enum PlaygroundError {
    // ─────────────────────────────────────────────────────────────
    // Session
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Stored session data is corrupt: {0}")]
    CorruptSessionData(String),

    #[error("Not logged in")]
    NotAuthenticated,

    #[error("A login is already in progress")]
    LoginInFlight,

    // ─────────────────────────────────────────────────────────────
    // Playground
    // ─────────────────────────────────────────────────────────────
    #[error("Prompt must not be empty")]
    EmptyPrompt,

    #[error("A generation is already in progress")]
    GenerationInFlight,

    #[error("Unknown model: {0}")]
    UnknownModel(String),

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    // ─────────────────────────────────────────────────────────────
    // Infrastructure
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl PlaygroundError {
    /// Errors caused by the caller's input rather than by the service
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials
                | Self::NotAuthenticated
                | Self::LoginInFlight
                | Self::EmptyPrompt
                | Self::GenerationInFlight
                | Self::UnknownModel(_)
                | Self::InvalidSettings(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_credentials_message() {
        assert_eq!(
            PlaygroundError::InvalidCredentials.to_string(),
            "Invalid email or password"
        );
    }

    #[test]
    fn test_client_error_classification() {
        assert!(PlaygroundError::EmptyPrompt.is_client_error());
        assert!(PlaygroundError::UnknownModel("x".into()).is_client_error());
        assert!(!PlaygroundError::CorruptSessionData("bad".into()).is_client_error());

        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk");
        assert!(!PlaygroundError::from(io).is_client_error());
    }
}
