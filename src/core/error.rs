use std::time::Duration;

use thiserror::Error;

/// Application-level errors for Ufazien operations.
#[derive(Debug, Error)]
pub enum AppError {
    // Authentication errors
    #[error("Not logged in. Run 'ufazien login' first.")]
    AuthenticationRequired,

    #[error("Authentication failed. Please login again using 'ufazien login'")]
    AuthenticationFailed,

    // Remote platform errors
    #[error("Connection error: {0}")]
    Transport(String),

    #[error("{message}")]
    Remote { status: u16, message: String },

    #[error("Unexpected response from server: {0}")]
    InvalidResponse(String),

    // Provisioning errors
    #[error("Database provisioning failed: {0}")]
    ProvisioningFailed(String),

    #[error("Timeout waiting for '{resource_id}' after {}s. It may still be processing, check status later.", .waited.as_secs())]
    ProvisioningTimeout { resource_id: String, waited: Duration },

    // Packaging and upload errors
    #[error("Error creating ZIP file: {0}")]
    Archive(String),

    #[error("Error uploading files: {0}")]
    Upload(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Returns true for errors that require the user to log in again.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::AuthenticationRequired | Self::AuthenticationFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_displays_server_message() {
        let err = AppError::Remote {
            status: 400,
            message: "Subdomain already taken".into(),
        };
        assert_eq!(err.to_string(), "Subdomain already taken");
    }

    #[test]
    fn test_timeout_message_includes_wait() {
        let err = AppError::ProvisioningTimeout {
            resource_id: "db-1".into(),
            waited: Duration::from_secs(60),
        };
        assert!(err.to_string().contains("after 60s"));
    }

    #[test]
    fn test_is_auth_error() {
        assert!(AppError::AuthenticationRequired.is_auth_error());
        assert!(AppError::AuthenticationFailed.is_auth_error());
        assert!(!AppError::Transport("refused".into()).is_auth_error());
    }
}
