//! Request validation and credential errors

use super::StagerError;

/// Creates a validation error
pub fn invalid(message: impl Into<String>) -> StagerError {
    StagerError::Validation {
        message: message.into(),
    }
}

/// Creates a credential generation error
pub fn credential_failed(reason: impl Into<String>) -> StagerError {
    StagerError::CredentialGeneration {
        reason: reason.into(),
    }
}
