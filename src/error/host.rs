//! Host command errors

use super::StagerError;

/// Creates a host command failure
pub fn command_failed(command: impl Into<String>, reason: impl Into<String>) -> StagerError {
    StagerError::HostCommandFailed {
        command: command.into(),
        reason: reason.into(),
    }
}

/// Creates an empty command template error
pub fn empty_template(name: impl Into<String>) -> StagerError {
    StagerError::EmptyCommandTemplate { name: name.into() }
}
