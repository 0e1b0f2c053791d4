//! Settings file errors

use super::StagerError;

/// Creates a settings read failed error
pub fn read_failed(path: impl Into<String>, reason: impl Into<String>) -> StagerError {
    StagerError::SettingsReadFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a settings parse failed error
pub fn parse_failed(path: impl Into<String>, reason: impl Into<String>) -> StagerError {
    StagerError::SettingsParseFailed {
        path: path.into(),
        reason: reason.into(),
    }
}
