//! Error types for settings-core

/// Result type for settings-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in settings-core operations
///
/// Most failures below the [`Settings`](crate::Settings) façade are absorbed
/// into `tracing` warnings; the variants here are what escapes to callers
/// that work with stores and preference backends directly.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A value could not be represented in the settings text format
    #[error("Cannot serialize value of type {type_name}: {message}")]
    Serialization { type_name: String, message: String },

    /// A settings or preference file exists but is not valid
    #[error("Malformed settings data: {message}")]
    Malformed { message: String },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from settings-fs
    #[error(transparent)]
    Fs(#[from] settings_fs::Error),

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn serialization(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Serialization {
            type_name: type_name.into(),
            message: message.into(),
        }
    }
}
