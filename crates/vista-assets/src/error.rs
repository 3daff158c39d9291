use std::path::PathBuf;

/// Errors that can occur while importing a scene.
///
/// Only [`ImportError::ImportFailed`] escapes [`crate::import_scene`]; the
/// other variants are raised by individual stages and recovered by skipping
/// the offending primitive, material or texture.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to import '{}': {reason}", .path.display())]
    ImportFailed { path: PathBuf, reason: String },

    #[error("malformed document: {0}")]
    MalformedDocument(String),

    #[error("primitive is missing required attribute {0}")]
    MissingRequiredAttribute(&'static str),

    #[error("document contains no scenes")]
    NoSceneAvailable,
}

impl ImportError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedDocument(message.into())
    }

    pub(crate) fn failed(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::ImportFailed {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
