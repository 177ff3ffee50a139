/// Convenience result type used across instaframe.
pub type InstaframeResult<T> = Result<T, InstaframeError>;

/// Top-level error taxonomy used by editor, render and export APIs.
#[derive(thiserror::Error, Debug)]
pub enum InstaframeError {
    /// Invalid user-provided configuration or script data.
    #[error("validation error: {0}")]
    Validation(String),

    /// An action was invoked while its enabling condition did not hold.
    ///
    /// The editor disables these actions through [`crate::Controls`]; reaching this variant
    /// means a caller ignored the control state.
    #[error("precondition violated: {0}")]
    Precondition(String),

    /// Photo bytes could not be decoded into an image.
    #[error("decode error: {0}")]
    Decode(String),

    /// Errors while compiling or rasterizing a scene.
    #[error("render error: {0}")]
    Render(String),

    /// The media store rejected or failed to write an exported image.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// A second export was requested while one is still outstanding.
    #[error("an export is already in progress")]
    ExportInProgress,

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl InstaframeError {
    /// Build a [`InstaframeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`InstaframeError::Precondition`] value.
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition(msg.into())
    }

    /// Build a [`InstaframeError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`InstaframeError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`InstaframeError::Persistence`] value.
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    /// Build a [`InstaframeError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for InstaframeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
