use thiserror::Error;

/// Failures of the project-editing library.
///
/// Commands wrap these in `anyhow` and decide whether a failure is fatal
/// (bundle step) or only a warning (assets step).
#[derive(Debug, Error)]
pub enum InjectError {
    #[error("conversion failed: {message}")]
    Conversion { message: String },

    #[error("could not find native target `{0}`")]
    TargetNotFound(String),

    #[error("could not find group `{0}`")]
    GroupNotFound(String),

    #[error("target `{0}` has no Resources build phase")]
    PhaseNotFound(String),

    #[error("object `{id}` has a malformed `{field}` field")]
    MalformedRecord { id: String, field: &'static str },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl InjectError {
    pub fn conversion(message: impl Into<String>) -> Self {
        InjectError::Conversion {
            message: message.into(),
        }
    }

    /// True for the locator family: nothing downstream can proceed.
    pub fn is_locator(&self) -> bool {
        matches!(self, InjectError::TargetNotFound(_) | InjectError::GroupNotFound(_))
    }
}

pub type InjectResult<T> = std::result::Result<T, InjectError>;
