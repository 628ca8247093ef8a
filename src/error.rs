use crate::builder::BuilderError;

/// Errors raised outside the validator itself.
///
/// Script problems found by the validator are values
/// ([`ScriptError`](crate::script::ScriptError)), not failures; they only
/// become an `Error` when a caller tries to run an invalid script.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("rounds must be between {min} and {max}, got {got}")]
    InvalidRounds { got: usize, min: usize, max: usize },
    #[error("script is invalid: {}", .0.join("; "))]
    InvalidScript(Vec<String>),
    #[error(transparent)]
    Builder(#[from] BuilderError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
