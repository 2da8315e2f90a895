use moi_manifest::{ManifestError, StateMode};
use moi_polo::PoloError;
use moi_state::AccessError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LogicError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error("codec error: {0}")]
    Decode(#[from] PoloError),
    #[error("expected {expected} arguments, got {got}")]
    ArgumentCountMismatch { expected: usize, got: usize },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("'{0}' is not one of the supplied fields")]
    UnknownField(String),
    #[error("logic declares no {0} state")]
    StateNotPresent(StateMode),
    #[error("malformed exception: {0}")]
    MalformedException(String),
    #[error("storage read failed: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}
