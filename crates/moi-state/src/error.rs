use moi_manifest::ManifestError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AccessError {
    #[error("cannot apply {op} to '{found}'")]
    TypeMismatch { op: &'static str, found: String },
    #[error("'{name}' is not a member of {scope}")]
    NotFound { scope: String, name: String },
    #[error("index {index} is out of bounds for array of length {len}")]
    IndexOutOfBounds { index: u64, len: u64 },
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
    #[error(transparent)]
    Manifest(#[from] ManifestError),
}
