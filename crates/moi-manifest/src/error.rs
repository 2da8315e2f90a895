use thiserror::Error;

use crate::{ElementKind, ElementPtr};

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("{kind} '{name}' not found")]
    NotFound { kind: ElementKind, name: String },
    #[error("no element with pointer {0}")]
    UnknownElement(ElementPtr),
    #[error("element {ptr} is a {found}, expected a {expected}")]
    KindMismatch {
        ptr: ElementPtr,
        expected: ElementKind,
        found: ElementKind,
    },
    #[error("unsupported type '{0}'")]
    UnsupportedType(String),
    #[error("class '{0}' contains itself")]
    CyclicClass(String),
    #[error("type nesting exceeds the configured depth of {0}")]
    DepthExceeded(usize),
    #[error("invalid manifest json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to encode canonical CBOR: {0}")]
    Cbor(#[from] serde_cbor::Error),
}
