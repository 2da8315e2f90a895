use thiserror::Error;

use crate::WireType;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PoloError {
    #[error("unexpected end of input")]
    Truncated,
    #[error("invalid wire type {0}")]
    InvalidWireType(u8),
    #[error("varint overflows 64 bits")]
    VarintOverflow,
    #[error("malformed pack: {0}")]
    MalformedPack(&'static str),
    #[error("cannot decode {wire:?} as {expected}")]
    WireMismatch {
        expected: &'static str,
        wire: WireType,
    },
    #[error("expected {expected} value, found {found}")]
    ValueMismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("invalid utf-8 in string: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("float must be 8 bytes, got {0}")]
    FloatLength(usize),
    #[error("field '{0}' is not part of the struct schema")]
    UnknownField(String),
    #[error("map key must be bool, integer, string or bytes, found {0}")]
    InvalidMapKey(&'static str),
    #[error("pre-encoded value is empty")]
    EmptyEncoded,
}
