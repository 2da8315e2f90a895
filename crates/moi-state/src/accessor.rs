use moi_polo::{ValueKey, encode_key};

use crate::{KEY_LENGTH, StorageKey, sum256};

const PROPERTY_SEPARATOR: u8 = b'.';

/// One navigation step over a storage key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Accessor {
    /// A collection's length lives at the collection's own key.
    Length,
    /// Map entry, holding the digest of the encoded map key.
    Property([u8; KEY_LENGTH]),
    ArrayIndex(u64),
    /// Class member addressed by its declared slot.
    ClassField(u32),
}

impl Accessor {
    pub fn property(key: &ValueKey) -> Self {
        Accessor::Property(sum256(&encode_key(key)))
    }

    pub fn apply(&self, key: StorageKey) -> StorageKey {
        match self {
            Accessor::Length => key,
            Accessor::Property(digest) => {
                let mut buf = Vec::with_capacity(KEY_LENGTH * 2 + 1);
                buf.extend_from_slice(key.as_bytes());
                buf.push(PROPERTY_SEPARATOR);
                buf.extend_from_slice(digest);
                StorageKey::from_bytes(sum256(&buf))
            }
            Accessor::ArrayIndex(index) => key.hashed().wrapping_add(*index),
            Accessor::ClassField(slot) => key.hashed().wrapping_add(u64::from(*slot)),
        }
    }
}

/// Folds `accessors` over `base` left to right.
pub fn generate_storage_key(base: impl Into<StorageKey>, accessors: &[Accessor]) -> StorageKey {
    accessors
        .iter()
        .fold(base.into(), |key, accessor| accessor.apply(key))
}
