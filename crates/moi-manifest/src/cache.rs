use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use moi_polo::Schema;

use crate::{ManifestError, ManifestHash, Position, TypeDescriptor, TypeResolver};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    manifest: ManifestHash,
    descriptor: String,
    position: Position,
}

/// Resolved schemas shared across coders, keyed by manifest fingerprint,
/// canonical descriptor text and resolution position.
#[derive(Debug, Default)]
pub struct SchemaCache {
    entries: RwLock<HashMap<CacheKey, Arc<Schema>>>,
}

impl SchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_resolve(
        &self,
        manifest: ManifestHash,
        resolver: &TypeResolver<'_>,
        ty: &TypeDescriptor,
        position: Position,
    ) -> Result<Arc<Schema>, ManifestError> {
        let key = CacheKey {
            manifest,
            descriptor: ty.to_string(),
            position,
        };
        if let Some(schema) = self.read().get(&key) {
            tracing::trace!(descriptor = %key.descriptor, "schema cache hit");
            return Ok(Arc::clone(schema));
        }

        tracing::debug!(descriptor = %key.descriptor, ?position, "schema cache miss");
        let schema = Arc::new(resolver.resolve_uncached(ty, position)?);
        let mut entries = self.entries.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(Arc::clone(entries.entry(key).or_insert(schema)))
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<CacheKey, Arc<Schema>>> {
        self.entries.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
