use std::sync::Arc;

use moi_manifest::{
    Class, EngineConfig, Event, Manifest, ManifestIndex, Method, ResolverConfig, Routine,
    SchemaCache, State, StateMode, Syntax, TypeField,
};
use moi_state::AccessorBuilder;

use crate::{EphemeralState, LogicError, ManifestCoder, PersistentState};

/// A loaded logic manifest with its index and coder.
#[derive(Debug)]
pub struct LogicDescriptor {
    manifest: Manifest,
    coder: ManifestCoder,
}

impl LogicDescriptor {
    pub fn new(manifest: Manifest) -> Result<Self, LogicError> {
        Self::with_config(manifest, ResolverConfig::default(), Arc::new(SchemaCache::new()))
    }

    pub fn with_config(
        manifest: Manifest,
        config: ResolverConfig,
        cache: Arc<SchemaCache>,
    ) -> Result<Self, LogicError> {
        let coder = ManifestCoder::with_cache(&manifest, config, cache)?;
        tracing::debug!(
            fingerprint = %coder.fingerprint(),
            elements = manifest.elements.len(),
            "loaded logic manifest"
        );
        Ok(Self { manifest, coder })
    }

    pub fn from_json(json: &str) -> Result<Self, LogicError> {
        Self::new(Manifest::from_json(json)?)
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn manifest_json(&self) -> Result<String, LogicError> {
        Ok(self.manifest.to_json()?)
    }

    pub fn engine(&self) -> &EngineConfig {
        &self.manifest.engine
    }

    pub fn syntax(&self) -> &Syntax {
        &self.manifest.syntax
    }

    pub fn coder(&self) -> &ManifestCoder {
        &self.coder
    }

    pub fn index(&self) -> &ManifestIndex {
        self.coder.index()
    }

    pub fn is_persistent(&self) -> bool {
        self.index().states().has(StateMode::Persistent)
    }

    pub fn is_ephemeral(&self) -> bool {
        self.index().states().has(StateMode::Ephemeral)
    }

    pub fn resolve_routine(&self, name: &str) -> Result<&Routine, LogicError> {
        Ok(self.index().routine(name)?)
    }

    pub fn resolve_method(&self, name: &str) -> Result<&Method, LogicError> {
        Ok(self.index().method(name)?)
    }

    pub fn resolve_event(&self, name: &str) -> Result<&Event, LogicError> {
        Ok(self.index().event(name)?)
    }

    pub fn resolve_class(&self, name: &str) -> Result<&Class, LogicError> {
        Ok(self.index().class(name)?)
    }

    pub fn resolve_state(&self, mode: StateMode) -> Result<&State, LogicError> {
        if !self.index().states().has(mode) {
            return Err(LogicError::StateNotPresent(mode));
        }
        Ok(self.index().state(mode)?)
    }

    /// Starts navigation at `field`, usually one of a state's fields.
    pub fn build_accessor(&self, field: &TypeField) -> Result<AccessorBuilder<'_>, LogicError> {
        Ok(AccessorBuilder::from_field(field, self.index())?)
    }

    pub fn persistent_state(&self) -> Result<PersistentState<'_>, LogicError> {
        PersistentState::new(self.index())
    }

    pub fn ephemeral_state(&self) -> Result<EphemeralState<'_>, LogicError> {
        EphemeralState::new(self.index())
    }
}
