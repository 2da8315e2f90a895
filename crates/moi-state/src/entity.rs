use moi_manifest::{ManifestIndex, State, StateMode, TypeField};

use crate::{AccessError, AccessorBuilder};

/// Entry point for navigating one state region by field label.
#[derive(Debug, Clone, Copy)]
pub struct EntityBuilder<'a> {
    index: &'a ManifestIndex,
    state: &'a State,
}

impl<'a> EntityBuilder<'a> {
    pub fn new(index: &'a ManifestIndex, mode: StateMode) -> Result<Self, AccessError> {
        let state = index.state(mode)?;
        Ok(Self { index, state })
    }

    pub fn mode(&self) -> StateMode {
        self.state.mode
    }

    pub fn fields(&self) -> &'a [TypeField] {
        &self.state.fields
    }

    /// Starts an accessor builder at the state field named `label`.
    pub fn entity(&self, label: &str) -> Result<AccessorBuilder<'a>, AccessError> {
        let field = self
            .state
            .fields
            .iter()
            .find(|field| field.label == label)
            .ok_or_else(|| AccessError::NotFound {
                scope: format!("{} state", self.state.mode),
                name: label.to_owned(),
            })?;
        AccessorBuilder::from_field(field, self.index)
    }
}
