use moi_manifest::{ManifestIndex, StateMode, TypeDescriptor};
use moi_polo::{Schema, Value, decode};
use moi_state::{AccessError, Accessor, AccessorBuilder, EntityBuilder, StorageKey};

use crate::LogicError;

/// Source of raw state bytes, supplied by the caller. Ephemeral reads carry
/// the participant whose state is addressed.
pub trait StorageReader {
    type Error: std::error::Error + Send + Sync + 'static;

    fn read(&self, key: &StorageKey, participant: Option<&[u8]>) -> Result<Vec<u8>, Self::Error>;
}

/// A fully navigated state location.
#[derive(Debug, Clone, PartialEq)]
pub struct StateAccess {
    pub mode: StateMode,
    pub key: StorageKey,
    pub leaf: TypeDescriptor,
    pub schema: Schema,
    pub accessors: Vec<Accessor>,
}

impl StateAccess {
    fn from_builder(mode: StateMode, builder: &AccessorBuilder<'_>) -> Result<Self, LogicError> {
        Ok(Self {
            mode,
            key: builder.generate(),
            leaf: builder.current_type().clone(),
            schema: builder.leaf_schema()?,
            accessors: builder.accessors().to_vec(),
        })
    }

    /// Decodes bytes read at [`key`](Self::key). Scalar leaves decode with
    /// their schema; arrays, maps and classes hold their length there.
    pub fn decode(&self, bytes: &[u8]) -> Result<Option<Value>, LogicError> {
        if bytes.is_empty() {
            return Ok(None);
        }
        let value = match self.leaf.as_primitive() {
            Some(_) => decode(bytes, &self.schema)?,
            None => decode(bytes, &Schema::Integer)?,
        };
        Ok(Some(value))
    }
}

fn entities(index: &ManifestIndex, mode: StateMode) -> Result<EntityBuilder<'_>, LogicError> {
    if !index.states().has(mode) {
        return Err(LogicError::StateNotPresent(mode));
    }
    Ok(EntityBuilder::new(index, mode)?)
}

fn read<R: StorageReader>(
    reader: &R,
    access: &StateAccess,
    participant: Option<&[u8]>,
) -> Result<Option<Value>, LogicError> {
    tracing::debug!(mode = %access.mode, key = %access.key, "reading state");
    let bytes = reader
        .read(&access.key, participant)
        .map_err(|err| LogicError::Storage(Box::new(err)))?;
    access.decode(&bytes)
}

/// Typed reads of a logic's persistent state.
#[derive(Debug, Clone, Copy)]
pub struct PersistentState<'a> {
    entities: EntityBuilder<'a>,
}

impl<'a> PersistentState<'a> {
    pub(crate) fn new(index: &'a ManifestIndex) -> Result<Self, LogicError> {
        Ok(Self {
            entities: entities(index, StateMode::Persistent)?,
        })
    }

    pub fn entities(&self) -> &EntityBuilder<'a> {
        &self.entities
    }

    pub fn access<F>(&self, build: F) -> Result<StateAccess, LogicError>
    where
        F: FnOnce(&EntityBuilder<'a>) -> Result<AccessorBuilder<'a>, AccessError>,
    {
        let builder = build(&self.entities)?;
        StateAccess::from_builder(StateMode::Persistent, &builder)
    }

    pub fn get<R, F>(&self, reader: &R, build: F) -> Result<Option<Value>, LogicError>
    where
        R: StorageReader,
        F: FnOnce(&EntityBuilder<'a>) -> Result<AccessorBuilder<'a>, AccessError>,
    {
        let access = self.access(build)?;
        read(reader, &access, None)
    }
}

/// Typed reads of a logic's per-participant ephemeral state.
#[derive(Debug, Clone, Copy)]
pub struct EphemeralState<'a> {
    entities: EntityBuilder<'a>,
}

impl<'a> EphemeralState<'a> {
    pub(crate) fn new(index: &'a ManifestIndex) -> Result<Self, LogicError> {
        Ok(Self {
            entities: entities(index, StateMode::Ephemeral)?,
        })
    }

    pub fn entities(&self) -> &EntityBuilder<'a> {
        &self.entities
    }

    pub fn access<F>(&self, build: F) -> Result<StateAccess, LogicError>
    where
        F: FnOnce(&EntityBuilder<'a>) -> Result<AccessorBuilder<'a>, AccessError>,
    {
        let builder = build(&self.entities)?;
        StateAccess::from_builder(StateMode::Ephemeral, &builder)
    }

    pub fn get<R, F>(
        &self,
        reader: &R,
        participant: &[u8],
        build: F,
    ) -> Result<Option<Value>, LogicError>
    where
        R: StorageReader,
        F: FnOnce(&EntityBuilder<'a>) -> Result<AccessorBuilder<'a>, AccessError>,
    {
        let access = self.access(build)?;
        read(reader, &access, Some(participant))
    }
}
