use std::sync::Arc;

use indexmap::IndexMap;
use moi_manifest::{
    Manifest, ManifestHash, ManifestIndex, Position, ResolverConfig, SchemaCache,
    TypeDescriptor, TypeField, TypeResolver,
};
use moi_polo::{Schema, StructSchema, Value, decode, encode_document};

use crate::calldata::reshape;
use crate::exception::{BUILTIN_LOG_EVENT, builtin_log_schema, exception_schema};
use crate::{Exception, LogicError};

/// Encodes call arguments and decodes outputs, events and state values for
/// one manifest.
#[derive(Debug)]
pub struct ManifestCoder {
    index: ManifestIndex,
    fingerprint: ManifestHash,
    config: ResolverConfig,
    cache: Arc<SchemaCache>,
}

impl ManifestCoder {
    pub fn new(manifest: &Manifest) -> Result<Self, LogicError> {
        Self::with_cache(
            manifest,
            ResolverConfig::default(),
            Arc::new(SchemaCache::new()),
        )
    }

    /// Builds a coder that shares `cache` with other coders.
    pub fn with_cache(
        manifest: &Manifest,
        config: ResolverConfig,
        cache: Arc<SchemaCache>,
    ) -> Result<Self, LogicError> {
        Ok(Self {
            index: ManifestIndex::from(manifest),
            fingerprint: manifest.fingerprint()?,
            config,
            cache,
        })
    }

    pub fn index(&self) -> &ManifestIndex {
        &self.index
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn fingerprint(&self) -> ManifestHash {
        self.fingerprint
    }

    /// Resolver over this manifest, memoizing through the shared cache.
    pub fn resolver(&self) -> TypeResolver<'_> {
        TypeResolver::with_config(&self.index, self.config).with_cache(&self.cache, self.fingerprint)
    }

    pub fn schema_of(
        &self,
        ty: &TypeDescriptor,
        position: Position,
    ) -> Result<Arc<Schema>, LogicError> {
        Ok(self.resolver().resolve_shared(ty, position)?)
    }

    /// Document schema for a field list, ordered by slot.
    pub fn fields_schema(&self, fields: &[TypeField]) -> Result<StructSchema, LogicError> {
        Ok(self.resolver().resolve_fields(fields)?)
    }

    pub fn encode_arguments(&self, routine: &str, args: &[Value]) -> Result<Vec<u8>, LogicError> {
        let routine = self.index.routine(routine)?;
        tracing::debug!(routine = %routine.name, args = args.len(), "encoding arguments");
        self.encode_fields(&routine.accepts, args)
    }

    /// Encodes `args` as calldata for `fields`. Values are taken by slot, so
    /// `args[field.slot]` feeds `field` wherever it sits in the list.
    pub fn encode_fields(&self, fields: &[TypeField], args: &[Value]) -> Result<Vec<u8>, LogicError> {
        if args.len() < fields.len() {
            return Err(LogicError::ArgumentCountMismatch {
                expected: fields.len(),
                got: args.len(),
            });
        }
        let schema = self.fields_schema(fields)?;

        let mut calldata = IndexMap::with_capacity(fields.len());
        for field in fields {
            let value = args.get(field.slot as usize).cloned().ok_or(
                LogicError::ArgumentCountMismatch {
                    expected: field.slot as usize + 1,
                    got: args.len(),
                },
            )?;
            let field_schema = schema
                .field(&field.label)
                .ok_or_else(|| LogicError::UnknownField(field.label.clone()))?;
            calldata.insert(field.label.clone(), reshape(value, field_schema)?);
        }
        Ok(encode_document(&calldata, &schema)?)
    }

    /// Inverse of [`encode_arguments`](Self::encode_arguments): a vector indexed
    /// by slot, with null in undeclared slots.
    pub fn decode_arguments(
        &self,
        routine: &str,
        calldata: &[u8],
    ) -> Result<Option<Vec<Value>>, LogicError> {
        let routine = self.index.routine(routine)?;
        if routine.accepts.is_empty() || calldata.is_empty() {
            return Ok(None);
        }
        let decoded = self.decode_fields(&routine.accepts, calldata)?;

        let len = routine
            .accepts
            .iter()
            .map(|field| field.slot as usize + 1)
            .max()
            .unwrap_or(0);
        let mut values = vec![Value::Null; len];
        for field in &routine.accepts {
            if let Some(value) = decoded.get(&field.label) {
                values[field.slot as usize] = value.clone();
            }
        }
        Ok(Some(values))
    }

    pub fn decode_output(&self, routine: &str, output: &[u8]) -> Result<Option<Value>, LogicError> {
        let routine = self.index.routine(routine)?;
        if routine.returns.is_empty() || output.is_empty() {
            return Ok(None);
        }
        tracing::debug!(routine = %routine.name, bytes = output.len(), "decoding output");
        self.decode_fields(&routine.returns, output).map(Some)
    }

    /// Decodes a log emitted as `event`. `builtin.Log` needs no declaration.
    pub fn decode_event(&self, event: &str, log: &[u8]) -> Result<Option<Value>, LogicError> {
        if event == BUILTIN_LOG_EVENT {
            if log.is_empty() {
                return Ok(None);
            }
            return Ok(Some(decode(log, builtin_log_schema())?));
        }
        let event = self.index.event(event)?;
        if log.is_empty() {
            return Ok(None);
        }
        self.decode_fields(&event.fields, log).map(Some)
    }

    pub fn decode_exception(error: &[u8]) -> Result<Option<Exception>, LogicError> {
        if error.is_empty() {
            return Ok(None);
        }
        let value = decode(error, exception_schema())?;
        Exception::try_from(value).map(Some)
    }

    /// Decodes the stored value of `field`, one of `fields`.
    pub fn decode_state(
        &self,
        data: &[u8],
        field: &str,
        fields: &[TypeField],
    ) -> Result<Option<Value>, LogicError> {
        if data.is_empty() {
            return Ok(None);
        }
        let declared = fields
            .iter()
            .find(|candidate| candidate.label == field)
            .ok_or_else(|| LogicError::UnknownField(field.to_owned()))?;
        let ty = TypeDescriptor::parse_within(&declared.ty, self.config.max_depth)?;
        let schema = self.schema_of(&ty, Position::Member)?;
        Ok(Some(decode(data, &schema)?))
    }

    fn decode_fields(&self, fields: &[TypeField], bytes: &[u8]) -> Result<Value, LogicError> {
        let schema = Schema::Struct(self.fields_schema(fields)?);
        Ok(decode(bytes, &schema)?)
    }
}
