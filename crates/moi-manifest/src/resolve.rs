use std::sync::Arc;

use indexmap::IndexMap;
use moi_polo::{Schema, StructSchema};

use crate::{
    ManifestError, ManifestHash, ManifestIndex, ResolverConfig, SchemaCache, TypeDescriptor,
    TypeField,
};

/// Where a type sits relative to the value being encoded. Classes reached as
/// members of an enclosing type resolve to self-contained documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    Root,
    Member,
}

/// Turns type descriptors into codec schemas using a manifest's class table.
#[derive(Debug, Clone, Copy)]
pub struct TypeResolver<'a> {
    index: &'a ManifestIndex,
    config: ResolverConfig,
    cache: Option<(&'a SchemaCache, ManifestHash)>,
}

impl<'a> TypeResolver<'a> {
    pub fn new(index: &'a ManifestIndex) -> Self {
        Self::with_config(index, ResolverConfig::default())
    }

    pub fn with_config(index: &'a ManifestIndex, config: ResolverConfig) -> Self {
        Self {
            index,
            config,
            cache: None,
        }
    }

    /// Memoizes top-level resolutions in `cache` under `manifest`. Has no
    /// effect when the config disables caching.
    pub fn with_cache(mut self, cache: &'a SchemaCache, manifest: ManifestHash) -> Self {
        self.cache = Some((cache, manifest));
        self
    }

    pub fn index(&self) -> &'a ManifestIndex {
        self.index
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn resolve(&self, descriptor: &str) -> Result<Schema, ManifestError> {
        let ty = TypeDescriptor::parse_within(descriptor, self.config.max_depth)?;
        self.resolve_type(&ty, Position::Root)
    }

    pub fn resolve_type(
        &self,
        ty: &TypeDescriptor,
        position: Position,
    ) -> Result<Schema, ManifestError> {
        self.resolve_shared(ty, position).map(Arc::unwrap_or_clone)
    }

    /// Like [`resolve_type`](Self::resolve_type), but hands out the cached
    /// schema without copying it.
    pub fn resolve_shared(
        &self,
        ty: &TypeDescriptor,
        position: Position,
    ) -> Result<Arc<Schema>, ManifestError> {
        match self.cache {
            Some((cache, manifest)) if self.config.cache => {
                cache.get_or_resolve(manifest, self, ty, position)
            }
            _ => self.resolve_uncached(ty, position).map(Arc::new),
        }
    }

    pub(crate) fn resolve_uncached(
        &self,
        ty: &TypeDescriptor,
        position: Position,
    ) -> Result<Schema, ManifestError> {
        self.walk(ty, position, &mut Guard::new(self.config.max_depth))
    }

    /// Resolves a field list into a document struct keyed by label, ordered
    /// by slot. Each field resolves in member position.
    pub fn resolve_fields(&self, fields: &[TypeField]) -> Result<StructSchema, ManifestError> {
        self.build_fields(fields, true, |ty| {
            self.resolve_shared(ty, Position::Member)
                .map(Arc::unwrap_or_clone)
        })
    }

    fn build_fields<F>(
        &self,
        fields: &[TypeField],
        document: bool,
        mut resolve_field: F,
    ) -> Result<StructSchema, ManifestError>
    where
        F: FnMut(&TypeDescriptor) -> Result<Schema, ManifestError>,
    {
        let mut ordered: Vec<&TypeField> = fields.iter().collect();
        ordered.sort_by_key(|field| field.slot);

        let mut schema = StructSchema {
            fields: IndexMap::with_capacity(ordered.len()),
            document,
        };
        for field in ordered {
            let ty = TypeDescriptor::parse_within(&field.ty, self.config.max_depth)?;
            schema.fields.insert(field.label.clone(), resolve_field(&ty)?);
        }
        Ok(schema)
    }

    fn walk(
        &self,
        ty: &TypeDescriptor,
        position: Position,
        guard: &mut Guard,
    ) -> Result<Schema, ManifestError> {
        guard.enter()?;
        let schema = match ty {
            TypeDescriptor::Primitive(primitive) => Ok(primitive.schema()),
            TypeDescriptor::Array { element, .. } => self
                .walk(element, Position::Member, guard)
                .map(Schema::array),
            TypeDescriptor::Map { key, value } => {
                let key = self.walk(key, Position::Member, guard)?;
                let value = self.walk(value, Position::Member, guard)?;
                Ok(Schema::map(key, value))
            }
            TypeDescriptor::Class(name) => self.walk_class(ty, name, position, guard),
        };
        guard.leave();
        schema
    }

    fn walk_class(
        &self,
        ty: &TypeDescriptor,
        name: &str,
        position: Position,
        guard: &mut Guard,
    ) -> Result<Schema, ManifestError> {
        let class = self
            .index
            .class(name)
            .map_err(|_| ManifestError::UnsupportedType(ty.to_string()))?;
        if guard.classes.iter().any(|open| open == name) {
            return Err(ManifestError::CyclicClass(name.to_owned()));
        }
        tracing::trace!(class = name, ?position, "resolving class");

        guard.classes.push(name.to_owned());
        let fields = self.build_fields(&class.fields, position == Position::Member, |ty| {
            self.walk(ty, Position::Member, guard)
        });
        guard.classes.pop();
        fields.map(Schema::Struct)
    }
}

/// Classes open on the current resolution path plus the nesting depth.
struct Guard {
    classes: Vec<String>,
    depth: usize,
    max_depth: usize,
}

impl Guard {
    fn new(max_depth: usize) -> Self {
        Self {
            classes: Vec::new(),
            depth: 0,
            max_depth,
        }
    }

    fn enter(&mut self) -> Result<(), ManifestError> {
        if self.depth >= self.max_depth {
            return Err(ManifestError::DepthExceeded(self.max_depth));
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

pub fn resolve(descriptor: &str, index: &ManifestIndex) -> Result<Schema, ManifestError> {
    TypeResolver::new(index).resolve(descriptor)
}

pub fn resolve_fields(
    fields: &[TypeField],
    index: &ManifestIndex,
) -> Result<StructSchema, ManifestError> {
    TypeResolver::new(index).resolve_fields(fields)
}
