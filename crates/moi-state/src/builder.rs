use moi_manifest::{ManifestIndex, Primitive, TypeDescriptor, TypeField, TypeResolver};
use moi_polo::{Schema, ValueKey};

use crate::{Accessor, AccessError, StorageKey, generate_storage_key};

/// Navigates nested state from a base slot, tracking the type reached so far.
///
/// Every step validates against the current type before touching the
/// accessor list, so a failed step leaves the builder unchanged.
#[derive(Debug, Clone)]
pub struct AccessorBuilder<'a> {
    index: &'a ManifestIndex,
    base: StorageKey,
    current: TypeDescriptor,
    accessors: Vec<Accessor>,
}

impl<'a> AccessorBuilder<'a> {
    pub fn new(base: impl Into<StorageKey>, ty: TypeDescriptor, index: &'a ManifestIndex) -> Self {
        Self {
            index,
            base: base.into(),
            current: ty,
            accessors: Vec::new(),
        }
    }

    /// Starts at a declared field: its slot is the base key, its type the
    /// starting type.
    pub fn from_field(field: &TypeField, index: &'a ManifestIndex) -> Result<Self, AccessError> {
        let ty = TypeDescriptor::parse(&field.ty)?;
        Ok(Self::new(field.slot, ty, index))
    }

    pub fn length(&mut self) -> Result<&mut Self, AccessError> {
        if !self.current.is_collection() {
            return Err(self.mismatch("length"));
        }
        tracing::trace!(from = %self.current, "length");
        self.accessors.push(Accessor::Length);
        self.current = TypeDescriptor::Primitive(Primitive::U64);
        Ok(self)
    }

    pub fn property(&mut self, key: impl Into<ValueKey>) -> Result<&mut Self, AccessError> {
        let TypeDescriptor::Map { key: key_ty, value } = &self.current else {
            return Err(self.mismatch("property"));
        };
        let key = coerce_key(key_ty, key.into())?;
        let next = value.as_ref().clone();
        tracing::trace!(from = %self.current, key = ?key, "property");
        self.accessors.push(Accessor::property(&key));
        self.current = next;
        Ok(self)
    }

    pub fn at(&mut self, index: u64) -> Result<&mut Self, AccessError> {
        let TypeDescriptor::Array { len, element } = &self.current else {
            return Err(self.mismatch("index"));
        };
        if let Some(len) = *len {
            if index >= len {
                return Err(AccessError::IndexOutOfBounds { index, len });
            }
        }
        let next = element.as_ref().clone();
        tracing::trace!(from = %self.current, index, "at");
        self.accessors.push(Accessor::ArrayIndex(index));
        self.current = next;
        Ok(self)
    }

    pub fn field(&mut self, name: &str) -> Result<&mut Self, AccessError> {
        let index = self.index;
        let class = match &self.current {
            TypeDescriptor::Class(class) => index
                .class(class)
                .map_err(|_| self.mismatch("field access"))?,
            _ => return Err(self.mismatch("field access")),
        };
        let field = class
            .fields
            .iter()
            .find(|field| field.label == name)
            .ok_or_else(|| AccessError::NotFound {
                scope: self.current.to_string(),
                name: name.to_owned(),
            })?;
        let next = TypeDescriptor::parse(&field.ty)?;
        tracing::trace!(from = %self.current, field = name, slot = field.slot, "field");
        self.accessors.push(Accessor::ClassField(field.slot));
        self.current = next;
        Ok(self)
    }

    /// Derives the storage key for the path navigated so far.
    pub fn generate(&self) -> StorageKey {
        generate_storage_key(self.base, &self.accessors)
    }

    pub fn base(&self) -> StorageKey {
        self.base
    }

    pub fn accessors(&self) -> &[Accessor] {
        &self.accessors
    }

    pub fn current_type(&self) -> &TypeDescriptor {
        &self.current
    }

    pub fn index(&self) -> &'a ManifestIndex {
        self.index
    }

    /// Schema of the value at the current position.
    pub fn leaf_schema(&self) -> Result<Schema, AccessError> {
        Ok(TypeResolver::new(self.index).resolve_type(&self.current, moi_manifest::Position::Root)?)
    }

    fn mismatch(&self, op: &'static str) -> AccessError {
        AccessError::TypeMismatch {
            op,
            found: self.current.to_string(),
        }
    }
}

/// Checks a map key against the map's declared key type. Hex text is accepted
/// for byte-like keys.
fn coerce_key(key_ty: &TypeDescriptor, key: ValueKey) -> Result<ValueKey, AccessError> {
    let Some(primitive) = key_ty.as_primitive() else {
        return Ok(key);
    };
    match (primitive.schema(), key) {
        (Schema::String, key @ ValueKey::String(_))
        | (Schema::Integer, key @ ValueKey::Integer(_))
        | (Schema::Bool, key @ ValueKey::Bool(_))
        | (Schema::Bytes, key @ ValueKey::Bytes(_)) => Ok(key),
        (Schema::Bytes, ValueKey::String(text)) => {
            let digits = text
                .strip_prefix("0x")
                .or_else(|| text.strip_prefix("0X"))
                .unwrap_or(&text);
            hex::decode(digits)
                .map(ValueKey::Bytes)
                .map_err(|_| AccessError::TypeMismatch {
                    op: "property",
                    found: format!("non-hex string key for {key_ty}"),
                })
        }
        (_, key) => Err(AccessError::TypeMismatch {
            op: "property",
            found: format!("{} key for {key_ty}", key.kind()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moi_manifest::{Manifest, ManifestError};
    use serde_json::json;

    fn index() -> ManifestIndex {
        let manifest = Manifest::from_value(json!({
            "syntax": 1,
            "engine": {"kind": "PISA", "flags": []},
            "elements": [
                {"ptr": 0, "kind": "class", "data": {"name": "Person", "fields": [
                    {"slot": 0, "label": "name", "type": "string"},
                    {"slot": 3, "label": "tags", "type": "[]string"}
                ]}}
            ]
        }))
        .unwrap();
        ManifestIndex::from(&manifest)
    }

    fn builder<'a>(ty: &str, index: &'a ManifestIndex) -> AccessorBuilder<'a> {
        AccessorBuilder::new(0u32, TypeDescriptor::parse(ty).unwrap(), index)
    }

    #[test]
    fn length_on_struct_leaves_builder_untouched() {
        let index = index();
        let mut b = builder("Person", &index);
        let err = b.length().unwrap_err();
        assert!(matches!(err, AccessError::TypeMismatch { op: "length", .. }));
        assert!(b.accessors().is_empty());
        assert_eq!(b.current_type().to_string(), "class.Person");
    }

    #[test]
    fn steps_track_the_current_type() {
        let index = index();
        let mut b = builder("map[string][]Person", &index);
        b.property("bob").unwrap().at(1).unwrap().field("tags").unwrap();
        assert_eq!(b.current_type().to_string(), "[]string");
        assert_eq!(b.accessors().len(), 3);
        assert_eq!(b.accessors()[2], Accessor::ClassField(3));
        b.length().unwrap();
        assert_eq!(b.current_type().to_string(), "u64");
        assert_eq!(b.leaf_schema().unwrap(), Schema::Integer);
    }

    #[test]
    fn wrong_operation_for_type() {
        let index = index();
        let mut b = builder("[]u64", &index);
        assert!(matches!(b.property("x"), Err(AccessError::TypeMismatch { op: "property", .. })));
        assert!(matches!(b.field("x"), Err(AccessError::TypeMismatch { .. })));
        let mut m = builder("map[u64]bool", &index);
        assert!(matches!(m.at(0), Err(AccessError::TypeMismatch { op: "index", .. })));
        assert!(matches!(m.property("one"), Err(AccessError::TypeMismatch { .. })));
        assert!(m.accessors().is_empty());
    }

    #[test]
    fn unknown_field_is_not_found() {
        let index = index();
        let mut b = builder("Person", &index);
        let err = b.field("email").unwrap_err();
        assert_eq!(err.to_string(), "'email' is not a member of class.Person");
    }

    #[test]
    fn undeclared_class_cannot_be_navigated() {
        let index = index();
        let mut b = builder("Ghost", &index);
        assert!(matches!(b.field("x"), Err(AccessError::TypeMismatch { .. })));
    }

    #[test]
    fn fixed_arrays_are_bounds_checked() {
        let index = index();
        let mut b = builder("[4]u64", &index);
        assert!(matches!(
            b.at(4),
            Err(AccessError::IndexOutOfBounds { index: 4, len: 4 })
        ));
        assert!(b.at(3).is_ok());
    }

    #[test]
    fn hex_text_is_accepted_for_address_keys() {
        let index = index();
        let mut text = builder("map[address]u64", &index);
        text.property("0xb90f39fc").unwrap();
        let mut raw = builder("map[address]u64", &index);
        raw.property(vec![0xb9, 0x0f, 0x39, 0xfc]).unwrap();
        assert_eq!(text.generate(), raw.generate());

        let mut bad = builder("map[address]u64", &index);
        assert!(bad.property("alice").is_err());
    }

    #[test]
    fn invalid_field_type_surfaces_manifest_error() {
        let field = TypeField::new(0, "broken", "u8");
        let index = index();
        assert!(matches!(
            AccessorBuilder::from_field(&field, &index),
            Err(AccessError::Manifest(ManifestError::UnsupportedType(_)))
        ));
    }
}
