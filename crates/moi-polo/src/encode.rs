use indexmap::IndexMap;

use crate::wire::write_pack;
use crate::{PoloError, Schema, StructSchema, Value, ValueKey, WireType};

/// Encodes `value` against `schema`, producing the tag byte followed by the body.
pub fn encode(value: &Value, schema: &Schema) -> Result<Vec<u8>, PoloError> {
    let (wire, body) = encode_body(value, schema)?;
    Ok(tagged(wire, body))
}

/// Encodes labelled fields in document form. Pairs are written in ascending
/// label order; labels absent from `fields` encode as null.
pub fn encode_document(
    fields: &IndexMap<String, Value>,
    schema: &StructSchema,
) -> Result<Vec<u8>, PoloError> {
    let body = document_body(fields, schema)?;
    Ok(tagged(WireType::Document, body))
}

/// Canonical encoding of a map key, used when hashing property accessors.
pub fn encode_key(key: &ValueKey) -> Vec<u8> {
    let (wire, body) = key_body(key);
    tagged(wire, body)
}

fn tagged(wire: WireType, body: Vec<u8>) -> Vec<u8> {
    let mut out = Vec::with_capacity(body.len() + 1);
    out.push(wire as u8);
    out.extend(body);
    out
}

fn key_body(key: &ValueKey) -> (WireType, Vec<u8>) {
    match key {
        ValueKey::Bool(true) => (WireType::True, Vec::new()),
        ValueKey::Bool(false) => (WireType::False, Vec::new()),
        ValueKey::Integer(i) => (integer_wire(i.is_negative()), i.magnitude().to_vec()),
        ValueKey::String(s) => (WireType::Word, s.as_bytes().to_vec()),
        ValueKey::Bytes(b) => (WireType::Word, b.clone()),
    }
}

fn integer_wire(negative: bool) -> WireType {
    if negative {
        WireType::NegInt
    } else {
        WireType::PosInt
    }
}

fn mismatch(expected: &Schema, found: &Value) -> PoloError {
    PoloError::ValueMismatch {
        expected: expected.kind(),
        found: found.kind(),
    }
}

fn encode_body(value: &Value, schema: &Schema) -> Result<(WireType, Vec<u8>), PoloError> {
    match value {
        Value::Null => return Ok((WireType::Null, Vec::new())),
        Value::Encoded(bytes) => {
            let (tag, body) = bytes.split_first().ok_or(PoloError::EmptyEncoded)?;
            return Ok((WireType::from_u8(*tag)?, body.to_vec()));
        }
        _ => {}
    }

    match (schema, value) {
        (Schema::Bool, Value::Bool(true)) => Ok((WireType::True, Vec::new())),
        (Schema::Bool, Value::Bool(false)) => Ok((WireType::False, Vec::new())),
        (Schema::Integer, Value::Integer(i)) => {
            Ok((integer_wire(i.is_negative()), i.magnitude().to_vec()))
        }
        (Schema::Float, Value::Float(f)) => Ok((WireType::Float, f.to_be_bytes().to_vec())),
        (Schema::String, Value::String(s)) => Ok((WireType::Word, s.as_bytes().to_vec())),
        (Schema::Bytes, Value::Bytes(b)) => Ok((WireType::Word, b.clone())),
        (Schema::Array(element), Value::Array(items)) => {
            let elements = items
                .iter()
                .map(|item| encode_body(item, element))
                .collect::<Result<Vec<_>, _>>()?;
            Ok((WireType::Pack, write_pack(&elements)))
        }
        (Schema::Map { key, value: inner }, Value::Map(entries)) => {
            let mut pairs = entries
                .iter()
                .map(|(k, v)| {
                    let k = encode_body(&Value::from(k.clone()), key)?;
                    Ok((k, encode_body(v, inner)?))
                })
                .collect::<Result<Vec<_>, PoloError>>()?;
            // Entries are ordered by their encoded key, tag byte first.
            pairs.sort_by(|((wa, a), _), ((wb, b), _)| (*wa as u8, a).cmp(&(*wb as u8, b)));

            let mut elements = Vec::with_capacity(pairs.len() * 2);
            for (k, v) in pairs {
                elements.push(k);
                elements.push(v);
            }
            Ok((WireType::Pack, write_pack(&elements)))
        }
        (Schema::Struct(s), Value::Struct(fields)) if s.document => {
            Ok((WireType::Document, document_body(fields, s)?))
        }
        (Schema::Struct(s), Value::Struct(fields)) => {
            reject_unknown(fields, s)?;
            let elements = s
                .fields
                .iter()
                .map(|(label, field)| encode_body(fields.get(label).unwrap_or(&Value::Null), field))
                .collect::<Result<Vec<_>, _>>()?;
            Ok((WireType::Pack, write_pack(&elements)))
        }
        _ => Err(mismatch(schema, value)),
    }
}

fn document_body(
    fields: &IndexMap<String, Value>,
    schema: &StructSchema,
) -> Result<Vec<u8>, PoloError> {
    reject_unknown(fields, schema)?;
    let mut pairs = schema
        .fields
        .iter()
        .map(|(label, field)| {
            let raw = encode(fields.get(label).unwrap_or(&Value::Null), field)?;
            Ok((label.as_str(), raw))
        })
        .collect::<Result<Vec<_>, PoloError>>()?;
    pairs.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

    let mut elements = Vec::with_capacity(pairs.len() * 2);
    for (label, raw) in pairs {
        elements.push((WireType::Word, label.as_bytes().to_vec()));
        elements.push((WireType::Raw, raw));
    }
    Ok(write_pack(&elements))
}

fn reject_unknown(fields: &IndexMap<String, Value>, schema: &StructSchema) -> Result<(), PoloError> {
    match fields.keys().find(|label| !schema.fields.contains_key(*label)) {
        Some(label) => Err(PoloError::UnknownField(label.clone())),
        None => Ok(()),
    }
}
