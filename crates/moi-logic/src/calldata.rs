use std::collections::BTreeMap;

use indexmap::IndexMap;
use moi_polo::{Schema, StructSchema, Value, ValueKey, encode_document};

use crate::LogicError;

/// Walks `value` alongside `schema`, decoding hex text bound for byte fields
/// and sealing every document struct into its own encoding so the enclosing
/// encode splices it in unchanged.
pub(crate) fn reshape(value: Value, schema: &Schema) -> Result<Value, LogicError> {
    match (schema, value) {
        (_, Value::Null) => Ok(Value::Null),
        (_, encoded @ Value::Encoded(_)) => Ok(encoded),
        (Schema::Bytes, Value::String(text)) => decode_hex(&text).map(Value::Bytes),
        (Schema::Array(element), Value::Array(items)) => items
            .into_iter()
            .map(|item| reshape(item, element))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        (Schema::Map { key, value }, Value::Map(entries)) => {
            let mut reshaped = BTreeMap::new();
            for (k, v) in entries {
                let k = ValueKey::try_from(reshape(Value::from(k), key)?)?;
                reshaped.insert(k, reshape(v, value)?);
            }
            Ok(Value::Map(reshaped))
        }
        (Schema::Struct(schema), Value::Struct(fields)) => {
            let fields = reshape_fields(fields, schema)?;
            if schema.document {
                Ok(Value::Encoded(encode_document(&fields, schema)?))
            } else {
                Ok(Value::Struct(fields))
            }
        }
        (_, other) => Ok(other),
    }
}

pub(crate) fn reshape_fields(
    fields: IndexMap<String, Value>,
    schema: &StructSchema,
) -> Result<IndexMap<String, Value>, LogicError> {
    let mut reshaped = IndexMap::with_capacity(fields.len());
    for (label, value) in fields {
        let field = schema.field(&label).ok_or_else(|| {
            LogicError::InvalidArgument(format!("unexpected field '{label}'"))
        })?;
        let value = reshape(value, field)?;
        reshaped.insert(label, value);
    }
    Ok(reshaped)
}

fn decode_hex(text: &str) -> Result<Vec<u8>, LogicError> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    hex::decode(digits)
        .map_err(|err| LogicError::InvalidArgument(format!("'{text}' is not hex bytes: {err}")))
}
