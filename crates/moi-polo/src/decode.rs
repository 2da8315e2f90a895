use std::collections::{BTreeMap, HashMap};

use indexmap::IndexMap;

use crate::wire::read_pack;
use crate::{Integer, PoloError, Schema, StructSchema, Value, ValueKey, WireType};

/// Decodes a tagged encoding against `schema`.
///
/// A null on the wire decodes to [`Value::Null`] for every schema, and struct
/// fields missing from the wire decode to null as well.
pub fn decode(bytes: &[u8], schema: &Schema) -> Result<Value, PoloError> {
    let (tag, body) = bytes.split_first().ok_or(PoloError::Truncated)?;
    decode_body(WireType::from_u8(*tag)?, body, schema)
}

/// Peels raw wrappers off a value. A raw body is itself a complete tagged
/// encoding, except under a bytes schema where it is the value.
fn unwrap_raw<'a>(
    mut wire: WireType,
    mut data: &'a [u8],
    schema: &Schema,
) -> Result<(WireType, &'a [u8]), PoloError> {
    while wire == WireType::Raw && !matches!(schema, Schema::Bytes) {
        let (tag, body) = data.split_first().ok_or(PoloError::Truncated)?;
        wire = WireType::from_u8(*tag)?;
        data = body;
    }
    Ok((wire, data))
}

fn decode_body(wire: WireType, data: &[u8], schema: &Schema) -> Result<Value, PoloError> {
    let (wire, data) = unwrap_raw(wire, data, schema)?;
    if wire == WireType::Null {
        return Ok(Value::Null);
    }

    let unexpected = || PoloError::WireMismatch {
        expected: schema.kind(),
        wire,
    };

    match schema {
        Schema::Null => Err(unexpected()),
        Schema::Bool => match wire {
            WireType::True => Ok(Value::Bool(true)),
            WireType::False => Ok(Value::Bool(false)),
            _ => Err(unexpected()),
        },
        Schema::Integer => match wire {
            WireType::PosInt => Ok(Value::Integer(Integer::from_be_bytes(false, data))),
            WireType::NegInt => Ok(Value::Integer(Integer::from_be_bytes(true, data))),
            _ => Err(unexpected()),
        },
        Schema::Float => match wire {
            WireType::Float => {
                let raw: [u8; 8] = data
                    .try_into()
                    .map_err(|_| PoloError::FloatLength(data.len()))?;
                Ok(Value::Float(f64::from_be_bytes(raw)))
            }
            _ => Err(unexpected()),
        },
        Schema::String => match wire {
            WireType::Word => Ok(Value::String(String::from_utf8(data.to_vec())?)),
            _ => Err(unexpected()),
        },
        Schema::Bytes => match wire {
            WireType::Word | WireType::Raw => Ok(Value::Bytes(data.to_vec())),
            _ => Err(unexpected()),
        },
        Schema::Array(element) => match wire {
            WireType::Pack => read_pack(data)?
                .into_iter()
                .map(|(w, d)| decode_body(w, d, element))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            _ => Err(unexpected()),
        },
        Schema::Map { key, value } => match wire {
            WireType::Pack => decode_map(data, key, value),
            _ => Err(unexpected()),
        },
        Schema::Struct(s) => match wire {
            WireType::Pack => decode_positional(data, s),
            WireType::Document => decode_document(data, s),
            _ => Err(unexpected()),
        },
    }
}

fn decode_map(data: &[u8], key: &Schema, value: &Schema) -> Result<Value, PoloError> {
    let elements = read_pack(data)?;
    if elements.len() % 2 != 0 {
        return Err(PoloError::MalformedPack("map has an odd number of elements"));
    }
    let mut entries = BTreeMap::new();
    for pair in elements.chunks_exact(2) {
        let k = ValueKey::try_from(decode_body(pair[0].0, pair[0].1, key)?)?;
        let v = decode_body(pair[1].0, pair[1].1, value)?;
        entries.insert(k, v);
    }
    Ok(Value::Map(entries))
}

fn decode_positional(data: &[u8], schema: &StructSchema) -> Result<Value, PoloError> {
    let mut elements = read_pack(data)?.into_iter();
    let mut fields = IndexMap::with_capacity(schema.fields.len());
    for (label, field) in &schema.fields {
        let value = match elements.next() {
            Some((wire, body)) => decode_body(wire, body, field)?,
            None => Value::Null,
        };
        fields.insert(label.clone(), value);
    }
    Ok(Value::Struct(fields))
}

fn decode_document(data: &[u8], schema: &StructSchema) -> Result<Value, PoloError> {
    let elements = read_pack(data)?;
    if elements.len() % 2 != 0 {
        return Err(PoloError::MalformedPack("document has an unpaired label"));
    }
    let mut entries: HashMap<&[u8], (WireType, &[u8])> = HashMap::new();
    for pair in elements.chunks_exact(2) {
        if pair[0].0 != WireType::Word {
            return Err(PoloError::MalformedPack("document label is not a word"));
        }
        entries.insert(pair[0].1, pair[1]);
    }

    let mut fields = IndexMap::with_capacity(schema.fields.len());
    for (label, field) in &schema.fields {
        let value = match entries.get(label.as_bytes()) {
            Some((WireType::Raw, raw)) if raw.is_empty() => Value::Null,
            Some((WireType::Raw, raw)) => decode(raw, field)?,
            Some((wire, body)) => decode_body(*wire, body, field)?,
            None => Value::Null,
        };
        fields.insert(label.clone(), value);
    }
    Ok(Value::Struct(fields))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode;

    fn unhex(s: &str) -> Vec<u8> {
        hex::decode(s).unwrap()
    }

    #[test]
    fn decodes_captured_output_pack() {
        let schema = Schema::Struct(StructSchema::new().with_field("balance", Schema::Integer));
        let value = decode(&unhex("0e1f0305f5e100"), &schema).unwrap();
        assert_eq!(value.get("balance").and_then(Value::as_u64), Some(100_000_000));
    }

    #[test]
    fn document_fields_decode_by_label() {
        let schema = Schema::Struct(
            StructSchema::document()
                .with_field("symbol", Schema::String)
                .with_field("supply", Schema::Integer)
                .with_field("owner", Schema::Bytes),
        );
        let value = decode(
            &unhex("0d6f0665b6019502737570706c790305f5e10073796d626f6c064d4f49"),
            &schema,
        )
        .unwrap();
        assert_eq!(value.get("symbol").and_then(Value::as_str), Some("MOI"));
        assert_eq!(value.get("supply").and_then(Value::as_u64), Some(100_000_000));
        assert_eq!(value.get("owner"), Some(&Value::Null));
    }

    #[test]
    fn null_wire_decodes_for_any_schema() {
        assert_eq!(decode(&[0x00], &Schema::String).unwrap(), Value::Null);
        assert_eq!(decode(&[0x00], &Schema::array(Schema::Bool)).unwrap(), Value::Null);
    }

    #[test]
    fn nested_collections_round_trip() {
        let schema = Schema::map(
            Schema::String,
            Schema::array(Schema::Struct(
                StructSchema::document()
                    .with_field("n", Schema::Integer)
                    .with_field("ok", Schema::Bool),
            )),
        );
        let value = Value::map([(
            "a",
            Value::Array(vec![
                Value::record([("n", Value::from(-7i64)), ("ok", Value::from(true))]),
                Value::record([("n", Value::from(0u8)), ("ok", Value::from(false))]),
            ]),
        )]);
        let bytes = encode(&value, &schema).unwrap();
        assert_eq!(decode(&bytes, &schema).unwrap(), value);
    }

    #[test]
    fn wrong_wire_is_reported() {
        let err = decode(&[0x06, b'a'], &Schema::Integer).unwrap_err();
        assert_eq!(
            err,
            PoloError::WireMismatch {
                expected: "integer",
                wire: WireType::Word
            }
        );
    }

    #[test]
    fn empty_input_is_truncated() {
        assert_eq!(decode(&[], &Schema::Bool), Err(PoloError::Truncated));
    }

    #[test]
    fn raw_wrappers_unwrap_without_recursion() {
        let mut bytes = vec![0x05; 500_000];
        bytes.push(0x06);
        assert_eq!(decode(&bytes, &Schema::String).unwrap(), Value::from(""));

        assert_eq!(decode(&[0x05, 0x05, 0x02], &Schema::Bool).unwrap(), Value::Bool(true));
        assert_eq!(decode(&[0x05, 0x05, 0x00], &Schema::Integer).unwrap(), Value::Null);
        assert_eq!(
            decode(&[0x05, 0x06, 0xab], &Schema::Bytes).unwrap(),
            Value::Bytes(vec![0x06, 0xab])
        );
    }

    #[test]
    fn empty_raw_wrapper_is_truncated() {
        assert_eq!(decode(&[0x05, 0x05, 0x05], &Schema::String), Err(PoloError::Truncated));
        assert_eq!(decode(&[0x05], &Schema::Integer), Err(PoloError::Truncated));
    }
}
