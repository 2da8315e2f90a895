use std::collections::BTreeMap;

use indexmap::IndexMap;

use crate::{Integer, PoloError};

/// Dynamic value carried through the codec.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(Integer),
    Float(f64),
    Bytes(Vec<u8>),
    String(String),
    Array(Vec<Value>),
    Map(BTreeMap<ValueKey, Value>),
    Struct(IndexMap<String, Value>),
    /// Complete wire encoding (tag byte included) spliced in verbatim.
    Encoded(Vec<u8>),
}

impl Value {
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Bytes(_) => "bytes",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
            Value::Struct(_) => "struct",
            Value::Encoded(_) => "encoded",
        }
    }

    pub fn record<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Value::Struct(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn map<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<ValueKey>,
    {
        Value::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn get(&self, label: &str) -> Option<&Value> {
        match self {
            Value::Struct(fields) => fields.get(label),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<&Integer> {
        match self {
            Value::Integer(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        self.as_integer().and_then(Integer::to_u64)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

macro_rules! impl_value_from_int {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Value {
            fn from(value: $ty) -> Self {
                Value::Integer(Integer::from(value))
            }
        }

        impl From<$ty> for ValueKey {
            fn from(value: $ty) -> Self {
                ValueKey::Integer(Integer::from(value))
            }
        })*
    };
}

impl_value_from_int!(u8, u16, u32, u64, u128, i8, i16, i32, i64, i128);

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(value)
    }
}

impl From<Integer> for Value {
    fn from(value: Integer) -> Self {
        Value::Integer(value)
    }
}

/// Ordered map key. Only scalar kinds can key a map.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueKey {
    Bool(bool),
    Integer(Integer),
    String(String),
    Bytes(Vec<u8>),
}

impl ValueKey {
    pub fn kind(&self) -> &'static str {
        match self {
            ValueKey::Bool(_) => "bool",
            ValueKey::Integer(_) => "integer",
            ValueKey::String(_) => "string",
            ValueKey::Bytes(_) => "bytes",
        }
    }
}

impl From<bool> for ValueKey {
    fn from(value: bool) -> Self {
        ValueKey::Bool(value)
    }
}

impl From<&str> for ValueKey {
    fn from(value: &str) -> Self {
        ValueKey::String(value.to_owned())
    }
}

impl From<String> for ValueKey {
    fn from(value: String) -> Self {
        ValueKey::String(value)
    }
}

impl From<Vec<u8>> for ValueKey {
    fn from(value: Vec<u8>) -> Self {
        ValueKey::Bytes(value)
    }
}

impl From<&[u8]> for ValueKey {
    fn from(value: &[u8]) -> Self {
        ValueKey::Bytes(value.to_vec())
    }
}

impl From<[u8; 32]> for ValueKey {
    fn from(value: [u8; 32]) -> Self {
        ValueKey::Bytes(value.to_vec())
    }
}

impl From<Integer> for ValueKey {
    fn from(value: Integer) -> Self {
        ValueKey::Integer(value)
    }
}

impl From<ValueKey> for Value {
    fn from(key: ValueKey) -> Self {
        match key {
            ValueKey::Bool(b) => Value::Bool(b),
            ValueKey::Integer(i) => Value::Integer(i),
            ValueKey::String(s) => Value::String(s),
            ValueKey::Bytes(b) => Value::Bytes(b),
        }
    }
}

impl TryFrom<Value> for ValueKey {
    type Error = PoloError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Bool(b) => Ok(ValueKey::Bool(b)),
            Value::Integer(i) => Ok(ValueKey::Integer(i)),
            Value::String(s) => Ok(ValueKey::String(s)),
            Value::Bytes(b) => Ok(ValueKey::Bytes(b)),
            other => Err(PoloError::InvalidMapKey(other.kind())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_vectors_stay_bytes() {
        assert_eq!(Value::from(vec![1u8, 2]), Value::Bytes(vec![1, 2]));
        assert_eq!(Value::from(vec![1u8, 2]).kind(), "bytes");
    }

    #[test]
    fn keys_round_trip_through_values() {
        let key = ValueKey::from(42u64);
        let value = Value::from(key.clone());
        assert_eq!(ValueKey::try_from(value).unwrap(), key);
        assert_eq!(
            ValueKey::try_from(Value::Null),
            Err(PoloError::InvalidMapKey("null"))
        );
    }

    #[test]
    fn record_preserves_insertion_order() {
        let value = Value::record([("b", Value::from(1u8)), ("a", Value::from(2u8))]);
        let Value::Struct(fields) = &value else {
            panic!("expected struct");
        };
        assert_eq!(fields.keys().collect::<Vec<_>>(), ["b", "a"]);
        assert_eq!(value.get("a").and_then(Value::as_u64), Some(2));
    }
}
