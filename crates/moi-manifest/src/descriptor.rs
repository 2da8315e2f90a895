use std::fmt;
use std::str::FromStr;

use moi_polo::Schema;

use crate::ManifestError;
use crate::config::DEFAULT_MAX_DEPTH;

pub const CLASS_PREFIX: &str = "class.";

/// Closed set of primitive type keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Null,
    Bool,
    Bytes,
    Address,
    String,
    U64,
    U256,
    I64,
    I256,
    BigInt,
    Ptr,
}

impl Primitive {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "null" => Primitive::Null,
            "bool" => Primitive::Bool,
            "bytes" => Primitive::Bytes,
            "address" => Primitive::Address,
            "string" => Primitive::String,
            "u64" => Primitive::U64,
            "u256" => Primitive::U256,
            "i64" => Primitive::I64,
            "i256" => Primitive::I256,
            "bigint" => Primitive::BigInt,
            "ptr" => Primitive::Ptr,
            _ => return None,
        })
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Primitive::Null => "null",
            Primitive::Bool => "bool",
            Primitive::Bytes => "bytes",
            Primitive::Address => "address",
            Primitive::String => "string",
            Primitive::U64 => "u64",
            Primitive::U256 => "u256",
            Primitive::I64 => "i64",
            Primitive::I256 => "i256",
            Primitive::BigInt => "bigint",
            Primitive::Ptr => "ptr",
        }
    }

    pub fn schema(self) -> Schema {
        match self {
            Primitive::Null => Schema::Null,
            Primitive::Bool => Schema::Bool,
            Primitive::Bytes | Primitive::Address => Schema::Bytes,
            Primitive::String => Schema::String,
            Primitive::U64
            | Primitive::U256
            | Primitive::I64
            | Primitive::I256
            | Primitive::BigInt
            | Primitive::Ptr => Schema::Integer,
        }
    }
}

/// Parsed type descriptor.
///
/// Grammar: a primitive keyword, `[]T`, `[N]T`, `map[K]V`, or a class name
/// written either as `class.Name` or bare `Name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    Primitive(Primitive),
    Array {
        len: Option<u64>,
        element: Box<TypeDescriptor>,
    },
    Map {
        key: Box<TypeDescriptor>,
        value: Box<TypeDescriptor>,
    },
    Class(String),
}

impl TypeDescriptor {
    /// Parses `descriptor` with the default nesting limit.
    pub fn parse(descriptor: &str) -> Result<Self, ManifestError> {
        Self::parse_within(descriptor, DEFAULT_MAX_DEPTH)
    }

    /// Parses `descriptor`, failing with `DepthExceeded` once arrays and maps
    /// nest `max_depth` levels deep.
    pub fn parse_within(descriptor: &str, max_depth: usize) -> Result<Self, ManifestError> {
        Self::parse_at(descriptor, 0, max_depth)
    }

    fn parse_at(descriptor: &str, depth: usize, max_depth: usize) -> Result<Self, ManifestError> {
        if depth >= max_depth {
            return Err(ManifestError::DepthExceeded(max_depth));
        }
        let unsupported = || ManifestError::UnsupportedType(descriptor.to_owned());

        if let Some(primitive) = Primitive::from_keyword(descriptor) {
            return Ok(TypeDescriptor::Primitive(primitive));
        }

        if let Some((key, value)) = split_map(descriptor) {
            if key.is_empty() || value.is_empty() {
                return Err(unsupported());
            }
            return Ok(TypeDescriptor::Map {
                key: Box::new(Self::parse_at(key, depth + 1, max_depth)?),
                value: Box::new(Self::parse_at(value, depth + 1, max_depth)?),
            });
        }

        if let Some(rest) = descriptor.strip_prefix('[') {
            let close = rest.find(']').ok_or_else(unsupported)?;
            let len = match &rest[..close] {
                "" => None,
                digits => Some(digits.parse::<u64>().map_err(|_| unsupported())?),
            };
            let element = &rest[close + 1..];
            if element.is_empty() {
                return Err(unsupported());
            }
            return Ok(TypeDescriptor::Array {
                len,
                element: Box::new(Self::parse_at(element, depth + 1, max_depth)?),
            });
        }

        if looks_primitive(descriptor) {
            return Err(unsupported());
        }

        let name = descriptor.strip_prefix(CLASS_PREFIX).unwrap_or(descriptor);
        if is_identifier(name) {
            Ok(TypeDescriptor::Class(name.to_owned()))
        } else {
            Err(unsupported())
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, TypeDescriptor::Array { .. } | TypeDescriptor::Map { .. })
    }

    pub fn as_primitive(&self) -> Option<Primitive> {
        match self {
            TypeDescriptor::Primitive(p) => Some(*p),
            _ => None,
        }
    }

    pub fn class_name(&self) -> Option<&str> {
        match self {
            TypeDescriptor::Class(name) => Some(name),
            _ => None,
        }
    }
}

/// Splits `map[K]V` into `K` and `V`, counting bracket depth so bracketed
/// keys such as `map[[]u64]string` split at the matching bracket.
fn split_map(descriptor: &str) -> Option<(&str, &str)> {
    let rest = descriptor.strip_prefix("map[")?;
    let mut depth = 1usize;
    for (idx, ch) in rest.char_indices() {
        match ch {
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some((&rest[..idx], &rest[idx + 1..]));
                }
            }
            _ => {}
        }
    }
    None
}

/// `u8`, `i128` and friends are not in the keyword set but must not fall
/// through to class lookup.
fn looks_primitive(token: &str) -> bool {
    let mut chars = token.chars();
    matches!(chars.next(), Some('u' | 'i'))
        && token.len() > 1
        && chars.all(|c| c.is_ascii_digit())
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

impl FromStr for TypeDescriptor {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TypeDescriptor::parse(s)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Primitive(p) => f.write_str(p.keyword()),
            TypeDescriptor::Array { len: None, element } => write!(f, "[]{element}"),
            TypeDescriptor::Array {
                len: Some(len),
                element,
            } => write!(f, "[{len}]{element}"),
            TypeDescriptor::Map { key, value } => write!(f, "map[{key}]{value}"),
            TypeDescriptor::Class(name) => write!(f, "{CLASS_PREFIX}{name}"),
        }
    }
}
