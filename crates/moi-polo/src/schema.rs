use indexmap::IndexMap;

/// Codec-facing description of a value's shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    Null,
    Bool,
    Bytes,
    String,
    Integer,
    Float,
    Array(Box<Schema>),
    Map { key: Box<Schema>, value: Box<Schema> },
    Struct(StructSchema),
}

/// Ordered struct fields. `document` selects the document wire form (labelled
/// pairs) instead of the positional pack form.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StructSchema {
    pub fields: IndexMap<String, Schema>,
    pub document: bool,
}

impl Schema {
    pub fn array(element: Schema) -> Self {
        Schema::Array(Box::new(element))
    }

    pub fn map(key: Schema, value: Schema) -> Self {
        Schema::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Schema::Null => "null",
            Schema::Bool => "bool",
            Schema::Bytes => "bytes",
            Schema::String => "string",
            Schema::Integer => "integer",
            Schema::Float => "float",
            Schema::Array(_) => "array",
            Schema::Map { .. } => "map",
            Schema::Struct(s) if s.document => "document",
            Schema::Struct(_) => "struct",
        }
    }

    pub fn is_scalar(&self) -> bool {
        !matches!(
            self,
            Schema::Array(_) | Schema::Map { .. } | Schema::Struct(_)
        )
    }

    pub fn as_struct(&self) -> Option<&StructSchema> {
        match self {
            Schema::Struct(s) => Some(s),
            _ => None,
        }
    }
}

impl StructSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document() -> Self {
        Self {
            fields: IndexMap::new(),
            document: true,
        }
    }

    pub fn with_field(mut self, label: impl Into<String>, schema: Schema) -> Self {
        self.fields.insert(label.into(), schema);
        self
    }

    pub fn field(&self, label: &str) -> Option<&Schema> {
        self.fields.get(label)
    }
}

impl From<StructSchema> for Schema {
    fn from(value: StructSchema) -> Self {
        Schema::Struct(value)
    }
}
