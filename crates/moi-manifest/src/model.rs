use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::ManifestError;

/// Stable element identifier within a manifest.
pub type ElementPtr = u32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub syntax: Syntax,
    pub engine: EngineConfig,
    #[serde(default, deserialize_with = "null_as_default")]
    pub elements: Vec<Element>,
}

impl Manifest {
    pub fn from_json(json: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, ManifestError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_json(&self) -> Result<String, ManifestError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Syntax {
    Version(u64),
    Name(String),
}

impl fmt::Display for Syntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Syntax::Version(v) => write!(f, "{v}"),
            Syntax::Name(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub flags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub ptr: ElementPtr,
    #[serde(default, deserialize_with = "null_as_default")]
    pub deps: Vec<ElementPtr>,
    #[serde(flatten)]
    pub data: ElementData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "lowercase")]
pub enum ElementData {
    Constant(Constant),
    Typedef(String),
    Class(Class),
    State(State),
    Routine(Routine),
    Method(Method),
    Event(Event),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Constant,
    Typedef,
    Class,
    State,
    Routine,
    Method,
    Event,
}

impl ElementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ElementKind::Constant => "constant",
            ElementKind::Typedef => "typedef",
            ElementKind::Class => "class",
            ElementKind::State => "state",
            ElementKind::Routine => "routine",
            ElementKind::Method => "method",
            ElementKind::Event => "event",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Element {
    pub fn kind(&self) -> ElementKind {
        match &self.data {
            ElementData::Constant(_) => ElementKind::Constant,
            ElementData::Typedef(_) => ElementKind::Typedef,
            ElementData::Class(_) => ElementKind::Class,
            ElementData::State(_) => ElementKind::State,
            ElementData::Routine(_) => ElementKind::Routine,
            ElementData::Method(_) => ElementKind::Method,
            ElementData::Event(_) => ElementKind::Event,
        }
    }

    pub fn as_class(&self) -> Option<&Class> {
        match &self.data {
            ElementData::Class(class) => Some(class),
            _ => None,
        }
    }

    pub fn as_state(&self) -> Option<&State> {
        match &self.data {
            ElementData::State(state) => Some(state),
            _ => None,
        }
    }

    pub fn as_routine(&self) -> Option<&Routine> {
        match &self.data {
            ElementData::Routine(routine) => Some(routine),
            _ => None,
        }
    }

    pub fn as_method(&self) -> Option<&Method> {
        match &self.data {
            ElementData::Method(method) => Some(method),
            _ => None,
        }
    }

    pub fn as_event(&self) -> Option<&Event> {
        match &self.data {
            ElementData::Event(event) => Some(event),
            _ => None,
        }
    }
}

/// One declared field. `slot` is the stable storage / argument position and is
/// independent of where the field appears in its list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeField {
    pub slot: u32,
    pub label: String,
    #[serde(rename = "type")]
    pub ty: String,
}

impl TypeField {
    pub fn new(slot: u32, label: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            slot,
            label: label.into(),
            ty: ty.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constant {
    #[serde(rename = "type")]
    pub ty: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Class {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub fields: Vec<TypeField>,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<MethodField>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodField {
    pub ptr: ElementPtr,
    pub code: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateMode {
    Persistent,
    Ephemeral,
}

impl fmt::Display for StateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateMode::Persistent => f.write_str("persistent"),
            StateMode::Ephemeral => f.write_str("ephemeral"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    pub mode: StateMode,
    #[serde(default, deserialize_with = "null_as_default")]
    pub fields: Vec<TypeField>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutineKind {
    Invoke,
    #[serde(alias = "deployer")]
    Deploy,
    Enlist,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutineMode {
    Persistent,
    Ephemeral,
    Readonly,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instructions {
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub bin: Vec<u8>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub hex: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub asm: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Routine {
    pub name: String,
    pub kind: RoutineKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<RoutineMode>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub accepts: Vec<TypeField>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub returns: Vec<TypeField>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub executes: Instructions,
    #[serde(default, deserialize_with = "null_as_default")]
    pub catches: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    pub class: String,
    #[serde(default)]
    pub mutable: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub accepts: Vec<TypeField>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub returns: Vec<TypeField>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub executes: Instructions,
    #[serde(default, deserialize_with = "null_as_default")]
    pub catches: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub name: String,
    #[serde(default)]
    pub topics: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub fields: Vec<TypeField>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
