use moi_polo::{Schema, StructSchema, Value};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::LogicError;

/// Name of the log event every logic may emit without declaring it.
pub const BUILTIN_LOG_EVENT: &str = "builtin.Log";

static EXCEPTION_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::Struct(
        StructSchema::new()
            .with_field("class", Schema::String)
            .with_field("error", Schema::String)
            .with_field("revert", Schema::Bool)
            .with_field("trace", Schema::array(Schema::String)),
    )
});

static BUILTIN_LOG_SCHEMA: Lazy<Schema> =
    Lazy::new(|| Schema::Struct(StructSchema::new().with_field("value", Schema::String)));

/// Fixed schema of execution errors; independent of any manifest.
pub fn exception_schema() -> &'static Schema {
    &EXCEPTION_SCHEMA
}

pub fn builtin_log_schema() -> &'static Schema {
    &BUILTIN_LOG_SCHEMA
}

/// Error raised by a failed execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exception {
    pub class: String,
    pub error: String,
    pub revert: bool,
    pub trace: Vec<String>,
}

impl TryFrom<Value> for Exception {
    type Error = LogicError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        if !matches!(value, Value::Struct(_)) {
            return Err(LogicError::MalformedException(format!(
                "expected struct, found {}",
                value.kind()
            )));
        }
        let text = |label: &str| -> Result<String, LogicError> {
            match value.get(label) {
                Some(Value::String(s)) => Ok(s.clone()),
                None | Some(Value::Null) => Ok(String::new()),
                Some(other) => Err(LogicError::MalformedException(format!(
                    "'{label}' is {}",
                    other.kind()
                ))),
            }
        };
        let class = text("class")?;
        let error = text("error")?;
        let revert = match value.get("revert") {
            Some(Value::Bool(b)) => *b,
            _ => false,
        };
        let trace = match value.get("trace") {
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_str().map(str::to_owned).ok_or_else(|| {
                        LogicError::MalformedException(format!("trace entry is {}", item.kind()))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?,
            _ => Vec::new(),
        };
        Ok(Exception {
            class,
            error,
            revert,
            trace,
        })
    }
}
