//! Manifest-aware argument and output coding plus typed state reads for a
//! single logic.

mod calldata;
mod coder;
mod descriptor;
mod error;
mod exception;
mod state;

pub use coder::ManifestCoder;
pub use descriptor::LogicDescriptor;
pub use error::LogicError;
pub use exception::{BUILTIN_LOG_EVENT, Exception, builtin_log_schema, exception_schema};
pub use state::{EphemeralState, PersistentState, StateAccess, StorageReader};
