//! Logic manifest data model, type descriptor grammar and schema resolution.

mod cache;
pub mod config;
mod descriptor;
mod error;
mod fingerprint;
mod index;
mod model;
mod resolve;

pub use cache::SchemaCache;
pub use config::ResolverConfig;
pub use descriptor::{CLASS_PREFIX, Primitive, TypeDescriptor};
pub use error::ManifestError;
pub use fingerprint::{HASH_PREFIX, ManifestHash, to_canonical_cbor};
pub use index::{EventDef, ManifestIndex, MethodDef, RoutineDef, StateMatrix};
pub use model::*;
pub use resolve::{Position, TypeResolver, resolve, resolve_fields};

#[cfg(test)]
mod tests;
