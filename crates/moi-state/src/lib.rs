//! Storage addressing for logic state: 32-byte keys, accessor chains and the
//! builders that navigate a manifest's state layout to produce them.

mod accessor;
mod builder;
mod entity;
mod error;
mod key;

pub use accessor::{Accessor, generate_storage_key};
pub use builder::AccessorBuilder;
pub use entity::EntityBuilder;
pub use error::AccessError;
pub use key::{KEY_LENGTH, StorageKey, sum256};
