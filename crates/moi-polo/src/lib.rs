//! POLO wire codec together with the schema and value model that drives it.

mod decode;
mod encode;
mod error;
mod integer;
mod schema;
mod value;
mod wire;

pub use decode::decode;
pub use encode::{encode, encode_document, encode_key};
pub use error::PoloError;
pub use integer::Integer;
pub use schema::{Schema, StructSchema};
pub use value::{Value, ValueKey};
pub use wire::WireType;
