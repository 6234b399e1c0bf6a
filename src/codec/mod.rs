//! Schema-driven protobuf codec

pub mod error;
pub mod json;
pub mod registry;
pub mod schema;
pub mod value;
pub mod wire;

pub use error::{CodecError, CodecResult, MAX_SAFE_INTEGER};
pub use json::{from_json, from_partial, to_json};
pub use registry::{EncodeObject, TypeRegistry};
pub use schema::{Cardinality, EnumDescriptor, FieldDescriptor, FieldInfo, FieldKind, MessageDescriptor};
pub use value::{DynamicMessage, Value};
pub use wire::{decode, encode};
