//! Codec error types

use thiserror::Error;

/// Largest integer a JSON number can carry without losing precision (2^53 - 1).
pub const MAX_SAFE_INTEGER: u64 = 9_007_199_254_740_991;

/// Errors raised while decoding wire bytes or importing JSON
#[derive(Debug, Error)]
pub enum CodecError {
    /// Input ended in the middle of a field
    #[error("buffer truncated while reading {context}")]
    Truncated { context: &'static str },

    /// Malformed varint, tag or wire type
    #[error("malformed wire data: {0}")]
    Wire(#[from] prost::DecodeError),

    /// A known field arrived with a wire type its kind cannot use
    #[error("field {field} of {message}: unexpected wire type {wire_type}")]
    WireTypeMismatch {
        message: &'static str,
        field: &'static str,
        wire_type: u8,
    },

    /// EndGroup without a matching StartGroup
    #[error("unexpected end-group tag for field {number}")]
    UnexpectedEndGroup { number: u32 },

    /// Sub-messages or unknown groups nested deeper than the decoder allows
    #[error("nesting deeper than {limit} levels")]
    RecursionLimit { limit: u32 },

    /// 64-bit value outside the range a JSON number can represent exactly
    #[error("field {field} of {message}: value {value} is greater than Number.MAX_SAFE_INTEGER")]
    UnsafeInteger {
        message: &'static str,
        field: &'static str,
        value: String,
    },

    /// String field that is not valid UTF-8
    #[error("field {field} of {message}: invalid utf-8")]
    InvalidUtf8 {
        message: &'static str,
        field: &'static str,
    },

    /// JSON value does not have the field's expected type
    #[error("field {field} of {message}: expected {expected}, got {found}")]
    TypeMismatch {
        message: &'static str,
        field: &'static str,
        expected: &'static str,
        found: String,
    },

    /// Enum name that the enum does not define
    #[error("enum {enum_name}: unknown value {value}")]
    UnknownEnumValue {
        enum_name: &'static str,
        value: String,
    },

    /// Field name the message does not declare
    #[error("{message} has no field named {field}")]
    UnknownField {
        message: &'static str,
        field: String,
    },

    /// Top-level JSON input is not an object
    #[error("{message}: expected a JSON object")]
    NotAnObject { message: &'static str },

    /// Type URL not present in the registry
    #[error("unknown type url {0}")]
    UnknownType(String),
}

pub type CodecResult<T> = Result<T, CodecError>;
