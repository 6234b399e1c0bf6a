//! Dynamic message values

use crate::codec::error::{CodecError, CodecResult};
use crate::codec::schema::{Cardinality, FieldDescriptor, FieldKind, MessageDescriptor};

/// A single field value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int32(i32),
    Int64(i64),
    Uint32(u32),
    Uint64(u64),
    /// Enum number; names are resolved through the field's enum descriptor
    Enum(i32),
    String(String),
    Bytes(Vec<u8>),
    Message(Box<DynamicMessage>),
    List(Vec<Value>),
    /// Unset sub-message or optional field
    Null,
}

impl Value {
    /// Zero value for a kind
    pub fn default_for(kind: FieldKind) -> Value {
        match kind {
            FieldKind::Bool => Value::Bool(false),
            FieldKind::Int32 => Value::Int32(0),
            FieldKind::Int64 => Value::Int64(0),
            FieldKind::Uint32 => Value::Uint32(0),
            FieldKind::Uint64 => Value::Uint64(0),
            FieldKind::Enum(_) => Value::Enum(0),
            FieldKind::String => Value::String(String::new()),
            FieldKind::Bytes => Value::Bytes(Vec::new()),
            FieldKind::Message(_) => Value::Null,
        }
    }

    /// Initial value of a field in a fresh message
    pub fn initial(field: &FieldDescriptor) -> Value {
        match field.cardinality {
            Cardinality::Repeated => Value::List(Vec::new()),
            Cardinality::Optional => Value::Null,
            Cardinality::Singular => Value::default_for(field.kind),
        }
    }

    /// Whether a singular scalar equals its zero value
    pub fn is_default(&self) -> bool {
        match self {
            Value::Bool(v) => !v,
            Value::Int32(v) => *v == 0,
            Value::Int64(v) => *v == 0,
            Value::Uint32(v) => *v == 0,
            Value::Uint64(v) => *v == 0,
            Value::Enum(v) => *v == 0,
            Value::String(v) => v.is_empty(),
            Value::Bytes(v) => v.is_empty(),
            Value::List(v) => v.is_empty(),
            Value::Message(_) => false,
            Value::Null => true,
        }
    }

    /// Whether this value may be stored in `field`
    pub fn fits(&self, field: &FieldDescriptor) -> bool {
        match (self, field.cardinality) {
            (Value::List(items), Cardinality::Repeated) => {
                items.iter().all(|item| item.fits_kind(field.kind))
            }
            (_, Cardinality::Repeated) => false,
            (Value::Null, Cardinality::Optional) => true,
            (Value::Null, Cardinality::Singular) => matches!(field.kind, FieldKind::Message(_)),
            (value, _) => value.fits_kind(field.kind),
        }
    }

    fn fits_kind(&self, kind: FieldKind) -> bool {
        match (self, kind) {
            (Value::Bool(_), FieldKind::Bool)
            | (Value::Int32(_), FieldKind::Int32)
            | (Value::Int64(_), FieldKind::Int64)
            | (Value::Uint32(_), FieldKind::Uint32)
            | (Value::Uint64(_), FieldKind::Uint64)
            | (Value::Enum(_), FieldKind::Enum(_))
            | (Value::String(_), FieldKind::String)
            | (Value::Bytes(_), FieldKind::Bytes) => true,
            (Value::Message(msg), FieldKind::Message(desc)) => std::ptr::eq(msg.descriptor, desc),
            _ => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Uint64(v) => Some(*v),
            Value::Uint32(v) => Some(u64::from(*v)),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_message(&self) -> Option<&DynamicMessage> {
        match self {
            Value::Message(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Uint64(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(value)
    }
}

impl From<DynamicMessage> for Value {
    fn from(value: DynamicMessage) -> Self {
        Value::Message(Box::new(value))
    }
}

/// A message instance: its descriptor plus one value per declared field
#[derive(Debug, Clone)]
pub struct DynamicMessage {
    pub descriptor: &'static MessageDescriptor,
    values: Vec<Value>,
}

impl DynamicMessage {
    /// Default instance: scalars zeroed, lists empty, sub-messages unset
    pub fn new(descriptor: &'static MessageDescriptor) -> Self {
        Self {
            descriptor,
            values: descriptor.fields.iter().map(Value::initial).collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        let (index, _) = self.descriptor.field_by_name(name)?;
        self.values.get(index)
    }

    /// Assign a field, checking the value against the field's type
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> CodecResult<()> {
        let value = value.into();
        let (index, field) =
            self.descriptor
                .field_by_name(name)
                .ok_or_else(|| CodecError::UnknownField {
                    message: self.descriptor.full_name,
                    field: name.to_string(),
                })?;
        if !value.fits(field) {
            return Err(CodecError::TypeMismatch {
                message: self.descriptor.full_name,
                field: field.name,
                expected: field.kind.type_name(),
                found: format!("{:?}", value),
            });
        }
        self.values[index] = value;
        Ok(())
    }

    /// Builder form of [`DynamicMessage::set`]
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> CodecResult<Self> {
        self.set(name, value)?;
        Ok(self)
    }

    /// Fields paired with their current values, in declaration order
    pub fn fields(&self) -> impl Iterator<Item = (&'static FieldDescriptor, &Value)> {
        self.descriptor.fields.iter().zip(self.values.iter())
    }

    pub(crate) fn value_mut(&mut self, index: usize) -> &mut Value {
        &mut self.values[index]
    }
}

impl PartialEq for DynamicMessage {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.descriptor, other.descriptor) && self.values == other.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::cosmos::COIN;
    use crate::proto::qbank::WITHDRAW;

    #[test]
    fn test_new_message_has_defaults() {
        let msg = DynamicMessage::new(&WITHDRAW);
        assert_eq!(msg.get("id"), Some(&Value::Uint64(0)));
        assert_eq!(msg.get("depositorAccAddress"), Some(&Value::String(String::new())));
        assert_eq!(msg.get("coin"), Some(&Value::Null));
    }

    #[test]
    fn test_set_checks_types() {
        let mut msg = DynamicMessage::new(&WITHDRAW);
        assert!(msg.set("id", 5u64).is_ok());
        assert!(matches!(
            msg.set("id", "five"),
            Err(CodecError::TypeMismatch { .. })
        ));
        assert!(matches!(
            msg.set("missing", 1u64),
            Err(CodecError::UnknownField { .. })
        ));

        let coin = DynamicMessage::new(&COIN);
        assert!(msg.set("coin", coin).is_ok());
        assert!(msg.set("coin", DynamicMessage::new(&WITHDRAW)).is_err());
    }
}
