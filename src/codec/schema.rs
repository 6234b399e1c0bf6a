//! Static message schemas
//!
//! Every message the chain speaks is described once by a `MessageDescriptor`
//! held in a `static`. The encoder, decoder and JSON converters walk these
//! tables instead of carrying per-message code.

use std::fmt;

use serde::Serialize;

/// How many values a field holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// Exactly one value; scalars equal to their default are not written
    Singular,
    /// Explicit presence; written whenever set, even at the default
    Optional,
    /// Zero or more values, order preserved
    Repeated,
}

/// Value type of a field
#[derive(Clone, Copy)]
pub enum FieldKind {
    Bool,
    Int32,
    Int64,
    Uint32,
    Uint64,
    Enum(&'static EnumDescriptor),
    String,
    Bytes,
    Message(&'static MessageDescriptor),
}

impl FieldKind {
    /// Type name as it appears in a `.proto` file
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::Bool => "bool",
            FieldKind::Int32 => "int32",
            FieldKind::Int64 => "int64",
            FieldKind::Uint32 => "uint32",
            FieldKind::Uint64 => "uint64",
            FieldKind::Enum(desc) => desc.name,
            FieldKind::String => "string",
            FieldKind::Bytes => "bytes",
            FieldKind::Message(desc) => desc.full_name,
        }
    }

    /// Whether repeated values of this kind are written packed
    pub fn is_packable(&self) -> bool {
        !matches!(
            self,
            FieldKind::String | FieldKind::Bytes | FieldKind::Message(_)
        )
    }
}

impl fmt::Debug for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Enum(desc) => write!(f, "Enum({})", desc.name),
            FieldKind::Message(desc) => write!(f, "Message({})", desc.full_name),
            other => f.write_str(other.type_name()),
        }
    }
}

/// One field of a message
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    pub number: u32,
    /// Name as declared in the schema
    pub name: &'static str,
    pub kind: FieldKind,
    pub cardinality: Cardinality,
}

impl FieldDescriptor {
    pub const fn new(number: u32, name: &'static str, kind: FieldKind) -> Self {
        Self {
            number,
            name,
            kind,
            cardinality: Cardinality::Singular,
        }
    }

    pub const fn repeated(self) -> Self {
        Self {
            cardinality: Cardinality::Repeated,
            ..self
        }
    }

    pub const fn optional(self) -> Self {
        Self {
            cardinality: Cardinality::Optional,
            ..self
        }
    }

    pub fn is_repeated(&self) -> bool {
        self.cardinality == Cardinality::Repeated
    }

    /// lowerCamelCase name used in JSON
    ///
    /// Follows protoc: underscores are dropped and the following letter is
    /// upper-cased. The first character is left as declared.
    pub fn json_name(&self) -> String {
        let mut out = String::with_capacity(self.name.len());
        let mut upper_next = false;
        for ch in self.name.chars() {
            if ch == '_' {
                upper_next = true;
            } else if upper_next {
                out.extend(ch.to_uppercase());
                upper_next = false;
            } else {
                out.push(ch);
            }
        }
        out
    }

    /// Whether `key` names this field in either JSON or schema spelling
    pub fn matches_key(&self, key: &str) -> bool {
        key == self.name || key == self.json_name()
    }
}

/// A message type
#[derive(Debug)]
pub struct MessageDescriptor {
    /// Fully-qualified name, e.g. `abag.quasarnode.qbank.Deposit`
    pub full_name: &'static str,
    pub fields: &'static [FieldDescriptor],
}

impl MessageDescriptor {
    /// Short name without the package prefix
    pub fn name(&self) -> &'static str {
        self.full_name
            .rsplit_once('.')
            .map(|(_, name)| name)
            .unwrap_or(self.full_name)
    }

    /// Type URL used in `Any` and in the message registry
    pub fn type_url(&self) -> String {
        format!("/{}", self.full_name)
    }

    pub fn field_by_number(&self, number: u32) -> Option<(usize, &'static FieldDescriptor)> {
        self.fields
            .iter()
            .enumerate()
            .find(|(_, field)| field.number == number)
    }

    pub fn field_by_name(&self, name: &str) -> Option<(usize, &'static FieldDescriptor)> {
        self.fields
            .iter()
            .enumerate()
            .find(|(_, field)| field.matches_key(name))
    }

    /// Field names and type names, in declaration order
    pub fn structure(&self) -> Vec<FieldInfo> {
        self.fields
            .iter()
            .map(|field| FieldInfo {
                name: field.json_name(),
                kind: field.kind.type_name(),
                repeated: field.is_repeated(),
            })
            .collect()
    }
}

/// Entry of a message structure listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub repeated: bool,
}

/// An enum type
#[derive(Debug)]
pub struct EnumDescriptor {
    pub name: &'static str,
    pub values: &'static [(&'static str, i32)],
}

impl EnumDescriptor {
    pub fn name_of(&self, number: i32) -> Option<&'static str> {
        self.values
            .iter()
            .find(|(_, n)| *n == number)
            .map(|(name, _)| *name)
    }

    pub fn number_of(&self, name: &str) -> Option<i32> {
        self.values
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, number)| *number)
    }
}
