//! JSON conversion for dynamic messages
//!
//! `to_json` produces the shape the chain's REST gateway and the web store
//! exchange: lowerCamelCase keys, 64-bit integers as numbers, bytes as base64,
//! enums by name. Two importers are provided:
//!
//! - `from_json` coerces loosely typed input (numbers sent as strings, enum
//!   names or numbers), which is what REST responses look like.
//! - `from_partial` fills defaults for missing fields but requires every
//!   present value to already carry the field's JSON type.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde_json::{Map, Value as Json};

use crate::codec::error::{CodecError, CodecResult, MAX_SAFE_INTEGER};
use crate::codec::schema::{Cardinality, FieldDescriptor, FieldKind, MessageDescriptor};
use crate::codec::value::{DynamicMessage, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Lenient,
    Strict,
}

/// Export a message as a JSON object
pub fn to_json(msg: &DynamicMessage) -> Json {
    let mut obj = Map::new();
    for (field, value) in msg.fields() {
        let rendered = match value {
            Value::Null => continue,
            Value::List(items) => Json::Array(
                items
                    .iter()
                    .map(|item| scalar_to_json(field.kind, item))
                    .collect(),
            ),
            other => scalar_to_json(field.kind, other),
        };
        obj.insert(field.json_name(), rendered);
    }
    Json::Object(obj)
}

/// Import a message, coercing loosely typed values
pub fn from_json(desc: &'static MessageDescriptor, json: &Json) -> CodecResult<DynamicMessage> {
    import(desc, json, Mode::Lenient)
}

/// Build a message from a possibly incomplete object
pub fn from_partial(desc: &'static MessageDescriptor, json: &Json) -> CodecResult<DynamicMessage> {
    import(desc, json, Mode::Strict)
}

fn scalar_to_json(kind: FieldKind, value: &Value) -> Json {
    match value {
        Value::Bool(v) => Json::from(*v),
        Value::Int32(v) => Json::from(*v),
        Value::Int64(v) => Json::from(*v),
        Value::Uint32(v) => Json::from(*v),
        Value::Uint64(v) => Json::from(*v),
        Value::Enum(number) => match kind {
            FieldKind::Enum(desc) => desc
                .name_of(*number)
                .map(Json::from)
                .unwrap_or_else(|| Json::from(*number)),
            _ => Json::from(*number),
        },
        Value::String(s) => Json::from(s.as_str()),
        Value::Bytes(b) => Json::from(BASE64.encode(b)),
        Value::Message(inner) => to_json(inner),
        Value::List(items) => Json::Array(items.iter().map(|i| scalar_to_json(kind, i)).collect()),
        Value::Null => Json::Null,
    }
}

fn import(desc: &'static MessageDescriptor, json: &Json, mode: Mode) -> CodecResult<DynamicMessage> {
    let obj = json.as_object().ok_or(CodecError::NotAnObject {
        message: desc.full_name,
    })?;
    let mut msg = DynamicMessage::new(desc);

    for (index, field) in desc.fields.iter().enumerate() {
        let Some(raw) = lookup(obj, field) else {
            continue;
        };
        let value = match field.cardinality {
            Cardinality::Repeated => {
                let items = raw
                    .as_array()
                    .ok_or_else(|| mismatch(desc, field, "array", raw))?;
                let converted = items
                    .iter()
                    .map(|item| convert(desc, field, item, mode))
                    .collect::<CodecResult<Vec<_>>>()?;
                Value::List(converted)
            }
            Cardinality::Singular | Cardinality::Optional => convert(desc, field, raw, mode)?,
        };
        *msg.value_mut(index) = value;
    }

    Ok(msg)
}

/// Present, non-null value for a field under either spelling of its name
fn lookup<'a>(obj: &'a Map<String, Json>, field: &FieldDescriptor) -> Option<&'a Json> {
    obj.get(&field.json_name())
        .or_else(|| obj.get(field.name))
        .filter(|value| !value.is_null())
}

fn convert(
    desc: &'static MessageDescriptor,
    field: &'static FieldDescriptor,
    raw: &Json,
    mode: Mode,
) -> CodecResult<Value> {
    let value = match field.kind {
        FieldKind::Bool => Value::Bool(match (raw, mode) {
            (Json::Bool(b), _) => *b,
            (Json::String(s), Mode::Lenient) if s == "true" || s == "false" => s == "true",
            (Json::Number(n), Mode::Lenient) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
            _ => return Err(mismatch(desc, field, "bool", raw)),
        }),
        FieldKind::Int32 => {
            let v = integer(desc, field, raw, mode)?;
            Value::Int32(i32::try_from(v).map_err(|_| mismatch(desc, field, "int32", raw))?)
        }
        FieldKind::Uint32 => {
            let v = integer(desc, field, raw, mode)?;
            Value::Uint32(u32::try_from(v).map_err(|_| mismatch(desc, field, "uint32", raw))?)
        }
        FieldKind::Int64 => Value::Int64(safe(desc, field, integer(desc, field, raw, mode)?)? as i64),
        FieldKind::Uint64 => {
            let v = safe(desc, field, integer(desc, field, raw, mode)?)?;
            Value::Uint64(u64::try_from(v).map_err(|_| mismatch(desc, field, "uint64", raw))?)
        }
        FieldKind::Enum(enum_desc) => match raw {
            Json::String(name) => match enum_desc.number_of(name) {
                Some(number) => Value::Enum(number),
                None if mode == Mode::Lenient => match name.parse::<i32>() {
                    Ok(number) => Value::Enum(number),
                    Err(_) => {
                        return Err(CodecError::UnknownEnumValue {
                            enum_name: enum_desc.name,
                            value: name.clone(),
                        })
                    }
                },
                None => {
                    return Err(CodecError::UnknownEnumValue {
                        enum_name: enum_desc.name,
                        value: name.clone(),
                    })
                }
            },
            Json::Number(_) => {
                let v = integer(desc, field, raw, Mode::Strict)?;
                Value::Enum(i32::try_from(v).map_err(|_| mismatch(desc, field, "enum", raw))?)
            }
            _ => return Err(mismatch(desc, field, "enum", raw)),
        },
        FieldKind::String => Value::String(match (raw, mode) {
            (Json::String(s), _) => s.clone(),
            (Json::Number(n), Mode::Lenient) => n.to_string(),
            (Json::Bool(b), Mode::Lenient) => b.to_string(),
            _ => return Err(mismatch(desc, field, "string", raw)),
        }),
        FieldKind::Bytes => Value::Bytes(match raw {
            Json::String(s) => BASE64
                .decode(s)
                .map_err(|_| mismatch(desc, field, "base64 bytes", raw))?,
            Json::Array(items) if mode == Mode::Strict => items
                .iter()
                .map(|item| item.as_u64().and_then(|b| u8::try_from(b).ok()))
                .collect::<Option<Vec<u8>>>()
                .ok_or_else(|| mismatch(desc, field, "byte array", raw))?,
            _ => return Err(mismatch(desc, field, "bytes", raw)),
        }),
        FieldKind::Message(inner) => {
            if !raw.is_object() {
                return Err(mismatch(desc, field, "object", raw));
            }
            Value::Message(Box::new(import(inner, raw, mode)?))
        }
    };
    Ok(value)
}

/// Whole number from a JSON number, or from a decimal string when lenient
fn integer(
    desc: &'static MessageDescriptor,
    field: &'static FieldDescriptor,
    raw: &Json,
    mode: Mode,
) -> CodecResult<i128> {
    let parsed = match (raw, mode) {
        (Json::Number(n), _) => n
            .as_i64()
            .map(i128::from)
            .or_else(|| n.as_u64().map(i128::from)),
        (Json::String(s), Mode::Lenient) => s.trim().parse::<i128>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| mismatch(desc, field, "integer", raw))
}

fn safe(
    desc: &'static MessageDescriptor,
    field: &'static FieldDescriptor,
    value: i128,
) -> CodecResult<i128> {
    if value.unsigned_abs() > u128::from(MAX_SAFE_INTEGER) {
        return Err(CodecError::UnsafeInteger {
            message: desc.full_name,
            field: field.name,
            value: value.to_string(),
        });
    }
    Ok(value)
}

fn mismatch(
    desc: &'static MessageDescriptor,
    field: &'static FieldDescriptor,
    expected: &'static str,
    raw: &Json,
) -> CodecError {
    CodecError::TypeMismatch {
        message: desc.full_name,
        field: field.name,
        expected,
        found: raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::cosmos::PAGE_REQUEST;
    use crate::proto::qbank::{DEPOSIT, MSG_REQUEST_DEPOSIT, QUERY_ALL_DEPOSIT_RESPONSE};
    use serde_json::json;

    #[test]
    fn test_to_json_emits_scalars_and_lists() {
        let msg = DynamicMessage::new(&QUERY_ALL_DEPOSIT_RESPONSE);
        assert_eq!(to_json(&msg), json!({ "Deposit": [] }));

        let deposit = DynamicMessage::new(&DEPOSIT).with("id", 3u64).unwrap();
        let out = to_json(&deposit);
        assert_eq!(out["id"], json!(3));
        assert_eq!(out["denom"], json!(""));
    }

    #[test]
    fn test_from_json_coerces_rest_strings() {
        let msg = from_json(
            &DEPOSIT,
            &json!({ "id": "42", "vaultID": "orion", "amount": 1000 }),
        )
        .unwrap();
        assert_eq!(msg.get("id"), Some(&Value::Uint64(42)));
        assert_eq!(msg.get("amount"), Some(&Value::String("1000".into())));
    }

    #[test]
    fn test_from_partial_is_strict() {
        let err = from_partial(&DEPOSIT, &json!({ "id": "42" })).unwrap_err();
        assert!(matches!(err, CodecError::TypeMismatch { .. }));

        let msg = from_partial(&DEPOSIT, &json!({ "id": 42, "denom": null })).unwrap();
        assert_eq!(msg.get("id"), Some(&Value::Uint64(42)));
        assert_eq!(msg.get("denom"), Some(&Value::String(String::new())));
    }

    #[test]
    fn test_enum_names_and_unknown_numbers() {
        let msg = from_partial(
            &MSG_REQUEST_DEPOSIT,
            &json!({ "creator": "quasar1", "lockupPeriod": "Days_21" }),
        )
        .unwrap();
        assert_eq!(msg.get("lockupPeriod"), Some(&Value::Enum(2)));
        assert_eq!(to_json(&msg)["lockupPeriod"], json!("Days_21"));

        let mut unknown = msg.clone();
        unknown.set("lockupPeriod", Value::Enum(42)).unwrap();
        assert_eq!(to_json(&unknown)["lockupPeriod"], json!(42));

        assert!(matches!(
            from_partial(&MSG_REQUEST_DEPOSIT, &json!({ "lockupPeriod": "Years_9" })),
            Err(CodecError::UnknownEnumValue { .. })
        ));
    }

    #[test]
    fn test_bytes_and_snake_case_keys() {
        let msg = from_json(&PAGE_REQUEST, &json!({ "key": "AQID", "count_total": true })).unwrap();
        assert_eq!(msg.get("key"), Some(&Value::Bytes(vec![1, 2, 3])));
        assert_eq!(msg.get("countTotal"), Some(&Value::Bool(true)));
        assert_eq!(to_json(&msg)["key"], json!("AQID"));

        let partial = from_partial(&PAGE_REQUEST, &json!({ "key": [1, 2, 3] })).unwrap();
        assert_eq!(partial.get("key"), Some(&Value::Bytes(vec![1, 2, 3])));
    }

    #[test]
    fn test_unsafe_integer_rejected_in_json() {
        assert!(matches!(
            from_json(&DEPOSIT, &json!({ "id": "9007199254740992" })),
            Err(CodecError::UnsafeInteger { .. })
        ));
    }
}
