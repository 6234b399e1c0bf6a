//! Protobuf binary encoding driven by message descriptors

use prost::encoding::{decode_key, decode_varint, encode_key, encode_varint, WireType};

use crate::codec::error::{CodecError, CodecResult, MAX_SAFE_INTEGER};
use crate::codec::schema::{Cardinality, FieldDescriptor, FieldKind, MessageDescriptor};
use crate::codec::value::{DynamicMessage, Value};

/// Encode a message to wire bytes
///
/// Fields are written in ascending field-number order. Singular scalars at
/// their zero value and empty repeated fields produce no bytes.
pub fn encode(msg: &DynamicMessage) -> Vec<u8> {
    let mut buf = Vec::new();
    encode_into(msg, &mut buf);
    buf
}

/// Nesting allowed for sub-messages and unknown groups, as in prost
pub const RECURSION_LIMIT: u32 = 100;

/// Decode wire bytes into a message of type `desc`
pub fn decode(desc: &'static MessageDescriptor, bytes: &[u8]) -> CodecResult<DynamicMessage> {
    decode_nested(desc, bytes, RECURSION_LIMIT)
}

fn decode_nested(
    desc: &'static MessageDescriptor,
    bytes: &[u8],
    depth: u32,
) -> CodecResult<DynamicMessage> {
    if depth == 0 {
        return Err(CodecError::RecursionLimit {
            limit: RECURSION_LIMIT,
        });
    }
    let mut buf = bytes;
    let mut msg = DynamicMessage::new(desc);

    while !buf.is_empty() {
        let (number, wire_type) = decode_key(&mut buf)?;
        let Some((index, field)) = desc.field_by_number(number) else {
            skip_field(number, wire_type, &mut buf, depth - 1)?;
            continue;
        };

        if field.is_repeated() && field.kind.is_packable() && wire_type == WireType::LengthDelimited {
            let mut packed = take_length_delimited(&mut buf, "packed field")?;
            let mut items = Vec::new();
            while !packed.is_empty() {
                items.push(read_scalar(desc, field, &mut packed)?);
            }
            if let Value::List(list) = msg.value_mut(index) {
                list.extend(items);
            }
            continue;
        }

        if wire_type != expected_wire_type(field.kind) {
            return Err(CodecError::WireTypeMismatch {
                message: desc.full_name,
                field: field.name,
                wire_type: wire_type as u8,
            });
        }

        let value = read_value(desc, field, &mut buf, depth)?;
        match field.cardinality {
            Cardinality::Repeated => {
                if let Value::List(list) = msg.value_mut(index) {
                    list.push(value);
                }
            }
            // Last occurrence wins for singular fields, sub-messages included.
            Cardinality::Singular | Cardinality::Optional => *msg.value_mut(index) = value,
        }
    }

    Ok(msg)
}

fn encode_into(msg: &DynamicMessage, buf: &mut Vec<u8>) {
    let mut fields: Vec<_> = msg.fields().collect();
    fields.sort_by_key(|(field, _)| field.number);

    for (field, value) in fields {
        match field.cardinality {
            Cardinality::Repeated => {
                let Some(items) = value.as_list() else {
                    continue;
                };
                if items.is_empty() {
                    continue;
                }
                if field.kind.is_packable() {
                    let mut packed = Vec::new();
                    for item in items {
                        if let Some(raw) = varint_of(item) {
                            encode_varint(raw, &mut packed);
                        }
                    }
                    encode_key(field.number, WireType::LengthDelimited, buf);
                    encode_varint(packed.len() as u64, buf);
                    buf.extend_from_slice(&packed);
                } else {
                    for item in items {
                        write_value(field, item, buf);
                    }
                }
            }
            Cardinality::Optional => {
                if !matches!(value, Value::Null) {
                    write_value(field, value, buf);
                }
            }
            Cardinality::Singular => {
                let set = match field.kind {
                    FieldKind::Message(_) => !matches!(value, Value::Null),
                    _ => !value.is_default(),
                };
                if set {
                    write_value(field, value, buf);
                }
            }
        }
    }
}

fn write_value(field: &FieldDescriptor, value: &Value, buf: &mut Vec<u8>) {
    match value {
        Value::String(s) => {
            encode_key(field.number, WireType::LengthDelimited, buf);
            encode_varint(s.len() as u64, buf);
            buf.extend_from_slice(s.as_bytes());
        }
        Value::Bytes(b) => {
            encode_key(field.number, WireType::LengthDelimited, buf);
            encode_varint(b.len() as u64, buf);
            buf.extend_from_slice(b);
        }
        Value::Message(inner) => {
            let mut nested = Vec::new();
            encode_into(inner, &mut nested);
            encode_key(field.number, WireType::LengthDelimited, buf);
            encode_varint(nested.len() as u64, buf);
            buf.extend_from_slice(&nested);
        }
        other => {
            if let Some(raw) = varint_of(other) {
                encode_key(field.number, WireType::Varint, buf);
                encode_varint(raw, buf);
            }
        }
    }
}

/// Raw varint payload of a scalar; negative 32-bit values are sign-extended
fn varint_of(value: &Value) -> Option<u64> {
    match value {
        Value::Bool(v) => Some(u64::from(*v)),
        Value::Int32(v) | Value::Enum(v) => Some(i64::from(*v) as u64),
        Value::Int64(v) => Some(*v as u64),
        Value::Uint32(v) => Some(u64::from(*v)),
        Value::Uint64(v) => Some(*v),
        _ => None,
    }
}

fn expected_wire_type(kind: FieldKind) -> WireType {
    match kind {
        FieldKind::String | FieldKind::Bytes | FieldKind::Message(_) => WireType::LengthDelimited,
        _ => WireType::Varint,
    }
}

fn read_value(
    desc: &'static MessageDescriptor,
    field: &'static FieldDescriptor,
    buf: &mut &[u8],
    depth: u32,
) -> CodecResult<Value> {
    match field.kind {
        FieldKind::String => {
            let raw = take_length_delimited(buf, "string")?;
            let text = std::str::from_utf8(raw).map_err(|_| CodecError::InvalidUtf8 {
                message: desc.full_name,
                field: field.name,
            })?;
            Ok(Value::String(text.to_string()))
        }
        FieldKind::Bytes => Ok(Value::Bytes(take_length_delimited(buf, "bytes")?.to_vec())),
        FieldKind::Message(inner) => {
            let raw = take_length_delimited(buf, "sub-message")?;
            Ok(Value::Message(Box::new(decode_nested(inner, raw, depth - 1)?)))
        }
        _ => read_scalar(desc, field, buf),
    }
}

fn read_scalar(
    desc: &'static MessageDescriptor,
    field: &'static FieldDescriptor,
    buf: &mut &[u8],
) -> CodecResult<Value> {
    let raw = decode_varint(buf)?;
    let unsafe_integer = || CodecError::UnsafeInteger {
        message: desc.full_name,
        field: field.name,
        value: raw.to_string(),
    };
    let value = match field.kind {
        FieldKind::Bool => Value::Bool(raw != 0),
        FieldKind::Int32 => Value::Int32(raw as i32),
        FieldKind::Enum(_) => Value::Enum(raw as i32),
        FieldKind::Uint32 => Value::Uint32(raw as u32),
        FieldKind::Uint64 => {
            if raw > MAX_SAFE_INTEGER {
                return Err(unsafe_integer());
            }
            Value::Uint64(raw)
        }
        FieldKind::Int64 => {
            let signed = raw as i64;
            if signed.unsigned_abs() > MAX_SAFE_INTEGER {
                return Err(CodecError::UnsafeInteger {
                    message: desc.full_name,
                    field: field.name,
                    value: signed.to_string(),
                });
            }
            Value::Int64(signed)
        }
        FieldKind::String | FieldKind::Bytes | FieldKind::Message(_) => {
            return Err(CodecError::WireTypeMismatch {
                message: desc.full_name,
                field: field.name,
                wire_type: WireType::Varint as u8,
            });
        }
    };
    Ok(value)
}

fn take_length_delimited<'a>(buf: &mut &'a [u8], context: &'static str) -> CodecResult<&'a [u8]> {
    let len = decode_varint(buf)?;
    take(buf, len, context)
}

fn take<'a>(buf: &mut &'a [u8], len: u64, context: &'static str) -> CodecResult<&'a [u8]> {
    let len = usize::try_from(len).map_err(|_| CodecError::Truncated { context })?;
    if len > buf.len() {
        return Err(CodecError::Truncated { context });
    }
    let (head, tail) = buf.split_at(len);
    *buf = tail;
    Ok(head)
}

/// Skip one unknown field, recursing through legacy groups
///
/// `depth` is the nesting still allowed below this field.
fn skip_field(number: u32, wire_type: WireType, buf: &mut &[u8], depth: u32) -> CodecResult<()> {
    match wire_type {
        WireType::Varint => {
            decode_varint(buf)?;
        }
        WireType::SixtyFourBit => {
            take(buf, 8, "fixed64")?;
        }
        WireType::ThirtyTwoBit => {
            take(buf, 4, "fixed32")?;
        }
        WireType::LengthDelimited => {
            take_length_delimited(buf, "length-delimited field")?;
        }
        WireType::StartGroup => {
            if depth == 0 {
                return Err(CodecError::RecursionLimit {
                    limit: RECURSION_LIMIT,
                });
            }
            loop {
                if buf.is_empty() {
                    return Err(CodecError::Truncated { context: "group" });
                }
                let (inner, inner_type) = decode_key(buf)?;
                if inner_type == WireType::EndGroup {
                    if inner != number {
                        return Err(CodecError::UnexpectedEndGroup { number: inner });
                    }
                    break;
                }
                skip_field(inner, inner_type, buf, depth - 1)?;
            }
        }
        WireType::EndGroup => return Err(CodecError::UnexpectedEndGroup { number }),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::cosmos::{COIN, PAGE_REQUEST};
    use crate::proto::qbank::{DEPOSIT, MSG_REQUEST_DEPOSIT, QUERY_USER_DENOM_DEPOSIT_RESPONSE};

    fn coin(denom: &str, amount: &str) -> DynamicMessage {
        DynamicMessage::new(&COIN)
            .with("denom", denom)
            .and_then(|m| m.with("amount", amount))
            .unwrap()
    }

    #[test]
    fn test_coin_matches_reference_bytes() {
        let bytes = encode(&coin("uqsr", "10"));
        assert_eq!(
            bytes,
            vec![0x0a, 0x04, b'u', b'q', b's', b'r', 0x12, 0x02, b'1', b'0']
        );
    }

    #[test]
    fn test_default_message_encodes_empty() {
        assert!(encode(&DynamicMessage::new(&DEPOSIT)).is_empty());
        assert_eq!(decode(&DEPOSIT, &[]).unwrap(), DynamicMessage::new(&DEPOSIT));
    }

    #[test]
    fn test_empty_sub_message_still_written() {
        let mut msg = DynamicMessage::new(&MSG_REQUEST_DEPOSIT);
        msg.set("coin", DynamicMessage::new(&COIN)).unwrap();
        assert_eq!(encode(&msg), vec![0x22, 0x00]);
    }

    #[test]
    fn test_enum_field_round_trip() {
        let mut msg = DynamicMessage::new(&MSG_REQUEST_DEPOSIT);
        msg.set("creator", "quasar1abc").unwrap();
        msg.set("lockupPeriod", Value::Enum(3)).unwrap();
        msg.set("coin", coin("uosmo", "500")).unwrap();

        let decoded = decode(&MSG_REQUEST_DEPOSIT, &encode(&msg)).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_uint64_above_safe_range_rejected() {
        let mut bytes = Vec::new();
        encode_key(1, WireType::Varint, &mut bytes);
        encode_varint(MAX_SAFE_INTEGER + 1, &mut bytes);
        assert!(matches!(
            decode(&QUERY_USER_DENOM_DEPOSIT_RESPONSE, &bytes),
            Err(CodecError::UnsafeInteger { .. })
        ));

        let mut ok = Vec::new();
        encode_key(1, WireType::Varint, &mut ok);
        encode_varint(MAX_SAFE_INTEGER, &mut ok);
        let decoded = decode(&QUERY_USER_DENOM_DEPOSIT_RESPONSE, &ok).unwrap();
        assert_eq!(decoded.get("amount"), Some(&Value::Uint64(MAX_SAFE_INTEGER)));
    }

    #[test]
    fn test_unknown_fields_of_every_wire_type_skipped() {
        let mut bytes = Vec::new();
        encode_key(20, WireType::Varint, &mut bytes);
        encode_varint(300, &mut bytes);
        encode_key(21, WireType::SixtyFourBit, &mut bytes);
        bytes.extend_from_slice(&[0u8; 8]);
        encode_key(22, WireType::LengthDelimited, &mut bytes);
        encode_varint(3, &mut bytes);
        bytes.extend_from_slice(b"xyz");
        encode_key(23, WireType::StartGroup, &mut bytes);
        encode_key(1, WireType::Varint, &mut bytes);
        encode_varint(1, &mut bytes);
        encode_key(23, WireType::EndGroup, &mut bytes);
        encode_key(24, WireType::ThirtyTwoBit, &mut bytes);
        bytes.extend_from_slice(&[0u8; 4]);
        bytes.extend_from_slice(&encode(&coin("uqsr", "7")));

        let decoded = decode(&COIN, &bytes).unwrap();
        assert_eq!(decoded, coin("uqsr", "7"));
    }

    fn nested_groups(levels: usize) -> Vec<u8> {
        let mut bytes = Vec::new();
        for _ in 0..levels {
            encode_key(20, WireType::StartGroup, &mut bytes);
        }
        for _ in 0..levels {
            encode_key(20, WireType::EndGroup, &mut bytes);
        }
        bytes
    }

    #[test]
    fn test_deeply_nested_groups_hit_recursion_limit() {
        let bytes = nested_groups(200_000);
        assert!(matches!(
            decode(&COIN, &bytes),
            Err(CodecError::RecursionLimit { limit: RECURSION_LIMIT })
        ));

        let mut shallow = nested_groups(50);
        shallow.extend_from_slice(&encode(&coin("uqsr", "7")));
        assert_eq!(decode(&COIN, &shallow).unwrap(), coin("uqsr", "7"));
    }

    #[test]
    fn test_truncated_input_fails() {
        let bytes = encode(&coin("uqsr", "10"));
        assert!(decode(&COIN, &bytes[..bytes.len() - 1]).is_err());
    }

    #[test]
    fn test_wire_type_mismatch_rejected() {
        let mut bytes = Vec::new();
        encode_key(2, WireType::LengthDelimited, &mut bytes);
        encode_varint(1, &mut bytes);
        bytes.push(0x01);
        assert!(matches!(
            decode(&PAGE_REQUEST, &bytes),
            Err(CodecError::WireTypeMismatch { .. })
        ));
    }
}
