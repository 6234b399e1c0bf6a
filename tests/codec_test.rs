//! Wire and JSON behavior of the schema-driven codec

use serde_json::json;

use qmonitor::codec::{
    decode, encode, from_json, from_partial, to_json, CodecError, DynamicMessage, TypeRegistry,
    Value,
};
use qmonitor::proto::{cosmos, intergamm, qbank, qoracle};

fn deposit(id: u64, amount: &str) -> DynamicMessage {
    DynamicMessage::new(&qbank::DEPOSIT)
        .with("id", id)
        .and_then(|m| m.with("riskProfile", "LOW"))
        .and_then(|m| m.with("vaultID", "orion"))
        .and_then(|m| m.with("depositorAccAddress", "quasar1depositor"))
        .and_then(|m| m.with("amount", amount))
        .and_then(|m| m.with("denom", "uqsr"))
        .unwrap()
}

#[test]
fn test_genesis_round_trip() {
    let params = from_json(
        &qbank::PARAMS,
        &json!({
            "enabled": true,
            "min_orion_epoch_denom_dollar_deposit": "100",
            "orion_epoch_identifier": "day",
            "white_listed_denoms_in_orion": [
                { "origin_name": "uatom", "onehop_quasar": "ibc/A", "onehop_osmo": "ibc/B" }
            ]
        }),
    )
    .unwrap();

    let genesis = DynamicMessage::new(&qbank::GENESIS_STATE)
        .with("params", params)
        .and_then(|m| {
            m.with(
                "depositList",
                Value::List(vec![deposit(1, "10").into(), deposit(2, "20").into()]),
            )
        })
        .and_then(|m| m.with("depositCount", 2u64))
        .unwrap();

    let bytes = encode(&genesis);
    let decoded = decode(&qbank::GENESIS_STATE, &bytes).unwrap();
    assert_eq!(decoded, genesis);
    assert_eq!(encode(&decoded), bytes);
}

#[test]
fn test_omitted_defaults_decode_to_schema_default() {
    for desc in qbank::TYPES.iter().chain(qoracle::TYPES.iter()).chain(intergamm::TYPES.iter()) {
        let empty = DynamicMessage::new(desc);
        assert!(encode(&empty).is_empty(), "{} encodes bytes", desc.full_name);
        assert_eq!(decode(desc, &[]).unwrap(), empty);
    }
}

#[test]
fn test_default_fields_are_skipped() {
    let msg = DynamicMessage::new(&cosmos::COIN)
        .with("denom", "uqsr")
        .unwrap();
    // Only field 1; the empty amount is not written.
    assert_eq!(encode(&msg), vec![0x0a, 0x04, b'u', b'q', b's', b'r']);
}

#[test]
fn test_unknown_fields_of_every_wire_type_are_skipped() {
    let mut bytes = vec![
        0x50, 0x96, 0x01, // field 10, varint 150
        0x59, 1, 2, 3, 4, 5, 6, 7, 8, // field 11, fixed64
        0x62, 0x03, b'a', b'b', b'c', // field 12, length-delimited
        0x6b, 0x08, 0x01, 0x6c, // field 13, group holding a varint
        0x75, 1, 2, 3, 4, // field 14, fixed32
    ];
    bytes.extend(encode(&deposit(9, "5")));

    let decoded = decode(&qbank::DEPOSIT, &bytes).unwrap();
    assert_eq!(decoded, deposit(9, "5"));
}

#[test]
fn test_uint64_above_safe_range_fails() {
    // field 1 (id), varint 2^53
    let mut bytes = vec![0x08];
    let mut v: u64 = 1 << 53;
    while v >= 0x80 {
        bytes.push((v as u8) | 0x80);
        v >>= 7;
    }
    bytes.push(v as u8);

    let err = decode(&qbank::DEPOSIT, &bytes).unwrap_err();
    assert!(matches!(err, CodecError::UnsafeInteger { .. }), "{err:?}");

    let err = from_json(&qbank::DEPOSIT, &json!({ "id": "9007199254740992" })).unwrap_err();
    assert!(matches!(err, CodecError::UnsafeInteger { .. }), "{err:?}");
    assert!(from_json(&qbank::DEPOSIT, &json!({ "id": "9007199254740991" })).is_ok());
}

#[test]
fn test_packed_and_unpacked_repeated_decode_identically() {
    let packed = [0x0a, 0x03, 0x01, 0x02, 0x03];
    let unpacked = [0x08, 0x01, 0x08, 0x02, 0x08, 0x03];

    let a = decode(&qoracle::SORTED_POOLS, &packed).unwrap();
    let b = decode(&qoracle::SORTED_POOLS, &unpacked).unwrap();
    assert_eq!(a, b);
    assert_eq!(
        a.get("ID").and_then(Value::as_list).map(<[Value]>::len),
        Some(3)
    );
    // Encoding always uses the packed form.
    assert_eq!(encode(&b), packed.to_vec());
}

#[test]
fn test_truncated_input_fails() {
    let bytes = encode(&deposit(3, "100"));
    let err = decode(&qbank::DEPOSIT, &bytes[..bytes.len() - 1]).unwrap_err();
    assert!(matches!(err, CodecError::Truncated { .. }), "{err:?}");
}

#[test]
fn test_json_export_shape() {
    let msg = DynamicMessage::new(&qbank::MSG_REQUEST_DEPOSIT)
        .with("creator", "quasar1me")
        .and_then(|m| m.with("lockupPeriod", Value::Enum(2)))
        .unwrap();
    assert_eq!(
        to_json(&msg),
        json!({
            "creator": "quasar1me",
            "riskProfile": "",
            "vaultID": "",
            "lockupPeriod": "Days_21"
        })
    );

    let pools = DynamicMessage::new(&qoracle::SORTED_POOLS)
        .with("ID", Value::List(vec![Value::Uint64(4), Value::Uint64(1)]))
        .unwrap();
    assert_eq!(to_json(&pools), json!({ "ID": [4, 1] }));
}

#[test]
fn test_lenient_and_strict_import() {
    let rest = json!({ "id": "12", "amount": "5", "denom": "uqsr" });
    let lenient = from_json(&qbank::DEPOSIT, &rest).unwrap();
    assert_eq!(lenient.get("id").and_then(Value::as_u64), Some(12));

    let err = from_partial(&qbank::DEPOSIT, &rest).unwrap_err();
    assert!(matches!(err, CodecError::TypeMismatch { .. }), "{err:?}");

    let partial = from_partial(&qbank::DEPOSIT, &json!({ "id": 12, "denom": null })).unwrap();
    assert_eq!(partial.get("id").and_then(Value::as_u64), Some(12));
    assert_eq!(partial.get("denom").and_then(Value::as_str), Some(""));
}

#[test]
fn test_any_round_trip_through_registry() {
    let registry = TypeRegistry::quasar();
    let object = registry
        .encode_object(
            "/abag.quasarnode.qbank.MsgRequestWithdraw",
            &json!({
                "creator": "quasar1me",
                "riskProfile": "HIGH",
                "vaultID": "orion",
                "coin": { "denom": "uqsr", "amount": "42" }
            }),
        )
        .unwrap();

    let any = object.to_any().unwrap();
    let bytes = encode(&any);
    let unpacked = registry
        .unpack_any(&decode(&cosmos::ANY, &bytes).unwrap())
        .unwrap();
    assert_eq!(unpacked, object);

    let err = registry
        .encode_object("/abag.quasarnode.qbank.Nope", &json!({}))
        .unwrap_err();
    assert!(matches!(err, CodecError::UnknownType(_)));
}
