//! Cosmos SDK and protobuf well-known types used by the quasar modules

use crate::codec::{EnumDescriptor, FieldDescriptor as F, FieldKind as K, MessageDescriptor};

pub static COIN: MessageDescriptor = MessageDescriptor {
    full_name: "cosmos.base.v1beta1.Coin",
    fields: &[
        F::new(1, "denom", K::String),
        F::new(2, "amount", K::String),
    ],
};

pub static PAGE_REQUEST: MessageDescriptor = MessageDescriptor {
    full_name: "cosmos.base.query.v1beta1.PageRequest",
    fields: &[
        F::new(1, "key", K::Bytes),
        F::new(2, "offset", K::Uint64),
        F::new(3, "limit", K::Uint64),
        F::new(4, "count_total", K::Bool),
        F::new(5, "reverse", K::Bool),
    ],
};

pub static PAGE_RESPONSE: MessageDescriptor = MessageDescriptor {
    full_name: "cosmos.base.query.v1beta1.PageResponse",
    fields: &[
        F::new(1, "next_key", K::Bytes),
        F::new(2, "total", K::Uint64),
    ],
};

pub static ANY: MessageDescriptor = MessageDescriptor {
    full_name: "google.protobuf.Any",
    fields: &[
        F::new(1, "type_url", K::String),
        F::new(2, "value", K::Bytes),
    ],
};

pub static PUB_KEY_SECP256K1: MessageDescriptor = MessageDescriptor {
    full_name: "cosmos.crypto.secp256k1.PubKey",
    fields: &[F::new(1, "key", K::Bytes)],
};

pub static TX_BODY: MessageDescriptor = MessageDescriptor {
    full_name: "cosmos.tx.v1beta1.TxBody",
    fields: &[
        F::new(1, "messages", K::Message(&ANY)).repeated(),
        F::new(2, "memo", K::String),
        F::new(3, "timeout_height", K::Uint64),
    ],
};

pub static SIGN_MODE: EnumDescriptor = EnumDescriptor {
    name: "cosmos.tx.signing.v1beta1.SignMode",
    values: &[
        ("SIGN_MODE_UNSPECIFIED", 0),
        ("SIGN_MODE_DIRECT", 1),
        ("SIGN_MODE_TEXTUAL", 2),
        ("SIGN_MODE_LEGACY_AMINO_JSON", 127),
    ],
};

pub static MODE_INFO_SINGLE: MessageDescriptor = MessageDescriptor {
    full_name: "cosmos.tx.v1beta1.ModeInfo.Single",
    fields: &[F::new(1, "mode", K::Enum(&SIGN_MODE))],
};

pub static MODE_INFO: MessageDescriptor = MessageDescriptor {
    full_name: "cosmos.tx.v1beta1.ModeInfo",
    fields: &[F::new(1, "single", K::Message(&MODE_INFO_SINGLE))],
};

pub static SIGNER_INFO: MessageDescriptor = MessageDescriptor {
    full_name: "cosmos.tx.v1beta1.SignerInfo",
    fields: &[
        F::new(1, "public_key", K::Message(&ANY)),
        F::new(2, "mode_info", K::Message(&MODE_INFO)),
        F::new(3, "sequence", K::Uint64),
    ],
};

pub static FEE: MessageDescriptor = MessageDescriptor {
    full_name: "cosmos.tx.v1beta1.Fee",
    fields: &[
        F::new(1, "amount", K::Message(&COIN)).repeated(),
        F::new(2, "gas_limit", K::Uint64),
        F::new(3, "payer", K::String),
        F::new(4, "granter", K::String),
    ],
};

pub static AUTH_INFO: MessageDescriptor = MessageDescriptor {
    full_name: "cosmos.tx.v1beta1.AuthInfo",
    fields: &[
        F::new(1, "signer_infos", K::Message(&SIGNER_INFO)).repeated(),
        F::new(2, "fee", K::Message(&FEE)),
    ],
};

pub static SIGN_DOC: MessageDescriptor = MessageDescriptor {
    full_name: "cosmos.tx.v1beta1.SignDoc",
    fields: &[
        F::new(1, "body_bytes", K::Bytes),
        F::new(2, "auth_info_bytes", K::Bytes),
        F::new(3, "chain_id", K::String),
        F::new(4, "account_number", K::Uint64),
    ],
};

pub static TX_RAW: MessageDescriptor = MessageDescriptor {
    full_name: "cosmos.tx.v1beta1.TxRaw",
    fields: &[
        F::new(1, "body_bytes", K::Bytes),
        F::new(2, "auth_info_bytes", K::Bytes),
        F::new(3, "signatures", K::Bytes).repeated(),
    ],
};
