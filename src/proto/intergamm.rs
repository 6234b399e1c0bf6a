//! `abag.quasarnode.intergamm` messages and the Osmosis pool types they carry

use crate::codec::{FieldDescriptor as F, FieldKind as K, MessageDescriptor};
use crate::proto::cosmos::COIN;

pub static BALANCER_POOL_PARAMS: MessageDescriptor = MessageDescriptor {
    full_name: "osmosis.gamm.poolmodels.balancer.BalancerPoolParams",
    fields: &[
        F::new(1, "swapFee", K::String),
        F::new(2, "exitFee", K::String),
    ],
};

pub static POOL_ASSET: MessageDescriptor = MessageDescriptor {
    full_name: "osmosis.gamm.poolmodels.balancer.PoolAsset",
    fields: &[
        F::new(1, "token", K::Message(&COIN)),
        F::new(2, "weight", K::String),
    ],
};

pub static BALANCER_POOL: MessageDescriptor = MessageDescriptor {
    full_name: "osmosis.gamm.poolmodels.balancer.BalancerPool",
    fields: &[
        F::new(1, "address", K::String),
        F::new(2, "id", K::Uint64),
        F::new(3, "poolParams", K::Message(&BALANCER_POOL_PARAMS)),
        F::new(4, "futurePoolGovernor", K::String),
        F::new(5, "totalShares", K::Message(&COIN)),
        F::new(6, "poolAssets", K::Message(&POOL_ASSET)).repeated(),
        F::new(7, "totalWeight", K::String),
    ],
};

pub static MSG_REGISTER_ACCOUNT: MessageDescriptor = MessageDescriptor {
    full_name: "abag.quasarnode.intergamm.MsgRegisterAccount",
    fields: &[
        F::new(1, "creator", K::String),
        F::new(2, "connectionId", K::String),
    ],
};

pub static MSG_CREATE_POOL: MessageDescriptor = MessageDescriptor {
    full_name: "abag.quasarnode.intergamm.MsgCreatePool",
    fields: &[
        F::new(1, "creator", K::String),
        F::new(2, "connectionId", K::String),
        F::new(3, "timeoutTimestamp", K::Uint64),
        F::new(4, "poolParams", K::Message(&BALANCER_POOL_PARAMS)),
        F::new(5, "poolAssets", K::Message(&POOL_ASSET)).repeated(),
        F::new(6, "futurePoolGovernor", K::String),
    ],
};

pub static MSG_JOIN_POOL: MessageDescriptor = MessageDescriptor {
    full_name: "abag.quasarnode.intergamm.MsgJoinPool",
    fields: &[
        F::new(1, "creator", K::String),
        F::new(2, "connectionId", K::String),
        F::new(3, "timeoutTimestamp", K::Uint64),
        F::new(4, "poolId", K::Uint64),
        F::new(5, "shareOutAmount", K::String),
        F::new(6, "tokenInMaxs", K::Message(&COIN)).repeated(),
    ],
};

pub static MSG_EXIT_POOL: MessageDescriptor = MessageDescriptor {
    full_name: "abag.quasarnode.intergamm.MsgExitPool",
    fields: &[
        F::new(1, "creator", K::String),
        F::new(2, "connectionId", K::String),
        F::new(3, "timeoutTimestamp", K::Uint64),
        F::new(4, "poolId", K::Uint64),
        F::new(5, "shareInAmount", K::String),
        F::new(6, "tokenOutMins", K::Message(&COIN)).repeated(),
    ],
};

pub static MSG_IBC_TRANSFER: MessageDescriptor = MessageDescriptor {
    full_name: "abag.quasarnode.intergamm.MsgIbcTransfer",
    fields: &[F::new(1, "creator", K::String)],
};

/// Module parameters; the chain currently defines none
pub static PARAMS: MessageDescriptor = MessageDescriptor {
    full_name: "abag.quasarnode.intergamm.Params",
    fields: &[],
};

pub static QUERY_INTERCHAIN_ACCOUNT_FROM_ADDRESS_REQUEST: MessageDescriptor = MessageDescriptor {
    full_name: "abag.quasarnode.intergamm.QueryInterchainAccountFromAddressRequest",
    fields: &[
        F::new(1, "owner", K::String),
        F::new(2, "connectionId", K::String),
    ],
};

pub static QUERY_INTERCHAIN_ACCOUNT_FROM_ADDRESS_RESPONSE: MessageDescriptor = MessageDescriptor {
    full_name: "abag.quasarnode.intergamm.QueryInterchainAccountFromAddressResponse",
    fields: &[F::new(1, "interchainAccountAddress", K::String)],
};

pub static MSGS: [&MessageDescriptor; 5] = [
    &MSG_REGISTER_ACCOUNT,
    &MSG_CREATE_POOL,
    &MSG_JOIN_POOL,
    &MSG_EXIT_POOL,
    &MSG_IBC_TRANSFER,
];

pub static TYPES: [&MessageDescriptor; 4] = [&PARAMS, &BALANCER_POOL, &POOL_ASSET, &BALANCER_POOL_PARAMS];
