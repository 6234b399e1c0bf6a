//! `abag.quasarnode.qoracle` messages

use crate::codec::{FieldDescriptor as F, FieldKind as K, MessageDescriptor};
use crate::proto::intergamm::BALANCER_POOL;

/// Module parameters; the chain currently defines none
pub static PARAMS: MessageDescriptor = MessageDescriptor {
    full_name: "abag.quasarnode.qoracle.Params",
    fields: &[],
};

pub static POOL_SPOT_PRICE: MessageDescriptor = MessageDescriptor {
    full_name: "abag.quasarnode.qoracle.PoolSpotPrice",
    fields: &[
        F::new(1, "poolId", K::String),
        F::new(2, "denomIn", K::String),
        F::new(3, "denomOut", K::String),
        F::new(4, "price", K::String),
        F::new(5, "lastUpdatedTime", K::Uint64),
        F::new(6, "creator", K::String),
    ],
};

pub static POOL_INFO: MessageDescriptor = MessageDescriptor {
    full_name: "abag.quasarnode.qoracle.PoolInfo",
    fields: &[
        F::new(1, "poolId", K::String),
        F::new(2, "info", K::Message(&BALANCER_POOL)),
        F::new(3, "lastUpdatedTime", K::Uint64),
        F::new(4, "creator", K::String),
    ],
};

pub static POOL_METRICS: MessageDescriptor = MessageDescriptor {
    full_name: "abag.quasarnode.qoracle.PoolMetrics",
    fields: &[
        F::new(1, "aPY", K::String),
        F::new(2, "tVL", K::String),
    ],
};

pub static POOL_POSITION: MessageDescriptor = MessageDescriptor {
    full_name: "abag.quasarnode.qoracle.PoolPosition",
    fields: &[
        F::new(1, "aPY", K::Uint64),
        F::new(2, "tVL", K::Uint64),
        F::new(3, "lastUpdatedTime", K::Uint64),
        F::new(4, "creator", K::String),
    ],
};

pub static POOL_RANKING: MessageDescriptor = MessageDescriptor {
    full_name: "abag.quasarnode.qoracle.PoolRanking",
    fields: &[
        F::new(1, "poolIdsSortedByAPY", K::String).repeated(),
        F::new(2, "poolIdsSortedByTVL", K::String).repeated(),
        F::new(3, "lastUpdatedTime", K::Uint64),
        F::new(4, "creator", K::String),
    ],
};

pub static SORTED_POOLS: MessageDescriptor = MessageDescriptor {
    full_name: "abag.quasarnode.qoracle.SortedPools",
    fields: &[F::new(1, "ID", K::Uint64).repeated()],
};

pub static MSG_CREATE_POOL_POSITION: MessageDescriptor = MessageDescriptor {
    full_name: "abag.quasarnode.qoracle.MsgCreatePoolPosition",
    fields: &[
        F::new(1, "creator", K::String),
        F::new(2, "poolID", K::Uint64),
        F::new(3, "aPY", K::Uint64),
        F::new(4, "tVL", K::Uint64),
        F::new(5, "lastUpdatedTime", K::Uint64),
    ],
};

pub static MSG_UPDATE_POOL_POSITION: MessageDescriptor = MessageDescriptor {
    full_name: "abag.quasarnode.qoracle.MsgUpdatePoolPosition",
    fields: &[
        F::new(1, "creator", K::String),
        F::new(2, "poolID", K::Uint64),
        F::new(3, "aPY", K::Uint64),
        F::new(4, "tVL", K::Uint64),
        F::new(5, "lastUpdatedTime", K::Uint64),
    ],
};

pub static MSG_DELETE_POOL_POSITION: MessageDescriptor = MessageDescriptor {
    full_name: "abag.quasarnode.qoracle.MsgDeletePoolPosition",
    fields: &[
        F::new(1, "creator", K::String),
        F::new(2, "poolID", K::Uint64),
    ],
};

pub static MSGS: [&MessageDescriptor; 3] = [
    &MSG_CREATE_POOL_POSITION,
    &MSG_UPDATE_POOL_POSITION,
    &MSG_DELETE_POOL_POSITION,
];

pub static TYPES: [&MessageDescriptor; 6] = [
    &PARAMS,
    &POOL_INFO,
    &POOL_METRICS,
    &POOL_POSITION,
    &POOL_RANKING,
    &POOL_SPOT_PRICE,
];
