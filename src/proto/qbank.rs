//! `abag.quasarnode.qbank` messages

use crate::codec::{EnumDescriptor, FieldDescriptor as F, FieldKind as K, MessageDescriptor};
use crate::proto::cosmos::{COIN, PAGE_REQUEST, PAGE_RESPONSE};

pub static LOCKUP_TYPES: EnumDescriptor = EnumDescriptor {
    name: "abag.quasarnode.qbank.LockupTypes",
    values: &[
        ("Invalid", 0),
        ("Days_7", 1),
        ("Days_21", 2),
        ("Months_1", 3),
        ("Months_3", 4),
    ],
};

pub static WHITE_LISTED_DENOM_IN_ORION: MessageDescriptor = MessageDescriptor {
    full_name: "abag.quasarnode.qbank.WhiteListedDenomInOrion",
    fields: &[
        F::new(1, "origin_name", K::String),
        F::new(2, "onehop_quasar", K::String),
        F::new(3, "onehop_osmo", K::String),
    ],
};

pub static PARAMS: MessageDescriptor = MessageDescriptor {
    full_name: "abag.quasarnode.qbank.Params",
    fields: &[
        F::new(1, "enabled", K::Bool),
        F::new(2, "min_orion_epoch_denom_dollar_deposit", K::String),
        F::new(3, "orion_epoch_identifier", K::String),
        F::new(4, "white_listed_denoms_in_orion", K::Message(&WHITE_LISTED_DENOM_IN_ORION)).repeated(),
    ],
};

pub static DEPOSIT: MessageDescriptor = MessageDescriptor {
    full_name: "abag.quasarnode.qbank.Deposit",
    fields: &[
        F::new(1, "id", K::Uint64),
        F::new(2, "riskProfile", K::String),
        F::new(3, "vaultID", K::String),
        F::new(4, "depositorAccAddress", K::String),
        F::new(5, "amount", K::String),
        F::new(6, "denom", K::String),
    ],
};

pub static WITHDRAW: MessageDescriptor = MessageDescriptor {
    full_name: "abag.quasarnode.qbank.Withdraw",
    fields: &[
        F::new(1, "id", K::Uint64),
        F::new(2, "riskProfile", K::String),
        F::new(3, "vaultID", K::String),
        F::new(4, "depositorAccAddress", K::String),
        F::new(5, "coin", K::Message(&COIN)),
    ],
};

pub static FEE_DATA: MessageDescriptor = MessageDescriptor {
    full_name: "abag.quasarnode.qbank.FeeData",
    fields: &[
        F::new(1, "feeCollector", K::String),
        F::new(2, "fromAddress", K::String),
        F::new(3, "fee", K::Message(&COIN)),
        F::new(4, "feeType", K::Uint64),
        F::new(5, "blockHeight", K::Uint64),
        F::new(6, "memo", K::String),
    ],
};

pub static Q_COINS: MessageDescriptor = MessageDescriptor {
    full_name: "abag.quasarnode.qbank.QCoins",
    fields: &[F::new(1, "coins", K::Message(&COIN)).repeated()],
};

pub static Q_DENOMS: MessageDescriptor = MessageDescriptor {
    full_name: "abag.quasarnode.qbank.QDenoms",
    fields: &[F::new(1, "denoms", K::String).repeated()],
};

pub static GENESIS_STATE: MessageDescriptor = MessageDescriptor {
    full_name: "abag.quasarnode.qbank.GenesisState",
    fields: &[
        F::new(1, "params", K::Message(&PARAMS)),
        F::new(2, "depositList", K::Message(&DEPOSIT)).repeated(),
        F::new(3, "depositCount", K::Uint64),
    ],
};

pub static MSG_REQUEST_DEPOSIT: MessageDescriptor = MessageDescriptor {
    full_name: "abag.quasarnode.qbank.MsgRequestDeposit",
    fields: &[
        F::new(1, "creator", K::String),
        F::new(2, "riskProfile", K::String),
        F::new(3, "vaultID", K::String),
        F::new(4, "coin", K::Message(&COIN)),
        F::new(5, "lockupPeriod", K::Enum(&LOCKUP_TYPES)),
    ],
};

pub static MSG_REQUEST_WITHDRAW: MessageDescriptor = MessageDescriptor {
    full_name: "abag.quasarnode.qbank.MsgRequestWithdraw",
    fields: &[
        F::new(1, "creator", K::String),
        F::new(2, "riskProfile", K::String),
        F::new(3, "vaultID", K::String),
        F::new(4, "coin", K::Message(&COIN)),
    ],
};

pub static MSG_CLAIM_REWARDS: MessageDescriptor = MessageDescriptor {
    full_name: "abag.quasarnode.qbank.MsgClaimRewards",
    fields: &[
        F::new(1, "creator", K::String),
        F::new(2, "vaultID", K::String),
    ],
};

pub static MSG_REQUEST_WITHDRAW_ALL: MessageDescriptor = MessageDescriptor {
    full_name: "abag.quasarnode.qbank.MsgRequestWithdrawAll",
    fields: &[
        F::new(1, "creator", K::String),
        F::new(2, "vaultID", K::String),
    ],
};

pub static QUERY_PARAMS_RESPONSE: MessageDescriptor = MessageDescriptor {
    full_name: "abag.quasarnode.qbank.QueryParamsResponse",
    fields: &[F::new(1, "params", K::Message(&PARAMS))],
};

pub static QUERY_GET_DEPOSIT_REQUEST: MessageDescriptor = MessageDescriptor {
    full_name: "abag.quasarnode.qbank.QueryGetDepositRequest",
    fields: &[F::new(1, "id", K::Uint64)],
};

pub static QUERY_GET_DEPOSIT_RESPONSE: MessageDescriptor = MessageDescriptor {
    full_name: "abag.quasarnode.qbank.QueryGetDepositResponse",
    fields: &[F::new(1, "Deposit", K::Message(&DEPOSIT))],
};

pub static QUERY_ALL_DEPOSIT_REQUEST: MessageDescriptor = MessageDescriptor {
    full_name: "abag.quasarnode.qbank.QueryAllDepositRequest",
    fields: &[F::new(1, "pagination", K::Message(&PAGE_REQUEST))],
};

pub static QUERY_ALL_DEPOSIT_RESPONSE: MessageDescriptor = MessageDescriptor {
    full_name: "abag.quasarnode.qbank.QueryAllDepositResponse",
    fields: &[
        F::new(1, "Deposit", K::Message(&DEPOSIT)).repeated(),
        F::new(2, "pagination", K::Message(&PAGE_RESPONSE)),
    ],
};

pub static QUERY_USER_DENOM_DEPOSIT_REQUEST: MessageDescriptor = MessageDescriptor {
    full_name: "abag.quasarnode.qbank.QueryUserDenomDepositRequest",
    fields: &[
        F::new(1, "userAcc", K::String),
        F::new(2, "denom", K::String),
    ],
};

pub static QUERY_USER_DENOM_DEPOSIT_RESPONSE: MessageDescriptor = MessageDescriptor {
    full_name: "abag.quasarnode.qbank.QueryUserDenomDepositResponse",
    fields: &[F::new(1, "amount", K::Uint64)],
};

/// Transaction messages accepted by the qbank module
pub static MSGS: [&MessageDescriptor; 4] = [
    &MSG_REQUEST_DEPOSIT,
    &MSG_REQUEST_WITHDRAW,
    &MSG_CLAIM_REWARDS,
    &MSG_REQUEST_WITHDRAW_ALL,
];

/// State types whose structure the store exposes
pub static TYPES: [&MessageDescriptor; 4] = [&DEPOSIT, &PARAMS, &WITHDRAW, &FEE_DATA];
