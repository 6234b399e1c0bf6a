//! Transaction building and broadcast
//!
//! Messages are wrapped in `Any`, placed in a `TxBody`, paired with an
//! `AuthInfo` carrying the signer and fee, signed over the `SignDoc` bytes
//! (SIGN_MODE_DIRECT) and broadcast as a `TxRaw`.

use std::sync::Arc;

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as Json};

use crate::chain::client::QueryClient;
use crate::codec::{encode, DynamicMessage, EncodeObject, Value};
use crate::proto::cosmos;

/// Gas limit used when the caller does not pick one
pub const DEFAULT_GAS: &str = "200000";

const SIGN_MODE_DIRECT: i32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: String,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            denom: denom.into(),
            amount: amount.into(),
        }
    }
}

/// Fee attached to a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdFee {
    pub amount: Vec<Coin>,
    pub gas: String,
}

impl Default for StdFee {
    fn default() -> Self {
        Self {
            amount: Vec::new(),
            gas: DEFAULT_GAS.to_string(),
        }
    }
}

/// Outcome of a broadcast as reported by the node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastResult {
    pub height: u64,
    pub txhash: String,
    pub code: u32,
    pub raw_log: String,
}

impl BroadcastResult {
    pub fn is_ok(&self) -> bool {
        self.code == 0
    }
}

/// Holder of the account key
#[async_trait::async_trait]
pub trait Signer: Send + Sync + 'static {
    /// Bech32 account address
    fn address(&self) -> &str;

    /// Compressed secp256k1 public key
    fn public_key(&self) -> Vec<u8>;

    /// Sign the serialized `SignDoc`
    async fn sign(&self, sign_doc: &[u8]) -> Result<Vec<u8>>;
}

/// Signs and broadcasts transactions
#[async_trait::async_trait]
pub trait TxClient: Send + Sync + 'static {
    /// Address of the signing account
    fn address(&self) -> &str;

    /// Sign the messages with the account key and submit them
    async fn sign_and_broadcast(
        &self,
        msgs: &[EncodeObject],
        fee: &StdFee,
        memo: &str,
    ) -> Result<BroadcastResult>;
}

/// Account number and sequence of the signer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountInfo {
    pub account_number: u64,
    pub sequence: u64,
}

/// [`TxClient`] over the REST gateway
pub struct RestTxClient {
    client: Arc<dyn QueryClient>,
    signer: Arc<dyn Signer>,
    chain_id: String,
}

impl RestTxClient {
    pub fn new(client: Arc<dyn QueryClient>, signer: Arc<dyn Signer>, chain_id: impl Into<String>) -> Self {
        Self {
            client,
            signer,
            chain_id: chain_id.into(),
        }
    }

    pub async fn account(&self) -> Result<AccountInfo> {
        let path = format!("/cosmos/auth/v1beta1/accounts/{}", self.signer.address());
        let body = self.client.get(&path, &[]).await?;
        parse_account(&body)
    }
}

#[async_trait::async_trait]
impl TxClient for RestTxClient {
    fn address(&self) -> &str {
        self.signer.address()
    }

    async fn sign_and_broadcast(
        &self,
        msgs: &[EncodeObject],
        fee: &StdFee,
        memo: &str,
    ) -> Result<BroadcastResult> {
        let account = self.account().await.context("failed to load signer account")?;
        let body_bytes = encode(&tx_body(msgs, memo)?);
        let auth_info_bytes = encode(&auth_info(&self.signer.public_key(), account.sequence, fee)?);
        let sign_doc = sign_doc(&body_bytes, &auth_info_bytes, &self.chain_id, account.account_number)?;
        let signature = self.signer.sign(&encode(&sign_doc)).await?;

        let tx_raw = DynamicMessage::new(&cosmos::TX_RAW)
            .with("body_bytes", body_bytes)?
            .with("auth_info_bytes", auth_info_bytes)?
            .with("signatures", Value::List(vec![Value::Bytes(signature)]))?;
        let request = json!({
            "tx_bytes": BASE64.encode(encode(&tx_raw)),
            "mode": "BROADCAST_MODE_SYNC",
        });

        tracing::info!(
            msgs = msgs.len(),
            sequence = account.sequence,
            pubkey = %hex::encode(self.signer.public_key()),
            "broadcasting tx"
        );
        let response = self.client.post("/cosmos/tx/v1beta1/txs", &request).await?;
        parse_broadcast(&response)
    }
}

pub fn tx_body(msgs: &[EncodeObject], memo: &str) -> Result<DynamicMessage> {
    let anys = msgs
        .iter()
        .map(|msg| msg.to_any().map(Value::from))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(DynamicMessage::new(&cosmos::TX_BODY)
        .with("messages", Value::List(anys))?
        .with("memo", memo)?)
}

pub fn auth_info(public_key: &[u8], sequence: u64, fee: &StdFee) -> Result<DynamicMessage> {
    let key = DynamicMessage::new(&cosmos::PUB_KEY_SECP256K1).with("key", public_key.to_vec())?;
    let any_key = DynamicMessage::new(&cosmos::ANY)
        .with("type_url", cosmos::PUB_KEY_SECP256K1.type_url())?
        .with("value", encode(&key))?;
    let single = DynamicMessage::new(&cosmos::MODE_INFO_SINGLE).with("mode", Value::Enum(SIGN_MODE_DIRECT))?;
    let mode_info = DynamicMessage::new(&cosmos::MODE_INFO).with("single", single)?;
    let signer_info = DynamicMessage::new(&cosmos::SIGNER_INFO)
        .with("public_key", any_key)?
        .with("mode_info", mode_info)?
        .with("sequence", sequence)?;

    let gas_limit: u64 = fee
        .gas
        .parse()
        .with_context(|| format!("invalid gas limit {:?}", fee.gas))?;
    let mut coins = Vec::with_capacity(fee.amount.len());
    for coin in &fee.amount {
        let msg = DynamicMessage::new(&cosmos::COIN)
            .with("denom", coin.denom.as_str())?
            .with("amount", coin.amount.as_str())?;
        coins.push(Value::from(msg));
    }
    let fee = DynamicMessage::new(&cosmos::FEE)
        .with("amount", Value::List(coins))?
        .with("gas_limit", gas_limit)?;

    Ok(DynamicMessage::new(&cosmos::AUTH_INFO)
        .with("signer_infos", Value::List(vec![Value::from(signer_info)]))?
        .with("fee", fee)?)
}

pub fn sign_doc(
    body_bytes: &[u8],
    auth_info_bytes: &[u8],
    chain_id: &str,
    account_number: u64,
) -> Result<DynamicMessage> {
    Ok(DynamicMessage::new(&cosmos::SIGN_DOC)
        .with("body_bytes", body_bytes.to_vec())?
        .with("auth_info_bytes", auth_info_bytes.to_vec())?
        .with("chain_id", chain_id)?
        .with("account_number", account_number)?)
}

/// Read account number and sequence from `/cosmos/auth/v1beta1/accounts/{addr}`
pub fn parse_account(body: &Json) -> Result<AccountInfo> {
    let account = body.get("account").context("response has no account")?;
    // Vesting and module accounts nest the base account.
    let base = account
        .get("base_account")
        .or_else(|| account.get("base_vesting_account").and_then(|v| v.get("base_account")))
        .unwrap_or(account);
    Ok(AccountInfo {
        account_number: number_field(base, "account_number")?,
        sequence: number_field(base, "sequence")?,
    })
}

pub fn parse_broadcast(body: &Json) -> Result<BroadcastResult> {
    let tx = body.get("tx_response").context("response has no tx_response")?;
    Ok(BroadcastResult {
        height: number_field(tx, "height").unwrap_or(0),
        txhash: tx
            .get("txhash")
            .and_then(Json::as_str)
            .unwrap_or_default()
            .to_string(),
        code: u32::try_from(number_field(tx, "code").unwrap_or(0)).unwrap_or(u32::MAX),
        raw_log: tx
            .get("raw_log")
            .and_then(Json::as_str)
            .unwrap_or_default()
            .to_string(),
    })
}

/// 64-bit counters arrive as decimal strings from the gateway
fn number_field(obj: &Json, key: &str) -> Result<u64> {
    match obj.get(key) {
        Some(Json::String(s)) => s.parse().with_context(|| format!("{key} is not a number: {s}")),
        Some(Json::Number(n)) => n.as_u64().with_context(|| format!("{key} is not a u64")),
        None | Some(Json::Null) => Ok(0),
        Some(other) => anyhow::bail!("{key} has unexpected value {other}"),
    }
}
