//! CosmWasm smart queries against vault and primitive contracts

use anyhow::{Context, Result};
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine as _;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::chain::client::QueryClient;

/// REST path of a smart query; the query message travels base64 in the path
pub fn smart_query_path(contract: &str, msg: &Value) -> Result<String> {
    let raw = serde_json::to_vec(msg).context("failed to serialize smart query")?;
    Ok(format!(
        "/cosmwasm/wasm/v1/contract/{}/smart/{}",
        contract,
        URL_SAFE.encode(raw)
    ))
}

/// Run a smart query and return the contract's `data`
pub async fn smart_query(client: &dyn QueryClient, contract: &str, msg: &Value) -> Result<Value> {
    let path = smart_query_path(contract, msg)?;
    let body = client.get(&path, &[]).await?;
    body.get("data")
        .cloned()
        .context("smart query response has no data")
}

/// A strategy contract the vault deposits into
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PrimitiveInfo {
    pub address: String,
    pub weight: String,
    #[serde(default)]
    pub init: Value,
}

/// Contract queries used by the monitor
pub struct ContractQuerier<'a> {
    client: &'a dyn QueryClient,
}

impl<'a> ContractQuerier<'a> {
    pub fn new(client: &'a dyn QueryClient) -> Self {
        Self { client }
    }

    pub async fn investment(&self, vault: &str) -> Result<Value> {
        smart_query(self.client, vault, &json!({ "investment": {} })).await
    }

    /// Primitives listed in the vault's investment info
    pub async fn primitives(&self, vault: &str) -> Result<Vec<PrimitiveInfo>> {
        let investment = self.investment(vault).await?;
        let primitives = investment
            .pointer("/info/primitives")
            .cloned()
            .context("investment info has no primitives")?;
        serde_json::from_value(primitives).context("malformed primitive list")
    }

    pub async fn token_info(&self, vault: &str) -> Result<Value> {
        smart_query(self.client, vault, &json!({ "token_info": {} })).await
    }

    pub async fn vault_cap(&self, vault: &str) -> Result<Value> {
        smart_query(self.client, vault, &json!({ "get_cap": {} })).await
    }

    /// Interchain account address the primitive controls on the host chain
    pub async fn ica_address(&self, primitive: &str) -> Result<String> {
        let data = smart_query(self.client, primitive, &json!({ "ica_address": {} })).await?;
        data.get("address")
            .and_then(Value::as_str)
            .map(str::to_string)
            .context("ica_address response has no address")
    }

    pub async fn lock(&self, primitive: &str) -> Result<Value> {
        let data = smart_query(self.client, primitive, &json!({ "lock": {} })).await?;
        data.get("lock").cloned().context("lock response has no lock")
    }

    pub async fn pending_acks(&self, primitive: &str) -> Result<Value> {
        let data = smart_query(self.client, primitive, &json!({ "list_pending_acks": {} })).await?;
        data.get("pending")
            .cloned()
            .context("list_pending_acks response has no pending")
    }

    pub async fn trapped_errors(&self, primitive: &str) -> Result<Value> {
        let data = smart_query(self.client, primitive, &json!({ "trapped_errors": {} })).await?;
        data.get("errors")
            .cloned()
            .context("trapped_errors response has no errors")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smart_query_path() {
        let path = smart_query_path("quasar1vault", &json!({ "investment": {} })).unwrap();
        // {"investment":{}}
        assert_eq!(
            path,
            "/cosmwasm/wasm/v1/contract/quasar1vault/smart/eyJpbnZlc3RtZW50Ijp7fX0="
        );
    }

    #[test]
    fn test_primitive_info_deserializes() {
        let info: PrimitiveInfo = serde_json::from_value(json!({
            "address": "quasar1prim",
            "weight": "0.5",
            "init": { "l_p": { "pool_id": 1 } }
        }))
        .unwrap();
        assert_eq!(info.weight, "0.5");
        assert!(info.init.get("l_p").is_some());
    }
}
