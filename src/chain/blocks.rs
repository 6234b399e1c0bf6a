//! New-block notifications by polling the latest block height

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::chain::client::QueryClient;

const LATEST_BLOCK_PATH: &str = "/cosmos/base/tendermint/v1beta1/blocks/latest";

/// Polls the node and emits each new height once
pub struct BlockWatcher {
    client: Arc<dyn QueryClient>,
    poll: Duration,
}

impl BlockWatcher {
    pub fn new(client: Arc<dyn QueryClient>, poll: Duration) -> Self {
        Self { client, poll }
    }

    /// Start polling; the receiver closes when `token` is cancelled
    pub fn spawn(self, token: CancellationToken) -> mpsc::Receiver<u64> {
        let (tx, rx) = mpsc::channel(16);
        tokio::spawn(async move {
            let mut ticker = interval(self.poll);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut last: Option<u64> = None;

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {}
                }
                match latest_height(self.client.as_ref()).await {
                    Ok(height) if last.map_or(true, |prev| height > prev) => {
                        last = Some(height);
                        if tx.send(height).await.is_err() {
                            break;
                        }
                    }
                    Ok(_) => {}
                    Err(err) => tracing::warn!("block poll failed: {:#}", err),
                }
            }
        });
        rx
    }
}

/// Height of the latest block known to the node
pub async fn latest_height(client: &dyn QueryClient) -> Result<u64> {
    let body = client.get(LATEST_BLOCK_PATH, &[]).await?;
    parse_height(&body)
}

fn parse_height(body: &Value) -> Result<u64> {
    let height = body
        .pointer("/block/header/height")
        .or_else(|| body.pointer("/sdk_block/header/height"))
        .context("response has no block header height")?;
    match height {
        Value::String(s) => s.parse().with_context(|| format!("invalid height {s}")),
        Value::Number(n) => n.as_u64().context("invalid height"),
        other => anyhow::bail!("invalid height {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_height() {
        assert_eq!(
            parse_height(&json!({ "block": { "header": { "height": "1234" } } })).unwrap(),
            1234
        );
        assert_eq!(
            parse_height(&json!({ "sdk_block": { "header": { "height": 9 } } })).unwrap(),
            9
        );
        assert!(parse_height(&json!({ "block": {} })).is_err());
    }
}
