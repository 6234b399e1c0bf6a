//! Store module behavior against fake chain clients

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use tokio::sync::{mpsc, oneshot};

use qmonitor::chain::client::QueryClient;
use qmonitor::chain::tx::{BroadcastResult, Coin, StdFee, TxClient};
use qmonitor::codec::{EncodeObject, Value as Field};
use qmonitor::store::{QueryOptions, StoreError, StoreModule, Subscription, QBANK};

/// One canned response, optionally held back until the gate opens
struct Reply {
    gate: Option<oneshot::Receiver<()>>,
    result: anyhow::Result<Value>,
}

impl Reply {
    fn ok(value: Value) -> Self {
        Self {
            gate: None,
            result: Ok(value),
        }
    }

    fn err(message: &str) -> Self {
        Self {
            gate: None,
            result: Err(anyhow::anyhow!(message.to_string())),
        }
    }

    fn gated(value: Value, gate: oneshot::Receiver<()>) -> Self {
        Self {
            gate: Some(gate),
            result: Ok(value),
        }
    }
}

#[derive(Default)]
struct FakeNode {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<(String, Vec<(String, String)>)>>,
}

impl FakeNode {
    fn new(replies: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<(String, Vec<(String, String)>)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl QueryClient for FakeNode {
    async fn get(&self, path: &str, query: &[(String, String)]) -> anyhow::Result<Value> {
        self.requests
            .lock()
            .unwrap()
            .push((path.to_string(), query.to_vec()));
        let reply = self.replies.lock().unwrap().pop_front();
        let Some(reply) = reply else {
            return Ok(json!({}));
        };
        if let Some(gate) = reply.gate {
            let _ = gate.await;
        }
        reply.result
    }

    async fn post(&self, _path: &str, _body: &Value) -> anyhow::Result<Value> {
        anyhow::bail!("not supported")
    }

    fn endpoint(&self) -> &str {
        "fake"
    }
}

/// Records what would have been broadcast
#[derive(Default)]
struct RecordingTx {
    fail: bool,
    sent: Mutex<Vec<(Vec<EncodeObject>, StdFee, String)>>,
}

#[async_trait::async_trait]
impl TxClient for RecordingTx {
    fn address(&self) -> &str {
        "quasar1me"
    }

    async fn sign_and_broadcast(
        &self,
        msgs: &[EncodeObject],
        fee: &StdFee,
        memo: &str,
    ) -> anyhow::Result<BroadcastResult> {
        if self.fail {
            anyhow::bail!("account sequence mismatch");
        }
        self.sent
            .lock()
            .unwrap()
            .push((msgs.to_vec(), fee.clone(), memo.to_string()));
        Ok(BroadcastResult {
            height: 42,
            txhash: "ABCD".to_string(),
            code: 0,
            raw_log: String::new(),
        })
    }
}

fn deposit_request() -> Value {
    json!({
        "creator": "quasar1me",
        "riskProfile": "LOW",
        "vaultID": "orion",
        "coin": { "denom": "uqsr", "amount": "100" },
        "lockupPeriod": "Days_7"
    })
}

#[tokio::test]
async fn test_second_query_overwrites_cache() {
    let node = FakeNode::new(vec![
        Reply::ok(json!({ "params": { "enabled": false } })),
        Reply::ok(json!({ "params": { "enabled": true } })),
    ]);
    let store = StoreModule::new(&QBANK, node);

    for _ in 0..2 {
        store
            .query("Params", Value::Null, Value::Null, QueryOptions::default())
            .await
            .unwrap();
    }
    assert_eq!(
        store.get("Params", &Value::Null, &Value::Null),
        Some(json!({ "params": { "enabled": true } }))
    );
    // Null and empty params share one cache entry.
    assert_eq!(
        store.get("Params", &json!({}), &Value::Null),
        store.get("Params", &Value::Null, &Value::Null)
    );
}

#[tokio::test]
async fn test_all_pages_are_merged() {
    let node = FakeNode::new(vec![
        Reply::ok(json!({ "Deposit": [{ "id": "1" }], "pagination": { "next_key": "AQ==", "total": "3" } })),
        Reply::ok(json!({ "Deposit": [{ "id": "2" }], "pagination": { "next_key": "Ag==" } })),
        Reply::ok(json!({ "Deposit": [{ "id": "3" }], "pagination": { "next_key": "" } })),
    ]);
    let store = StoreModule::new(&QBANK, node.clone());

    let value = store
        .query(
            "DepositAll",
            Value::Null,
            Value::Null,
            QueryOptions::default().all_pages(),
        )
        .await
        .unwrap();

    let ids: Vec<_> = value["Deposit"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["id"].clone())
        .collect();
    assert_eq!(ids, vec![json!("1"), json!("2"), json!("3")]);
    assert_eq!(value["pagination"]["next_key"], json!(""));

    let keys: Vec<_> = node
        .requests()
        .iter()
        .map(|(_, pairs)| {
            pairs
                .iter()
                .find(|(k, _)| k == "pagination.key")
                .map(|(_, v)| v.clone())
        })
        .collect();
    assert_eq!(keys, vec![None, Some("AQ==".to_string()), Some("Ag==".to_string())]);
}

#[tokio::test]
async fn test_single_page_without_all() {
    let node = FakeNode::new(vec![Reply::ok(
        json!({ "Deposit": [{ "id": "1" }], "pagination": { "next_key": "AQ==" } }),
    )]);
    let store = StoreModule::new(&QBANK, node.clone());
    store
        .query("DepositAll", Value::Null, Value::Null, QueryOptions::default())
        .await
        .unwrap();
    assert_eq!(node.requests().len(), 1);
}

#[tokio::test]
async fn test_pagination_that_does_not_advance_fails() {
    let stuck = json!({ "Deposit": [], "pagination": { "next_key": "AQ==" } });
    let node = FakeNode::new(vec![
        Reply::ok(stuck.clone()),
        Reply::ok(stuck.clone()),
        Reply::ok(stuck),
    ]);
    let store = StoreModule::new(&QBANK, node);
    let err = store
        .query(
            "DepositAll",
            Value::Null,
            Value::Null,
            QueryOptions::default().all_pages(),
        )
        .await
        .unwrap_err();
    assert_eq!(err.operation(), Some("QueryClient:QueryDepositAll"));
}

#[tokio::test]
async fn test_pagination_cycle_fails() {
    let page = |id: &str, next: &str| {
        Reply::ok(json!({ "Deposit": [{ "id": id }], "pagination": { "next_key": next } }))
    };
    let node = FakeNode::new(vec![
        page("1", "AQ=="),
        page("2", "Ag=="),
        page("3", "AQ=="),
        page("4", "Ag=="),
        page("5", ""),
    ]);
    let store = StoreModule::new(&QBANK, node.clone());
    let err = store
        .query(
            "DepositAll",
            Value::Null,
            Value::Null,
            QueryOptions::default().all_pages(),
        )
        .await
        .unwrap_err();
    assert_eq!(err.operation(), Some("QueryClient:QueryDepositAll"));
    assert!(err.to_string().contains("AQ=="));
    // Stops as soon as the first key comes back.
    assert_eq!(node.requests().len(), 3);
    assert_eq!(store.get("DepositAll", &Value::Null, &Value::Null), None);
}

#[tokio::test]
async fn test_slow_response_does_not_replace_newer_one() {
    let (release, gate) = oneshot::channel();
    let node = FakeNode::new(vec![
        Reply::gated(json!({ "params": { "enabled": false } }), gate),
        Reply::ok(json!({ "params": { "enabled": true } })),
    ]);
    let store = StoreModule::new(&QBANK, node);

    let (older, newer, _) = tokio::join!(
        store.query("Params", Value::Null, Value::Null, QueryOptions::default()),
        store.query("Params", Value::Null, Value::Null, QueryOptions::default()),
        async move {
            tokio::task::yield_now().await;
            let _ = release.send(());
        }
    );

    let expected = json!({ "params": { "enabled": true } });
    assert_eq!(newer.unwrap(), expected);
    // The older request finished last but reads back the newer result.
    assert_eq!(older.unwrap(), expected);
    assert_eq!(store.get("Params", &Value::Null, &Value::Null), Some(expected));
}

#[tokio::test]
async fn test_subscriptions_are_deduplicated() {
    let node = FakeNode::new(vec![]);
    let store = StoreModule::new(&QBANK, node);
    for _ in 0..3 {
        store
            .query("Params", Value::Null, Value::Null, QueryOptions::subscribed())
            .await
            .unwrap();
    }
    store
        .query("Deposit", json!({ "id": "4" }), Value::Null, QueryOptions::subscribed())
        .await
        .unwrap();

    let subscriptions = store.subscriptions();
    assert_eq!(subscriptions.len(), 2);
    assert_eq!(subscriptions[0].action, "QueryParams");
    assert_eq!(subscriptions[0].payload.params, json!({}));
    assert_eq!(subscriptions[1].action, "QueryDeposit");

    assert!(store.unsubscribe(&subscriptions[0]));
    assert_eq!(store.subscriptions().len(), 1);

    store.reset_state();
    assert!(store.subscriptions().is_empty());
    assert_eq!(store.get("Deposit", &json!({ "id": "4" }), &Value::Null), None);
}

#[tokio::test]
async fn test_replay_continues_past_failure() {
    let node = FakeNode::new(vec![
        Reply::err("node down"),
        Reply::ok(json!({ "params": { "enabled": true } })),
    ]);
    let store = StoreModule::new(&QBANK, node);
    store.subscribe(Subscription::new("QueryDeposit", json!({ "id": "1" }), Value::Null, false));
    store.subscribe(Subscription::new("QueryParams", json!({}), Value::Null, false));

    let failures = store.store_update().await;
    assert_eq!(failures.len(), 1);
    assert!(matches!(failures[0], StoreError::Subscription { .. }));
    assert!(failures[0].to_string().starts_with("Subscriptions: "));
    assert!(failures[0].to_string().contains("node down"));

    assert!(store.get("Params", &Value::Null, &Value::Null).is_some());
    assert_eq!(store.subscriptions().len(), 2);
}

#[tokio::test]
async fn test_queued_blocks_are_coalesced() {
    let node = FakeNode::new(vec![]);
    let store = StoreModule::new(&QBANK, node.clone());
    store.subscribe(Subscription::new("QueryParams", json!({}), Value::Null, false));

    let (tx, rx) = mpsc::channel(8);
    for height in [10, 11, 12] {
        tx.send(height).await.unwrap();
    }
    drop(tx);

    let mut ticks = Vec::new();
    store
        .follow_blocks(rx, |tick| ticks.push((tick.height, tick.skipped, tick.failures.len())))
        .await;

    assert_eq!(ticks, vec![(12, 2, 0)]);
    assert_eq!(node.requests().len(), 1);
}

#[tokio::test]
async fn test_transactions_need_a_wallet() {
    let store = StoreModule::new(&QBANK, FakeNode::new(vec![]));

    let err = store.create_msg("MsgRequestDeposit", &deposit_request()).unwrap_err();
    assert!(matches!(err, StoreError::WalletMissing { .. }));
    assert_eq!(err.operation(), Some("TxClient:MsgRequestDeposit:Init"));

    let err = store
        .send_msg("MsgRequestDeposit", &deposit_request(), Vec::new(), "")
        .await
        .unwrap_err();
    assert_eq!(err.operation(), Some("TxClient:MsgRequestDeposit:Init"));
    assert!(err.to_string().contains("Wallet is required"));
}

#[tokio::test]
async fn test_create_msg_labels_bad_input() {
    let store = StoreModule::new(&QBANK, FakeNode::new(vec![]))
        .with_tx_client(Arc::new(RecordingTx::default()));

    let object = store
        .create_msg("/abag.quasarnode.qbank.MsgRequestDeposit", &deposit_request())
        .unwrap();
    assert_eq!(object.type_url, "/abag.quasarnode.qbank.MsgRequestDeposit");
    assert_eq!(
        object.value.get("vaultID").and_then(Field::as_str),
        Some("orion")
    );

    let err = store
        .create_msg("MsgRequestDeposit", &json!({ "creator": 7 }))
        .unwrap_err();
    assert_eq!(err.operation(), Some("TxClient:MsgRequestDeposit:Create"));
    assert!(err.to_string().contains("Could not create message: "));

    let err = store.create_msg("MsgNope", &json!({})).unwrap_err();
    assert!(matches!(err, StoreError::UnknownMessage(_)));
}

#[tokio::test]
async fn test_send_msg_passes_fee_and_memo() {
    let tx = Arc::new(RecordingTx::default());
    let store = StoreModule::new(&QBANK, FakeNode::new(vec![]))
        .with_tx_client(tx.clone())
        .with_gas("300000");

    let result = store
        .send_msg(
            "MsgRequestDeposit",
            &deposit_request(),
            vec![Coin::new("uqsr", "500")],
            "monthly deposit",
        )
        .await
        .unwrap();
    assert!(result.is_ok());
    assert_eq!(result.txhash, "ABCD");

    let sent = tx.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    let (msgs, fee, memo) = &sent[0];
    assert_eq!(msgs.len(), 1);
    assert_eq!(msgs[0].type_url, "/abag.quasarnode.qbank.MsgRequestDeposit");
    assert_eq!(fee.amount, vec![Coin::new("uqsr", "500")]);
    assert_eq!(fee.gas, "300000");
    assert_eq!(memo, "monthly deposit");
}

#[tokio::test]
async fn test_send_failure_is_labeled() {
    let tx = Arc::new(RecordingTx {
        fail: true,
        ..Default::default()
    });
    let store = StoreModule::new(&QBANK, FakeNode::new(vec![])).with_tx_client(tx);

    let err = store
        .send_msg("MsgRequestWithdrawAll", &json!({ "creator": "quasar1me" }), Vec::new(), "")
        .await
        .unwrap_err();
    assert_eq!(err.operation(), Some("TxClient:MsgRequestWithdrawAll:Send"));
    assert!(err.to_string().contains("Could not broadcast Tx: "));
    assert!(err.to_string().contains("account sequence mismatch"));
}
