//! Store module - query cache, subscriptions and transaction actions for one
//! chain module
//!
//! A `StoreModule` is created once per chain module at startup and shared by
//! reference (`Arc`) with everything that reads or queries the chain.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::{json, Value};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::chain::client::QueryClient;
use crate::chain::tx::{BroadcastResult, Coin, StdFee, TxClient, DEFAULT_GAS};
use crate::codec::{from_json, DynamicMessage, EncodeObject, FieldInfo, MessageDescriptor, TypeRegistry};
use crate::store::cache::{cache_key, QueryCache};
use crate::store::error::{StoreError, StoreResult};
use crate::store::merge::{merge_results, next_key};
use crate::store::routes::{query_pairs, ModuleSpec, QueryRoute};
use crate::store::subscription::{Subscription, SubscriptionSet};

/// Per-call options of a query action
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Record the query for replay on every new block
    pub subscribe: bool,
    /// Follow `pagination.next_key` and merge every page
    pub all: bool,
}

impl QueryOptions {
    pub fn subscribed() -> Self {
        Self {
            subscribe: true,
            all: false,
        }
    }

    pub fn all_pages(self) -> Self {
        Self { all: true, ..self }
    }
}

/// Outcome of one block-driven replay
#[derive(Debug)]
pub struct BlockTick {
    pub height: u64,
    /// Heights that arrived during the previous replay and were folded into this one
    pub skipped: usize,
    pub failures: Vec<StoreError>,
}

pub struct StoreModule {
    spec: &'static ModuleSpec,
    client: Arc<dyn QueryClient>,
    tx_client: Option<Arc<dyn TxClient>>,
    registry: TypeRegistry,
    cache: QueryCache,
    subscriptions: SubscriptionSet,
    gas: String,
}

impl StoreModule {
    pub fn new(spec: &'static ModuleSpec, client: Arc<dyn QueryClient>) -> Self {
        let mut registry = TypeRegistry::new();
        for desc in spec.msgs {
            registry.register(desc);
        }
        info!(module = spec.name, endpoint = client.endpoint(), "store module initialized");
        Self {
            spec,
            client,
            tx_client: None,
            registry,
            cache: QueryCache::new(),
            subscriptions: SubscriptionSet::new(),
            gas: DEFAULT_GAS.to_string(),
        }
    }

    /// Attach a signing client; without one every transaction action fails
    /// with [`StoreError::WalletMissing`]
    pub fn with_tx_client(mut self, tx_client: Arc<dyn TxClient>) -> Self {
        self.tx_client = Some(tx_client);
        self
    }

    pub fn with_gas(mut self, gas: impl Into<String>) -> Self {
        self.gas = gas.into();
        self
    }

    pub fn spec(&self) -> &'static ModuleSpec {
        self.spec
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Field listing of a state type, e.g. `Deposit`
    pub fn type_structure(&self, type_name: &str) -> Option<Vec<FieldInfo>> {
        self.spec
            .types
            .iter()
            .find(|desc| desc.name() == type_name)
            .map(|desc| desc.structure())
    }

    /// Run a query route, cache the result and optionally subscribe to it
    ///
    /// The cache entry for these parameters is always replaced by the new
    /// result unless a request started later has already committed.
    pub async fn query(
        &self,
        route: &str,
        params: Value,
        query: Value,
        options: QueryOptions,
    ) -> StoreResult<Value> {
        let route = self.route(route)?;
        let params = if params.is_null() { json!({}) } else { params };
        let key = cache_key(&params, &query);
        let ticket = self.cache.ticket();

        let value = self
            .fetch(route, &params, &query, options.all)
            .await
            .map_err(|err| StoreError::Query {
                operation: format!("QueryClient:{}", route.action()),
                message: format!("{:#}", err),
            })?;

        if !self.cache.commit(route.name, &key, ticket, value) {
            debug!(module = self.spec.name, route = route.name, ticket, "dropped stale response");
        }
        if options.subscribe {
            self.subscriptions
                .add(Subscription::new(route.action(), params, query, options.all));
        }
        Ok(self.cache.get(route.name, &key).unwrap_or_else(|| json!({})))
    }

    async fn fetch(
        &self,
        route: &QueryRoute,
        params: &Value,
        query: &Value,
        all: bool,
    ) -> anyhow::Result<Value> {
        let path = route.render_path(params).map_err(anyhow::Error::msg)?;
        let pairs = query_pairs(query);
        debug!(module = self.spec.name, %path, "query");
        let mut value = self.client.get(&path, &pairs).await?;

        if all && route.paginated {
            let mut seen = HashSet::new();
            while let Some(cursor) = next_key(&value) {
                if !seen.insert(cursor.clone()) {
                    anyhow::bail!("pagination returned key {cursor} twice");
                }
                let mut page_pairs: Vec<_> = pairs
                    .iter()
                    .filter(|(k, _)| k != "pagination.key")
                    .cloned()
                    .collect();
                page_pairs.push(("pagination.key".to_string(), cursor.clone()));
                let page = self.client.get(&path, &page_pairs).await?;
                merge_results(&mut value, page);
            }
        }
        Ok(value)
    }

    /// Cached result for a request, if any
    pub fn get(&self, route: &str, params: &Value, query: &Value) -> Option<Value> {
        let params = if params.is_null() { json!({}) } else { params.clone() };
        self.cache.get(route, &cache_key(&params, query))
    }

    /// Cached result decoded through the route's response schema
    pub fn get_message(
        &self,
        route: &str,
        params: &Value,
        query: &Value,
    ) -> StoreResult<Option<DynamicMessage>> {
        let desc = self
            .route(route)?
            .response
            .ok_or_else(|| StoreError::UnknownRoute(format!("{route} has no response schema")))?;
        match self.get(route, params, query) {
            Some(value) => Ok(Some(from_json(desc, &value)?)),
            None => Ok(None),
        }
    }

    pub fn subscribe(&self, subscription: Subscription) -> bool {
        self.subscriptions.add(subscription)
    }

    pub fn unsubscribe(&self, subscription: &Subscription) -> bool {
        self.subscriptions.remove(subscription)
    }

    pub fn subscriptions(&self) -> Vec<Subscription> {
        self.subscriptions.snapshot()
    }

    /// Re-run a recorded action
    pub async fn dispatch(&self, subscription: &Subscription) -> StoreResult<Value> {
        let route = self
            .spec
            .route_for_action(&subscription.action)
            .ok_or_else(|| StoreError::UnknownRoute(subscription.action.clone()))?;
        let payload = &subscription.payload;
        let options = QueryOptions {
            subscribe: false,
            all: payload.options.all,
        };
        self.query(route.name, payload.params.clone(), payload.query.clone(), options)
            .await
    }

    /// Replay every subscription, one after another
    ///
    /// A failing replay is reported and skipped; the subscription stays and
    /// later replays still run.
    pub async fn store_update(&self) -> Vec<StoreError> {
        let mut failures = Vec::new();
        for subscription in self.subscriptions.snapshot() {
            if let Err(err) = self.dispatch(&subscription).await {
                let err = StoreError::Subscription {
                    message: err.to_string(),
                };
                warn!(module = self.spec.name, action = %subscription.action, "{}", err);
                failures.push(err);
            }
        }
        failures
    }

    /// Replay subscriptions for each new block until the height stream ends
    ///
    /// Heights that queue up while a replay runs are coalesced into a single
    /// replay at the latest height.
    pub async fn follow_blocks<F>(&self, mut heights: mpsc::Receiver<u64>, mut on_tick: F)
    where
        F: FnMut(BlockTick) + Send,
    {
        while let Some(mut height) = heights.recv().await {
            let mut skipped = 0;
            while let Ok(newer) = heights.try_recv() {
                height = newer;
                skipped += 1;
            }
            debug!(module = self.spec.name, height, skipped, "new block");
            let failures = self.store_update().await;
            on_tick(BlockTick {
                height,
                skipped,
                failures,
            });
        }
    }

    /// Drop every cached result and subscription
    pub fn reset_state(&self) {
        self.cache.clear();
        self.subscriptions.clear();
    }

    /// Build a transaction message without sending it
    ///
    /// `msg` is a message name such as `MsgRequestDeposit` or its type URL.
    pub fn create_msg(&self, msg: &str, value: &Value) -> StoreResult<EncodeObject> {
        let desc = self.msg_descriptor(msg)?;
        let name = desc.name();
        if self.tx_client.is_none() {
            return Err(StoreError::WalletMissing {
                operation: format!("TxClient:{name}:Init"),
            });
        }
        self.registry
            .encode_object(&desc.type_url(), value)
            .map_err(|err| StoreError::Broadcast {
                operation: format!("TxClient:{name}:Create"),
                message: format!("Could not create message: {err}"),
            })
    }

    /// Build, sign and broadcast one message
    ///
    /// `fee` is the fee amount; the gas limit comes from the module's
    /// configuration.
    pub async fn send_msg(
        &self,
        msg: &str,
        value: &Value,
        fee: Vec<Coin>,
        memo: &str,
    ) -> StoreResult<BroadcastResult> {
        let desc = self.msg_descriptor(msg)?;
        let name = desc.name();
        let tx_client = self
            .tx_client
            .as_ref()
            .ok_or_else(|| StoreError::WalletMissing {
                operation: format!("TxClient:{name}:Init"),
            })?;
        let send_error = |message: String| StoreError::Broadcast {
            operation: format!("TxClient:{name}:Send"),
            message: format!("Could not broadcast Tx: {message}"),
        };

        let encoded = self
            .registry
            .encode_object(&desc.type_url(), value)
            .map_err(|err| send_error(err.to_string()))?;
        let fee = StdFee {
            amount: fee,
            gas: self.gas.clone(),
        };
        let result = tx_client
            .sign_and_broadcast(std::slice::from_ref(&encoded), &fee, memo)
            .await
            .map_err(|err| send_error(format!("{:#}", err)))?;
        info!(
            module = self.spec.name,
            msg = name,
            txhash = %result.txhash,
            code = result.code,
            "broadcast complete"
        );
        Ok(result)
    }

    fn route(&self, name: &str) -> StoreResult<&'static QueryRoute> {
        self.spec
            .route(name)
            .ok_or_else(|| StoreError::UnknownRoute(name.to_string()))
    }

    fn msg_descriptor(&self, name: &str) -> StoreResult<&'static MessageDescriptor> {
        self.spec
            .msgs
            .iter()
            .copied()
            .find(|desc| desc.name() == name || desc.type_url() == name)
            .ok_or_else(|| StoreError::UnknownMessage(name.to_string()))
    }
}
