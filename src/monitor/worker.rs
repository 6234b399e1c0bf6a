//! Async worker - runs in Tokio runtime and drives pollers and the store

use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use serde_json::{json, Value};
use tokio::sync::OnceCell;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::chain::bank::{self, format_coins};
use crate::chain::wasm::{ContractQuerier, PrimitiveInfo};
use crate::chain::{BlockWatcher, QueryClient, RestClient};
use crate::codec::to_json;
use crate::monitor::bridge::{RuntimeCommand, RuntimeEvent, StoreSnapshot, WorkerSettings};
use crate::monitor::panel::{
    count_entries, format_fields, format_investment, format_lock, PanelKind, TabId,
};
use crate::store::{BlockTick, StoreModule, Subscription, QBANK};

/// REST clients of both chains
#[derive(Clone)]
pub struct Chains {
    pub quasar: Arc<dyn QueryClient>,
    pub osmosis: Arc<dyn QueryClient>,
}

/// Contract a tab's panels query
#[derive(Clone)]
pub enum Target {
    Vault(String),
    Primitive {
        address: String,
        /// Resolved once per tab and shared by the Osmosis panels
        ica: Arc<OnceCell<String>>,
    },
}

impl Target {
    pub fn primitive(address: impl Into<String>) -> Self {
        Target::Primitive {
            address: address.into(),
            ica: Arc::new(OnceCell::new()),
        }
    }

    fn address(&self) -> &str {
        match self {
            Target::Vault(address) | Target::Primitive { address, .. } => address,
        }
    }

    async fn ica(&self, querier: &ContractQuerier<'_>) -> Result<String> {
        match self {
            Target::Primitive { address, ica } => ica
                .get_or_try_init(|| querier.ica_address(address))
                .await
                .cloned(),
            Target::Vault(_) => anyhow::bail!("the vault has no interchain account"),
        }
    }
}

/// Run the async worker loop
pub async fn run_async_worker(
    settings: WorkerSettings,
    cmd_rx: Receiver<RuntimeCommand>,
    evt_tx: Sender<RuntimeEvent>,
) -> Result<()> {
    let quasar = RestClient::new(settings.quasar_rest.clone(), settings.request_timeout)
        .context("quasar REST client")?;
    let osmosis = RestClient::new(settings.osmosis_rest.clone(), settings.request_timeout)
        .context("osmosis REST client")?;
    let chains = Chains {
        quasar: Arc::new(quasar),
        osmosis: Arc::new(osmosis),
    };
    run_worker(chains, settings, cmd_rx, evt_tx).await
}

/// Worker loop over already-built clients
pub async fn run_worker(
    chains: Chains,
    settings: WorkerSettings,
    cmd_rx: Receiver<RuntimeCommand>,
    evt_tx: Sender<RuntimeEvent>,
) -> Result<()> {
    let root = CancellationToken::new();
    spawn_store_follower(
        chains.quasar.clone(),
        &settings,
        evt_tx.clone(),
        root.child_token(),
    );

    let mut primitives = discover(&chains, &settings, &evt_tx).await;
    let mut open_tab = TabId::Vault;
    let mut pollers = start_tab(&chains, &settings, &primitives, open_tab, &evt_tx, &root);

    let mut command_poll = interval(Duration::from_millis(50));
    loop {
        command_poll.tick().await;

        while let Ok(cmd) = cmd_rx.try_recv() {
            match cmd {
                RuntimeCommand::Shutdown => {
                    root.cancel();
                    info!("worker shutting down");
                    return Ok(());
                }
                RuntimeCommand::OpenTab(tab) => {
                    pollers.cancel();
                    open_tab = tab;
                    pollers = start_tab(&chains, &settings, &primitives, open_tab, &evt_tx, &root);
                }
                RuntimeCommand::Refresh => {
                    pollers.cancel();
                    if primitives.is_none() {
                        primitives = discover(&chains, &settings, &evt_tx).await;
                    }
                    pollers = start_tab(&chains, &settings, &primitives, open_tab, &evt_tx, &root);
                }
            }
        }
    }
}

async fn discover(
    chains: &Chains,
    settings: &WorkerSettings,
    evt_tx: &Sender<RuntimeEvent>,
) -> Option<Vec<PrimitiveInfo>> {
    let Some(vault) = settings.vault.as_deref() else {
        let _ = evt_tx.send(RuntimeEvent::Error {
            message: "No vault configured; set [monitor] vault or pass --vault".to_string(),
        });
        return None;
    };
    match ContractQuerier::new(chains.quasar.as_ref()).primitives(vault).await {
        Ok(primitives) => {
            info!(vault, count = primitives.len(), "vault primitives discovered");
            let _ = evt_tx.send(RuntimeEvent::Discovered {
                primitives: primitives.clone(),
            });
            Some(primitives)
        }
        Err(err) => {
            let _ = evt_tx.send(RuntimeEvent::Error {
                message: format!("Investment query failed: {:#}", err),
            });
            None
        }
    }
}

/// Spawn one poller per panel of `tab`; the returned token stops them all
fn start_tab(
    chains: &Chains,
    settings: &WorkerSettings,
    primitives: &Option<Vec<PrimitiveInfo>>,
    tab: TabId,
    evt_tx: &Sender<RuntimeEvent>,
    root: &CancellationToken,
) -> CancellationToken {
    let token = root.child_token();
    let target = match tab {
        TabId::Vault => settings.vault.clone().map(Target::Vault),
        TabId::Primitive(index) => {
            let found = primitives
                .as_ref()
                .and_then(|list| list.get(index))
                .map(|primitive| Target::primitive(primitive.address.clone()));
            if found.is_none() {
                let _ = evt_tx.send(RuntimeEvent::Error {
                    message: format!("Unknown primitive {index}"),
                });
            }
            found
        }
        TabId::Qbank => None,
    };
    let Some(target) = target else {
        return token;
    };

    debug!(tab = %tab.title(), "starting pollers");
    for &panel in tab.panels() {
        spawn_panel(
            chains.clone(),
            target.clone(),
            tab,
            panel,
            settings.poll_interval,
            evt_tx.clone(),
            token.clone(),
        );
    }
    token
}

fn spawn_panel(
    chains: Chains,
    target: Target,
    tab: TabId,
    panel: PanelKind,
    every: Duration,
    evt_tx: Sender<RuntimeEvent>,
    token: CancellationToken,
) {
    tokio::spawn(async move {
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = ticker.tick() => {}
            }
            let result = tokio::select! {
                _ = token.cancelled() => break,
                result = fetch_panel(&chains, &target, panel) => result,
            };
            let result = result.map_err(|err| {
                warn!(tab = %tab.title(), panel = panel.title(), "{:#}", err);
                format!("{:#}", err)
            });
            let event = RuntimeEvent::Panel {
                tab,
                panel,
                result,
                at: Local::now(),
            };
            if evt_tx.send(event).is_err() {
                break;
            }
        }
    });
}

/// Fetch and format one panel's value
pub async fn fetch_panel(chains: &Chains, target: &Target, panel: PanelKind) -> Result<String> {
    let querier = ContractQuerier::new(chains.quasar.as_ref());
    let address = target.address();
    let text = match panel {
        PanelKind::VaultCap => format_fields(&querier.vault_cap(address).await?),
        PanelKind::TokenInfo => format_fields(&querier.token_info(address).await?),
        PanelKind::Investment => format_investment(&querier.investment(address).await?),
        PanelKind::IcaAddress => target.ica(&querier).await?,
        PanelKind::OsmosisBalance => {
            let ica = target.ica(&querier).await?;
            coins_text(&bank::balances(chains.osmosis.as_ref(), &ica).await?)
        }
        PanelKind::OsmosisLocked => {
            let ica = target.ica(&querier).await?;
            coins_text(&bank::locked_coins(chains.osmosis.as_ref(), &ica).await?)
        }
        PanelKind::QuasarBalance => coins_text(&bank::balances(chains.quasar.as_ref(), address).await?),
        PanelKind::Lock => format_lock(&querier.lock(address).await?),
        PanelKind::PendingAcks => count_entries(&querier.pending_acks(address).await?).to_string(),
        PanelKind::TrappedErrors => count_entries(&querier.trapped_errors(address).await?).to_string(),
    };
    Ok(text)
}

fn coins_text(coins: &[crate::chain::Coin]) -> String {
    if coins.is_empty() {
        "none".to_string()
    } else {
        format_coins(coins)
    }
}

/// Keep a qbank store subscribed to params and deposits, replayed per block
fn spawn_store_follower(
    quasar: Arc<dyn QueryClient>,
    settings: &WorkerSettings,
    evt_tx: Sender<RuntimeEvent>,
    token: CancellationToken,
) {
    let block_poll = settings.block_poll;
    let gas = settings.gas.clone();
    tokio::spawn(async move {
        let store = StoreModule::new(&QBANK, quasar.clone()).with_gas(gas);
        store.subscribe(Subscription::new("QueryParams", json!({}), Value::Null, false));
        store.subscribe(Subscription::new("QueryDepositAll", json!({}), Value::Null, true));

        let heights = BlockWatcher::new(quasar, block_poll).spawn(token);
        store
            .follow_blocks(heights, |tick| {
                let _ = evt_tx.send(RuntimeEvent::StoreTick(snapshot(&store, tick)));
            })
            .await;
    });
}

/// Render the cached qbank state after a replay
pub fn snapshot(store: &StoreModule, tick: BlockTick) -> StoreSnapshot {
    let empty = json!({});
    let params = match store.get_message("Params", &empty, &Value::Null) {
        Ok(Some(response)) => {
            let json = to_json(&response);
            Some(format_fields(json.get("params").unwrap_or(&json)))
        }
        Ok(None) => None,
        Err(err) => Some(format!("unreadable: {err}")),
    };
    let deposits = store
        .get("DepositAll", &empty, &Value::Null)
        .and_then(|value| value.get("Deposit").and_then(Value::as_array).cloned())
        .unwrap_or_default()
        .iter()
        .map(deposit_line)
        .collect();
    StoreSnapshot {
        height: tick.height,
        skipped: tick.skipped,
        params,
        deposits,
        subscriptions: store.subscriptions().len(),
        failures: tick.failures.iter().map(ToString::to_string).collect(),
    }
}

fn deposit_line(deposit: &Value) -> String {
    let field = |name: &str| {
        deposit
            .get(name)
            .map(|value| match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .unwrap_or_default()
    };
    format!(
        "#{} {}{} from {} ({})",
        field("id"),
        field("amount"),
        field("denom"),
        field("depositorAccAddress"),
        field("riskProfile")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use crate::chain::wasm::smart_query_path;

    /// Answers fixed paths, fails everything else
    struct FixedClient {
        name: &'static str,
        routes: HashMap<String, Value>,
    }

    #[async_trait::async_trait]
    impl QueryClient for FixedClient {
        async fn get(&self, path: &str, _query: &[(String, String)]) -> Result<Value> {
            self.routes
                .get(path)
                .cloned()
                .with_context(|| format!("HTTP 404: {path}"))
        }

        async fn post(&self, _path: &str, _body: &Value) -> Result<Value> {
            anyhow::bail!("read only")
        }

        fn endpoint(&self) -> &str {
            self.name
        }
    }

    fn chains() -> Chains {
        let smart = |contract: &str, msg: Value, data: Value| {
            (smart_query_path(contract, &msg).unwrap(), json!({ "data": data }))
        };
        let quasar: HashMap<String, Value> = [
            smart("quasar1prim", json!({ "ica_address": {} }), json!({ "address": "osmo1ica" })),
            smart(
                "quasar1prim",
                json!({ "lock": {} }),
                json!({ "lock": { "bond": false, "migration": true } }),
            ),
            smart("quasar1prim", json!({ "list_pending_acks": {} }), json!({ "pending": { "3": {}, "4": {} } })),
            (
                "/cosmos/bank/v1beta1/balances/quasar1prim".to_string(),
                json!({ "balances": [] }),
            ),
        ]
        .into_iter()
        .collect();
        let osmosis: HashMap<String, Value> = [
            (
                "/cosmos/bank/v1beta1/balances/osmo1ica".to_string(),
                json!({ "balances": [{ "denom": "uosmo", "amount": "12" }, { "denom": "gamm/pool/1", "amount": "5" }] }),
            ),
            (
                "/osmosis/lockup/v1beta1/account_locked_coins/osmo1ica".to_string(),
                json!({ "coins": [{ "denom": "gamm/pool/1", "amount": "900" }] }),
            ),
        ]
        .into_iter()
        .collect();
        Chains {
            quasar: Arc::new(FixedClient { name: "quasar", routes: quasar }),
            osmosis: Arc::new(FixedClient { name: "osmosis", routes: osmosis }),
        }
    }

    #[tokio::test]
    async fn test_primitive_panels() {
        let chains = chains();
        let target = Target::primitive("quasar1prim");

        let fetch = |panel| fetch_panel(&chains, &target, panel);
        assert_eq!(fetch(PanelKind::IcaAddress).await.unwrap(), "osmo1ica");
        assert_eq!(fetch(PanelKind::Lock).await.unwrap(), "locked (migration)");
        assert_eq!(fetch(PanelKind::PendingAcks).await.unwrap(), "2");
        assert_eq!(fetch(PanelKind::QuasarBalance).await.unwrap(), "none");
        assert_eq!(
            fetch(PanelKind::OsmosisBalance).await.unwrap(),
            "12uosmo, 5gamm/pool/1"
        );
        assert_eq!(fetch(PanelKind::OsmosisLocked).await.unwrap(), "900gamm/pool/1");

        let err = fetch(PanelKind::TrappedErrors).await.unwrap_err();
        assert!(format!("{:#}", err).contains("HTTP 404"));
    }

    #[tokio::test]
    async fn test_vault_target_has_no_ica() {
        let chains = chains();
        let target = Target::Vault("quasar1vault".to_string());
        assert!(fetch_panel(&chains, &target, PanelKind::OsmosisBalance).await.is_err());
    }

    #[test]
    fn test_deposit_line() {
        let line = deposit_line(&json!({
            "id": "7",
            "riskProfile": "LOW",
            "depositorAccAddress": "quasar1me",
            "amount": "100",
            "denom": "uqsr"
        }));
        assert_eq!(line, "#7 100uqsr from quasar1me (LOW)");
    }
}
