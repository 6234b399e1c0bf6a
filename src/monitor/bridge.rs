//! Runtime bridge - connects sync TUI thread with async Tokio runtime
//!
//! The TUI (ratatui) loop is synchronous; pollers and the block follower run
//! on a Tokio runtime owned by a dedicated thread. The two sides talk over
//! `std::sync::mpsc` channels.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::runtime::Runtime;

use crate::chain::wasm::PrimitiveInfo;
use crate::config::Config;
use crate::monitor::panel::{PanelKind, TabId};
use crate::monitor::worker::run_async_worker;

/// Commands sent from the TUI to the async worker
#[derive(Debug, Clone)]
pub enum RuntimeCommand {
    /// Stop the open tab's pollers and start the given tab's
    OpenTab(TabId),
    /// Restart the open tab's pollers; retries vault discovery if it failed
    Refresh,
    /// Shutdown the worker
    Shutdown,
}

/// Events sent from the async worker to the TUI
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// Vault investment info loaded
    Discovered { primitives: Vec<PrimitiveInfo> },
    /// One panel fetch finished
    Panel {
        tab: TabId,
        panel: PanelKind,
        result: Result<String, String>,
        at: DateTime<Local>,
    },
    /// Subscriptions of the qbank store were replayed for a block
    StoreTick(StoreSnapshot),
    /// Error occurred
    Error { message: String },
}

/// Rendered qbank store contents after a replay
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreSnapshot {
    pub height: u64,
    pub skipped: usize,
    pub params: Option<String>,
    pub deposits: Vec<String>,
    pub subscriptions: usize,
    pub failures: Vec<String>,
}

/// Endpoints and timings the worker runs with
#[derive(Debug, Clone)]
pub struct WorkerSettings {
    pub quasar_rest: String,
    pub osmosis_rest: String,
    pub request_timeout: Duration,
    pub poll_interval: Duration,
    pub block_poll: Duration,
    pub vault: Option<String>,
    pub gas: String,
}

impl WorkerSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            quasar_rest: config.chain.quasar_rest.clone(),
            osmosis_rest: config.chain.osmosis_rest.clone(),
            request_timeout: config.chain.request_timeout(),
            poll_interval: config.monitor.poll_interval(),
            block_poll: config.chain.block_poll(),
            vault: config.monitor.vault_address().map(str::to_string),
            gas: config.tx.gas.clone(),
        }
    }
}

/// Bridge between sync TUI thread and async Tokio runtime
pub struct RuntimeBridge {
    cmd_tx: Sender<RuntimeCommand>,
    evt_rx: Receiver<RuntimeEvent>,
}

impl RuntimeBridge {
    pub fn new(settings: WorkerSettings) -> anyhow::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<RuntimeCommand>();
        let (evt_tx, evt_rx) = mpsc::channel::<RuntimeEvent>();

        thread::Builder::new()
            .name("qmonitor-runtime".to_string())
            .spawn(move || {
                let rt = match Runtime::new() {
                    Ok(rt) => rt,
                    Err(err) => {
                        let _ = evt_tx.send(RuntimeEvent::Error {
                            message: format!("Failed to create Tokio runtime: {err}"),
                        });
                        return;
                    }
                };
                rt.block_on(async {
                    if let Err(err) = run_async_worker(settings, cmd_rx, evt_tx.clone()).await {
                        let _ = evt_tx.send(RuntimeEvent::Error {
                            message: format!("Worker exited: {:#}", err),
                        });
                    }
                });
            })?;

        Ok(Self { cmd_tx, evt_rx })
    }

    /// Send a command to the async worker
    pub fn send(&self, cmd: RuntimeCommand) -> anyhow::Result<()> {
        self.cmd_tx
            .send(cmd)
            .map_err(|_| anyhow::anyhow!("Worker channel closed"))
    }

    /// Poll for events (non-blocking)
    pub fn poll_events(&self) -> Vec<RuntimeEvent> {
        let mut events = Vec::new();
        while let Ok(evt) = self.evt_rx.try_recv() {
            events.push(evt);
        }
        events
    }
}

impl Drop for RuntimeBridge {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(RuntimeCommand::Shutdown);
    }
}
