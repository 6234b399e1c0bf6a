//! Panel identities, per-panel state and value formatting

use chrono::{DateTime, Local};
use serde_json::Value;

pub const LOADING: &str = "loading...";

/// A tab of the monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TabId {
    Vault,
    Primitive(usize),
    /// Block-driven qbank store view
    Qbank,
}

impl TabId {
    pub fn title(&self) -> String {
        match self {
            TabId::Vault => "vault".to_string(),
            TabId::Primitive(index) => format!("primitive_{index}"),
            TabId::Qbank => "qbank".to_string(),
        }
    }

    /// Panels polled while the tab is open
    pub fn panels(&self) -> &'static [PanelKind] {
        match self {
            TabId::Vault => &PanelKind::VAULT,
            TabId::Primitive(_) => &PanelKind::PRIMITIVE,
            TabId::Qbank => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelKind {
    VaultCap,
    TokenInfo,
    Investment,
    IcaAddress,
    OsmosisBalance,
    OsmosisLocked,
    QuasarBalance,
    Lock,
    PendingAcks,
    TrappedErrors,
}

impl PanelKind {
    pub const VAULT: [PanelKind; 3] = [PanelKind::VaultCap, PanelKind::TokenInfo, PanelKind::Investment];

    pub const PRIMITIVE: [PanelKind; 7] = [
        PanelKind::IcaAddress,
        PanelKind::OsmosisBalance,
        PanelKind::OsmosisLocked,
        PanelKind::QuasarBalance,
        PanelKind::Lock,
        PanelKind::PendingAcks,
        PanelKind::TrappedErrors,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            PanelKind::VaultCap => "vault cap",
            PanelKind::TokenInfo => "token info",
            PanelKind::Investment => "investment",
            PanelKind::IcaAddress => "osmo address",
            PanelKind::OsmosisBalance => "osmo balance",
            PanelKind::OsmosisLocked => "osmo locked shares",
            PanelKind::QuasarBalance => "quasar balance",
            PanelKind::Lock => "lock status",
            PanelKind::PendingAcks => "pending acks",
            PanelKind::TrappedErrors => "trapped errors",
        }
    }
}

/// Last known result of one panel
#[derive(Debug, Clone, PartialEq)]
pub struct PanelState {
    pub kind: PanelKind,
    pub value: Option<String>,
    pub error: Option<String>,
    pub updated_at: Option<DateTime<Local>>,
}

impl PanelState {
    pub fn new(kind: PanelKind) -> Self {
        Self {
            kind,
            value: None,
            error: None,
            updated_at: None,
        }
    }

    pub fn apply(&mut self, result: Result<String, String>, at: DateTime<Local>) {
        match result {
            Ok(value) => {
                self.value = Some(value);
                self.error = None;
                self.updated_at = Some(at);
            }
            Err(error) => self.error = Some(error),
        }
    }

    /// A previous value is shown but the latest fetch failed
    pub fn is_stale(&self) -> bool {
        self.value.is_some() && self.error.is_some()
    }

    /// Text shown in the panel body
    pub fn display(&self) -> String {
        match (&self.value, &self.error) {
            (Some(value), None) => value.clone(),
            (Some(value), Some(error)) => format!("{value}\n(stale: {error})"),
            (None, Some(error)) => format!("error: {error}"),
            (None, None) => LOADING.to_string(),
        }
    }
}

/// `locked (<kind>)` for the first set lock, otherwise `unlocked`
pub fn format_lock(lock: &Value) -> String {
    let locked = lock
        .as_object()
        .and_then(|map| map.iter().find(|(_, state)| is_truthy(state)).map(|(kind, _)| kind));
    match locked {
        Some(kind) => format!("locked ({kind})"),
        None => "unlocked".to_string(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Number of entries in a keyed collection
pub fn count_entries(value: &Value) -> usize {
    match value {
        Value::Object(map) => map.len(),
        Value::Array(items) => items.len(),
        _ => 0,
    }
}

/// One `key: value` line per top-level field
pub fn format_fields(value: &Value) -> String {
    match value {
        Value::Object(map) if !map.is_empty() => map
            .iter()
            .map(|(key, inner)| format!("{key}: {}", scalar_text(inner)))
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Object(_) => "(empty)".to_string(),
        other => scalar_text(other),
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}

/// Summary of the vault's investment info
pub fn format_investment(investment: &Value) -> String {
    let info = investment.get("info").unwrap_or(investment);
    let mut lines = Vec::new();
    if let Some(owner) = info.get("owner").and_then(Value::as_str) {
        lines.push(format!("owner: {owner}"));
    }
    if let Some(min) = info.get("min_withdrawal") {
        lines.push(format!("min withdrawal: {}", scalar_text(min)));
    }
    let primitives = info.get("primitives").and_then(Value::as_array);
    lines.push(format!("primitives: {}", primitives.map_or(0, Vec::len)));
    for (index, primitive) in primitives.into_iter().flatten().enumerate() {
        let address = primitive.get("address").and_then(Value::as_str).unwrap_or("?");
        let weight = primitive.get("weight").map(scalar_text).unwrap_or_default();
        lines.push(format!("  [{index}] {address} (weight {weight})"));
    }
    lines.join("\n")
}
