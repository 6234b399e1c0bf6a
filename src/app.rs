use std::time::{Duration, Instant};

use crate::chain::wasm::PrimitiveInfo;
use crate::core::{parse_command, Command};
use crate::monitor::{PanelKind, PanelState, RuntimeEvent, StoreSnapshot, TabId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub level: StatusLevel,
    pub since: Instant,
}

#[derive(Debug, Clone, Default)]
pub struct CommandBar {
    pub input: String,
    pub last: Option<String>,
}

pub struct App {
    pub endpoint: String,
    pub vault: Option<String>,
    pub primitives: Vec<PrimitiveInfo>,
    pub current_tab: TabId,
    /// Panels of the current tab, in display order
    pub panels: Vec<PanelState>,
    pub store: Option<StoreSnapshot>,
    pub input_mode: InputMode,
    pub command: CommandBar,
    pub status: Option<StatusMessage>,
    pub last_error: Option<String>,
    pub help_open: bool,
    pub should_quit: bool,
    pending_tab: Option<TabId>,
    pending_refresh: bool,
}

impl App {
    pub fn new(endpoint: impl Into<String>, vault: Option<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            vault,
            primitives: Vec::new(),
            current_tab: TabId::Vault,
            panels: panels_for(TabId::Vault),
            store: None,
            input_mode: InputMode::Normal,
            command: CommandBar::default(),
            status: None,
            last_error: None,
            help_open: false,
            should_quit: false,
            pending_tab: None,
            pending_refresh: false,
        }
    }

    /// `vault`, one tab per discovered primitive, then `qbank`
    pub fn tabs(&self) -> Vec<TabId> {
        let mut tabs = vec![TabId::Vault];
        tabs.extend((0..self.primitives.len()).map(TabId::Primitive));
        tabs.push(TabId::Qbank);
        tabs
    }

    pub fn current_tab_index(&self) -> usize {
        self.tabs()
            .iter()
            .position(|tab| *tab == self.current_tab)
            .unwrap_or(0)
    }

    pub fn current_primitive(&self) -> Option<&PrimitiveInfo> {
        match self.current_tab {
            TabId::Primitive(index) => self.primitives.get(index),
            _ => None,
        }
    }

    /// Switch tabs; panels restart at `loading...`
    pub fn select_tab(&mut self, tab: TabId) {
        if let TabId::Primitive(index) = tab {
            if index >= self.primitives.len() {
                self.set_status(format!("No primitive {index}"), StatusLevel::Warn);
                return;
            }
        }
        if tab == self.current_tab {
            return;
        }
        self.current_tab = tab;
        self.panels = panels_for(tab);
        self.pending_tab = Some(tab);
    }

    pub fn select_tab_index(&mut self, index: usize) {
        if let Some(tab) = self.tabs().get(index).copied() {
            self.select_tab(tab);
        }
    }

    pub fn cycle_tab(&mut self, forward: bool) {
        let tabs = self.tabs();
        let current = self.current_tab_index();
        let next = if forward {
            (current + 1) % tabs.len()
        } else {
            (current + tabs.len() - 1) % tabs.len()
        };
        self.select_tab(tabs[next]);
    }

    pub fn refresh(&mut self) {
        self.pending_refresh = true;
        self.set_status("Refreshing", StatusLevel::Info);
    }

    pub fn take_tab_request(&mut self) -> Option<TabId> {
        self.pending_tab.take()
    }

    pub fn take_refresh_request(&mut self) -> bool {
        std::mem::take(&mut self.pending_refresh)
    }

    pub fn set_status(&mut self, text: impl Into<String>, level: StatusLevel) {
        self.status = Some(StatusMessage {
            text: text.into(),
            level,
            since: Instant::now(),
        });
    }

    pub fn status_text(&self) -> Option<(&str, StatusLevel)> {
        self.status
            .as_ref()
            .map(|status| (status.text.as_str(), status.level))
    }

    pub fn on_tick(&mut self) {
        if let Some(status) = self.status.as_ref() {
            let ttl = match status.level {
                StatusLevel::Error => Duration::from_secs(8),
                _ => Duration::from_secs(3),
            };
            if status.since.elapsed() > ttl {
                self.status = None;
            }
        }
    }

    pub fn panel(&self, kind: PanelKind) -> Option<&PanelState> {
        self.panels.iter().find(|panel| panel.kind == kind)
    }

    pub fn apply_event(&mut self, event: RuntimeEvent) {
        match event {
            RuntimeEvent::Discovered { primitives } => {
                let count = primitives.len();
                self.primitives = primitives;
                if let TabId::Primitive(index) = self.current_tab {
                    if index >= count {
                        self.current_tab = TabId::Vault;
                        self.panels = panels_for(TabId::Vault);
                        self.pending_tab = Some(TabId::Vault);
                    }
                }
                self.set_status(format!("Vault has {count} primitives"), StatusLevel::Info);
            }
            RuntimeEvent::Panel {
                tab,
                panel,
                result,
                at,
            } => {
                // Late results from a tab that was closed are dropped.
                if tab != self.current_tab {
                    return;
                }
                if let Some(state) = self.panels.iter_mut().find(|state| state.kind == panel) {
                    state.apply(result, at);
                }
            }
            RuntimeEvent::StoreTick(snapshot) => self.store = Some(snapshot),
            RuntimeEvent::Error { message } => {
                self.set_status(message.clone(), StatusLevel::Error);
                self.last_error = Some(message);
            }
        }
    }

    pub fn enter_command(&mut self) {
        self.input_mode = InputMode::Command;
        self.command.input.clear();
    }

    pub fn exit_command(&mut self) {
        self.input_mode = InputMode::Normal;
        self.command.input.clear();
    }

    pub fn apply_command(&mut self) {
        let input = self.command.input.trim().to_string();
        if input.is_empty() {
            self.exit_command();
            return;
        }
        let cmd = parse_command(&input);
        self.execute_command(&cmd);
        self.command.last = Some(input);
        self.exit_command();
    }

    pub fn execute_command(&mut self, cmd: &Command) {
        match cmd {
            Command::Vault => self.select_tab(TabId::Vault),
            Command::Primitive(index) => self.select_tab(TabId::Primitive(*index)),
            Command::Qbank => self.select_tab(TabId::Qbank),
            Command::Refresh => self.refresh(),
            Command::Quit => self.should_quit = true,
            Command::Unknown(input) => {
                self.set_status(format!("Unknown command: {input}"), StatusLevel::Warn)
            }
        }
    }
}

fn panels_for(tab: TabId) -> Vec<PanelState> {
    tab.panels().iter().copied().map(PanelState::new).collect()
}
