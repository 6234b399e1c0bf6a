use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use qmonitor::app::{App, InputMode};
use qmonitor::config::{self, Config};
use qmonitor::logging;
use qmonitor::monitor::{RuntimeBridge, RuntimeCommand, WorkerSettings};
use qmonitor::ui;

#[derive(Debug, Parser)]
#[command(
    name = "qmonitor",
    version,
    about = "qmonitor: a terminal monitor for Quasar vaults and their primitives"
)]
struct Args {
    /// Config file (default: $QMONITOR_CONFIG or ~/.config/qmonitor/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Quasar REST endpoint (e.g. http://localhost:1317)
    #[arg(long)]
    rest: Option<String>,

    /// Vault contract address
    #[arg(long)]
    vault: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args);

    let _log_guard = match logging::init(&config.logging) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("logging disabled: {err:#}");
            None
        }
    };
    tracing::info!(rest = %config.chain.quasar_rest, "starting qmonitor");

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = RuntimeBridge::new(WorkerSettings::from_config(&config)).and_then(|runtime| {
        let app = App::new(
            config.chain.quasar_rest.clone(),
            config.monitor.vault_address().map(str::to_string),
        );
        run_app(&mut terminal, app, runtime)
    });

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!("{:#}", err);
        eprintln!("{err:?}");
    }

    Ok(())
}

fn load_config(args: &Args) -> Config {
    let mut config = match args.config.as_deref() {
        Some(path) => config::load_from(path),
        None => config::load(),
    };
    if let Some(rest) = args.rest.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        config.chain.quasar_rest = rest.trim_end_matches('/').to_string();
    }
    if let Some(vault) = args.vault.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        config.monitor.vault = Some(vault.to_string());
    }
    config
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    runtime: RuntimeBridge,
) -> Result<()> {
    let tick_rate = Duration::from_millis(200);
    let mut last_tick = Instant::now();

    loop {
        pump_background(&mut app, &runtime);
        terminal.draw(|f| ui::draw(f, &app))?;
        if app.should_quit {
            let _ = runtime.send(RuntimeCommand::Shutdown);
            return Ok(());
        }

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                handle_key(&mut app, key);
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.on_tick();
            last_tick = Instant::now();
        }

        pump_background(&mut app, &runtime);
    }
}

fn pump_background(app: &mut App, runtime: &RuntimeBridge) {
    for event in runtime.poll_events() {
        app.apply_event(event);
    }

    if let Some(tab) = app.take_tab_request() {
        let _ = runtime.send(RuntimeCommand::OpenTab(tab));
    }
    if app.take_refresh_request() {
        let _ = runtime.send(RuntimeCommand::Refresh);
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.input_mode {
        InputMode::Command => match key.code {
            KeyCode::Esc => app.exit_command(),
            KeyCode::Enter => app.apply_command(),
            KeyCode::Backspace => {
                app.command.input.pop();
            }
            KeyCode::Char(c) => app.command.input.push(c),
            _ => {}
        },
        InputMode::Normal => match key.code {
            KeyCode::Char('q') => app.should_quit = true,
            KeyCode::Char('?') => app.help_open = !app.help_open,
            KeyCode::Esc => app.help_open = false,
            KeyCode::Char(':') => app.enter_command(),
            KeyCode::Char('r') => app.refresh(),
            KeyCode::Tab => app.cycle_tab(true),
            KeyCode::BackTab => app.cycle_tab(false),
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                app.select_tab_index(index);
            }
            _ => {}
        },
    }
}
