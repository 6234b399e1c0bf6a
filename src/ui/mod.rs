use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap};
use ratatui::Frame;

pub mod layout;

use crate::app::{App, InputMode, StatusLevel};
use crate::monitor::{PanelKind, PanelState, TabId};

pub fn draw(f: &mut Frame, app: &App) {
    let areas = layout::areas(f.size());

    draw_header(f, areas.header, app);
    match app.current_tab {
        TabId::Vault => draw_vault(f, areas.main, app),
        TabId::Primitive(_) => draw_primitive(f, areas.main, app),
        TabId::Qbank => draw_store(f, areas.main, app),
    }
    draw_status_line(f, areas.status_line, app);
    draw_command_line(f, areas.command_line, app);

    if app.help_open {
        draw_help_popup(f, areas.size);
    }
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(12), Constraint::Min(0)])
        .split(area);

    let title = Paragraph::new(Line::from(Span::styled(
        "qmonitor",
        Style::default()
            .fg(Color::LightCyan)
            .add_modifier(Modifier::BOLD),
    )))
    .block(Block::default().borders(Borders::ALL));

    let titles: Vec<Line> = app
        .tabs()
        .iter()
        .enumerate()
        .map(|(idx, tab)| {
            let label = if idx < 9 {
                format!("{} {}", idx + 1, tab.title())
            } else {
                tab.title()
            };
            Line::from(label)
        })
        .collect();
    let tabs = Tabs::new(titles)
        .select(app.current_tab_index())
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    f.render_widget(title, chunks[0]);
    f.render_widget(tabs, chunks[1]);
}

fn draw_vault(f: &mut Frame, area: Rect, app: &App) {
    let Some(vault) = app.vault.as_deref() else {
        let hint = Paragraph::new("No vault configured. Set [monitor] vault in the config or pass --vault.")
            .block(Block::default().title(" vault ").borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        f.render_widget(hint, area);
        return;
    };

    let outer = Block::default()
        .title(format!(" vault {} ", vault))
        .borders(Borders::ALL);
    let inner = outer.inner(area);
    f.render_widget(outer, area);

    for (panel, rect) in app.panels.iter().zip(layout::rows(inner, app.panels.len())) {
        let title = match panel.updated_at {
            Some(at) => format!(" {} ({}) ", panel.kind.title(), at.format("%H:%M:%S")),
            None => format!(" {} ", panel.kind.title()),
        };
        let border = if panel.error.is_some() {
            Style::default().fg(Color::LightRed)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let body = Paragraph::new(Text::from(panel.display()))
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(border),
            )
            .wrap(Wrap { trim: false });
        f.render_widget(body, rect);
    }
}

fn draw_primitive(f: &mut Frame, area: Rect, app: &App) {
    let title = format!(" {} ", app.current_tab.title());
    let mut lines = Vec::new();

    if let Some(primitive) = app.current_primitive() {
        lines.push(label_line("qsr address", Span::raw(primitive.address.clone())));
        lines.push(label_line("weight in vault", Span::raw(primitive.weight.clone())));
    }

    let groups: [&[PanelKind]; 2] = [
        &[
            PanelKind::IcaAddress,
            PanelKind::OsmosisBalance,
            PanelKind::OsmosisLocked,
            PanelKind::QuasarBalance,
        ],
        &[PanelKind::Lock, PanelKind::PendingAcks, PanelKind::TrappedErrors],
    ];
    for group in groups {
        lines.push(Line::from(""));
        for kind in group {
            if let Some(panel) = app.panel(*kind) {
                lines.push(panel_line(panel));
            }
        }
    }

    let init = app
        .current_primitive()
        .and_then(|primitive| primitive.init.get("l_p"))
        .and_then(|value| value.as_object());
    if let Some(init) = init {
        lines.push(Line::from(""));
        for (key, value) in init {
            let text = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            lines.push(label_line(key, Span::raw(text)));
        }
    }

    let paragraph = Paragraph::new(Text::from(lines))
        .block(Block::default().title(title).borders(Borders::ALL))
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

fn draw_store(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().title(" qbank store ").borders(Borders::ALL);
    let Some(store) = app.store.as_ref() else {
        let waiting = Paragraph::new("waiting for the first block...").block(block);
        f.render_widget(waiting, area);
        return;
    };

    let mut lines = vec![
        label_line("height", Span::raw(store.height.to_string())),
        label_line("subscriptions", Span::raw(store.subscriptions.to_string())),
    ];
    if store.skipped > 0 {
        lines.push(label_line(
            "coalesced blocks",
            Span::raw(store.skipped.to_string()),
        ));
    }
    for failure in &store.failures {
        lines.push(Line::from(Span::styled(
            failure.clone(),
            Style::default().fg(Color::LightRed),
        )));
    }

    lines.push(Line::from(""));
    lines.push(section_line("params"));
    match store.params.as_deref() {
        Some(params) => lines.extend(params.lines().map(|l| Line::from(format!("  {l}")))),
        None => lines.push(Line::from("  loading...")),
    }

    lines.push(Line::from(""));
    lines.push(section_line(&format!("deposits ({})", store.deposits.len())));
    lines.extend(store.deposits.iter().map(|d| Line::from(format!("  {d}"))));

    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

fn label_line(label: &str, value: Span<'static>) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label}: "), Style::default().fg(Color::DarkGray)),
        value,
    ])
}

fn section_line(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        Style::default()
            .fg(Color::LightCyan)
            .add_modifier(Modifier::BOLD),
    ))
}

fn panel_line(panel: &PanelState) -> Line<'static> {
    let value_style = match (panel.kind, panel.value.as_deref()) {
        (PanelKind::Lock, Some("unlocked")) => Style::default().fg(Color::LightGreen),
        (PanelKind::Lock, Some(_)) => Style::default().fg(Color::LightRed),
        _ => Style::default(),
    };
    let mut spans = vec![Span::styled(
        format!("{}: ", panel.kind.title()),
        Style::default().fg(Color::DarkGray),
    )];
    match (&panel.value, &panel.error) {
        (Some(value), error) => {
            spans.push(Span::styled(value.clone(), value_style));
            if let Some(error) = error {
                spans.push(Span::styled(
                    format!("  (stale: {error})"),
                    Style::default().fg(Color::LightYellow),
                ));
            }
        }
        (None, Some(_)) => {
            spans.push(Span::styled(panel.display(), Style::default().fg(Color::LightRed)))
        }
        (None, None) => {
            spans.push(Span::styled(panel.display(), Style::default().fg(Color::DarkGray)))
        }
    }
    Line::from(spans)
}

fn draw_status_line(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![
        Span::styled("REST ", Style::default().fg(Color::DarkGray)),
        Span::raw(format!("{}  ", app.endpoint)),
        Span::styled("Tab ", Style::default().fg(Color::DarkGray)),
        Span::raw(format!("{}  ", app.current_tab.title())),
    ];
    if let Some(store) = app.store.as_ref() {
        spans.push(Span::styled("Block ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::raw(format!("{}  ", store.height)));
    }
    if let Some(error) = app.last_error.as_deref() {
        spans.push(Span::styled("Last error ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::styled(
            truncate_str(error, 60),
            Style::default().fg(Color::LightRed),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Left);
    f.render_widget(paragraph, area);
}

/// Get command hint for autocompletion
fn command_hint(input: &str) -> Option<&'static str> {
    let input = input.trim().to_lowercase();
    if input.is_empty() {
        return None;
    }

    let commands = [
        ("vault", "Show the vault tab"),
        ("primitive", "primitive <n>: show a primitive tab"),
        ("qbank", "Show the qbank store"),
        ("refresh", "Re-run every poller of this tab"),
        ("quit", "Exit"),
    ];

    for (cmd, desc) in commands {
        if cmd.starts_with(&input) || input.starts_with(cmd) {
            return Some(desc);
        }
    }
    None
}

fn draw_command_line(f: &mut Frame, area: Rect, app: &App) {
    let content = match app.input_mode {
        InputMode::Command => {
            let hint = command_hint(&app.command.input);
            let hint_text = hint.unwrap_or("vault | primitive <n> | qbank | refresh | quit");
            Line::from(vec![
                Span::styled(": ", Style::default().fg(Color::Yellow)),
                Span::raw(app.command.input.clone()),
                Span::styled(
                    format!("  {}", hint_text),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        }
        InputMode::Normal => {
            if let Some((text, level)) = app.status_text() {
                let color = match level {
                    StatusLevel::Info => Color::LightGreen,
                    StatusLevel::Warn => Color::LightYellow,
                    StatusLevel::Error => Color::LightRed,
                };
                Line::from(vec![
                    Span::styled("msg: ", Style::default().fg(Color::DarkGray)),
                    Span::styled(text.to_string(), Style::default().fg(color)),
                ])
            } else {
                action_hints()
            }
        }
    };

    let paragraph = Paragraph::new(content).style(Style::default().fg(Color::White));
    f.render_widget(paragraph, area);
}

fn action_hints() -> Line<'static> {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::LightCyan));
    Line::from(vec![
        key("Tab"),
        Span::raw(" Next tab  "),
        key("1-9"),
        Span::raw(" Jump  "),
        key("r"),
        Span::raw(" Refresh  "),
        key(":"),
        Span::raw(" Command  "),
        key("?"),
        Span::raw(" Help  "),
        key("q"),
        Span::raw(" Quit"),
    ])
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 50, area);
    f.render_widget(Clear, popup_area);

    let lines = vec![
        Line::from("Navigation"),
        Line::from("  Tab / Shift-Tab  Next / previous tab"),
        Line::from("  1-9              Jump to tab"),
        Line::from(""),
        Line::from("Actions"),
        Line::from("  r                Refresh the open tab"),
        Line::from("  :                Command line"),
        Line::from("  ?                Toggle help"),
        Line::from("  q                Quit"),
        Line::from(""),
        Line::from("Commands"),
        Line::from("  :vault  :primitive <n>  :qbank  :refresh  :quit"),
    ];

    let paragraph = Paragraph::new(Text::from(lines))
        .block(Block::default().title("Help").borders(Borders::ALL))
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, popup_area);
}

fn truncate_str(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    value.chars().take(max).collect::<String>() + "…"
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
