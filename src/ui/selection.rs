use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::app::App;
use crate::quiz::{Level, child_options};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(5),
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    render_title(frame, chunks[0]);
    render_breadcrumb(frame, chunks[1], app);
    render_choices(frame, chunks[2], app);
    render_message(frame, chunks[3], app.message());
    render_controls(frame, chunks[4]);
}

fn render_title(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new("QUESTION BANK")
        .style(Style::default().fg(Color::Cyan).bold())
        .alignment(Alignment::Center);
    frame.render_widget(widget, area);
}

/// One line per level: chosen name, the level being chosen, or a dash.
fn render_breadcrumb(frame: &mut Frame, area: Rect, app: &App) {
    let selection = app.selection();
    let pending = selection.pending_level();

    let lines: Vec<Line> = Level::ALL
        .iter()
        .map(|&level| {
            let label = Span::styled(
                format!("{:<10}", level.label()),
                Style::default().fg(Color::DarkGray),
            );
            let value = match selection.get(level) {
                Some(key) => Span::styled(
                    display_name(app, level, key),
                    Style::default().fg(Color::Green),
                ),
                None if pending == Some(level) => Span::styled(
                    format!("Select {}", level.label()),
                    Style::default().fg(Color::Yellow),
                ),
                None => Span::styled("-", Style::default().fg(Color::DarkGray)),
            };
            Line::from(vec![label, value])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), area);
}

fn display_name(app: &App, level: Level, key: &str) -> String {
    let prefix = app.selection().prefix();
    let parent = &prefix[..level.index().min(prefix.len())];
    child_options(app.repository(), parent)
        .ok()
        .and_then(|entries| entries.into_iter().find(|e| e.key == key))
        .map(|e| e.name)
        .unwrap_or_else(|| key.to_string())
}

fn render_choices(frame: &mut Frame, area: Rect, app: &App) {
    let lines: Vec<Line> = app
        .choices()
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let is_selected = index == app.cursor();
            let style = if is_selected {
                Style::default().fg(Color::Cyan).bold()
            } else {
                Style::default().fg(Color::Gray)
            };
            let marker = if is_selected { ">" } else { " " };
            Line::from(vec![
                Span::styled(format!(" {} ", marker), style),
                Span::styled(entry.name.as_str(), style),
            ])
        })
        .collect();

    let title = format!(" {} ", app.pending_level().label());
    let widget = Paragraph::new(lines).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Color::DarkGray)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}

fn render_message(frame: &mut Frame, area: Rect, message: Option<&str>) {
    if let Some(message) = message {
        let widget = Paragraph::new(message)
            .alignment(Alignment::Center)
            .fg(Color::Red);
        frame.render_widget(widget, area);
    }
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new("j/k navigate  ·  enter choose  ·  esc back  ·  q quit")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
