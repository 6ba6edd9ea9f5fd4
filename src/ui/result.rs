use std::time::Duration;

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::app::App;
use crate::quiz::{Outcome, QuizResults};

const QUESTION_PREVIEW_LENGTH: usize = 55;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Some(results) = app.results() else {
        return;
    };
    let grade_color = grade_color(results.score_percent);

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(8),
        Constraint::Fill(1),
        Constraint::Length(2),
    ])
    .margin(1)
    .split(area);

    render_score_summary(frame, chunks[1], results, grade_color);
    render_question_breakdown(frame, chunks[2], app, results);
    render_controls(frame, chunks[3]);
}

fn grade_color(percent: u32) -> Color {
    if percent >= 90 {
        Color::Green
    } else if percent >= 70 {
        Color::Cyan
    } else if percent >= 50 {
        Color::Yellow
    } else {
        Color::Red
    }
}

fn outcome_color(outcome: Outcome) -> Color {
    match outcome {
        Outcome::Correct => Color::Green,
        Outcome::Incorrect => Color::Red,
        Outcome::Ungraded => Color::Yellow,
        Outcome::Unanswered => Color::DarkGray,
    }
}

/// `m:ss`, the way the elapsed time is shown on the results screen.
fn format_elapsed(elapsed: Duration) -> String {
    let seconds = elapsed.as_secs();
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

fn render_score_summary(frame: &mut Frame, area: Rect, results: &QuizResults, grade_color: Color) {
    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "RESULTS",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("{}%", results.score_percent),
            Style::default().fg(grade_color).bold(),
        )),
        Line::from(vec![
            Span::styled(
                format!("{} correct", results.correct),
                Style::default().fg(Color::Green),
            ),
            Span::styled("  ·  ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{} incorrect", results.incorrect),
                Style::default().fg(Color::Red),
            ),
        ]),
        Line::from(Span::styled(
            format!("Time spent {}", format_elapsed(results.elapsed)),
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn render_question_breakdown(frame: &mut Frame, area: Rect, app: &App, results: &QuizResults) {
    let questions = app.session().questions();
    let lines: Vec<Line> = results
        .outcomes
        .iter()
        .zip(questions)
        .enumerate()
        .map(|(index, (&outcome, question))| breakdown_line(index + 1, outcome, &question.text))
        .collect();

    let widget = Paragraph::new(lines)
        .block(Block::default().padding(Padding::horizontal(1)))
        .scroll((app.result_scroll() as u16, 0));
    frame.render_widget(widget, area);
}

fn breakdown_line(number: usize, outcome: Outcome, text: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!(" {} ", outcome.symbol()),
            Style::default().fg(outcome_color(outcome)),
        ),
        Span::styled(format!("{:2}. ", number), Style::default().fg(Color::DarkGray)),
        Span::styled(preview(text), Style::default().fg(Color::Gray)),
    ])
}

/// The first [`QUESTION_PREVIEW_LENGTH`] characters of `text`, with an
/// ellipsis when anything was cut.
fn preview(text: &str) -> String {
    match text.char_indices().nth(QUESTION_PREVIEW_LENGTH) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new("j/k scroll  ·  r restart  ·  s other lesson  ·  q quit")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
