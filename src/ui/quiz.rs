use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::models::{ActiveQuestion, QuestionKind};
use crate::quiz::Feedback;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Some(question) = app.current_question() else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(5),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .margin(2)
    .split(area);

    render_progress(frame, chunks[0], app);
    render_question_text(frame, chunks[1], &question.text);

    match question.kind {
        QuestionKind::ShortAnswer => render_answer_input(frame, chunks[2], app),
        QuestionKind::MultipleChoice | QuestionKind::TrueFalse => {
            render_options(frame, chunks[2], question, app)
        }
    }

    if let Some(feedback) = app.feedback() {
        render_feedback(frame, chunks[3], feedback);
    }
    if let Some(message) = app.message() {
        let widget = Paragraph::new(message)
            .alignment(Alignment::Center)
            .fg(Color::Red);
        frame.render_widget(widget, chunks[4]);
    }
    render_controls(frame, chunks[5], app);

    if app.is_confirming_finish() {
        render_finish_dialog(frame, area);
    }
}

fn render_progress(frame: &mut Frame, area: Rect, app: &App) {
    let [title_area, counter_area] =
        Layout::horizontal([Constraint::Fill(1), Constraint::Length(24)]).areas(area);

    let title = Paragraph::new(app.lesson_title()).fg(Color::Cyan).bold();
    frame.render_widget(title, title_area);

    let progress = format!(
        "Question {} of {}",
        app.current_question_number(),
        app.total_questions()
    );
    let widget = Paragraph::new(progress)
        .alignment(Alignment::Right)
        .fg(Color::DarkGray);
    frame.render_widget(widget, counter_area);
}

fn render_question_text(frame: &mut Frame, area: Rect, text: &str) {
    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .fg(Color::White)
        .bold();
    frame.render_widget(widget, area);
}

fn option_label(index: usize) -> char {
    (b'A' + (index % 26) as u8) as char
}

fn render_options(frame: &mut Frame, area: Rect, question: &ActiveQuestion, app: &App) {
    let options = question.options();
    let mut lines: Vec<Line> = Vec::with_capacity(options.len() * 2);

    for (index, option) in options.iter().enumerate() {
        let is_selected = app.selected_option() == Some(index);
        let style = match app.feedback() {
            Some(_) if question.correct_index() == Some(index) => {
                Style::default().fg(Color::Green).bold()
            }
            Some(_) if is_selected => Style::default().fg(Color::Red).bold(),
            _ if is_selected => Style::default().fg(Color::Cyan).bold(),
            _ => Style::default().fg(Color::Gray),
        };
        let marker = if is_selected { ">" } else { " " };

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(format!("{}. ", option_label(index)), style),
            Span::styled(option.as_str(), style),
        ]));
        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_answer_input(frame: &mut Frame, area: Rect, app: &App) {
    let mut text = app.answer_input().to_string();
    if app.is_typing() {
        text.push('_');
    }

    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .fg(Color::Yellow)
        .block(
            Block::default()
                .title(" Your answer ")
                .borders(Borders::ALL)
                .border_style(Color::DarkGray)
                .padding(Padding::horizontal(1)),
        );
    frame.render_widget(widget, area);
}

fn render_feedback(frame: &mut Frame, area: Rect, feedback: &Feedback) {
    let (title, color, lines) = match feedback {
        Feedback::Graded {
            correct,
            correct_option,
            explanation,
        } => {
            let (title, color) = if *correct {
                (" Correct! ", Color::Green)
            } else {
                (" Incorrect. ", Color::Red)
            };
            let mut lines = Vec::new();
            if !*correct {
                lines.push(Line::from(format!("Answer: {}", correct_option)));
            }
            lines.push(Line::from(explanation.as_str()).fg(Color::Gray));
            (title, color, lines)
        }
        Feedback::Ungraded { sample_answer } => (
            " Sample Answer ",
            Color::Cyan,
            vec![
                Line::from(sample_answer.as_str()),
                Line::from("Compare your answer with the sample answer above.").fg(Color::DarkGray),
            ],
        ),
    };

    let widget = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(color)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect, app: &App) {
    let text = if app.feedback().is_some() {
        "enter next question  ·  f finish  ·  q quit"
    } else if app.is_typing() {
        "type your answer  ·  enter submit  ·  esc finish"
    } else {
        "j/k navigate  ·  enter submit  ·  f finish  ·  q quit"
    };
    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}

fn render_finish_dialog(frame: &mut Frame, area: Rect) {
    let [_, middle, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(6),
        Constraint::Fill(1),
    ])
    .areas(area);
    let [_, dialog, _] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(54),
        Constraint::Fill(1),
    ])
    .areas(middle);

    let content = vec![
        Line::from("Are you sure you want to finish the quiz?"),
        Line::from("This will end the quiz immediately.").fg(Color::DarkGray),
        Line::from(""),
        Line::from(Span::styled(
            "y confirm  ·  n cancel",
            Style::default().fg(Color::Yellow),
        )),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::Yellow),
    );
    frame.render_widget(Clear, dialog);
    frame.render_widget(widget, dialog);
}
