//! # question-bank
//!
//! A question-bank quiz: pick a subject, semester, unit and lesson, then work
//! through the lesson's questions in shuffled order and see your score.
//!
//! The quiz core ([`QuizSession`], [`child_options`], [`shuffle`]) is plain
//! library code over an injected [`QuestionRepository`]. [`Quiz::run`] puts a
//! terminal front end on top of it.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use question_bank::{AppError, Quiz};
//!
//! fn main() -> Result<(), AppError> {
//!     // Load the question bank from a JSON file
//!     let quiz = Quiz::from_json("question_bank.json")?;
//!
//!     // Run the quiz in the terminal
//!     quiz.run()?;
//!
//!     Ok(())
//! }
//! ```
//!
//! Driving a session directly:
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use question_bank::{Answer, LessonPath, QuizSession, load_repository_from_json};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repository = Arc::new(load_repository_from_json("question_bank.json")?);
//!     let mut session = QuizSession::new(repository);
//!     session.start(&LessonPath::new("english", "semester1", "unit1", "Lesson 1"))?;
//!
//!     let feedback = session.submit(Answer::Choice(Some(0)))?;
//!     println!("{:?}", feedback);
//!     session.advance()?;
//!
//!     Ok(())
//! }
//! ```

mod app;
mod data;
mod error;
mod models;
mod quiz;
mod ui;

use std::path::Path;
use std::sync::Arc;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::DefaultTerminal;
use tracing::info;

pub use app::App;
pub use data::{DEFAULT_QUESTION_BANK_PATH, LoadError, load_repository_from_json, validate};
pub use error::{AppError, QuizError};
pub use models::{
    ActiveQuestion, AnswerKey, AppState, FALSE_LABEL, Lesson, LessonPath, Question, QuestionKind,
    QuestionRepository, Semester, Subject, TRUE_LABEL, Unit,
};
pub use quiz::{
    Answer, ChoiceEntry, Feedback, Level, Outcome, QuizResults, QuizSession, SelectionPath,
    SessionState, child_options, score_percent, shuffle, shuffle_options,
};

/// A quiz instance that can be run in the terminal.
pub struct Quiz {
    app: App,
}

impl Quiz {
    /// Create a new quiz over an already loaded question bank.
    pub fn new(repository: QuestionRepository) -> Self {
        Self {
            app: App::new(Arc::new(repository)),
        }
    }

    /// Same as [`Quiz::new`] but every shuffle is reproducible from `seed`.
    pub fn with_seed(repository: QuestionRepository, seed: u64) -> Self {
        Self {
            app: App::with_seed(Arc::new(repository), seed),
        }
    }

    /// Load a quiz from a JSON question bank.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use question_bank::Quiz;
    ///
    /// let quiz = Quiz::from_json("question_bank.json").expect("Failed to load quiz");
    /// ```
    pub fn from_json<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let repository = load_repository_from_json(path)?;
        Ok(Self::new(repository))
    }

    /// Run the quiz in the terminal.
    ///
    /// This will take over the terminal, display the quiz UI, and return
    /// when the user quits.
    pub fn run(mut self) -> Result<(), AppError> {
        let mut terminal = ratatui::init();
        info!("terminal ui started");
        let result = run_event_loop(&mut terminal, &mut self.app);
        ratatui::restore();
        info!("terminal ui stopped");
        result
    }

    /// Get a reference to the underlying app for custom handling.
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Get a mutable reference to the underlying app for custom handling.
    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }
}

fn run_event_loop(terminal: &mut DefaultTerminal, app: &mut App) -> Result<(), AppError> {
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind == KeyEventKind::Press && handle_input(app, key.code) {
            return Ok(());
        }
    }
}

/// Returns true if the app should exit.
fn handle_input(app: &mut App, key: KeyCode) -> bool {
    if matches!(key, KeyCode::Char('q' | 'Q')) && !app.is_typing() {
        return !app.is_confirming_finish();
    }

    match app.state {
        AppState::Selection => handle_selection_input(app, key),
        AppState::Quiz => handle_quiz_input(app, key),
        AppState::Result => handle_result_input(app, key),
    }
    false
}

fn handle_selection_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Up | KeyCode::Char('k') => app.select_previous_choice(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next_choice(),
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => app.confirm_choice(),
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Left | KeyCode::Char('h') => app.go_back(),
        _ => {}
    }
}

fn handle_quiz_input(app: &mut App, key: KeyCode) {
    if app.is_confirming_finish() {
        match key {
            KeyCode::Char('y' | 'Y') | KeyCode::Enter => app.confirm_finish(),
            KeyCode::Char('n' | 'N') | KeyCode::Esc => app.cancel_finish(),
            _ => {}
        }
        return;
    }

    if app.is_typing() {
        match key {
            KeyCode::Char(c) => app.push_answer_char(c),
            KeyCode::Backspace => app.pop_answer_char(),
            KeyCode::Enter => app.submit_or_next(),
            KeyCode::Esc => app.request_finish(),
            _ => {}
        }
        return;
    }

    match key {
        KeyCode::Up | KeyCode::Char('k') => app.select_previous_option(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next_option(),
        KeyCode::Char(c @ '1'..='9') => app.select_option(c as usize - '1' as usize),
        KeyCode::Enter | KeyCode::Char(' ') => app.submit_or_next(),
        KeyCode::Char('f' | 'F') | KeyCode::Esc => app.request_finish(),
        _ => {}
    }
}

fn handle_result_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Down | KeyCode::Char('j') => app.scroll_results_down(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_results_up(),
        KeyCode::Char('r' | 'R') => app.restart(),
        KeyCode::Char('s' | 'S') => app.choose_another_lesson(),
        _ => {}
    }
}
