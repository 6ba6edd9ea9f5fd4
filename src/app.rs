use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::QuizError;
use crate::models::{ActiveQuestion, AppState, QuestionKind, QuestionRepository};
use crate::quiz::{
    Answer, ChoiceEntry, Feedback, Level, QuizResults, QuizSession, SelectionPath, SessionState,
    child_options,
};

/// Terminal front end state. Owns the quiz session and forwards every user
/// action to it; nothing here decides correctness or scoring.
pub struct App {
    pub state: AppState,
    repository: Arc<QuestionRepository>,
    selection: SelectionPath,
    choices: Vec<ChoiceEntry>,
    cursor: usize,
    session: QuizSession,
    selected_option: Option<usize>,
    answer_input: String,
    feedback: Option<Feedback>,
    message: Option<String>,
    confirm_finish: bool,
    results: Option<QuizResults>,
    result_scroll: usize,
}

impl App {
    pub fn new(repository: Arc<QuestionRepository>) -> Self {
        let session = QuizSession::new(Arc::clone(&repository));
        Self::with_session(repository, session)
    }

    /// Same as [`App::new`] but with a reproducible shuffle order.
    pub fn with_seed(repository: Arc<QuestionRepository>, seed: u64) -> Self {
        let session = QuizSession::with_seed(Arc::clone(&repository), seed);
        Self::with_session(repository, session)
    }

    fn with_session(repository: Arc<QuestionRepository>, session: QuizSession) -> Self {
        let mut app = Self {
            state: AppState::Selection,
            repository,
            selection: SelectionPath::new(),
            choices: Vec::new(),
            cursor: 0,
            session,
            selected_option: None,
            answer_input: String::new(),
            feedback: None,
            message: None,
            confirm_finish: false,
            results: None,
            result_scroll: 0,
        };
        app.refresh_choices();
        app
    }

    // -- selection ---------------------------------------------------------

    pub fn selection(&self) -> &SelectionPath {
        &self.selection
    }

    pub fn repository(&self) -> &QuestionRepository {
        &self.repository
    }

    /// The level the choice list currently offers.
    pub fn pending_level(&self) -> Level {
        self.selection.pending_level().unwrap_or(Level::Lesson)
    }

    pub fn choices(&self) -> &[ChoiceEntry] {
        &self.choices
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn select_next_choice(&mut self) {
        if !self.choices.is_empty() {
            self.cursor = (self.cursor + 1) % self.choices.len();
        }
    }

    pub fn select_previous_choice(&mut self) {
        if !self.choices.is_empty() {
            self.cursor = (self.cursor + self.choices.len() - 1) % self.choices.len();
        }
    }

    /// Choose the highlighted entry. Choosing a lesson starts the quiz.
    pub fn confirm_choice(&mut self) {
        let Some(entry) = self.choices.get(self.cursor).cloned() else {
            return;
        };
        let level = self.pending_level();
        self.selection.choose(level, Some(entry.key));

        match self.selection.lesson_path() {
            Some(lesson) => match self.session.start(&lesson) {
                Ok(()) => self.enter_quiz(),
                Err(err) => {
                    // stay on the lesson list so another lesson can be picked
                    self.selection.choose(Level::Lesson, None);
                    self.message = Some(err.to_string());
                }
            },
            None => self.refresh_choices(),
        }
    }

    /// Undo the most recent choice.
    pub fn go_back(&mut self) {
        let last_chosen = match self.selection.pending_level() {
            Some(pending) => pending.previous(),
            None => Some(Level::Lesson),
        };
        if let Some(level) = last_chosen {
            self.selection.choose(level, None);
            self.refresh_choices();
        }
    }

    fn refresh_choices(&mut self) {
        let level = self.pending_level();
        self.cursor = 0;
        self.message = None;
        let resolved = child_options(&self.repository, &self.selection.prefix());
        self.choices = match resolved {
            Ok(choices) => choices,
            Err(err) => {
                warn!(error = %err, "selection no longer resolves, starting over");
                self.selection.clear();
                child_options(&self.repository, &[]).unwrap_or_default()
            }
        };
        if self.choices.is_empty() {
            self.message = Some(format!("No {} available here", level.label().to_lowercase()));
        }
    }

    // -- quiz --------------------------------------------------------------

    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    pub fn current_question(&self) -> Option<&ActiveQuestion> {
        self.session.current_question().ok()
    }

    pub fn current_question_number(&self) -> usize {
        self.session.current_index() + 1
    }

    pub fn total_questions(&self) -> usize {
        self.session.total_questions()
    }

    pub fn lesson_title(&self) -> String {
        self.session
            .lesson()
            .and_then(|lesson| self.repository.lesson(lesson).ok())
            .map(|lesson| lesson.display_name().to_string())
            .unwrap_or_default()
    }

    pub fn selected_option(&self) -> Option<usize> {
        self.selected_option
    }

    pub fn answer_input(&self) -> &str {
        &self.answer_input
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    pub fn is_confirming_finish(&self) -> bool {
        self.confirm_finish
    }

    /// True while a short-answer question is waiting for typed text.
    pub fn is_typing(&self) -> bool {
        self.feedback.is_none()
            && !self.confirm_finish
            && self
                .current_question()
                .is_some_and(|q| q.kind == QuestionKind::ShortAnswer)
    }

    fn option_count(&self) -> usize {
        self.current_question().map_or(0, |q| q.options().len())
    }

    pub fn select_next_option(&mut self) {
        let count = self.option_count();
        if count == 0 || self.feedback.is_some() {
            return;
        }
        self.selected_option = Some(match self.selected_option {
            Some(current) => (current + 1) % count,
            None => 0,
        });
    }

    pub fn select_previous_option(&mut self) {
        let count = self.option_count();
        if count == 0 || self.feedback.is_some() {
            return;
        }
        self.selected_option = Some(match self.selected_option {
            Some(current) => (current + count - 1) % count,
            None => count - 1,
        });
    }

    /// Pick option `index` directly (digit keys).
    pub fn select_option(&mut self, index: usize) {
        if index < self.option_count() && self.feedback.is_none() {
            self.selected_option = Some(index);
        }
    }

    pub fn push_answer_char(&mut self, c: char) {
        if self.is_typing() {
            self.answer_input.push(c);
        }
    }

    pub fn pop_answer_char(&mut self) {
        if self.is_typing() {
            self.answer_input.pop();
        }
    }

    /// Submit once; after feedback is shown the same key moves on.
    pub fn submit_or_next(&mut self) {
        if self.feedback.is_some() {
            self.next_question();
        } else {
            self.submit_answer();
        }
    }

    pub fn submit_answer(&mut self) {
        if self.feedback.is_some() {
            return;
        }
        let Some(question) = self.current_question() else {
            return;
        };
        let answer = match question.kind {
            QuestionKind::ShortAnswer => Answer::Text(self.answer_input.clone()),
            QuestionKind::MultipleChoice | QuestionKind::TrueFalse => {
                Answer::Choice(self.selected_option)
            }
        };

        match self.session.submit(answer) {
            Ok(feedback) => {
                self.feedback = Some(feedback);
                self.message = None;
            }
            Err(err) => {
                debug!(error = %err, "answer rejected");
                self.message = Some(err.to_string());
            }
        }
    }

    pub fn next_question(&mut self) {
        if let Err(err) = self.session.advance() {
            self.report(err);
            return;
        }
        if self.session.state() == SessionState::Complete {
            self.show_results();
        } else {
            self.reset_question_input();
        }
    }

    pub fn request_finish(&mut self) {
        if self.state == AppState::Quiz {
            self.confirm_finish = true;
        }
    }

    pub fn cancel_finish(&mut self) {
        self.confirm_finish = false;
    }

    pub fn confirm_finish(&mut self) {
        self.confirm_finish = false;
        match self.session.finish() {
            Ok(()) => self.show_results(),
            Err(err) => self.report(err),
        }
    }

    fn enter_quiz(&mut self) {
        self.state = AppState::Quiz;
        self.results = None;
        self.result_scroll = 0;
        self.confirm_finish = false;
        self.reset_question_input();
    }

    fn reset_question_input(&mut self) {
        self.selected_option = None;
        self.answer_input.clear();
        self.feedback = None;
        self.message = None;
    }

    // -- results -----------------------------------------------------------

    pub fn results(&self) -> Option<&QuizResults> {
        self.results.as_ref()
    }

    pub fn result_scroll(&self) -> usize {
        self.result_scroll
    }

    fn show_results(&mut self) {
        match self.session.results() {
            Ok(results) => {
                self.results = Some(results);
                self.result_scroll = 0;
                self.state = AppState::Result;
            }
            Err(err) => self.report(err),
        }
    }

    pub fn scroll_results_down(&mut self) {
        let max = self.session.total_questions().saturating_sub(1);
        self.result_scroll = (self.result_scroll + 1).min(max);
    }

    pub fn scroll_results_up(&mut self) {
        self.result_scroll = self.result_scroll.saturating_sub(1);
    }

    /// Run the same lesson again with a fresh shuffle.
    pub fn restart(&mut self) {
        match self.session.restart() {
            Ok(()) => self.enter_quiz(),
            Err(err) => self.report(err),
        }
    }

    /// Leave the results and pick another lesson of the same unit.
    pub fn choose_another_lesson(&mut self) {
        self.selection.choose(Level::Lesson, None);
        self.state = AppState::Selection;
        self.results = None;
        self.refresh_choices();
    }

    fn report(&mut self, err: QuizError) {
        warn!(error = %err, "operation rejected");
        self.message = Some(err.to_string());
    }
}
