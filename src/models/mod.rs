mod question;
mod repository;

#[cfg(test)]
pub(crate) use repository::fixtures;

pub use question::{ActiveQuestion, AnswerKey, FALSE_LABEL, Question, QuestionKind, TRUE_LABEL};
pub use repository::{Lesson, LessonPath, QuestionRepository, Semester, Subject, Unit};

/// Which screen the terminal front end is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    /// Walking subject → semester → unit → lesson.
    Selection,
    /// Answering questions.
    Quiz,
    /// Showing the score of a finished session.
    Result,
}
