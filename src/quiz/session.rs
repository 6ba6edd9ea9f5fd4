//! Quiz session state machine.
//!
//! ```text
//! Idle --start--> InProgress --advance (last)/finish--> Complete
//!                     ^                                    |
//!                     +-------------- restart -------------+
//! ```
//!
//! A session works on private copies of a lesson's questions. Question order
//! and each choice question's option order are shuffled once when the lesson
//! is loaded and stay fixed until the next `start` or `restart`.

use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};
use uuid::Uuid;

use super::shuffle::{shuffle, shuffle_options};
use crate::error::QuizError;
use crate::models::{ActiveQuestion, AnswerKey, LessonPath, Question, QuestionRepository};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    InProgress,
    Complete,
}

/// Raw input for the current question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// Index of the picked option, `None` if nothing is picked.
    Choice(Option<usize>),
    /// Free text for a short-answer question.
    Text(String),
}

/// What the learner sees after a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    Graded {
        correct: bool,
        correct_option: String,
        explanation: String,
    },
    /// Short answers are never checked automatically.
    Ungraded { sample_answer: String },
}

/// Recorded result for one question of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect,
    Ungraded,
    Unanswered,
}

impl Outcome {
    /// Marker used in the per-question breakdown.
    pub fn symbol(self) -> char {
        match self {
            Outcome::Correct => '+',
            Outcome::Incorrect => '-',
            Outcome::Ungraded => '~',
            Outcome::Unanswered => '?',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizResults {
    pub score_percent: u32,
    pub correct: usize,
    pub incorrect: usize,
    pub elapsed: Duration,
    pub outcomes: Vec<Outcome>,
}

impl QuizResults {
    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed.as_secs()
    }

    pub fn total(&self) -> usize {
        self.correct + self.incorrect
    }
}

/// Percentage of `score` out of `total`, rounded half up.
pub fn score_percent(score: usize, total: usize) -> Result<u32, QuizError> {
    if total == 0 {
        return Err(QuizError::DivisionByZero);
    }
    let percent = (200 * score as u64 + total as u64) / (2 * total as u64);
    Ok(percent as u32)
}

pub struct QuizSession {
    id: Uuid,
    repository: Arc<QuestionRepository>,
    rng: StdRng,
    state: SessionState,
    lesson: Option<LessonPath>,
    questions: Vec<ActiveQuestion>,
    outcomes: Vec<Option<Outcome>>,
    current_index: usize,
    score: usize,
    started_at: Option<Instant>,
    completed_at: Option<Instant>,
}

impl QuizSession {
    /// An idle session drawing randomness from the OS.
    pub fn new(repository: Arc<QuestionRepository>) -> Self {
        Self::with_rng(repository, StdRng::from_entropy())
    }

    /// An idle session with a reproducible shuffle order.
    pub fn with_seed(repository: Arc<QuestionRepository>, seed: u64) -> Self {
        Self::with_rng(repository, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(repository: Arc<QuestionRepository>, rng: StdRng) -> Self {
        Self {
            id: Uuid::new_v4(),
            repository,
            rng,
            state: SessionState::Idle,
            lesson: None,
            questions: Vec::new(),
            outcomes: Vec::new(),
            current_index: 0,
            score: 0,
            started_at: None,
            completed_at: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn lesson(&self) -> Option<&LessonPath> {
        self.lesson.as_ref()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn questions(&self) -> &[ActiveQuestion] {
        &self.questions
    }

    /// Verdict recorded for the current question, if it was submitted.
    pub fn current_outcome(&self) -> Option<Outcome> {
        self.outcomes.get(self.current_index).copied().flatten()
    }

    /// Load `lesson` from the repository and begin a fresh pass over it.
    ///
    /// Any previous session is discarded, whatever state it was in.
    pub fn start(&mut self, lesson: &LessonPath) -> Result<(), QuizError> {
        let source = self.repository.questions(lesson)?;
        if source.is_empty() {
            debug!(session = %self.id, %lesson, "lesson has no questions");
            return Err(QuizError::EmptyQuestionSet);
        }

        let questions = prepare(source, &mut self.rng);
        let total = questions.len();

        self.lesson = Some(lesson.clone());
        self.outcomes = vec![None; total];
        self.questions = questions;
        self.current_index = 0;
        self.score = 0;
        self.started_at = Some(Instant::now());
        self.completed_at = None;
        self.state = SessionState::InProgress;

        info!(session = %self.id, %lesson, questions = total, "quiz started");
        Ok(())
    }

    /// Start the same lesson again from its unshuffled source.
    pub fn restart(&mut self) -> Result<(), QuizError> {
        if self.state == SessionState::Idle {
            return Err(QuizError::NotStarted);
        }
        let lesson = self.lesson.clone().ok_or(QuizError::NotStarted)?;
        debug!(session = %self.id, %lesson, "restarting");
        self.start(&lesson)
    }

    pub fn current_question(&self) -> Result<&ActiveQuestion, QuizError> {
        match self.state {
            SessionState::Idle => Err(QuizError::NotStarted),
            SessionState::Complete => Err(QuizError::SessionComplete),
            SessionState::InProgress => self
                .questions
                .get(self.current_index)
                .ok_or(QuizError::SessionComplete),
        }
    }

    /// Check `answer` against the current question.
    ///
    /// A rejected answer leaves the session untouched. Submitting again for
    /// the same question is allowed; the newer verdict replaces the older one
    /// so a question is never counted twice.
    pub fn submit(&mut self, answer: Answer) -> Result<Feedback, QuizError> {
        let question = self.current_question()?;

        let (outcome, feedback) = match (&question.key, answer) {
            (
                AnswerKey::Choice {
                    options,
                    correct_index,
                    explanation,
                },
                answer,
            ) => {
                let selected = match answer {
                    Answer::Choice(Some(selected)) => selected,
                    Answer::Choice(None) | Answer::Text(_) => return Err(QuizError::NoSelection),
                };
                if selected >= options.len() {
                    return Err(QuizError::InvalidOption(selected));
                }

                let correct = selected == *correct_index;
                let feedback = Feedback::Graded {
                    correct,
                    correct_option: question.correct_option().unwrap_or_default().to_string(),
                    explanation: explanation.clone(),
                };
                let outcome = if correct {
                    Outcome::Correct
                } else {
                    Outcome::Incorrect
                };
                (outcome, feedback)
            }
            (AnswerKey::Open { sample_answer }, answer) => {
                let blank = match &answer {
                    Answer::Text(text) => text.trim().is_empty(),
                    Answer::Choice(_) => true,
                };
                if blank {
                    return Err(QuizError::EmptyAnswer);
                }
                let feedback = Feedback::Ungraded {
                    sample_answer: sample_answer.clone(),
                };
                (Outcome::Ungraded, feedback)
            }
        };

        let previous = self.outcomes[self.current_index].replace(outcome);
        if previous == Some(Outcome::Correct) {
            self.score -= 1;
        }
        if outcome == Outcome::Correct {
            self.score += 1;
        }

        debug!(
            session = %self.id,
            index = self.current_index,
            ?outcome,
            score = self.score,
            "answer submitted"
        );
        Ok(feedback)
    }

    /// Move past the current question, completing the session after the last.
    pub fn advance(&mut self) -> Result<(), QuizError> {
        self.require_in_progress()?;

        self.current_index += 1;
        if self.current_index >= self.questions.len() {
            self.complete();
        }
        Ok(())
    }

    /// End the session now. Questions not yet answered count as incorrect.
    ///
    /// A current question that already has a verdict counts as passed, so
    /// `score <= current_index` holds once the session is complete.
    pub fn finish(&mut self) -> Result<(), QuizError> {
        self.require_in_progress()?;
        if self.outcomes[self.current_index].is_some() {
            self.current_index += 1;
        }
        info!(
            session = %self.id,
            answered_up_to = self.current_index,
            total = self.questions.len(),
            "quiz finished early"
        );
        self.complete();
        Ok(())
    }

    pub fn results(&self) -> Result<QuizResults, QuizError> {
        match self.state {
            SessionState::Idle => return Err(QuizError::NotStarted),
            SessionState::InProgress => return Err(QuizError::NotComplete),
            SessionState::Complete => {}
        }

        let total = self.questions.len();
        let score_percent = score_percent(self.score, total)?;
        let elapsed = match (self.started_at, self.completed_at) {
            (Some(started), Some(completed)) => completed.saturating_duration_since(started),
            _ => Duration::ZERO,
        };

        Ok(QuizResults {
            score_percent,
            correct: self.score,
            incorrect: total - self.score,
            elapsed,
            outcomes: self
                .outcomes
                .iter()
                .map(|o| o.unwrap_or(Outcome::Unanswered))
                .collect(),
        })
    }

    fn require_in_progress(&self) -> Result<(), QuizError> {
        match self.state {
            SessionState::Idle => Err(QuizError::NotStarted),
            SessionState::Complete => Err(QuizError::SessionComplete),
            SessionState::InProgress => Ok(()),
        }
    }

    fn complete(&mut self) {
        self.state = SessionState::Complete;
        self.completed_at = Some(Instant::now());
        info!(
            session = %self.id,
            score = self.score,
            total = self.questions.len(),
            "quiz complete"
        );
    }
}

/// Session-local copies of `source`: question order shuffled, then each
/// choice question's options shuffled with the correct index remapped.
fn prepare(source: &[Question], rng: &mut StdRng) -> Vec<ActiveQuestion> {
    let mut questions: Vec<ActiveQuestion> = source
        .iter()
        .map(|q| ActiveQuestion {
            text: q.text().to_string(),
            kind: q.kind(),
            key: q.answer_key(),
        })
        .collect();
    shuffle(&mut questions, rng);

    for question in &mut questions {
        if let AnswerKey::Choice {
            options,
            correct_index,
            ..
        } = &mut question.key
        {
            let (shuffled, remapped) = shuffle_options(options, *correct_index, rng);
            *options = shuffled;
            *correct_index = remapped;
        }
    }

    questions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::*;
    use crate::models::{QuestionKind, TRUE_LABEL};

    fn session_over(questions: Vec<Question>, seed: u64) -> QuizSession {
        let repo = Arc::new(repository(vec![lesson("Lesson 1", questions)]));
        let mut session = QuizSession::with_seed(repo, seed);
        session.start(&path("Lesson 1")).unwrap();
        session
    }

    fn four_choice_questions() -> Vec<Question> {
        vec![
            choice("Q1", &["a", "b", "c", "d"], 0),
            choice("Q2", &["e", "f", "g", "h"], 1),
            choice("Q3", &["i", "j", "k", "l"], 2),
            choice("Q4", &["m", "n", "o", "p"], 3),
        ]
    }

    fn correct_choice(session: &QuizSession) -> usize {
        session.current_question().unwrap().correct_index().unwrap()
    }

    fn wrong_choice(session: &QuizSession) -> usize {
        let correct = correct_choice(session);
        (correct + 1) % session.current_question().unwrap().options().len()
    }

    fn assert_score_bound(session: &QuizSession) {
        assert!(session.score() <= session.current_index());
        assert!(session.current_index() <= session.total_questions());
    }

    #[test]
    fn three_of_four_scores_seventy_five() {
        let mut session = session_over(four_choice_questions(), 42);

        for round in 0..4 {
            let pick = if round == 2 {
                wrong_choice(&session)
            } else {
                correct_choice(&session)
            };
            session.submit(Answer::Choice(Some(pick))).unwrap();
            session.advance().unwrap();
            assert_score_bound(&session);
        }

        assert_eq!(session.state(), SessionState::Complete);
        let results = session.results().unwrap();
        assert_eq!(results.score_percent, 75);
        assert_eq!(results.correct, 3);
        assert_eq!(results.incorrect, 1);
        assert_eq!(results.total(), 4);
    }

    #[test]
    fn short_answer_is_never_graded() {
        let mut session = session_over(vec![short("Explain tides.", "The moon pulls water.")], 1);

        assert_eq!(
            session.submit(Answer::Text(String::new())),
            Err(QuizError::EmptyAnswer)
        );
        assert_eq!(
            session.submit(Answer::Text("   ".to_string())),
            Err(QuizError::EmptyAnswer)
        );

        let feedback = session.submit(Answer::Text("my answer".to_string())).unwrap();
        assert_eq!(
            feedback,
            Feedback::Ungraded {
                sample_answer: "The moon pulls water.".to_string()
            }
        );
        assert_eq!(session.score(), 0);

        session.advance().unwrap();
        let results = session.results().unwrap();
        assert_eq!(results.score_percent, 0);
        assert_eq!(results.correct, 0);
        assert_eq!(results.incorrect, 1);
        assert_eq!(results.outcomes, vec![Outcome::Ungraded]);
    }

    #[test]
    fn finish_early_counts_unanswered_as_incorrect() {
        let questions = (0..5)
            .map(|i| choice(&format!("Q{}", i), &["yes", "no"], 0))
            .collect();
        let mut session = session_over(questions, 9);

        session
            .submit(Answer::Choice(Some(correct_choice(&session))))
            .unwrap();
        session.advance().unwrap();
        assert_eq!(session.current_index(), 1);

        session.finish().unwrap();
        assert_eq!(session.state(), SessionState::Complete);
        assert_score_bound(&session);

        let results = session.results().unwrap();
        assert_eq!(results.correct, 1);
        assert_eq!(results.incorrect, 4);
        assert_eq!(results.score_percent, 20);
        assert_eq!(
            results
                .outcomes
                .iter()
                .filter(|o| **o == Outcome::Unanswered)
                .count(),
            4
        );
    }

    #[test]
    fn finishing_on_an_answered_question_keeps_score_within_index() {
        let mut session = session_over(four_choice_questions(), 13);
        session
            .submit(Answer::Choice(Some(correct_choice(&session))))
            .unwrap();
        assert_eq!(session.score(), 1);
        assert_eq!(session.current_index(), 0);

        session.finish().unwrap();
        assert_score_bound(&session);
        assert_eq!(session.current_index(), 1);

        let results = session.results().unwrap();
        assert_eq!(results.correct, 1);
        assert_eq!(results.incorrect, 3);
        assert_eq!(results.score_percent, 25);
        assert_eq!(results.outcomes[0], Outcome::Correct);
    }

    #[test]
    fn finishing_on_an_unanswered_question_leaves_index_alone() {
        let mut session = session_over(four_choice_questions(), 14);
        session.advance().unwrap();
        session.finish().unwrap();
        assert_score_bound(&session);
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.results().unwrap().correct, 0);
    }

    #[test]
    fn results_require_completion() {
        let mut session = session_over(four_choice_questions(), 5);
        assert_eq!(session.results(), Err(QuizError::NotComplete));

        for _ in 0..3 {
            session.advance().unwrap();
            assert_eq!(session.results(), Err(QuizError::NotComplete));
        }
        session.advance().unwrap();

        let results = session.results().unwrap();
        assert!(results.score_percent <= 100);
        assert_eq!(results.incorrect, 4);
    }

    #[test]
    fn missing_input_is_rejected_without_changing_state() {
        let mut session = session_over(four_choice_questions(), 3);

        assert_eq!(
            session.submit(Answer::Choice(None)),
            Err(QuizError::NoSelection)
        );
        assert_eq!(
            session.submit(Answer::Text("b".to_string())),
            Err(QuizError::NoSelection)
        );
        assert_eq!(
            session.submit(Answer::Choice(Some(4))),
            Err(QuizError::InvalidOption(4))
        );
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.score(), 0);
        assert_eq!(session.current_outcome(), None);
    }

    #[test]
    fn graded_feedback_names_the_correct_option() {
        let mut session = session_over(vec![choice("Capital?", &["Rome", "Oslo"], 1)], 8);
        let wrong = wrong_choice(&session);

        let feedback = session.submit(Answer::Choice(Some(wrong))).unwrap();
        assert_eq!(
            feedback,
            Feedback::Graded {
                correct: false,
                correct_option: "Oslo".to_string(),
                explanation: "Capital? explained".to_string(),
            }
        );
        assert_eq!(session.current_outcome(), Some(Outcome::Incorrect));
    }

    #[test]
    fn resubmitting_does_not_count_twice() {
        let mut session = session_over(four_choice_questions(), 21);
        let right = correct_choice(&session);
        let wrong = wrong_choice(&session);

        session.submit(Answer::Choice(Some(right))).unwrap();
        session.submit(Answer::Choice(Some(right))).unwrap();
        assert_eq!(session.score(), 1);

        session.submit(Answer::Choice(Some(wrong))).unwrap();
        assert_eq!(session.score(), 0);

        session.submit(Answer::Choice(Some(right))).unwrap();
        session.advance().unwrap();
        assert_score_bound(&session);
        assert_eq!(session.score(), 1);
    }

    #[test]
    fn true_false_is_graded_against_two_options() {
        let question = Question::TrueFalse {
            text: "Rust has a garbage collector.".to_string(),
            correct_answer: false,
            explanation: "It uses ownership.".to_string(),
        };
        let mut session = session_over(vec![question], 17);

        let current = session.current_question().unwrap();
        assert_eq!(current.kind, QuestionKind::TrueFalse);
        assert_eq!(current.options().len(), 2);
        assert_eq!(current.correct_option(), Some("False"));

        let true_index = current
            .options()
            .iter()
            .position(|o| o == TRUE_LABEL)
            .unwrap();
        let feedback = session.submit(Answer::Choice(Some(true_index))).unwrap();
        assert!(matches!(feedback, Feedback::Graded { correct: false, .. }));
    }

    #[test]
    fn option_shuffle_never_touches_the_repository() {
        let questions = four_choice_questions();
        let repo = Arc::new(repository(vec![lesson("Lesson 1", questions.clone())]));

        for seed in 0..20 {
            let mut session = QuizSession::with_seed(Arc::clone(&repo), seed);
            session.start(&path("Lesson 1")).unwrap();

            for active in session.questions() {
                let authored = questions.iter().find(|q| q.text() == active.text).unwrap();
                let expected = match authored.answer_key() {
                    AnswerKey::Choice {
                        options,
                        correct_index,
                        ..
                    } => options[correct_index].clone(),
                    AnswerKey::Open { .. } => unreachable!(),
                };
                assert_eq!(active.correct_option(), Some(expected.as_str()));
            }
        }

        assert_eq!(repo.questions(&path("Lesson 1")).unwrap(), questions.as_slice());
    }

    #[test]
    fn restart_reshuffles_from_the_source() {
        let questions: Vec<Question> = (0..6)
            .map(|i| short(&format!("Q{}", i), "sample"))
            .collect();
        let mut session = session_over(questions, 1234);

        let order = |session: &QuizSession| -> Vec<String> {
            session.questions().iter().map(|q| q.text.clone()).collect()
        };

        let first = order(&session);
        let mut saw_different = false;
        for _ in 0..20 {
            session.restart().unwrap();
            assert_eq!(session.state(), SessionState::InProgress);
            assert_eq!(session.current_index(), 0);
            assert_eq!(session.score(), 0);

            let mut current = order(&session);
            if current != first {
                saw_different = true;
            }
            current.sort();
            assert_eq!(current, (0..6).map(|i| format!("Q{}", i)).collect::<Vec<_>>());
        }
        assert!(saw_different, "twenty restarts never changed the order");
    }

    #[test]
    fn restart_from_complete_resets_progress() {
        let mut session = session_over(four_choice_questions(), 77);
        session
            .submit(Answer::Choice(Some(correct_choice(&session))))
            .unwrap();
        session.finish().unwrap();
        assert_score_bound(&session);
        assert_eq!(session.results().unwrap().correct, 1);

        session.restart().unwrap();
        assert_eq!(session.state(), SessionState::InProgress);
        assert_eq!(session.score(), 0);
        assert_eq!(session.results(), Err(QuizError::NotComplete));
    }

    #[test]
    fn wrong_state_transitions_are_rejected() {
        let repo = Arc::new(repository(vec![
            lesson("Lesson 1", four_choice_questions()),
            lesson("Empty", vec![]),
        ]));
        let mut session = QuizSession::with_seed(repo, 2);

        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.current_question(), Err(QuizError::NotStarted));
        assert_eq!(session.advance(), Err(QuizError::NotStarted));
        assert_eq!(session.finish(), Err(QuizError::NotStarted));
        assert_eq!(session.restart(), Err(QuizError::NotStarted));
        assert_eq!(session.results(), Err(QuizError::NotStarted));

        assert_eq!(
            session.start(&path("Empty")),
            Err(QuizError::EmptyQuestionSet)
        );
        assert!(matches!(
            session.start(&path("Missing")),
            Err(QuizError::NotFound(_))
        ));
        assert_eq!(session.state(), SessionState::Idle);

        session.start(&path("Lesson 1")).unwrap();
        session.finish().unwrap();
        assert_score_bound(&session);
        assert_eq!(session.current_question(), Err(QuizError::SessionComplete));
        assert_eq!(session.advance(), Err(QuizError::SessionComplete));
        assert_eq!(session.finish(), Err(QuizError::SessionComplete));
        assert_eq!(
            session.submit(Answer::Choice(Some(0))),
            Err(QuizError::SessionComplete)
        );
    }

    #[test]
    fn elapsed_time_is_measured_from_start_to_completion() {
        let mut session = session_over(vec![short("q", "a")], 4);
        session.finish().unwrap();
        assert_score_bound(&session);
        let results = session.results().unwrap();
        assert!(results.elapsed < Duration::from_secs(5));
        assert_eq!(results.elapsed_seconds(), results.elapsed.as_secs());
    }

    #[test]
    fn percent_rounds_half_up() {
        assert_eq!(score_percent(1, 8), Ok(13));
        assert_eq!(score_percent(1, 3), Ok(33));
        assert_eq!(score_percent(2, 3), Ok(67));
        assert_eq!(score_percent(0, 7), Ok(0));
        assert_eq!(score_percent(7, 7), Ok(100));
        assert_eq!(score_percent(0, 0), Err(QuizError::DivisionByZero));
    }
}
