use serde::{Deserialize, Serialize};

/// Labels of the two options every true/false question offers.
pub const TRUE_LABEL: &str = "True";
pub const FALSE_LABEL: &str = "False";

/// A question as authored in the question bank.
///
/// Each variant carries exactly the answer data its kind needs, so a
/// multiple-choice question can never hold a sample answer and a short-answer
/// question can never hold options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum Question {
    #[serde(rename = "multiple")]
    MultipleChoice {
        #[serde(rename = "question")]
        text: String,
        options: Vec<String>,
        correct_answer: usize,
        #[serde(default)]
        explanation: String,
    },
    #[serde(rename = "true-false")]
    TrueFalse {
        #[serde(rename = "question")]
        text: String,
        correct_answer: bool,
        #[serde(default)]
        explanation: String,
    },
    #[serde(rename = "short")]
    ShortAnswer {
        #[serde(rename = "question")]
        text: String,
        sample_answer: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    MultipleChoice,
    TrueFalse,
    ShortAnswer,
}

impl Question {
    pub fn text(&self) -> &str {
        match self {
            Question::MultipleChoice { text, .. }
            | Question::TrueFalse { text, .. }
            | Question::ShortAnswer { text, .. } => text,
        }
    }

    pub fn kind(&self) -> QuestionKind {
        match self {
            Question::MultipleChoice { .. } => QuestionKind::MultipleChoice,
            Question::TrueFalse { .. } => QuestionKind::TrueFalse,
            Question::ShortAnswer { .. } => QuestionKind::ShortAnswer,
        }
    }

    /// The answer key in its authored order, before any shuffling.
    ///
    /// True/false questions expand into the two-option set `True`, `False`.
    pub fn answer_key(&self) -> AnswerKey {
        match self {
            Question::MultipleChoice {
                options,
                correct_answer,
                explanation,
                ..
            } => AnswerKey::Choice {
                options: options.clone(),
                correct_index: *correct_answer,
                explanation: explanation.clone(),
            },
            Question::TrueFalse {
                correct_answer,
                explanation,
                ..
            } => AnswerKey::Choice {
                options: vec![TRUE_LABEL.to_string(), FALSE_LABEL.to_string()],
                correct_index: if *correct_answer { 0 } else { 1 },
                explanation: explanation.clone(),
            },
            Question::ShortAnswer { sample_answer, .. } => AnswerKey::Open {
                sample_answer: sample_answer.clone(),
            },
        }
    }
}

/// How a question is answered and checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerKey {
    /// Pick one of `options`; `options[correct_index]` is right.
    Choice {
        options: Vec<String>,
        correct_index: usize,
        explanation: String,
    },
    /// Free text compared by the learner against `sample_answer`.
    Open { sample_answer: String },
}

/// A question as shown during one session.
///
/// This is always a copy: option order and `correct_index` are fixed when
/// the session loads and the repository's question is left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveQuestion {
    pub text: String,
    pub kind: QuestionKind,
    pub key: AnswerKey,
}

impl ActiveQuestion {
    /// Options to choose from; empty for short-answer questions.
    pub fn options(&self) -> &[String] {
        match &self.key {
            AnswerKey::Choice { options, .. } => options,
            AnswerKey::Open { .. } => &[],
        }
    }

    pub fn correct_index(&self) -> Option<usize> {
        match &self.key {
            AnswerKey::Choice { correct_index, .. } => Some(*correct_index),
            AnswerKey::Open { .. } => None,
        }
    }

    pub fn correct_option(&self) -> Option<&str> {
        match &self.key {
            AnswerKey::Choice {
                options,
                correct_index,
                ..
            } => options.get(*correct_index).map(String::as_str),
            AnswerKey::Open { .. } => None,
        }
    }
}
