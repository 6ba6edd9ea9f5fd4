//! The question bank: subject → semester → unit → lesson → questions.
//!
//! Every level is an ordered list of nodes with a unique `key` and a display
//! `name`. The repository is read-only once loaded and is shared by reference
//! counting between the selection resolver and the quiz session.

use serde::{Deserialize, Serialize};

use super::Question;
use crate::error::QuizError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRepository {
    pub subjects: Vec<Subject>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub semesters: Vec<Semester>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Semester {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub units: Vec<Unit>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub key: String,
    /// Lessons are listed by key unless a separate name is given.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl Lesson {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.key)
    }
}

/// Fully resolved address of one lesson.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LessonPath {
    pub subject: String,
    pub semester: String,
    pub unit: String,
    pub lesson: String,
}

impl LessonPath {
    pub fn new(
        subject: impl Into<String>,
        semester: impl Into<String>,
        unit: impl Into<String>,
        lesson: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            semester: semester.into(),
            unit: unit.into(),
            lesson: lesson.into(),
        }
    }
}

impl std::fmt::Display for LessonPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.subject, self.semester, self.unit, self.lesson
        )
    }
}

fn not_found(path: &[&str]) -> QuizError {
    QuizError::NotFound(path.join("/"))
}

impl QuestionRepository {
    pub fn new(subjects: Vec<Subject>) -> Self {
        Self { subjects }
    }

    pub fn subject(&self, subject: &str) -> Result<&Subject, QuizError> {
        self.subjects
            .iter()
            .find(|s| s.key == subject)
            .ok_or_else(|| not_found(&[subject]))
    }

    pub fn semester(&self, subject: &str, semester: &str) -> Result<&Semester, QuizError> {
        self.subject(subject)?
            .semesters
            .iter()
            .find(|s| s.key == semester)
            .ok_or_else(|| not_found(&[subject, semester]))
    }

    pub fn unit(&self, subject: &str, semester: &str, unit: &str) -> Result<&Unit, QuizError> {
        self.semester(subject, semester)?
            .units
            .iter()
            .find(|u| u.key == unit)
            .ok_or_else(|| not_found(&[subject, semester, unit]))
    }

    pub fn lesson(&self, path: &LessonPath) -> Result<&Lesson, QuizError> {
        self.unit(&path.subject, &path.semester, &path.unit)?
            .lessons
            .iter()
            .find(|l| l.key == path.lesson)
            .ok_or_else(|| QuizError::NotFound(path.to_string()))
    }

    /// The lesson's questions in authored order.
    pub fn questions(&self, path: &LessonPath) -> Result<&[Question], QuizError> {
        Ok(&self.lesson(path)?.questions)
    }

    pub fn question_count(&self) -> usize {
        self.subjects
            .iter()
            .flat_map(|s| &s.semesters)
            .flat_map(|s| &s.units)
            .flat_map(|u| &u.lessons)
            .map(|l| l.questions.len())
            .sum()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn choice(text: &str, options: &[&str], correct: usize) -> Question {
        Question::MultipleChoice {
            text: text.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            correct_answer: correct,
            explanation: format!("{} explained", text),
        }
    }

    pub fn short(text: &str, sample: &str) -> Question {
        Question::ShortAnswer {
            text: text.to_string(),
            sample_answer: sample.to_string(),
        }
    }

    pub fn lesson(key: &str, questions: Vec<Question>) -> Lesson {
        Lesson {
            key: key.to_string(),
            name: None,
            questions,
        }
    }

    /// One subject, one semester, one unit holding the given lessons.
    pub fn repository(lessons: Vec<Lesson>) -> QuestionRepository {
        QuestionRepository::new(vec![Subject {
            key: "english".to_string(),
            name: "English".to_string(),
            semesters: vec![Semester {
                key: "s1".to_string(),
                name: "First Semester".to_string(),
                units: vec![Unit {
                    key: "u1".to_string(),
                    name: "Unit 1".to_string(),
                    lessons,
                }],
            }],
        }])
    }

    pub fn path(lesson: &str) -> LessonPath {
        LessonPath::new("english", "s1", "u1", lesson)
    }
}
