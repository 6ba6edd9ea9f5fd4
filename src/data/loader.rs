use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::models::{Question, QuestionRepository};

pub const DEFAULT_QUESTION_BANK_PATH: &str = "question_bank.json";

/// Why a question bank could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("question bank has no subjects")]
    EmptyRepository,

    #[error("duplicate key `{key}` under `{parent}`")]
    DuplicateKey { parent: String, key: String },

    #[error("question {index} in `{lesson}` has no options")]
    EmptyOptions { lesson: String, index: usize },

    #[error("question {index} in `{lesson}` marks option {correct} correct but has {options} options")]
    CorrectAnswerOutOfRange {
        lesson: String,
        index: usize,
        correct: usize,
        options: usize,
    },
}

pub fn load_repository_from_json<P: AsRef<Path>>(path: P) -> Result<QuestionRepository, LoadError> {
    let path = path.as_ref();

    let json_content = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let repository: QuestionRepository =
        serde_json::from_str(&json_content).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    validate(&repository)?;

    debug!(
        path = %path.display(),
        subjects = repository.subjects.len(),
        questions = repository.question_count(),
        "question bank loaded"
    );
    Ok(repository)
}

/// Structural checks only: unique keys at each level and choice questions
/// whose correct answer points at an existing option.
pub fn validate(repository: &QuestionRepository) -> Result<(), LoadError> {
    if repository.subjects.is_empty() {
        return Err(LoadError::EmptyRepository);
    }

    unique_keys("/", repository.subjects.iter().map(|s| s.key.as_str()))?;
    for subject in &repository.subjects {
        unique_keys(&subject.key, subject.semesters.iter().map(|s| s.key.as_str()))?;

        for semester in &subject.semesters {
            let parent = format!("{}/{}", subject.key, semester.key);
            unique_keys(&parent, semester.units.iter().map(|u| u.key.as_str()))?;

            for unit in &semester.units {
                let parent = format!("{}/{}", parent, unit.key);
                unique_keys(&parent, unit.lessons.iter().map(|l| l.key.as_str()))?;

                for lesson in &unit.lessons {
                    let lesson_path = format!("{}/{}", parent, lesson.key);
                    check_questions(&lesson_path, &lesson.questions)?;
                }
            }
        }
    }

    Ok(())
}

fn unique_keys<'a>(parent: &str, keys: impl Iterator<Item = &'a str>) -> Result<(), LoadError> {
    let mut seen = HashSet::new();
    for key in keys {
        if !seen.insert(key) {
            return Err(LoadError::DuplicateKey {
                parent: parent.to_string(),
                key: key.to_string(),
            });
        }
    }
    Ok(())
}

fn check_questions(lesson: &str, questions: &[Question]) -> Result<(), LoadError> {
    for (index, question) in questions.iter().enumerate() {
        if let Question::MultipleChoice {
            options,
            correct_answer,
            ..
        } = question
        {
            if options.is_empty() {
                return Err(LoadError::EmptyOptions {
                    lesson: lesson.to_string(),
                    index,
                });
            }
            if *correct_answer >= options.len() {
                return Err(LoadError::CorrectAnswerOutOfRange {
                    lesson: lesson.to_string(),
                    index,
                    correct: *correct_answer,
                    options: options.len(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::models::LessonPath;

    fn write_bank(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    fn bank_with_lesson(lesson_json: &str) -> String {
        format!(
            r#"{{"subjects": [{{"key": "english", "name": "English", "semesters": [
                {{"key": "s1", "name": "First Semester", "units": [
                    {{"key": "u1", "name": "Unit 1", "lessons": [{}]}}
                ]}}
            ]}}]}}"#,
            lesson_json
        )
    }

    #[test]
    fn loads_a_valid_bank() {
        let file = write_bank(&bank_with_lesson(
            r#"{"key": "Lesson 1", "questions": [
                {"type": "multiple", "question": "Pick b", "options": ["a", "b"], "correctAnswer": 1, "explanation": "b is b"},
                {"type": "short", "question": "Say hi", "sampleAnswer": "hi"}
            ]}"#,
        ));

        let repo = load_repository_from_json(file.path()).unwrap();
        let questions = repo
            .questions(&LessonPath::new("english", "s1", "u1", "Lesson 1"))
            .unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(repo.subjects[0].semesters[0].name, "First Semester");
    }

    #[test]
    fn shipped_bank_is_valid() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_QUESTION_BANK_PATH);
        let repo = load_repository_from_json(path).unwrap();
        assert!(repo.question_count() > 0);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = load_repository_from_json("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, LoadError::Read { .. }));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let file = write_bank("{ not json");
        let err = load_repository_from_json(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
    }

    #[test]
    fn empty_bank_is_rejected() {
        let file = write_bank(r#"{"subjects": []}"#);
        let err = load_repository_from_json(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::EmptyRepository));
    }

    #[test]
    fn duplicate_lesson_keys_are_rejected() {
        let file = write_bank(&bank_with_lesson(
            r#"{"key": "Lesson 1", "questions": []}, {"key": "Lesson 1", "questions": []}"#,
        ));
        let err = load_repository_from_json(file.path()).unwrap_err();
        match err {
            LoadError::DuplicateKey { parent, key } => {
                assert_eq!(parent, "english/s1/u1");
                assert_eq!(key, "Lesson 1");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn correct_answer_must_exist() {
        let file = write_bank(&bank_with_lesson(
            r#"{"key": "Lesson 1", "questions": [
                {"type": "multiple", "question": "?", "options": ["a"], "correctAnswer": 3}
            ]}"#,
        ));
        let err = load_repository_from_json(file.path()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::CorrectAnswerOutOfRange {
                correct: 3,
                options: 1,
                ..
            }
        ));
    }

    #[test]
    fn choice_questions_need_options() {
        let file = write_bank(&bank_with_lesson(
            r#"{"key": "Lesson 1", "questions": [
                {"type": "multiple", "question": "?", "options": [], "correctAnswer": 0}
            ]}"#,
        ));
        let err = load_repository_from_json(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::EmptyOptions { index: 0, .. }));
    }
}
