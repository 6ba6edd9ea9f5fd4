//! Cascading subject → semester → unit → lesson selection.

use crate::error::QuizError;
use crate::models::{LessonPath, QuestionRepository};

/// One level of the selection path, leftmost first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Subject,
    Semester,
    Unit,
    Lesson,
}

impl Level {
    pub const ALL: [Level; 4] = [Level::Subject, Level::Semester, Level::Unit, Level::Lesson];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Level::Subject => "Subject",
            Level::Semester => "Semester",
            Level::Unit => "Unit",
            Level::Lesson => "Lesson",
        }
    }

    pub fn previous(self) -> Option<Level> {
        self.index().checked_sub(1).map(|i| Level::ALL[i])
    }
}

/// A selectable child: the repository key and the name to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceEntry {
    pub key: String,
    pub name: String,
}

impl ChoiceEntry {
    fn new(key: &str, name: &str) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
        }
    }
}

/// The user's current choices. Choosing a level clears every level after it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionPath {
    components: [Option<String>; 4],
}

impl SelectionPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, level: Level) -> Option<&str> {
        self.components[level.index()].as_deref()
    }

    /// Set `level` (or unset it with `None`) and reset all levels to its right.
    pub fn choose(&mut self, level: Level, key: Option<String>) {
        self.components[level.index()] = key;
        self.clear_after(level);
    }

    pub fn clear_after(&mut self, level: Level) {
        for component in &mut self.components[level.index() + 1..] {
            *component = None;
        }
    }

    pub fn clear(&mut self) {
        self.components = Default::default();
    }

    /// The chosen components up to the first unset one.
    pub fn prefix(&self) -> Vec<&str> {
        self.components
            .iter()
            .map_while(|component| component.as_deref())
            .collect()
    }

    /// The first level still waiting for a choice.
    pub fn pending_level(&self) -> Option<Level> {
        Level::ALL.get(self.prefix().len()).copied()
    }

    pub fn lesson_path(&self) -> Option<LessonPath> {
        match self.prefix().as_slice() {
            [subject, semester, unit, lesson] => {
                Some(LessonPath::new(*subject, *semester, *unit, *lesson))
            }
            _ => None,
        }
    }
}

/// The children available under `prefix`, in stored order.
///
/// An empty prefix lists subjects and a full lesson path has no children.
/// Unknown keys are reported as [`QuizError::NotFound`].
pub fn child_options(
    repository: &QuestionRepository,
    prefix: &[&str],
) -> Result<Vec<ChoiceEntry>, QuizError> {
    let entries = match prefix {
        [] => repository
            .subjects
            .iter()
            .map(|s| ChoiceEntry::new(&s.key, &s.name))
            .collect(),
        [subject] => repository
            .subject(subject)?
            .semesters
            .iter()
            .map(|s| ChoiceEntry::new(&s.key, &s.name))
            .collect(),
        [subject, semester] => repository
            .semester(subject, semester)?
            .units
            .iter()
            .map(|u| ChoiceEntry::new(&u.key, &u.name))
            .collect(),
        [subject, semester, unit] => repository
            .unit(subject, semester, unit)?
            .lessons
            .iter()
            .map(|l| ChoiceEntry::new(&l.key, l.display_name()))
            .collect(),
        [subject, semester, unit, lesson] => {
            repository.lesson(&LessonPath::new(*subject, *semester, *unit, *lesson))?;
            Vec::new()
        }
        _ => return Err(QuizError::NotFound(prefix.join("/"))),
    };

    Ok(entries)
}
