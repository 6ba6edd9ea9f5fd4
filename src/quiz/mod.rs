//! The quiz core: selection over the question bank, shuffling, and the
//! session state machine.

mod selection;
mod session;
mod shuffle;

pub use selection::{ChoiceEntry, Level, SelectionPath, child_options};
pub use session::{Answer, Feedback, Outcome, QuizResults, QuizSession, SessionState, score_percent};
pub use shuffle::{shuffle, shuffle_options};
