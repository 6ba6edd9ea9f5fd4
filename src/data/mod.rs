mod loader;

pub use loader::{DEFAULT_QUESTION_BANK_PATH, LoadError, load_repository_from_json, validate};
