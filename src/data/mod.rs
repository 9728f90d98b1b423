mod loader;

pub use loader::{Bank, DEFAULT_QUESTIONS_PATH, LoadError, load_questions_from_json};
