use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::{Category, Question};

pub const DEFAULT_QUESTIONS_PATH: &str = "questions.json";

/// Errors raised while reading or validating a question bank.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed question bank: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("question bank must contain at least one question")]
    Empty,
    #[error("question {index} must have at least two options")]
    TooFewOptions { index: usize },
    #[error("question {index} has no answer key")]
    MissingAnswer { index: usize },
    #[error("question {index} marks option {correct} correct but only has {options} options")]
    AnswerOutOfRange {
        index: usize,
        correct: usize,
        options: usize,
    },
    #[error("question {index} names \"{answer}\" as correct, which is not one of its options")]
    UnknownAnswer { index: usize, answer: String },
    #[error("category id \"{0}\" is listed more than once")]
    DuplicateCategory(String),
}

#[derive(Deserialize)]
struct BankDocument {
    questions: Vec<QuestionRecord>,
    categories: Vec<CategoryRecord>,
}

#[derive(Deserialize)]
struct QuestionRecord {
    question: String,
    options: Vec<String>,
    #[serde(default)]
    correct: Option<AnswerKey>,
    #[serde(default)]
    correct_answer: Option<AnswerKey>,
    category: String,
}

#[derive(Deserialize)]
struct CategoryRecord {
    id: String,
    name: String,
}

/// Banks in the wild mark the answer either by position or by repeating the
/// option text.
#[derive(Deserialize)]
#[serde(untagged)]
enum AnswerKey {
    Index(usize),
    Text(String),
}

/// The full set of questions and categories, fixed after loading.
#[derive(Debug, Clone)]
pub struct Bank {
    questions: Vec<Question>,
    categories: Vec<Category>,
}

impl Bank {
    /// Build a bank from already validated parts.
    pub fn new(questions: Vec<Question>, categories: Vec<Category>) -> Self {
        Self {
            questions,
            categories,
        }
    }

    /// Parse and validate a bank document held in memory.
    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        let document: BankDocument = serde_json::from_str(json)?;
        document.into_bank()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Display name for a category id, falling back to the id itself.
    pub fn category_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.categories
            .iter()
            .find(|c| c.id == id)
            .map_or(id, |c| c.name.as_str())
    }

    /// Questions belonging to one category, in bank order.
    pub fn questions_in<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Question> + 'a {
        self.questions.iter().filter(move |q| q.category == id)
    }
}

impl BankDocument {
    fn into_bank(self) -> Result<Bank, LoadError> {
        if self.questions.is_empty() {
            return Err(LoadError::Empty);
        }

        let mut seen = HashSet::new();
        for category in &self.categories {
            if !seen.insert(category.id.as_str()) {
                return Err(LoadError::DuplicateCategory(category.id.clone()));
            }
        }

        let questions = self
            .questions
            .into_iter()
            .enumerate()
            .map(|(index, record)| record.normalize(index))
            .collect::<Result<Vec<_>, _>>()?;

        let categories = self
            .categories
            .into_iter()
            .map(|c| Category {
                id: c.id,
                name: c.name,
            })
            .collect();

        Ok(Bank::new(questions, categories))
    }
}

impl QuestionRecord {
    fn normalize(self, index: usize) -> Result<Question, LoadError> {
        if self.options.len() < 2 {
            return Err(LoadError::TooFewOptions { index });
        }

        let key = self
            .correct
            .or(self.correct_answer)
            .ok_or(LoadError::MissingAnswer { index })?;

        let correct = match key {
            AnswerKey::Index(correct) if correct < self.options.len() => correct,
            AnswerKey::Index(correct) => {
                return Err(LoadError::AnswerOutOfRange {
                    index,
                    correct,
                    options: self.options.len(),
                });
            }
            AnswerKey::Text(answer) => {
                let position = self.options.iter().position(|o| *o == answer);
                match position {
                    Some(position) => {
                        debug!(index, position, "resolved text answer key");
                        position
                    }
                    None => return Err(LoadError::UnknownAnswer { index, answer }),
                }
            }
        };

        Ok(Question {
            prompt: self.question,
            options: self.options,
            correct,
            category: self.category,
        })
    }
}

/// Read and validate a question bank from a JSON file.
pub fn load_questions_from_json<P: AsRef<Path>>(path: P) -> Result<Bank, LoadError> {
    let path = path.as_ref();

    let json_content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let bank = Bank::from_json_str(&json_content)?;
    info!(
        path = %path.display(),
        questions = bank.len(),
        categories = bank.categories().len(),
        "question bank loaded"
    );

    Ok(bank)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BANK: &str = r#"{
        "questions": [
            {"question": "Q1", "options": ["a", "b", "c"], "correct": 2, "category": "x"},
            {"question": "Q2", "options": ["yes", "no"], "correct": "no", "category": "y"},
            {"question": "Q3", "options": ["left", "right"], "correct_answer": "left", "category": "y"},
            {"question": "Q4", "options": ["1", "2", "3", "4"], "correct_answer": 3, "category": "z"}
        ],
        "categories": [
            {"id": "x", "name": "Ex"},
            {"id": "y", "name": "Why"}
        ]
    }"#;

    #[test]
    fn test_load_normalizes_answer_keys() {
        let bank = Bank::from_json_str(BANK).unwrap();
        let correct: Vec<usize> = bank.questions().iter().map(|q| q.correct).collect();
        assert_eq!(correct, vec![2, 1, 0, 3]);
        assert_eq!(bank.categories().len(), 2);
    }

    #[test]
    fn test_category_name_falls_back_to_id() {
        let bank = Bank::from_json_str(BANK).unwrap();
        assert_eq!(bank.category_name("y"), "Why");
        assert_eq!(bank.category_name("z"), "z");
        assert_eq!(bank.questions_in("y").count(), 2);
    }

    #[test]
    fn test_rejects_empty_bank() {
        let err = Bank::from_json_str(r#"{"questions": [], "categories": []}"#).unwrap_err();
        assert!(matches!(err, LoadError::Empty));
    }

    #[test]
    fn test_rejects_malformed_document() {
        let err = Bank::from_json_str(r#"{"questions": 3}"#).unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
    }

    #[test]
    fn test_rejects_single_option() {
        let json = r#"{"questions": [{"question": "Q", "options": ["only"], "correct": 0, "category": "x"}], "categories": []}"#;
        let err = Bank::from_json_str(json).unwrap_err();
        assert!(matches!(err, LoadError::TooFewOptions { index: 0 }));
    }

    #[test]
    fn test_rejects_out_of_range_index() {
        let json = r#"{"questions": [{"question": "Q", "options": ["a", "b"], "correct": 2, "category": "x"}], "categories": []}"#;
        let err = Bank::from_json_str(json).unwrap_err();
        assert!(matches!(
            err,
            LoadError::AnswerOutOfRange {
                index: 0,
                correct: 2,
                options: 2
            }
        ));
    }

    #[test]
    fn test_rejects_unknown_text_answer() {
        let json = r#"{"questions": [{"question": "Q", "options": ["a", "b"], "correct": "c", "category": "x"}], "categories": []}"#;
        let err = Bank::from_json_str(json).unwrap_err();
        assert!(matches!(err, LoadError::UnknownAnswer { index: 0, .. }));
    }

    #[test]
    fn test_rejects_missing_answer() {
        let json = r#"{"questions": [{"question": "Q", "options": ["a", "b"], "category": "x"}], "categories": []}"#;
        let err = Bank::from_json_str(json).unwrap_err();
        assert!(matches!(err, LoadError::MissingAnswer { index: 0 }));
    }

    #[test]
    fn test_rejects_duplicate_category() {
        let json = r#"{
            "questions": [{"question": "Q", "options": ["a", "b"], "correct": 0, "category": "x"}],
            "categories": [{"id": "x", "name": "X"}, {"id": "x", "name": "Again"}]
        }"#;
        let err = Bank::from_json_str(json).unwrap_err();
        assert!(matches!(err, LoadError::DuplicateCategory(id) if id == "x"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_questions_from_json("does/not/exist.json").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("does/not/exist.json"));
    }
}
