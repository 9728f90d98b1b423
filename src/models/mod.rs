mod question;

pub use question::{Category, Question};

/// Which screen the application is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppState {
    /// Choosing mode, categories and question count.
    #[default]
    Setup,
    /// Answering questions.
    Quiz,
    /// Reviewing a finished session.
    Result,
    /// Reading every question in the bank.
    Browse,
}
