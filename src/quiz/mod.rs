//! Quiz engine: configuration, session state and results.

mod config;
mod results;
mod session;

pub use config::{Configurator, DEFAULT_QUESTION_COUNT, MAX_QUESTIONS, QuizMode};
pub use results::{
    CategoryScore, ResultsSummary, best_streak, category_breakdown, correct_count,
    incorrect_subset, percentage, retake,
};
pub use session::{Advance, AnswerOutcome, Phase, Session, SessionError};
