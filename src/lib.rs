//! # quiz-prep
//!
//! A terminal practice-quiz library: load a question bank, pick a mode and a
//! question count, answer one question at a time, then review the results
//! and retake the ones you missed.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use quiz_prep::{Quiz, QuizError, Settings};
//!
//! fn main() -> Result<(), QuizError> {
//!     // Load questions from a JSON file
//!     let quiz = Quiz::from_json("questions.json", Settings::default())?;
//!
//!     // Run the quiz in the terminal
//!     quiz.run()?;
//!
//!     Ok(())
//! }
//! ```

mod app;
mod data;
pub mod logging;
mod models;
pub mod quiz;
pub mod terminal;
mod ui;

use std::io;
use std::path::Path;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use thiserror::Error;
use tracing::{error, info};

use crate::quiz::QuizMode;

pub use app::{Action, App, BrowseRow, Settings};
pub use data::{Bank, DEFAULT_QUESTIONS_PATH, LoadError, load_questions_from_json};
pub use models::{AppState, Category, Question};

/// Error type for quiz operations.
#[derive(Debug, Error)]
pub enum QuizError {
    /// Error loading questions from file.
    #[error("Failed to load questions: {0}")]
    Load(#[from] LoadError),
    /// IO error during quiz execution.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// A quiz instance that can be run in the terminal.
pub struct Quiz {
    app: App,
}

impl Quiz {
    /// Create a new quiz over a loaded bank.
    pub fn new(bank: Bank, settings: Settings) -> Self {
        Self {
            app: App::new(bank, settings),
        }
    }

    /// Load a quiz from a JSON file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the JSON file containing the question bank.
    /// * `settings` - Initial question count and option shuffling.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use quiz_prep::{Quiz, Settings};
    ///
    /// let quiz = Quiz::from_json("questions.json", Settings::default()).expect("Failed to load quiz");
    /// ```
    pub fn from_json<P: AsRef<Path>>(path: P, settings: Settings) -> Result<Self, QuizError> {
        let bank = load_questions_from_json(path)?;
        Ok(Self::new(bank, settings))
    }

    /// Run the quiz in the terminal.
    ///
    /// This will take over the terminal, display the quiz UI, and return
    /// when the user quits.
    pub fn run(mut self) -> Result<(), QuizError> {
        let mut term = terminal::init()?;
        let result = run_event_loop(&mut term, &mut self.app);
        let restored = terminal::restore();
        info!("quiz closed");
        finish(result, restored)
    }

    /// Get a reference to the underlying app for custom handling.
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Get a mutable reference to the underlying app for custom handling.
    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }
}

fn run_event_loop(terminal: &mut terminal::AppTerminal, app: &mut App) -> Result<(), QuizError> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(frame, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            if let Some(action) = key_action(app, key.code) {
                app.update(action);
            }
        }
    }

    Ok(())
}

/// The event loop's error takes precedence over a failed terminal restore,
/// which is still logged.
fn finish(result: Result<(), QuizError>, restored: io::Result<()>) -> Result<(), QuizError> {
    if let Err(err) = &restored {
        error!(%err, "failed to restore terminal");
    }
    result?;
    restored?;
    Ok(())
}

/// Translate a key press into an action for the current screen.
pub fn key_action(app: &App, key: KeyCode) -> Option<Action> {
    if let KeyCode::Char('q') | KeyCode::Char('Q') = key {
        return Some(Action::Quit);
    }

    match app.state {
        AppState::Setup => setup_action(key),
        AppState::Quiz => quiz_action(app, key),
        AppState::Result => result_action(key),
        AppState::Browse => browse_action(key),
    }
}

fn setup_action(key: KeyCode) -> Option<Action> {
    match key {
        KeyCode::Char('a') | KeyCode::Char('1') => Some(Action::SelectMode(QuizMode::All)),
        KeyCode::Char('c') | KeyCode::Char('2') => Some(Action::SelectMode(QuizMode::Category)),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::NextCategory),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::PreviousCategory),
        KeyCode::Char(' ') => Some(Action::ToggleCategoryUnderCursor),
        KeyCode::Right | KeyCode::Char('l') => Some(Action::AdjustCount(1)),
        KeyCode::Left | KeyCode::Char('h') => Some(Action::AdjustCount(-1)),
        KeyCode::PageUp | KeyCode::Char('L') => Some(Action::AdjustCount(5)),
        KeyCode::PageDown | KeyCode::Char('H') => Some(Action::AdjustCount(-5)),
        KeyCode::Char('b') => Some(Action::OpenBrowse),
        KeyCode::Enter => Some(Action::Start),
        _ => None,
    }
}

fn quiz_action(app: &App, key: KeyCode) -> Option<Action> {
    match key {
        KeyCode::Up | KeyCode::Char('k') => Some(Action::HighlightPrevious),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::HighlightNext),
        KeyCode::Enter | KeyCode::Char(' ') => Some(Action::Confirm),
        KeyCode::Char(c @ '1'..='9') => {
            let option = c as usize - '1' as usize;
            let answered = app.session().is_some_and(|s| s.is_current_answered());
            (!answered).then_some(Action::Answer(option))
        }
        KeyCode::Esc | KeyCode::Char('x') => Some(Action::ExitQuiz),
        _ => None,
    }
}

fn result_action(key: KeyCode) -> Option<Action> {
    match key {
        KeyCode::Down | KeyCode::Right | KeyCode::Char('j') | KeyCode::Char('l') => {
            Some(Action::NextResult)
        }
        KeyCode::Up | KeyCode::Left | KeyCode::Char('k') | KeyCode::Char('h') => {
            Some(Action::PreviousResult)
        }
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Action::RetakeIncorrect),
        KeyCode::Char('n') | KeyCode::Enter => Some(Action::NewQuiz),
        _ => None,
    }
}

fn browse_action(key: KeyCode) -> Option<Action> {
    match key {
        KeyCode::Down | KeyCode::Char('j') => Some(Action::BrowseNext),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::BrowsePrevious),
        KeyCode::Enter | KeyCode::Char(' ') => Some(Action::ToggleExpanded),
        KeyCode::Esc | KeyCode::Char('b') => Some(Action::CloseBrowse),
        _ => None,
    }
}
