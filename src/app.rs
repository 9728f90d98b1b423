use std::collections::HashSet;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::data::Bank;
use crate::models::{AppState, Category};
use crate::quiz::{
    Advance, AnswerOutcome, Configurator, DEFAULT_QUESTION_COUNT, QuizMode, ResultsSummary,
    Session, incorrect_subset, retake,
};

/// Options fixed for the lifetime of the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Question count offered on the setup screen.
    pub question_count: usize,
    /// Permute each question's options when a session starts.
    pub shuffle_options: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            question_count: DEFAULT_QUESTION_COUNT,
            shuffle_options: false,
        }
    }
}

/// A user intent, applied with [`App::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SelectMode(QuizMode),
    ToggleCategory(String),
    ToggleCategoryUnderCursor,
    NextCategory,
    PreviousCategory,
    BrowseNext,
    BrowsePrevious,
    AdjustCount(isize),
    Start,
    HighlightNext,
    HighlightPrevious,
    Answer(usize),
    /// Answer the highlighted option, or move on if already answered.
    Confirm,
    Advance,
    ExitQuiz,
    NextResult,
    PreviousResult,
    RetakeIncorrect,
    NewQuiz,
    OpenBrowse,
    CloseBrowse,
    ToggleExpanded,
    Quit,
}

/// A line of the browse list the cursor can rest on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseRow {
    /// Header of the category at this index in the bank.
    Category(usize),
    /// The `position`th question of an expanded category.
    Question { category: usize, position: usize },
}

/// Owns the bank, the configuration and the running session.
pub struct App {
    pub state: AppState,
    pub should_quit: bool,
    bank: Bank,
    settings: Settings,
    configurator: Configurator,
    session: Option<Session>,
    summary: Option<ResultsSummary>,
    category_cursor: usize,
    highlighted: usize,
    result_cursor: usize,
    browse_cursor: usize,
    expanded: HashSet<String>,
    rng: StdRng,
}

impl App {
    pub fn new(bank: Bank, settings: Settings) -> Self {
        Self::with_rng(bank, settings, StdRng::from_os_rng())
    }

    /// Build an app drawing randomness from `rng`.
    pub fn with_rng(bank: Bank, settings: Settings, rng: StdRng) -> Self {
        Self {
            state: AppState::Setup,
            should_quit: false,
            bank,
            settings,
            configurator: Configurator::new(settings.question_count),
            session: None,
            summary: None,
            category_cursor: 0,
            highlighted: 0,
            result_cursor: 0,
            browse_cursor: 0,
            expanded: HashSet::new(),
            rng,
        }
    }

    pub fn bank(&self) -> &Bank {
        &self.bank
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn configurator(&self) -> &Configurator {
        &self.configurator
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn summary(&self) -> Option<&ResultsSummary> {
        self.summary.as_ref()
    }

    pub fn category_cursor(&self) -> usize {
        self.category_cursor
    }

    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    pub fn result_cursor(&self) -> usize {
        self.result_cursor
    }

    pub fn browse_cursor(&self) -> usize {
        self.browse_cursor
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    /// Category headers, each followed by its questions when expanded.
    pub fn browse_rows(&self) -> Vec<BrowseRow> {
        let mut rows = Vec::new();
        for (index, category) in self.bank.categories().iter().enumerate() {
            rows.push(BrowseRow::Category(index));
            if self.is_expanded(&category.id) {
                let count = self.bank.questions_in(&category.id).count();
                rows.extend((0..count).map(|position| BrowseRow::Question {
                    category: index,
                    position,
                }));
            }
        }
        rows
    }

    pub fn question_count(&self) -> usize {
        self.configurator.question_count(self.bank.questions())
    }

    pub fn count_limit(&self) -> usize {
        self.configurator.count_limit(self.bank.questions())
    }

    pub fn max_selectable(&self) -> usize {
        self.configurator.max_selectable(self.bank.questions())
    }

    pub fn can_start(&self) -> bool {
        self.configurator.can_start(self.bank.questions())
    }

    /// Apply one action to the current state.
    pub fn update(&mut self, action: Action) {
        match action {
            Action::SelectMode(mode) => self.select_mode(mode),
            Action::ToggleCategory(id) => self.toggle_category(&id),
            Action::ToggleCategoryUnderCursor => {
                if let Some(id) = self.category_at(self.category_cursor).map(|c| c.id.clone()) {
                    self.toggle_category(&id);
                }
            }
            Action::NextCategory => {
                let len = self.bank.categories().len();
                self.category_cursor = step_forward(self.category_cursor, len);
            }
            Action::PreviousCategory => {
                self.category_cursor = self.category_cursor.saturating_sub(1);
            }
            Action::BrowseNext => {
                let len = self.browse_rows().len();
                self.browse_cursor = step_forward(self.browse_cursor, len);
            }
            Action::BrowsePrevious => {
                self.browse_cursor = self.browse_cursor.saturating_sub(1);
            }
            Action::AdjustCount(delta) => {
                if self.state == AppState::Setup {
                    self.configurator
                        .adjust_question_count(delta, self.bank.questions());
                }
            }
            Action::Start => self.start(),
            Action::HighlightNext => {
                if let Some(session) = &self.session {
                    let options = session.current_question().options.len();
                    self.highlighted = (self.highlighted + 1) % options;
                }
            }
            Action::HighlightPrevious => {
                if let Some(session) = &self.session {
                    let options = session.current_question().options.len();
                    self.highlighted = (self.highlighted + options - 1) % options;
                }
            }
            Action::Answer(option) => self.answer(option),
            Action::Confirm => {
                let answered = self.session.as_ref().is_some_and(Session::is_current_answered);
                if answered {
                    self.advance();
                } else {
                    self.answer(self.highlighted);
                }
            }
            Action::Advance => self.advance(),
            Action::ExitQuiz | Action::NewQuiz => self.back_to_setup(),
            Action::NextResult => {
                let total = self.summary.as_ref().map_or(0, |s| s.total);
                self.result_cursor = step_forward(self.result_cursor, total);
            }
            Action::PreviousResult => {
                self.result_cursor = self.result_cursor.saturating_sub(1);
            }
            Action::RetakeIncorrect => self.retake_incorrect(),
            Action::OpenBrowse => {
                if self.state == AppState::Setup {
                    self.state = AppState::Browse;
                }
            }
            Action::CloseBrowse => {
                if self.state == AppState::Browse {
                    self.state = AppState::Setup;
                }
            }
            Action::ToggleExpanded => self.toggle_expanded(),
            Action::Quit => self.should_quit = true,
        }
    }

    fn category_at(&self, index: usize) -> Option<&Category> {
        self.bank.categories().get(index)
    }

    /// Expand or collapse the category under the cursor. From a question row
    /// this collapses its category and puts the cursor back on the header.
    fn toggle_expanded(&mut self) {
        if self.state != AppState::Browse {
            return;
        }
        let rows = self.browse_rows();
        let Some(row) = rows.get(self.browse_cursor).copied() else {
            return;
        };

        let category = match row {
            BrowseRow::Category(index) => index,
            BrowseRow::Question { category, .. } => category,
        };
        let Some(id) = self.category_at(category).map(|c| c.id.clone()) else {
            return;
        };

        if !self.expanded.remove(&id) {
            self.expanded.insert(id);
        } else if let Some(header) = rows.iter().position(|r| *r == BrowseRow::Category(category)) {
            self.browse_cursor = header;
        }
    }

    fn select_mode(&mut self, mode: QuizMode) {
        if self.state == AppState::Setup {
            self.configurator.select_mode(mode);
        }
    }

    fn toggle_category(&mut self, id: &str) {
        if self.state == AppState::Setup && self.configurator.mode() == Some(QuizMode::Category) {
            self.configurator.toggle_category(id);
        }
    }

    fn start(&mut self) {
        if self.state != AppState::Setup {
            return;
        }

        let pool = self.bank.questions();
        if !self.configurator.can_start(pool) {
            debug!("start ignored: no eligible questions");
            return;
        }

        let count = self.configurator.question_count(pool);
        let questions = self.configurator.build_session(pool, count, &mut self.rng);
        info!(
            mode = ?self.configurator.mode(),
            requested = count,
            shuffle = self.settings.shuffle_options,
            "starting quiz"
        );

        let session = if self.settings.shuffle_options {
            Session::with_shuffled_options(questions, &mut self.rng)
        } else {
            Session::new(questions)
        };
        match session {
            Ok(session) => self.enter_session(session),
            Err(err) => warn!(%err, "session not started"),
        }
    }

    fn enter_session(&mut self, session: Session) {
        self.session = Some(session);
        self.summary = None;
        self.highlighted = 0;
        self.result_cursor = 0;
        self.state = AppState::Quiz;
    }

    fn answer(&mut self, option: usize) {
        if self.state != AppState::Quiz {
            return;
        }
        if let Some(session) = &mut self.session {
            if session.answer(option) != AnswerOutcome::Ignored {
                self.highlighted = option;
            }
        }
    }

    fn advance(&mut self) {
        if self.state != AppState::Quiz {
            return;
        }
        let Some(session) = &mut self.session else {
            return;
        };

        match session.advance() {
            Advance::Next(_) => self.highlighted = 0,
            Advance::Complete => {
                self.summary = Some(ResultsSummary::from_session(session));
                self.result_cursor = 0;
                self.state = AppState::Result;
            }
            Advance::Blocked => {}
        }
    }

    fn retake_incorrect(&mut self) {
        if self.state != AppState::Result {
            return;
        }
        let Some(session) = &self.session else {
            return;
        };

        let incorrect = incorrect_subset(session.questions(), session.answers());
        if let Some(session) = retake(incorrect) {
            self.enter_session(session);
        }
    }

    fn back_to_setup(&mut self) {
        if !matches!(self.state, AppState::Quiz | AppState::Result) {
            return;
        }
        self.session = None;
        self.summary = None;
        self.configurator.reset();
        self.category_cursor = 0;
        self.highlighted = 0;
        self.state = AppState::Setup;
    }
}

fn step_forward(cursor: usize, len: usize) -> usize {
    (cursor + 1).min(len.saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BANK: &str = r#"{
        "questions": [
            {"question": "What is opportunity cost?", "options": ["Next best alternative", "Sunk cost"], "correct": 0, "category": "basics"},
            {"question": "Define margin", "options": ["Price minus cost", "Revenue"], "correct": 0, "category": "basics"},
            {"question": "What is a pivot?", "options": ["A change in strategy", "A funding round"], "correct": "A change in strategy", "category": "startups"},
            {"question": "What is an MVP?", "options": ["Most valuable player", "Minimum viable product"], "correct": 1, "category": "startups"}
        ],
        "categories": [
            {"id": "basics", "name": "Basics"},
            {"id": "startups", "name": "Startups"}
        ]
    }"#;

    fn app(settings: Settings) -> App {
        let bank = Bank::from_json_str(BANK).unwrap();
        App::with_rng(bank, settings, StdRng::seed_from_u64(21))
    }

    fn answer_all(app: &mut App, correct: bool) {
        while app.state == AppState::Quiz {
            let question = app.session().unwrap().current_question();
            let option = if correct {
                question.correct
            } else {
                (question.correct + 1) % question.options.len()
            };
            app.update(Action::Answer(option));
            app.update(Action::Advance);
        }
    }

    #[test]
    fn test_start_requires_mode() {
        let mut app = app(Settings::default());
        app.update(Action::Start);
        assert_eq!(app.state, AppState::Setup);
        assert!(app.session().is_none());
    }

    #[test]
    fn test_start_requires_category_in_category_mode() {
        let mut app = app(Settings::default());
        app.update(Action::SelectMode(QuizMode::Category));
        app.update(Action::Start);
        assert_eq!(app.state, AppState::Setup);

        app.update(Action::ToggleCategoryUnderCursor);
        assert!(app.can_start());
        app.update(Action::Start);
        assert_eq!(app.state, AppState::Quiz);
        assert!(app
            .session()
            .unwrap()
            .questions()
            .iter()
            .all(|q| q.category == "basics"));
    }

    #[test]
    fn test_count_is_clamped_to_pool() {
        let mut app = app(Settings::default());
        app.update(Action::SelectMode(QuizMode::All));
        assert_eq!(app.question_count(), 4);
        app.update(Action::AdjustCount(-2));
        assert_eq!(app.question_count(), 2);

        app.update(Action::Start);
        assert_eq!(app.session().unwrap().len(), 2);
    }

    #[test]
    fn test_confirm_answers_then_advances() {
        let mut app = app(Settings::default());
        app.update(Action::SelectMode(QuizMode::All));
        app.update(Action::Start);

        app.update(Action::HighlightNext);
        app.update(Action::Confirm);
        assert_eq!(app.session().unwrap().current_answer(), Some(1));

        app.update(Action::Confirm);
        assert_eq!(app.session().unwrap().cursor(), 1);
        assert_eq!(app.highlighted(), 0);
    }

    #[test]
    fn test_advance_before_answer_does_nothing() {
        let mut app = app(Settings::default());
        app.update(Action::SelectMode(QuizMode::All));
        app.update(Action::Start);
        app.update(Action::Advance);
        assert_eq!(app.session().unwrap().cursor(), 0);
    }

    #[test]
    fn test_perfect_run_has_nothing_to_retake() {
        let mut app = app(Settings::default());
        app.update(Action::SelectMode(QuizMode::All));
        app.update(Action::Start);
        answer_all(&mut app, true);

        assert_eq!(app.state, AppState::Result);
        let summary = app.summary().unwrap();
        assert_eq!(summary.percentage, 100);
        assert_eq!(summary.best_streak, summary.total);

        app.update(Action::RetakeIncorrect);
        assert_eq!(app.state, AppState::Result);
    }

    #[test]
    fn test_retake_incorrect_runs_only_missed_questions() {
        let mut app = app(Settings::default());
        app.update(Action::SelectMode(QuizMode::All));
        app.update(Action::Start);
        answer_all(&mut app, false);

        let missed: Vec<String> = app
            .session()
            .unwrap()
            .questions()
            .iter()
            .map(|q| q.prompt.clone())
            .collect();

        app.update(Action::RetakeIncorrect);
        assert_eq!(app.state, AppState::Quiz);
        let session = app.session().unwrap();
        let prompts: Vec<String> = session.questions().iter().map(|q| q.prompt.clone()).collect();
        assert_eq!(prompts, missed);
        assert_eq!(session.answered_count(), 0);
    }

    #[test]
    fn test_new_quiz_resets_configuration() {
        let mut app = app(Settings::default());
        app.update(Action::SelectMode(QuizMode::Category));
        app.update(Action::ToggleCategory("startups".to_string()));
        app.update(Action::Start);
        answer_all(&mut app, true);

        app.update(Action::NewQuiz);
        assert_eq!(app.state, AppState::Setup);
        assert!(app.session().is_none());
        assert!(app.configurator().mode().is_none());
        assert!(app.configurator().selected_categories().is_empty());
    }

    #[test]
    fn test_exit_quiz_discards_session() {
        let mut app = app(Settings::default());
        app.update(Action::SelectMode(QuizMode::All));
        app.update(Action::Start);
        app.update(Action::Answer(0));
        app.update(Action::ExitQuiz);
        assert_eq!(app.state, AppState::Setup);
        assert!(app.session().is_none());
    }

    #[test]
    fn test_shuffle_setting_keeps_answers_consistent() {
        let mut app = app(Settings {
            question_count: 4,
            shuffle_options: true,
        });
        app.update(Action::SelectMode(QuizMode::All));
        app.update(Action::Start);
        answer_all(&mut app, true);
        assert_eq!(app.summary().unwrap().correct, 4);
    }

    #[test]
    fn test_browse_expands_categories() {
        let mut app = app(Settings::default());
        app.update(Action::OpenBrowse);
        assert_eq!(app.state, AppState::Browse);

        app.update(Action::BrowseNext);
        app.update(Action::ToggleExpanded);
        assert!(app.is_expanded("startups"));
        app.update(Action::ToggleExpanded);
        assert!(!app.is_expanded("startups"));

        app.update(Action::CloseBrowse);
        assert_eq!(app.state, AppState::Setup);
    }

    #[test]
    fn test_browse_walks_every_question_of_an_expanded_category() {
        let questions: Vec<String> = (0..20)
            .map(|n| {
                format!(
                    r#"{{"question": "Big {n}", "options": ["x", "y"], "correct": 0, "category": "big"}}"#
                )
            })
            .collect();
        let json = format!(
            r#"{{"questions": [{}, {{"question": "Small", "options": ["x", "y"], "correct": 1, "category": "small"}}],
                "categories": [{{"id": "big", "name": "Big"}}, {{"id": "small", "name": "Small"}}]}}"#,
            questions.join(",")
        );
        let bank = Bank::from_json_str(&json).unwrap();
        let mut app = App::with_rng(bank, Settings::default(), StdRng::seed_from_u64(3));

        app.update(Action::OpenBrowse);
        app.update(Action::ToggleExpanded);
        assert!(app.is_expanded("big"));

        let mut seen = Vec::new();
        loop {
            let rows = app.browse_rows();
            match rows[app.browse_cursor()] {
                BrowseRow::Question { category: 0, position } => seen.push(position),
                BrowseRow::Category(1) => break,
                _ => {}
            }
            app.update(Action::BrowseNext);
        }
        assert_eq!(seen, (0..20).collect::<Vec<_>>());

        // The cursor stops at the last row.
        app.update(Action::BrowseNext);
        assert_eq!(app.browse_cursor(), 21);

        // Collapsing from inside a category returns to its header.
        for _ in 0..5 {
            app.update(Action::BrowsePrevious);
        }
        assert_eq!(
            app.browse_rows()[app.browse_cursor()],
            BrowseRow::Question { category: 0, position: 15 }
        );
        app.update(Action::ToggleExpanded);
        assert!(!app.is_expanded("big"));
        assert_eq!(app.browse_cursor(), 0);
        assert_eq!(app.browse_rows().len(), 2);
    }

    #[test]
    fn test_quit() {
        let mut app = app(Settings::default());
        app.update(Action::Quit);
        assert!(app.should_quit);
    }
}
