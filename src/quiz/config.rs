//! Quiz configuration: mode, category filter and question count.

use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::models::Question;

/// Upper bound on the number of questions in one session.
pub const MAX_QUESTIONS: usize = 75;

/// Question count offered before the user changes it.
pub const DEFAULT_QUESTION_COUNT: usize = 25;

/// How the question pool is filtered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizMode {
    /// Draw from every question in the bank.
    All,
    /// Draw only from the selected categories.
    Category,
}

/// Builds the question set for a new session.
///
/// The selected category set is empty whenever the mode is not
/// [`QuizMode::Category`].
#[derive(Debug, Clone)]
pub struct Configurator {
    mode: Option<QuizMode>,
    selected: HashSet<String>,
    requested: usize,
}

impl Default for Configurator {
    fn default() -> Self {
        Self::new(DEFAULT_QUESTION_COUNT)
    }
}

impl Configurator {
    pub fn new(requested: usize) -> Self {
        Self {
            mode: None,
            selected: HashSet::new(),
            requested: requested.clamp(1, MAX_QUESTIONS),
        }
    }

    pub fn mode(&self) -> Option<QuizMode> {
        self.mode
    }

    pub fn select_mode(&mut self, mode: QuizMode) {
        self.mode = Some(mode);
        if mode != QuizMode::Category {
            self.selected.clear();
        }
        debug!(?mode, "quiz mode selected");
    }

    /// Forget the mode and categories, keeping the requested count.
    pub fn reset(&mut self) {
        self.mode = None;
        self.selected.clear();
    }

    /// Add the category if absent, remove it if present.
    pub fn toggle_category(&mut self, id: &str) {
        if !self.selected.remove(id) {
            self.selected.insert(id.to_string());
        }
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn selected_categories(&self) -> &HashSet<String> {
        &self.selected
    }

    fn admits(&self, question: &Question) -> bool {
        match self.mode {
            Some(QuizMode::All) => true,
            Some(QuizMode::Category) => self.selected.contains(&question.category),
            None => false,
        }
    }

    /// Size of the pool the active filter leaves.
    ///
    /// With no mode chosen yet this reports the whole pool, matching what the
    /// count selector shows before a mode is picked.
    pub fn max_selectable(&self, pool: &[Question]) -> usize {
        match self.mode {
            Some(QuizMode::Category) => pool.iter().filter(|q| self.admits(q)).count(),
            Some(QuizMode::All) | None => pool.len(),
        }
    }

    /// Largest count the user may request under the active filter.
    pub fn count_limit(&self, pool: &[Question]) -> usize {
        self.max_selectable(pool).min(MAX_QUESTIONS)
    }

    /// The requested count, clamped into `1..=count_limit`.
    pub fn question_count(&self, pool: &[Question]) -> usize {
        self.requested.clamp(1, self.count_limit(pool).max(1))
    }

    pub fn set_question_count(&mut self, count: usize, pool: &[Question]) {
        self.requested = count.clamp(1, self.count_limit(pool).max(1));
    }

    pub fn adjust_question_count(&mut self, delta: isize, pool: &[Question]) {
        let current = self.question_count(pool);
        self.set_question_count(current.saturating_add_signed(delta), pool);
    }

    /// Whether a session could be started with the current settings.
    pub fn can_start(&self, pool: &[Question]) -> bool {
        match self.mode {
            Some(QuizMode::All) => !pool.is_empty(),
            Some(QuizMode::Category) => self.max_selectable(pool) > 0,
            None => false,
        }
    }

    /// Sample up to `requested` questions from the filtered pool without
    /// replacement. Returns an empty list when the filter admits nothing.
    pub fn build_session<R: Rng + ?Sized>(
        &self,
        pool: &[Question],
        requested: usize,
        rng: &mut R,
    ) -> Vec<Question> {
        let mut filtered: Vec<Question> = pool.iter().filter(|q| self.admits(q)).cloned().collect();
        let take = requested.min(filtered.len());

        let (sample, _) = filtered.partial_shuffle(rng, take);
        let sample = sample.to_vec();
        debug!(
            pool = pool.len(),
            filtered = filtered.len(),
            selected = sample.len(),
            "questions sampled"
        );
        sample
    }
}
