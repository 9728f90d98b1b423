//! Scoring for a finished session.
//!
//! All functions match questions to answers strictly by position. The
//! question list is the one the session ran with, so option shuffles are
//! already reflected in each `correct` index.

use std::cmp::Ordering;

use tracing::{debug, info};

use crate::models::Question;

use super::session::Session;

/// Accuracy within one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryScore {
    pub category: String,
    pub correct: usize,
    pub total: usize,
}

impl CategoryScore {
    pub fn percentage(&self) -> u32 {
        percentage(self.correct, self.total)
    }

    fn accuracy_cmp(&self, other: &Self) -> Ordering {
        (self.correct * other.total).cmp(&(other.correct * self.total))
    }
}

/// Everything the results screen shows about a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsSummary {
    pub total: usize,
    pub correct: usize,
    pub percentage: u32,
    pub best_streak: usize,
    pub categories: Vec<CategoryScore>,
    /// Positions of the questions answered wrongly or not at all.
    pub incorrect: Vec<usize>,
}

impl ResultsSummary {
    pub fn compute(questions: &[Question], answers: &[Option<usize>]) -> Self {
        debug_assert_eq!(questions.len(), answers.len());

        let correct = correct_count(questions, answers);
        let summary = Self {
            total: questions.len(),
            correct,
            percentage: percentage(correct, questions.len()),
            best_streak: best_streak(questions, answers),
            categories: category_breakdown(questions, answers),
            incorrect: outcomes(questions, answers)
                .enumerate()
                .filter(|(_, correct)| !correct)
                .map(|(index, _)| index)
                .collect(),
        };

        info!(
            correct = summary.correct,
            total = summary.total,
            best_streak = summary.best_streak,
            "results computed"
        );
        summary
    }

    pub fn from_session(session: &Session) -> Self {
        Self::compute(session.questions(), session.answers())
    }

    pub fn has_incorrect(&self) -> bool {
        !self.incorrect.is_empty()
    }
}

fn outcomes<'a>(
    questions: &'a [Question],
    answers: &'a [Option<usize>],
) -> impl Iterator<Item = bool> + 'a {
    questions
        .iter()
        .zip(answers.iter())
        .map(|(question, answer)| question.is_correct(*answer))
}

pub fn correct_count(questions: &[Question], answers: &[Option<usize>]) -> usize {
    outcomes(questions, answers).filter(|correct| *correct).count()
}

/// `round(100 * correct / total)`, rounding halves up. Zero when `total` is
/// zero.
pub fn percentage(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((200 * correct + total) / (2 * total)) as u32
}

/// Longest run of consecutive correct answers in session order.
pub fn best_streak(questions: &[Question], answers: &[Option<usize>]) -> usize {
    let mut best = 0;
    let mut current = 0;
    for correct in outcomes(questions, answers) {
        current = if correct { current + 1 } else { 0 };
        best = best.max(current);
    }
    best
}

/// Per-category accuracy, best first. Ties keep the order in which the
/// categories first appear in the session.
pub fn category_breakdown(questions: &[Question], answers: &[Option<usize>]) -> Vec<CategoryScore> {
    let mut scores: Vec<CategoryScore> = Vec::new();

    for (question, correct) in questions.iter().zip(outcomes(questions, answers)) {
        let index = match scores.iter().position(|s| s.category == question.category) {
            Some(index) => index,
            None => {
                scores.push(CategoryScore {
                    category: question.category.clone(),
                    correct: 0,
                    total: 0,
                });
                scores.len() - 1
            }
        };

        let score = &mut scores[index];
        score.total += 1;
        if correct {
            score.correct += 1;
        }
    }

    scores.sort_by(|a, b| b.accuracy_cmp(a));
    scores
}

/// Questions answered wrongly or left unanswered, in session order.
pub fn incorrect_subset(questions: &[Question], answers: &[Option<usize>]) -> Vec<Question> {
    questions
        .iter()
        .zip(outcomes(questions, answers))
        .filter(|(_, correct)| !correct)
        .map(|(question, _)| question.clone())
        .collect()
}

/// Start a new session over exactly `incorrect`, in the same order, with
/// every slot unanswered.
///
/// Returns `None` when there is nothing to retake.
pub fn retake(incorrect: Vec<Question>) -> Option<Session> {
    if incorrect.is_empty() {
        debug!("nothing to retake");
        return None;
    }
    info!(questions = incorrect.len(), "retaking incorrect questions");
    Session::new(incorrect).ok()
}
