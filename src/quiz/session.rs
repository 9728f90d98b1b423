//! Quiz session state machine.
//!
//! A session owns a fixed sequence of questions and one answer slot per
//! question. The cursor only moves forward, and each slot can be written once.

use rand::Rng;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::Question;

/// Errors raised when building a session.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions available for session")]
    Empty,
}

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Showing the question at this position.
    Active(usize),
    /// Every question has been shown and the results are up.
    Complete,
}

/// Result of [`Session::answer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    Correct,
    Incorrect,
    /// The slot was already filled, the option does not exist, or the session
    /// is complete. Nothing was recorded.
    Ignored,
}

/// Result of [`Session::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved on to the question at this position.
    Next(usize),
    /// Moved past the last question.
    Complete,
    /// The current question has not been answered yet.
    Blocked,
}

/// One quiz attempt.
#[derive(Debug, Clone)]
pub struct Session {
    questions: Vec<Question>,
    answers: Vec<Option<usize>>,
    phase: Phase,
}

impl Session {
    /// Start a session over `questions` in the given order.
    pub fn new(questions: Vec<Question>) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::Empty);
        }

        let answers = vec![None; questions.len()];
        info!(questions = questions.len(), "session started");

        Ok(Self {
            questions,
            answers,
            phase: Phase::Active(0),
        })
    }

    /// Start a session after permuting every question's options.
    ///
    /// The permutation happens before any slot can be filled, so answers are
    /// always recorded against the shuffled order.
    pub fn with_shuffled_options<R: Rng + ?Sized>(
        mut questions: Vec<Question>,
        rng: &mut R,
    ) -> Result<Self, SessionError> {
        for question in &mut questions {
            question.shuffle_options(rng);
        }
        debug!(questions = questions.len(), "options shuffled");
        Self::new(questions)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    /// Position of the question on screen. Stays on the last question once
    /// the session is complete.
    pub fn cursor(&self) -> usize {
        match self.phase {
            Phase::Active(cursor) => cursor,
            Phase::Complete => self.questions.len() - 1,
        }
    }

    pub fn current_question(&self) -> &Question {
        &self.questions[self.cursor()]
    }

    /// The recorded answer for the current question, if any.
    pub fn current_answer(&self) -> Option<usize> {
        self.answers[self.cursor()]
    }

    pub fn is_current_answered(&self) -> bool {
        self.current_answer().is_some()
    }

    pub fn is_last(&self) -> bool {
        self.cursor() + 1 == self.questions.len()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answers(&self) -> &[Option<usize>] {
        &self.answers
    }

    /// Record `option` for the current question. The first answer locks the
    /// slot.
    pub fn answer(&mut self, option: usize) -> AnswerOutcome {
        let Phase::Active(cursor) = self.phase else {
            return AnswerOutcome::Ignored;
        };

        let question = &self.questions[cursor];
        if self.answers[cursor].is_some() || option >= question.options.len() {
            return AnswerOutcome::Ignored;
        }

        self.answers[cursor] = Some(option);
        let correct = question.correct == option;
        debug!(position = cursor, option, correct, "answer recorded");

        if correct {
            AnswerOutcome::Correct
        } else {
            AnswerOutcome::Incorrect
        }
    }

    /// Move past the current question once it has been answered.
    pub fn advance(&mut self) -> Advance {
        let Phase::Active(cursor) = self.phase else {
            return Advance::Complete;
        };

        if self.answers[cursor].is_none() {
            return Advance::Blocked;
        }

        if cursor + 1 >= self.questions.len() {
            self.phase = Phase::Complete;
            info!(
                score = self.score(),
                total = self.questions.len(),
                "session complete"
            );
            Advance::Complete
        } else {
            self.phase = Phase::Active(cursor + 1);
            Advance::Next(cursor + 1)
        }
    }

    /// Number of slots holding the correct option.
    pub fn score(&self) -> usize {
        self.answers
            .iter()
            .zip(self.questions.iter())
            .filter(|(answer, question)| question.is_correct(**answer))
            .count()
    }

    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_some()).count()
    }
}
