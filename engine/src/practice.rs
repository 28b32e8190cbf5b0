//! State of one practice round: the current problem, the typed answer, and
//! the optional counting aid.

use std::time::Duration;

use tally_types::manipulator::{GestureEvent, GestureOutcome, Session, ShapeId};
use tally_types::{ExpGain, Problem};

/// Longest answer the entry accepts.
pub const MAX_ANSWER_DIGITS: usize = 3;
/// Delay between a correct answer and its reward modal.
pub const MODAL_DELAY: Duration = Duration::from_secs(1);
/// How long the "saved" indicator stays up.
pub const SAVED_INDICATOR: Duration = Duration::from_secs(2);
/// A congratulations modal follows every this-many correct answers.
pub const CONGRATS_EVERY: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Feedback {
    #[default]
    None,
    EnterNumber,
    Wrong,
    Correct { exp: u32 },
}

impl Feedback {
    #[must_use]
    pub fn message(&self) -> Option<String> {
        match self {
            Feedback::None => None,
            Feedback::EnterNumber => Some("Type a number first!".to_string()),
            Feedback::Wrong => Some("Not quite. Try again!".to_string()),
            Feedback::Correct { exp } => Some(format!("Correct! +{exp} exp")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    LevelUp { level: u32 },
    Congrats { score: u32 },
}

/// What a submit did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Already solved; waiting for the next problem.
    Ignored,
    NotANumber,
    Wrong,
    Correct(ExpGain),
}

#[derive(Debug)]
pub struct PracticeState {
    player_id: u32,
    problem: Problem,
    answer: String,
    feedback: Feedback,
    score: u32,
    question_number: u32,
    hint: Option<Session>,
    shape_cursor: usize,
}

impl PracticeState {
    pub(crate) fn new(player_id: u32, problem: Problem) -> Self {
        Self {
            player_id,
            problem,
            answer: String::new(),
            feedback: Feedback::None,
            score: 0,
            question_number: 1,
            hint: None,
            shape_cursor: 0,
        }
    }

    #[must_use]
    pub fn player_id(&self) -> u32 {
        self.player_id
    }

    #[must_use]
    pub fn problem(&self) -> Problem {
        self.problem
    }

    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }

    #[must_use]
    pub fn feedback(&self) -> Feedback {
        self.feedback
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn question_number(&self) -> u32 {
        self.question_number
    }

    #[must_use]
    pub fn is_solved(&self) -> bool {
        matches!(self.feedback, Feedback::Correct { .. })
    }

    #[must_use]
    pub fn hint(&self) -> Option<&Session> {
        self.hint.as_ref()
    }

    #[must_use]
    pub fn is_hint_open(&self) -> bool {
        self.hint.is_some()
    }

    /// The shape keyboard activation would move, if any.
    #[must_use]
    pub fn selected_shape(&self) -> Option<ShapeId> {
        let movable = self.hint.as_ref()?.movable_shapes();
        movable
            .get(self.shape_cursor.min(movable.len().saturating_sub(1)))
            .copied()
    }

    /// Swap in a new problem. Any counting aid belongs to the old addends
    /// and is dropped.
    pub(crate) fn load_problem(&mut self, problem: Problem, new_session: bool) {
        self.problem = problem;
        self.answer.clear();
        self.feedback = Feedback::None;
        self.hint = None;
        self.shape_cursor = 0;
        if new_session {
            self.question_number = 1;
        } else {
            self.question_number += 1;
        }
    }

    pub(crate) fn push_digit(&mut self, digit: char) -> bool {
        if self.is_solved() || !digit.is_ascii_digit() || self.answer.len() >= MAX_ANSWER_DIGITS {
            return false;
        }
        self.answer.push(digit);
        true
    }

    pub(crate) fn backspace(&mut self) {
        if !self.is_solved() {
            self.answer.pop();
        }
    }

    /// Grade the typed answer. Exp is not applied here; the caller awards it
    /// and then calls [`Self::mark_correct`].
    pub(crate) fn grade(&mut self) -> Option<bool> {
        if self.is_solved() {
            return None;
        }
        let Ok(value) = self.answer.parse::<u32>() else {
            self.feedback = Feedback::EnterNumber;
            return None;
        };
        if value == self.problem.answer() {
            Some(true)
        } else {
            self.feedback = Feedback::Wrong;
            self.answer.clear();
            Some(false)
        }
    }

    pub(crate) fn mark_correct(&mut self, exp: u32) -> u32 {
        self.feedback = Feedback::Correct { exp };
        self.score += 1;
        self.score
    }

    /// Open a fresh counting aid for the current addends, or close it.
    pub(crate) fn toggle_hint(&mut self) -> bool {
        if self.hint.take().is_none() {
            self.open_hint();
        }
        self.hint.is_some()
    }

    pub(crate) fn open_hint(&mut self) {
        self.hint = Some(Session::new(self.problem.addends()));
        self.shape_cursor = 0;
        tracing::debug!(problem = %self.problem, "Opened counting aid");
    }

    pub(crate) fn close_hint(&mut self) -> bool {
        self.hint.take().is_some()
    }

    pub(crate) fn gesture(&mut self, event: GestureEvent) -> Option<GestureOutcome> {
        let session = self.hint.as_mut()?;
        let outcome = session.handle(event);
        tracing::debug!(?event, ?outcome, total = session.total(), "Gesture");
        self.clamp_cursor();
        Some(outcome)
    }

    pub(crate) fn reset_hint(&mut self) -> Option<usize> {
        let session = self.hint.as_mut()?;
        let returned = session.reset();
        self.shape_cursor = 0;
        Some(returned)
    }

    pub(crate) fn move_cursor(&mut self, forward: bool) {
        let Some(session) = &self.hint else {
            return;
        };
        let count = session.movable_shapes().len();
        if count == 0 {
            self.shape_cursor = 0;
            return;
        }
        let current = self.shape_cursor.min(count - 1);
        self.shape_cursor = if forward {
            (current + 1) % count
        } else {
            (current + count - 1) % count
        };
    }

    fn clamp_cursor(&mut self) {
        let count = self
            .hint
            .as_ref()
            .map_or(0, |session| session.movable_shapes().len());
        self.shape_cursor = self.shape_cursor.min(count.saturating_sub(1));
    }
}
