//! Screen wrappers for type-safe screen-specific operations.
//!
//! This module provides proof-token types and mode wrappers that ensure
//! operations are only performed when the app is on the matching screen.

use std::time::Instant;

use tally_types::manipulator::{GestureEvent, GestureOutcome, GestureTarget, ShapeId};

use super::{App, CursorMove, GridDrillState, RenameError, Screen, SubmitOutcome};

/// Proof token for player selection operations.
#[derive(Debug)]
pub struct SelectToken(());

/// Proof token for practice operations.
#[derive(Debug)]
pub struct PracticeToken(());

/// Proof token for grid drill operations.
#[derive(Debug)]
pub struct DrillToken(());

impl SelectToken {
    pub(crate) fn new(screen: &Screen) -> Option<Self> {
        matches!(screen, Screen::PlayerSelect(_)).then_some(Self(()))
    }
}

impl PracticeToken {
    pub(crate) fn new(screen: &Screen) -> Option<Self> {
        matches!(screen, Screen::Practice(_)).then_some(Self(()))
    }
}

impl DrillToken {
    pub(crate) fn new(screen: &Screen) -> Option<Self> {
        matches!(screen, Screen::GridDrill { .. }).then_some(Self(()))
    }
}

/// Mode wrapper for the player selection screen.
pub struct SelectMode<'a> {
    pub(crate) app: &'a mut App,
}

/// Mode wrapper for a running practice round.
pub struct PracticeMode<'a> {
    pub(crate) app: &'a mut App,
}

/// Mode wrapper for the grid drill.
pub struct DrillMode<'a> {
    pub(crate) app: &'a mut App,
}

// ============================================================================
// SelectMode
// ============================================================================

impl SelectMode<'_> {
    fn state(&mut self) -> Option<&mut super::SelectState> {
        match &mut self.app.screen {
            Screen::PlayerSelect(state) => Some(state),
            _ => None,
        }
    }

    pub fn move_up(&mut self) {
        if let Some(state) = self.state()
            && state.rename.is_none()
        {
            state.selected = state.selected.saturating_sub(1);
        }
    }

    pub fn move_down(&mut self) {
        let last = self.app.roster.len().saturating_sub(1);
        if let Some(state) = self.state()
            && state.rename.is_none()
        {
            state.selected = (state.selected + 1).min(last);
        }
    }

    /// Start practicing as the highlighted player.
    pub fn confirm(&mut self) -> bool {
        let Some(selected) = self.state().map(|state| state.selected) else {
            return false;
        };
        let Some(player_id) = self.app.roster.players().get(selected).map(|p| p.id) else {
            return false;
        };
        self.app.start_practice(player_id);
        true
    }

    pub fn is_renaming(&self) -> bool {
        matches!(&self.app.screen, Screen::PlayerSelect(state) if state.rename.is_some())
    }

    /// Begin editing the highlighted player's name, prefilled.
    pub fn begin_rename(&mut self) {
        let Some(selected) = self.state().map(|state| state.selected) else {
            return;
        };
        let Some(current) = self
            .app
            .roster
            .players()
            .get(selected)
            .map(|player| player.name.as_str().to_string())
        else {
            return;
        };
        if let Some(state) = self.state() {
            state.rename = Some(current);
        }
    }

    pub fn rename_push(&mut self, c: char) {
        if c.is_control() {
            return;
        }
        if let Some(draft) = self.state().and_then(|state| state.rename.as_mut()) {
            draft.push(c);
        }
    }

    pub fn rename_backspace(&mut self) {
        if let Some(draft) = self.state().and_then(|state| state.rename.as_mut()) {
            draft.pop();
        }
    }

    pub fn rename_cancel(&mut self) {
        if let Some(state) = self.state() {
            state.rename = None;
        }
    }

    /// Apply the draft name. A blank draft keeps the editor open.
    pub fn rename_confirm(&mut self) -> Result<(), RenameError> {
        let Some((selected, draft)) = self
            .state()
            .and_then(|state| state.rename.clone().map(|draft| (state.selected, draft)))
        else {
            return Ok(());
        };
        let Some(player_id) = self.app.roster.players().get(selected).map(|p| p.id) else {
            return Ok(());
        };
        match self.app.roster.rename(player_id, &draft) {
            Ok(_) => {
                tracing::info!(player_id, "Player renamed");
                self.rename_cancel();
                Ok(())
            }
            Err(RenameError::Roster(err)) => {
                // The new name is kept in memory; only the save failed.
                tracing::warn!("{err}");
                self.app.set_status("Could not save the new name");
                self.rename_cancel();
                Err(RenameError::Roster(err))
            }
            Err(err) => Err(err),
        }
    }
}

// ============================================================================
// PracticeMode
// ============================================================================

impl PracticeMode<'_> {
    fn state(&mut self) -> Option<&mut super::PracticeState> {
        match &mut self.app.screen {
            Screen::Practice(state) => Some(state),
            _ => None,
        }
    }

    pub fn push_digit(&mut self, digit: char) -> bool {
        self.state().is_some_and(|state| state.push_digit(digit))
    }

    pub fn backspace(&mut self) {
        if let Some(state) = self.state() {
            state.backspace();
        }
    }

    pub fn submit(&mut self) -> SubmitOutcome {
        self.submit_at(Instant::now())
    }

    /// Submit with an explicit clock, so reward timing is testable.
    pub fn submit_at(&mut self, now: Instant) -> SubmitOutcome {
        self.app.submit_answer(now)
    }

    pub fn next_problem(&mut self) {
        self.app.next_problem(false);
    }

    /// Open a fresh counting aid, or close the open one.
    pub fn toggle_hint(&mut self) -> bool {
        let open = self.state().is_some_and(super::PracticeState::toggle_hint);
        self.app.view.release_pointer();
        open
    }

    pub fn close_hint(&mut self) -> bool {
        let closed = self.state().is_some_and(super::PracticeState::close_hint);
        self.app.view.release_pointer();
        closed
    }

    /// Feed one interaction event to the counting aid. `None` when the aid
    /// is closed.
    pub fn gesture(&mut self, event: GestureEvent) -> Option<GestureOutcome> {
        self.state().and_then(|state| state.gesture(event))
    }

    pub fn activate_group(&mut self) -> Option<GestureOutcome> {
        self.gesture(GestureEvent::Activate(GestureTarget::PrimaryGroup))
    }

    pub fn select_next_shape(&mut self) {
        if let Some(state) = self.state() {
            state.move_cursor(true);
        }
    }

    pub fn select_prev_shape(&mut self) {
        if let Some(state) = self.state() {
            state.move_cursor(false);
        }
    }

    pub fn selected_shape(&mut self) -> Option<ShapeId> {
        self.state().and_then(|state| state.selected_shape())
    }

    pub fn activate_selected_shape(&mut self) -> Option<GestureOutcome> {
        let id = self.selected_shape()?;
        self.gesture(GestureEvent::Activate(GestureTarget::Shape(id)))
    }

    /// Return every counted shape to its pool.
    pub fn reset_manipulator(&mut self) -> Option<usize> {
        let returned = self.state().and_then(super::PracticeState::reset_hint);
        self.app.view.release_pointer();
        returned
    }

    pub fn switch_player(&mut self) {
        self.app.switch_player();
    }
}

// ============================================================================
// DrillMode
// ============================================================================

impl DrillMode<'_> {
    fn state(&mut self) -> Option<&mut GridDrillState> {
        match &mut self.app.screen {
            Screen::GridDrill { drill, .. } => Some(drill.as_mut()),
            _ => None,
        }
    }

    /// Type a digit into the cell under the cursor.
    pub fn push_digit(&mut self, digit: char) -> bool {
        let Some(drill) = self.state() else {
            return false;
        };
        let was_complete = drill.is_all_correct();
        let pushed = drill.push_digit(digit);
        if pushed && !was_complete && drill.is_all_correct() {
            tracing::info!("Grid drill complete");
        }
        pushed
    }

    pub fn backspace(&mut self) {
        if let Some(drill) = self.state() {
            drill.backspace();
        }
    }

    pub fn move_cursor(&mut self, step: CursorMove) {
        if let Some(drill) = self.state() {
            drill.move_cursor(step);
        }
    }

    /// Deal new header orders and blank every cell.
    pub fn shuffle(&mut self) {
        let (top, left) = self.app.shuffled_headers();
        if let Some(drill) = self.state() {
            drill.set_headers(top, left);
            tracing::debug!(?top, ?left, "Grid drill shuffled");
        }
    }

    /// Blank every cell, keeping the headers.
    pub fn reset(&mut self) {
        if let Some(drill) = self.state() {
            drill.clear();
        }
    }
}
