//! Core engine for Tally - state machine for the practice app.
//!
//! This crate contains the App state machine without TUI dependencies.
//! The tui crate renders from it and feeds it keys and gestures.

use std::path::PathBuf;
use std::time::{Duration, Instant};

mod drill;
mod generator;
mod input_modes;
mod practice;
mod roster;


pub use drill::{
    CellMark, CursorMove, GRID_CELLS, GRID_SIZE, GridDrillState, MAX_CELL_DIGITS, ordered_headers,
    table_sum,
};
pub use generator::{Picker, ProblemGenerator, ThreadPicker, addend_ranges};
pub use input_modes::{
    DrillMode, DrillToken, PracticeMode, PracticeToken, SelectMode, SelectToken,
};
pub use practice::{
    CONGRATS_EVERY, Feedback, MAX_ANSWER_DIGITS, MODAL_DELAY, Modal, PracticeState, SAVED_INDICATOR,
    SubmitOutcome,
};
pub use roster::{ROSTER_FILE, RenameError, Roster, RosterError};
pub use tally_config::{ConfigError, TallyConfig};
pub use tally_types::manipulator;
pub use tally_types::ui::{
    ClickKind, ClickTracker, DEFAULT_DOUBLE_CLICK, Effect, EffectKind, HitMap, Press, Region,
    UiOptions, ViewState,
};
pub use tally_types::{Difficulty, ExpGain, Player, PlayerName, Problem, required_exp};

/// Modal pop-in length.
const MODAL_POP: Duration = Duration::from_millis(180);
/// Wrong-answer shake length.
const ANSWER_SHAKE: Duration = Duration::from_millis(300);

/// Player selection screen state.
#[derive(Debug, Clone, Default)]
pub struct SelectState {
    selected: usize,
    /// Draft name while renaming the selected player.
    rename: Option<String>,
}

impl SelectState {
    #[must_use]
    pub fn selected(&self) -> usize {
        self.selected
    }

    #[must_use]
    pub fn rename_draft(&self) -> Option<&str> {
        self.rename.as_deref()
    }
}

#[derive(Debug)]
pub enum Screen {
    PlayerSelect(SelectState),
    Practice(PracticeState),
    /// The fixed sum table; the round waits underneath.
    Table { round: PracticeState },
    GridDrill {
        round: PracticeState,
        drill: Box<GridDrillState>,
    },
}

impl Screen {
    /// Which view of a running round is showing. `None` on player select.
    #[must_use]
    pub fn practice_view(&self) -> Option<PracticeView> {
        match self {
            Screen::PlayerSelect(_) => None,
            Screen::Practice(_) => Some(PracticeView::Flashcards),
            Screen::Table { .. } => Some(PracticeView::Table),
            Screen::GridDrill { .. } => Some(PracticeView::GridDrill),
        }
    }
}

/// The three ways to practice once a player is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PracticeView {
    Flashcards,
    Table,
    GridDrill,
}

impl PracticeView {
    pub const ALL: [PracticeView; 3] = [
        PracticeView::Flashcards,
        PracticeView::Table,
        PracticeView::GridDrill,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            PracticeView::Flashcards => "Flashcards",
            PracticeView::Table => "Sum table",
            PracticeView::GridDrill => "Grid drill",
        }
    }

    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            PracticeView::Flashcards => PracticeView::Table,
            PracticeView::Table => PracticeView::GridDrill,
            PracticeView::GridDrill => PracticeView::Flashcards,
        }
    }
}

/// Everything `App` takes from config, resolved.
#[derive(Debug, Clone, Default)]
pub struct AppOptions {
    pub difficulty: Difficulty,
    pub show_hint: bool,
    pub ui_options: UiOptions,
    pub double_click: Option<Duration>,
    /// Where difficulty changes are persisted. `None` disables persistence.
    pub config_path: Option<PathBuf>,
}

impl AppOptions {
    #[must_use]
    pub fn from_config(config: Option<&TallyConfig>) -> Self {
        let Some(config) = config else {
            return Self {
                config_path: tally_config::config_path(),
                ..Self::default()
            };
        };
        Self {
            difficulty: config.difficulty(),
            show_hint: config.show_hint(),
            ui_options: config.ui_options(),
            double_click: Some(config.double_click_window()),
            config_path: tally_config::config_path(),
        }
    }
}

/// Application state
pub struct App {
    roster: Roster,
    generator: ProblemGenerator,
    difficulty: Difficulty,
    show_hint: bool,
    config_path: Option<PathBuf>,
    screen: Screen,
    modal: Option<Modal>,
    pending_modal: Option<(Modal, Instant)>,
    saved_until: Option<Instant>,
    status_message: Option<String>,
    view: ViewState,
    should_quit: bool,
}

impl App {
    /// Build from `~/.tally`. Config and roster problems are logged and
    /// replaced by defaults.
    #[must_use]
    pub fn new() -> Self {
        let config = match TallyConfig::load() {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %err.path().display(), "{err}; using default settings");
                None
            }
        };
        let roster = Roster::open(config.as_ref().and_then(TallyConfig::data_dir).as_deref());
        let options = AppOptions::from_config(config.as_ref());
        Self::with_parts(roster, ProblemGenerator::new(), options)
    }

    #[must_use]
    pub fn with_parts(roster: Roster, generator: ProblemGenerator, options: AppOptions) -> Self {
        let clicks = options
            .double_click
            .map_or_else(ClickTracker::default, ClickTracker::new);
        tracing::info!(
            players = roster.len(),
            difficulty = options.difficulty.as_str(),
            "App ready"
        );
        Self {
            roster,
            generator,
            difficulty: options.difficulty,
            show_hint: options.show_hint,
            config_path: options.config_path,
            screen: Screen::PlayerSelect(SelectState::default()),
            modal: None,
            pending_modal: None,
            saved_until: None,
            status_message: None,
            view: ViewState::new(options.ui_options, clicks),
            should_quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn request_quit(&mut self) {
        self.should_quit = true;
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ViewState {
        &mut self.view
    }

    pub fn ui_options(&self) -> UiOptions {
        self.view.ui_options
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// The practice round, while its flashcards are showing.
    pub fn practice(&self) -> Option<&PracticeState> {
        match &self.screen {
            Screen::Practice(state) => Some(state),
            _ => None,
        }
    }

    /// The running round, whichever view is showing.
    pub fn round(&self) -> Option<&PracticeState> {
        match &self.screen {
            Screen::Practice(round) | Screen::Table { round } | Screen::GridDrill { round, .. } => {
                Some(round)
            }
            Screen::PlayerSelect(_) => None,
        }
    }

    pub fn practice_view(&self) -> Option<PracticeView> {
        self.screen.practice_view()
    }

    pub fn grid_drill(&self) -> Option<&GridDrillState> {
        match &self.screen {
            Screen::GridDrill { drill, .. } => Some(drill.as_ref()),
            _ => None,
        }
    }

    /// The player of the running practice round.
    pub fn current_player(&self) -> Option<&Player> {
        self.round()
            .and_then(|state| self.roster.get(state.player_id()))
    }

    /// Show another view of the running round. Coming back to the
    /// flashcards starts a new question sequence; the score is kept. The
    /// grid drill is dealt fresh headers every time it opens.
    pub fn switch_view(&mut self, view: PracticeView) -> bool {
        if self.practice_view().is_none_or(|current| current == view) {
            return false;
        }
        let screen = std::mem::replace(
            &mut self.screen,
            Screen::PlayerSelect(SelectState::default()),
        );
        let round = match screen {
            Screen::Practice(round) | Screen::Table { round } | Screen::GridDrill { round, .. } => {
                round
            }
            other @ Screen::PlayerSelect(_) => {
                self.screen = other;
                return false;
            }
        };
        self.screen = match view {
            PracticeView::Flashcards => Screen::Practice(round),
            PracticeView::Table => Screen::Table { round },
            PracticeView::GridDrill => {
                let (top, left) = self.shuffled_headers();
                Screen::GridDrill {
                    round,
                    drill: Box::new(GridDrillState::new(top, left)),
                }
            }
        };
        if view == PracticeView::Flashcards {
            self.next_problem(true);
        }
        self.view.release_pointer();
        self.view.answer_effect = None;
        tracing::info!(view = view.label(), "View switched");
        true
    }

    /// Back to player select from any view of the round.
    pub fn switch_player(&mut self) {
        if self.round().is_some() {
            self.leave_practice();
        }
    }

    pub fn cycle_view(&mut self) -> Option<PracticeView> {
        let next = self.practice_view()?.next();
        self.switch_view(next);
        Some(next)
    }

    pub fn modal(&self) -> Option<Modal> {
        self.modal
    }

    pub fn has_pending_modal(&self) -> bool {
        self.pending_modal.is_some()
    }

    pub fn is_saved_indicator_visible(&self) -> bool {
        self.saved_until
            .is_some_and(|until| Instant::now() < until)
    }

    /// Advance timers against the wall clock.
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    /// Advance timers as of `now`: surface due modals, expire the indicator.
    pub fn tick_at(&mut self, now: Instant) {
        if let Some((modal, due)) = self.pending_modal
            && now >= due
        {
            self.pending_modal = None;
            self.open_modal(modal);
        }
        if self.saved_until.is_some_and(|until| now >= until) {
            self.saved_until = None;
        }
    }

    /// Get elapsed time since last frame and update timing.
    pub fn frame_elapsed(&mut self) -> Duration {
        let now = Instant::now();
        let elapsed = now.duration_since(self.view.last_frame);
        self.view.last_frame = now;
        elapsed
    }

    /// Close the open modal and move on to the next problem if this one is
    /// done.
    pub fn close_modal(&mut self) -> bool {
        if self.modal.take().is_none() {
            return false;
        }
        self.view.modal_effect = None;
        if self.practice().is_some_and(PracticeState::is_solved) {
            self.next_problem(false);
        }
        true
    }

    /// Advance to the next difficulty tier, persist it, and start a new
    /// problem sequence.
    pub fn cycle_difficulty(&mut self) -> Difficulty {
        self.set_difficulty(self.difficulty.next());
        self.difficulty
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        if difficulty == self.difficulty {
            return;
        }
        self.difficulty = difficulty;
        tracing::info!(difficulty = difficulty.as_str(), "Difficulty changed");
        if let Some(path) = &self.config_path
            && let Err(err) = tally_config::persist_difficulty_at(path, difficulty)
        {
            tracing::warn!(path = %err.path().display(), "{err}");
            self.set_status("Could not save the difficulty setting");
        }
        if matches!(self.screen, Screen::Practice(_)) {
            self.next_problem(true);
        }
    }

    pub fn select_token(&self) -> Option<SelectToken> {
        SelectToken::new(&self.screen)
    }

    pub fn practice_token(&self) -> Option<PracticeToken> {
        PracticeToken::new(&self.screen)
    }

    pub fn drill_token(&self) -> Option<DrillToken> {
        DrillToken::new(&self.screen)
    }

    pub fn select_mode(&mut self, _token: SelectToken) -> SelectMode<'_> {
        SelectMode { app: self }
    }

    pub fn practice_mode(&mut self, _token: PracticeToken) -> PracticeMode<'_> {
        PracticeMode { app: self }
    }

    pub fn drill_mode(&mut self, _token: DrillToken) -> DrillMode<'_> {
        DrillMode { app: self }
    }

    // ------------------------------------------------------------------
    // Internal transitions shared by the mode wrappers
    // ------------------------------------------------------------------

    pub(crate) fn start_practice(&mut self, player_id: u32) {
        let problem = self.generator.generate(self.difficulty);
        let mut state = PracticeState::new(player_id, problem);
        if self.show_hint {
            state.open_hint();
        }
        tracing::info!(player_id, %problem, "Practice started");
        self.screen = Screen::Practice(state);
        self.modal = None;
        self.pending_modal = None;
        self.view.modal_effect = None;
        self.view.release_pointer();
    }

    pub(crate) fn leave_practice(&mut self) {
        let selected = self
            .round()
            .and_then(|state| {
                self.roster
                    .players()
                    .iter()
                    .position(|player| player.id == state.player_id())
            })
            .unwrap_or(0);
        self.screen = Screen::PlayerSelect(SelectState {
            selected,
            rename: None,
        });
        self.modal = None;
        self.pending_modal = None;
        self.view.modal_effect = None;
        self.view.release_pointer();
    }

    pub(crate) fn next_problem(&mut self, new_session: bool) {
        let problem = self.generator.generate(self.difficulty);
        let show_hint = self.show_hint;
        let Screen::Practice(state) = &mut self.screen else {
            return;
        };
        state.load_problem(problem, new_session);
        if show_hint {
            state.open_hint();
        }
        self.view.release_pointer();
        self.view.answer_effect = None;
        tracing::debug!(%problem, question = state.question_number(), "Next problem");
    }

    pub(crate) fn submit_answer(&mut self, now: Instant) -> SubmitOutcome {
        let difficulty = self.difficulty;
        let reduced_motion = self.view.ui_options.reduced_motion;
        let Screen::Practice(state) = &mut self.screen else {
            return SubmitOutcome::Ignored;
        };
        let graded = state.grade();
        let correct = match graded {
            None if state.is_solved() => return SubmitOutcome::Ignored,
            None => return SubmitOutcome::NotANumber,
            Some(false) => {
                tracing::info!(problem = %state.problem(), "Wrong answer");
                if !reduced_motion {
                    self.view.answer_effect = Some(Effect::shake(ANSWER_SHAKE));
                }
                return SubmitOutcome::Wrong;
            }
            Some(true) => state,
        };

        let exp = difficulty.exp_reward();
        let score = correct.mark_correct(exp);
        let player_id = correct.player_id();
        let problem = correct.problem();

        let Some((gain, saved)) = self.roster.award_exp(player_id, exp) else {
            tracing::warn!(player_id, "Correct answer for a player missing from the roster");
            return SubmitOutcome::Correct(ExpGain {
                gained: 0,
                levels_gained: 0,
            });
        };
        match saved {
            Ok(()) => self.saved_until = Some(now + SAVED_INDICATOR),
            Err(err) => {
                tracing::warn!("{err}");
                self.set_status("Could not save progress");
            }
        }

        let level = self.roster.get(player_id).map_or(1, |player| player.level);
        tracing::info!(%problem, exp, score, level, "Correct answer");
        if gain.leveled_up() {
            tracing::info!(player_id, level, "Level up");
            self.pending_modal = Some((Modal::LevelUp { level }, now + MODAL_DELAY));
        } else if score % CONGRATS_EVERY == 0 {
            self.pending_modal = Some((Modal::Congrats { score }, now + MODAL_DELAY));
        }
        SubmitOutcome::Correct(gain)
    }

    /// Both grid drill header orders, shuffled.
    pub(crate) fn shuffled_headers(&mut self) -> ([u32; GRID_SIZE], [u32; GRID_SIZE]) {
        let mut top = ordered_headers();
        let mut left = ordered_headers();
        self.generator.shuffle(&mut top);
        self.generator.shuffle(&mut left);
        (top, left)
    }

    fn open_modal(&mut self, modal: Modal) {
        self.modal = Some(modal);
        self.view.modal_effect =
            (!self.view.ui_options.reduced_motion).then(|| Effect::pop_scale(MODAL_POP));
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
