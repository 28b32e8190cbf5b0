//! View state for rendering.
//!
//! Groups everything the renderer and input layer share but the practice
//! logic does not care about.

use std::time::Instant;

use super::{ClickTracker, Effect, HitMap, Press};

/// UI configuration options derived from config/environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiOptions {
    pub ascii_only: bool,
    pub high_contrast: bool,
    pub reduced_motion: bool,
}

#[derive(Debug)]
pub struct ViewState {
    /// Interactive regions from the last frame.
    pub hit_map: HitMap,
    pub clicks: ClickTracker,
    /// Button currently held over a target, if any.
    pub press: Option<Press>,
    pub modal_effect: Option<Effect>,
    pub answer_effect: Option<Effect>,
    pub ui_options: UiOptions,
    /// Timestamp of last frame (for animation timing).
    pub last_frame: Instant,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            hit_map: HitMap::default(),
            clicks: ClickTracker::default(),
            press: None,
            modal_effect: None,
            answer_effect: None,
            ui_options: UiOptions::default(),
            last_frame: Instant::now(),
        }
    }
}

impl ViewState {
    #[must_use]
    pub fn new(ui_options: UiOptions, clicks: ClickTracker) -> Self {
        Self {
            ui_options,
            clicks,
            ..Self::default()
        }
    }

    /// Drop all pointer state. Called whenever the manipulator is replaced.
    pub fn release_pointer(&mut self) {
        self.press = None;
        self.clicks.forget();
    }
}
