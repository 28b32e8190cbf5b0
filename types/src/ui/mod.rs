//! UI state types for the TUI layer.
//!
//! Pure data types with no IO, no async, no ratatui dependency.
//! Used by both the engine (state ownership) and tui (rendering/input).

mod animation;
mod hit_map;
mod pointer;
mod view_state;

pub use animation::{Effect, EffectKind};
pub use hit_map::{HitMap, Region};
pub use pointer::{ClickKind, ClickTracker, DEFAULT_DOUBLE_CLICK, Press};
pub use view_state::{UiOptions, ViewState};
