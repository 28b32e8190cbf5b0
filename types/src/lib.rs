//! Core domain types for Tally.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory
#![allow(clippy::missing_panics_doc)] // Panics are documented in assertions

pub mod manipulator;
pub mod player;
pub mod problem;
pub mod ui;

pub use manipulator::{
    Addends, GestureEvent, GestureOutcome, GestureTarget, InvalidAddend, Location, MoveOutcome,
    PoolLabel, PoolManager, Session, ShapeId,
};
pub use player::{EmptyNameError, ExpGain, Player, PlayerName, default_players, required_exp};
pub use problem::{Difficulty, Problem};
