//! Shape manipulator: a visual counting aid that turns each addend into a
//! pool of unit shapes the learner regroups into one running tally.
//!
//! - [`pools`] owns shape membership and enforces conservation.
//! - [`gesture`] maps drags and activations onto pool moves.
//! - [`layout`] derives the five-per-column arrangement for rendering.
//! - [`session`] bundles the above for one problem.

pub mod gesture;
pub mod layout;
pub mod pools;
pub mod session;
pub mod shape;

pub use gesture::{
    DragPayload, GestureEvent, GestureOutcome, GestureState, GestureTarget, IgnoredGesture,
    PayloadKind, interpret,
};
pub use layout::{Arrangement, COLUMN_HEIGHT, Column, arrange, canonical_order, columns};
pub use pools::{Location, MoveOutcome, NoOpReason, PoolManager, Snapshot};
pub use session::Session;
pub use shape::{
    AddendDefect, Addends, InvalidAddend, Modality, PoolLabel, Shape, ShapeId, VisualTag,
};
