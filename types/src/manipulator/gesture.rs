//! Gesture interpretation: drag sessions and direct activations.
//!
//! The interpreter is the only place that decides which gesture may target
//! which pool. A `DragPayload` can only be built from a pool manager that
//! currently permits it, so an unrecognized payload cannot reach a drop.

use std::mem::take;

use super::pools::{Location, MoveOutcome, PoolManager};
use super::shape::{Modality, PoolLabel, ShapeId};

/// What a pointer press or activation landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureTarget {
    /// The Primary pool's group region.
    PrimaryGroup,
    /// A single rendered shape.
    Shape(ShapeId),
}

/// Payload kind fixed at drag start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Group,
    Single(ShapeId),
}

/// Payload of one in-flight drag. Validated when built, never re-parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragPayload(PayloadKind);

impl DragPayload {
    /// A group payload, available only while Primary still has members.
    #[must_use]
    pub fn group(pools: &PoolManager) -> Option<Self> {
        (pools.remaining(PoolLabel::Primary) > 0).then_some(Self(PayloadKind::Group))
    }

    /// A single payload, available only for a shape resident in an
    /// individual-modality pool.
    #[must_use]
    pub fn single(pools: &PoolManager, id: ShapeId) -> Option<Self> {
        match pools.location(id)? {
            Location::Pool(pool) if pool.modality() == Modality::Individual => {
                Some(Self(PayloadKind::Single(id)))
            }
            _ => None,
        }
    }

    /// Resolve a press target into the payload it may carry.
    #[must_use]
    pub fn for_target(pools: &PoolManager, target: GestureTarget) -> Option<Self> {
        match target {
            GestureTarget::PrimaryGroup => Self::group(pools),
            GestureTarget::Shape(id) => Self::single(pools, id),
        }
    }

    #[must_use]
    pub fn kind(self) -> PayloadKind {
        self.0
    }
}

/// Raw interaction events, in arrival order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureEvent {
    DragStart(GestureTarget),
    /// Pointer moved during a drag; `over_drop_target` is whether it is
    /// above the accumulator.
    DragOver { over_drop_target: bool },
    /// Released over the accumulator.
    Drop,
    /// Released anywhere else, or the host aborted the drag.
    Cancel,
    /// Direct two-step activation (double-click, tap on the group, key).
    Activate(GestureTarget),
}

/// Per-session interpreter state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    DragInFlight {
        payload: DragPayload,
        over_drop_target: bool,
    },
}

impl GestureState {
    #[must_use]
    pub fn payload(&self) -> Option<DragPayload> {
        match self {
            GestureState::Idle => None,
            GestureState::DragInFlight { payload, .. } => Some(*payload),
        }
    }

    #[must_use]
    pub fn is_hovering_drop_target(&self) -> bool {
        matches!(
            self,
            GestureState::DragInFlight {
                over_drop_target: true,
                ..
            }
        )
    }
}

/// Why an event produced no transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoredGesture {
    /// The press target cannot carry a payload (empty Primary, a Primary
    /// shape, a counted or unknown shape).
    NotDraggable,
    /// Drag-over, drop or cancel arrived with no drag in flight.
    NoDragInFlight,
}

/// What handling one event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    DragStarted(PayloadKind),
    DragMoved,
    Dropped(MoveOutcome),
    Canceled,
    Activated(MoveOutcome),
    Ignored(IgnoredGesture),
}

impl GestureOutcome {
    /// Whether the pools changed.
    #[must_use]
    pub fn moved_shapes(self) -> bool {
        match self {
            GestureOutcome::Dropped(outcome) | GestureOutcome::Activated(outcome) => {
                outcome.is_moved()
            }
            _ => false,
        }
    }
}

/// Apply one event. Never fails: stale, duplicate and modality-violating
/// gestures come back as `Ignored` or as a `NoOp` move.
pub fn interpret(
    state: &mut GestureState,
    pools: &mut PoolManager,
    event: GestureEvent,
) -> GestureOutcome {
    match event {
        GestureEvent::DragStart(target) => match DragPayload::for_target(pools, target) {
            Some(payload) => {
                // A press while another drag is in flight means the host lost
                // the release; the stale payload is discarded.
                *state = GestureState::DragInFlight {
                    payload,
                    over_drop_target: false,
                };
                GestureOutcome::DragStarted(payload.kind())
            }
            None => {
                *state = GestureState::Idle;
                GestureOutcome::Ignored(IgnoredGesture::NotDraggable)
            }
        },
        GestureEvent::DragOver { over_drop_target } => match state {
            GestureState::DragInFlight {
                over_drop_target: hovering,
                ..
            } => {
                *hovering = over_drop_target;
                GestureOutcome::DragMoved
            }
            GestureState::Idle => GestureOutcome::Ignored(IgnoredGesture::NoDragInFlight),
        },
        GestureEvent::Drop => match take(state) {
            GestureState::DragInFlight { payload, .. } => {
                GestureOutcome::Dropped(apply(pools, payload.kind()))
            }
            GestureState::Idle => GestureOutcome::Ignored(IgnoredGesture::NoDragInFlight),
        },
        GestureEvent::Cancel => match take(state) {
            GestureState::DragInFlight { .. } => GestureOutcome::Canceled,
            GestureState::Idle => GestureOutcome::Ignored(IgnoredGesture::NoDragInFlight),
        },
        GestureEvent::Activate(target) => {
            // Zero-duration: an in-flight drag is left as it is; its own drop
            // will then find the shapes already counted.
            let outcome = match target {
                GestureTarget::PrimaryGroup => pools.move_group(PoolLabel::Primary),
                GestureTarget::Shape(id) => pools.move_single(id),
            };
            GestureOutcome::Activated(outcome)
        }
    }
}

fn apply(pools: &mut PoolManager, kind: PayloadKind) -> MoveOutcome {
    match kind {
        PayloadKind::Group => pools.move_group(PoolLabel::Primary),
        PayloadKind::Single(id) => pools.move_single(id),
    }
}
