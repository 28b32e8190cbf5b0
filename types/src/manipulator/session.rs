//! The manipulator session: pools, accumulator and the in-flight gesture for
//! one problem.

use super::gesture::{GestureEvent, GestureOutcome, GestureState, interpret};
use super::layout::{Arrangement, arrange};
use super::pools::{MoveOutcome, PoolManager, Snapshot};
use super::shape::{Addends, InvalidAddend, PoolLabel, ShapeId};

/// Exclusively owns every shape of one manipulator instance. Replaced
/// wholesale when the addends change; never merged or persisted.
#[derive(Debug, Clone)]
pub struct Session {
    pools: PoolManager,
    gesture: GestureState,
}

impl Session {
    #[must_use]
    pub fn new(addends: Addends) -> Self {
        Self {
            pools: PoolManager::new(addends),
            gesture: GestureState::Idle,
        }
    }

    pub fn from_counts(num1: i64, num2: i64, num3: Option<i64>) -> Result<Self, InvalidAddend> {
        Addends::try_from((num1, num2, num3)).map(Self::new)
    }

    /// Route one interaction event through the gesture interpreter.
    pub fn handle(&mut self, event: GestureEvent) -> GestureOutcome {
        interpret(&mut self.gesture, &mut self.pools, event)
    }

    pub fn move_group(&mut self, pool: PoolLabel) -> MoveOutcome {
        self.pools.move_group(pool)
    }

    pub fn move_single(&mut self, id: ShapeId) -> MoveOutcome {
        self.pools.move_single(id)
    }

    /// Return every counted shape to its pool. Any in-flight drag is
    /// dropped as well, so a stale payload cannot act on the restored pools.
    pub fn reset(&mut self) -> usize {
        self.gesture = GestureState::Idle;
        self.pools.reset()
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.pools.total()
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot<'_> {
        self.pools.snapshot()
    }

    /// Convenience for `arrange(&self.snapshot())`.
    #[must_use]
    pub fn arrangement(&self) -> Arrangement<'_> {
        arrange(&self.pools.snapshot())
    }

    #[must_use]
    pub fn pools(&self) -> &PoolManager {
        &self.pools
    }

    #[must_use]
    pub fn gesture(&self) -> &GestureState {
        &self.gesture
    }

    #[must_use]
    pub fn addends(&self) -> Addends {
        self.pools.addends()
    }

    /// Shapes that an individual move could still relocate, in display
    /// order (Secondary first, then Tertiary).
    #[must_use]
    pub fn movable_shapes(&self) -> Vec<ShapeId> {
        let snapshot = self.pools.snapshot();
        snapshot
            .secondary
            .iter()
            .chain(snapshot.tertiary.iter().flatten())
            .map(|shape| shape.id())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::Session;
    use crate::manipulator::gesture::{GestureEvent, GestureState, GestureTarget};
    use crate::manipulator::shape::{Addends, PoolLabel, ShapeId};

    #[test]
    fn three_plus_two_walkthrough() {
        let mut session = Session::from_counts(3, 2, None).unwrap();

        session.handle(GestureEvent::Activate(GestureTarget::PrimaryGroup));
        assert_eq!(session.total(), 3);
        assert_eq!(session.pools().remaining(PoolLabel::Primary), 0);

        let shape_a = ShapeId::new(PoolLabel::Secondary, 0);
        session.move_single(shape_a);
        assert_eq!(session.total(), 4);
        session.move_single(shape_a);
        assert_eq!(session.total(), 4);

        session.reset();
        assert_eq!(session.total(), 0);
        assert_eq!(session.pools().remaining(PoolLabel::Primary), 3);
        assert_eq!(session.pools().remaining(PoolLabel::Secondary), 2);
    }

    #[test]
    fn empty_primary_group_move_is_silent() {
        let mut session = Session::from_counts(0, 4, Some(2)).unwrap();
        assert!(!session.move_group(PoolLabel::Primary).is_moved());
        assert_eq!(session.total(), 0);
    }

    #[test]
    fn invalid_counts_create_no_session() {
        assert!(Session::from_counts(-1, 2, None).is_err());
    }

    #[test]
    fn reset_discards_in_flight_drag() {
        let mut session = Session::new(Addends::new(2, 1, None));
        session.handle(GestureEvent::DragStart(GestureTarget::PrimaryGroup));
        assert!(session.gesture().payload().is_some());
        session.reset();
        assert_eq!(*session.gesture(), GestureState::Idle);
    }

    #[test]
    fn movable_shapes_list_individual_pools_only() {
        let mut session = Session::new(Addends::new(2, 2, Some(1)));
        session.move_single(ShapeId::new(PoolLabel::Secondary, 0));
        let movable: Vec<String> = session
            .movable_shapes()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(movable, ["Secondary-1", "Tertiary-0"]);
    }
}
