//! Manipulator invariants over arbitrary addends and gesture sequences.

use std::collections::HashSet;

use proptest::prelude::*;
use tally_types::manipulator::{
    AddendDefect, Addends, Column, GestureEvent, GestureOutcome, GestureState, GestureTarget,
    IgnoredGesture, Location, MoveOutcome, NoOpReason, PoolLabel, Session, Shape, ShapeId,
    canonical_order,
};

// ── Strategies ──────────────────────────────────────────────────────────

/// Counts up to 15 with 0 and an absent Tertiary pool both reachable.
fn addends_strategy() -> impl Strategy<Value = Addends> {
    (0u32..=15, 0u32..=15, prop::option::of(0u32..=9))
        .prop_map(|(num1, num2, num3)| Addends::new(num1, num2, num3))
}

/// Shape indices run past every pool's size so unknown ids show up too.
fn target_strategy() -> impl Strategy<Value = GestureTarget> {
    prop_oneof![
        Just(GestureTarget::PrimaryGroup),
        (0u32..18).prop_map(|i| GestureTarget::Shape(ShapeId::new(PoolLabel::Primary, i))),
        (0u32..18).prop_map(|i| GestureTarget::Shape(ShapeId::new(PoolLabel::Secondary, i))),
        (0u32..12).prop_map(|i| GestureTarget::Shape(ShapeId::new(PoolLabel::Tertiary, i))),
    ]
}

fn event_strategy() -> impl Strategy<Value = GestureEvent> {
    prop_oneof![
        target_strategy().prop_map(GestureEvent::DragStart),
        any::<bool>().prop_map(|over_drop_target| GestureEvent::DragOver { over_drop_target }),
        Just(GestureEvent::Drop),
        Just(GestureEvent::Cancel),
        target_strategy().prop_map(GestureEvent::Activate),
    ]
}

fn pool_strategy() -> impl Strategy<Value = PoolLabel> {
    prop_oneof![
        Just(PoolLabel::Primary),
        Just(PoolLabel::Secondary),
        Just(PoolLabel::Tertiary),
    ]
}

fn shape_id_strategy() -> impl Strategy<Value = ShapeId> {
    (pool_strategy(), 0u32..18).prop_map(|(pool, index)| ShapeId::new(pool, index))
}

/// One interaction: a raw gesture, a direct move, or a reset.
#[derive(Debug, Clone, Copy)]
enum Step {
    Gesture(GestureEvent),
    Group(PoolLabel),
    Single(ShapeId),
    Reset,
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        6 => event_strategy().prop_map(Step::Gesture),
        2 => pool_strategy().prop_map(Step::Group),
        2 => shape_id_strategy().prop_map(Step::Single),
        1 => Just(Step::Reset),
    ]
}

fn steps_strategy() -> impl Strategy<Value = Vec<Step>> {
    prop::collection::vec(step_strategy(), 0..120)
}

// ── Helpers ─────────────────────────────────────────────────────────────

fn ids(shapes: &[&Shape]) -> Vec<ShapeId> {
    shapes.iter().map(|shape| shape.id()).collect()
}

fn apply(session: &mut Session, step: Step) {
    match step {
        Step::Gesture(event) => {
            session.handle(event);
        }
        Step::Group(pool) => {
            session.move_group(pool);
        }
        Step::Single(id) => {
            session.move_single(id);
        }
        Step::Reset => {
            session.reset();
        }
    }
}

fn run(addends: Addends, steps: &[Step]) -> Session {
    let mut session = Session::new(addends);
    for step in steps {
        apply(&mut session, *step);
    }
    session
}

/// Every shape is in exactly one container and none went missing.
fn check_conserved(session: &Session) -> Result<(), TestCaseError> {
    let snapshot = session.snapshot();
    let mut seen = HashSet::new();
    let mut count = 0u64;
    let containers = [
        Some(snapshot.primary.as_slice()),
        Some(snapshot.secondary.as_slice()),
        snapshot.tertiary.as_deref(),
        Some(snapshot.accumulator.as_slice()),
    ];
    for container in containers.into_iter().flatten() {
        for id in ids(container) {
            prop_assert!(seen.insert(id), "{} appears twice", id);
            count += 1;
        }
    }
    prop_assert_eq!(count, session.addends().sum());
    prop_assert_eq!(session.total(), snapshot.accumulator.len());
    prop_assert_eq!(
        snapshot.tertiary.is_some(),
        session.addends().num3().is_some(),
        "Tertiary must exist exactly when it has an addend"
    );
    Ok(())
}

/// Ids in every container, for before/after comparisons.
fn layout(session: &Session) -> [Vec<ShapeId>; 4] {
    let snapshot = session.snapshot();
    [
        ids(&snapshot.primary),
        ids(&snapshot.secondary),
        snapshot.tertiary.as_deref().map(ids).unwrap_or_default(),
        ids(&snapshot.accumulator),
    ]
}

// ── Properties ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn conservation_holds_after_every_step(
        addends in addends_strategy(),
        steps in steps_strategy(),
    ) {
        let mut session = Session::new(addends);
        check_conserved(&session)?;
        for step in steps {
            let before = session.total();
            apply(&mut session, step);
            check_conserved(&session)?;
            if !matches!(step, Step::Reset) {
                prop_assert!(
                    session.total() >= before,
                    "only a reset may shrink the accumulator ({} -> {} after {:?})",
                    before, session.total(), step
                );
            }
        }
    }

    #[test]
    fn repeated_single_move_changes_nothing(
        addends in addends_strategy(),
        steps in steps_strategy(),
        id in shape_id_strategy(),
    ) {
        let mut session = run(addends, &steps);
        session.move_single(id);
        let settled = layout(&session);
        let revision = session.pools().revision();

        let again = session.move_single(id);
        prop_assert!(!again.is_moved(), "second move of {} was {:?}", id, again);
        prop_assert_eq!(layout(&session), settled);
        prop_assert_eq!(session.pools().revision(), revision);
    }

    #[test]
    fn repeated_group_move_changes_nothing(
        addends in addends_strategy(),
        steps in steps_strategy(),
    ) {
        let mut session = run(addends, &steps);
        let remaining = session.pools().remaining(PoolLabel::Primary);
        let before = session.total();

        let first = session.move_group(PoolLabel::Primary);
        if remaining == 0 {
            prop_assert_eq!(first, MoveOutcome::NoOp(NoOpReason::PoolEmpty));
        } else {
            prop_assert_eq!(first, MoveOutcome::Moved { count: remaining });
        }
        prop_assert_eq!(session.total(), before + remaining);

        let settled = layout(&session);
        prop_assert_eq!(
            session.move_group(PoolLabel::Primary),
            MoveOutcome::NoOp(NoOpReason::PoolEmpty)
        );
        prop_assert_eq!(layout(&session), settled);
    }

    #[test]
    fn repeated_drop_after_activation_changes_nothing(
        addends in addends_strategy(),
        steps in steps_strategy(),
        target in target_strategy(),
    ) {
        let mut session = run(addends, &steps);
        session.handle(GestureEvent::Cancel);
        session.handle(GestureEvent::DragStart(target));
        session.handle(GestureEvent::Activate(target));
        let settled = layout(&session);

        let outcome = session.handle(GestureEvent::Drop);
        prop_assert!(!outcome.moved_shapes(), "stale drop moved shapes: {:?}", outcome);
        prop_assert_eq!(layout(&session), settled);
    }

    #[test]
    fn reset_restores_the_initial_layout(
        addends in addends_strategy(),
        steps in steps_strategy(),
    ) {
        let initial = layout(&Session::new(addends));
        let mut session = run(addends, &steps);
        let counted = session.total();

        prop_assert_eq!(session.reset(), counted);
        prop_assert_eq!(session.total(), 0);
        prop_assert_eq!(session.gesture(), &GestureState::Idle);
        prop_assert_eq!(layout(&session), initial);
    }

    #[test]
    fn group_pools_never_move_piecemeal(
        addends in addends_strategy(),
        steps in steps_strategy(),
    ) {
        let mut session = Session::new(addends);
        for step in steps {
            apply(&mut session, step);
            let remaining = session.pools().remaining(PoolLabel::Primary);
            prop_assert!(
                remaining == 0 || remaining == addends.num1() as usize,
                "Primary split into {} of {}", remaining, addends.num1()
            );
        }
    }
}

// ── Scenarios ───────────────────────────────────────────────────────────

#[test]
fn modality_is_enforced_for_every_primary_shape() {
    let mut session = Session::from_counts(3, 1, None).unwrap();
    for index in 0..3 {
        let id = ShapeId::new(PoolLabel::Primary, index);
        assert_eq!(
            session.move_single(id),
            MoveOutcome::NoOp(NoOpReason::WrongModality)
        );
        assert_eq!(
            session.handle(GestureEvent::DragStart(GestureTarget::Shape(id))),
            GestureOutcome::Ignored(IgnoredGesture::NotDraggable)
        );
    }
    assert_eq!(session.move_group(PoolLabel::Secondary), MoveOutcome::NoOp(NoOpReason::WrongModality));
    assert_eq!(session.total(), 0);
}

#[test]
fn three_plus_two_scenario() {
    let mut session = Session::from_counts(3, 2, None).unwrap();
    assert!(session.move_group(PoolLabel::Primary).is_moved());
    assert_eq!(session.total(), 3);
    assert!(session.snapshot().primary.is_empty());

    let a = ShapeId::new(PoolLabel::Secondary, 0);
    assert!(session.move_single(a).is_moved());
    assert_eq!(session.total(), 4);
    assert_eq!(
        session.move_single(a),
        MoveOutcome::NoOp(NoOpReason::AlreadyCounted)
    );
    assert_eq!(session.total(), 4);

    session.reset();
    let snapshot = session.snapshot();
    assert_eq!(session.total(), 0);
    assert_eq!(snapshot.primary.len(), 3);
    assert_eq!(snapshot.secondary.len(), 2);
}

#[test]
fn empty_primary_group_move_is_noop() {
    let mut session = Session::from_counts(0, 4, Some(2)).unwrap();
    assert_eq!(
        session.move_group(PoolLabel::Primary),
        MoveOutcome::NoOp(NoOpReason::PoolEmpty)
    );
    assert_eq!(session.total(), 0);
    assert_eq!(
        session.handle(GestureEvent::DragStart(GestureTarget::PrimaryGroup)),
        GestureOutcome::Ignored(IgnoredGesture::NotDraggable)
    );
}

#[test]
fn accumulator_order_ignores_move_order() {
    let picks = [
        ShapeId::new(PoolLabel::Secondary, 2),
        ShapeId::new(PoolLabel::Tertiary, 0),
        ShapeId::new(PoolLabel::Secondary, 0),
    ];
    let mut forward = Session::from_counts(2, 3, Some(1)).unwrap();
    let mut backward = forward.clone();

    forward.move_group(PoolLabel::Primary);
    for id in picks {
        forward.move_single(id);
    }
    for id in picks.iter().rev() {
        backward.move_single(*id);
    }
    backward.move_group(PoolLabel::Primary);

    assert_eq!(forward.arrangement(), backward.arrangement());
    let order: Vec<String> = forward.arrangement().accumulator[0]
        .shapes
        .iter()
        .map(|shape| shape.id().to_string())
        .collect();
    assert_eq!(
        order,
        ["Primary-0", "Primary-1", "Secondary-0", "Secondary-2", "Tertiary-0"]
    );
}

#[test]
fn canonical_order_example() {
    let mut session = Session::from_counts(1, 3, None).unwrap();
    session.move_single(ShapeId::new(PoolLabel::Secondary, 2));
    session.move_group(PoolLabel::Primary);
    session.move_single(ShapeId::new(PoolLabel::Secondary, 0));
    let snapshot = session.snapshot();
    let mut members = snapshot.accumulator.clone();
    canonical_order(&mut members);
    let names: Vec<String> = members.iter().map(|s| s.id().to_string()).collect();
    assert_eq!(names, ["Primary-0", "Secondary-0", "Secondary-2"]);
}

#[test]
fn duplicate_drop_after_activation_is_harmless() {
    let mut session = Session::from_counts(1, 2, None).unwrap();
    let id = ShapeId::new(PoolLabel::Secondary, 1);
    session.handle(GestureEvent::DragStart(GestureTarget::Shape(id)));
    session.handle(GestureEvent::Activate(GestureTarget::Shape(id)));
    assert_eq!(session.total(), 1);

    let outcome = session.handle(GestureEvent::Drop);
    assert!(!outcome.moved_shapes());
    assert_eq!(session.total(), 1);
    assert_eq!(
        session.pools().location(id),
        Some(Location::Accumulator)
    );
    check_conserved(&session).unwrap();
}

#[test]
fn large_accumulator_forms_columns_of_five() {
    let mut session = Session::from_counts(9, 9, Some(9)).unwrap();
    session.move_group(PoolLabel::Primary);
    for pool in [PoolLabel::Secondary, PoolLabel::Tertiary] {
        for index in 0..9 {
            session.move_single(ShapeId::new(pool, index));
        }
    }
    let arrangement = session.arrangement();
    let heights: Vec<usize> = arrangement
        .accumulator
        .iter()
        .map(|column| column.shapes.len())
        .collect();
    assert_eq!(heights, [5, 5, 5, 5, 5, 2]);
    let closes: Vec<bool> = arrangement
        .accumulator
        .iter()
        .map(Column::closes_ten)
        .collect();
    assert_eq!(closes, [false, true, false, true, false, true]);
}

#[test]
fn invalid_addends_are_rejected_before_a_session_exists() {
    let err = Session::from_counts(2, -1, None).unwrap_err();
    assert_eq!(err.pool, PoolLabel::Secondary);
    assert_eq!(err.defect, AddendDefect::Negative);

    let err = Addends::try_from_f64(1.5, 2.0, None).unwrap_err();
    assert_eq!(err.defect, AddendDefect::NonInteger);

    let parsed: Addends = "1 + 2 + 3".parse().unwrap();
    assert_eq!(parsed.sum(), 6);
    assert!("1+x".parse::<Addends>().is_err());
}
