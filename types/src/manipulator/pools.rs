//! Pool manager: the owned set-membership structure behind the manipulator.
//!
//! Every shape lives in one arena slot tagged with its current container.
//! Moves rewrite tags; nothing is ever spliced, cloned or dropped, so the
//! conservation and no-duplication invariants hold by construction.

use super::shape::{Addends, InvalidAddend, Modality, PoolLabel, Shape, ShapeId};

/// Where a shape currently resides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Pool(PoolLabel),
    Accumulator,
}

/// Why a move request left the state unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoOpReason {
    /// The pool has no remaining members (already moved, or started empty).
    PoolEmpty,
    /// The pool does not exist in this session.
    PoolAbsent,
    /// The shape is already in the accumulator.
    AlreadyCounted,
    /// No shape with this id exists in this session.
    UnknownShape,
    /// The request does not match the pool's move modality.
    WrongModality,
}

/// Result of a move request. Moves never fail; they either relocate shapes
/// or leave the session untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved { count: usize },
    NoOp(NoOpReason),
}

impl MoveOutcome {
    #[must_use]
    pub fn is_moved(self) -> bool {
        matches!(self, MoveOutcome::Moved { .. })
    }
}

#[derive(Debug, Clone)]
struct Slot {
    shape: Shape,
    location: Location,
}

/// Owns the source pools and the accumulator for one session.
#[derive(Debug, Clone)]
pub struct PoolManager {
    addends: Addends,
    /// Sorted by `ShapeId`, so `binary_search` finds any shape.
    slots: Vec<Slot>,
    revision: u64,
}

impl PoolManager {
    #[must_use]
    pub fn new(addends: Addends) -> Self {
        let mut manager = Self {
            addends,
            slots: Vec::new(),
            revision: 0,
        };
        manager.initialize(addends);
        manager
    }

    /// Build from raw counts, rejecting negative ones.
    pub fn from_counts(num1: i64, num2: i64, num3: Option<i64>) -> Result<Self, InvalidAddend> {
        Addends::try_from((num1, num2, num3)).map(Self::new)
    }

    /// (Re)create every pool from `addends` and clear the accumulator.
    ///
    /// Shape identities are minted fresh; any id from a previous
    /// initialization that is not re-minted becomes unknown.
    pub fn initialize(&mut self, addends: Addends) {
        self.addends = addends;
        self.slots.clear();
        for pool in PoolLabel::ALL {
            let Some(count) = addends.count(pool) else {
                continue;
            };
            self.slots.extend((0..count).map(|index| Slot {
                shape: Shape::new(pool, index),
                location: Location::Pool(pool),
            }));
        }
        self.bump();
    }

    /// Move every remaining member of a group-only pool in one step.
    pub fn move_group(&mut self, pool: PoolLabel) -> MoveOutcome {
        if pool.modality() != Modality::GroupOnly {
            return MoveOutcome::NoOp(NoOpReason::WrongModality);
        }
        if !self.has_pool(pool) {
            return MoveOutcome::NoOp(NoOpReason::PoolAbsent);
        }

        let mut count = 0;
        for slot in &mut self.slots {
            if slot.location == Location::Pool(pool) {
                slot.location = Location::Accumulator;
                count += 1;
            }
        }

        if count == 0 {
            return MoveOutcome::NoOp(NoOpReason::PoolEmpty);
        }
        self.bump();
        MoveOutcome::Moved { count }
    }

    /// Move one shape out of an individual-modality pool.
    pub fn move_single(&mut self, id: ShapeId) -> MoveOutcome {
        let Some(index) = self.slot_index(id) else {
            return MoveOutcome::NoOp(NoOpReason::UnknownShape);
        };
        let slot = &mut self.slots[index];
        match slot.location {
            Location::Accumulator => MoveOutcome::NoOp(NoOpReason::AlreadyCounted),
            Location::Pool(pool) if pool.modality() != Modality::Individual => {
                MoveOutcome::NoOp(NoOpReason::WrongModality)
            }
            Location::Pool(_) => {
                slot.location = Location::Accumulator;
                self.bump();
                MoveOutcome::Moved { count: 1 }
            }
        }
    }

    /// Return every counted shape to its origin pool. Identities are kept.
    ///
    /// Returns how many shapes went back.
    pub fn reset(&mut self) -> usize {
        let mut returned = 0;
        for slot in &mut self.slots {
            if slot.location == Location::Accumulator {
                slot.location = Location::Pool(slot.shape.origin_pool());
                returned += 1;
            }
        }
        if returned > 0 {
            self.bump();
        }
        returned
    }

    /// Shapes currently in the accumulator.
    #[must_use]
    pub fn total(&self) -> usize {
        self.count_at(Location::Accumulator)
    }

    /// Shapes still in `pool`; zero for an absent pool.
    #[must_use]
    pub fn remaining(&self, pool: PoolLabel) -> usize {
        self.count_at(Location::Pool(pool))
    }

    #[must_use]
    pub fn has_pool(&self, pool: PoolLabel) -> bool {
        self.addends.count(pool).is_some()
    }

    #[must_use]
    pub fn location(&self, id: ShapeId) -> Option<Location> {
        self.slot_index(id).map(|index| self.slots[index].location)
    }

    #[must_use]
    pub fn addends(&self) -> Addends {
        self.addends
    }

    /// Incremented on every effective mutation. No-op moves and resets that
    /// return nothing leave it unchanged.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Read-only views of the pools and the accumulator, each in canonical
    /// (pool, index) order.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot<'_> {
        let mut snapshot = Snapshot {
            primary: Vec::new(),
            secondary: Vec::new(),
            tertiary: self.has_pool(PoolLabel::Tertiary).then(Vec::new),
            accumulator: Vec::new(),
        };
        for slot in &self.slots {
            let bucket = match slot.location {
                Location::Accumulator => &mut snapshot.accumulator,
                Location::Pool(PoolLabel::Primary) => &mut snapshot.primary,
                Location::Pool(PoolLabel::Secondary) => &mut snapshot.secondary,
                Location::Pool(PoolLabel::Tertiary) => match snapshot.tertiary.as_mut() {
                    Some(bucket) => bucket,
                    None => continue,
                },
            };
            bucket.push(&slot.shape);
        }
        snapshot
    }

    fn slot_index(&self, id: ShapeId) -> Option<usize> {
        self.slots
            .binary_search_by_key(&id, |slot| slot.shape.id())
            .ok()
    }

    fn count_at(&self, location: Location) -> usize {
        self.slots
            .iter()
            .filter(|slot| slot.location == location)
            .count()
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

/// Borrowed view of a session's containers for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot<'a> {
    pub primary: Vec<&'a Shape>,
    pub secondary: Vec<&'a Shape>,
    /// `None` when the session has no third addend.
    pub tertiary: Option<Vec<&'a Shape>>,
    pub accumulator: Vec<&'a Shape>,
}

impl<'a> Snapshot<'a> {
    /// Members of a source pool; `None` for an absent pool.
    #[must_use]
    pub fn pool(&self, pool: PoolLabel) -> Option<&[&'a Shape]> {
        match pool {
            PoolLabel::Primary => Some(&self.primary),
            PoolLabel::Secondary => Some(&self.secondary),
            PoolLabel::Tertiary => self.tertiary.as_deref(),
        }
    }
}
