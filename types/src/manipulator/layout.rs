//! Deterministic chunk layout for rendering pools and the accumulator.
//!
//! Pure functions of a snapshot: the same membership always yields the same
//! arrangement, whatever order the moves happened in.

use super::pools::Snapshot;
use super::shape::{PoolLabel, Shape};

/// Shapes per stacked column.
pub const COLUMN_HEIGHT: usize = 5;

/// One stacked column of at most `COLUMN_HEIGHT` shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column<'a> {
    /// Formation order within the container, starting at 0.
    pub index: usize,
    /// Bottom-to-top.
    pub shapes: Vec<&'a Shape>,
}

impl Column<'_> {
    /// True for the second column of each pair, i.e. where a ten is complete.
    /// Renderers leave extra space after these.
    #[must_use]
    pub fn closes_ten(&self) -> bool {
        self.index % 2 == 1
    }
}

/// Sort shapes by origin pool, then by id.
pub fn canonical_order(shapes: &mut [&Shape]) {
    shapes.sort_by_key(|shape| (shape.origin_pool(), shape.id()));
}

/// Partition already-ordered members into columns of five.
#[must_use]
pub fn columns<'a>(members: &[&'a Shape]) -> Vec<Column<'a>> {
    members
        .chunks(COLUMN_HEIGHT)
        .enumerate()
        .map(|(index, chunk)| Column {
            index,
            shapes: chunk.to_vec(),
        })
        .collect()
}

/// Columns for every container of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arrangement<'a> {
    pub primary: Vec<Column<'a>>,
    pub secondary: Vec<Column<'a>>,
    pub tertiary: Option<Vec<Column<'a>>>,
    pub accumulator: Vec<Column<'a>>,
}

impl<'a> Arrangement<'a> {
    #[must_use]
    pub fn pool(&self, pool: PoolLabel) -> Option<&[Column<'a>]> {
        match pool {
            PoolLabel::Primary => Some(&self.primary),
            PoolLabel::Secondary => Some(&self.secondary),
            PoolLabel::Tertiary => self.tertiary.as_deref(),
        }
    }
}

/// Derive the full arrangement from a snapshot.
#[must_use]
pub fn arrange<'a>(snapshot: &Snapshot<'a>) -> Arrangement<'a> {
    let ordered = |members: &[&'a Shape]| {
        let mut members = members.to_vec();
        canonical_order(&mut members);
        columns(&members)
    };
    Arrangement {
        primary: ordered(snapshot.primary.as_slice()),
        secondary: ordered(snapshot.secondary.as_slice()),
        tertiary: snapshot.tertiary.as_deref().map(ordered),
        accumulator: ordered(snapshot.accumulator.as_slice()),
    }
}
