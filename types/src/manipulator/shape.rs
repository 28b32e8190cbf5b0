//! Shapes, pool labels and validated addends.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// One of the (at most) three source pools.
///
/// Ordering is `Primary < Secondary < Tertiary`, which is the first key of
/// the accumulator's canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PoolLabel {
    Primary,
    Secondary,
    Tertiary,
}

/// How shapes may leave a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modality {
    /// All remaining members leave together, never partially.
    GroupOnly,
    /// Each member may leave on its own.
    Individual,
}

impl PoolLabel {
    pub const ALL: [PoolLabel; 3] = [PoolLabel::Primary, PoolLabel::Secondary, PoolLabel::Tertiary];

    #[must_use]
    pub const fn modality(self) -> Modality {
        match self {
            PoolLabel::Primary => Modality::GroupOnly,
            PoolLabel::Secondary | PoolLabel::Tertiary => Modality::Individual,
        }
    }

    #[must_use]
    pub const fn visual_tag(self) -> VisualTag {
        match self {
            PoolLabel::Primary => VisualTag::Blue,
            PoolLabel::Secondary => VisualTag::Green,
            PoolLabel::Tertiary => VisualTag::Orange,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            PoolLabel::Primary => "Primary",
            PoolLabel::Secondary => "Secondary",
            PoolLabel::Tertiary => "Tertiary",
        }
    }
}

impl fmt::Display for PoolLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Color category a renderer uses for a shape. Opaque to the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisualTag {
    Blue,
    Green,
    Orange,
}

/// Stable identity of a shape: its origin pool plus its index within that pool.
///
/// The derived ordering (pool first, then index) is the canonical order used
/// for the accumulator's layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShapeId {
    pool: PoolLabel,
    index: u32,
}

impl ShapeId {
    #[must_use]
    pub const fn new(pool: PoolLabel, index: u32) -> Self {
        Self { pool, index }
    }

    #[must_use]
    pub const fn pool(self) -> PoolLabel {
        self.pool
    }

    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.pool, self.index)
    }
}

/// An immutable unit token. Created once per session initialization and
/// only ever relocated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    id: ShapeId,
    origin_pool: PoolLabel,
    visual_tag: VisualTag,
}

impl Shape {
    pub(crate) fn new(origin_pool: PoolLabel, index: u32) -> Self {
        Self {
            id: ShapeId::new(origin_pool, index),
            origin_pool,
            visual_tag: origin_pool.visual_tag(),
        }
    }

    #[must_use]
    pub fn id(&self) -> ShapeId {
        self.id
    }

    #[must_use]
    pub fn origin_pool(&self) -> PoolLabel {
        self.origin_pool
    }

    #[must_use]
    pub fn visual_tag(&self) -> VisualTag {
        self.visual_tag
    }
}

// ============================================================================
// Addends
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddendDefect {
    Negative,
    NonInteger,
    OutOfRange,
}

impl fmt::Display for AddendDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AddendDefect::Negative => "is negative",
            AddendDefect::NonInteger => "is not a whole number",
            AddendDefect::OutOfRange => "is too large",
        })
    }
}

/// Construction-time failure: an addend count that cannot become a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("addend for the {pool} pool {defect}")]
pub struct InvalidAddend {
    pub pool: PoolLabel,
    pub defect: AddendDefect,
}

/// The counts a session is built from. Holding one proves every count is a
/// non-negative integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Addends {
    num1: u32,
    num2: u32,
    num3: Option<u32>,
}

impl Addends {
    #[must_use]
    pub const fn new(num1: u32, num2: u32, num3: Option<u32>) -> Self {
        Self { num1, num2, num3 }
    }

    /// Validate loosely-typed numbers (e.g. decoded from JSON).
    pub fn try_from_f64(num1: f64, num2: f64, num3: Option<f64>) -> Result<Self, InvalidAddend> {
        Ok(Self {
            num1: addend_from_f64(PoolLabel::Primary, num1)?,
            num2: addend_from_f64(PoolLabel::Secondary, num2)?,
            num3: num3
                .map(|n| addend_from_f64(PoolLabel::Tertiary, n))
                .transpose()?,
        })
    }

    #[must_use]
    pub const fn num1(self) -> u32 {
        self.num1
    }

    #[must_use]
    pub const fn num2(self) -> u32 {
        self.num2
    }

    #[must_use]
    pub const fn num3(self) -> Option<u32> {
        self.num3
    }

    /// Count for a pool; `None` when the pool is absent (Tertiary without a third addend).
    #[must_use]
    pub const fn count(self, pool: PoolLabel) -> Option<u32> {
        match pool {
            PoolLabel::Primary => Some(self.num1),
            PoolLabel::Secondary => Some(self.num2),
            PoolLabel::Tertiary => self.num3,
        }
    }

    /// `num1 + num2 + (num3 ?? 0)`, the conserved shape count.
    #[must_use]
    pub fn sum(self) -> u64 {
        u64::from(self.num1) + u64::from(self.num2) + u64::from(self.num3.unwrap_or(0))
    }
}

impl TryFrom<(i64, i64, Option<i64>)> for Addends {
    type Error = InvalidAddend;

    fn try_from((num1, num2, num3): (i64, i64, Option<i64>)) -> Result<Self, Self::Error> {
        Ok(Self {
            num1: addend_from_i64(PoolLabel::Primary, num1)?,
            num2: addend_from_i64(PoolLabel::Secondary, num2)?,
            num3: num3
                .map(|n| addend_from_i64(PoolLabel::Tertiary, n))
                .transpose()?,
        })
    }
}

/// Parses `"3+2"` or `"1+2+3"`.
impl FromStr for Addends {
    type Err = InvalidAddend;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('+').map(str::trim);
        let mut next = |pool| -> Result<Option<u32>, InvalidAddend> {
            parts.next().map(|raw| addend_from_str(pool, raw)).transpose()
        };
        let num1 = next(PoolLabel::Primary)?.unwrap_or(0);
        let num2 = next(PoolLabel::Secondary)?.unwrap_or(0);
        let num3 = next(PoolLabel::Tertiary)?;
        if parts.next().is_some() {
            return Err(InvalidAddend {
                pool: PoolLabel::Tertiary,
                defect: AddendDefect::OutOfRange,
            });
        }
        Ok(Self { num1, num2, num3 })
    }
}

fn addend_from_i64(pool: PoolLabel, value: i64) -> Result<u32, InvalidAddend> {
    if value < 0 {
        return Err(InvalidAddend {
            pool,
            defect: AddendDefect::Negative,
        });
    }
    u32::try_from(value).map_err(|_| InvalidAddend {
        pool,
        defect: AddendDefect::OutOfRange,
    })
}

fn addend_from_f64(pool: PoolLabel, value: f64) -> Result<u32, InvalidAddend> {
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(InvalidAddend {
            pool,
            defect: AddendDefect::NonInteger,
        });
    }
    if value < 0.0 {
        return Err(InvalidAddend {
            pool,
            defect: AddendDefect::Negative,
        });
    }
    if value > f64::from(u32::MAX) {
        return Err(InvalidAddend {
            pool,
            defect: AddendDefect::OutOfRange,
        });
    }
    Ok(value as u32)
}

fn addend_from_str(pool: PoolLabel, raw: &str) -> Result<u32, InvalidAddend> {
    if let Ok(value) = raw.parse::<i64>() {
        return addend_from_i64(pool, value);
    }
    match raw.parse::<f64>() {
        Ok(value) => addend_from_f64(pool, value),
        Err(_) => Err(InvalidAddend {
            pool,
            defect: AddendDefect::NonInteger,
        }),
    }
}
