//! Screen-space hit testing for the manipulator.
//!
//! The renderer records where it drew each interactive element; the input
//! layer asks the map what sits under the pointer. Rebuilt every frame.

use crate::manipulator::GestureTarget;

/// A screen rectangle in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Region {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Region {
    #[must_use]
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[must_use]
    pub fn contains(&self, column: u16, row: u16) -> bool {
        column >= self.x
            && row >= self.y
            && u32::from(column) < u32::from(self.x) + u32::from(self.width)
            && u32::from(row) < u32::from(self.y) + u32::from(self.height)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[derive(Debug, Clone, Default)]
pub struct HitMap {
    targets: Vec<(Region, GestureTarget)>,
    drop_target: Option<Region>,
}

impl HitMap {
    pub fn clear(&mut self) {
        self.targets.clear();
        self.drop_target = None;
    }

    /// Register a draggable/activatable element. Later registrations sit on
    /// top of earlier ones.
    pub fn push_target(&mut self, region: Region, target: GestureTarget) {
        if !region.is_empty() {
            self.targets.push((region, target));
        }
    }

    pub fn set_drop_target(&mut self, region: Region) {
        self.drop_target = (!region.is_empty()).then_some(region);
    }

    #[must_use]
    pub fn target_at(&self, column: u16, row: u16) -> Option<GestureTarget> {
        self.targets
            .iter()
            .rev()
            .find(|(region, _)| region.contains(column, row))
            .map(|(_, target)| *target)
    }

    #[must_use]
    pub fn over_drop_target(&self, column: u16, row: u16) -> bool {
        self.drop_target
            .is_some_and(|region| region.contains(column, row))
    }

    #[must_use]
    pub fn drop_target(&self) -> Option<Region> {
        self.drop_target
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty() && self.drop_target.is_none()
    }
}
