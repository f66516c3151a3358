use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::types::{Axis, CollisionResult, FormulaId, GroupId, GroupMask, RulesId, TileId};

/// A run of tiles on one sheet that belongs to a group.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileSpan {
    Tile { sheet: u32, index: u32 },
    /// Inclusive index range.
    Range { sheet: u32, first: u32, last: u32 },
}

impl TileSpan {
    pub fn contains(&self, tile: TileId) -> bool {
        match *self {
            TileSpan::Tile { sheet, index } => tile.sheet == sheet && tile.index == index,
            TileSpan::Range { sheet, first, last } => tile.sheet == sheet && first <= tile.index && tile.index <= last,
        }
    }
}

/// Named tile set sharing an ordered formula list.
#[derive(Clone, Debug, PartialEq)]
pub struct CollisionGroup {
    pub name: String,
    pub tiles: Vec<TileSpan>,
    /// Order is the first-match tie-break order.
    pub formulas: Vec<FormulaId>,
}

impl CollisionGroup {
    pub fn contains_tile(&self, tile: TileId) -> bool {
        self.tiles.iter().any(|s| s.contains(tile))
    }
}

/// A test point on an entity: one axis, an offset from the entity origin, and
/// the groups whose formulas are relevant to it.
#[derive(Clone, Debug, PartialEq)]
pub struct CollisionCategory {
    pub name: String,
    pub axis: Axis,
    pub offset_x: i32,
    pub offset_y: i32,
    pub(crate) groups: Vec<GroupId>,
    pub(crate) mask: GroupMask,
    pub(crate) formulas: Vec<FormulaId>,
    pub(crate) rules: RulesId,
}

impl CollisionCategory {
    pub fn offset(&self) -> DVec2 {
        DVec2::new(self.offset_x as f64, self.offset_y as f64)
    }

    /// Groups in insertion order.
    pub fn groups(&self) -> &[GroupId] {
        &self.groups
    }

    pub fn group_mask(&self) -> GroupMask {
        self.mask
    }

    /// Rule set this category was built by.
    pub fn rules_id(&self) -> RulesId {
        self.rules
    }

    /// Union of the groups' formulas, de-duplicated, group order then formula order.
    pub fn formulas(&self) -> &[FormulaId] {
        &self.formulas
    }

    /// Clamp an entity origin with a result found for this test point.
    pub fn apply(&self, result: &CollisionResult, origin: &mut DVec2) {
        let mut sample = *origin + self.offset();
        result.apply(&mut sample);
        *origin = sample - self.offset();
    }
}
