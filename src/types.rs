use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Collision axis. A category tests one axis; a range writes one axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

/// Neighbor direction used by constraints. Grid Y grows downward, so `Top`
/// is `gy - 1`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// The tile's own cell.
    None,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
    TopLeft,
}

impl Orientation {
    pub const COUNT: usize = 9;

    pub const ALL: [Orientation; Self::COUNT] = [
        Orientation::None,
        Orientation::Top,
        Orientation::TopRight,
        Orientation::Right,
        Orientation::BottomRight,
        Orientation::Bottom,
        Orientation::BottomLeft,
        Orientation::Left,
        Orientation::TopLeft,
    ];

    /// Grid cell offset `(dx, dy)` of the neighbor in this direction.
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Orientation::None => (0, 0),
            Orientation::Top => (0, -1),
            Orientation::TopRight => (1, -1),
            Orientation::Right => (1, 0),
            Orientation::BottomRight => (1, 1),
            Orientation::Bottom => (0, 1),
            Orientation::BottomLeft => (-1, 1),
            Orientation::Left => (-1, 0),
            Orientation::TopLeft => (-1, -1),
        }
    }

    #[inline]
    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

/// Index of a formula inside a [`CollisionRules`](crate::CollisionRules) arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FormulaId(pub u32);

/// Index of a group; also its bit position in a [`GroupMask`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupId(pub u32);

/// Index of a category.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CategoryId(pub u32);

/// Identity of one loaded [`CollisionRules`](crate::CollisionRules) set.
/// Categories carry the id of the set that built them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct RulesId(pub u64);

/// Bitmask set of groups. Bit `n` is [`GroupId`]`(n)`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct GroupMask(pub u64);

impl GroupMask {
    pub const EMPTY: GroupMask = GroupMask(0);
    /// Number of distinct groups a mask can carry.
    pub const CAPACITY: usize = 64;

    pub fn single(id: GroupId) -> Self {
        GroupMask(1u64 << id.0)
    }

    pub fn insert(&mut self, id: GroupId) {
        self.0 |= 1u64 << id.0;
    }

    pub fn contains(self, id: GroupId) -> bool {
        (self.0 >> id.0) & 1 == 1
    }

    pub fn intersects(self, other: GroupMask) -> bool {
        (self.0 & other.0) != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }
}

/// Identity of a tile graphic: which sheet and which index on it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileId {
    pub sheet: u32,
    pub index: u32,
}

impl TileId {
    pub const fn new(sheet: u32, index: u32) -> Self {
        Self { sheet, index }
    }
}

/// A grid cell as seen by the resolver. `id` is `None` for an empty cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TileRef {
    pub id: Option<TileId>,
    pub grid_x: i32,
    pub grid_y: i32,
    pub width: u32,
    pub height: u32,
}

impl TileRef {
    /// Cell with no tile in it (map edge or hole).
    pub const fn vacant(grid_x: i32, grid_y: i32, width: u32, height: u32) -> Self {
        Self { id: None, grid_x, grid_y, width, height }
    }

    pub fn is_vacant(&self) -> bool {
        self.id.is_none()
    }

    /// World-space top-left corner of the cell.
    pub fn origin(&self) -> DVec2 {
        DVec2::new(
            self.grid_x as f64 * self.width as f64,
            self.grid_y as f64 * self.height as f64,
        )
    }
}

/// Outcome of one resolver call.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CollisionResult {
    /// Blocking world X, if the category tests X and a formula matched.
    pub x: Option<f64>,
    /// Blocking world Y, if the category tests Y and a formula matched.
    pub y: Option<f64>,
    /// Last cell examined.
    pub tile: TileRef,
}

impl CollisionResult {
    pub const fn empty(tile: TileRef) -> Self {
        Self { x: None, y: None, tile }
    }

    pub fn is_hit(&self) -> bool {
        self.x.is_some() || self.y.is_some()
    }

    /// Clamp a sample point to whichever coordinates were found. For an entity
    /// origin use [`CollisionCategory::apply`](crate::CollisionCategory::apply).
    pub fn apply(&self, pos: &mut DVec2) {
        if let Some(x) = self.x {
            pos.x = x;
        }
        if let Some(y) = self.y {
            pos.y = y;
        }
    }
}

/// When to re-probe the old cell after a miss in the new one.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lookback {
    Disabled,
    /// Old and new cells differ along the category's axis.
    #[default]
    AxisCellChange,
    /// Old and new cells differ along either axis.
    AnyCellChange,
}

/// Resolver configuration.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolverConfig {
    #[serde(default)]
    pub lookback: Lookback,
}

/// Counts for a loaded rule set.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RulesStats {
    pub formulas: usize,
    pub groups: usize,
    pub categories: usize,
    /// Formulas with at least one non-empty constraint entry.
    pub constrained_formulas: usize,
}
