use crate::types::{GroupMask, Orientation};

/// Per-orientation group sets that suppress a formula.
///
/// If the neighbor in direction `D` belongs to any group in `blockers[D]`, the
/// edge is interior (solid on both sides) and the formula must not apply.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CollisionConstraint {
    blockers: [GroupMask; Orientation::COUNT],
}

impl CollisionConstraint {
    pub const NONE: CollisionConstraint = CollisionConstraint { blockers: [GroupMask::EMPTY; Orientation::COUNT] };

    pub fn with(mut self, orientation: Orientation, groups: GroupMask) -> Self {
        self.blockers[orientation.index()].0 |= groups.0;
        self
    }

    pub fn blockers(&self, orientation: Orientation) -> GroupMask {
        self.blockers[orientation.index()]
    }

    #[inline]
    pub fn is_blocked(&self, orientation: Orientation, neighbor_groups: GroupMask) -> bool {
        self.blockers[orientation.index()].intersects(neighbor_groups)
    }

    /// True if no orientation carries any blocker.
    pub fn is_unconstrained(&self) -> bool {
        self.blockers.iter().all(|m| m.is_empty())
    }
}
