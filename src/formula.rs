use crate::constraint::CollisionConstraint;
use crate::function::CollisionFunction;
use crate::range::CollisionRange;
use crate::types::{Axis, GroupMask, Orientation};

/// The atomic rule: where it applies, what it computes, and when to skip it.
#[derive(Clone, Debug, PartialEq)]
pub struct CollisionFormula {
    pub name: String,
    pub range: CollisionRange,
    pub function: CollisionFunction,
    pub constraint: CollisionConstraint,
}

impl CollisionFormula {
    #[inline]
    pub fn applies_at(&self, lx: i32, ly: i32) -> bool {
        self.range.contains(lx, ly)
    }

    #[inline]
    pub fn evaluate(&self, input: f64) -> f64 {
        self.function.compute(input)
    }

    #[inline]
    pub fn is_constrained(&self, orientation: Orientation, neighbor_groups: GroupMask) -> bool {
        self.constraint.is_blocked(orientation, neighbor_groups)
    }

    pub fn output_axis(&self) -> Axis {
        self.range.output_axis()
    }

    /// Picks the function input from a local position: a formula writing Y is
    /// a function of X and vice versa.
    #[inline]
    pub fn input_for(&self, lx: i32, ly: i32) -> f64 {
        match self.range.output_axis() {
            Axis::X => ly as f64,
            Axis::Y => lx as f64,
        }
    }
}
