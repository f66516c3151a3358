use glam::DVec2;
use log::{trace, warn};

use crate::api::{ResolverApi, TileGrid};
use crate::formula::CollisionFormula;
use crate::group::CollisionCategory;
use crate::rules::CollisionRules;
use crate::types::*;

/// Stateless tile collision resolver over a shared, immutable rule set.
///
/// Cheap to copy; any number of threads may resolve through the same rules.
#[derive(Copy, Clone, Debug)]
pub struct CollisionResolver<'r> {
    rules: &'r CollisionRules,
    cfg: ResolverConfig,
}

impl<'r> CollisionResolver<'r> {
    pub fn new(rules: &'r CollisionRules, cfg: ResolverConfig) -> Self {
        Self { rules, cfg }
    }

    pub fn rules(&self) -> &'r CollisionRules {
        self.rules
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.cfg
    }
}

impl ResolverApi for CollisionResolver<'_> {
    fn resolve<G: TileGrid + ?Sized>(
        &self,
        category: &CollisionCategory,
        old: DVec2,
        new: DVec2,
        grid: &G,
    ) -> CollisionResult {
        let tw = grid.tile_width();
        let th = grid.tile_height();
        if tw == 0 || th == 0 {
            warn!("tile grid reports zero tile size {tw}x{th}, skipping");
            return CollisionResult::empty(TileRef::vacant(0, 0, tw, th));
        }
        if category.rules_id() != self.rules.id() {
            warn!("category `{}` belongs to a different rule set, skipping", category.name);
            return CollisionResult::empty(TileRef::vacant(0, 0, tw, th));
        }

        let offset = category.offset();
        let old = old + offset;
        let new = new + offset;
        let Some(cell) = world_to_cell(new, tw, th) else {
            warn!("category `{}`: sample point {new} outside the addressable grid, skipping", category.name);
            return CollisionResult::empty(TileRef::vacant(0, 0, tw, th));
        };
        let Some(tile) = grid.tile_at(cell.0, cell.1) else {
            return CollisionResult::empty(TileRef::vacant(cell.0, cell.1, tw, th));
        };
        if let Some(hit) = self.probe(category, &tile, local_pixel(new, &tile), grid) {
            return hit;
        }

        // One-step lookback: the point may have crossed the old cell's boundary
        // in a single tick. Probe the old cell with the new point clamped into it.
        if let Some(old_cell) = world_to_cell(old, tw, th) {
            if self.should_look_back(category.axis, old_cell, cell) {
                if let Some(prev) = grid.tile_at(old_cell.0, old_cell.1) {
                    trace!("category `{}`: looking back from {cell:?} to {old_cell:?}", category.name);
                    return self
                        .probe(category, &prev, local_pixel(new, &prev), grid)
                        .unwrap_or(CollisionResult::empty(prev));
                }
            }
        }

        CollisionResult::empty(tile)
    }

    fn resolve_all<G: TileGrid + ?Sized>(
        &self,
        categories: &[CategoryId],
        old: DVec2,
        new: DVec2,
        grid: &G,
    ) -> Vec<(CategoryId, CollisionResult)> {
        categories
            .iter()
            .map(|&id| {
                let result = match self.rules.get_category(id) {
                    Some(category) => self.resolve(category, old, new, grid),
                    None => {
                        warn!("unknown category id {}, skipping", id.0);
                        CollisionResult::empty(TileRef::vacant(0, 0, grid.tile_width(), grid.tile_height()))
                    }
                };
                (id, result)
            })
            .collect()
    }
}

impl CollisionResolver<'_> {
    /// First formula (category group order, then group formula order) that
    /// writes the category's axis, covers `local`, and survives its constraint.
    fn probe<G: TileGrid + ?Sized>(
        &self,
        category: &CollisionCategory,
        tile: &TileRef,
        local: (i32, i32),
        grid: &G,
    ) -> Option<CollisionResult> {
        let tile_groups = grid.group_membership(tile);
        if !tile_groups.intersects(category.group_mask()) {
            return None;
        }
        let (lx, ly) = local;
        let mut neighbors = Neighborhood::new(grid, tile, tile_groups);

        for &gid in category.groups() {
            if !tile_groups.contains(gid) {
                continue;
            }
            for &fid in &self.rules.group(gid).formulas {
                let formula = self.rules.formula(fid);
                if formula.output_axis() != category.axis || !formula.applies_at(lx, ly) {
                    continue;
                }
                if neighbors.suppresses(formula) {
                    trace!("formula `{}` suppressed by neighbor at {:?}", formula.name, (tile.grid_x, tile.grid_y));
                    continue;
                }
                let value = formula.evaluate(formula.input_for(lx, ly));
                if !value.is_finite() {
                    warn!(
                        "formula `{}` produced non-finite output {value} at local ({lx}, {ly}); ignoring",
                        formula.name
                    );
                    continue;
                }

                let origin = tile.origin();
                let mut result = CollisionResult::empty(*tile);
                match category.axis {
                    Axis::X => result.x = Some(origin.x + value),
                    Axis::Y => result.y = Some(origin.y + value),
                }
                trace!(
                    "category `{}` hit formula `{}` in tile {:?} -> {:?}",
                    category.name,
                    formula.name,
                    (tile.grid_x, tile.grid_y),
                    (result.x, result.y)
                );
                return Some(result);
            }
        }
        None
    }

    fn should_look_back(&self, axis: Axis, old_cell: (i32, i32), new_cell: (i32, i32)) -> bool {
        match self.cfg.lookback {
            Lookback::Disabled => false,
            Lookback::AxisCellChange => match axis {
                Axis::X => old_cell.0 != new_cell.0,
                Axis::Y => old_cell.1 != new_cell.1,
            },
            Lookback::AnyCellChange => old_cell != new_cell,
        }
    }
}

/// Lazily gathered group masks of the 8 neighbors (plus the tile itself).
struct Neighborhood<'g, G: ?Sized> {
    grid: &'g G,
    center: (i32, i32),
    masks: [Option<GroupMask>; Orientation::COUNT],
}

impl<'g, G: TileGrid + ?Sized> Neighborhood<'g, G> {
    fn new(grid: &'g G, tile: &TileRef, own: GroupMask) -> Self {
        let mut masks = [None; Orientation::COUNT];
        masks[Orientation::None.index()] = Some(own);
        Self { grid, center: (tile.grid_x, tile.grid_y), masks }
    }

    fn groups(&mut self, orientation: Orientation) -> GroupMask {
        let slot = &mut self.masks[orientation.index()];
        if let Some(mask) = *slot {
            return mask;
        }
        let (dx, dy) = orientation.offset();
        let mask = match (self.center.0.checked_add(dx), self.center.1.checked_add(dy)) {
            (Some(nx), Some(ny)) => {
                self.grid.tile_at(nx, ny).map(|t| self.grid.group_membership(&t)).unwrap_or_default()
            }
            _ => GroupMask::EMPTY,
        };
        *slot = Some(mask);
        mask
    }

    fn suppresses(&mut self, formula: &CollisionFormula) -> bool {
        if formula.constraint.is_unconstrained() {
            return false;
        }
        Orientation::ALL.into_iter().any(|o| {
            !formula.constraint.blockers(o).is_empty() && formula.is_constrained(o, self.groups(o))
        })
    }
}

/// Cell containing `p`, or `None` when `p` is non-finite or the cell index
/// does not fit in `i32`.
#[inline]
fn world_to_cell(p: DVec2, tw: u32, th: u32) -> Option<(i32, i32)> {
    let axis = |v: f64, size: u32| {
        let c = (v / size as f64).floor();
        (c.is_finite() && c >= i32::MIN as f64 && c <= i32::MAX as f64).then_some(c as i32)
    };
    Some((axis(p.x, tw)?, axis(p.y, th)?))
}

/// Truncated pixel offset of `p` inside `tile`, clamped to the tile's extent.
#[inline]
fn local_pixel(p: DVec2, tile: &TileRef) -> (i32, i32) {
    let d = p - tile.origin();
    let max_x = tile.width.clamp(1, i32::MAX as u32) as i32 - 1;
    let max_y = tile.height.clamp(1, i32::MAX as u32) as i32 - 1;
    let lx = (d.x as i32).clamp(0, max_x);
    let ly = (d.y as i32).clamp(0, max_y);
    (lx, ly)
}
