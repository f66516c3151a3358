use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::constraint::CollisionConstraint;
use crate::error::ConfigError;
use crate::formula::CollisionFormula;
use crate::function::CollisionFunction;
use crate::group::{CollisionCategory, CollisionGroup, TileSpan};
use crate::range::CollisionRange;
use crate::types::*;

// --- Definitions (names, as authored) -------------------------------------

/// Formula as authored: constraint entries refer to groups by name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FormulaDef {
    pub name: String,
    pub range: CollisionRange,
    pub function: CollisionFunction,
    #[serde(default)]
    pub constraint: BTreeMap<Orientation, Vec<String>>,
}

impl FormulaDef {
    pub fn new(name: impl Into<String>, range: CollisionRange, function: CollisionFunction) -> Self {
        Self { name: name.into(), range, function, constraint: BTreeMap::new() }
    }

    /// Suppress this formula when the neighbor at `orientation` is in `group`.
    pub fn blocked_by(mut self, orientation: Orientation, group: impl Into<String>) -> Self {
        self.constraint.entry(orientation).or_default().push(group.into());
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupDef {
    pub name: String,
    #[serde(default)]
    pub tiles: Vec<TileSpan>,
    #[serde(default)]
    pub formulas: Vec<String>,
}

impl GroupDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), tiles: Vec::new(), formulas: Vec::new() }
    }

    pub fn tile(mut self, sheet: u32, index: u32) -> Self {
        self.tiles.push(TileSpan::Tile { sheet, index });
        self
    }

    pub fn tiles(mut self, sheet: u32, first: u32, last: u32) -> Self {
        self.tiles.push(TileSpan::Range { sheet, first, last });
        self
    }

    pub fn formula(mut self, name: impl Into<String>) -> Self {
        self.formulas.push(name.into());
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryDef {
    pub name: String,
    pub axis: Axis,
    #[serde(default)]
    pub offset_x: i32,
    #[serde(default)]
    pub offset_y: i32,
    #[serde(default)]
    pub groups: Vec<String>,
}

impl CategoryDef {
    pub fn new(name: impl Into<String>, axis: Axis) -> Self {
        Self { name: name.into(), axis, offset_x: 0, offset_y: 0, groups: Vec::new() }
    }

    pub fn offset(mut self, x: i32, y: i32) -> Self {
        self.offset_x = x;
        self.offset_y = y;
        self
    }

    pub fn group(mut self, name: impl Into<String>) -> Self {
        self.groups.push(name.into());
        self
    }
}

/// Complete authored rule set.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RulesDef {
    #[serde(default)]
    pub formulas: Vec<FormulaDef>,
    #[serde(default)]
    pub groups: Vec<GroupDef>,
    #[serde(default)]
    pub categories: Vec<CategoryDef>,
}

// --- Resolved arena --------------------------------------------------------

/// Immutable, validated rule set. All cross-references are indices.
static NEXT_RULES_ID: AtomicU64 = AtomicU64::new(1);

fn next_rules_id() -> RulesId {
    RulesId(NEXT_RULES_ID.fetch_add(1, Ordering::Relaxed))
}

#[derive(Clone, Debug)]
pub struct CollisionRules {
    id: RulesId,
    formulas: Vec<CollisionFormula>,
    groups: Vec<CollisionGroup>,
    categories: Vec<CollisionCategory>,
    formula_ids: HashMap<String, FormulaId>,
    group_ids: HashMap<String, GroupId>,
    category_ids: HashMap<String, CategoryId>,
}

impl Default for CollisionRules {
    fn default() -> Self {
        Self {
            id: next_rules_id(),
            formulas: Vec::new(),
            groups: Vec::new(),
            categories: Vec::new(),
            formula_ids: HashMap::new(),
            group_ids: HashMap::new(),
            category_ids: HashMap::new(),
        }
    }
}

impl CollisionRules {
    /// Validate `def` and resolve every name. Any failure discards the whole set.
    pub fn from_def(def: &RulesDef) -> Result<Self, ConfigError> {
        if def.groups.len() > GroupMask::CAPACITY {
            return Err(ConfigError::TooManyGroups { count: def.groups.len(), max: GroupMask::CAPACITY });
        }

        let rules_id = next_rules_id();
        let mut group_ids = HashMap::with_capacity(def.groups.len());
        for (i, g) in def.groups.iter().enumerate() {
            if group_ids.insert(g.name.clone(), GroupId(i as u32)).is_some() {
                return Err(ConfigError::DuplicateGroup(g.name.clone()));
            }
        }

        let mut formula_ids = HashMap::with_capacity(def.formulas.len());
        let mut formulas = Vec::with_capacity(def.formulas.len());
        for (i, f) in def.formulas.iter().enumerate() {
            if formula_ids.insert(f.name.clone(), FormulaId(i as u32)).is_some() {
                return Err(ConfigError::DuplicateFormula(f.name.clone()));
            }
            f.range.validate().map_err(|e| e.in_formula(&f.name))?;
            f.function.validate().map_err(|e| e.in_formula(&f.name))?;
            let mut constraint = CollisionConstraint::NONE;
            for (&orientation, names) in &f.constraint {
                let mask = resolve_mask(&group_ids, &f.name, names)?;
                constraint = constraint.with(orientation, mask);
            }
            formulas.push(CollisionFormula {
                name: f.name.clone(),
                range: f.range,
                function: f.function,
                constraint,
            });
        }

        let mut groups = Vec::with_capacity(def.groups.len());
        for g in &def.groups {
            for span in &g.tiles {
                if let TileSpan::Range { first, last, .. } = *span {
                    if first > last {
                        return Err(ConfigError::InvalidTileSpan { group: g.name.clone(), first, last });
                    }
                }
            }
            let mut refs = Vec::with_capacity(g.formulas.len());
            for name in &g.formulas {
                let id = formula_ids.get(name).copied().ok_or_else(|| ConfigError::UnknownFormula {
                    group: g.name.clone(),
                    formula: name.clone(),
                })?;
                refs.push(id);
            }
            groups.push(CollisionGroup { name: g.name.clone(), tiles: g.tiles.clone(), formulas: refs });
        }

        let mut category_ids = HashMap::with_capacity(def.categories.len());
        let mut categories = Vec::with_capacity(def.categories.len());
        for (i, c) in def.categories.iter().enumerate() {
            if category_ids.insert(c.name.clone(), CategoryId(i as u32)).is_some() {
                return Err(ConfigError::DuplicateCategory(c.name.clone()));
            }
            let mut mask = GroupMask::EMPTY;
            let mut ordered = Vec::with_capacity(c.groups.len());
            let mut cached: Vec<FormulaId> = Vec::new();
            for name in &c.groups {
                let gid = lookup_group(&group_ids, &c.name, name)?;
                if mask.contains(gid) {
                    continue;
                }
                mask.insert(gid);
                ordered.push(gid);
                for &fid in &groups[gid.0 as usize].formulas {
                    if !cached.contains(&fid) {
                        cached.push(fid);
                    }
                }
            }
            categories.push(CollisionCategory {
                name: c.name.clone(),
                axis: c.axis,
                offset_x: c.offset_x,
                offset_y: c.offset_y,
                groups: ordered,
                mask,
                formulas: cached,
                rules: rules_id,
            });
        }

        let rules = Self { id: rules_id, formulas, groups, categories, formula_ids, group_ids, category_ids };
        let stats = rules.stats();
        debug!(
            "loaded collision rules: {} formulas ({} constrained), {} groups, {} categories",
            stats.formulas, stats.constrained_formulas, stats.groups, stats.categories
        );
        Ok(rules)
    }

    /// Parse a RON-encoded [`RulesDef`] and resolve it.
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let def: RulesDef = ron::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Self::from_def(&def)
    }

    pub fn load_ron(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    // --- Lookups (load time / tooling; not for the hot path) ---------------

    pub fn formula_id(&self, name: &str) -> Option<FormulaId> {
        self.formula_ids.get(name).copied()
    }

    pub fn group_id(&self, name: &str) -> Option<GroupId> {
        self.group_ids.get(name).copied()
    }

    pub fn category_id(&self, name: &str) -> Option<CategoryId> {
        self.category_ids.get(name).copied()
    }

    pub fn category_by_name(&self, name: &str) -> Option<&CollisionCategory> {
        self.category_id(name).map(|id| self.category(id))
    }

    /// Identity stamped on every category of this set. Clones share it.
    pub fn id(&self) -> RulesId {
        self.id
    }

    // --- Arena access -------------------------------------------------------

    #[inline]
    pub fn formula(&self, id: FormulaId) -> &CollisionFormula {
        &self.formulas[id.0 as usize]
    }

    #[inline]
    pub fn group(&self, id: GroupId) -> &CollisionGroup {
        &self.groups[id.0 as usize]
    }

    #[inline]
    pub fn category(&self, id: CategoryId) -> &CollisionCategory {
        &self.categories[id.0 as usize]
    }

    /// Like [`category`](Self::category), but `None` for an id this set never issued.
    pub fn get_category(&self, id: CategoryId) -> Option<&CollisionCategory> {
        self.categories.get(id.0 as usize)
    }

    pub fn categories(&self) -> impl Iterator<Item = (CategoryId, &CollisionCategory)> {
        self.categories.iter().enumerate().map(|(i, c)| (CategoryId(i as u32), c))
    }

    /// Every group that lists `tile` in its membership.
    pub fn groups_for_tile(&self, tile: TileId) -> GroupMask {
        let mut mask = GroupMask::EMPTY;
        for (i, g) in self.groups.iter().enumerate() {
            if g.contains_tile(tile) {
                mask.insert(GroupId(i as u32));
            }
        }
        mask
    }

    pub fn stats(&self) -> RulesStats {
        RulesStats {
            formulas: self.formulas.len(),
            groups: self.groups.len(),
            categories: self.categories.len(),
            constrained_formulas: self.formulas.iter().filter(|f| !f.constraint.is_unconstrained()).count(),
        }
    }
}

fn lookup_group(ids: &HashMap<String, GroupId>, owner: &str, name: &str) -> Result<GroupId, ConfigError> {
    ids.get(name)
        .copied()
        .ok_or_else(|| ConfigError::UnknownGroup { owner: owner.to_owned(), group: name.to_owned() })
}

fn resolve_mask(ids: &HashMap<String, GroupId>, owner: &str, names: &[String]) -> Result<GroupMask, ConfigError> {
    let mut mask = GroupMask::EMPTY;
    for name in names {
        mask.insert(lookup_group(ids, owner, name)?);
    }
    Ok(mask)
}
