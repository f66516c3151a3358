//! tilebonk: rule-driven tile collision resolution (formulas, ranges, constraints over a tile grid)

pub mod types;
pub mod error;
pub mod api;
pub mod function;
pub mod range;
pub mod constraint;
pub mod formula;
pub mod group;
pub mod rules;
pub mod grid;
pub mod resolver;

pub use crate::types::*;
pub use crate::api::*;
pub use crate::error::ConfigError;
pub use crate::function::CollisionFunction;
pub use crate::range::CollisionRange;
pub use crate::constraint::CollisionConstraint;
pub use crate::formula::CollisionFormula;
pub use crate::group::{CollisionCategory, CollisionGroup, TileSpan};
pub use crate::rules::{CategoryDef, CollisionRules, FormulaDef, GroupDef, RulesDef};
pub use crate::grid::{TileMap, TileMapDesc};
pub use crate::resolver::CollisionResolver;
