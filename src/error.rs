use crate::types::Axis;

/// Load-time failures. Resolution itself never errors.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("non-finite coefficient `{coefficient}` = {value}")]
    NonFiniteCoefficient { coefficient: &'static str, value: f64 },

    #[error("invalid {axis:?} range: min {min} > max {max}")]
    InvalidRange { axis: Axis, min: i32, max: i32 },

    #[error("tile size must be non-zero (got {width}x{height})")]
    ZeroTileSize { width: u32, height: u32 },

    #[error("duplicate formula name `{0}`")]
    DuplicateFormula(String),

    #[error("duplicate group name `{0}`")]
    DuplicateGroup(String),

    #[error("duplicate category name `{0}`")]
    DuplicateCategory(String),

    #[error("group `{group}` references unknown formula `{formula}`")]
    UnknownFormula { group: String, formula: String },

    /// `owner` is the formula or category holding the dangling reference.
    #[error("`{owner}` references unknown group `{group}`")]
    UnknownGroup { owner: String, group: String },

    #[error("group `{group}` has tile span {first}..={last} with first > last")]
    InvalidTileSpan { group: String, first: u32, last: u32 },

    #[error("{count} groups defined, at most {max} supported")]
    TooManyGroups { count: usize, max: usize },

    #[error("tile map expects {expected} cells, got {actual}")]
    GridSize { expected: usize, actual: usize },

    #[error("formula `{name}`: {source}")]
    Formula {
        name: String,
        #[source]
        source: Box<ConfigError>,
    },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    pub(crate) fn in_formula(self, name: &str) -> Self {
        ConfigError::Formula { name: name.to_owned(), source: Box::new(self) }
    }
}
