use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::Axis;

/// Inclusive pixel rectangle inside a tile where a formula applies.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionRange {
    pub output_axis: Axis,
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

impl CollisionRange {
    pub fn new(output_axis: Axis, min_x: i32, max_x: i32, min_y: i32, max_y: i32) -> Result<Self, ConfigError> {
        let r = Self { output_axis, min_x, max_x, min_y, max_y };
        r.validate()?;
        Ok(r)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_x > self.max_x {
            return Err(ConfigError::InvalidRange { axis: Axis::X, min: self.min_x, max: self.max_x });
        }
        if self.min_y > self.max_y {
            return Err(ConfigError::InvalidRange { axis: Axis::Y, min: self.min_y, max: self.max_y });
        }
        Ok(())
    }

    #[inline]
    pub fn contains(&self, lx: i32, ly: i32) -> bool {
        self.min_x <= lx && lx <= self.max_x && self.min_y <= ly && ly <= self.max_y
    }

    #[inline]
    pub fn output_axis(&self) -> Axis {
        self.output_axis
    }
}
