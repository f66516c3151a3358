use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Numeric mapping from a tile-local input coordinate to a tile-local output.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CollisionFunction {
    /// `a * input + b`
    Linear { a: f64, b: f64 },
}

impl CollisionFunction {
    pub fn linear(a: f64, b: f64) -> Result<Self, ConfigError> {
        let f = CollisionFunction::Linear { a, b };
        f.validate()?;
        Ok(f)
    }

    /// Flat surface at `value`.
    pub fn constant(value: f64) -> Result<Self, ConfigError> {
        Self::linear(0.0, value)
    }

    #[inline]
    pub fn compute(&self, input: f64) -> f64 {
        match *self {
            CollisionFunction::Linear { a, b } => a * input + b,
        }
    }

    /// Deserialized functions skip the constructors, so the loader calls this.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            CollisionFunction::Linear { a, b } => {
                if !a.is_finite() {
                    return Err(ConfigError::NonFiniteCoefficient { coefficient: "a", value: a });
                }
                if !b.is_finite() {
                    return Err(ConfigError::NonFiniteCoefficient { coefficient: "b", value: b });
                }
                Ok(())
            }
        }
    }
}
