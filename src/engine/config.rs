use crate::models::{DetectionError, MovementType};

pub const DEFAULT_MOM_THRESHOLD: f64 = 10.0;
pub const DEFAULT_YOY_THRESHOLD: f64 = 15.0;

/// Percentage thresholds a movement's `|percentage_change|` must reach to be significant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionConfig {
    pub mom_threshold: f64,
    pub yoy_threshold: f64
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            mom_threshold: DEFAULT_MOM_THRESHOLD,
            yoy_threshold: DEFAULT_YOY_THRESHOLD
        }
    }
}

impl DetectionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mom_threshold(mut self, threshold: f64) -> Self {
        self.mom_threshold = threshold;
        self
    }

    pub fn with_yoy_threshold(mut self, threshold: f64) -> Self {
        self.yoy_threshold = threshold;
        self
    }

    pub fn threshold_for(&self, movement_type: MovementType) -> f64 {
        match movement_type {
            MovementType::MoM => self.mom_threshold,
            MovementType::YoY => self.yoy_threshold
        }
    }

    pub fn validate(&self) -> Result<(), DetectionError> {
        for (name, value) in [("mom_threshold", self.mom_threshold), ("yoy_threshold", self.yoy_threshold)] {
            if !value.is_finite() || value < 0.0 {
                return Err(DetectionError::InvalidThreshold { name, value });
            }
        }

        Ok(())
    }
}
