use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::constants::DEFAULT_WEIGHT_VERSION;

/// Relative trust in the two signal sources. Always sums to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceWeights {
    pub semantic: f64,
    pub generative: f64,
}

impl SourceWeights {
    pub fn equal() -> Self {
        Self::from_semantic(0.5)
    }

    /// Build weights from the semantic share; generative gets the rest.
    pub fn from_semantic(semantic: f64) -> Self {
        let semantic = semantic.clamp(0.0, 1.0);
        Self {
            semantic,
            generative: 1.0 - semantic,
        }
    }

    pub fn is_valid(&self) -> bool {
        (0.0..=1.0).contains(&self.semantic)
            && (0.0..=1.0).contains(&self.generative)
            && ((self.semantic + self.generative) - 1.0).abs() < 1e-6
    }
}

impl Default for SourceWeights {
    fn default() -> Self {
        Self::equal()
    }
}

/// One knot of the calibration curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationPoint {
    pub raw: f64,
    pub calibrated: f64,
}

/// Monotone piecewise-linear map from raw confidence to observed accuracy.
///
/// Knots are sorted by `raw`, start at (0, 0), and the curve is flat past
/// the last knot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationCurve {
    pub points: Vec<CalibrationPoint>,
}

impl CalibrationCurve {
    pub fn identity() -> Self {
        Self {
            points: vec![
                CalibrationPoint {
                    raw: 0.0,
                    calibrated: 0.0,
                },
                CalibrationPoint {
                    raw: 1.0,
                    calibrated: 1.0,
                },
            ],
        }
    }

    pub fn is_identity(&self) -> bool {
        self.points
            .iter()
            .all(|p| (p.raw - p.calibrated).abs() < 1e-12)
    }

    /// Map a raw confidence through the curve.
    pub fn apply(&self, raw: f64) -> f64 {
        let x = if raw.is_nan() { 0.0 } else { raw.clamp(0.0, 1.0) };
        let Some(first) = self.points.first() else {
            return x;
        };
        if x <= first.raw {
            if first.raw <= 0.0 {
                return first.calibrated;
            }
            return first.calibrated * (x / first.raw);
        }
        for pair in self.points.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if x <= b.raw {
                let span = b.raw - a.raw;
                if span <= 0.0 {
                    return b.calibrated;
                }
                let t = (x - a.raw) / span;
                return a.calibrated + t * (b.calibrated - a.calibrated);
            }
        }
        self.points.last().map_or(x, |p| p.calibrated)
    }

    /// Structural check: knots inside the unit square, strictly increasing
    /// raw values, non-decreasing calibrated values.
    pub fn validate(&self) -> Result<(), String> {
        if self.points.is_empty() {
            return Err("calibration curve has no points".to_string());
        }
        for p in &self.points {
            if !(0.0..=1.0).contains(&p.raw) || !(0.0..=1.0).contains(&p.calibrated) {
                return Err(format!(
                    "calibration point ({}, {}) outside [0, 1]",
                    p.raw, p.calibrated
                ));
            }
        }
        for pair in self.points.windows(2) {
            if pair[1].raw <= pair[0].raw {
                return Err("calibration raw values must strictly increase".to_string());
            }
            if pair[1].calibrated < pair[0].calibrated {
                return Err("calibration curve must be monotone".to_string());
            }
        }
        Ok(())
    }
}

impl Default for CalibrationCurve {
    fn default() -> Self {
        Self::identity()
    }
}

/// The tunable, versioned state of the consensus resolver.
///
/// Never mutated once published; every update produces a new version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightVector {
    pub version: u64,
    pub global: SourceWeights,
    #[serde(default)]
    pub per_category: BTreeMap<Category, SourceWeights>,
    #[serde(default)]
    pub calibration: CalibrationCurve,
    /// Sequence number of the last feedback record folded into the weights.
    #[serde(default)]
    pub learned_through: u64,
    /// Number of comparative feedback records folded in so far.
    #[serde(default)]
    pub sample_count: u64,
    pub updated_at: DateTime<Utc>,
}

impl WeightVector {
    /// Weights that apply to `category`, honoring per-category overrides.
    pub fn weights_for(&self, category: &Category) -> SourceWeights {
        self.per_category
            .get(category)
            .copied()
            .unwrap_or(self.global)
    }

    pub fn calibrate(&self, raw: f64) -> f64 {
        self.calibration.apply(raw)
    }

    pub fn is_default(&self) -> bool {
        self.version == DEFAULT_WEIGHT_VERSION
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.global.is_valid() {
            return Err(format!(
                "global weights ({}, {}) must lie in [0, 1] and sum to 1",
                self.global.semantic, self.global.generative
            ));
        }
        for (category, weights) in &self.per_category {
            if !weights.is_valid() {
                return Err(format!("weights for {category} must lie in [0, 1] and sum to 1"));
            }
        }
        self.calibration.validate()
    }
}

impl Default for WeightVector {
    /// Equal weights, identity calibration, version 0.
    fn default() -> Self {
        Self {
            version: DEFAULT_WEIGHT_VERSION,
            global: SourceWeights::equal(),
            per_category: BTreeMap::new(),
            calibration: CalibrationCurve::identity(),
            learned_through: 0,
            sample_count: 0,
            updated_at: DateTime::<Utc>::default(),
        }
    }
}
