//! Crop hazard classification.
//!
//! A [`CropTable`] maps crop names to per-variable threshold tiers. The
//! [`HazardEvaluator`] looks a crop up (or takes custom thresholds) and
//! classifies season statistics into one of five stress levels.
//!
//! # Quick start
//!
//! ```rust
//! use ceres_hazard::{CropTable, StressLevel, evaluate_threshold, PRECIP_VARIABLE};
//!
//! let table = CropTable::builtin();
//! let maize = table.lookup("maize").unwrap();
//! let tiers = maize.variable(PRECIP_VARIABLE).unwrap();
//! assert_eq!(evaluate_threshold(650.0, tiers), StressLevel::NoStress);
//! ```

mod builtin;
mod error;
mod evaluator;
mod table;
mod thresholds;

pub use error::HazardError;
pub use evaluator::{
    HazardEvaluation, HazardEvaluator, HazardStatistics, ThresholdSource, VariableHazard,
    evaluate_statistics,
};
pub use table::{CropTable, normalize_crop_name};
pub use thresholds::{
    CropThresholds, Interval, PRECIP_VARIABLE, StressLevel, TEMP_VARIABLE, VariableThresholds,
    evaluate_threshold,
};
