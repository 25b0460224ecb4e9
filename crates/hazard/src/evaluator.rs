//! Classification of season statistics against crop thresholds.

use serde::Serialize;
use tracing::debug;

use crate::error::HazardError;
use crate::table::CropTable;
use crate::thresholds::{
    CropThresholds, PRECIP_VARIABLE, StressLevel, TEMP_VARIABLE, evaluate_threshold,
};

/// Season values the evaluator reads.
///
/// Implemented by whatever statistics type the caller computes; `None`
/// means the value could not be derived (e.g. no temperature columns).
pub trait HazardStatistics {
    /// Season total precipitation in mm.
    fn total_precipitation(&self) -> Option<f64>;

    /// Season mean of the daily average temperature in °C.
    fn mean_temperature(&self) -> Option<f64>;
}

/// Where the thresholds for one evaluation come from.
#[derive(Debug, Clone)]
pub enum ThresholdSource {
    /// A crop looked up in the evaluator's table.
    Crop(String),
    /// Thresholds supplied by the caller, bypassing the table.
    Custom(CropThresholds),
}

/// Value and classification for one variable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VariableHazard {
    pub value: f64,
    pub status: StressLevel,
}

/// Hazard classification of one season.
///
/// A variable is absent when either the statistic or its thresholds are.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HazardEvaluation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precipitation: Option<VariableHazard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<VariableHazard>,
}

impl HazardEvaluation {
    /// Precipitation status, [`StressLevel::Unknown`] when absent.
    pub fn precipitation_status(&self) -> StressLevel {
        self.precipitation.map_or(StressLevel::Unknown, |h| h.status)
    }

    /// Temperature status, [`StressLevel::Unknown`] when absent.
    pub fn temperature_status(&self) -> StressLevel {
        self.temperature.map_or(StressLevel::Unknown, |h| h.status)
    }
}

/// Classifies total precipitation against `"Total Precip"` and mean
/// temperature against `"TAVG"`.
pub fn evaluate_statistics<S: HazardStatistics + ?Sized>(
    stats: &S,
    thresholds: &CropThresholds,
) -> HazardEvaluation {
    let classify = |value: Option<f64>, variable: &str| {
        let tiers = thresholds.variable(variable)?;
        let value = value?;
        Some(VariableHazard {
            value,
            status: evaluate_threshold(value, tiers),
        })
    };

    HazardEvaluation {
        precipitation: classify(stats.total_precipitation(), PRECIP_VARIABLE),
        temperature: classify(stats.mean_temperature(), TEMP_VARIABLE),
    }
}

/// Evaluates statistics against an injected crop table.
#[derive(Debug, Clone)]
pub struct HazardEvaluator {
    table: CropTable,
}

impl HazardEvaluator {
    /// Wraps `table`.
    pub fn new(table: CropTable) -> Self {
        Self { table }
    }

    /// Resolves `source` to concrete thresholds.
    ///
    /// # Errors
    ///
    /// Returns [`HazardError::UnknownCrop`] for a crop not in the table.
    pub fn resolve<'a>(
        &'a self,
        source: &'a ThresholdSource,
    ) -> Result<&'a CropThresholds, HazardError> {
        match source {
            ThresholdSource::Crop(name) => self.table.lookup(name),
            ThresholdSource::Custom(thresholds) => Ok(thresholds),
        }
    }

    /// Classifies `stats` using the thresholds named by `source`.
    pub fn evaluate<S: HazardStatistics + ?Sized>(
        &self,
        stats: &S,
        source: &ThresholdSource,
    ) -> Result<HazardEvaluation, HazardError> {
        let thresholds = self.resolve(source)?;
        let evaluation = evaluate_statistics(stats, thresholds);
        debug!(
            precipitation = %evaluation.precipitation_status(),
            temperature = %evaluation.temperature_status(),
            "hazards evaluated"
        );
        Ok(evaluation)
    }
}

impl Default for HazardEvaluator {
    fn default() -> Self {
        Self::new(CropTable::builtin())
    }
}
