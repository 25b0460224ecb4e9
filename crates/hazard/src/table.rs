//! Crop threshold tables and crop-name lookup.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::builtin;
use crate::error::HazardError;
use crate::thresholds::CropThresholds;

/// Normalizes a crop name: first character upper-case, the rest lower-case.
///
/// `"maize"`, `"MAIZE"` and `"Maize"` all become `"Maize"`.
pub fn normalize_crop_name(name: &str) -> String {
    let trimmed = name.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Crop name → per-variable thresholds.
///
/// Deserializes from TOML of the form
///
/// ```toml
/// [crops.Maize."Total Precip"]
/// no_stress = { lower = 500.0, upper = 1200.0 }
/// severe_stress_low = { upper = 400.0 }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CropTable {
    crops: BTreeMap<String, CropThresholds>,
}

impl CropTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in table of seven East African staple crops.
    pub fn builtin() -> Self {
        builtin::table()
    }

    /// Adds (or replaces) a crop. The name is stored normalized.
    pub fn with_crop(mut self, name: &str, thresholds: CropThresholds) -> Self {
        self.crops.insert(normalize_crop_name(name), thresholds);
        self
    }

    /// Looks up a crop, normalizing both the request and the table keys.
    ///
    /// # Errors
    ///
    /// Returns [`HazardError::UnknownCrop`] listing the available crops.
    pub fn lookup(&self, crop: &str) -> Result<&CropThresholds, HazardError> {
        let wanted = normalize_crop_name(crop);
        let found = self
            .crops
            .iter()
            .find(|(name, _)| normalize_crop_name(name) == wanted)
            .map(|(_, t)| t);

        match found {
            Some(t) => {
                debug!(crop = %wanted, "crop thresholds found");
                Ok(t)
            }
            None => Err(HazardError::UnknownCrop {
                crop: crop.to_string(),
                available: self.crop_names().map(str::to_string).collect(),
            }),
        }
    }

    /// Crop names in sorted order.
    pub fn crop_names(&self) -> impl Iterator<Item = &str> {
        self.crops.keys().map(String::as_str)
    }

    /// Number of crops.
    pub fn len(&self) -> usize {
        self.crops.len()
    }

    /// Whether the table has no crops.
    pub fn is_empty(&self) -> bool {
        self.crops.is_empty()
    }

    /// Validates the table.
    ///
    /// Checks that there is at least one crop, every crop defines at least
    /// one variable, and every interval bound is finite with
    /// `lower <= upper` where both are given.
    pub fn validate(&self) -> Result<(), HazardError> {
        if self.crops.is_empty() {
            return Err(HazardError::InvalidTable {
                reason: "table defines no crops".to_string(),
            });
        }

        for (crop, thresholds) in &self.crops {
            if thresholds.variables().next().is_none() {
                return Err(HazardError::InvalidTable {
                    reason: format!("crop '{crop}' has no variables"),
                });
            }
            for (variable, tiers) in thresholds.variables() {
                for (level, interval) in tiers.tiers() {
                    let bounds = [interval.lower, interval.upper];
                    if bounds.iter().flatten().any(|b| !b.is_finite()) {
                        return Err(HazardError::InvalidTable {
                            reason: format!("{crop}/{variable}/{level}: bounds must be finite"),
                        });
                    }
                    if let (Some(lo), Some(hi)) = (interval.lower, interval.upper)
                        && lo > hi
                    {
                        return Err(HazardError::InvalidTable {
                            reason: format!("{crop}/{variable}/{level}: lower {lo} > upper {hi}"),
                        });
                    }
                }
            }
        }

        Ok(())
    }
}
