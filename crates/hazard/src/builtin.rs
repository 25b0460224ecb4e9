//! Built-in thresholds for East African staple crops.
//!
//! Each variable has the same shape: a bounded no-stress band, bounded
//! moderate bands just below and above it, and open severe bands beyond.

use crate::table::CropTable;
use crate::thresholds::{
    CropThresholds, Interval, PRECIP_VARIABLE, TEMP_VARIABLE, VariableThresholds,
};

/// Band edges `[severe_low | moderate_low | no_stress | moderate_up | severe_up]`.
struct Bands {
    severe_low: f64,
    no_stress_low: f64,
    no_stress_up: f64,
    severe_up: f64,
}

impl Bands {
    const fn new(severe_low: f64, no_stress_low: f64, no_stress_up: f64, severe_up: f64) -> Self {
        Self {
            severe_low,
            no_stress_low,
            no_stress_up,
            severe_up,
        }
    }

    fn tiers(&self) -> VariableThresholds {
        VariableThresholds {
            no_stress: Some(Interval::between(self.no_stress_low, self.no_stress_up)),
            moderate_stress_low: Some(Interval::between(self.severe_low, self.no_stress_low)),
            moderate_stress_up: Some(Interval::between(self.no_stress_up, self.severe_up)),
            severe_stress_low: Some(Interval::below(self.severe_low)),
            severe_stress_up: Some(Interval::above(self.severe_up)),
        }
    }
}

// (crop, total precipitation mm, mean temperature °C)
const CROPS: [(&str, Bands, Bands); 7] = [
    (
        "Beans",
        Bands::new(300.0, 500.0, 2000.0, 4300.0),
        Bands::new(7.0, 18.0, 30.0, 32.0),
    ),
    (
        "Maize",
        Bands::new(400.0, 500.0, 1200.0, 1800.0),
        Bands::new(14.0, 18.0, 32.0, 40.0),
    ),
    (
        "Millet",
        Bands::new(200.0, 300.0, 600.0, 1700.0),
        Bands::new(12.0, 16.0, 32.0, 40.0),
    ),
    (
        "Groundnuts",
        Bands::new(200.0, 400.0, 1100.0, 1900.0),
        Bands::new(18.0, 22.0, 28.0, 30.0),
    ),
    (
        "Sorghum",
        Bands::new(150.0, 400.0, 900.0, 1400.0),
        Bands::new(8.0, 21.0, 32.0, 40.0),
    ),
    (
        "Cassava",
        Bands::new(500.0, 1400.0, 1800.0, 5000.0),
        Bands::new(10.0, 20.0, 29.0, 35.0),
    ),
    (
        "Rice",
        Bands::new(1000.0, 1500.0, 2000.0, 4000.0),
        Bands::new(10.0, 20.0, 30.0, 36.0),
    ),
];

pub(crate) fn table() -> CropTable {
    CROPS
        .iter()
        .fold(CropTable::new(), |table, (name, precip, temp)| {
            table.with_crop(
                name,
                CropThresholds::new()
                    .with_variable(PRECIP_VARIABLE, precip.tiers())
                    .with_variable(TEMP_VARIABLE, temp.tiers()),
            )
        })
}
