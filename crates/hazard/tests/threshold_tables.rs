//! Threshold tables loaded from TOML and evaluated end to end.

use ceres_hazard::{
    CropTable, HazardError, HazardEvaluator, HazardStatistics, Interval, PRECIP_VARIABLE,
    StressLevel, TEMP_VARIABLE, ThresholdSource, evaluate_threshold,
};

const TEFF: &str = r#"
[crops.Teff."Total Precip"]
no_stress = { lower = 450.0, upper = 1000.0 }
moderate_stress_low = { lower = 300.0, upper = 450.0 }
moderate_stress_up = { lower = 1000.0, upper = 1600.0 }
severe_stress_low = { upper = 300.0 }
severe_stress_up = { lower = 1600.0 }

[crops.Teff.TAVG]
no_stress = { lower = 15.0, upper = 27.0 }
severe_stress_low = { upper = 10.0 }
"#;

struct Season {
    precip: f64,
    tavg: f64,
}

impl HazardStatistics for Season {
    fn total_precipitation(&self) -> Option<f64> {
        Some(self.precip)
    }
    fn mean_temperature(&self) -> Option<f64> {
        Some(self.tavg)
    }
}

#[test]
fn table_parses_from_toml() {
    let table: CropTable = toml::from_str(TEFF).unwrap();
    assert_eq!(table.len(), 1);
    table.validate().unwrap();

    let teff = table.lookup("teff").unwrap();
    let precip = teff.variable(PRECIP_VARIABLE).unwrap();
    assert_eq!(precip.severe_stress_low, Some(Interval::below(300.0)));
    assert_eq!(precip.severe_stress_up, Some(Interval::above(1600.0)));

    let tavg = teff.variable(TEMP_VARIABLE).unwrap();
    assert!(tavg.moderate_stress_up.is_none());
}

#[test]
fn file_table_replaces_builtin() {
    let table: CropTable = toml::from_str(TEFF).unwrap();
    let evaluator = HazardEvaluator::new(table);

    let err = evaluator
        .evaluate(
            &Season {
                precip: 600.0,
                tavg: 20.0,
            },
            &ThresholdSource::Crop("Maize".into()),
        )
        .unwrap_err();
    assert!(matches!(err, HazardError::UnknownCrop { ref available, .. } if available == &["Teff"]));
}

#[test]
fn gaps_in_partial_tables_are_unknown() {
    let table: CropTable = toml::from_str(TEFF).unwrap();
    let evaluator = HazardEvaluator::new(table);

    let eval = evaluator
        .evaluate(
            &Season {
                precip: 1200.0,
                tavg: 12.0,
            },
            &ThresholdSource::Crop("TEFF".into()),
        )
        .unwrap();
    assert_eq!(eval.precipitation_status(), StressLevel::ModerateStressUp);
    // 12 °C falls between the severe and no-stress bands.
    assert_eq!(eval.temperature_status(), StressLevel::Unknown);
}

#[test]
fn unknown_fields_are_rejected() {
    let bad = r#"
[crops.Teff.TAVG]
no_stress = { lower = 15.0, upper = 27.0 }
mild = { lower = 10.0, upper = 15.0 }
"#;
    assert!(toml::from_str::<CropTable>(bad).is_err());
}

#[test]
fn maize_boundary_scenario() {
    let table = CropTable::builtin();
    let tiers = table.lookup("Maize").unwrap().variable(PRECIP_VARIABLE).unwrap();
    assert_eq!(evaluate_threshold(500.0, tiers), StressLevel::NoStress);
    assert_eq!(evaluate_threshold(499.999, tiers), StressLevel::ModerateStressLow);
}
