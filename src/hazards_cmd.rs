//! Hazards command: classify one season of a daily table for a crop.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, info_span};

use ceres_assess::{
    BASELINE_MODEL, BASELINE_SCENARIO, Location, Projection, ProjectionRequest, ProjectionResult,
    SeasonWindow, assess_projection,
};
use ceres_hazard::{HazardEvaluator, ThresholdSource};
use ceres_io::read_table;

use crate::cli::HazardsArgs;
use crate::config::CeresConfig;
use crate::convert;
use crate::report::{self, HazardsText};

#[derive(Serialize)]
struct HazardsReport<'a> {
    crop: &'a str,
    location: Location,
    #[serde(flatten)]
    result: &'a ProjectionResult,
}

/// Run a single-table hazard assessment.
pub fn run(args: HazardsArgs) -> Result<()> {
    let _cmd = info_span!("hazards", crop = %args.crop).entered();
    let config = CeresConfig::load(args.config.as_deref())?;
    let (latitude, longitude) = convert::parse_location(&args.location)?;

    let evaluator = HazardEvaluator::new(convert::load_crop_table(args.thresholds.as_deref())?);

    let window = match (&args.season_start, &args.season_end) {
        (Some(start), Some(end)) => {
            let range = convert::parse_range(start, end)?;
            SeasonWindow::Explicit {
                start: range.start,
                end: range.end,
            }
        }
        _ => SeasonWindow::Detect(convert::build_season_config(&config.season, &args.season)?),
    };

    info!(path = %args.input.display(), "reading daily table");
    let table = read_table(&args.input)
        .with_context(|| format!("failed to read table: {}", args.input.display()))?;

    let request = ProjectionRequest {
        projection: Projection {
            scenario: BASELINE_SCENARIO.to_string(),
            model: BASELINE_MODEL.to_string(),
        },
        latitude,
        window,
        thresholds: ThresholdSource::Crop(args.crop.clone()),
        statistics: convert::build_statistics_config(&config)?,
    };
    let result = assess_projection(&table, &evaluator, &request)?;

    let report = HazardsReport {
        crop: &args.crop,
        location: Location {
            latitude,
            longitude,
        },
        result: &result,
    };
    let text = HazardsText {
        crop: &args.crop,
        result: &result,
    };
    report::emit(&args.output, &report, &text)
}
