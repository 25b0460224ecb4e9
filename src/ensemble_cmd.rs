//! Ensemble command: baseline plus multi-model, multi-scenario assessment.

use std::sync::Arc;

use anyhow::{Result, bail};
use tracing::{info, info_span};

use ceres_assess::{EnsembleRequest, run_ensemble};
use ceres_hazard::HazardEvaluator;
use ceres_io::{DataSource, DirectorySource};

use crate::cli::EnsembleArgs;
use crate::config::CeresConfig;
use crate::convert;
use crate::report::{self, EnsembleText};

/// Run the ensemble pipeline over a directory of projection tables.
pub fn run(args: EnsembleArgs) -> Result<()> {
    let _cmd = info_span!("ensemble", crop = %args.crop).entered();
    let config = CeresConfig::load(args.config.as_deref())?;
    let (latitude, longitude) = convert::parse_location(&args.location)?;
    let baseline = convert::parse_range(&args.baseline_start, &args.baseline_end)?;
    let future = convert::parse_range(&args.future_start, &args.future_end)?;

    let evaluator = HazardEvaluator::new(convert::load_crop_table(args.thresholds.as_deref())?);

    let scenarios = match &args.scenarios {
        Some(list) => convert::parse_list(list),
        None => config.ensemble.scenarios.clone(),
    };
    let models = match &args.models {
        Some(list) => convert::parse_list(list),
        None => config.ensemble.models.clone(),
    };
    if scenarios.is_empty() || models.is_empty() {
        bail!("at least one scenario and one model are required");
    }

    let mut request = EnsembleRequest::new(&args.crop, latitude, longitude, baseline, future)
        .with_scenarios(scenarios)
        .with_models(models)
        .with_statistics(convert::build_statistics_config(&config)?)
        .with_fetch_policy(convert::build_fetch_policy(&config.fetch)?);
    if args.detect_seasons || config.ensemble.detect_seasons {
        request = request
            .with_season_detection(convert::build_season_config(&config.season, &args.season)?);
    }

    if !args.data_dir.is_dir() {
        bail!("data directory not found: {}", args.data_dir.display());
    }
    info!(path = %args.data_dir.display(), "reading projections");
    let source: Arc<dyn DataSource> = Arc::new(DirectorySource::new(&args.data_dir));

    let report = run_ensemble(source, &request, &evaluator)?;
    report::emit(&args.output, &report, &EnsembleText(&report))
}
