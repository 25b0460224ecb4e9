//! Statistics command: whole-period and per-season summaries, optionally
//! compared with a baseline table.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, info_span};

use ceres_assess::{PeriodComparison, PeriodStatistics, analyze_period, compare_statistics};
use ceres_io::read_table;

use crate::cli::StatisticsArgs;
use crate::config::CeresConfig;
use crate::convert;
use crate::report::{self, StatisticsText};

#[derive(Serialize)]
struct StatisticsReport<'a> {
    #[serde(flatten)]
    statistics: &'a PeriodStatistics,
    #[serde(skip_serializing_if = "Option::is_none")]
    comparison: Option<&'a PeriodComparison>,
}

/// Run the period statistics pipeline.
pub fn run(args: StatisticsArgs) -> Result<()> {
    let _cmd = info_span!("statistics").entered();
    let config = CeresConfig::load(args.config.as_deref())?;
    let season_cfg = convert::build_season_config(&config.season, &args.season)?;
    let stats_cfg = convert::build_statistics_config(&config)?;

    info!(path = %args.input.display(), "reading daily table");
    let table = read_table(&args.input)
        .with_context(|| format!("failed to read table: {}", args.input.display()))?;
    let statistics = analyze_period(&table, args.latitude, &season_cfg, &stats_cfg)?;
    info!(
        days = statistics.overall.days,
        seasons = statistics.seasons.len(),
        "period summarised"
    );

    let comparison = match &args.baseline {
        Some(path) => {
            info!(path = %path.display(), "reading baseline table");
            let baseline = read_table(path)
                .with_context(|| format!("failed to read baseline table: {}", path.display()))?;
            let baseline_stats =
                ceres_assess::season_statistics(&baseline, args.latitude, &stats_cfg);
            Some(compare_statistics(&statistics.overall, &baseline_stats))
        }
        None => None,
    };

    let report = StatisticsReport {
        statistics: &statistics,
        comparison: comparison.as_ref(),
    };
    let text = StatisticsText {
        statistics: &statistics,
        comparison: comparison.as_ref(),
    };
    report::emit(&args.output, &report, &text)
}
