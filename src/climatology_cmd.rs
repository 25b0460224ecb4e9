//! Climatology command: multi-year normals and trends of one table.

use anyhow::{Context, Result, bail};
use tracing::{info, info_span, warn};

use ceres_assess::{MIN_TREND_YEARS, WMO_NORMAL_YEARS, climatology};
use ceres_io::read_table;

use crate::cli::ClimatologyArgs;
use crate::config::CeresConfig;
use crate::convert;
use crate::report::{self, ClimatologyText};

/// Run the climatology pipeline.
pub fn run(args: ClimatologyArgs) -> Result<()> {
    let _cmd = info_span!("climatology", start = args.start_year, end = args.end_year).entered();
    if args.end_year < args.start_year {
        bail!("end year must not be before start year");
    }
    let n_years = (i64::from(args.end_year) - i64::from(args.start_year) + 1) as usize;
    if n_years < MIN_TREND_YEARS {
        warn!(
            n_years,
            recommended = WMO_NORMAL_YEARS,
            "short period; normals may not be robust"
        );
    }

    let config = CeresConfig::load(args.config.as_deref())?;
    let stats_cfg = convert::build_statistics_config(&config)?;

    info!(path = %args.input.display(), "reading daily table");
    let table = read_table(&args.input)
        .with_context(|| format!("failed to read table: {}", args.input.display()))?;
    let result = climatology(&table, args.start_year, args.end_year, &stats_cfg)?;

    report::emit(&args.output, &result, &ClimatologyText(&result))
}
