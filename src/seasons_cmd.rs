//! Seasons command: detect growing seasons in one daily table.

use anyhow::{Context, Result};
use tracing::{info, info_span};

use ceres_io::read_table;
use ceres_season::detect_seasons;

use crate::cli::SeasonsArgs;
use crate::config::CeresConfig;
use crate::convert;
use crate::report::{self, SeasonsText};

/// Run season detection and print the result.
pub fn run(args: SeasonsArgs) -> Result<()> {
    let _cmd = info_span!("seasons").entered();
    let config = CeresConfig::load(args.config.as_deref())?;
    let season_cfg = convert::build_season_config(&config.season, &args.season)?;

    info!(path = %args.input.display(), "reading daily table");
    let table = read_table(&args.input)
        .with_context(|| format!("failed to read table: {}", args.input.display()))?;

    let analysis = detect_seasons(&table, args.latitude, &season_cfg)?;
    info!(seasons = analysis.seasons_detected, "season detection complete");

    report::emit(&args.output, &analysis, &SeasonsText(&analysis))
}
