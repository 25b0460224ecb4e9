//! Report emission: JSON or plain text on stdout, JSON to `--output`.

use std::fmt;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use ceres_assess::{
    Climatology, EnsembleReport, PeriodComparison, PeriodStatistics, ProjectionResult,
    ScenarioOutcome, SeasonStatistics,
};
use ceres_hazard::{StressLevel, VariableHazard};
use ceres_season::SeasonAnalysis;

use crate::cli::{OutputArgs, OutputFormat};

/// Prints `report` in the requested format and writes its JSON form to
/// `--output` when given.
pub fn emit<T: Serialize + ?Sized>(
    output: &OutputArgs,
    report: &T,
    text: &dyn fmt::Display,
) -> Result<()> {
    let json = ceres_assess::to_json(report)?;
    match output.format {
        OutputFormat::Json => println!("{json}"),
        OutputFormat::Text => print!("{text}"),
    }
    if let Some(path) = &output.output {
        std::fs::write(path, &json)
            .with_context(|| format!("failed to write report: {}", path.display()))?;
        info!(path = %path.display(), "report written");
    }
    Ok(())
}

fn marker(status: StressLevel) -> &'static str {
    match status {
        StressLevel::NoStress => "ok",
        StressLevel::ModerateStressLow | StressLevel::ModerateStressUp => "!",
        StressLevel::SevereStressLow | StressLevel::SevereStressUp => "!!",
        StressLevel::Unknown => "?",
    }
}

fn write_hazard(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    unit: &str,
    hazard: Option<&VariableHazard>,
) -> fmt::Result {
    match hazard {
        Some(h) => writeln!(
            f,
            "  {label:<14} {:>9.1} {unit:<3} {:<20} [{}]",
            h.value,
            h.status,
            marker(h.status)
        ),
        None => writeln!(f, "  {label:<14} {:>9} {unit:<3} {}", "-", StressLevel::Unknown),
    }
}

fn write_statistics(
    f: &mut fmt::Formatter<'_>,
    stats: &SeasonStatistics,
    indent: &str,
) -> fmt::Result {
    writeln!(f, "{indent}days: {}", stats.days)?;
    for (category, metrics) in stats.metrics() {
        writeln!(f, "{indent}{category}:")?;
        for (name, value) in metrics {
            writeln!(f, "{indent}  {name:<22} {value:>10.2}")?;
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Per-command text views
// ---------------------------------------------------------------------------

/// Text view of detected seasons.
pub struct SeasonsText<'a>(pub &'a SeasonAnalysis);

impl fmt::Display for SeasonsText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let analysis = self.0;
        writeln!(
            f,
            "Seasons detected: {} ({})",
            analysis.seasons_detected,
            analysis.method.as_str()
        )?;
        for (i, s) in analysis.seasons.iter().enumerate() {
            writeln!(
                f,
                "  {:>2}. {} -> {}  {:>4} days  (DOY {}-{})",
                i + 1,
                s.onset_date,
                s.cessation_date,
                s.length_days,
                s.onset_doy,
                s.cessation_doy
            )?;
        }
        if let Some(main) = analysis.main_season {
            writeln!(
                f,
                "Main season: {} -> {} ({} days)",
                main.onset_date, main.cessation_date, main.length_days
            )?;
        }
        Ok(())
    }
}

/// Text view of whole-period statistics, optionally against a baseline.
pub struct StatisticsText<'a> {
    pub statistics: &'a PeriodStatistics,
    pub comparison: Option<&'a PeriodComparison>,
}

impl fmt::Display for StatisticsText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Overall")?;
        write_statistics(f, &self.statistics.overall, "  ")?;

        writeln!(f)?;
        writeln!(f, "{}", SeasonsText(&self.statistics.season_analysis))?;
        for report in &self.statistics.seasons {
            writeln!(
                f,
                "Season {} ({} -> {})",
                report.season_number, report.season.onset_date, report.season.cessation_date
            )?;
            write_statistics(f, &report.statistics, "  ")?;
        }

        if let Some(comparison) = self.comparison {
            writeln!(f)?;
            writeln!(f, "Change from baseline")?;
            for (category, metrics) in &comparison.variables {
                writeln!(f, "  {category}:")?;
                for (name, m) in metrics {
                    writeln!(
                        f,
                        "    {name:<22} {:>10.2} vs {:>10.2}  ({:+.1}%)",
                        m.current, m.baseline, m.percent_change
                    )?;
                }
            }
        }
        Ok(())
    }
}

/// Text view of a single-season hazard assessment.
pub struct HazardsText<'a> {
    pub crop: &'a str,
    pub result: &'a ProjectionResult,
}

impl fmt::Display for HazardsText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let info = &self.result.season_info;
        writeln!(f, "Crop: {}", self.crop)?;
        writeln!(
            f,
            "Season: {} -> {} ({} days, {})",
            info.onset_date,
            info.cessation_date,
            info.length_days,
            info.method.as_str()
        )?;
        writeln!(f, "Hazards:")?;
        let hazards = &self.result.hazard_evaluation;
        write_hazard(f, "precipitation", "mm", hazards.precipitation.as_ref())?;
        write_hazard(f, "temperature", "C", hazards.temperature.as_ref())?;
        writeln!(f, "Season statistics:")?;
        write_statistics(f, &self.result.season_statistics, "  ")
    }
}

/// Text view of an ensemble run.
pub struct EnsembleText<'a>(pub &'a EnsembleReport);

impl fmt::Display for EnsembleText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        writeln!(
            f,
            "Crop: {}  Location: {:.3}, {:.3}",
            report.crop, report.location.latitude, report.location.longitude
        )?;

        let baseline = &report.baseline;
        writeln!(
            f,
            "Baseline {} -> {}",
            baseline.period.start, baseline.period.end
        )?;
        let hazards = &baseline.results.hazard_evaluation;
        write_hazard(f, "precipitation", "mm", hazards.precipitation.as_ref())?;
        write_hazard(f, "temperature", "C", hazards.temperature.as_ref())?;

        writeln!(
            f,
            "Future {} -> {}",
            report.future.period.start, report.future.period.end
        )?;
        for scenario in &report.scenarios {
            let Some(outcome) = report.future.ensembles.get(scenario) else {
                continue;
            };
            match outcome {
                ScenarioOutcome::Failed(payload) => {
                    writeln!(f, "  {scenario}: error: {}", payload.error)?;
                }
                ScenarioOutcome::Ensemble(e) => {
                    writeln!(f, "  {scenario} ({} models)", e.n_models)?;
                    let stats = &e.ensemble_statistics;
                    for (label, unit, spread, consensus) in [
                        ("precipitation", "mm", stats.precipitation, &e.consensus.precipitation),
                        ("temperature", "C", stats.temperature, &e.consensus.temperature),
                    ] {
                        writeln!(
                            f,
                            "    {label:<14} {:>8.1} {unit:<3} [{:.1}, {:.1}] sd {:.1}  \
                             {} ({:.0}% agree)",
                            spread.mean,
                            spread.min,
                            spread.max,
                            spread.std,
                            consensus.most_common,
                            consensus.agreement_pct
                        )?;
                    }
                    if let Some(change) = e.change_from_baseline {
                        writeln!(
                            f,
                            "    change         {:+.1} mm ({:+.1}%), {:+.2} C, \
                             {:+.1} dry spells (longest {:+.1} d)",
                            change.precipitation.absolute,
                            change.precipitation.percent,
                            change.temperature.absolute,
                            change.dry_spell_count.absolute,
                            change.dry_spell_max_length.absolute
                        )?;
                    }
                    for failed in &e.failed_models {
                        writeln!(f, "    skipped {}: {}", failed.model, failed.error)?;
                    }
                }
            }
        }
        Ok(())
    }
}

/// Word for the sign of a trend.
fn direction(slope: f64) -> &'static str {
    if slope > 0.0 {
        "up"
    } else if slope < 0.0 {
        "down"
    } else {
        "flat"
    }
}

/// Text view of a climatology.
pub struct ClimatologyText<'a>(pub &'a Climatology);

impl fmt::Display for ClimatologyText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.0;
        writeln!(
            f,
            "Climatology {}-{}: {}/{} years with data ({:.1}%){}",
            c.period.start_year,
            c.period.end_year,
            c.period.years_with_data,
            c.period.n_years,
            c.data_completeness_pct,
            if c.wmo_standard { ", WMO standard" } else { "" }
        )?;
        if let Some(p) = c.normals.precipitation {
            writeln!(f, "Precipitation ({} years)", p.years_used)?;
            writeln!(f, "  mean annual total   {:>10.2} mm", p.mean_annual_total_mm)?;
            writeln!(f, "  median annual total {:>10.2} mm", p.median_annual_total_mm)?;
            writeln!(f, "  std deviation       {:>10.2} mm", p.std_annual_total_mm)?;
            writeln!(
                f,
                "  range               {:>10.2} - {:.2} mm",
                p.min_annual_total_mm, p.max_annual_total_mm
            )?;
        }
        if let Some(t) = c.normals.temperature {
            writeln!(f, "Temperature ({} years)", t.years_used)?;
            writeln!(f, "  mean annual average {:>10.2} C", t.mean_annual_tavg)?;
            writeln!(f, "  mean annual maximum {:>10.2} C", t.mean_annual_tmax)?;
            writeln!(f, "  mean annual minimum {:>10.2} C", t.mean_annual_tmin)?;
            writeln!(
                f,
                "  range               {:>10.2} - {:.2} C",
                t.min_annual_tavg, t.max_annual_tavg
            )?;
        }
        if let Some(trends) = c.trends {
            writeln!(f, "Trends")?;
            if let Some(slope) = trends.precipitation_mm_per_year {
                writeln!(f, "  precipitation {:>5} {:.3} mm/year", direction(slope), slope.abs())?;
            }
            if let Some(slope) = trends.temperature_c_per_year {
                writeln!(f, "  temperature   {:>5} {:.4} C/year", direction(slope), slope.abs())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ceres_season::{Season, SeasonMethod};
    use chrono::NaiveDate;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, m, d).unwrap()
    }

    #[test]
    fn seasons_text_lists_every_season() {
        let analysis = SeasonAnalysis::from_seasons(
            vec![
                Season::new(date(3, 10), date(5, 20)),
                Season::new(date(10, 15), date(12, 10)),
            ],
            SeasonMethod::RainfallBased,
        );
        let text = SeasonsText(&analysis).to_string();
        assert!(text.starts_with("Seasons detected: 2 (rainfall_based)"));
        assert!(text.contains("2022-03-10 -> 2022-05-20"));
        assert!(text.contains("Main season: 2022-03-10 -> 2022-05-20 (72 days)"));
    }

    #[test]
    fn markers_by_severity() {
        assert_eq!(marker(StressLevel::NoStress), "ok");
        assert_eq!(marker(StressLevel::ModerateStressUp), "!");
        assert_eq!(marker(StressLevel::SevereStressLow), "!!");
        assert_eq!(marker(StressLevel::Unknown), "?");
    }

    #[test]
    fn trend_directions() {
        assert_eq!(direction(0.05), "up");
        assert_eq!(direction(-1.2), "down");
        assert_eq!(direction(0.0), "flat");
    }

    #[test]
    fn emit_writes_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let output = OutputArgs {
            format: OutputFormat::Json,
            output: Some(path.clone()),
        };
        emit(&output, &serde_json::json!({"crop": "Maize"}), &"unused").unwrap();
        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["crop"], "Maize");
    }
}
