//! Pure conversion functions: TOML config structs and CLI strings -> crate API types.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;

use ceres_assess::{DateRange, StatisticsConfig};
use ceres_hazard::CropTable;
use ceres_io::FetchPolicy;
use ceres_season::{SeasonConfig, WetDayTest};
use ceres_spell::DrySpellConfig;

use crate::cli::{SeasonArgs, WetDayTestArg};
use crate::config::*;

/// Parses a wet-day test name, taking its parameter from the season section.
pub fn parse_wet_day_test(name: &str, season: &SeasonToml) -> Result<WetDayTest> {
    match name.to_lowercase().as_str() {
        "radiative" => Ok(WetDayTest::Radiative {
            et0_fraction: season.et0_fraction,
        }),
        "fixed" => Ok(WetDayTest::FixedThreshold {
            mm: season.wet_threshold_mm,
        }),
        other => bail!("unknown wet-day test: {other:?}"),
    }
}

/// Parses a `"lat,lon"` pair in decimal degrees.
pub fn parse_location(s: &str) -> Result<(f64, f64)> {
    let Some((lat, lon)) = s.split_once(',') else {
        bail!("location must be \"lat,lon\", got {s:?}");
    };
    let lat: f64 = lat
        .trim()
        .parse()
        .with_context(|| format!("invalid latitude in {s:?}"))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .with_context(|| format!("invalid longitude in {s:?}"))?;
    if !(-90.0..=90.0).contains(&lat) {
        bail!("latitude {lat} is outside [-90, 90]");
    }
    if !(-180.0..=180.0).contains(&lon) {
        bail!("longitude {lon} is outside [-180, 180]");
    }
    Ok((lat, lon))
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid date {s:?}, expected YYYY-MM-DD"))
}

/// Parses an inclusive `start..=end` range from two date strings.
pub fn parse_range(start: &str, end: &str) -> Result<DateRange> {
    let (start, end) = (parse_date(start)?, parse_date(end)?);
    if start > end {
        bail!("start {start} is after end {end}");
    }
    Ok(DateRange::new(start, end))
}

/// Splits a comma-separated list, dropping blanks.
pub fn parse_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Builds a [`SeasonConfig`] from the TOML season section with CLI overrides.
pub fn build_season_config(season: &SeasonToml, overrides: &SeasonArgs) -> Result<SeasonConfig> {
    let mut wet_day_test = match overrides.wet_day_test {
        Some(WetDayTestArg::Radiative) => parse_wet_day_test("radiative", season)?,
        Some(WetDayTestArg::Fixed) => parse_wet_day_test("fixed", season)?,
        None => parse_wet_day_test(&season.wet_day_test, season)?,
    };
    if let Some(mm) = overrides.wet_threshold {
        match &mut wet_day_test {
            WetDayTest::FixedThreshold { mm: current } => *current = mm,
            WetDayTest::Radiative { .. } => {
                bail!("--wet-threshold only applies to the fixed wet-day test")
            }
        }
    }

    let cfg = SeasonConfig::new()
        .with_wet_day_test(wet_day_test)
        .with_gap_days(overrides.gap_days.unwrap_or(season.gap_days))
        .with_min_season_days(overrides.min_season_days.unwrap_or(season.min_season_days));
    cfg.validate()?;
    Ok(cfg)
}

/// Builds a [`DrySpellConfig`] from the TOML spell section.
pub fn build_spell_config(spell: &SpellToml) -> DrySpellConfig {
    DrySpellConfig::new()
        .with_precip_threshold(spell.precip_threshold)
        .with_min_dry_days(spell.min_dry_days)
}

/// Builds a [`StatisticsConfig`] from the statistics and spell sections.
pub fn build_statistics_config(config: &CeresConfig) -> Result<StatisticsConfig> {
    let cfg = StatisticsConfig::default()
        .with_rainy_day_mm(config.statistics.rainy_day_mm)
        .with_dry_threshold(config.statistics.dry_threshold)
        .with_spells(build_spell_config(&config.spell));
    cfg.validate()?;
    Ok(cfg)
}

/// Builds a [`FetchPolicy`] from the TOML fetch section.
pub fn build_fetch_policy(fetch: &FetchToml) -> Result<FetchPolicy> {
    let policy = FetchPolicy::default()
        .with_timeout(Duration::from_secs(fetch.timeout_secs))
        .with_retries(fetch.retries)
        .with_backoff(Duration::from_millis(fetch.backoff_ms));
    policy.validate()?;
    Ok(policy)
}

/// Loads a crop-threshold table, or the built-in one when no path is given.
///
/// A file replaces the built-in table entirely.
pub fn load_crop_table(path: Option<&Path>) -> Result<CropTable> {
    let Some(path) = path else {
        return Ok(CropTable::builtin());
    };
    let toml_str = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read thresholds file: {}", path.display()))?;
    let table: CropTable = toml::from_str(&toml_str)
        .with_context(|| format!("failed to parse thresholds file: {}", path.display()))?;
    table.validate()?;
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn wet_day_test_names() {
        let season = SeasonToml::default();
        assert_eq!(
            parse_wet_day_test("Radiative", &season).unwrap(),
            WetDayTest::Radiative { et0_fraction: 0.5 }
        );
        assert_eq!(
            parse_wet_day_test("fixed", &season).unwrap(),
            WetDayTest::FixedThreshold { mm: 1.0 }
        );
        let err = parse_wet_day_test("soil", &season).unwrap_err();
        assert!(err.to_string().contains("unknown wet-day test"));
    }

    #[test]
    fn location_parsing() {
        assert_eq!(parse_location("-1.286, 36.817").unwrap(), (-1.286, 36.817));
        assert!(parse_location("-1.286").is_err());
        assert!(parse_location("abc,36.8").is_err());
        assert!(parse_location("95.0,36.8").is_err());
        assert!(parse_location("10.0,200.0").is_err());
    }

    #[test]
    fn date_and_range_parsing() {
        let d = parse_date("2045-03-01").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2045, 3, 1).unwrap());
        assert!(parse_date("01/03/2045").is_err());
        assert!(parse_range("2045-06-30", "2045-03-01").is_err());
        let r = parse_range("2045-03-01", "2045-03-01").unwrap();
        assert_eq!(r.start, r.end);
    }

    #[test]
    fn list_parsing_drops_blanks() {
        assert_eq!(parse_list("SSP1-2.6, SSP5-8.5,,"), ["SSP1-2.6", "SSP5-8.5"]);
        assert!(parse_list(" ").is_empty());
    }

    #[test]
    fn cli_flags_override_file() {
        let season = SeasonToml {
            gap_days: 20,
            ..SeasonToml::default()
        };
        let overrides = SeasonArgs {
            wet_day_test: Some(WetDayTestArg::Fixed),
            wet_threshold: Some(3.0),
            min_season_days: Some(45),
            ..SeasonArgs::default()
        };
        let cfg = build_season_config(&season, &overrides).unwrap();
        assert_eq!(cfg.wet_day_test(), WetDayTest::FixedThreshold { mm: 3.0 });
        assert_eq!(cfg.gap_days(), 20);
        assert_eq!(cfg.min_season_days(), 45);
    }

    #[test]
    fn wet_threshold_needs_fixed_test() {
        let overrides = SeasonArgs {
            wet_threshold: Some(3.0),
            ..SeasonArgs::default()
        };
        assert!(build_season_config(&SeasonToml::default(), &overrides).is_err());
    }

    #[test]
    fn statistics_config_from_sections() {
        let config: CeresConfig =
            toml::from_str("[statistics]\nrainy_day_mm = 0.5\n[spell]\nmin_dry_days = 10\n")
                .unwrap();
        let cfg = build_statistics_config(&config).unwrap();
        assert_eq!(cfg.rainy_day_mm(), 0.5);
        assert_eq!(cfg.spells().min_dry_days(), 10);
    }

    #[test]
    fn fetch_policy_from_section() {
        let fetch = FetchToml {
            retries: 0,
            ..FetchToml::default()
        };
        let policy = build_fetch_policy(&fetch).unwrap();
        assert_eq!(policy.retries(), 0);
        assert_eq!(policy.timeout(), Duration::from_secs(120));

        let fetch = FetchToml {
            retries: 4_000_000_000,
            ..FetchToml::default()
        };
        assert!(build_fetch_policy(&fetch).is_err());
    }

    #[test]
    fn crop_table_file_replaces_builtin() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[crops.Teff.\"Total Precip\"]\nno_stress = {{ lower = 450.0, upper = 1000.0 }}"
        )
        .unwrap();
        let table = load_crop_table(Some(file.path())).unwrap();
        assert_eq!(table.crop_names().collect::<Vec<_>>(), ["Teff"]);
        assert!(table.lookup("maize").is_err());

        assert!(load_crop_table(None).unwrap().lookup("maize").is_ok());
    }
}
