//! Detected season records.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// How a season window was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeasonMethod {
    /// Detected from rainfall by the season scan.
    RainfallBased,
    /// Given explicitly by the caller.
    UserProvided,
    /// The whole requested period.
    Period,
}

impl SeasonMethod {
    /// Name used in reports.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RainfallBased => "rainfall_based",
            Self::UserProvided => "user_provided",
            Self::Period => "period",
        }
    }
}

/// A growing season: onset to cessation, both inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Season {
    pub onset_date: NaiveDate,
    pub cessation_date: NaiveDate,
    /// `(cessation - onset).days + 1`.
    pub length_days: i64,
    pub onset_doy: u32,
    pub cessation_doy: u32,
}

impl Season {
    /// Season spanning `onset..=cessation`.
    pub fn new(onset_date: NaiveDate, cessation_date: NaiveDate) -> Self {
        Self {
            onset_date,
            cessation_date,
            length_days: (cessation_date - onset_date).num_days() + 1,
            onset_doy: onset_date.ordinal(),
            cessation_doy: cessation_date.ordinal(),
        }
    }
}

/// Result of season detection over one table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonAnalysis {
    pub seasons_detected: usize,
    pub seasons: Vec<Season>,
    /// Longest season; the earliest wins ties.
    pub main_season: Option<Season>,
    pub method: SeasonMethod,
}

impl SeasonAnalysis {
    /// Wraps detected seasons, picking the main season.
    pub fn from_seasons(seasons: Vec<Season>, method: SeasonMethod) -> Self {
        let mut main_season: Option<Season> = None;
        for s in &seasons {
            if main_season.is_none_or(|m| s.length_days > m.length_days) {
                main_season = Some(*s);
            }
        }
        Self {
            seasons_detected: seasons.len(),
            seasons,
            main_season,
            method,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn length_is_inclusive() {
        let s = Season::new(date(2021, 3, 1), date(2021, 3, 31));
        assert_eq!(s.length_days, 31);
        assert_eq!(s.onset_doy, 60);
        assert_eq!(s.cessation_doy, 90);
    }

    #[test]
    fn single_day_season() {
        let s = Season::new(date(2020, 12, 31), date(2020, 12, 31));
        assert_eq!(s.length_days, 1);
        assert_eq!(s.onset_doy, 366);
    }

    #[test]
    fn main_season_is_longest_first_on_ties() {
        let a = Season::new(date(2021, 1, 1), date(2021, 2, 9));
        let b = Season::new(date(2021, 3, 1), date(2021, 5, 30));
        let c = Season::new(date(2021, 9, 1), date(2021, 11, 30));
        assert_eq!(b.length_days, c.length_days);

        let analysis = SeasonAnalysis::from_seasons(vec![a, b, c], SeasonMethod::RainfallBased);
        assert_eq!(analysis.seasons_detected, 3);
        assert_eq!(analysis.main_season, Some(b));
    }

    #[test]
    fn no_seasons_no_main() {
        let analysis = SeasonAnalysis::from_seasons(vec![], SeasonMethod::RainfallBased);
        assert_eq!(analysis.seasons_detected, 0);
        assert!(analysis.main_season.is_none());
    }

    #[test]
    fn method_names() {
        assert_eq!(SeasonMethod::RainfallBased.as_str(), "rainfall_based");
        assert_eq!(SeasonMethod::UserProvided.as_str(), "user_provided");
        assert_eq!(SeasonMethod::Period.as_str(), "period");
    }
}
