//! Wet-day classification and the onset/cessation scan.

use chrono::NaiveDate;

use crate::config::{SeasonConfig, WetDayTest};
use crate::season::Season;

/// Classifies each day as wet (`true`) or dry.
///
/// The output has one entry per precipitation value. `et0` is only read by
/// [`WetDayTest::Radiative`]; days beyond its end use an ET0 of 0.
pub fn classify_wet_days(precipitation: &[f64], et0: &[f64], test: WetDayTest) -> Vec<bool> {
    match test {
        WetDayTest::Radiative { et0_fraction } => precipitation
            .iter()
            .enumerate()
            .map(|(i, &p)| p >= et0_fraction * et0.get(i).copied().unwrap_or(0.0))
            .collect(),
        WetDayTest::FixedThreshold { mm } => precipitation.iter().map(|&p| p >= mm).collect(),
    }
}

#[derive(Debug, Clone, Copy)]
enum ScanState {
    Scanning,
    InSeason { onset: usize, dry_run: usize },
}

/// Finds growing seasons in a wet/dry sequence.
///
/// A wet day starts a season. Inside a season every dry day extends the dry
/// run and every wet day resets it; when the run reaches `gap_days` the
/// season ends on the last wet day. A season still open at the end of the
/// series ends on the last date. Seasons shorter than `min_season_days` are
/// dropped and scanning resumes the day after their onset; otherwise it
/// resumes the day after cessation.
///
/// `dates` and `wet` are read pairwise.
pub fn scan_seasons(dates: &[NaiveDate], wet: &[bool], config: &SeasonConfig) -> Vec<Season> {
    let n = dates.len().min(wet.len());
    let gap = config.gap_days().max(1);
    let min_len = config.min_season_days();

    let mut seasons = Vec::new();
    let mut state = ScanState::Scanning;
    let mut i = 0;

    // Closes the season and returns the index at which scanning resumes.
    let mut close = |onset: usize, cessation: usize| {
        let season = Season::new(dates[onset], dates[cessation]);
        if season.length_days >= min_len {
            seasons.push(season);
            cessation + 1
        } else {
            onset + 1
        }
    };

    loop {
        if i >= n {
            match state {
                ScanState::Scanning => break,
                ScanState::InSeason { onset, .. } => {
                    i = close(onset, n - 1);
                    state = ScanState::Scanning;
                    continue;
                }
            }
        }

        state = match state {
            ScanState::Scanning => {
                let next = if wet[i] {
                    ScanState::InSeason {
                        onset: i,
                        dry_run: 0,
                    }
                } else {
                    ScanState::Scanning
                };
                i += 1;
                next
            }
            ScanState::InSeason { onset, .. } if wet[i] => {
                i += 1;
                ScanState::InSeason { onset, dry_run: 0 }
            }
            ScanState::InSeason { onset, dry_run } if dry_run + 1 >= gap => {
                i = close(onset, i - gap);
                ScanState::Scanning
            }
            ScanState::InSeason { onset, dry_run } => {
                i += 1;
                ScanState::InSeason {
                    onset,
                    dry_run: dry_run + 1,
                }
            }
        };
    }

    seasons
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dates(n: usize) -> Vec<NaiveDate> {
        NaiveDate::from_ymd_opt(2021, 1, 1)
            .unwrap()
            .iter_days()
            .take(n)
            .collect()
    }

    /// Builds a wet mask from a pattern of (is_wet, run length) pairs.
    fn mask(runs: &[(bool, usize)]) -> Vec<bool> {
        runs.iter()
            .flat_map(|&(w, len)| std::iter::repeat_n(w, len))
            .collect()
    }

    fn config(gap: usize, min_len: i64) -> SeasonConfig {
        SeasonConfig::new()
            .with_gap_days(gap)
            .with_min_season_days(min_len)
    }

    #[test]
    fn classify_fixed_threshold() {
        let wet = classify_wet_days(&[0.0, 0.99, 1.0, 5.0], &[], WetDayTest::fixed());
        assert_eq!(wet, vec![false, false, true, true]);
    }

    #[test]
    fn classify_radiative() {
        let wet = classify_wet_days(
            &[2.0, 2.0, 0.0, 3.0],
            &[4.0, 5.0, 0.0, 0.0],
            WetDayTest::radiative(),
        );
        // 2 >= 2, 2 < 2.5, 0 >= 0, 3 >= 0
        assert_eq!(wet, vec![true, false, true, true]);
    }

    #[test]
    fn classify_radiative_short_et0() {
        let wet = classify_wet_days(&[0.0, 0.0], &[10.0], WetDayTest::radiative());
        assert_eq!(wet, vec![false, true]);
    }

    #[test]
    fn all_dry_has_no_season() {
        let wet = vec![false; 90];
        assert!(scan_seasons(&dates(90), &wet, &config(30, 30)).is_empty());
    }

    #[test]
    fn cessation_is_last_wet_day_before_gap() {
        // 5 dry, 40 wet, 35 dry
        let wet = mask(&[(false, 5), (true, 40), (false, 35)]);
        let d = dates(wet.len());
        let seasons = scan_seasons(&d, &wet, &config(30, 30));

        assert_eq!(seasons.len(), 1);
        assert_eq!(seasons[0].onset_date, d[5]);
        assert_eq!(seasons[0].cessation_date, d[44]);
        assert_eq!(seasons[0].length_days, 40);
    }

    #[test]
    fn open_season_ends_on_last_date() {
        let wet = mask(&[(false, 2), (true, 10), (false, 5), (true, 30)]);
        let d = dates(wet.len());
        let seasons = scan_seasons(&d, &wet, &config(30, 30));

        assert_eq!(seasons.len(), 1);
        assert_eq!(seasons[0].onset_date, d[2]);
        assert_eq!(seasons[0].cessation_date, *d.last().unwrap());
    }

    #[test]
    fn dry_runs_shorter_than_gap_do_not_end_season() {
        let wet = mask(&[(true, 10), (false, 29), (true, 10), (false, 30)]);
        let d = dates(wet.len());
        let seasons = scan_seasons(&d, &wet, &config(30, 30));

        assert_eq!(seasons.len(), 1);
        assert_eq!(seasons[0].onset_date, d[0]);
        assert_eq!(seasons[0].cessation_date, d[48]);
        assert_eq!(seasons[0].length_days, 49);
    }

    #[test]
    fn two_seasons_split_by_gap() {
        let wet = mask(&[(true, 40), (false, 30), (true, 35), (false, 30)]);
        let d = dates(wet.len());
        let seasons = scan_seasons(&d, &wet, &config(30, 30));

        assert_eq!(seasons.len(), 2);
        assert_eq!(seasons[0].cessation_date, d[39]);
        assert_eq!(seasons[1].onset_date, d[70]);
        assert_eq!(seasons[1].length_days, 35);
    }

    #[test]
    fn short_season_is_discarded() {
        let wet = mask(&[(true, 10), (false, 30), (true, 40), (false, 30)]);
        let d = dates(wet.len());
        let seasons = scan_seasons(&d, &wet, &config(30, 30));

        assert_eq!(seasons.len(), 1);
        assert_eq!(seasons[0].onset_date, d[40]);
        assert_eq!(seasons[0].length_days, 40);
    }

    #[test]
    fn short_open_season_at_end_is_discarded() {
        let wet = mask(&[(false, 50), (true, 5), (false, 3), (true, 2)]);
        assert!(scan_seasons(&dates(wet.len()), &wet, &config(30, 30)).is_empty());
    }

    #[test]
    fn alternating_rain_is_one_long_season() {
        let wet: Vec<bool> = (0..120).map(|i| i % 2 == 0).collect();
        let d = dates(120);
        let seasons = scan_seasons(&d, &wet, &config(30, 30));

        assert_eq!(seasons.len(), 1);
        assert_eq!(seasons[0].onset_date, d[0]);
        assert_eq!(seasons[0].cessation_date, d[119]);
        assert!(seasons[0].length_days >= 30);
    }

    #[test]
    fn every_season_meets_minimum_length() {
        let pattern: Vec<bool> = (0..400).map(|i| (i * 7919) % 11 < 3).collect();
        let d = dates(400);
        for gap in [3, 5, 10] {
            for min_len in [1, 5, 20] {
                for s in scan_seasons(&d, &pattern, &config(gap, min_len)) {
                    assert!(s.length_days >= min_len);
                    assert_eq!(
                        s.length_days,
                        (s.cessation_date - s.onset_date).num_days() + 1
                    );
                    assert!(s.cessation_date >= s.onset_date);
                }
            }
        }
    }

    #[test]
    fn seasons_do_not_overlap() {
        let pattern: Vec<bool> = (0..300).map(|i| (i / 9) % 4 != 3).collect();
        let d = dates(300);
        let seasons = scan_seasons(&d, &pattern, &config(5, 3));
        for pair in seasons.windows(2) {
            assert!(pair[0].cessation_date < pair[1].onset_date);
        }
    }

    #[test]
    fn empty_input() {
        assert!(scan_seasons(&[], &[], &SeasonConfig::default()).is_empty());
    }
}
