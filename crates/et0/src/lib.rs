//! Reference evapotranspiration (ET0) by the Hargreaves-Samani method.
//!
//! ET0 is estimated from the daily temperature range and extraterrestrial
//! radiation, which depends only on latitude and day of year. All functions
//! are pure and never fail: missing or inconsistent temperatures give 0.

use std::f64::consts::PI;

use ceres_io::DailyTable;
use chrono::{Datelike, NaiveDate};

/// Solar constant (MJ m^-2 min^-1).
const SOLAR_CONSTANT: f64 = 0.0820;

/// Hargreaves empirical coefficient.
const HARGREAVES_COEFF: f64 = 0.0023;

/// Temperature offset of the Hargreaves equation (°C).
const HARGREAVES_OFFSET: f64 = 17.8;

/// Extraterrestrial radiation Ra (MJ m^-2 day^-1) at `latitude` (decimal
/// degrees) on day-of-year `doy`.
///
/// The sunset hour angle argument is clamped to [-1, 1], so polar day and
/// polar night are handled without NaN.
pub fn extraterrestrial_radiation(latitude: f64, doy: u32) -> f64 {
    let lat_rad = latitude.to_radians();
    let j = f64::from(doy);

    let declination = 0.409 * (2.0 * PI / 365.0 * j - 1.39).sin();
    let inverse_distance = 1.0 + 0.033 * (2.0 * PI / 365.0 * j).cos();
    let sunset_angle = (-lat_rad.tan() * declination.tan()).clamp(-1.0, 1.0).acos();

    (24.0 * 60.0 / PI)
        * SOLAR_CONSTANT
        * inverse_distance
        * (sunset_angle * lat_rad.sin() * declination.sin()
            + lat_rad.cos() * declination.cos() * sunset_angle.sin())
}

/// Daily reference evapotranspiration (mm/day).
///
/// Returns 0 when either temperature is missing or `tmax < tmin`. The
/// result is clamped at 0, so very cold days never yield negative ET0.
pub fn et0(tmin: Option<f64>, tmax: Option<f64>, latitude: f64, date: NaiveDate) -> f64 {
    let (Some(tmin), Some(tmax)) = (tmin, tmax) else {
        return 0.0;
    };
    if tmax < tmin {
        return 0.0;
    }

    let ra = extraterrestrial_radiation(latitude, date.ordinal());
    let tmean = (tmax + tmin) / 2.0;
    (HARGREAVES_COEFF * (tmax - tmin).sqrt() * (tmean + HARGREAVES_OFFSET) * ra).max(0.0)
}

/// ET0 for every row of `table`, or `None` without both temperature columns.
pub fn et0_series(table: &DailyTable, latitude: f64) -> Option<Vec<f64>> {
    let tmax = table.max_temperature()?;
    let tmin = table.min_temperature()?;
    Some(
        table
            .dates()
            .iter()
            .zip(tmin.iter().zip(tmax))
            .map(|(&date, (&lo, &hi))| et0(Some(lo), Some(hi), latitude, date))
            .collect(),
    )
}
