//! Growing-season detection from daily rainfall.
//!
//! Days are classified wet or dry, then a two-state scan finds each
//! season's onset (first wet day) and cessation (last wet day before a run of
//! `gap_days` dry days).
//!
//! # Pipeline
//!
//! ```text
//!  ┌───────────────┐     ┌──────────────────┐     ┌──────────────────┐
//!  │  et0 series   │────▶│ classify_wet_days│────▶│   scan_seasons   │
//!  │  (optional)   │     │  (WetDayTest)    │     │  (state machine) │
//!  └───────────────┘     └──────────────────┘     └──────────────────┘
//! ```
//!
//! # Quick start
//!
//! ```rust
//! use ceres_season::{SeasonConfig, WetDayTest};
//!
//! let config = SeasonConfig::new()
//!     .with_wet_day_test(WetDayTest::FixedThreshold { mm: 1.0 })
//!     .with_gap_days(21);
//!
//! assert!(config.validate().is_ok());
//! ```

pub mod config;
pub mod detect;
pub mod error;
pub mod scan;
pub mod season;

pub use config::{SeasonConfig, WetDayTest};
pub use detect::detect_seasons;
pub use error::SeasonError;
pub use scan::{classify_wet_days, scan_seasons};
pub use season::{Season, SeasonAnalysis, SeasonMethod};
