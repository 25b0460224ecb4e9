//! Data-source contract and the bounded fetch policy around it.

use std::path::{Path, PathBuf};
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::Duration;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::error::IoError;
use crate::reader::read_table;
use crate::table::DailyTable;

/// What to fetch: one location, one date window, one scenario/model pair.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// First day of the window (inclusive).
    pub start: NaiveDate,
    /// Last day of the window (inclusive).
    pub end: NaiveDate,
    /// Emission scenario, e.g. `SSP2-4.5`, or `Historical` for observations.
    pub scenario: String,
    /// Climate model name, or `Observed` for the baseline.
    pub model: String,
}

/// Anything able to produce a daily table for a [`FetchRequest`].
///
/// Implementations must be shareable across threads: the ensemble runner
/// fetches several models concurrently.
pub trait DataSource: Send + Sync {
    /// Fetch the daily table for `request`.
    ///
    /// # Errors
    ///
    /// Implementations return [`IoError::Source`] for transient failures,
    /// which [`fetch_with_policy`] retries.
    fn fetch(&self, request: &FetchRequest) -> Result<DailyTable, IoError>;
}

// ---------------------------------------------------------------------------
// FetchPolicy
// ---------------------------------------------------------------------------

/// Upper bound on [`FetchPolicy`] retries.
pub const MAX_RETRIES: u32 = 10;

/// Timeout and retry bounds applied to each fetch.
#[derive(Debug, Clone)]
pub struct FetchPolicy {
    /// Maximum wall time per attempt.
    timeout: Duration,
    /// Extra attempts after the first one.
    retries: u32,
    /// Sleep before the first retry; doubled on each further retry.
    backoff: Duration,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(120),
            retries: 2,
            backoff: Duration::from_millis(500),
        }
    }
}

impl FetchPolicy {
    /// Set the per-attempt timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the number of retries after the first attempt.
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Set the initial backoff between attempts.
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Per-attempt timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Number of retries after the first attempt.
    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Validate the policy.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Validation`] if the timeout is zero or the retry
    /// count exceeds [`MAX_RETRIES`].
    pub fn validate(&self) -> Result<(), IoError> {
        if self.timeout.is_zero() {
            return Err(IoError::Validation {
                count: 1,
                details: "fetch timeout must be greater than 0".to_string(),
            });
        }
        if self.retries > MAX_RETRIES {
            return Err(IoError::Validation {
                count: 1,
                details: format!(
                    "fetch retries must be at most {MAX_RETRIES}, got {}",
                    self.retries
                ),
            });
        }
        Ok(())
    }
}

/// Fetch through `source` under `policy`.
///
/// Each attempt runs on a worker thread and is abandoned after
/// `policy.timeout()`. Timeouts and [retryable](IoError::is_retryable)
/// errors are retried up to `policy.retries()` times with exponential
/// backoff; any other error is returned immediately.
///
/// # Errors
///
/// Returns [`IoError::Timeout`] when the last attempt timed out, otherwise
/// the last error reported by the source.
pub fn fetch_with_policy<S>(
    source: &Arc<S>,
    request: &FetchRequest,
    policy: &FetchPolicy,
) -> Result<DailyTable, IoError>
where
    S: DataSource + ?Sized + 'static,
{
    policy.validate()?;

    let attempts = policy.retries + 1;
    let mut sleep = policy.backoff;

    for attempt in 1..=attempts {
        let (tx, rx) = mpsc::channel();
        let worker_source = Arc::clone(source);
        let worker_request = request.clone();
        thread::spawn(move || {
            // The receiver is gone if the attempt already timed out.
            let _ = tx.send(worker_source.fetch(&worker_request));
        });

        let err = match rx.recv_timeout(policy.timeout) {
            Ok(Ok(table)) => {
                debug!(
                    scenario = %request.scenario,
                    model = %request.model,
                    attempt,
                    rows = table.len(),
                    "fetch succeeded"
                );
                return Ok(table);
            }
            Ok(Err(e)) => e,
            Err(mpsc::RecvTimeoutError::Timeout) => IoError::Timeout {
                attempts: attempt,
                timeout: policy.timeout,
            },
            Err(mpsc::RecvTimeoutError::Disconnected) => IoError::Source {
                reason: "fetch worker terminated without a result".to_string(),
            },
        };

        if !err.is_retryable() || attempt == attempts {
            return Err(err);
        }

        warn!(
            scenario = %request.scenario,
            model = %request.model,
            attempt,
            attempts,
            error = %err,
            "fetch attempt failed, retrying"
        );
        thread::sleep(sleep);
        sleep = sleep.saturating_mul(2);
    }

    // attempts >= 1, so the loop always returns.
    Err(IoError::Timeout {
        attempts,
        timeout: policy.timeout,
    })
}

// ---------------------------------------------------------------------------
// DirectorySource
// ---------------------------------------------------------------------------

/// Serves tables laid out as `{root}/{scenario}/{model}.parquet` (or `.csv`).
///
/// The file is read whole and sliced to the requested window.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    /// Source rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// First existing file for `scenario`/`model`, preferring Parquet.
    fn locate(&self, scenario: &str, model: &str) -> Result<PathBuf, IoError> {
        let dir = self.root.join(scenario);
        ["parquet", "csv"]
            .iter()
            .map(|ext| dir.join(format!("{model}.{ext}")))
            .find(|p| p.is_file())
            .ok_or_else(|| IoError::FileNotFound {
                path: dir.join(format!("{model}.parquet")),
            })
    }
}

impl DataSource for DirectorySource {
    fn fetch(&self, request: &FetchRequest) -> Result<DailyTable, IoError> {
        let path = self.locate(&request.scenario, &request.model)?;
        info!(
            path = %path.display(),
            start = %request.start,
            end = %request.end,
            "reading table"
        );

        let window = read_table(&path)?.slice(request.start, request.end);
        if window.is_empty() {
            return Err(IoError::EmptyRange {
                start: request.start,
                end: request.end,
            });
        }
        Ok(window)
    }
}
