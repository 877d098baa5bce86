//! Evaluation of many observers against one ephemeris.
//!
//! Every observer is independent: [`run_batch`] builds one [`Observer`] per
//! [`GeoPoint`], estimates it over the same [`SearchWindow`] and records the
//! outcome, or the error, against the point. A failure never stops the other
//! observers. With the `parallel` feature the observers are spread on the
//! rayon thread pool; the report always keeps the input order.
//!
//! [`EclipseRecord`] is the flat output row: latitude, longitude, time of
//! maximum as ISO 8601 UTC (absent when not visible or failed) and the
//! magnitude rounded to a fixed number of decimals.
use std::{fmt, str::FromStr};

use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Table};
use log::{debug, info, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[cfg(feature = "progress")]
use indicatif::{ProgressBar, ProgressStyle};

use crate::constants::Degree;
use crate::eclipsis_errors::{EclipsisError, ErrorKind};
use crate::ephemeris::EphemerisProvider;
use crate::observers::Observer;
use crate::time::format_utc_iso;

use super::estimator::{EclipseEstimator, EclipseOutcome, EstimatorConfig};
use super::search_window::SearchWindow;

/// A `(latitude, longitude)` pair in degrees, as given by the user.
///
/// Not validated: range checks happen when the [`Observer`] is built, so an
/// invalid point is reported as a failure of that point only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: Degree,
    pub longitude: Degree,
}

impl GeoPoint {
    pub fn new(latitude: Degree, longitude: Degree) -> Self {
        GeoPoint {
            latitude,
            longitude,
        }
    }

    pub fn to_observer(&self) -> Result<Observer, EclipsisError> {
        Observer::from_lat_lon(self.latitude, self.longitude)
    }
}

impl FromStr for GeoPoint {
    type Err = EclipsisError;

    /// Parse `"LAT,LON"`, e.g. `"40.4,-3.7"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| EclipsisError::InvalidGeoPoint(format!("{s}: expected LAT,LON")))?;
        let parse = |value: &str| {
            value
                .trim()
                .parse::<f64>()
                .map_err(|e| EclipsisError::InvalidGeoPoint(format!("{s}: {e}")))
        };
        Ok(GeoPoint::new(parse(lat)?, parse(lon)?))
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

/// Outcome of one point of a batch.
#[derive(Debug, PartialEq)]
pub struct ObserverOutcome {
    pub point: GeoPoint,
    pub result: Result<EclipseOutcome, EclipsisError>,
}

impl ObserverOutcome {
    pub fn is_failure(&self) -> bool {
        self.result.is_err()
    }

    /// Flat output row, magnitude rounded to `decimals`.
    pub fn record(&self, decimals: u32) -> EclipseRecord {
        let (max_time_utc, magnitude, status) = match &self.result {
            Ok(EclipseOutcome::Visible(estimate)) => (
                Some(format_utc_iso(&estimate.time_of_maximum)),
                Some(round_to(estimate.magnitude, decimals)),
                RecordStatus::Visible,
            ),
            Ok(EclipseOutcome::NotVisible) => (None, Some(0.0), RecordStatus::NotVisible),
            Err(err) => (None, None, RecordStatus::Failed(err.kind())),
        };

        EclipseRecord {
            lat: self.point.latitude,
            long: self.point.longitude,
            max_time_utc,
            magnitude,
            status,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordStatus {
    Visible,
    NotVisible,
    Failed(ErrorKind),
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordStatus::Visible => write!(f, "visible"),
            RecordStatus::NotVisible => write!(f, "not visible"),
            RecordStatus::Failed(kind) => write!(f, "failed: {kind}"),
        }
    }
}

/// One output row.
#[derive(Debug, Clone, PartialEq)]
pub struct EclipseRecord {
    pub lat: Degree,
    pub long: Degree,
    /// ISO 8601 UTC, millisecond resolution.
    pub max_time_utc: Option<String>,
    /// `None` for a failed observer.
    pub magnitude: Option<f64>,
    pub status: RecordStatus,
}

/// Round half away from zero to `decimals` decimals.
///
/// `value` is returned unchanged when `10^decimals` is not representable.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let Ok(exponent) = i32::try_from(decimals) else {
        return value;
    };
    let factor = 10f64.powi(exponent);
    if !factor.is_finite() {
        return value;
    }
    let rounded = (value * factor).round() / factor;
    if rounded.is_finite() {
        rounded
    } else {
        value
    }
}

/// Counts of a finished batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchSummary {
    pub total: usize,
    pub visible: usize,
    /// Visible with a positive magnitude.
    pub eclipsed: usize,
    pub not_visible: usize,
    pub failed: usize,
    /// Failed on invalid coordinates, before any ephemeris evaluation.
    pub rejected: usize,
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} observers: {} visible ({} with contact), {} not visible, {} failed ({} rejected)",
            self.total,
            self.visible,
            self.eclipsed,
            self.not_visible,
            self.failed,
            self.rejected
        )
    }
}

/// Outcomes of a batch, in input order.
#[derive(Debug, PartialEq)]
pub struct BatchReport {
    outcomes: Vec<ObserverOutcome>,
    decimals: u32,
}

impl BatchReport {
    pub fn outcomes(&self) -> &[ObserverOutcome] {
        &self.outcomes
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Failed points with their error, in input order.
    pub fn failures(&self) -> impl Iterator<Item = (&GeoPoint, &EclipsisError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|err| (&o.point, err)))
    }

    pub fn records(&self) -> Vec<EclipseRecord> {
        self.outcomes.iter().map(|o| o.record(self.decimals)).collect()
    }

    pub fn summary(&self) -> BatchSummary {
        self.outcomes
            .iter()
            .fold(BatchSummary::default(), |mut summary, outcome| {
                summary.total += 1;
                match &outcome.result {
                    Ok(EclipseOutcome::Visible(estimate)) => {
                        summary.visible += 1;
                        if estimate.magnitude > 0.0 {
                            summary.eclipsed += 1;
                        }
                    }
                    Ok(EclipseOutcome::NotVisible) => summary.not_visible += 1,
                    Err(err) => {
                        summary.failed += 1;
                        if err.is_invalid_input() {
                            summary.rejected += 1;
                        }
                    }
                }
                summary
            })
    }

    /// Result table: `lat`, `long`, `max_time_utc`, `magnitude`, `status`.
    pub fn results_table(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["lat", "long", "max_time_utc", "magnitude", "status"]);

        for record in self.records() {
            table.add_row(vec![
                Cell::new(record.lat).set_alignment(CellAlignment::Right),
                Cell::new(record.long).set_alignment(CellAlignment::Right),
                Cell::new(record.max_time_utc.as_deref().unwrap_or("-")),
                Cell::new(
                    record
                        .magnitude
                        .map(|m| format!("{:.*}", self.decimals as usize, m))
                        .unwrap_or_else(|| "-".into()),
                )
                .set_alignment(CellAlignment::Right),
                Cell::new(record.status),
            ]);
        }
        table
    }

    /// Failed observers with the reason, or `None` when every observer succeeded.
    pub fn failures_table(&self) -> Option<Table> {
        let mut failures = self.failures().peekable();
        failures.peek()?;

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["lat", "long", "kind", "reason"]);
        for (point, err) in failures {
            table.add_row(vec![
                Cell::new(point.latitude),
                Cell::new(point.longitude),
                Cell::new(err.kind()),
                Cell::new(err),
            ]);
        }
        Some(table)
    }
}

fn evaluate_point<P: ?Sized + EphemerisProvider>(
    estimator: &EclipseEstimator<'_, P>,
    point: &GeoPoint,
    window: &SearchWindow,
) -> ObserverOutcome {
    let result = point
        .to_observer()
        .and_then(|observer| estimator.estimate(&observer, window));

    match &result {
        Ok(outcome) => debug!("{point}: {outcome:?}"),
        Err(err) => warn!("{point}: {err}"),
    }

    ObserverOutcome {
        point: *point,
        result,
    }
}

/// Estimate every point over the same window.
///
/// Arguments
/// -----------------
/// * `provider`: the loaded ephemeris, shared read-only by every evaluation.
/// * `points`: the observers, reported in this order.
/// * `window`: the search window common to all observers.
/// * `config`: estimator options.
/// * `decimals`: rounding of the magnitudes of the output rows.
///
/// Return
/// ----------
/// * A [`BatchReport`] with exactly one outcome per point.
pub fn run_batch<P: ?Sized + EphemerisProvider>(
    provider: &P,
    points: &[GeoPoint],
    window: &SearchWindow,
    config: &EstimatorConfig,
    decimals: u32,
) -> BatchReport {
    let estimator = EclipseEstimator::new(provider, config.clone());

    #[cfg(feature = "progress")]
    let pb = {
        let pb = ProgressBar::new(points.len().max(1) as u64);
        if let Ok(style) = ProgressStyle::with_template(
            "{bar:40.cyan/blue} {pos}/{len} ({percent:>3}%) | {per_sec} | ETA {eta_precise}",
        ) {
            pb.set_style(style);
        }
        pb
    };

    let evaluate = |point: &GeoPoint| {
        let outcome = evaluate_point(&estimator, point, window);
        #[cfg(feature = "progress")]
        pb.inc(1);
        outcome
    };

    #[cfg(feature = "parallel")]
    let outcomes: Vec<ObserverOutcome> = points.par_iter().map(evaluate).collect();

    #[cfg(not(feature = "parallel"))]
    let outcomes: Vec<ObserverOutcome> = points.iter().map(evaluate).collect();

    #[cfg(feature = "progress")]
    pb.finish_and_clear();

    let report = BatchReport { outcomes, decimals };
    let summary = report.summary();
    if summary.failed > 0 {
        warn!("{summary}");
    } else {
        info!("{summary}");
    }
    report
}
