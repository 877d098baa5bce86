//! Time of maximum eclipse and magnitude for one observer.
//!
//! The estimator runs two operations against an [`EphemerisProvider`]:
//!
//! * [`EclipseEstimator::locate_maximum`] scans every sample of a
//!   [`SearchWindow`] and keeps the one with the smallest Sun–Moon angular
//!   separation (first one on ties). The resulting instant is known to within
//!   half the local sample spacing.
//! * [`EclipseEstimator::magnitude_at`] evaluates the disk geometry again at
//!   one instant and converts it to a magnitude.
//!
//! [`EclipseEstimator::estimate`] chains them, with the optional parabolic
//! refinement of the minimum and the optional horizon gate of
//! [`EstimatorConfig`].
//!
//! Any provider error aborts the scan: no sample is silently skipped, so a
//! reported maximum is always the minimum over the full window.
use std::time::Instant;

use hifitime::{Duration, Epoch};
use log::debug;

use crate::constants::Radian;
use crate::eclipsis_errors::EclipsisError;
use crate::ephemeris::{Body, EphemerisProvider};
use crate::observers::Observer;
use crate::ref_system::angular_separation;

use super::magnitude::{ContactGeometry, DiskGeometry};
use super::search_window::SearchWindow;

/// Post-processing of the discrete minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Refinement {
    /// Keep the sample found by the scan.
    #[default]
    None,
    /// Vertex of the parabola through the minimum and its two neighbours,
    /// clamped between the neighbours.
    Parabolic,
}

/// Options of an [`EclipseEstimator`].
///
/// The default reproduces a plain linear scan: no horizon gate, no
/// refinement, no time budget.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EstimatorConfig {
    /// Report observers whose Sun is below the horizon at the maximum as not visible.
    pub horizon_gating: bool,
    pub refinement: Refinement,
    /// Wall-clock limit of the separation scan of one observer.
    pub time_budget: Option<std::time::Duration>,
}

impl EstimatorConfig {
    pub fn with_horizon_gating(mut self, enabled: bool) -> Self {
        self.horizon_gating = enabled;
        self
    }

    pub fn with_refinement(mut self, refinement: Refinement) -> Self {
        self.refinement = refinement;
        self
    }

    pub fn with_time_budget(mut self, budget: std::time::Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }
}

/// Smallest separation found by a scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeparationMinimum {
    /// Index of the sample in the window.
    pub index: usize,
    pub epoch: Epoch,
    pub separation: Radian,
}

/// Result of a successful evaluation with the Sun considered visible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EclipseEstimate {
    pub time_of_maximum: Epoch,
    /// Magnitude in [0, 1]. `0.0` means no contact at the sampled maximum,
    /// not that no eclipse happens at all.
    pub magnitude: f64,
    /// Disk geometry at `time_of_maximum`.
    pub geometry: DiskGeometry,
    pub contact: ContactGeometry,
    /// Bound of the error on `time_of_maximum`: half the sample spacing
    /// around the minimum.
    pub time_resolution: Duration,
    /// Index of the sample selected by the scan.
    pub sample_index: usize,
    /// `true` when `time_of_maximum` comes from the parabolic refinement.
    pub refined: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EclipseOutcome {
    Visible(EclipseEstimate),
    /// The eclipse happens with the Sun below the horizon (horizon gate only).
    NotVisible,
}

impl EclipseOutcome {
    pub fn estimate(&self) -> Option<&EclipseEstimate> {
        match self {
            EclipseOutcome::Visible(estimate) => Some(estimate),
            EclipseOutcome::NotVisible => None,
        }
    }

    /// Reported magnitude: `0.0` when not visible.
    pub fn magnitude(&self) -> f64 {
        self.estimate().map_or(0.0, |e| e.magnitude)
    }

    pub fn time_of_maximum(&self) -> Option<Epoch> {
        self.estimate().map(|e| e.time_of_maximum)
    }
}

/// Eclipse evaluation bound to an ephemeris provider.
///
/// The provider is borrowed: it is loaded once and shared by every
/// estimator, possibly across threads.
pub struct EclipseEstimator<'a, P: ?Sized + EphemerisProvider> {
    provider: &'a P,
    config: EstimatorConfig,
}

impl<'a, P: ?Sized + EphemerisProvider> EclipseEstimator<'a, P> {
    pub fn new(provider: &'a P, config: EstimatorConfig) -> Self {
        EclipseEstimator { provider, config }
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    pub fn provider(&self) -> &'a P {
        self.provider
    }

    /// Apparent Sun–Moon separation for an observer at one instant.
    pub fn separation_at(&self, observer: &Observer, epoch: &Epoch) -> Result<Radian, EclipsisError> {
        let (sun, moon) = self.provider.apparent_pair(observer, epoch)?;
        Ok(angular_separation(&sun.direction, &moon.direction))
    }

    /// Find the sample of minimum Sun–Moon separation.
    ///
    /// Arguments
    /// -----------------
    /// * `observer`: the ground site.
    /// * `window`: samples to scan, all of them are evaluated.
    ///
    /// Return
    /// ----------
    /// * The first sample reaching the minimum separation.
    ///
    /// Errors
    /// ----------
    /// * The first provider error met, e.g. [`EclipsisError::EphemerisOutOfRange`].
    /// * [`EclipsisError::EvaluationTimedOut`] when the time budget runs out before
    ///   the last sample.
    pub fn locate_maximum(
        &self,
        observer: &Observer,
        window: &SearchWindow,
    ) -> Result<SeparationMinimum, EclipsisError> {
        let started = Instant::now();
        let last_index = window.len().saturating_sub(1);
        let mut best: Option<SeparationMinimum> = None;

        for (index, sample) in window.iter().enumerate() {
            let separation = self.separation_at(observer, &sample.epoch)?;

            if best.map_or(true, |b| separation < b.separation) {
                best = Some(SeparationMinimum {
                    index,
                    epoch: sample.epoch,
                    separation,
                });
            }

            // a completed scan is kept whatever its duration
            if index == last_index {
                break;
            }
            if let Some(budget) = self.config.time_budget {
                let elapsed = started.elapsed();
                if elapsed >= budget {
                    return Err(EclipsisError::EvaluationTimedOut {
                        samples_done: index + 1,
                        elapsed_ms: elapsed.as_millis(),
                    });
                }
            }
        }

        best.ok_or(EclipsisError::EmptySearchWindow)
    }

    /// Disk geometry and magnitude for an observer at one instant.
    pub fn magnitude_at(
        &self,
        observer: &Observer,
        epoch: &Epoch,
    ) -> Result<(DiskGeometry, f64), EclipsisError> {
        let (sun, moon) = self.provider.apparent_pair(observer, epoch)?;
        let geometry = DiskGeometry::from_apparent(&sun, &moon);
        Ok((geometry, geometry.magnitude()))
    }

    /// Full evaluation of one observer over a window.
    ///
    /// Return
    /// ----------
    /// * [`EclipseOutcome::Visible`] with the time of maximum and the
    ///   magnitude, also when the magnitude is `0.0`.
    /// * [`EclipseOutcome::NotVisible`] when the horizon gate is enabled, the
    ///   magnitude is positive and the Sun is not above the horizon at the maximum.
    ///
    /// See also
    /// ------------
    /// * [`EclipseEstimator::locate_maximum`] – Operation A.
    /// * [`EclipseEstimator::magnitude_at`] – Operation B.
    pub fn estimate(
        &self,
        observer: &Observer,
        window: &SearchWindow,
    ) -> Result<EclipseOutcome, EclipsisError> {
        let minimum = self.locate_maximum(observer, window)?;

        let (time_of_maximum, refined) = match self.config.refinement {
            Refinement::None => (minimum.epoch, false),
            Refinement::Parabolic => match self.parabolic_vertex(observer, window, &minimum)? {
                Some(epoch) => (epoch, true),
                None => (minimum.epoch, false),
            },
        };

        let (geometry, magnitude) = self.magnitude_at(observer, &time_of_maximum)?;

        debug!(
            "Observer ({}, {}): maximum at sample {} (sep {:.3e} rad), magnitude {magnitude:.6}",
            observer.latitude.into_inner(),
            observer.longitude.into_inner(),
            minimum.index,
            geometry.separation
        );

        if self.config.horizon_gating && magnitude > 0.0 {
            let sun = self.provider.altaz(Body::Sun, observer, &time_of_maximum)?;
            if !sun.is_above_horizon() {
                debug!(
                    "Observer ({}, {}): Sun altitude {:.2}° at maximum, not visible",
                    observer.latitude.into_inner(),
                    observer.longitude.into_inner(),
                    sun.altitude
                );
                return Ok(EclipseOutcome::NotVisible);
            }
        }

        // the scan bound is kept after refinement
        let resolution =
            Duration::from_seconds(window.spacing_around(minimum.index).to_seconds() / 2.0);

        Ok(EclipseOutcome::Visible(EclipseEstimate {
            time_of_maximum,
            magnitude,
            contact: geometry.contact(),
            geometry,
            time_resolution: resolution,
            sample_index: minimum.index,
            refined,
        }))
    }

    /// Instant of the vertex of the parabola through the minimum and its
    /// neighbours, or `None` at the window edges or for a flat triplet.
    fn parabolic_vertex(
        &self,
        observer: &Observer,
        window: &SearchWindow,
        minimum: &SeparationMinimum,
    ) -> Result<Option<Epoch>, EclipsisError> {
        let (Some(before), Some(after)) = (
            minimum.index.checked_sub(1).and_then(|i| window.get(i)),
            window.get(minimum.index + 1),
        ) else {
            return Ok(None);
        };

        let f_before = self.separation_at(observer, &before.epoch)?;
        let f_after = self.separation_at(observer, &after.epoch)?;

        let a = (before.epoch - minimum.epoch).to_seconds();
        let c = (after.epoch - minimum.epoch).to_seconds();
        let Some(offset) = parabola_vertex_offset(a, c, f_before, minimum.separation, f_after)
        else {
            return Ok(None);
        };

        Ok(Some(minimum.epoch + Duration::from_seconds(offset)))
    }
}

/// Abscissa of the vertex of the parabola through `(a, fa)`, `(0, f0)`, `(c, fc)`
/// with `a < 0 < c`, clamped to `[a, c]`.
///
/// Returns `None` when the three points are aligned.
pub(crate) fn parabola_vertex_offset(a: f64, c: f64, fa: f64, f0: f64, fc: f64) -> Option<f64> {
    let numerator = a * a * (f0 - fc) - c * c * (f0 - fa);
    let denominator = a * (f0 - fc) - c * (f0 - fa);
    if denominator == 0.0 || !denominator.is_finite() {
        return None;
    }
    let offset = 0.5 * numerator / denominator;
    offset.is_finite().then(|| offset.clamp(a, c))
}
