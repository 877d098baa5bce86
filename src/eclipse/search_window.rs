//! Ordered time samples scanned for the minimum Sun–Moon separation.
//!
//! A [`SearchWindow`] is never empty and its instants are strictly
//! increasing; both properties are checked at construction. Each sample also
//! carries its signed offset, in minutes, from the center of the window.
use hifitime::{Duration, Epoch};
use itertools::Itertools;

use crate::constants::{
    DEFAULT_HALF_WIDTH_MINUTES, DEFAULT_SAMPLE_COUNT, DEFAULT_WINDOW_CENTER,
};
use crate::eclipsis_errors::EclipsisError;
use crate::time::parse_utc;

/// One instant of a search window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSample {
    pub epoch: Epoch,
    /// Signed offset from the window center, in minutes.
    pub offset_minutes: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchWindow {
    center: Epoch,
    samples: Vec<TimeSample>,
}

impl SearchWindow {
    /// Evenly spaced samples over `[center - half_width, center + half_width]`,
    /// both bounds included.
    ///
    /// Arguments
    /// -----------------
    /// * `center`: middle of the window.
    /// * `half_width`: non negative half length of the window.
    /// * `count`: number of samples. A single sample is placed at the center.
    ///
    /// Return
    /// ----------
    /// * The window, or an InvalidInput error: [`EclipsisError::EmptySearchWindow`]
    ///   for `count == 0`, [`EclipsisError::InvalidSearchWindow`] for a negative
    ///   half width or a null one with several samples,
    ///   [`EclipsisError::NonIncreasingSearchWindow`] when the spacing is below
    ///   the time resolution.
    pub fn uniform(center: Epoch, half_width: Duration, count: usize) -> Result<Self, EclipsisError> {
        if count == 0 {
            return Err(EclipsisError::EmptySearchWindow);
        }
        if half_width < Duration::ZERO {
            return Err(EclipsisError::InvalidSearchWindow(format!(
                "negative half width {half_width}"
            )));
        }
        if count == 1 {
            return Self::from_epochs(center, vec![center]);
        }
        if half_width == Duration::ZERO {
            return Err(EclipsisError::InvalidSearchWindow(format!(
                "{count} samples requested in a window of null width"
            )));
        }

        let half_s = half_width.to_seconds();
        let (first, last) = (center - half_width, center + half_width);
        if !round_trips(half_s, (center - first).to_seconds())
            || !round_trips(half_s, (last - center).to_seconds())
        {
            return Err(EclipsisError::InvalidSearchWindow(format!(
                "half width {half_width} around {center} exceeds the representable time range"
            )));
        }
        let step = 2.0 * half_s / (count - 1) as f64;
        let epochs = (0..count)
            .map(|i| center + Duration::from_seconds(-half_s + step * i as f64))
            .collect();

        Self::from_epochs(center, epochs)
    }

    /// Window built from explicit instants.
    ///
    /// Arguments
    /// -----------------
    /// * `center`: reference instant for the sample offsets; it does not need
    ///   to be one of the samples.
    /// * `epochs`: the instants, strictly increasing.
    pub fn from_epochs(center: Epoch, epochs: Vec<Epoch>) -> Result<Self, EclipsisError> {
        if epochs.is_empty() {
            return Err(EclipsisError::EmptySearchWindow);
        }
        if let Some((i, _)) = epochs
            .iter()
            .tuple_windows()
            .find_position(|(previous, next)| next <= previous)
        {
            return Err(EclipsisError::NonIncreasingSearchWindow(i + 1));
        }

        let samples = epochs
            .into_iter()
            .map(|epoch| TimeSample {
                epoch,
                offset_minutes: (epoch - center).to_seconds() / 60.0,
            })
            .collect();

        Ok(SearchWindow { center, samples })
    }

    /// A new uniform window centered on `center`, typically a first estimate
    /// of the maximum, to scan it again at a finer spacing.
    pub fn recentered(
        &self,
        center: Epoch,
        half_width: Duration,
        count: usize,
    ) -> Result<Self, EclipsisError> {
        SearchWindow::uniform(center, half_width, count)
    }

    pub fn center(&self) -> Epoch {
        self.center
    }

    pub fn samples(&self) -> &[TimeSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TimeSample> {
        self.samples.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimeSample> {
        self.samples.iter()
    }

    pub fn first(&self) -> Epoch {
        self.samples[0].epoch
    }

    pub fn last(&self) -> Epoch {
        self.samples[self.samples.len() - 1].epoch
    }

    /// `true` when `epoch` lies between the first and last sample, bounds included.
    pub fn contains(&self, epoch: &Epoch) -> bool {
        self.first() <= *epoch && *epoch <= self.last()
    }

    /// Largest gap between the sample `index` and its neighbours.
    ///
    /// The error of a linear scan that stops on this sample is at most half of
    /// it. A single sample window has a null spacing.
    pub fn spacing_around(&self, index: usize) -> Duration {
        let at = |i: usize| self.samples.get(i).map(|s| s.epoch);

        let before = index
            .checked_sub(1)
            .and_then(|i| Some(at(index)? - at(i)?));
        let after = at(index + 1).and_then(|next| Some(next - at(index)?));

        match (before, after) {
            (Some(b), Some(a)) => b.max(a),
            (Some(d), None) | (None, Some(d)) => d,
            (None, None) => Duration::ZERO,
        }
    }
}

/// Parameters of a uniform search window.
///
/// The default is the reference run: 2026-08-12 18:00 UTC ± 60 minutes,
/// 1000 samples.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowConfig {
    pub center: Epoch,
    pub half_width: Duration,
    pub sample_count: usize,
}

impl WindowConfig {
    /// Configuration from a UTC center string and a half width in minutes.
    pub fn new(
        center: &str,
        half_width_minutes: f64,
        sample_count: usize,
    ) -> Result<Self, EclipsisError> {
        if !half_width_minutes.is_finite() {
            return Err(EclipsisError::InvalidSearchWindow(format!(
                "half width {half_width_minutes} min is not finite"
            )));
        }
        let half_width_s = half_width_minutes * 60.0;
        let half_width = Duration::from_seconds(half_width_s);
        if !round_trips(half_width_s, half_width.to_seconds()) {
            return Err(EclipsisError::InvalidSearchWindow(format!(
                "half width {half_width_minutes} min exceeds the representable time range"
            )));
        }
        Ok(WindowConfig {
            center: parse_utc(center)?,
            half_width,
            sample_count,
        })
    }

    pub fn build(&self) -> Result<SearchWindow, EclipsisError> {
        SearchWindow::uniform(self.center, self.half_width, self.sample_count)
    }
}

/// `false` when a duration of `requested` seconds saturated into `obtained`.
fn round_trips(requested: f64, obtained: f64) -> bool {
    (requested - obtained).abs() <= 1e-6 * requested.abs().max(1.0)
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            center: parse_utc(DEFAULT_WINDOW_CENTER)
                .unwrap_or_else(|_| Epoch::from_gregorian_utc_hms(2026, 8, 12, 18, 0, 0)),
            half_width: Duration::from_seconds(DEFAULT_HALF_WIDTH_MINUTES * 60.0),
            sample_count: DEFAULT_SAMPLE_COUNT,
        }
    }
}
