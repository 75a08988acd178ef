// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use chrono::{Days, NaiveDate};
use revi_core::{DailySeries, ReviError};
use std::time::{SystemTime, UNIX_EPOCH};

/// Days of history feeding the trend estimate.
const DEFAULT_TRAILING_WINDOW: usize = 15;
/// Historical points echoed into the output ahead of the forecast.
const DEFAULT_HISTORY_TAIL: usize = 30;
/// Half-width of the uniform jitter band around 1.0.
const DEFAULT_JITTER_FRACTION: f64 = 0.05;

/// Trend projector configuration.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectorConfig {
    /// Trailing-window length for the trend estimate, in days.
    pub trailing_window: usize,
    /// Historical tail length echoed into the projection, in days.
    pub history_tail: usize,
    /// Per-day multiplicative jitter half-width; `0.05` means +/-5%.
    pub jitter_fraction: f64,
    /// Pin for reproducible forecasts. `None` seeds from system entropy,
    /// so repeated calls over identical input produce different values.
    pub seed: Option<u64>,
}

impl Default for ProjectorConfig {
    fn default() -> Self {
        Self {
            trailing_window: DEFAULT_TRAILING_WINDOW,
            history_tail: DEFAULT_HISTORY_TAIL,
            jitter_fraction: DEFAULT_JITTER_FRACTION,
            seed: None,
        }
    }
}

impl ProjectorConfig {
    fn validate(&self) -> Result<(), ReviError> {
        if self.trailing_window == 0 {
            return Err(ReviError::invalid_input(
                "projector trailing_window must be >= 1",
            ));
        }
        if self.history_tail == 0 {
            return Err(ReviError::invalid_input(
                "projector history_tail must be >= 1",
            ));
        }
        if !self.jitter_fraction.is_finite()
            || self.jitter_fraction < 0.0
            || self.jitter_fraction >= 1.0
        {
            return Err(ReviError::invalid_input(format!(
                "projector jitter_fraction must be in [0.0, 1.0); got {}",
                self.jitter_fraction
            )));
        }
        Ok(())
    }
}

/// Which series a projection point belongs to.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeriesLabel {
    Historical,
    Forecast,
}

impl SeriesLabel {
    /// Display name used by downstream chart annotation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Historical => "Historical",
            Self::Forecast => "Forecast",
        }
    }
}

/// One labeled point of a projection.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectedPoint {
    pub date: NaiveDate,
    pub value: f64,
    pub label: SeriesLabel,
}

/// Historical tail plus forward horizon, with the boundary recorded.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct Projection {
    /// Historical points first, then forecast points, dates ascending.
    pub points: Vec<ProjectedPoint>,
    /// Last historical date; downstream annotation draws the split here.
    pub boundary: NaiveDate,
    /// Trailing-window mean the forecast values jitter around.
    pub trend_estimate: f64,
}

// Deterministic SplitMix64-style generator. Seeded per call so concurrent
// projections never share state, and tests can pin the sequence.
#[derive(Clone, Copy, Debug)]
struct StableRng {
    state: u64,
}

impl StableRng {
    fn new(seed: u64) -> Self {
        Self {
            state: seed.wrapping_add(0x9e3779b97f4a7c15),
        }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e3779b97f4a7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
        z ^ (z >> 31)
    }

    // Uniform in [0.0, 1.0) with 53 bits of precision.
    fn next_unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }
}

fn entropy_seed() -> u64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    (now.as_secs() << 32) ^ u64::from(now.subsec_nanos())
}

/// Projects a short-horizon forecast from a daily aggregate series.
///
/// The trend estimate is the mean of the trailing window; each forecast
/// day draws `trend * jitter` with jitter uniform in
/// `[1 - jitter_fraction, 1 + jitter_fraction]`.
#[derive(Clone, Debug)]
pub struct TrendProjector {
    config: ProjectorConfig,
}

impl TrendProjector {
    /// Validates the configuration and builds a projector.
    pub fn new(config: ProjectorConfig) -> Result<Self, ReviError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Projector with default window, tail, jitter, and entropy seeding.
    pub fn with_defaults() -> Self {
        Self {
            config: ProjectorConfig::default(),
        }
    }

    /// Effective configuration.
    pub fn config(&self) -> &ProjectorConfig {
        &self.config
    }

    /// Produces `horizon_days` forecast points after the historical tail.
    ///
    /// An empty series cannot yield a trend estimate and is
    /// `InsufficientHistory`; a series shorter than the trailing window
    /// simply averages what exists.
    pub fn project(
        &self,
        series: &DailySeries,
        horizon_days: usize,
    ) -> Result<Projection, ReviError> {
        if series.is_empty() {
            return Err(ReviError::insufficient_history(
                "daily series has no points to estimate a trend from",
            ));
        }
        if horizon_days == 0 {
            return Err(ReviError::invalid_input(
                "projection horizon_days must be >= 1",
            ));
        }

        let points = series.points();
        let window = self.config.trailing_window.min(points.len());
        let window_points = &points[points.len() - window..];
        let trend_estimate =
            window_points.iter().map(|point| point.value).sum::<f64>() / window as f64;

        let boundary = points[points.len() - 1].date;
        let tail_start = points.len().saturating_sub(self.config.history_tail);

        let mut out = Vec::with_capacity(points.len() - tail_start + horizon_days);
        for point in &points[tail_start..] {
            out.push(ProjectedPoint {
                date: point.date,
                value: point.value,
                label: SeriesLabel::Historical,
            });
        }

        let mut rng = StableRng::new(self.config.seed.unwrap_or_else(entropy_seed));
        for day in 1..=horizon_days {
            let date = boundary
                .checked_add_days(Days::new(day as u64))
                .ok_or_else(|| {
                    ReviError::invalid_input(format!(
                        "projection date overflows the calendar at day {day}"
                    ))
                })?;
            let jitter =
                1.0 + (2.0 * rng.next_unit() - 1.0) * self.config.jitter_fraction;
            out.push(ProjectedPoint {
                date,
                value: trend_estimate * jitter,
                label: SeriesLabel::Forecast,
            });
        }

        tracing::debug!(
            history = points.len() - tail_start,
            horizon = horizon_days,
            trend = trend_estimate,
            "projected daily series"
        );
        Ok(Projection {
            points: out,
            boundary,
            trend_estimate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{ProjectorConfig, SeriesLabel, TrendProjector};
    use chrono::{Days, NaiveDate};
    use revi_core::{DailyPoint, DailySeries, ReviError};

    fn date(day: u32) -> NaiveDate {
        let base = NaiveDate::from_ymd_opt(2025, 7, 1).expect("base date should be valid");
        base.checked_add_days(Days::new(u64::from(day) - 1))
            .expect("test date should be valid")
    }

    fn series(values: &[f64]) -> DailySeries {
        let points = values
            .iter()
            .enumerate()
            .map(|(idx, value)| DailyPoint {
                date: date(idx as u32 + 1),
                value: *value,
            })
            .collect();
        DailySeries::new(points).expect("test series should be valid")
    }

    fn pinned(seed: u64) -> TrendProjector {
        TrendProjector::new(ProjectorConfig {
            seed: Some(seed),
            ..ProjectorConfig::default()
        })
        .expect("pinned config should be valid")
    }

    #[test]
    fn config_validation_rejects_degenerate_settings() {
        for config in [
            ProjectorConfig {
                trailing_window: 0,
                ..ProjectorConfig::default()
            },
            ProjectorConfig {
                history_tail: 0,
                ..ProjectorConfig::default()
            },
            ProjectorConfig {
                jitter_fraction: -0.1,
                ..ProjectorConfig::default()
            },
            ProjectorConfig {
                jitter_fraction: 1.0,
                ..ProjectorConfig::default()
            },
            ProjectorConfig {
                jitter_fraction: f64::NAN,
                ..ProjectorConfig::default()
            },
        ] {
            assert!(matches!(
                TrendProjector::new(config),
                Err(ReviError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn empty_history_is_insufficient() {
        let empty = DailySeries::new(vec![]).expect("empty series is constructible");
        let err = pinned(7)
            .project(&empty, 30)
            .expect_err("projection needs history");
        assert!(matches!(err, ReviError::InsufficientHistory(_)));
        assert!(err.is_recoverable());
    }

    #[test]
    fn one_row_history_yields_exactly_the_horizon() {
        let history = series(&[120.0]);
        let projection = pinned(42)
            .project(&history, 30)
            .expect("one-point history is enough");

        let forecast: Vec<_> = projection
            .points
            .iter()
            .filter(|point| point.label == SeriesLabel::Forecast)
            .collect();
        assert_eq!(forecast.len(), 30);
        assert_eq!(projection.points.len(), 31);
        assert_eq!(projection.boundary, date(1));
        assert_eq!(projection.trend_estimate, 120.0);

        // Positive trend and a +/-5% band keep every forecast positive.
        assert!(forecast.iter().all(|point| point.value > 0.0));
        // Each value stays inside the jitter band around the trend.
        assert!(forecast
            .iter()
            .all(|point| (point.value - 120.0).abs() <= 120.0 * 0.05 + 1e-9));
    }

    #[test]
    fn forecast_dates_are_consecutive_after_the_boundary() {
        let history = series(&[10.0, 11.0, 12.0]);
        let projection = pinned(3)
            .project(&history, 5)
            .expect("projection should succeed");

        assert_eq!(projection.boundary, date(3));
        let forecast: Vec<_> = projection
            .points
            .iter()
            .filter(|point| point.label == SeriesLabel::Forecast)
            .collect();
        for (offset, point) in forecast.iter().enumerate() {
            assert_eq!(point.date, date(4 + offset as u32));
        }
    }

    #[test]
    fn trend_uses_the_trailing_window_only() {
        // 20 days: first 5 at 1000, last 15 at 10. Window of 15 sees only
        // the recent level.
        let mut values = vec![1000.0; 5];
        values.extend(std::iter::repeat(10.0).take(15));
        let history = series(&values);

        let projection = pinned(11)
            .project(&history, 3)
            .expect("projection should succeed");
        assert_eq!(projection.trend_estimate, 10.0);
    }

    #[test]
    fn history_tail_is_capped_at_thirty_points() {
        let values: Vec<f64> = (0..45).map(|idx| idx as f64).collect();
        let history = series(&values);

        let projection = pinned(5)
            .project(&history, 10)
            .expect("projection should succeed");
        let historical = projection
            .points
            .iter()
            .filter(|point| point.label == SeriesLabel::Historical)
            .count();
        assert_eq!(historical, 30);
        assert_eq!(projection.points.len(), 40);
    }

    #[test]
    fn pinned_seeds_reproduce_and_differ_across_seeds() {
        let history = series(&[50.0, 52.0, 48.0, 51.0]);

        let first = pinned(9).project(&history, 20).expect("should project");
        let second = pinned(9).project(&history, 20).expect("should project");
        assert_eq!(first, second);

        let other = pinned(10).project(&history, 20).expect("should project");
        assert_ne!(first.points, other.points);
    }

    #[test]
    fn zero_horizon_is_rejected() {
        let history = series(&[5.0]);
        assert!(matches!(
            pinned(1).project(&history, 0),
            Err(ReviError::InvalidInput(_))
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn projection_serde_roundtrip() {
        let history = series(&[30.0, 31.0]);
        let projection = pinned(2).project(&history, 4).expect("should project");
        let encoded =
            serde_json::to_string(&projection).expect("projection should serialize");
        let decoded: super::Projection =
            serde_json::from_str(&encoded).expect("projection should deserialize");
        assert_eq!(decoded, projection);
    }
}
