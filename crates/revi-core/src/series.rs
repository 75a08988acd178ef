// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::ReviError;
use chrono::NaiveDate;

/// One mean-valued calendar day of a daily aggregate series.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Daily aggregate series, strictly ascending by date.
///
/// The trend projector consumes this as its historical input; strict
/// ordering rules out duplicate calendar days.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DailySeries {
    points: Vec<DailyPoint>,
}

impl DailySeries {
    /// Validates ordering and finiteness of a per-day point list.
    pub fn new(points: Vec<DailyPoint>) -> Result<Self, ReviError> {
        for (idx, point) in points.iter().enumerate() {
            if !point.value.is_finite() {
                return Err(ReviError::invalid_input(format!(
                    "daily series value at index {idx} is non-finite"
                )));
            }
            if idx > 0 && points[idx - 1].date >= point.date {
                return Err(ReviError::invalid_input(format!(
                    "daily series dates must be strictly ascending; index {idx} ({}) does not follow {}",
                    point.date,
                    points[idx - 1].date
                )));
            }
        }
        Ok(Self { points })
    }

    /// Ordered per-day points.
    pub fn points(&self) -> &[DailyPoint] {
        &self.points
    }

    /// Number of calendar days in the series.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when the series has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Most recent point, if any.
    pub fn last(&self) -> Option<&DailyPoint> {
        self.points.last()
    }
}
