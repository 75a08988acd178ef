// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use revi_core::{DailyPoint, DailySeries, Dataset, ReviError, RowSet};
use std::collections::BTreeMap;

/// Sentinel substituted for any aggregate whose inputs carry no data.
///
/// "No rows matched" is a normal, displayable business outcome here, not
/// a fault; callers never need to null-check a returned scalar.
const EMPTY_SENTINEL: f64 = 0.0;

/// Arithmetic mean of a numeric column over a row selection.
///
/// Resolves to `0.0` for an empty selection instead of an undefined
/// value. Guaranteed finite: the mean is accumulated incrementally so a
/// running sum cannot overflow, and any non-finite result still resolves
/// to the sentinel.
pub fn guarded_mean(
    dataset: &Dataset,
    column: &str,
    rows: &RowSet,
) -> Result<f64, ReviError> {
    let values = dataset.numeric(column)?;
    if rows.is_empty() {
        return Ok(EMPTY_SENTINEL);
    }

    let mut mean = 0.0;
    for (seen, &row) in rows.indices().iter().enumerate() {
        let value = values.get(row).ok_or_else(|| {
            ReviError::invalid_input(format!(
                "row selection index {row} out of bounds for {} rows",
                values.len()
            ))
        })?;
        mean += (value - mean) / (seen + 1) as f64;
    }
    if !mean.is_finite() {
        return Ok(EMPTY_SENTINEL);
    }
    Ok(mean)
}

/// Ratio-based uplift between two categorical subsets of `scope`, in
/// percent: `(mean_treatment - mean_control) / mean_control * 100`.
///
/// Resolves to exactly `0.0` whenever either subset is empty, the
/// control mean is `0.0`, or the ratio itself is not finite; undefined
/// mean components are substituted with the sentinel, so no NaN or
/// infinity can propagate outward.
pub fn uplift(
    dataset: &Dataset,
    value_column: &str,
    split_column: &str,
    treatment: &str,
    control: &str,
    scope: &RowSet,
) -> Result<f64, ReviError> {
    let treated = dataset.filter_eq(split_column, treatment, scope)?;
    let held_out = dataset.filter_eq(split_column, control, scope)?;
    if treated.is_empty() || held_out.is_empty() {
        return Ok(EMPTY_SENTINEL);
    }

    let mean_treatment = guarded_mean(dataset, value_column, &treated)?;
    let mean_control = guarded_mean(dataset, value_column, &held_out)?;
    if mean_control == 0.0 {
        return Ok(EMPTY_SENTINEL);
    }
    let value = (mean_treatment - mean_control) / mean_control * 100.0;
    if !value.is_finite() {
        return Ok(EMPTY_SENTINEL);
    }
    Ok(value)
}

/// One named mean aggregate.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MeanSpec {
    pub name: String,
    pub column: String,
}

/// One named uplift aggregate over a categorical split.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpliftSpec {
    pub name: String,
    pub value_column: String,
    pub split_column: String,
    pub treatment: String,
    pub control: String,
}

/// Batch of aggregates computed together over one scope.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MetricSpec {
    pub means: Vec<MeanSpec>,
    pub uplifts: Vec<UpliftSpec>,
}

/// One computed aggregate.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct NamedScalar {
    pub name: String,
    pub value: f64,
}

/// Named finite scalars computed from one dataset scope.
///
/// Ephemeral; recomputed on every query. Every value is a defined finite
/// number.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MetricBundle {
    pub scalars: Vec<NamedScalar>,
}

impl MetricBundle {
    /// Looks up a computed scalar by name.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.scalars
            .iter()
            .find(|scalar| scalar.name == name)
            .map(|scalar| scalar.value)
    }
}

/// Computes every aggregate in `spec` over one scope, all guarded.
pub fn aggregate(
    dataset: &Dataset,
    scope: &RowSet,
    spec: &MetricSpec,
) -> Result<MetricBundle, ReviError> {
    let mut scalars = Vec::with_capacity(spec.means.len() + spec.uplifts.len());

    for mean in &spec.means {
        scalars.push(NamedScalar {
            name: mean.name.clone(),
            value: guarded_mean(dataset, &mean.column, scope)?,
        });
    }
    for lift in &spec.uplifts {
        scalars.push(NamedScalar {
            name: lift.name.clone(),
            value: uplift(
                dataset,
                &lift.value_column,
                &lift.split_column,
                &lift.treatment,
                &lift.control,
                scope,
            )?,
        });
    }

    tracing::debug!(
        scope_rows = scope.len(),
        scalars = scalars.len(),
        "computed metric bundle"
    );
    Ok(MetricBundle { scalars })
}

/// Aggregates a dataset to one mean value per calendar day, ascending.
///
/// Feeds the trend projector; row order in the dataset is irrelevant.
pub fn daily_mean_series(
    dataset: &Dataset,
    date_column: &str,
    value_column: &str,
) -> Result<DailySeries, ReviError> {
    let dates = dataset.dates(date_column)?;
    let values = dataset.numeric(value_column)?;

    let mut grouped = BTreeMap::new();
    for (date, value) in dates.iter().zip(values.iter()) {
        let entry = grouped.entry(*date).or_insert((0.0, 0usize));
        entry.1 += 1;
        entry.0 += (value - entry.0) / entry.1 as f64;
    }

    let points = grouped
        .into_iter()
        .map(|(date, (mean, _count))| DailyPoint { date, value: mean })
        .collect();
    DailySeries::new(points)
}
