// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::aggregate::guarded_mean;
use revi_core::{Dataset, ReviError, RowSet};
use std::collections::HashMap;

/// Columns and target label driving top-performer selection.
///
/// All three numeric thresholds are the means of their columns over the
/// same scope the caller passes to [`rank_top_performers`]; the engine
/// never compares a scoped row against a mean from a different scope.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RankSpec {
    /// Primary return metric; also the descending sort key.
    pub return_column: String,
    /// Cost metric; qualifying rows sit strictly below its mean.
    pub cost_column: String,
    /// Engagement metric; qualifying rows sit strictly above its mean.
    pub engagement_column: String,
    /// Categorical objective field.
    pub objective_column: String,
    /// Label a qualifying row's objective field must equal.
    pub objective_label: String,
}

/// Rows that passed every threshold, sorted by return descending.
///
/// Stable for equal return values: original dataset order is preserved.
/// Ephemeral; recomputed per query.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RankedSubset {
    indices: Vec<usize>,
}

impl RankedSubset {
    /// Qualifying row indices, best return first.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Number of qualifying rows.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// True when no row qualified; a legitimate, displayable outcome.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Selects rows beating every scope-wide threshold simultaneously.
///
/// A row qualifies iff its return strictly exceeds the scope mean return,
/// its cost is strictly below the scope mean cost, its engagement strictly
/// exceeds the scope mean engagement, and its objective field equals the
/// target label. Zero qualifiers yield an empty subset, not an error.
pub fn rank_top_performers(
    dataset: &Dataset,
    scope: &RowSet,
    spec: &RankSpec,
) -> Result<RankedSubset, ReviError> {
    let mean_return = guarded_mean(dataset, &spec.return_column, scope)?;
    let mean_cost = guarded_mean(dataset, &spec.cost_column, scope)?;
    let mean_engagement = guarded_mean(dataset, &spec.engagement_column, scope)?;

    let returns = dataset.numeric(&spec.return_column)?;
    let costs = dataset.numeric(&spec.cost_column)?;
    let engagement = dataset.numeric(&spec.engagement_column)?;
    let objective = dataset.categorical(&spec.objective_column)?;

    let mut indices = Vec::new();
    for &row in scope.indices() {
        if returns[row] > mean_return
            && costs[row] < mean_cost
            && engagement[row] > mean_engagement
            && objective[row] == spec.objective_label
        {
            indices.push(row);
        }
    }

    // Stable sort: ties keep their original dataset order.
    indices.sort_by(|&a, &b| returns[b].total_cmp(&returns[a]));

    tracing::debug!(
        scope_rows = scope.len(),
        winners = indices.len(),
        "ranked top performers"
    );
    Ok(RankedSubset { indices })
}

/// Most frequent value of a categorical column among subset rows.
///
/// Returns `None` if and only if the subset is empty; callers must check
/// emptiness before rendering a dominant pattern. Frequency ties resolve
/// to the value seen first in ranked order.
pub fn dominant_pattern(
    dataset: &Dataset,
    subset: &RankedSubset,
    column: &str,
) -> Result<Option<String>, ReviError> {
    let values = dataset.categorical(column)?;

    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut first_seen: HashMap<&str, usize> = HashMap::new();
    for (order, &row) in subset.indices().iter().enumerate() {
        let value = values.get(row).ok_or_else(|| {
            ReviError::invalid_input(format!(
                "ranked subset index {row} out of bounds for {} rows",
                values.len()
            ))
        })?;
        *counts.entry(value.as_str()).or_insert(0) += 1;
        first_seen.entry(value.as_str()).or_insert(order);
    }

    let winner = counts
        .into_iter()
        .min_by_key(|(value, count)| (usize::MAX - count, first_seen[value]))
        .map(|(value, _)| value.to_owned());
    Ok(winner)
}
