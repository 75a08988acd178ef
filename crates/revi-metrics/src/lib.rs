// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

pub mod aggregate;
pub mod ranking;

pub use aggregate::{
    aggregate, daily_mean_series, guarded_mean, uplift, MeanSpec, MetricBundle, MetricSpec,
    NamedScalar, UpliftSpec,
};
pub use ranking::{dominant_pattern, rank_top_performers, RankSpec, RankedSubset};

/// Guarded metrics and ranking namespace.
pub fn crate_name() -> &'static str {
    let _ = revi_core::crate_name();
    "revi-metrics"
}
