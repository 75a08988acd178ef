// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

pub mod projector;

pub use projector::{
    ProjectedPoint, Projection, ProjectorConfig, SeriesLabel, TrendProjector,
};

/// Trend projection namespace.
pub fn crate_name() -> &'static str {
    let _ = revi_core::crate_name();
    "revi-forecast"
}
