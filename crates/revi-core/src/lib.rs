// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

pub mod dataset;
pub mod error;
pub mod record;
pub mod schema;
pub mod series;

pub use dataset::{Column, Dataset, RowSet};
pub use error::ReviError;
pub use record::{RawRecord, Value, ValueKind};
pub use schema::TrainingSchema;
pub use series::{DailyPoint, DailySeries};

/// Core shared types for the revi workspace.
pub fn crate_name() -> &'static str {
    "revi-core"
}
