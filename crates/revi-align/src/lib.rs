// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

pub mod inference;
pub mod plan;

pub use inference::{InferenceService, Model, Prediction};
pub use plan::{AlignmentPlan, FieldKind, FieldSpec};

/// Alignment and inference namespace.
pub fn crate_name() -> &'static str {
    let _ = revi_core::crate_name();
    "revi-align"
}
