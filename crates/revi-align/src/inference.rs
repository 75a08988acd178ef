// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use revi_core::ReviError;

/// Outcome of scoring one aligned feature vector.
///
/// Classification vs. regression is decided entirely by what the wrapped
/// model returns; the service never branches on model kind.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Prediction {
    /// Discrete class label (e.g. churn risk flag).
    Label(i64),
    /// Continuous value.
    Value(f64),
}

/// Capability exposed by a previously trained model artifact.
///
/// The artifact is opaque to this crate; it was fit on data whose
/// post-expansion columns are exactly the training schema the alignment
/// plan was built against.
pub trait Model {
    /// Number of features the model was fit against.
    fn input_arity(&self) -> usize;

    /// Scores one feature vector of exactly `input_arity` values.
    fn predict(&self, features: &[f64]) -> Prediction;
}

/// Wraps a model with arity checking; exactly one prediction per call.
#[derive(Clone, Debug)]
pub struct InferenceService<M> {
    model: M,
}

impl<M: Model> InferenceService<M> {
    /// Wraps a loaded model artifact.
    pub fn new(model: M) -> Self {
        Self { model }
    }

    /// Borrows the wrapped model.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Scores one aligned vector.
    ///
    /// An arity disagreement is a `SchemaMismatch`: an integration bug
    /// between the alignment plan and the model artifact, surfaced rather
    /// than silently coerced.
    pub fn predict(&self, features: &[f64]) -> Result<Prediction, ReviError> {
        let expected = self.model.input_arity();
        if features.len() != expected {
            return Err(ReviError::schema_mismatch(expected, features.len()));
        }
        tracing::debug!(arity = expected, "scoring aligned vector");
        Ok(self.model.predict(features))
    }
}
