// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use revi_core::{RawRecord, ReviError, TrainingSchema, Value};
use std::collections::HashMap;

/// Kind of a raw input field before one-hot expansion.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Numeric,
    Categorical,
}

/// One raw input field the model was trained with, pre-expansion.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
}

impl FieldSpec {
    /// Declares a numeric field.
    pub fn numeric(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Numeric,
        }
    }

    /// Declares a categorical field.
    pub fn categorical(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Categorical,
        }
    }
}

#[derive(Clone, Debug)]
struct NumericSlot {
    field: String,
    position: usize,
}

#[derive(Clone, Debug)]
struct CategoricalSlot {
    field: String,
    // Training-time category -> schema position. Categories absent from
    // this map were never seen during training and contribute no signal.
    positions: HashMap<String, usize>,
}

/// Precomputed mapping from raw fields to training-schema positions.
///
/// Built once per loaded schema so that alignment is a pure lookup+fill
/// over a zeroed vector: numeric fields copy into their named position,
/// categorical labels copy `1.0` into the position of their one-hot
/// column (`field_category`), and every unmatched schema position stays
/// `0.0`. The output shape always equals the training shape; the model
/// cannot accept any other arity.
#[derive(Clone, Debug)]
pub struct AlignmentPlan {
    width: usize,
    numeric: Vec<NumericSlot>,
    categorical: Vec<CategoricalSlot>,
}

impl AlignmentPlan {
    /// Builds the plan for a declared field set against a loaded schema.
    ///
    /// Rejects duplicate field declarations, numeric fields with no schema
    /// column, categorical fields whose one-hot expansion matches no schema
    /// column at all, and fields whose claims overlap. These are
    /// integration errors in the artifact pair, not user-input failures.
    pub fn new(fields: &[FieldSpec], schema: &TrainingSchema) -> Result<Self, ReviError> {
        if fields.is_empty() {
            return Err(ReviError::invalid_input(
                "alignment plan requires at least one declared field",
            ));
        }

        let mut numeric = Vec::new();
        let mut categorical = Vec::new();
        let mut declared: HashMap<&str, FieldKind> = HashMap::with_capacity(fields.len());
        let mut claimed: HashMap<usize, String> = HashMap::new();

        for spec in fields {
            if spec.name.is_empty() {
                return Err(ReviError::invalid_input(
                    "alignment plan field names must be non-empty",
                ));
            }
            if declared.insert(spec.name.as_str(), spec.kind).is_some() {
                return Err(ReviError::invalid_input(format!(
                    "alignment plan declares field {} more than once",
                    spec.name
                )));
            }

            match spec.kind {
                FieldKind::Numeric => {
                    let position = schema.position(&spec.name).ok_or_else(|| {
                        ReviError::invalid_input(format!(
                            "numeric field {} has no training-schema column",
                            spec.name
                        ))
                    })?;
                    claim(&mut claimed, position, &spec.name, schema)?;
                    numeric.push(NumericSlot {
                        field: spec.name.clone(),
                        position,
                    });
                }
                FieldKind::Categorical => {
                    let prefix = format!("{}_", spec.name);
                    let mut positions = HashMap::new();
                    for (position, column) in schema.columns().iter().enumerate() {
                        if let Some(category) = column.strip_prefix(prefix.as_str()) {
                            claim(&mut claimed, position, &spec.name, schema)?;
                            positions.insert(category.to_owned(), position);
                        }
                    }
                    if positions.is_empty() {
                        return Err(ReviError::invalid_input(format!(
                            "categorical field {} matches no training-schema column with prefix {prefix}",
                            spec.name
                        )));
                    }
                    categorical.push(CategoricalSlot {
                        field: spec.name.clone(),
                        positions,
                    });
                }
            }
        }

        Ok(Self {
            width: schema.len(),
            numeric,
            categorical,
        })
    }

    /// Length of every aligned vector this plan produces.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Aligns one raw record into a fixed-width feature vector.
    ///
    /// Every declared field must be present with the declared scalar kind.
    /// A categorical label never seen during training degrades gracefully
    /// to no signal for that dimension; the output length is always
    /// [`AlignmentPlan::width`]. Pure function of its inputs.
    pub fn align(&self, record: &RawRecord) -> Result<Vec<f64>, ReviError> {
        let mut aligned = vec![0.0; self.width];

        for slot in &self.numeric {
            match record.get(&slot.field) {
                None => return Err(ReviError::missing_field(slot.field.as_str())),
                Some(Value::Number(value)) => aligned[slot.position] = *value,
                Some(other) => {
                    return Err(ReviError::type_mismatch(
                        slot.field.as_str(),
                        "number",
                        other.kind().as_str(),
                    ));
                }
            }
        }

        let mut dropped = 0usize;
        for slot in &self.categorical {
            match record.get(&slot.field) {
                None => return Err(ReviError::missing_field(slot.field.as_str())),
                Some(Value::Label(label)) => match slot.positions.get(label.as_str()) {
                    Some(&position) => aligned[position] = 1.0,
                    // Unseen category at inference time: silently dropped.
                    None => dropped += 1,
                },
                Some(other) => {
                    return Err(ReviError::type_mismatch(
                        slot.field.as_str(),
                        "label",
                        other.kind().as_str(),
                    ));
                }
            }
        }

        tracing::debug!(
            width = self.width,
            unseen_categories = dropped,
            "aligned raw record to training schema"
        );
        Ok(aligned)
    }
}

fn claim(
    claimed: &mut HashMap<usize, String>,
    position: usize,
    field: &str,
    schema: &TrainingSchema,
) -> Result<(), ReviError> {
    if let Some(previous) = claimed.insert(position, field.to_owned()) {
        return Err(ReviError::invalid_input(format!(
            "schema column {} is claimed by both {previous} and {field}",
            schema.columns()[position]
        )));
    }
    Ok(())
}
