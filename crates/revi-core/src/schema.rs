// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::ReviError;
use std::collections::HashMap;

/// Ordered post-expansion feature columns captured at training time.
///
/// Contains raw numeric column names plus one-hot-expanded categorical
/// names (e.g. `Categoria_Assinatura`). Immutable once constructed; any
/// inference input must be reshaped to match it exactly.
#[derive(Clone, Debug)]
pub struct TrainingSchema {
    columns: Vec<String>,
    positions: HashMap<String, usize>,
}

impl TrainingSchema {
    /// Validates and indexes a column list loaded from the model artifact.
    ///
    /// Rejects empty lists, empty names, and duplicate names; duplicates
    /// would make position lookup ambiguous.
    pub fn new(columns: Vec<String>) -> Result<Self, ReviError> {
        if columns.is_empty() {
            return Err(ReviError::invalid_input(
                "training schema must contain at least one column",
            ));
        }

        let mut positions = HashMap::with_capacity(columns.len());
        for (position, name) in columns.iter().enumerate() {
            if name.is_empty() {
                return Err(ReviError::invalid_input(format!(
                    "training schema column {position} has an empty name"
                )));
            }
            if positions.insert(name.clone(), position).is_some() {
                return Err(ReviError::invalid_input(format!(
                    "training schema contains duplicate column: {name}"
                )));
            }
        }

        Ok(Self { columns, positions })
    }

    /// Number of post-expansion feature columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Always false; construction rejects empty schemas.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Ordered column names.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// O(1) position lookup by column name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }
}

impl PartialEq for TrainingSchema {
    fn eq(&self, other: &Self) -> bool {
        self.columns == other.columns
    }
}

#[cfg(test)]
mod tests {
    use super::TrainingSchema;
    use crate::ReviError;

    fn schema(names: &[&str]) -> Result<TrainingSchema, ReviError> {
        TrainingSchema::new(names.iter().map(|name| (*name).to_owned()).collect())
    }

    #[test]
    fn positions_follow_declaration_order() {
        let schema = schema(&["Valor_Venda", "CAC", "Produto_Consultoria"])
            .expect("schema should be valid");
        assert_eq!(schema.len(), 3);
        assert_eq!(schema.position("Valor_Venda"), Some(0));
        assert_eq!(schema.position("Produto_Consultoria"), Some(2));
        assert_eq!(schema.position("Produto_Inexistente"), None);
    }

    #[test]
    fn rejects_empty_and_duplicate_columns() {
        assert!(matches!(
            schema(&[]),
            Err(ReviError::InvalidInput(_))
        ));
        assert!(matches!(
            schema(&["CAC", ""]),
            Err(ReviError::InvalidInput(_))
        ));
        assert!(matches!(
            schema(&["CAC", "CAC"]),
            Err(ReviError::InvalidInput(_))
        ));
    }
}
