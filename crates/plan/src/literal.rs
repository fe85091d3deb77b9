//! Literal references.
//!
//! References can be written down as text. The grammar is JSON: numbers,
//! strings, booleans, null, arrays and objects. Nothing is ever evaluated.

use axial_core::{Cell, NamedContainer};
use serde_json::Value;

use crate::error::PlanError;

/// Parse a literal.
pub fn parse_literal(text: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(text.trim())
}

/// Build the one-axis reference of `concept` from a literal.
///
/// A JSON array gives one cell per element; any other literal gives a single
/// cell. The axis is named after the concept.
pub fn container_from_literal(concept: &str, text: &str) -> Result<NamedContainer, PlanError> {
    let value = parse_literal(text).map_err(|e| PlanError::source_error(concept, e))?;
    let cells: Vec<Cell> = match value {
        Value::Array(items) => items.into_iter().map(Cell::Value).collect(),
        other => vec![Cell::Value(other)],
    };
    if cells.is_empty() {
        return Err(PlanError::source_error(concept, "empty literal list"));
    }
    Ok(NamedContainer::from_values(concept, cells)?)
}
