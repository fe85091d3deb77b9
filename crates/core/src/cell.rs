//! # Cells - Tagged Leaves
//!
//! Every leaf of a [`NamedContainer`](crate::container::NamedContainer) is a
//! `Cell`. A cell is either plain data (a JSON value), a list of cells (what
//! `cross_product` builds), or a unary function (what actuation produces and
//! `cross_action` applies).
//!
//! Functions are checked structurally when they are used: `cross_action`
//! asks the left-hand cell for a function and fails with a type mismatch if
//! it holds data instead.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::AxisError;

/// Signature of a function leaf.
pub type CellFn = dyn Fn(&Cell) -> Result<Cell, AxisError> + Send + Sync;

/// A single leaf value.
#[derive(Clone)]
pub enum Cell {
    /// Plain data.
    Value(Value),
    /// A list of cells; one entry per combined container or per result.
    List(Vec<Cell>),
    /// A unary function, shared between clones.
    Function(Arc<CellFn>),
}

impl Cell {
    /// The JSON `null` cell.
    pub fn null() -> Self {
        Cell::Value(Value::Null)
    }

    /// Wrap a closure as a function leaf.
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&Cell) -> Result<Cell, AxisError> + Send + Sync + 'static,
    {
        Cell::Function(Arc::new(f))
    }

    /// Build a list cell.
    pub fn list(items: impl IntoIterator<Item = Cell>) -> Self {
        Cell::List(items.into_iter().collect())
    }

    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Cell::Value(Value::Array(_)) => "array",
            Cell::Value(Value::String(_)) => "string",
            Cell::Value(Value::Null) => "null",
            Cell::Value(_) => "value",
            Cell::List(_) => "list",
            Cell::Function(_) => "function",
        }
    }

    /// True for function leaves.
    pub fn is_callable(&self) -> bool {
        matches!(self, Cell::Function(_))
    }

    /// True for `List` cells and JSON arrays.
    pub fn is_list_like(&self) -> bool {
        matches!(self, Cell::List(_) | Cell::Value(Value::Array(_)))
    }

    /// The JSON value, if this is a data cell.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Cell::Value(v) => Some(v),
            _ => None,
        }
    }

    /// The string payload, if this is a JSON string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Value(Value::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Items of a list-like cell; JSON array elements become value cells.
    pub fn to_list(&self) -> Option<Vec<Cell>> {
        match self {
            Cell::List(items) => Some(items.clone()),
            Cell::Value(Value::Array(items)) => {
                Some(items.iter().cloned().map(Cell::Value).collect())
            }
            _ => None,
        }
    }

    /// Apply a function leaf to `input`.
    ///
    /// Fails with a type mismatch when this cell is not a function.
    pub fn call(&self, input: &Cell) -> Result<Cell, AxisError> {
        match self {
            Cell::Function(f) => f(input),
            other => Err(AxisError::type_mismatch("function", other.kind())),
        }
    }

    /// Convert to plain JSON; lists become arrays.
    ///
    /// Fails on function leaves, which have no data representation.
    pub fn to_json(&self) -> Result<Value, AxisError> {
        match self {
            Cell::Value(v) => Ok(v.clone()),
            Cell::List(items) => items
                .iter()
                .map(Cell::to_json)
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            Cell::Function(_) => Err(AxisError::type_mismatch("data", "function")),
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::null()
    }
}

impl PartialEq for Cell {
    /// Data compares structurally, functions by identity.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Cell::Value(a), Cell::Value(b)) => a == b,
            (Cell::List(a), Cell::List(b)) => a == b,
            (Cell::Function(a), Cell::Function(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Value(v) => write!(f, "Value({})", v),
            Cell::List(items) => f.debug_tuple("List").field(items).finish(),
            Cell::Function(_) => write!(f, "Function(<fn>)"),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Value(Value::String(s)) => write!(f, "{}", s),
            Cell::Value(v) => write!(f, "{}", v),
            Cell::List(items) => write!(
                f,
                "[{}]",
                items
                    .iter()
                    .map(|c| c.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            Cell::Function(_) => write!(f, "<fn>"),
        }
    }
}

impl From<Value> for Cell {
    fn from(v: Value) -> Self {
        Cell::Value(v)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Value(Value::String(s.to_string()))
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Value(Value::String(s))
    }
}

impl From<i64> for Cell {
    fn from(n: i64) -> Self {
        Cell::Value(Value::from(n))
    }
}

impl From<i32> for Cell {
    fn from(n: i32) -> Self {
        Cell::Value(Value::from(n))
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Value(Value::from(n))
    }
}

impl From<bool> for Cell {
    fn from(b: bool) -> Self {
        Cell::Value(Value::Bool(b))
    }
}

impl From<Vec<Cell>> for Cell {
    fn from(items: Vec<Cell>) -> Self {
        Cell::List(items)
    }
}
