//! # Named Containers
//!
//! A `NamedContainer` is a rectangular block of [`Cell`]s addressed by named
//! axes. It is the value that flows along every wire of a plan: inputs are
//! wrapped in one, each inference step produces one, and the output of a plan
//! is one.
//!
//! ```rust
//! use axial_core::{Cell, Coords, NamedContainer};
//!
//! let mut c = NamedContainer::new(vec!["x", "y"], vec![2, 3], Cell::null()).unwrap();
//! c.set("hello", &Coords::from([("x", 1), ("y", 2)])).unwrap();
//! assert_eq!(c.get(&Coords::from([("x", 1), ("y", 2)])).unwrap(), &Cell::from("hello"));
//! ```
//!
//! Containers are never resized. `slice`, `shape_view` and the functions in
//! [`crate::algebra`] all return new containers.

use std::fmt;

use serde_json::Value;
use tracing::debug;

use crate::algebra::element_action;
use crate::cell::Cell;
use crate::error::AxisError;
use crate::shape::{Coords, Shape};

/// A rectangular, named-axis container of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedContainer {
    shape: Shape,
    /// Row-major leaves; `data.len() == shape.numel()`.
    data: Vec<Cell>,
}

impl NamedContainer {
    /// Create a container with every leaf set to `initial`.
    pub fn new<S: Into<String>>(
        axes: Vec<S>,
        dims: Vec<usize>,
        initial: impl Into<Cell>,
    ) -> Result<Self, AxisError> {
        let shape = Shape::new(axes, dims)?;
        let data = vec![initial.into(); shape.numel()];
        Ok(Self { shape, data })
    }

    /// A zero-axis container holding a single leaf.
    pub fn scalar(value: impl Into<Cell>) -> Self {
        Self {
            shape: Shape::scalar(),
            data: vec![value.into()],
        }
    }

    /// A one-axis container, one leaf per value.
    pub fn from_values<C: Into<Cell>>(
        axis: impl Into<String>,
        values: impl IntoIterator<Item = C>,
    ) -> Result<Self, AxisError> {
        let data: Vec<Cell> = values.into_iter().map(Into::into).collect();
        let shape = Shape::new(vec![axis.into()], vec![data.len()])?;
        Ok(Self { shape, data })
    }

    /// Build a container from a nested list structure of depth `axes.len()`.
    ///
    /// The shape is inferred from the nesting. Ragged rows, missing depth or
    /// empty lists are construction errors.
    pub fn from_nested<S: Into<String>>(
        axes: Vec<S>,
        nested: impl Into<Cell>,
    ) -> Result<Self, AxisError> {
        let axes: Vec<String> = axes.into_iter().map(Into::into).collect();
        let mut dims = Vec::with_capacity(axes.len());
        let mut data = Vec::new();
        let nested: Cell = nested.into();
        flatten(&nested, 0, &axes, &mut dims, &mut data)?;
        let shape = Shape::new(axes, dims)?;
        Self::from_parts(shape, data)
    }

    /// Assemble a container from a shape and its row-major leaves.
    pub fn from_parts(shape: Shape, data: Vec<Cell>) -> Result<Self, AxisError> {
        if data.len() != shape.numel() {
            return Err(AxisError::invalid(format!(
                "shape {} needs {} leaves, got {}",
                shape,
                shape.numel(),
                data.len()
            )));
        }
        Ok(Self { shape, data })
    }

    /// The container's shape.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Axis names in order.
    pub fn axes(&self) -> &[String] {
        self.shape.axes()
    }

    /// Axis sizes in order.
    pub fn dims(&self) -> &[usize] {
        self.shape.dims()
    }

    /// Number of axes.
    pub fn rank(&self) -> usize {
        self.shape.rank()
    }

    /// Number of leaves.
    pub fn numel(&self) -> usize {
        self.data.len()
    }

    /// All leaves in row-major order.
    pub fn cells(&self) -> &[Cell] {
        &self.data
    }

    /// Read the leaf at a named coordinate.
    pub fn get(&self, coords: &Coords) -> Result<&Cell, AxisError> {
        let index = self.shape.resolve(coords)?;
        self.get_at(&index)
    }

    /// Read the leaf at a positional index tuple.
    pub fn get_at(&self, index: &[usize]) -> Result<&Cell, AxisError> {
        let offset = self.shape.offset(index)?;
        Ok(&self.data[offset])
    }

    /// Overwrite the leaf at a named coordinate.
    pub fn set(&mut self, value: impl Into<Cell>, coords: &Coords) -> Result<(), AxisError> {
        let index = self.shape.resolve(coords)?;
        let offset = self.shape.offset(&index)?;
        self.data[offset] = value.into();
        Ok(())
    }

    /// Iterate `(coords, leaf)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Coords, &Cell)> + '_ {
        self.shape
            .indices()
            .zip(self.data.iter())
            .map(move |(idx, cell)| (self.shape.coords_of(&idx), cell))
    }

    /// Project onto `keep`, in the order given.
    ///
    /// Axes that are not kept are discarded positionally: only their index 0
    /// survives, nothing is aggregated.
    pub fn slice<S: AsRef<str>>(&self, keep: &[S]) -> Result<Self, AxisError> {
        let mut positions = Vec::with_capacity(keep.len());
        for axis in keep {
            let axis = axis.as_ref();
            let pos = self
                .shape
                .position(axis)
                .ok_or_else(|| AxisError::UnknownAxis {
                    axis: axis.to_string(),
                    available: self.axes().to_vec(),
                })?;
            if positions.contains(&pos) {
                return Err(AxisError::invalid(format!(
                    "axis '{}' requested twice in slice",
                    axis
                )));
            }
            positions.push(pos);
        }

        let dropped: Vec<&String> = self
            .axes()
            .iter()
            .enumerate()
            .filter(|(i, _)| !positions.contains(i) && self.dims()[*i] > 1)
            .map(|(_, a)| a)
            .collect();
        if !dropped.is_empty() {
            debug!(?dropped, "slice keeps index 0 of dropped axes");
        }

        let shape = Shape::new(
            positions.iter().map(|&p| self.axes()[p].clone()).collect(),
            positions.iter().map(|&p| self.dims()[p]).collect(),
        )?;
        let mut data = Vec::with_capacity(shape.numel());
        let mut full = vec![0; self.rank()];
        for idx in shape.indices() {
            full.iter_mut().for_each(|i| *i = 0);
            for (k, &p) in positions.iter().enumerate() {
                full[p] = idx[k];
            }
            data.push(self.get_at(&full)?.clone());
        }
        Ok(Self { shape, data })
    }

    /// Reorder/filter axes per `view`; an empty view keeps everything.
    pub fn shape_view<S: AsRef<str>>(&self, view: &[S]) -> Result<Self, AxisError> {
        if view.is_empty() {
            return Ok(self.clone());
        }
        self.slice(view)
    }

    /// Map every leaf through `f`, keeping the shape.
    pub fn map<F>(&self, mut f: F) -> Result<Self, AxisError>
    where
        F: FnMut(&Cell) -> Result<Cell, AxisError>,
    {
        element_action(|leaves, _| f(leaves[0]), &[self], false)
    }

    /// Map every leaf through `f`, also handing it the leaf's coordinate.
    pub fn map_indexed<F>(&self, mut f: F) -> Result<Self, AxisError>
    where
        F: FnMut(&Cell, &Coords) -> Result<Cell, AxisError>,
    {
        element_action(
            |leaves, coords| match coords {
                Some(coords) => f(leaves[0], coords),
                None => f(leaves[0], &Coords::new()),
            },
            &[self],
            true,
        )
    }

    /// The data as nested lists, outermost axis first.
    pub fn to_nested(&self) -> Cell {
        nest(&self.data, self.dims())
    }

    /// The data as nested JSON arrays.
    ///
    /// Fails when any leaf is a function.
    pub fn to_json(&self) -> Result<Value, AxisError> {
        self.to_nested().to_json()
    }
}

fn flatten(
    cell: &Cell,
    depth: usize,
    axes: &[String],
    dims: &mut Vec<usize>,
    out: &mut Vec<Cell>,
) -> Result<(), AxisError> {
    if depth == axes.len() {
        out.push(cell.clone());
        return Ok(());
    }
    let items = cell.to_list().ok_or_else(|| {
        AxisError::invalid(format!(
            "expected a list for axis '{}', got {}",
            axes[depth],
            cell.kind()
        ))
    })?;
    match dims.get(depth) {
        Some(&size) if size != items.len() => {
            return Err(AxisError::invalid(format!(
                "ragged data on axis '{}': rows of {} and {}",
                axes[depth],
                size,
                items.len()
            )));
        }
        Some(_) => {}
        None => dims.push(items.len()),
    }
    for item in &items {
        flatten(item, depth + 1, axes, dims, out)?;
    }
    Ok(())
}

fn nest(data: &[Cell], dims: &[usize]) -> Cell {
    match dims.split_first() {
        None => data[0].clone(),
        Some((&outer, rest)) => {
            let chunk = rest.iter().product::<usize>();
            Cell::List((0..outer).map(|i| nest(&data[i * chunk..], rest)).collect())
        }
    }
}

impl fmt::Display for NamedContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NamedContainer{} = {}", self.shape, self.to_nested())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn grid() -> NamedContainer {
        NamedContainer::from_nested(vec!["r", "c"], json!([[1, 2, 3], [4, 5, 6]])).unwrap()
    }

    #[test]
    fn test_new_fills_initial_value() {
        let c = NamedContainer::new(vec!["a", "b"], vec![2, 2], 7).unwrap();
        assert_eq!(c.numel(), 4);
        assert!(c.cells().iter().all(|cell| *cell == Cell::from(7)));
    }

    #[test]
    fn test_from_nested_infers_shape() {
        let c = grid();
        assert_eq!(c.dims(), &[2, 3]);
        assert_eq!(
            c.get(&Coords::from([("r", 1), ("c", 0)])).unwrap(),
            &Cell::from(json!(4))
        );
    }

    #[test]
    fn test_from_nested_rejects_ragged() {
        let err = NamedContainer::from_nested(vec!["r", "c"], json!([[1, 2], [3]])).unwrap_err();
        assert!(matches!(err, AxisError::InvalidContainer { .. }));
    }

    #[test]
    fn test_from_nested_rejects_shallow_data() {
        let err = NamedContainer::from_nested(vec!["r", "c"], json!([1, 2])).unwrap_err();
        assert!(matches!(err, AxisError::InvalidContainer { .. }));
    }

    #[test]
    fn test_get_unknown_axis() {
        let c = grid();
        let err = c
            .get(&Coords::from([("r", 0), ("c", 0), ("z", 0)]))
            .unwrap_err();
        assert!(matches!(err, AxisError::UnknownAxis { .. }));
    }

    #[test]
    fn test_set_out_of_range() {
        let mut c = grid();
        let err = c.set(0, &Coords::from([("r", 2), ("c", 0)])).unwrap_err();
        assert!(matches!(err, AxisError::CoordinateOutOfRange { .. }));
    }

    #[test]
    fn test_slice_keeps_index_zero_of_dropped_axis() {
        let c = grid();
        let s = c.slice(&["c"]).unwrap();
        assert_eq!(s.axes(), &["c".to_string()]);
        assert_eq!(s.to_json().unwrap(), json!([1, 2, 3]));
    }

    #[test]
    fn test_slice_reorders() {
        let s = grid().slice(&["c", "r"]).unwrap();
        assert_eq!(s.dims(), &[3, 2]);
        assert_eq!(s.to_json().unwrap(), json!([[1, 4], [2, 5], [3, 6]]));
    }

    #[test]
    fn test_slice_unknown_axis() {
        assert!(matches!(
            grid().slice(&["q"]),
            Err(AxisError::UnknownAxis { .. })
        ));
    }

    #[test]
    fn test_shape_view_empty_is_identity() {
        let c = grid();
        let empty: [&str; 0] = [];
        assert_eq!(c.shape_view(&empty).unwrap(), c);
    }

    #[test]
    fn test_scalar_round_trip() {
        let mut s = NamedContainer::scalar("x");
        s.set("y", &Coords::new()).unwrap();
        assert_eq!(s.get(&Coords::new()).unwrap(), &Cell::from("y"));
        assert_eq!(s.to_json().unwrap(), json!("y"));
    }

    #[test]
    fn test_iter_yields_coords() {
        let c = NamedContainer::from_values("x", ["a", "b"]).unwrap();
        let seen: Vec<_> = c.iter().map(|(k, v)| (k.get("x").unwrap(), v.clone())).collect();
        assert_eq!(seen, vec![(0, Cell::from("a")), (1, Cell::from("b"))]);
    }
}
