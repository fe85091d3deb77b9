//! # Axis Algebra
//!
//! The combinators that build new containers out of existing ones:
//!
//! - [`cross_product`]: put disjoint-axis containers side by side; each leaf
//!   becomes the list of the source leaves.
//! - [`cross_action`]: apply a container of functions to a container of
//!   values over the union of their axes, growing one new axis for the
//!   results.
//! - [`element_action`]: shape-preserving map over aligned containers.
//!
//! ```text
//!   A [x: 2] of fns        B [y: 1] of values
//!          \                    /
//!           cross_action(A, B, "z")
//!                    |
//!           [x: 2, y: 1, z: n]      n = length of the first result
//! ```
//!
//! All three are written against the public contract of
//! [`NamedContainer`]; none of them touch its storage directly.

use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::cell::Cell;
use crate::container::NamedContainer;
use crate::error::AxisError;
use crate::shape::{Coords, Shape};

/// How `cross_action` treats result lists of different lengths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrossActionMode {
    /// The first cell's result length sizes the new axis. Longer results are
    /// truncated, shorter ones padded with null; a warning is logged.
    #[default]
    Lenient,
    /// Every result must have the first cell's length.
    Strict,
}

/// Concatenate containers with pairwise-disjoint axes.
///
/// Axes and sizes are concatenated in input order. Each leaf of the result
/// is a [`Cell::List`] holding one leaf from every input. A single input is
/// returned unchanged.
pub fn cross_product(containers: &[&NamedContainer]) -> Result<NamedContainer, AxisError> {
    match containers {
        [] => Err(AxisError::invalid("cross_product needs at least one container")),
        [only] => Ok((*only).clone()),
        _ => {
            let axes: Vec<String> = containers
                .iter()
                .flat_map(|c| c.axes().iter().cloned())
                .collect();
            let dims: Vec<usize> = containers
                .iter()
                .flat_map(|c| c.dims().iter().copied())
                .collect();
            let shape = Shape::new(axes, dims)?;
            trace!(%shape, inputs = containers.len(), "cross_product");

            let mut data = Vec::with_capacity(shape.numel());
            for idx in shape.indices() {
                let mut start = 0;
                let mut parts = Vec::with_capacity(containers.len());
                for c in containers {
                    let end = start + c.rank();
                    parts.push(c.get_at(&idx[start..end])?.clone());
                    start = end;
                }
                data.push(Cell::List(parts));
            }
            NamedContainer::from_parts(shape, data)
        }
    }
}

/// Apply a container of functions to a container of values.
///
/// Uses [`CrossActionMode::Lenient`]; see [`cross_action_with`].
pub fn cross_action(
    actions: &NamedContainer,
    inputs: &NamedContainer,
    new_axis: &str,
) -> Result<NamedContainer, AxisError> {
    cross_action_with(actions, inputs, new_axis, CrossActionMode::Lenient)
}

/// Apply a container of functions to a container of values.
///
/// The result's axes are `actions`' axes, then the axes of `inputs` not
/// already present, then `new_axis`. Shared axes must agree on size. At every
/// coordinate the function leaf of `actions` is applied to the value leaf of
/// `inputs`; it must return a list, whose items are laid out along
/// `new_axis`. The length of the list produced at the first coordinate sizes
/// the new axis.
pub fn cross_action_with(
    actions: &NamedContainer,
    inputs: &NamedContainer,
    new_axis: &str,
    mode: CrossActionMode,
) -> Result<NamedContainer, AxisError> {
    let mut axes = actions.axes().to_vec();
    let mut dims = actions.dims().to_vec();
    for (axis, &size) in inputs.axes().iter().zip(inputs.dims()) {
        match actions.shape().dim(axis) {
            Some(expected) if expected != size => {
                return Err(AxisError::ShapeMismatch {
                    axis: axis.clone(),
                    expected,
                    got: size,
                });
            }
            Some(_) => {}
            None => {
                axes.push(axis.clone());
                dims.push(size);
            }
        }
    }
    let combined = Shape::new(axes.clone(), dims.clone())?;
    trace!(%combined, new_axis, "cross_action");

    let mut results: Vec<Vec<Cell>> = Vec::with_capacity(combined.numel());
    for idx in combined.indices() {
        let coords = combined.coords_of(&idx);
        let action = actions.get(&coords.project(actions.axes()))?;
        if !action.is_callable() {
            return Err(AxisError::type_mismatch("function", action.kind()));
        }
        let input = inputs.get(&coords.project(inputs.axes()))?;
        let output = action.call(input)?;
        let items = output
            .to_list()
            .ok_or_else(|| AxisError::type_mismatch("list", output.kind()))?;
        results.push(items);
    }

    let width = results.first().map(Vec::len).unwrap_or(0);
    if width == 0 {
        return Err(AxisError::invalid(format!(
            "first result of cross_action is empty; cannot size axis '{}'",
            new_axis
        )));
    }

    let mut uneven = 0usize;
    let mut data = Vec::with_capacity(results.len() * width);
    for mut items in results {
        if items.len() != width {
            if mode == CrossActionMode::Strict {
                return Err(AxisError::ShapeMismatch {
                    axis: new_axis.to_string(),
                    expected: width,
                    got: items.len(),
                });
            }
            uneven += 1;
            items.resize(width, Cell::null());
        }
        data.extend(items);
    }
    if uneven > 0 {
        warn!(
            new_axis,
            width, uneven, "cross_action results differ in length; padded or truncated"
        );
    }

    axes.push(new_axis.to_string());
    dims.push(width);
    NamedContainer::from_parts(Shape::new(axes, dims)?, data)
}

/// Map `f` over the aligned leaves of one or more containers.
///
/// All containers must have identical axes and sizes; nothing is broadcast.
/// `f` receives one leaf per container, plus the leaf's coordinate when
/// `index_awareness` is set.
pub fn element_action<F>(
    mut f: F,
    containers: &[&NamedContainer],
    index_awareness: bool,
) -> Result<NamedContainer, AxisError>
where
    F: FnMut(&[&Cell], Option<&Coords>) -> Result<Cell, AxisError>,
{
    let first = containers
        .first()
        .ok_or_else(|| AxisError::invalid("element_action needs at least one container"))?;
    for other in &containers[1..] {
        if other.axes() != first.axes() {
            return Err(AxisError::AxesMismatch {
                expected: first.axes().to_vec(),
                got: other.axes().to_vec(),
            });
        }
        for ((axis, &expected), &got) in first.axes().iter().zip(first.dims()).zip(other.dims()) {
            if expected != got {
                return Err(AxisError::ShapeMismatch {
                    axis: axis.clone(),
                    expected,
                    got,
                });
            }
        }
    }

    let shape = first.shape().clone();
    let mut data = Vec::with_capacity(shape.numel());
    for (offset, idx) in shape.indices().enumerate() {
        let leaves: Vec<&Cell> = containers.iter().map(|c| &c.cells()[offset]).collect();
        let out = if index_awareness {
            f(&leaves, Some(&shape.coords_of(&idx)))?
        } else {
            f(&leaves, None)?
        };
        data.push(out);
    }
    NamedContainer::from_parts(shape, data)
}
