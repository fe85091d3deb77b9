//! # Shapes - Named Axes as Objects
//!
//! A shape pairs every axis name with its cardinality. Two containers can only
//! be combined along an axis when both agree on that axis's size, so the shape
//! is the "type" of a container in the same way a port type guards a wire.
//!
//! ## Design Choices
//!
//! Axes are addressed by name, never by position, at the public surface.
//! Internally the data lives in a flat row-major buffer, so a shape also
//! knows its strides and how to turn a named coordinate into a flat offset.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AxisError;

/// A coordinate: one index per axis, keyed by axis name.
///
/// `Coords` is what `get`/`set` take and what index-aware element actions
/// receive. Keys are kept sorted, which also gives a stable location tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coords(BTreeMap<String, usize>);

impl Coords {
    /// Create an empty coordinate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add one `axis = index` pair.
    pub fn with(mut self, axis: impl Into<String>, index: usize) -> Self {
        self.0.insert(axis.into(), index);
        self
    }

    /// Insert or overwrite one `axis = index` pair.
    pub fn insert(&mut self, axis: impl Into<String>, index: usize) {
        self.0.insert(axis.into(), index);
    }

    /// Index supplied for `axis`, if any.
    pub fn get(&self, axis: &str) -> Option<usize> {
        self.0.get(axis).copied()
    }

    /// Number of axes addressed.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no axis is addressed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate `(axis, index)` pairs in axis-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Keep only the entries whose axis is in `axes`.
    pub fn project(&self, axes: &[String]) -> Coords {
        Coords(
            self.0
                .iter()
                .filter(|(k, _)| axes.contains(k))
                .map(|(k, v)| (k.clone(), *v))
                .collect(),
        )
    }

    /// True when every `axis = index` pair here also appears in `other`.
    pub fn is_within(&self, other: &Coords) -> bool {
        self.0.iter().all(|(axis, index)| other.0.get(axis) == Some(index))
    }

    /// Location tags `"{axis}{index}"`, sorted by axis name.
    pub fn tags(&self) -> Vec<String> {
        self.0.iter().map(|(k, v)| format!("{}{}", k, v)).collect()
    }

    /// The tags joined with `_` (e.g. `x0_y1`), the canonical location key.
    pub fn location_key(&self) -> String {
        self.tags().join("_")
    }
}

impl<K: Into<String>, const N: usize> From<[(K, usize); N]> for Coords {
    fn from(pairs: [(K, usize); N]) -> Self {
        pairs.into_iter().map(|(k, v)| (k.into(), v)).collect()
    }
}

impl<K: Into<String>> FromIterator<(K, usize)> for Coords {
    fn from_iter<I: IntoIterator<Item = (K, usize)>>(iter: I) -> Self {
        Coords(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl fmt::Display for Coords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{}}}",
            self.0
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

/// The axes of a container together with their sizes.
///
/// Axis order is iteration/nesting order: the last axis varies fastest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shape {
    axes: Vec<String>,
    dims: Vec<usize>,
}

impl Shape {
    /// Create a shape, validating the container invariant.
    ///
    /// Fails when the lists differ in length, an axis repeats, or a size is 0.
    pub fn new<S: Into<String>>(axes: Vec<S>, dims: Vec<usize>) -> Result<Self, AxisError> {
        let axes: Vec<String> = axes.into_iter().map(Into::into).collect();
        if axes.len() != dims.len() {
            return Err(AxisError::invalid(format!(
                "{} axes but {} sizes",
                axes.len(),
                dims.len()
            )));
        }
        for (i, axis) in axes.iter().enumerate() {
            if axes[..i].contains(axis) {
                return Err(AxisError::invalid(format!("axis '{}' repeats", axis)));
            }
        }
        if let Some(pos) = dims.iter().position(|&d| d == 0) {
            return Err(AxisError::invalid(format!(
                "axis '{}' has size 0",
                axes[pos]
            )));
        }
        Ok(Self { axes, dims })
    }

    /// The zero-axis shape of a single leaf.
    pub fn scalar() -> Self {
        Self {
            axes: Vec::new(),
            dims: Vec::new(),
        }
    }

    /// Axis names in order.
    pub fn axes(&self) -> &[String] {
        &self.axes
    }

    /// Axis sizes in order.
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Number of axes.
    pub fn rank(&self) -> usize {
        self.axes.len()
    }

    /// Total number of leaves.
    pub fn numel(&self) -> usize {
        self.dims.iter().product()
    }

    /// Position of `axis` in the axis list.
    pub fn position(&self, axis: &str) -> Option<usize> {
        self.axes.iter().position(|a| a == axis)
    }

    /// Size of `axis`, if present.
    pub fn dim(&self, axis: &str) -> Option<usize> {
        self.position(axis).map(|i| self.dims[i])
    }

    /// True when `axis` is one of this shape's axes.
    pub fn contains(&self, axis: &str) -> bool {
        self.position(axis).is_some()
    }

    /// Row-major strides.
    pub fn strides(&self) -> Vec<usize> {
        let mut strides = vec![1; self.dims.len()];
        for i in (0..self.dims.len().saturating_sub(1)).rev() {
            strides[i] = strides[i + 1] * self.dims[i + 1];
        }
        strides
    }

    /// Flat offset of a positional index tuple (one index per axis, in order).
    pub fn offset(&self, index: &[usize]) -> Result<usize, AxisError> {
        if index.len() != self.rank() {
            return Err(AxisError::invalid(format!(
                "index has {} entries for {} axes",
                index.len(),
                self.rank()
            )));
        }
        let mut offset = 0;
        for (pos, (&i, stride)) in index.iter().zip(self.strides()).enumerate() {
            let size = self.dims[pos];
            if i >= size {
                return Err(AxisError::CoordinateOutOfRange {
                    axis: self.axes[pos].clone(),
                    index: i,
                    size,
                });
            }
            offset += i * stride;
        }
        Ok(offset)
    }

    /// Resolve a named coordinate to positional indices.
    ///
    /// Every axis must be supplied, every supplied name must be an axis, and
    /// every index must be in range.
    pub fn resolve(&self, coords: &Coords) -> Result<Vec<usize>, AxisError> {
        for (axis, _) in coords.iter() {
            if !self.contains(axis) {
                return Err(AxisError::UnknownAxis {
                    axis: axis.to_string(),
                    available: self.axes.clone(),
                });
            }
        }
        self.axes
            .iter()
            .zip(&self.dims)
            .map(|(axis, &size)| {
                let index = coords
                    .get(axis)
                    .ok_or_else(|| AxisError::MissingCoordinate { axis: axis.clone() })?;
                if index >= size {
                    return Err(AxisError::CoordinateOutOfRange {
                        axis: axis.clone(),
                        index,
                        size,
                    });
                }
                Ok(index)
            })
            .collect()
    }

    /// Named coordinate for a positional index tuple.
    pub fn coords_of(&self, index: &[usize]) -> Coords {
        self.axes
            .iter()
            .cloned()
            .zip(index.iter().copied())
            .collect()
    }

    /// Every positional index tuple, depth-first over the axis list.
    pub fn indices(&self) -> Indices {
        Indices::new(self.dims.clone())
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}]",
            self.axes
                .iter()
                .zip(&self.dims)
                .map(|(a, d)| format!("{}: {}", a, d))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

/// Depth-first (row-major) enumeration of index tuples.
#[derive(Debug, Clone)]
pub struct Indices {
    dims: Vec<usize>,
    next: Option<Vec<usize>>,
}

impl Indices {
    fn new(dims: Vec<usize>) -> Self {
        let next = if dims.iter().any(|&d| d == 0) {
            None
        } else {
            Some(vec![0; dims.len()])
        };
        Self { dims, next }
    }
}

impl Iterator for Indices {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        let mut advanced = current.clone();
        let mut carried = true;
        for i in (0..self.dims.len()).rev() {
            advanced[i] += 1;
            if advanced[i] < self.dims[i] {
                carried = false;
                break;
            }
            advanced[i] = 0;
        }
        if !carried {
            self.next = Some(advanced);
        }
        Some(current)
    }
}
