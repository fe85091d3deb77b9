//! # Core - Named-Axis Containers
//!
//! This crate provides the value layer that concept plans are built on:
//!
//! - **Shapes**: Named axes and their cardinalities, plus named coordinates
//! - **Cells**: Tagged leaves (data, lists, unary functions)
//! - **Containers**: Rectangular named-axis blocks of cells with get/set,
//!   slicing and views
//! - **Algebra**: `cross_product`, `cross_action`, `element_action`
//! - **Errors**: First-class combination failures
//!
//! ## Design Philosophy
//!
//! Dimensions are addressed by name, never by position. Two containers
//! combine along the axes they share and sit side by side along the axes
//! they don't, so a pipeline can grow new dimensions step by step without
//! any stage having to know the positional layout of another.

pub mod algebra;
pub mod cell;
pub mod container;
pub mod error;
pub mod shape;

// Re-export key types at crate root for convenience
pub use algebra::{cross_action, cross_action_with, cross_product, element_action, CrossActionMode};
pub use cell::{Cell, CellFn};
pub use container::NamedContainer;
pub use error::AxisError;
pub use shape::{Coords, Indices, Shape};
