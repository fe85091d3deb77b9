//! # Container Tests
//!
//! Tests for the container layer:
//! - Construction (fill, nested, one-axis)
//! - Named get/set and their failure modes
//! - Slicing and views
//!
//! These tests verify that "axes as interfaces" works correctly.

use axial_core::{AxisError, Cell, Coords, NamedContainer, Shape};
use serde_json::json;

// ============================================================================
// Construction Tests
// ============================================================================

#[test]
fn test_fill_constructor() {
    let c = NamedContainer::new(vec!["a", "b", "c"], vec![2, 3, 4], "_").unwrap();
    assert_eq!(c.rank(), 3);
    assert_eq!(c.numel(), 24);
    assert_eq!(c.axes(), &["a", "b", "c"].map(String::from));
}

#[test]
fn test_constructor_rejects_bad_shapes() {
    assert!(matches!(
        NamedContainer::new(vec!["a"], vec![2, 2], 0),
        Err(AxisError::InvalidContainer { .. })
    ));
    assert!(matches!(
        NamedContainer::new(vec!["a", "a"], vec![2, 2], 0),
        Err(AxisError::InvalidContainer { .. })
    ));
    assert!(matches!(
        NamedContainer::new(vec!["a"], vec![0], 0),
        Err(AxisError::InvalidContainer { .. })
    ));
}

#[test]
fn test_one_axis_constructor() {
    let c = NamedContainer::from_values("word", ["cat", "dog"]).unwrap();
    assert_eq!(c.dims(), &[2]);
    assert_eq!(c.to_json().unwrap(), json!(["cat", "dog"]));
}

#[test]
fn test_empty_values_rejected() {
    let empty: Vec<Cell> = Vec::new();
    assert!(NamedContainer::from_values("word", empty).is_err());
}

#[test]
fn test_nested_round_trip() {
    let nested = json!([[["a"], ["b"]], [["c"], ["d"]]]);
    let c = NamedContainer::from_nested(vec!["x", "y", "z"], nested.clone()).unwrap();
    assert_eq!(c.dims(), &[2, 2, 1]);
    assert_eq!(c.to_json().unwrap(), nested);
}

// ============================================================================
// Get / Set Tests
// ============================================================================

#[test]
fn test_set_then_get_every_coordinate() {
    for (axes, dims) in [
        (vec!["x"], vec![3]),
        (vec!["x", "y"], vec![2, 3]),
        (vec!["p", "q", "r"], vec![2, 1, 4]),
    ] {
        let mut c = NamedContainer::new(axes.clone(), dims.clone(), Cell::null()).unwrap();
        let shape = Shape::new(axes, dims).unwrap();
        for (n, idx) in shape.indices().enumerate() {
            let coords = shape.coords_of(&idx);
            c.set(n as i64, &coords).unwrap();
            assert_eq!(c.get(&coords).unwrap(), &Cell::from(n as i64));
        }
        // earlier writes survive later ones
        for (n, idx) in shape.indices().enumerate() {
            assert_eq!(c.get(&shape.coords_of(&idx)).unwrap(), &Cell::from(n as i64));
        }
    }
}

#[test]
fn test_get_missing_coordinate() {
    let c = NamedContainer::new(vec!["x", "y"], vec![1, 1], 0).unwrap();
    let err = c.get(&Coords::from([("x", 0)])).unwrap_err();
    assert_eq!(err, AxisError::MissingCoordinate { axis: "y".into() });
}

#[test]
fn test_get_out_of_range_names_axis() {
    let c = NamedContainer::new(vec!["x", "y"], vec![1, 2], 0).unwrap();
    let err = c.get(&Coords::from([("x", 0), ("y", 5)])).unwrap_err();
    assert_eq!(
        err,
        AxisError::CoordinateOutOfRange {
            axis: "y".into(),
            index: 5,
            size: 2
        }
    );
}

#[test]
fn test_functions_are_storable() {
    let mut c = NamedContainer::new(vec!["f"], vec![1], Cell::null()).unwrap();
    c.set(Cell::function(|v| Ok(v.clone())), &Coords::from([("f", 0)]))
        .unwrap();
    assert!(c.get(&Coords::from([("f", 0)])).unwrap().is_callable());
    assert!(c.to_json().is_err());
}

// ============================================================================
// Slice / View Tests
// ============================================================================

#[test]
fn test_slice_drops_to_index_zero_without_aggregation() {
    let c = NamedContainer::from_nested(vec!["a", "b"], json!([[1, 2], [3, 4], [5, 6]])).unwrap();
    let only_b = c.slice(&["b"]).unwrap();
    assert_eq!(only_b.to_json().unwrap(), json!([1, 2]));
    let only_a = c.slice(&["a"]).unwrap();
    assert_eq!(only_a.to_json().unwrap(), json!([1, 3, 5]));
}

#[test]
fn test_slice_twice_same_axis_rejected() {
    let c = NamedContainer::new(vec!["a"], vec![2], 0).unwrap();
    assert!(matches!(
        c.slice(&["a", "a"]),
        Err(AxisError::InvalidContainer { .. })
    ));
}

#[test]
fn test_shape_view_filters_and_orders() {
    let c = NamedContainer::from_nested(vec!["a", "b", "c"], json!([[[1], [2]]])).unwrap();
    let view = vec!["c".to_string(), "b".to_string()];
    let v = c.shape_view(&view).unwrap();
    assert_eq!(v.axes(), &["c".to_string(), "b".to_string()]);
    assert_eq!(v.dims(), &[1, 2]);
}

#[test]
fn test_display_mentions_axes() {
    let c = NamedContainer::from_values("x", [1, 2]).unwrap();
    let shown = c.to_string();
    assert!(shown.contains("x: 2"));
    assert!(shown.contains("[1, 2]"));
}
