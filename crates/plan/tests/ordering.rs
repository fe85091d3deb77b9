//! # Ordering Tests
//!
//! Tests for `Plan::order_inference`:
//! - Producers run before consumers
//! - Ties follow insertion order
//! - Cycles, double producers and dangling dependencies are reported

use axial_core::NamedContainer;
use axial_plan::{AgentFrame, InferenceKey, Plan, PlanError, StrandedStep};

fn plan() -> Plan {
    Plan::new(AgentFrame::pass_through())
}

fn position(order: &[InferenceKey], inferred: &str) -> usize {
    order
        .iter()
        .position(|k| k.inferred == inferred)
        .unwrap_or_else(|| panic!("{} not in order", inferred))
}

// ============================================================================
// Valid Graphs
// ============================================================================

#[test]
fn test_dag_order_respects_dependencies() {
    let mut plan = plan();
    // registered consumers first, producers last
    plan.add_inference(&["c", "d"], "f", "out", &[]).unwrap();
    plan.add_inference(&["b"], "f", "d", &[]).unwrap();
    plan.add_inference(&["a"], "f", "c", &[]).unwrap();
    plan.add_inference(&["a"], "f", "b", &[]).unwrap();
    plan.configure_io(&["a", "f"], "out").unwrap();

    let order = plan.order_inference().unwrap();
    assert_eq!(order.len(), 4);
    assert!(position(&order, "b") < position(&order, "d"));
    assert!(position(&order, "c") < position(&order, "out"));
    assert!(position(&order, "d") < position(&order, "out"));
    assert!(plan.is_ordered());
}

#[test]
fn test_independent_steps_keep_insertion_order() {
    let mut plan = plan();
    plan.add_inference(&["a"], "f", "z", &[]).unwrap();
    plan.add_inference(&["a"], "f", "y", &[]).unwrap();
    plan.add_inference(&["a"], "f", "x", &[]).unwrap();
    plan.configure_io(&["a", "f"], "x").unwrap();

    let order = plan.order_inference().unwrap();
    let inferred: Vec<&str> = order.iter().map(|k| k.inferred.as_str()).collect();
    assert_eq!(inferred, vec!["z", "y", "x"]);
}

#[test]
fn test_bound_concepts_need_no_producer() {
    let mut plan = plan();
    plan.add_inference(&["a", "lookup"], "f", "b", &[]).unwrap();
    plan.configure_io(&["a", "f"], "b").unwrap();
    assert!(matches!(
        plan.order_inference(),
        Err(PlanError::UnresolvableDependency { .. })
    ));

    plan.make_reference("lookup", NamedContainer::from_values("lookup", [1]).unwrap())
        .unwrap();
    assert!(plan.order_inference().is_ok());
}

// ============================================================================
// Invalid Graphs
// ============================================================================

#[test]
fn test_cycle_lists_both_steps() {
    let mut plan = plan();
    plan.add_inference(&["y"], "f", "x", &[]).unwrap();
    plan.add_inference(&["x"], "g", "y", &[]).unwrap();
    plan.configure_io(&["f", "g"], "x").unwrap();

    let err = plan.order_inference().unwrap_err();
    assert_eq!(
        err,
        PlanError::CyclicDependency {
            stranded: vec![
                StrandedStep {
                    produces: "x".into(),
                    requires: vec!["y".into(), "f".into()],
                },
                StrandedStep {
                    produces: "y".into(),
                    requires: vec!["x".into(), "g".into()],
                },
            ]
        }
    );
    assert!(!plan.is_ordered());
}

#[test]
fn test_self_loop_is_a_cycle() {
    let mut plan = plan();
    plan.add_inference(&["x"], "f", "x", &[]).unwrap();
    plan.configure_io(&["f"], "x").unwrap();
    assert!(matches!(
        plan.order_inference(),
        Err(PlanError::CyclicDependency { .. })
    ));
}

#[test]
fn test_two_producers_rejected() {
    let mut plan = plan();
    plan.add_inference(&["a"], "f", "m", &[]).unwrap();
    plan.add_inference(&["b"], "g", "m", &[]).unwrap();
    plan.configure_io(&["a", "b", "f", "g"], "m").unwrap();

    let err = plan.order_inference().unwrap_err();
    assert_eq!(
        err,
        PlanError::MultipleProducers {
            concept: "m".into(),
            first: "[[a], f, m]".into(),
            second: "[[b], g, m]".into(),
        }
    );
}

#[test]
fn test_two_producers_rejected_by_execute() {
    let mut plan = plan();
    plan.add_inference(&["a"], "f", "m", &[]).unwrap();
    plan.add_inference(&["b"], "g", "m", &[]).unwrap();
    plan.configure_io(&["a", "b", "f", "g"], "m").unwrap();
    for name in ["a", "b", "f", "g"] {
        plan.make_reference(name, NamedContainer::from_values(name, [1]).unwrap())
            .unwrap();
    }
    assert!(matches!(
        plan.execute(None),
        Err(PlanError::MultipleProducers { .. })
    ));
}

#[test]
fn test_unresolvable_dependency_names_step() {
    let mut plan = plan();
    plan.add_inference(&["a", "ghost"], "f", "b", &[]).unwrap();
    plan.configure_io(&["a", "f"], "b").unwrap();
    assert_eq!(
        plan.order_inference().unwrap_err(),
        PlanError::UnresolvableDependency {
            step: "[[a, ghost], f, b]".into(),
            concept: "ghost".into(),
        }
    );
}

#[test]
fn test_duplicate_step_rejected() {
    let mut plan = plan();
    plan.add_inference(&["a"], "f", "b", &[]).unwrap();
    assert_eq!(
        plan.add_inference(&["a"], "f", "b", &["b"]).unwrap_err(),
        PlanError::DuplicateStep {
            key: "[[a], f, b]".into()
        }
    );
    assert_eq!(plan.steps().len(), 1);
}
