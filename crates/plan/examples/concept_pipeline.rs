//! Concept pipeline walkthrough.
//!
//! Run with: cargo run -p axial-plan --example concept_pipeline
//! Set `RUST_LOG=debug` to see every step.
//!
//! This example builds a two-step plan over memory-backed collaborators:
//! - Inputs arrive as bullets; cognition keeps the names and remembers values
//! - A judgement step looks the values up again and judges them
//! - A second step recalls why each verdict was given

use std::collections::HashMap;
use std::sync::Arc;

use axial_core::{Cell, NamedContainer};
use axial_plan::{
    AgentFrame, Concept, ConceptKind, FnActuation, LocationMemory, LoggingHook, MemoryCognition,
    MemoryPerception, Plan, PlanError, ReferenceSource,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);
    Registry::default().with(filter).with(fmt_layer).init();
}

fn judge_sweetness(_leaf: &Cell, _coords: &axial_core::Coords) -> Result<Cell, axial_core::AxisError> {
    Ok(Cell::function(|pair| {
        let items = pair.to_list().unwrap_or_default();
        let description = items.get(1).and_then(Cell::as_str).unwrap_or_default();
        let verdict = if description.contains("sweet") { "TRUE" } else { "FALSE" };
        Ok(Cell::list([Cell::from(format!("{} : {}", description, verdict))]))
    }))
}

fn label(_leaf: &Cell, _coords: &axial_core::Coords) -> Result<Cell, axial_core::AxisError> {
    Ok(Cell::function(|pair| {
        let items = pair.to_list().unwrap_or_default();
        let verdict = items.first().and_then(Cell::as_str).unwrap_or("?");
        let reason = items.get(1).and_then(Cell::as_str).unwrap_or("nothing remembered");
        Ok(Cell::list([Cell::from(format!("{} ({})", verdict, reason))]))
    }))
}

fn main() -> Result<(), PlanError> {
    init_tracing();

    println!("=== Concept Pipeline ===\n");

    // -------------------------------------------------------------------------
    // 1. Collaborators
    // -------------------------------------------------------------------------
    let memory = Arc::new(LocationMemory::new());
    let agent = AgentFrame::pass_through()
        .with_cognition(MemoryCognition::new(memory.clone()))
        .with_perception(MemoryPerception::new(memory.clone()))
        .with_actuation(
            FnActuation::new()
                .with_mode("judgement", judge_sweetness)
                .with("label", label),
        );

    // -------------------------------------------------------------------------
    // 2. Plan
    // -------------------------------------------------------------------------
    let mut plan = Plan::new(agent).with_hook(LoggingHook::new());
    plan.add_concept_with(
        Concept::new("is sweet")
            .with_kind(ConceptKind::Judgement)
            .with_context("does the description mention sweetness"),
    );
    plan.add_inference(&["fruit"], "is sweet", "sweet", &[])?;
    plan.add_inference(&["sweet"], "label", "summary", &["fruit"])?;
    plan.make_reference("is sweet", ReferenceSource::Literal(r#"["judge"]"#.into()))?;
    plan.make_reference("label", ReferenceSource::Literal(r#""label""#.into()))?;
    plan.configure_io(&["fruit"], "summary")?;

    for key in plan.order_inference()? {
        println!("  step {}", key);
    }

    // -------------------------------------------------------------------------
    // 3. Run
    // -------------------------------------------------------------------------
    let fruit = NamedContainer::from_values(
        "fruit",
        ["sweet and red : apple", "sour and yellow : lemon"],
    )?;
    let mut inputs = HashMap::new();
    inputs.insert("fruit".to_string(), fruit);

    let summary = plan.execute(Some(inputs))?;
    println!("\nsummary: {}", summary);
    println!("memory:  {}", memory.snapshot());

    Ok(())
}
