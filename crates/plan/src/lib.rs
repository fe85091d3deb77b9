//! # Plan - Concept Pipelines over Named Containers
//!
//! This crate schedules inference steps over concepts whose values are
//! [`NamedContainer`](axial_core::NamedContainer)s:
//!
//! - **Concepts**: Named bindings with a kind and at most one container
//! - **Inference steps**: `(perception, actuation) -> inferred`
//! - **Plan**: Registries, topological ordering, execution
//! - **Collaborators**: Cognition, actuation and perception traits, plus
//!   built-in implementations backed by an in-process memory
//! - **Hooks**: Observe a run without changing it
//!
//! ## Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use axial_core::{Cell, NamedContainer};
//! use axial_plan::{AgentFrame, FnActuation, Plan};
//!
//! let agent = AgentFrame::pass_through().with_actuation(
//!     FnActuation::new().with("twice", |_, _| {
//!         Ok(Cell::function(|v| Ok(Cell::list([v.clone(), v.clone()]))))
//!     }),
//! );
//! let mut plan = Plan::new(agent);
//! plan.add_inference(&["word"], "twice", "echo", &[]).unwrap();
//! plan.configure_io(&["word", "twice"], "echo").unwrap();
//!
//! let mut inputs = HashMap::new();
//! inputs.insert("word".to_string(), NamedContainer::from_values("word", ["hi"]).unwrap());
//! inputs.insert("twice".to_string(), NamedContainer::from_values("twice", ["f"]).unwrap());
//!
//! let echo = plan.execute(Some(inputs)).unwrap();
//! assert_eq!(echo.dims(), &[1, 1, 2]);
//! ```

pub mod agent;
pub mod builtin;
pub mod concept;
pub mod config;
pub mod error;
pub mod hooks;
pub mod inference;
pub mod literal;
pub mod memory;
pub mod plan;

pub use agent::{Actuation, AgentFrame, Cognition, Perception};
pub use builtin::{BulletFormat, FnActuation, MemoryCognition, MemoryPerception, PassThrough};
pub use concept::{Concept, ConceptKind};
pub use config::{ConceptConfig, PlanConfig, WorkingConfig, MODE_IDENTITY, MODE_MEMORY_RETRIEVAL};
pub use error::{PlanError, StrandedStep};
pub use hooks::{CompositeHook, LoggingHook, NullHook, PlanHook};
pub use inference::{InferenceKey, InferenceStep};
pub use literal::{container_from_literal, parse_literal};
pub use memory::LocationMemory;
pub use plan::{Plan, ReferenceSource};
