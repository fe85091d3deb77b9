//! Error types for plan construction and execution.

use std::fmt;

use axial_core::AxisError;
use thiserror::Error;

/// A step left over after topological ordering, with everything it waits on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrandedStep {
    /// Concept the step would produce.
    pub produces: String,
    /// The step's full dependency set.
    pub requires: Vec<String>,
}

impl fmt::Display for StrandedStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (requires {:?})", self.produces, self.requires)
    }
}

fn list_stranded(stranded: &[StrandedStep]) -> String {
    stranded
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors that can occur while building, ordering or running a plan.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PlanError {
    /// A container operation failed.
    #[error(transparent)]
    Axis(#[from] AxisError),

    /// A name was used that the concept registry does not know.
    #[error("Concept '{name}' not registered")]
    UnknownConcept { name: String },

    /// A concept kind marker outside the known set.
    #[error("Invalid concept kind '{marker}'")]
    InvalidConceptKind { marker: String },

    /// An inference with the same key was already added.
    #[error("Inference {key} already exists")]
    DuplicateStep { key: String },

    /// Two inferences claim the same output concept.
    #[error("Multiple producers for '{concept}': {first} and {second}")]
    MultipleProducers {
        concept: String,
        first: String,
        second: String,
    },

    /// A dependency is neither an input, bound, nor produced by any step.
    #[error("Unresolvable dependency '{concept}' of inference {step}")]
    UnresolvableDependency { step: String, concept: String },

    /// Ordering left steps behind.
    #[error("Cyclic/missing dependencies detected in: {}", list_stranded(.stranded))]
    CyclicDependency { stranded: Vec<StrandedStep> },

    /// `execute` ran without an output or any input configured.
    #[error("I/O not configured. Call configure_io() first")]
    IoNotConfigured,

    /// Input data was supplied but lacks some declared inputs.
    #[error("Missing input data for: {}", .names.join(", "))]
    MissingInput { names: Vec<String> },

    /// No input data was supplied and some inputs are unbound.
    #[error("Missing references for inputs: {}. Either provide input data or use make_reference()", .names.join(", "))]
    MissingReference { names: Vec<String> },

    /// The output concept is still unbound after every step ran.
    #[error("Output concept '{concept}' failed to generate a reference")]
    OutputNotProduced { concept: String },

    /// A cognition, actuation or perception collaborator failed.
    #[error("Collaborator failed on '{concept}': {reason}")]
    Collaborator { concept: String, reason: String },

    /// A reference source could not be read or parsed.
    #[error("Cannot load reference for '{concept}': {reason}")]
    Source { concept: String, reason: String },
}

impl PlanError {
    /// Shorthand for [`PlanError::Collaborator`].
    pub fn collaborator(concept: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::Collaborator {
            concept: concept.into(),
            reason: reason.to_string(),
        }
    }

    /// Shorthand for [`PlanError::Source`].
    pub fn source_error(concept: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::Source {
            concept: concept.into(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_message_lists_every_step() {
        let err = PlanError::CyclicDependency {
            stranded: vec![
                StrandedStep {
                    produces: "x".into(),
                    requires: vec!["f".into(), "y".into()],
                },
                StrandedStep {
                    produces: "y".into(),
                    requires: vec!["g".into(), "x".into()],
                },
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains(r#"x (requires ["f", "y"])"#));
        assert!(msg.contains(r#"y (requires ["g", "x"])"#));
    }

    #[test]
    fn test_axis_error_is_transparent() {
        let err: PlanError = AxisError::invalid("bad").into();
        assert_eq!(err.to_string(), "Invalid container: bad");
    }
}
