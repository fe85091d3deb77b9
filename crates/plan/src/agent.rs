//! Collaborators a plan delegates to.
//!
//! A plan never interprets cell payloads itself. Each step hands its
//! containers to three collaborators:
//!
//! - **Perception**: turns the combined perception concept into the values
//!   the step's functions are applied to.
//! - **Actuation**: turns the actuation concept into a container of
//!   functions.
//! - **Cognition**: post-processes every freshly bound container (inputs and
//!   step results), e.g. by committing parts of it to memory.
//!
//! All three are plain synchronous traits. Closures with the matching
//! signature implement them, which keeps tests short.

use std::fmt;
use std::sync::Arc;

use axial_core::NamedContainer;

use crate::builtin::PassThrough;
use crate::concept::Concept;
use crate::config::WorkingConfig;
use crate::error::PlanError;

// ============================================================================
// Collaborator Traits
// ============================================================================

/// Post-processes a container bound to `concept`.
pub trait Cognition: Send + Sync {
    fn cognize(
        &self,
        reference: &NamedContainer,
        concept: &str,
        config: &WorkingConfig,
    ) -> Result<NamedContainer, PlanError>;
}

/// Produces a container of functions from an actuation concept.
pub trait Actuation: Send + Sync {
    fn actuate(&self, concept: &Concept, config: &WorkingConfig)
        -> Result<NamedContainer, PlanError>;
}

/// Produces the values a step's functions consume.
pub trait Perception: Send + Sync {
    fn perceive(&self, concept: &Concept, config: &WorkingConfig)
        -> Result<NamedContainer, PlanError>;
}

impl<F> Cognition for F
where
    F: Fn(&NamedContainer, &str, &WorkingConfig) -> Result<NamedContainer, PlanError>
        + Send
        + Sync,
{
    fn cognize(
        &self,
        reference: &NamedContainer,
        concept: &str,
        config: &WorkingConfig,
    ) -> Result<NamedContainer, PlanError> {
        self(reference, concept, config)
    }
}

impl<F> Actuation for F
where
    F: Fn(&Concept, &WorkingConfig) -> Result<NamedContainer, PlanError> + Send + Sync,
{
    fn actuate(
        &self,
        concept: &Concept,
        config: &WorkingConfig,
    ) -> Result<NamedContainer, PlanError> {
        self(concept, config)
    }
}

impl<F> Perception for F
where
    F: Fn(&Concept, &WorkingConfig) -> Result<NamedContainer, PlanError> + Send + Sync,
{
    fn perceive(
        &self,
        concept: &Concept,
        config: &WorkingConfig,
    ) -> Result<NamedContainer, PlanError> {
        self(concept, config)
    }
}

// ============================================================================
// Agent Frame
// ============================================================================

/// The collaborators a plan runs with.
#[derive(Clone)]
pub struct AgentFrame {
    cognition: Arc<dyn Cognition>,
    actuation: Arc<dyn Actuation>,
    perception: Arc<dyn Perception>,
}

impl AgentFrame {
    pub fn new(
        cognition: impl Cognition + 'static,
        actuation: impl Actuation + 'static,
        perception: impl Perception + 'static,
    ) -> Self {
        Self {
            cognition: Arc::new(cognition),
            actuation: Arc::new(actuation),
            perception: Arc::new(perception),
        }
    }

    /// Every collaborator passes containers through unchanged.
    pub fn pass_through() -> Self {
        let shared = Arc::new(PassThrough);
        Self {
            cognition: shared.clone(),
            actuation: shared.clone(),
            perception: shared,
        }
    }

    /// Replace the cognition collaborator.
    pub fn with_cognition(mut self, cognition: impl Cognition + 'static) -> Self {
        self.cognition = Arc::new(cognition);
        self
    }

    /// Replace the actuation collaborator.
    pub fn with_actuation(mut self, actuation: impl Actuation + 'static) -> Self {
        self.actuation = Arc::new(actuation);
        self
    }

    /// Replace the perception collaborator.
    pub fn with_perception(mut self, perception: impl Perception + 'static) -> Self {
        self.perception = Arc::new(perception);
        self
    }

    pub fn cognition(&self) -> &dyn Cognition {
        self.cognition.as_ref()
    }

    pub fn actuation(&self) -> &dyn Actuation {
        self.actuation.as_ref()
    }

    pub fn perception(&self) -> &dyn Perception {
        self.perception.as_ref()
    }
}

impl Default for AgentFrame {
    fn default() -> Self {
        Self::pass_through()
    }
}

impl fmt::Debug for AgentFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentFrame").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axial_core::Cell;

    #[test]
    fn test_closures_as_collaborators() {
        let frame = AgentFrame::pass_through()
            .with_cognition(|r: &NamedContainer, _: &str, _: &WorkingConfig| {
                r.map(|_| Ok(Cell::from("seen")))
                    .map_err(PlanError::from)
            })
            .with_perception(|c: &Concept, _: &WorkingConfig| -> Result<_, PlanError> {
                Ok(NamedContainer::scalar(c.name()))
            });

        let config = WorkingConfig::new("test");
        let input = NamedContainer::from_values("x", [1, 2]).unwrap();
        let cognized = frame.cognition().cognize(&input, "x", &config).unwrap();
        assert_eq!(cognized.cells(), &[Cell::from("seen"), Cell::from("seen")]);

        let perceived = frame
            .perception()
            .perceive(&Concept::new("p"), &config)
            .unwrap();
        assert_eq!(perceived.cells(), &[Cell::from("p")]);
    }
}
