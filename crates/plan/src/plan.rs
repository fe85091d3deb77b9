//! The dependency scheduler.
//!
//! A `Plan` owns a registry of concepts and a registry of inference steps.
//! It orders the steps so that every step runs after the producers of the
//! concepts it reads, then runs them one by one:
//!
//! ```text
//!   perception concepts ──cross_product──► combined ──perceive──┐
//!                                                               ├─ cross_action ─► cognize ─► view ─► inferred
//!   actuation concept ─────────────────────────────actuate──────┘
//! ```
//!
//! ## Lifecycle
//!
//! 1. Register concepts and steps (`add_concept`, `add_inference`)
//! 2. Declare inputs and the output (`configure_io`)
//! 3. Optionally bind references ahead of time (`make_reference`)
//! 4. `execute`, any number of times
//!
//! The execution order is derived from the registries. Adding a step drops
//! it; the next `execute` recomputes it.

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::PathBuf;

use axial_core::{cross_action_with, cross_product, NamedContainer};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use tracing::{debug, info};

use crate::agent::AgentFrame;
use crate::concept::Concept;
use crate::config::{ConceptConfig, PlanConfig};
use crate::error::{PlanError, StrandedStep};
use crate::hooks::{NullHook, PlanHook};
use crate::inference::{InferenceKey, InferenceStep};
use crate::literal::container_from_literal;

// ============================================================================
// Reference Sources
// ============================================================================

/// Where a reference comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ReferenceSource {
    /// An in-memory container.
    Container(NamedContainer),
    /// Literal text, see [`crate::literal`].
    Literal(String),
    /// A file holding literal text.
    File(PathBuf),
}

impl From<NamedContainer> for ReferenceSource {
    fn from(container: NamedContainer) -> Self {
        ReferenceSource::Container(container)
    }
}

impl ReferenceSource {
    fn load(self, concept: &str) -> Result<NamedContainer, PlanError> {
        match self {
            ReferenceSource::Container(c) => Ok(c),
            ReferenceSource::Literal(text) => container_from_literal(concept, &text),
            ReferenceSource::File(path) => {
                let text = std::fs::read_to_string(&path).map_err(|e| {
                    PlanError::source_error(concept, format!("{}: {}", path.display(), e))
                })?;
                container_from_literal(concept, &text)
            }
        }
    }
}

// ============================================================================
// Plan
// ============================================================================

/// A network of inference steps over named concepts.
pub struct Plan {
    agent: AgentFrame,
    config: PlanConfig,
    hook: Box<dyn PlanHook>,
    concepts: HashMap<String, Concept>,
    concept_configs: HashMap<String, ConceptConfig>,
    /// Steps in insertion order.
    steps: Vec<InferenceStep>,
    step_index: HashMap<InferenceKey, usize>,
    inputs: Vec<String>,
    output: Option<String>,
    /// Indices into `steps`, valid until the next step is added.
    order: Option<Vec<usize>>,
}

impl Plan {
    /// Create an empty plan running with `agent`.
    pub fn new(agent: AgentFrame) -> Self {
        Self {
            agent,
            config: PlanConfig::default(),
            hook: Box::new(NullHook),
            concepts: HashMap::new(),
            concept_configs: HashMap::new(),
            steps: Vec::new(),
            step_index: HashMap::new(),
            inputs: Vec::new(),
            output: None,
            order: None,
        }
    }

    /// Set the plan config.
    pub fn with_config(mut self, config: PlanConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the hook that observes `execute`.
    pub fn with_hook<H: PlanHook + 'static>(mut self, hook: H) -> Self {
        self.hook = Box::new(hook);
        self
    }

    pub fn config(&self) -> &PlanConfig {
        &self.config
    }

    // ------------------------------------------------------------------------
    // Concepts
    // ------------------------------------------------------------------------

    /// Register a placeholder concept. Existing concepts are left alone.
    pub fn add_concept(&mut self, name: impl Into<String>) -> &mut Self {
        let name = name.into();
        if !self.concepts.contains_key(&name) {
            self.concepts.insert(name.clone(), Concept::new(name));
        }
        self
    }

    /// Register a fully specified concept.
    ///
    /// If the name is already registered, its kind and context are replaced
    /// and its current reference is kept.
    pub fn add_concept_with(&mut self, concept: Concept) -> &mut Self {
        let name = concept.name().to_string();
        let merged = match self.concepts.remove(&name) {
            Some(mut existing) => {
                let mut updated = Concept::new(name.clone())
                    .with_kind(concept.kind())
                    .with_context(concept.context());
                match existing.unbind() {
                    Some(reference) => updated.bind(reference),
                    None => {
                        if let Some(reference) = concept.reference() {
                            updated.bind(reference.clone());
                        }
                    }
                }
                updated
            }
            None => concept,
        };
        self.concepts.insert(name, merged);
        self
    }

    /// Look up a concept.
    pub fn concept(&self, name: &str) -> Result<&Concept, PlanError> {
        self.concepts
            .get(name)
            .ok_or_else(|| PlanError::UnknownConcept {
                name: name.to_string(),
            })
    }

    /// The working configs of a concept: an explicit override, or the
    /// defaults of its kind.
    pub fn concept_config(&self, name: &str) -> Result<ConceptConfig, PlanError> {
        let concept = self.concept(name)?;
        Ok(self
            .concept_configs
            .get(name)
            .cloned()
            .unwrap_or_else(|| ConceptConfig::for_kind(concept.kind())))
    }

    /// Override the working configs of a registered concept.
    pub fn set_concept_config(
        &mut self,
        name: &str,
        config: ConceptConfig,
    ) -> Result<(), PlanError> {
        self.concept(name)?;
        self.concept_configs.insert(name.to_string(), config);
        Ok(())
    }

    /// Bind a reference to a registered concept.
    ///
    /// The container is run through cognition (with the concept's actuation
    /// config) before it is bound, unless cognition is switched off.
    pub fn make_reference(
        &mut self,
        name: &str,
        source: impl Into<ReferenceSource>,
    ) -> Result<(), PlanError> {
        let working = self.concept_config(name)?;
        let mut reference = source.into().load(name)?;
        if self.config.apply_cognition {
            reference = self
                .agent
                .cognition()
                .cognize(&reference, name, &working.actuation)?;
        }
        debug!(concept = name, shape = %reference.shape(), "reference bound");
        if let Some(concept) = self.concepts.get_mut(name) {
            concept.bind(reference);
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Steps
    // ------------------------------------------------------------------------

    /// Register a step. Unknown concept names are registered as placeholders.
    ///
    /// An empty `view` keeps every axis of the result.
    pub fn add_inference(
        &mut self,
        perception: &[&str],
        actuation: &str,
        inferred: &str,
        view: &[&str],
    ) -> Result<(), PlanError> {
        self.add_inference_step(
            InferenceStep::new(perception.iter().copied(), actuation, inferred)
                .with_view(view.iter().copied()),
        )
    }

    /// Register a fully built step.
    pub fn add_inference_step(&mut self, step: InferenceStep) -> Result<(), PlanError> {
        if self.step_index.contains_key(step.key()) {
            return Err(PlanError::DuplicateStep {
                key: step.key().to_string(),
            });
        }
        for name in step.dependencies() {
            self.add_concept(name);
        }
        self.add_concept(step.inferred());

        self.step_index.insert(step.key().clone(), self.steps.len());
        self.steps.push(step);
        self.order = None;
        Ok(())
    }

    /// Steps in insertion order.
    pub fn steps(&self) -> &[InferenceStep] {
        &self.steps
    }

    /// Declare the input concepts and the output concept.
    pub fn configure_io(&mut self, inputs: &[&str], output: &str) -> Result<(), PlanError> {
        for name in inputs.iter().chain([&output]) {
            self.concept(name)?;
        }
        self.inputs = inputs.iter().map(|s| s.to_string()).collect();
        self.output = Some(output.to_string());
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Ordering
    // ------------------------------------------------------------------------

    /// True while a computed order is cached.
    pub fn is_ordered(&self) -> bool {
        self.order.is_some()
    }

    /// Keys of the cached order, if any.
    pub fn order(&self) -> Option<Vec<&InferenceKey>> {
        self.order
            .as_ref()
            .map(|order| order.iter().map(|&i| self.steps[i].key()).collect())
    }

    /// Compute the execution order.
    ///
    /// Concepts that are declared inputs or already bound need no producer.
    /// Every other dependency must be produced by exactly one step. Ties are
    /// broken by insertion order.
    pub fn order_inference(&mut self) -> Result<Vec<InferenceKey>, PlanError> {
        let order = self.compute_order()?;
        let keys = order.iter().map(|&i| self.steps[i].key().clone()).collect();
        self.order = Some(order);
        Ok(keys)
    }

    fn compute_order(&self) -> Result<Vec<usize>, PlanError> {
        let initial: HashSet<&str> = self
            .inputs
            .iter()
            .map(String::as_str)
            .chain(
                self.concepts
                    .values()
                    .filter(|c| c.is_bound())
                    .map(Concept::name),
            )
            .collect();

        let mut producers: HashMap<&str, usize> = HashMap::new();
        for (i, step) in self.steps.iter().enumerate() {
            if let Some(&first) = producers.get(step.inferred()) {
                return Err(PlanError::MultipleProducers {
                    concept: step.inferred().to_string(),
                    first: self.steps[first].key().to_string(),
                    second: step.key().to_string(),
                });
            }
            producers.insert(step.inferred(), i);
        }

        let mut graph: DiGraph<usize, ()> = DiGraph::new();
        let nodes: Vec<NodeIndex> = (0..self.steps.len()).map(|i| graph.add_node(i)).collect();
        for (i, step) in self.steps.iter().enumerate() {
            for dep in step.dependencies() {
                if initial.contains(dep.as_str()) {
                    continue;
                }
                let producer =
                    producers
                        .get(dep.as_str())
                        .ok_or_else(|| PlanError::UnresolvableDependency {
                            step: step.key().to_string(),
                            concept: dep.clone(),
                        })?;
                graph.update_edge(nodes[*producer], nodes[i], ());
            }
        }

        // Kahn's algorithm
        let mut in_degree: Vec<usize> = nodes
            .iter()
            .map(|&n| graph.neighbors_directed(n, Direction::Incoming).count())
            .collect();
        let mut queue: VecDeque<usize> = (0..nodes.len()).filter(|&i| in_degree[i] == 0).collect();
        let mut order = Vec::with_capacity(nodes.len());

        while let Some(i) = queue.pop_front() {
            order.push(i);
            let mut successors: Vec<usize> = graph
                .neighbors_directed(nodes[i], Direction::Outgoing)
                .map(|n| graph[n])
                .collect();
            successors.sort_unstable();
            for j in successors {
                in_degree[j] -= 1;
                if in_degree[j] == 0 {
                    queue.push_back(j);
                }
            }
        }

        if order.len() < self.steps.len() {
            let stranded = (0..self.steps.len())
                .filter(|i| !order.contains(i))
                .map(|i| StrandedStep {
                    produces: self.steps[i].inferred().to_string(),
                    requires: self.steps[i].dependencies(),
                })
                .collect();
            return Err(PlanError::CyclicDependency { stranded });
        }
        Ok(order)
    }

    // ------------------------------------------------------------------------
    // Execution
    // ------------------------------------------------------------------------

    /// Run every step and return the output concept's container.
    ///
    /// Fails with [`PlanError::IoNotConfigured`] unless
    /// [`Plan::configure_io`] set an output and at least one input.
    /// With `input_data`, every declared input must be present and is bound
    /// through [`Plan::make_reference`]. Without it, every input must already
    /// be bound. Concepts keep their references afterwards, so a second call
    /// without inputs reruns the plan on the values already bound.
    ///
    /// Collaborators may share state, e.g. one
    /// [`LocationMemory`](crate::memory::LocationMemory). Running several
    /// plans that share such state from different threads at once is not
    /// supported.
    pub fn execute(
        &mut self,
        input_data: Option<HashMap<String, NamedContainer>>,
    ) -> Result<NamedContainer, PlanError> {
        let result = self.run(input_data);
        match &result {
            Ok(output) => self.hook.on_plan_end(output),
            Err(err) => self.hook.on_error(err),
        }
        result
    }

    fn run(
        &mut self,
        input_data: Option<HashMap<String, NamedContainer>>,
    ) -> Result<NamedContainer, PlanError> {
        let output = self.output.clone().ok_or(PlanError::IoNotConfigured)?;
        if self.inputs.is_empty() {
            return Err(PlanError::IoNotConfigured);
        }

        match input_data {
            Some(mut data) => {
                let missing: Vec<String> = self
                    .inputs
                    .iter()
                    .filter(|name| !data.contains_key(*name))
                    .cloned()
                    .collect();
                if !missing.is_empty() {
                    return Err(PlanError::MissingInput { names: missing });
                }
                for name in self.inputs.clone() {
                    if let Some(container) = data.remove(&name) {
                        self.make_reference(&name, container)?;
                    }
                }
            }
            None => {
                let missing: Vec<String> = self
                    .inputs
                    .iter()
                    .filter(|name| !self.concepts.get(*name).is_some_and(Concept::is_bound))
                    .cloned()
                    .collect();
                if !missing.is_empty() {
                    return Err(PlanError::MissingReference { names: missing });
                }
            }
        }

        if self.order.is_none() {
            self.order_inference()?;
        }
        let order = self.order.clone().unwrap_or_default();

        info!(steps = order.len(), output = %output, "executing plan");
        self.hook.on_plan_start(order.len());

        for (position, &i) in order.iter().enumerate() {
            let step = &self.steps[i];
            self.hook.on_step_start(step.key(), position);
            let result = self.run_step(step)?;
            let key = step.key().clone();
            if let Some(concept) = self.concepts.get_mut(key.inferred.as_str()) {
                concept.bind(result);
            }
            if let Some(bound) = self.concepts.get(key.inferred.as_str()).and_then(Concept::reference) {
                self.hook.on_step_end(&key, bound);
            }
        }

        self.concept(&output)?
            .reference()
            .cloned()
            .ok_or(PlanError::OutputNotProduced { concept: output })
    }

    fn bound(&self, name: &str) -> Result<&NamedContainer, PlanError> {
        self.concept(name)?
            .reference()
            .ok_or_else(|| PlanError::MissingReference {
                names: vec![name.to_string()],
            })
    }

    fn run_step(&self, step: &InferenceStep) -> Result<NamedContainer, PlanError> {
        let sources = step
            .perception()
            .iter()
            .map(|name| self.bound(name))
            .collect::<Result<Vec<_>, _>>()?;
        let combined = Concept::combined(step.perception(), cross_product(&sources)?);

        let perception_config = match (step.perception_config(), step.perception().first()) {
            (Some(config), _) => config.clone(),
            (None, Some(first)) => self.concept_config(first)?.perception,
            (None, None) => ConceptConfig::for_kind(combined.kind()).perception,
        };
        let actuation_config = match step.actuation_config() {
            Some(config) => config.clone(),
            None => self.concept_config(step.actuation())?.actuation,
        };

        let perceived = self
            .agent
            .perception()
            .perceive(&combined, &perception_config)?;
        let actions = self
            .agent
            .actuation()
            .actuate(self.concept(step.actuation())?, &actuation_config)?;
        debug!(
            step = %step.key(),
            perceived = %perceived.shape(),
            actions = %actions.shape(),
            "applying step"
        );

        let mut result = cross_action_with(
            &actions,
            &perceived,
            step.inferred(),
            self.config.cross_action_mode(),
        )?;
        if self.config.apply_cognition {
            let working = self.concept_config(step.inferred())?;
            result = self
                .agent
                .cognition()
                .cognize(&result, step.inferred(), &working.actuation)?;
        }
        if self.config.apply_view {
            result = result.shape_view(step.view())?;
        }
        Ok(result)
    }
}

impl std::fmt::Debug for Plan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Plan")
            .field("concepts", &self.concepts.len())
            .field("steps", &self.steps.len())
            .field("inputs", &self.inputs)
            .field("output", &self.output)
            .field("ordered", &self.order.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_inference_registers_concepts() {
        let mut plan = Plan::new(AgentFrame::pass_through());
        plan.add_inference(&["a", "b"], "f", "c", &[]).unwrap();
        for name in ["a", "b", "f", "c"] {
            assert!(plan.concept(name).is_ok());
        }
        assert!(!plan.is_ordered());
    }

    #[test]
    fn test_configure_io_rejects_unknown() {
        let mut plan = Plan::new(AgentFrame::pass_through());
        plan.add_concept("a");
        assert_eq!(
            plan.configure_io(&["a"], "zzz").unwrap_err(),
            PlanError::UnknownConcept { name: "zzz".into() }
        );
    }

    #[test]
    fn test_make_reference_unknown_concept() {
        let mut plan = Plan::new(AgentFrame::pass_through());
        let err = plan
            .make_reference("ghost", NamedContainer::scalar(1))
            .unwrap_err();
        assert_eq!(err, PlanError::UnknownConcept { name: "ghost".into() });
    }

    #[test]
    fn test_add_concept_with_keeps_binding() {
        let mut plan = Plan::new(AgentFrame::pass_through());
        plan.add_concept("n");
        plan.make_reference("n", ReferenceSource::Literal("[1, 2]".into()))
            .unwrap();
        plan.add_concept_with(Concept::new("n").with_context("numbers"));
        let n = plan.concept("n").unwrap();
        assert_eq!(n.context(), "numbers");
        assert_eq!(n.reference().map(|r| r.dims().to_vec()), Some(vec![2]));
    }

    #[test]
    fn test_order_is_invalidated_by_new_steps() {
        let mut plan = Plan::new(AgentFrame::pass_through());
        plan.add_inference(&["a"], "f", "b", &[]).unwrap();
        plan.configure_io(&["a", "f"], "b").unwrap();
        plan.order_inference().unwrap();
        assert!(plan.is_ordered());
        plan.add_inference(&["b"], "f", "c", &[]).unwrap();
        assert!(!plan.is_ordered());
    }
}
