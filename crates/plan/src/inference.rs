//! Inference steps.
//!
//! A step reads its perception concepts and its actuation concept and writes
//! one inferred concept. It is identified by that triple.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::WorkingConfig;

/// Identity of a step: `(perception, actuation, inferred)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InferenceKey {
    pub perception: Vec<String>,
    pub actuation: String,
    pub inferred: String,
}

impl fmt::Display for InferenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[[{}], {}, {}]",
            self.perception.join(", "),
            self.actuation,
            self.inferred
        )
    }
}

/// One registered step of a plan.
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceStep {
    key: InferenceKey,
    view: Vec<String>,
    perception_config: Option<WorkingConfig>,
    actuation_config: Option<WorkingConfig>,
}

impl InferenceStep {
    pub fn new<S: Into<String>>(
        perception: impl IntoIterator<Item = S>,
        actuation: impl Into<String>,
        inferred: impl Into<String>,
    ) -> Self {
        Self {
            key: InferenceKey {
                perception: perception.into_iter().map(Into::into).collect(),
                actuation: actuation.into(),
                inferred: inferred.into(),
            },
            view: Vec::new(),
            perception_config: None,
            actuation_config: None,
        }
    }

    /// Keep only these axes of the result, in this order.
    pub fn with_view<S: Into<String>>(mut self, view: impl IntoIterator<Item = S>) -> Self {
        self.view = view.into_iter().map(Into::into).collect();
        self
    }

    /// Override the perception config for this step.
    pub fn with_perception_config(mut self, config: WorkingConfig) -> Self {
        self.perception_config = Some(config);
        self
    }

    /// Override the actuation config for this step.
    pub fn with_actuation_config(mut self, config: WorkingConfig) -> Self {
        self.actuation_config = Some(config);
        self
    }

    pub fn key(&self) -> &InferenceKey {
        &self.key
    }

    pub fn perception(&self) -> &[String] {
        &self.key.perception
    }

    pub fn actuation(&self) -> &str {
        &self.key.actuation
    }

    pub fn inferred(&self) -> &str {
        &self.key.inferred
    }

    pub fn view(&self) -> &[String] {
        &self.view
    }

    pub fn perception_config(&self) -> Option<&WorkingConfig> {
        self.perception_config.as_ref()
    }

    pub fn actuation_config(&self) -> Option<&WorkingConfig> {
        self.actuation_config.as_ref()
    }

    /// Concepts the step reads: perception concepts, then the actuation
    /// concept, each once.
    pub fn dependencies(&self) -> Vec<String> {
        let mut deps: Vec<String> = Vec::with_capacity(self.key.perception.len() + 1);
        for name in self.key.perception.iter().chain([&self.key.actuation]) {
            if !deps.contains(name) {
                deps.push(name.clone());
            }
        }
        deps
    }
}
