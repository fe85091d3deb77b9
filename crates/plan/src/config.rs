//! Plan and per-concept working configuration.
//!
//! `PlanConfig` switches the optional stages of step execution. Each concept
//! additionally owns a `ConceptConfig`: one working config for how it is
//! perceived and one for how it is actuated. Collaborators read the `mode`
//! and any extra options they understand.

use axial_core::CrossActionMode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::concept::ConceptKind;

/// Perception mode that looks values up in memory.
pub const MODE_MEMORY_RETRIEVAL: &str = "memory_retrieval";
/// Perception mode that pairs each name with itself.
pub const MODE_IDENTITY: &str = "identity";

/// Switches for the stages of step execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanConfig {
    /// Reject cross-action results of uneven length instead of padding them.
    pub strict_cross_action: bool,
    /// Run cognition on bound inputs and on every step result.
    pub apply_cognition: bool,
    /// Apply each step's view to its result.
    pub apply_view: bool,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            strict_cross_action: false,
            apply_cognition: true,
            apply_view: true,
        }
    }
}

impl PlanConfig {
    /// Set strict cross-action.
    pub fn with_strict_cross_action(mut self, strict: bool) -> Self {
        self.strict_cross_action = strict;
        self
    }

    /// Set whether cognition runs.
    pub fn with_cognition(mut self, apply: bool) -> Self {
        self.apply_cognition = apply;
        self
    }

    /// Set whether step views are applied.
    pub fn with_view(mut self, apply: bool) -> Self {
        self.apply_view = apply;
        self
    }

    /// The cross-action mode implied by `strict_cross_action`.
    pub fn cross_action_mode(&self) -> CrossActionMode {
        if self.strict_cross_action {
            CrossActionMode::Strict
        } else {
            CrossActionMode::Lenient
        }
    }
}

/// A mode name plus free-form options for one collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkingConfig {
    pub mode: String,
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

impl WorkingConfig {
    /// A config with the given mode and no options.
    pub fn new(mode: impl Into<String>) -> Self {
        Self {
            mode: mode.into(),
            options: Map::new(),
        }
    }

    /// Builder: add one option.
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Look up an option.
    pub fn option(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }
}

/// Perception and actuation configs of one concept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptConfig {
    pub perception: WorkingConfig,
    pub actuation: WorkingConfig,
}

impl ConceptConfig {
    /// Defaults for a concept of the given kind.
    ///
    /// Perception always retrieves from memory; actuation follows the kind.
    pub fn for_kind(kind: ConceptKind) -> Self {
        let actuation = match kind {
            ConceptKind::Classification => "classification",
            ConceptKind::Judgement => "judgement",
            _ => "comprehension",
        };
        Self {
            perception: WorkingConfig::new(MODE_MEMORY_RETRIEVAL),
            actuation: WorkingConfig::new(actuation),
        }
    }

    /// Builder: replace the perception config.
    pub fn with_perception(mut self, perception: WorkingConfig) -> Self {
        self.perception = perception;
        self
    }

    /// Builder: replace the actuation config.
    pub fn with_actuation(mut self, actuation: WorkingConfig) -> Self {
        self.actuation = actuation;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_follow_kind() {
        let c = ConceptConfig::for_kind(ConceptKind::Judgement);
        assert_eq!(c.perception.mode, MODE_MEMORY_RETRIEVAL);
        assert_eq!(c.actuation.mode, "judgement");
        assert_eq!(
            ConceptConfig::for_kind(ConceptKind::Relation).actuation.mode,
            "comprehension"
        );
    }

    #[test]
    fn test_working_config_flattens_options() {
        let w = WorkingConfig::new("classification").with_option("llm", "structured");
        let v = serde_json::to_value(&w).unwrap();
        assert_eq!(v, json!({"mode": "classification", "llm": "structured"}));
        let back: WorkingConfig = serde_json::from_value(v).unwrap();
        assert_eq!(back.option("llm"), Some(&json!("structured")));
    }

    #[test]
    fn test_plan_config_partial_json() {
        let c: PlanConfig = serde_json::from_value(json!({"strict_cross_action": true})).unwrap();
        assert!(c.strict_cross_action);
        assert!(c.apply_cognition);
        assert_eq!(c.cross_action_mode(), CrossActionMode::Strict);
    }
}
