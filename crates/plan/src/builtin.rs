//! Built-in collaborators.
//!
//! These keep a plan runnable without any model behind it:
//!
//! - [`PassThrough`] hands containers back untouched.
//! - [`MemoryCognition`] splits bullets into a name and a value, stores the
//!   value in a [`LocationMemory`] and keeps the name in the container.
//! - [`MemoryPerception`] looks names up again, pairing each with its value.
//! - [`FnActuation`] builds function leaves from registered factories.

use std::collections::HashMap;
use std::sync::Arc;

use axial_core::{AxisError, Cell, Coords, NamedContainer};
use serde_json::Value;
use tracing::warn;

use crate::agent::{Actuation, Cognition, Perception};
use crate::concept::Concept;
use crate::config::{WorkingConfig, MODE_IDENTITY, MODE_MEMORY_RETRIEVAL};
use crate::error::PlanError;
use crate::memory::LocationMemory;

fn bound<'a>(concept: &'a Concept) -> Result<&'a NamedContainer, PlanError> {
    concept
        .reference()
        .ok_or_else(|| PlanError::collaborator(concept.name(), "concept has no reference"))
}

// ============================================================================
// Pass-through
// ============================================================================

/// Identity collaborator for all three roles.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl Cognition for PassThrough {
    fn cognize(
        &self,
        reference: &NamedContainer,
        _concept: &str,
        _config: &WorkingConfig,
    ) -> Result<NamedContainer, PlanError> {
        Ok(reference.clone())
    }
}

impl Actuation for PassThrough {
    fn actuate(
        &self,
        concept: &Concept,
        _config: &WorkingConfig,
    ) -> Result<NamedContainer, PlanError> {
        bound(concept).cloned()
    }
}

impl Perception for PassThrough {
    fn perceive(
        &self,
        concept: &Concept,
        _config: &WorkingConfig,
    ) -> Result<NamedContainer, PlanError> {
        bound(concept).cloned()
    }
}

// ============================================================================
// Memory cognition
// ============================================================================

/// How [`MemoryCognition`] reads a leaf.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BulletFormat {
    /// `"<value> : <name>"`, split at the last colon.
    #[default]
    Plain,
    /// `[{"Summary_Key": <name>, "Explanation": <value>}]`; only the first
    /// entry is read.
    Json,
}

/// Commits bullets to memory and keeps their names.
///
/// Every string leaf is parsed as a bullet. The value part is remembered
/// under `concept|name|location` and the leaf is replaced by the name.
/// Strings without a colon are kept as they are; a malformed JSON bullet
/// becomes null. Other leaves pass through, lists are walked.
#[derive(Debug, Clone)]
pub struct MemoryCognition {
    memory: Arc<LocationMemory>,
    format: BulletFormat,
}

impl MemoryCognition {
    pub fn new(memory: Arc<LocationMemory>) -> Self {
        Self {
            memory,
            format: BulletFormat::default(),
        }
    }

    pub fn with_format(mut self, format: BulletFormat) -> Self {
        self.format = format;
        self
    }

    fn cognize_cell(&self, concept: &str, cell: &Cell, coords: &Coords) -> Cell {
        match cell {
            Cell::List(items) => Cell::List(
                items
                    .iter()
                    .map(|item| self.cognize_cell(concept, item, coords))
                    .collect(),
            ),
            Cell::Value(Value::String(text)) => {
                let parsed = match self.format {
                    BulletFormat::Plain => split_bullet(text),
                    BulletFormat::Json => match split_json_bullet(text) {
                        Ok(pair) => Some(pair),
                        Err(reason) => {
                            warn!(concept, %coords, %reason, "malformed JSON bullet");
                            return Cell::null();
                        }
                    },
                };
                match parsed {
                    Some((name, value)) => {
                        self.memory
                            .remember(concept, &name, Value::String(value), coords);
                        Cell::from(name)
                    }
                    None => cell.clone(),
                }
            }
            other => other.clone(),
        }
    }
}

/// Split `"<value> : <name>"` at the last colon, trimming both parts.
pub fn split_bullet(text: &str) -> Option<(String, String)> {
    let (value, name) = text.rsplit_once(':')?;
    Some((name.trim().to_string(), value.trim().to_string()))
}

/// Read `(name, value)` from the first entry of a JSON bullet list.
///
/// Parentheses are stripped from the name.
pub fn split_json_bullet(text: &str) -> Result<(String, String), String> {
    let parsed: Value = serde_json::from_str(text).map_err(|e| e.to_string())?;
    let first = parsed
        .as_array()
        .and_then(|items| items.first())
        .ok_or("expected a non-empty list")?;
    let field = |key: &str| {
        first
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| format!("missing field {}", key))
    };
    let name: String = field("Summary_Key")?
        .chars()
        .filter(|c| *c != '(' && *c != ')')
        .collect();
    let value = field("Explanation")?;
    Ok((name.trim().to_string(), value.trim().to_string()))
}

impl Cognition for MemoryCognition {
    fn cognize(
        &self,
        reference: &NamedContainer,
        concept: &str,
        _config: &WorkingConfig,
    ) -> Result<NamedContainer, PlanError> {
        Ok(reference.map_indexed(|cell, coords| Ok(self.cognize_cell(concept, cell, coords)))?)
    }
}

// ============================================================================
// Memory perception
// ============================================================================

/// Pairs names with what memory holds for them.
///
/// In `memory_retrieval` mode a name leaf becomes `[name, value]` and a list
/// of names becomes `[names, values]`, values recollected at the leaf's
/// location (null when nothing is stored). In `identity` mode a leaf becomes
/// `[leaf, leaf]`.
#[derive(Debug, Clone)]
pub struct MemoryPerception {
    memory: Arc<LocationMemory>,
}

impl MemoryPerception {
    pub fn new(memory: Arc<LocationMemory>) -> Self {
        Self { memory }
    }

    fn recollect(&self, name: &Cell, coords: &Coords) -> Cell {
        match name {
            Cell::List(items) => Cell::List(
                items
                    .iter()
                    .map(|item| self.recollect(item, coords))
                    .collect(),
            ),
            Cell::Value(Value::String(s)) => {
                Cell::Value(self.memory.recollect(s, coords).unwrap_or(Value::Null))
            }
            Cell::Value(other) => Cell::Value(
                self.memory
                    .recollect(&other.to_string(), coords)
                    .unwrap_or(Value::Null),
            ),
            Cell::Function(_) => Cell::null(),
        }
    }
}

impl Perception for MemoryPerception {
    fn perceive(
        &self,
        concept: &Concept,
        config: &WorkingConfig,
    ) -> Result<NamedContainer, PlanError> {
        let reference = bound(concept)?;
        let perceived = match config.mode.as_str() {
            MODE_MEMORY_RETRIEVAL => reference.map_indexed(|leaf, coords| {
                let names = match leaf.to_list() {
                    Some(items) => Cell::List(items),
                    None => leaf.clone(),
                };
                let values = self.recollect(&names, coords);
                Ok(Cell::list([names, values]))
            })?,
            MODE_IDENTITY => reference.map(|leaf| Ok(Cell::list([leaf.clone(), leaf.clone()])))?,
            other => {
                return Err(PlanError::collaborator(
                    concept.name(),
                    format!("unknown perception mode '{}'", other),
                ))
            }
        };
        Ok(perceived)
    }
}

// ============================================================================
// Closure-backed actuation
// ============================================================================

/// Builds the function leaf for one leaf of an actuation concept.
pub type ActuationFactory = dyn Fn(&Cell, &Coords) -> Result<Cell, AxisError> + Send + Sync;

/// Actuation from registered factories.
///
/// A factory registered for the concept's name wins over one registered for
/// the actuation mode. Without either, a concept whose leaves already are
/// functions is handed back as is.
#[derive(Clone, Default)]
pub struct FnActuation {
    by_concept: HashMap<String, Arc<ActuationFactory>>,
    by_mode: HashMap<String, Arc<ActuationFactory>>,
}

impl FnActuation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory for one actuation concept.
    pub fn with<F>(mut self, concept: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&Cell, &Coords) -> Result<Cell, AxisError> + Send + Sync + 'static,
    {
        self.by_concept.insert(concept.into(), Arc::new(factory));
        self
    }

    /// Register a factory for every concept actuated in `mode`.
    pub fn with_mode<F>(mut self, mode: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&Cell, &Coords) -> Result<Cell, AxisError> + Send + Sync + 'static,
    {
        self.by_mode.insert(mode.into(), Arc::new(factory));
        self
    }
}

impl std::fmt::Debug for FnActuation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnActuation")
            .field("concepts", &self.by_concept.keys().collect::<Vec<_>>())
            .field("modes", &self.by_mode.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Actuation for FnActuation {
    fn actuate(
        &self,
        concept: &Concept,
        config: &WorkingConfig,
    ) -> Result<NamedContainer, PlanError> {
        let reference = bound(concept)?;
        let factory = self
            .by_concept
            .get(concept.name())
            .or_else(|| self.by_mode.get(&config.mode));
        match factory {
            Some(factory) => Ok(reference.map_indexed(|leaf, coords| factory(leaf, coords))?),
            None if reference.cells().iter().all(Cell::is_callable) => Ok(reference.clone()),
            None => Err(PlanError::collaborator(
                concept.name(),
                format!("no actuation for mode '{}'", config.mode),
            )),
        }
    }
}
