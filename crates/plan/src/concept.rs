//! Concepts: named bindings from an identifier to a container.
//!
//! A concept is what an inference step reads and writes. It carries a name,
//! a free-text context, a kind marker, and at most one container. The
//! container is reassigned at each stage of a plan; it is never copied into
//! another concept.

use std::fmt;
use std::str::FromStr;

use axial_core::{Cell, NamedContainer};
use serde::{Deserialize, Serialize};

use crate::error::PlanError;

/// What sort of thing a concept names.
///
/// Each kind has a short textual marker; the kind picks the default
/// actuation mode of the concept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConceptKind {
    /// `?`
    Classification,
    /// `<>`
    Judgement,
    /// `[]`
    Relation,
    /// `{}`
    #[default]
    Object,
    /// `^`
    Sentence,
    /// `@`
    Assignment,
}

impl ConceptKind {
    /// All kinds, in marker-table order.
    pub const ALL: [ConceptKind; 6] = [
        ConceptKind::Classification,
        ConceptKind::Judgement,
        ConceptKind::Relation,
        ConceptKind::Object,
        ConceptKind::Sentence,
        ConceptKind::Assignment,
    ];

    /// The kind's marker.
    pub fn marker(self) -> &'static str {
        match self {
            ConceptKind::Classification => "?",
            ConceptKind::Judgement => "<>",
            ConceptKind::Relation => "[]",
            ConceptKind::Object => "{}",
            ConceptKind::Sentence => "^",
            ConceptKind::Assignment => "@",
        }
    }

    /// Human-readable description.
    pub fn description(self) -> &'static str {
        match self {
            ConceptKind::Classification => "classification",
            ConceptKind::Judgement => "judgement",
            ConceptKind::Relation => "relation",
            ConceptKind::Object => "object",
            ConceptKind::Sentence => "sentence",
            ConceptKind::Assignment => "assignment",
        }
    }
}

impl FromStr for ConceptKind {
    type Err = PlanError;

    fn from_str(marker: &str) -> Result<Self, Self::Err> {
        ConceptKind::ALL
            .into_iter()
            .find(|k| k.marker() == marker)
            .ok_or_else(|| PlanError::InvalidConceptKind {
                marker: marker.to_string(),
            })
    }
}

impl fmt::Display for ConceptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.marker())
    }
}

/// A named value in a plan.
#[derive(Debug, Clone, PartialEq)]
pub struct Concept {
    name: String,
    context: String,
    kind: ConceptKind,
    reference: Option<NamedContainer>,
}

impl Concept {
    /// A placeholder concept with no container.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            context: String::new(),
            kind: ConceptKind::default(),
            reference: None,
        }
    }

    /// Builder: set the free-text context.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    /// Builder: set the kind.
    pub fn with_kind(mut self, kind: ConceptKind) -> Self {
        self.kind = kind;
        self
    }

    /// Builder: bind a container.
    pub fn with_reference(mut self, reference: NamedContainer) -> Self {
        self.reference = Some(reference);
        self
    }

    /// A concept bound to a single-leaf container on an axis named after it.
    pub fn literal(name: impl Into<String>, value: impl Into<Cell>) -> Result<Self, PlanError> {
        let name = name.into();
        let cell: Cell = value.into();
        let reference = NamedContainer::from_values(name.clone(), [cell])?;
        Ok(Self::new(name).with_reference(reference))
    }

    /// A transient concept standing for several perception concepts at once.
    ///
    /// Its name lists the members, e.g. `[a, b]`; a single member keeps its
    /// own name.
    pub fn combined(members: &[String], reference: NamedContainer) -> Self {
        let name = match members {
            [only] => only.clone(),
            _ => format!("[{}]", members.join(", ")),
        };
        Self::new(name).with_reference(reference)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn kind(&self) -> ConceptKind {
        self.kind
    }

    /// The bound container, if any.
    pub fn reference(&self) -> Option<&NamedContainer> {
        self.reference.as_ref()
    }

    /// True once a container is bound.
    pub fn is_bound(&self) -> bool {
        self.reference.is_some()
    }

    /// Replace the bound container.
    pub fn bind(&mut self, reference: NamedContainer) {
        self.reference = Some(reference);
    }

    /// Drop the bound container.
    pub fn unbind(&mut self) -> Option<NamedContainer> {
        self.reference.take()
    }
}

impl fmt::Display for Concept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind, self.name)?;
        if let Some(r) = &self.reference {
            write!(f, " {}", r.shape())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_markers_round_trip() {
        for kind in ConceptKind::ALL {
            assert_eq!(kind.marker().parse::<ConceptKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_marker_rejected() {
        assert_eq!(
            "%".parse::<ConceptKind>().unwrap_err(),
            PlanError::InvalidConceptKind { marker: "%".into() }
        );
    }

    #[test]
    fn test_literal_concept() {
        let c = Concept::literal("colour", "red").unwrap();
        let r = c.reference().unwrap();
        assert_eq!(r.axes(), &["colour".to_string()]);
        assert_eq!(r.cells(), &[Cell::from("red")]);
    }

    #[test]
    fn test_combined_name() {
        let r = NamedContainer::scalar(0);
        assert_eq!(Concept::combined(&["a".into()], r.clone()).name(), "a");
        assert_eq!(
            Concept::combined(&["a".into(), "b".into()], r).name(),
            "[a, b]"
        );
    }

    #[test]
    fn test_display_includes_kind_and_shape() {
        let c = Concept::new("judged")
            .with_kind(ConceptKind::Judgement)
            .with_reference(NamedContainer::from_values("judged", [true]).unwrap());
        assert_eq!(c.to_string(), "<>judged [judged: 1]");
    }
}
