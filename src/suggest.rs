//! Alternative-part suggestions
//!
//! [`SuggestionProvider`] is the seam where a parts search backend plugs
//! in. The engine defaults to [`PlaceholderSuggestions`], which only
//! describes what to look for.

use crate::build::Build;
use crate::catalog::Catalog;
use crate::component::{Component, ComponentKind};
use crate::config::Config;
use crate::engine::CompatibilityEngine;
use crate::MalformedComponentError;
use serde::{Deserialize, Serialize};

/// Type tag carried by every suggestion
pub const ALTERNATIVE_SUGGESTION: &str = "ALTERNATIVE_SUGGESTION";

/// Pointer to replacements for an incompatible component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    /// Catalog ids of candidate replacements, if a lookup was performed
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub candidates: Vec<String>,
}

impl Suggestion {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            kind: ALTERNATIVE_SUGGESTION.to_string(),
            message: message.into(),
            candidates: Vec::new(),
        }
    }

    pub fn with_candidates(mut self, candidates: Vec<String>) -> Self {
        self.candidates = candidates;
        self
    }
}

/// Looks up replacements for the component in slot `kind`
pub trait SuggestionProvider: Send + Sync {
    fn suggest(&self, kind: ComponentKind, current: &Component, build: &Build) -> Suggestion;
}

/// Returns a descriptive suggestion without consulting any catalog
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderSuggestions;

impl SuggestionProvider for PlaceholderSuggestions {
    fn suggest(&self, kind: ComponentKind, _current: &Component, _build: &Build) -> Suggestion {
        Suggestion::new(format!("Consider compatible {} alternatives", kind))
    }
}

/// Filters catalog parts of the same kind through the engine's own rules.
///
/// A candidate is kept when swapping it into the build leaves no critical
/// finding that involves the slot. Candidates keep catalog order.
pub struct CatalogSuggestions {
    catalog: Catalog,
    engine: CompatibilityEngine,
}

impl CatalogSuggestions {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            engine: CompatibilityEngine::new(),
        }
    }

    /// Evaluate candidates with the thresholds and disabled rules of `config`
    pub fn with_config(catalog: Catalog, config: &Config) -> Self {
        Self {
            catalog,
            engine: CompatibilityEngine::from_config(config),
        }
    }

    /// Whether `candidate` fits slot `kind`. Only rules reading that slot
    /// run. A defect in another slot is returned since no candidate can fix it.
    fn fits(
        &self,
        kind: ComponentKind,
        candidate: &Component,
        build: &Build,
    ) -> Result<bool, MalformedComponentError> {
        let mut trial = build.clone();
        trial.put(kind, candidate.clone());
        match self.engine.validate_slot(&trial, kind) {
            Ok(report) => Ok(!report.errors.iter().any(|f| f.kind.involves(kind))),
            Err(err) if err.slot == kind => {
                log::warn!("skipping candidate {}: {}", candidate.id, err);
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }
}

impl SuggestionProvider for CatalogSuggestions {
    fn suggest(&self, kind: ComponentKind, current: &Component, build: &Build) -> Suggestion {
        let mut candidates = Vec::new();
        for part in self.catalog.of_kind(kind).filter(|c| c.id != current.id) {
            match self.fits(kind, part, build) {
                Ok(true) => candidates.push(part.id.clone()),
                Ok(false) => {}
                Err(err) => {
                    log::warn!("cannot evaluate {} alternatives: {}", kind, err);
                    return Suggestion::new(format!("Cannot evaluate {} alternatives: {}", kind, err));
                }
            }
        }

        log::debug!("{} compatible {} candidates", candidates.len(), kind);

        let message = if candidates.is_empty() {
            format!("No compatible {} alternatives in catalog", kind)
        } else {
            format!(
                "Consider compatible {} alternatives: {}",
                kind,
                candidates.join(", ")
            )
        };
        Suggestion::new(message).with_candidates(candidates)
    }
}
