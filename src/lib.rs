//! pc-compat - PC build compatibility checker
//!
//! Checks a candidate PC build (CPU, motherboard, GPU, RAM, PSU, case,
//! cooler, storage) against pairwise and system-wide physical, electrical
//! and logical constraints and produces a structured verdict.
//!
//! # Architecture
//!
//! ```text
//! BuildSpec -> Catalog -> Build -> CompatibilityEngine -> RULES -> Report
//! ```
//!
//! Each evaluation owns its finding accumulator, so one engine can be
//! shared across threads and called for many builds.
//!
//! # Example
//!
//! ```
//! use pc_compat::{Build, Catalog, CompatibilityEngine};
//!
//! let catalog = Catalog::builtin().unwrap();
//! let mut build = Build::new();
//! build.set(catalog.get("amd-ryzen-7-7800x3d").unwrap().clone());
//! build.set(catalog.get("msi-mag-b650-tomahawk").unwrap().clone());
//!
//! let report = CompatibilityEngine::new().validate_build(&build).unwrap();
//! assert!(report.compatible);
//! ```

pub mod build;
pub mod catalog;
pub mod component;
pub mod config;
pub mod engine;
pub mod finding;
pub mod output;
pub mod rules;
pub mod suggest;

pub use build::{Build, BuildSpec, PartRef};
pub use catalog::Catalog;
pub use component::{Compatibility, Component, ComponentKind, CoolingType, PowerConnectors, StorageType};
pub use config::{Config, ConfigError, EngineConfig};
pub use engine::CompatibilityEngine;
pub use finding::{Finding, FindingKind, Findings, Report, Severity};
pub use output::{JsonFormatter, ReportFormatter, TextFormatter};
pub use rules::{PowerEstimate, Rule, RULES};
pub use suggest::{CatalogSuggestions, PlaceholderSuggestions, Suggestion, SuggestionProvider};

use std::fmt;
use thiserror::Error;

/// What is wrong with a malformed component record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Defect {
    /// A field an applicable rule reads is absent
    Missing,
    /// The slot holds a record tagged with another component type
    KindMismatch(ComponentKind),
}

impl fmt::Display for Defect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Defect::Missing => write!(f, "is missing"),
            Defect::KindMismatch(found) => write!(f, "is '{}'", found),
        }
    }
}

/// A component record cannot be evaluated by the rules that apply to it.
///
/// This is the only error [`CompatibilityEngine::validate_build`] returns;
/// incompatibilities are reported as findings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed {slot} component: field `{field}` {defect}")]
pub struct MalformedComponentError {
    /// Slot holding the offending record
    pub slot: ComponentKind,
    /// Name of the missing or mismatched field
    pub field: &'static str,
    pub defect: Defect,
}

impl MalformedComponentError {
    pub fn missing(slot: ComponentKind, field: &'static str) -> Self {
        Self {
            slot,
            field,
            defect: Defect::Missing,
        }
    }

    pub fn kind_mismatch(slot: ComponentKind, found: ComponentKind) -> Self {
        Self {
            slot,
            field: "type",
            defect: Defect::KindMismatch(found),
        }
    }
}

/// Errors raised while loading catalogs, build files and configuration
#[derive(Error, Debug)]
pub enum CompatError {
    #[error(transparent)]
    Malformed(#[from] MalformedComponentError),

    #[error("Unknown part: {0}")]
    UnknownPart(String),

    #[error("Invalid catalog: {0}")]
    Catalog(String),

    #[error("Unknown file format: {0}")]
    Format(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, CompatError>;

/// Validate a build with the default engine settings
pub fn validate_build(build: &Build) -> std::result::Result<Report, MalformedComponentError> {
    CompatibilityEngine::new().validate_build(build)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_message() {
        let err = MalformedComponentError::missing(ComponentKind::Cpu, "tdp");
        assert_eq!(err.to_string(), "malformed cpu component: field `tdp` is missing");
    }

    #[test]
    fn test_kind_mismatch_message() {
        let err = MalformedComponentError::kind_mismatch(ComponentKind::Gpu, ComponentKind::Psu);
        assert_eq!(err.field, "type");
        assert_eq!(err.to_string(), "malformed gpu component: field `type` is 'psu'");
    }

    #[test]
    fn test_validate_empty_build() {
        let report = validate_build(&Build::default()).unwrap();
        assert!(report.compatible);
        assert!(report.errors.is_empty());
        assert!(report.warnings.is_empty());
        assert!(report.suggestions.is_empty());
    }
}
