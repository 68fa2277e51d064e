//! Compatibility engine
//!
//! Runs every applicable rule over a build once, in table order, and
//! returns a fresh [`Report`]. The engine itself only carries settings.

use crate::build::Build;
use crate::component::{Component, ComponentKind};
use crate::config::{Config, EngineConfig};
use crate::finding::{Findings, Report};
use crate::rules::{Rule, RULES};
use crate::suggest::{PlaceholderSuggestions, Suggestion, SuggestionProvider};
use crate::MalformedComponentError;
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Clone)]
pub struct CompatibilityEngine {
    settings: EngineConfig,
    disabled: HashSet<&'static str>,
    provider: Arc<dyn SuggestionProvider>,
}

impl Default for CompatibilityEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CompatibilityEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompatibilityEngine")
            .field("settings", &self.settings)
            .field("disabled", &self.disabled)
            .finish_non_exhaustive()
    }
}

impl CompatibilityEngine {
    pub fn new() -> Self {
        Self::with_settings(EngineConfig::default())
    }

    pub fn with_settings(settings: EngineConfig) -> Self {
        Self {
            settings,
            disabled: HashSet::new(),
            provider: Arc::new(PlaceholderSuggestions),
        }
    }

    /// Thresholds and disabled rules from a loaded configuration.
    /// Unknown rule ids are ignored here; [`Config::validate`] reports them.
    pub fn from_config(config: &Config) -> Self {
        let mut engine = Self::with_settings(config.engine.clone());
        for id in &config.rules.disabled {
            engine = engine.disable(id);
        }
        engine
    }

    pub fn disable(mut self, rule_id: &str) -> Self {
        match crate::rules::find_rule(rule_id) {
            Some(rule) => {
                self.disabled.insert(rule.id);
            }
            None => log::warn!("cannot disable unknown rule '{}'", rule_id),
        }
        self
    }

    pub fn with_provider(mut self, provider: impl SuggestionProvider + 'static) -> Self {
        self.provider = Arc::new(provider);
        self
    }

    pub fn settings(&self) -> &EngineConfig {
        &self.settings
    }

    pub fn is_enabled(&self, rule: &Rule) -> bool {
        !self.disabled.contains(rule.id)
    }

    /// Evaluate a build.
    ///
    /// Incompatibilities are findings in the report. The only error is a
    /// record that an applicable rule cannot read, or one sitting in a slot
    /// of another kind.
    pub fn validate_build(&self, build: &Build) -> Result<Report, MalformedComponentError> {
        self.evaluate(build, |_| true)
    }

    /// Evaluate only the rules that read slot `kind`.
    ///
    /// Records in other slots are read only as far as those rules need them.
    pub fn validate_slot(&self, build: &Build, kind: ComponentKind) -> Result<Report, MalformedComponentError> {
        self.evaluate(build, |rule| rule.requires.contains(&kind))
    }

    fn evaluate(
        &self,
        build: &Build,
        select: impl Fn(&Rule) -> bool,
    ) -> Result<Report, MalformedComponentError> {
        for (slot, component) in build.slots() {
            if component.kind != slot {
                return Err(MalformedComponentError::kind_mismatch(slot, component.kind));
            }
        }

        let mut findings = Findings::new();
        for rule in RULES.iter().filter(|r| select(r)) {
            if !self.is_enabled(rule) {
                log::debug!("rule {} disabled", rule.id);
                continue;
            }
            if !rule.applies_to(build) {
                log::debug!("rule {} skipped: slot not filled", rule.id);
                continue;
            }
            log::debug!("rule {}", rule.id);
            rule.run(build, &self.settings, &mut findings)?;
        }

        let report = findings.into_report();
        log::info!("{}", report.summary());
        Ok(report)
    }

    /// Ask the configured provider for replacements of `current` in slot `kind`
    pub fn get_suggestions(&self, kind: ComponentKind, current: &Component, build: &Build) -> Suggestion {
        self.provider.suggest(kind, current, build)
    }
}
