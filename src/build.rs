//! Builds and build files
//!
//! A [`Build`] holds at most one component per slot. A [`BuildSpec`] is the
//! on-disk form, naming catalog parts by id or embedding records inline.

use crate::catalog::Catalog;
use crate::component::{Component, ComponentKind};
use crate::{CompatError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// A candidate PC build. Empty slots are not yet chosen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Build {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<Component>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub motherboard: Option<Component>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpu: Option<Component>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ram: Option<Component>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub psu: Option<Component>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case: Option<Component>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cooler: Option<Component>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<Component>,
}

impl Build {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, kind: ComponentKind) -> &Option<Component> {
        match kind {
            ComponentKind::Cpu => &self.cpu,
            ComponentKind::Motherboard => &self.motherboard,
            ComponentKind::Gpu => &self.gpu,
            ComponentKind::Ram => &self.ram,
            ComponentKind::Psu => &self.psu,
            ComponentKind::Case => &self.case,
            ComponentKind::Cooler => &self.cooler,
            ComponentKind::Storage => &self.storage,
        }
    }

    fn slot_mut(&mut self, kind: ComponentKind) -> &mut Option<Component> {
        match kind {
            ComponentKind::Cpu => &mut self.cpu,
            ComponentKind::Motherboard => &mut self.motherboard,
            ComponentKind::Gpu => &mut self.gpu,
            ComponentKind::Ram => &mut self.ram,
            ComponentKind::Psu => &mut self.psu,
            ComponentKind::Case => &mut self.case,
            ComponentKind::Cooler => &mut self.cooler,
            ComponentKind::Storage => &mut self.storage,
        }
    }

    pub fn get(&self, kind: ComponentKind) -> Option<&Component> {
        self.slot(kind).as_ref()
    }

    /// Place a component in `slot` regardless of its own type tag,
    /// returning whatever was there before
    pub fn put(&mut self, slot: ComponentKind, component: Component) -> Option<Component> {
        self.slot_mut(slot).replace(component)
    }

    /// Place a component in the slot named by its type tag
    pub fn set(&mut self, component: Component) -> Option<Component> {
        self.put(component.kind, component)
    }

    pub fn with(mut self, component: Component) -> Self {
        self.set(component);
        self
    }

    pub fn remove(&mut self, kind: ComponentKind) -> Option<Component> {
        self.slot_mut(kind).take()
    }

    /// Filled slots in canonical order
    pub fn slots(&self) -> impl Iterator<Item = (ComponentKind, &Component)> {
        ComponentKind::ALL
            .into_iter()
            .filter_map(move |kind| self.get(kind).map(|c| (kind, c)))
    }

    pub fn is_empty(&self) -> bool {
        self.slots().next().is_none()
    }
}

/// A slot entry in a build file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PartRef {
    /// Catalog object id
    Id(String),
    /// Full component record
    Inline(Box<Component>),
}

/// Build file contents: slot name to part reference
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildSpec {
    pub parts: BTreeMap<ComponentKind, PartRef>,
}

impl BuildSpec {
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load a build file, choosing the parser by extension
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let spec = match ext {
            "json" => Self::from_json(&content)?,
            "yaml" | "yml" => Self::from_yaml(&content)?,
            _ => return Err(CompatError::Format(path.display().to_string())),
        };
        log::debug!("loaded build with {} parts from {}", spec.parts.len(), path.display());
        Ok(spec)
    }

    /// Look up catalog ids and fill each named slot
    pub fn resolve(&self, catalog: &Catalog) -> Result<Build> {
        let mut build = Build::new();
        for (slot, part) in &self.parts {
            let component = match part {
                PartRef::Id(id) => catalog
                    .get(id)
                    .cloned()
                    .ok_or_else(|| CompatError::UnknownPart(id.clone()))?,
                PartRef::Inline(component) => component.as_ref().clone(),
            };
            build.put(*slot, component);
        }
        Ok(build)
    }
}
