//! Parts catalog
//!
//! A read-only collection of component records. The file format is an
//! object of sections (`cpus`, `motherboards`, `gpus`, `ram`, `psus`,
//! `cases`, `coolers`, `storage`), each a list of records, or a plain list
//! of records.

use crate::component::{Component, ComponentKind};
use crate::{CompatError, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

const BUILTIN: &str = include_str!("../data/components.json");

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    Sections(BTreeMap<String, Vec<Component>>),
    Flat(Vec<Component>),
}

/// Catalog section name for a kind, e.g. "cpus" or "storage"
fn section_kind(name: &str) -> Option<ComponentKind> {
    name.parse()
        .ok()
        .or_else(|| name.strip_suffix('s').and_then(|n| n.parse().ok()))
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    parts: Vec<Component>,
}

impl Catalog {
    /// Build a catalog from records, rejecting duplicate ids
    pub fn new(mut parts: Vec<Component>) -> Result<Self> {
        {
            let mut seen = HashSet::new();
            if let Some(dup) = parts.iter().find(|p| !seen.insert(p.id.as_str())) {
                return Err(CompatError::Catalog(format!("duplicate part id '{}'", dup.id)));
            }
        }
        parts.sort_by_key(|p| p.kind);
        Ok(Self { parts })
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(content)?;
        let parts = match file {
            CatalogFile::Flat(parts) => parts,
            CatalogFile::Sections(sections) => {
                let mut parts = Vec::new();
                for (name, records) in sections {
                    let kind = section_kind(&name).ok_or_else(|| {
                        CompatError::Catalog(format!("unknown section '{}'", name))
                    })?;
                    if let Some(bad) = records.iter().find(|r| r.kind != kind) {
                        return Err(CompatError::Catalog(format!(
                            "part '{}' has type '{}' but is listed under '{}'",
                            bad.id, bad.kind, name
                        )));
                    }
                    parts.extend(records);
                }
                parts
            }
        };
        Self::new(parts)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&content)?;
        log::debug!("loaded {} parts from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// The bundled parts index
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN)
    }

    pub fn get(&self, id: &str) -> Option<&Component> {
        self.parts.iter().find(|p| p.id == id)
    }

    pub fn of_kind(&self, kind: ComponentKind) -> impl Iterator<Item = &Component> {
        self.parts.iter().filter(move |p| p.kind == kind)
    }

    /// Case-insensitive match on id, name or brand
    pub fn search<'a>(&'a self, query: &str) -> impl Iterator<Item = &'a Component> + 'a {
        let query = query.to_lowercase();
        self.parts.iter().filter(move |p| {
            p.id.to_lowercase().contains(&query)
                || p.name.to_lowercase().contains(&query)
                || p.brand().is_some_and(|b| b.to_lowercase().contains(&query))
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Component> {
        self.parts.iter()
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.len(), 32);
        for kind in ComponentKind::ALL {
            assert_eq!(catalog.of_kind(kind).count(), 4, "{}", kind);
        }
    }

    #[test]
    fn test_builtin_fields_lifted() {
        let catalog = Catalog::builtin().unwrap();
        let board = catalog.get("msi-mag-b650-tomahawk").unwrap();
        assert_eq!(board.compatibility.socket.as_deref(), Some("AM5"));
        assert_eq!(board.compatibility.chipset.as_deref(), Some("B650"));
        assert_eq!(board.compatibility.m2_slots, Some(2));

        let gpu = catalog.get("rtx-4090-fe").unwrap();
        assert_eq!(gpu.compatibility.length, Some(304));
        assert_eq!(gpu.compatibility.tdp, Some(450));
        assert!(gpu
            .compatibility
            .pcie_power_connectors
            .as_ref()
            .is_some_and(|c| c.requires("16-pin")));
    }

    #[test]
    fn test_section_kind() {
        assert_eq!(section_kind("cpus"), Some(ComponentKind::Cpu));
        assert_eq!(section_kind("ram"), Some(ComponentKind::Ram));
        assert_eq!(section_kind("storage"), Some(ComponentKind::Storage));
        assert_eq!(section_kind("cases"), Some(ComponentKind::Case));
        assert_eq!(section_kind("fans"), None);
    }

    #[test]
    fn test_section_type_mismatch_rejected() {
        let result = Catalog::from_json(r#"{"gpus": [{"objectID": "p", "type": "psu"}]}"#);
        assert!(matches!(result, Err(CompatError::Catalog(msg)) if msg.contains("'p'")));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = Catalog::from_json(
            r#"[{"objectID": "x", "type": "cpu"}, {"objectID": "x", "type": "gpu"}]"#,
        );
        assert!(matches!(result, Err(CompatError::Catalog(_))));
    }

    #[test]
    fn test_flat_list_sorted_by_kind() {
        let catalog = Catalog::from_json(
            r#"[{"objectID": "s", "type": "storage"}, {"objectID": "c", "type": "cpu"}]"#,
        )
        .unwrap();
        let ids: Vec<_> = catalog.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "s"]);
    }

    #[test]
    fn test_search() {
        let catalog = Catalog::builtin().unwrap();
        let hits: Vec<_> = catalog.search("noctua").map(|p| p.id.as_str()).collect();
        assert_eq!(hits, vec!["noctua-nh-d15"]);
        assert!(catalog.search("RTX").count() >= 2);
    }
}
