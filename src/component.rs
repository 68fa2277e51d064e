//! Component records supplied by the parts catalog
//!
//! A record carries a `type` tag and a `compatibility` sub-structure with
//! the fields the rule checks read. Everything else (price, brand, use-case
//! tags) is kept in `details` and never consulted by the engine.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Component category, doubling as the build slot name
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Cpu,
    Motherboard,
    Gpu,
    Ram,
    Psu,
    Case,
    Cooler,
    Storage,
}

impl ComponentKind {
    /// All slots in canonical order
    pub const ALL: [ComponentKind; 8] = [
        ComponentKind::Cpu,
        ComponentKind::Motherboard,
        ComponentKind::Gpu,
        ComponentKind::Ram,
        ComponentKind::Psu,
        ComponentKind::Case,
        ComponentKind::Cooler,
        ComponentKind::Storage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::Cpu => "cpu",
            ComponentKind::Motherboard => "motherboard",
            ComponentKind::Gpu => "gpu",
            ComponentKind::Ram => "ram",
            ComponentKind::Psu => "psu",
            ComponentKind::Case => "case",
            ComponentKind::Cooler => "cooler",
            ComponentKind::Storage => "storage",
        }
    }

    /// Display label used in component-pair strings
    pub fn label(&self) -> &'static str {
        match self {
            ComponentKind::Cpu => "CPU",
            ComponentKind::Motherboard => "Motherboard",
            ComponentKind::Gpu => "GPU",
            ComponentKind::Ram => "RAM",
            ComponentKind::Psu => "PSU",
            ComponentKind::Case => "Case",
            ComponentKind::Cooler => "Cooler",
            ComponentKind::Storage => "Storage",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ComponentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cpu" | "processor" => Ok(ComponentKind::Cpu),
            "motherboard" | "mobo" | "mainboard" => Ok(ComponentKind::Motherboard),
            "gpu" | "graphics" => Ok(ComponentKind::Gpu),
            "ram" | "memory" => Ok(ComponentKind::Ram),
            "psu" | "power-supply" => Ok(ComponentKind::Psu),
            "case" | "chassis" => Ok(ComponentKind::Case),
            "cooler" | "cpu-cooler" => Ok(ComponentKind::Cooler),
            "storage" | "drive" => Ok(ComponentKind::Storage),
            _ => Err(format!("Unknown component type: {}", s)),
        }
    }
}

/// How a CPU cooler dissipates heat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CoolingType {
    /// Tower or low-profile heatsink; limited by case height clearance
    Air,
    /// All-in-one liquid loop; needs a radiator mount
    Liquid,
    Other(String),
}

impl From<String> for CoolingType {
    fn from(value: String) -> Self {
        let lower = value.trim().to_lowercase();
        if lower == "air" {
            CoolingType::Air
        } else if lower.contains("liquid") || lower == "aio" {
            CoolingType::Liquid
        } else {
            CoolingType::Other(value)
        }
    }
}

impl From<CoolingType> for String {
    fn from(value: CoolingType) -> Self {
        match value {
            CoolingType::Air => "Air".to_string(),
            CoolingType::Liquid => "AIO Liquid".to_string(),
            CoolingType::Other(s) => s,
        }
    }
}

/// Storage drive technology
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StorageType {
    /// M.2 NVMe drive; needs an M.2 slot
    Nvme,
    SataSsd,
    Hdd,
    Other(String),
}

impl StorageType {
    pub fn is_nvme(&self) -> bool {
        matches!(self, StorageType::Nvme)
    }
}

impl From<String> for StorageType {
    fn from(value: String) -> Self {
        let lower = value.to_lowercase();
        if lower.contains("nvme") {
            StorageType::Nvme
        } else if lower.contains("hdd") || lower.contains("hard") {
            StorageType::Hdd
        } else if lower.contains("sata") || lower.contains("ssd") {
            StorageType::SataSsd
        } else {
            StorageType::Other(value)
        }
    }
}

impl From<StorageType> for String {
    fn from(value: StorageType) -> Self {
        match value {
            StorageType::Nvme => "NVMe SSD".to_string(),
            StorageType::SataSsd => "SATA SSD".to_string(),
            StorageType::Hdd => "HDD".to_string(),
            StorageType::Other(s) => s,
        }
    }
}

/// GPU power connector requirements.
///
/// Catalogs give either one descriptive string (`"1x 16-pin (12VHPWR)"`)
/// or a list of connector names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "OneOrMany")]
pub struct PowerConnectors(pub Vec<String>);

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl From<OneOrMany> for PowerConnectors {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::One(s) => PowerConnectors(vec![s]),
            OneOrMany::Many(v) => PowerConnectors(v),
        }
    }
}

impl PowerConnectors {
    /// Case-insensitive substring match against every listed connector
    pub fn requires(&self, marker: &str) -> bool {
        let marker = marker.to_lowercase();
        self.0.iter().any(|c| c.to_lowercase().contains(&marker))
    }
}

/// Fields consulted by cross-component checks.
///
/// Every field is optional at parse time; a rule that needs an absent
/// field fails the evaluation instead of treating it as compatible.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Compatibility {
    /// CPU or motherboard socket
    #[serde(default, alias = "socket_type", alias = "cpu_socket", skip_serializing_if = "Option::is_none")]
    pub socket: Option<String>,

    /// Motherboard chipset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chipset: Option<String>,

    /// Chipsets a CPU fully supports
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chipsets: Option<Vec<String>>,

    /// Thermal design power in watts (CPU, GPU)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tdp: Option<u32>,

    /// Highest CPU TDP the motherboard VRMs support
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tdp_support: Option<u32>,

    /// Memory generation (RAM kit or motherboard slots)
    #[serde(default, alias = "ddr_generation", skip_serializing_if = "Option::is_none")]
    pub ddr_type: Option<String>,

    /// Highest memory speed the motherboard runs, MHz
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ddr_max_speed: Option<u32>,

    /// RAM rated speed, MHz
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<u32>,

    /// RAM kit total capacity, GB
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,

    /// Motherboard maximum memory, GB
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_ram: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub m2_slots: Option<u32>,

    /// GPU length, mm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,

    /// Longest GPU the case accepts, mm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpu_clearance: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_psu_wattage: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pcie_power_connectors: Option<PowerConnectors>,

    /// PSU ships a native 12VHPWR / 16-pin cable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pcie_5_connector: Option<bool>,

    /// PSU rated output, watts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wattage: Option<u32>,

    /// Sockets a cooler has mounting hardware for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sockets: Option<Vec<String>>,

    /// Heat a cooler can dissipate, watts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tdp_rating: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooling_type: Option<CoolingType>,

    /// Air cooler height, mm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,

    /// Tallest air cooler the case accepts, mm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_cooler_clearance: Option<u32>,

    /// Liquid cooler radiator size, mm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radiator_size: Option<u32>,

    /// Motherboard form factor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_factor: Option<String>,

    /// Motherboard form factors a case accepts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motherboard_support: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_type: Option<StorageType>,

    /// Keys no rule reads, preserved as given
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Top-level record keys that belong in `compatibility`
const LIFTED_FIELDS: &[&str] = &[
    "socket",
    "chipset",
    "tdp",
    "ddr_type",
    "speed",
    "capacity",
    "max_ram",
    "m2_slots",
    "length",
    "wattage",
    "height",
    "cooling_type",
    "radiator_size",
    "form_factor",
    "storage_type",
];

/// One purchasable part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawComponent")]
pub struct Component {
    #[serde(rename = "objectID")]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ComponentKind,
    pub compatibility: Compatibility,
    /// Descriptive fields (brand, price, use cases, ...)
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

#[derive(Deserialize)]
struct RawComponent {
    #[serde(rename = "objectID", alias = "id")]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(rename = "type")]
    kind: ComponentKind,
    #[serde(default)]
    compatibility: Compatibility,
    #[serde(flatten)]
    details: Map<String, Value>,
}

impl TryFrom<RawComponent> for Component {
    type Error = serde_json::Error;

    fn try_from(raw: RawComponent) -> Result<Self, Self::Error> {
        let RawComponent {
            id,
            name,
            kind,
            compatibility,
            mut details,
        } = raw;

        let mut fields = match serde_json::to_value(&compatibility)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        let mut lifted = false;
        for key in LIFTED_FIELDS {
            if fields.contains_key(*key) {
                continue;
            }
            if let Some(value) = details.remove(*key) {
                fields.insert((*key).to_string(), value);
                lifted = true;
            }
        }

        let compatibility = if lifted {
            serde_json::from_value(Value::Object(fields))?
        } else {
            compatibility
        };

        let name = if name.is_empty() { id.clone() } else { name };

        Ok(Component {
            id,
            name,
            kind,
            compatibility,
            details,
        })
    }
}

impl Component {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: ComponentKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            compatibility: Compatibility::default(),
            details: Map::new(),
        }
    }

    pub fn with_compatibility(mut self, compatibility: Compatibility) -> Self {
        self.compatibility = compatibility;
        self
    }

    pub fn brand(&self) -> Option<&str> {
        self.details.get("brand").and_then(Value::as_str)
    }

    pub fn price(&self) -> Option<f64> {
        self.details.get("price").and_then(Value::as_f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_str() {
        assert_eq!("cpu".parse::<ComponentKind>(), Ok(ComponentKind::Cpu));
        assert_eq!("Mobo".parse::<ComponentKind>(), Ok(ComponentKind::Motherboard));
        assert_eq!("chassis".parse::<ComponentKind>(), Ok(ComponentKind::Case));
        assert!("keyboard".parse::<ComponentKind>().is_err());
    }

    #[test]
    fn test_kind_serde_lowercase() {
        assert_eq!(serde_json::to_string(&ComponentKind::Psu).unwrap(), "\"psu\"");
        let kind: ComponentKind = serde_json::from_str("\"storage\"").unwrap();
        assert_eq!(kind, ComponentKind::Storage);
    }

    #[test]
    fn test_cooling_type_parsing() {
        assert_eq!(CoolingType::from("Air".to_string()), CoolingType::Air);
        assert_eq!(CoolingType::from("AIO Liquid".to_string()), CoolingType::Liquid);
        assert_eq!(
            CoolingType::from("Passive".to_string()),
            CoolingType::Other("Passive".to_string())
        );
    }

    #[test]
    fn test_storage_type_parsing() {
        assert!(StorageType::from("NVMe SSD".to_string()).is_nvme());
        assert_eq!(StorageType::from("2.5\" SATA SSD".to_string()), StorageType::SataSsd);
        assert_eq!(StorageType::from("HDD".to_string()), StorageType::Hdd);
    }

    #[test]
    fn test_power_connectors_string_or_list() {
        let one: PowerConnectors = serde_json::from_str("\"1x 16-pin (12VHPWR)\"").unwrap();
        assert!(one.requires("16-pin"));

        let many: PowerConnectors = serde_json::from_str("[\"8-pin\", \"8-pin\"]").unwrap();
        assert_eq!(many.0.len(), 2);
        assert!(!many.requires("16-pin"));
    }

    #[test]
    fn test_top_level_fields_lifted() {
        let json = r#"{
            "objectID": "amd-ryzen-5-7600",
            "name": "AMD Ryzen 5 7600",
            "brand": "AMD",
            "type": "cpu",
            "socket": "AM5",
            "tdp": 65,
            "price": 229,
            "compatibility": { "chipsets": ["B650"], "ddr_support": ["DDR5"] }
        }"#;

        let cpu: Component = serde_json::from_str(json).unwrap();
        assert_eq!(cpu.kind, ComponentKind::Cpu);
        assert_eq!(cpu.compatibility.socket.as_deref(), Some("AM5"));
        assert_eq!(cpu.compatibility.tdp, Some(65));
        assert_eq!(cpu.brand(), Some("AMD"));
        assert_eq!(cpu.price(), Some(229.0));
        assert!(!cpu.details.contains_key("socket"));
        assert!(cpu.compatibility.extra.contains_key("ddr_support"));
    }

    #[test]
    fn test_compatibility_field_wins_over_top_level() {
        let json = r#"{
            "objectID": "kit",
            "name": "Kit",
            "type": "ram",
            "ddr_type": "DDR4",
            "compatibility": { "ddr_generation": "DDR5" }
        }"#;

        let ram: Component = serde_json::from_str(json).unwrap();
        assert_eq!(ram.compatibility.ddr_type.as_deref(), Some("DDR5"));
        assert_eq!(ram.details.get("ddr_type"), Some(&Value::from("DDR4")));
    }

    #[test]
    fn test_missing_name_defaults_to_id() {
        let part: Component =
            serde_json::from_str(r#"{"objectID": "x1", "type": "case"}"#).unwrap();
        assert_eq!(part.name, "x1");
        assert_eq!(part.compatibility, Compatibility::default());
    }

    #[test]
    fn test_unknown_type_rejected() {
        let result: Result<Component, _> =
            serde_json::from_str(r#"{"objectID": "k", "type": "keyboard"}"#);
        assert!(result.is_err());
    }
}
