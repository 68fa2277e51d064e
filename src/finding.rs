//! Findings and the compatibility report

use crate::component::ComponentKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity level for findings
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Advisory note (power estimate, verification reminder)
    Info,
    /// Degraded but functional
    Warning,
    /// Build cannot work as chosen
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "info" | "suggestion" | "note" => Ok(Severity::Info),
            "warning" | "warn" => Ok(Severity::Warning),
            "critical" | "error" => Ok(Severity::Critical),
            _ => Err(format!("Unknown severity: {}", s)),
        }
    }
}

/// Rule identifier attached to every finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FindingKind {
    SocketMismatch,
    ChipsetWarning,
    TdpExceeded,
    DdrMismatch,
    RamSpeedLimitation,
    RamCapacityExceeded,
    GpuTooLong,
    GpuTightFit,
    PsuInsufficient,
    PcieConnectorWarning,
    CoolerSocketIncompatible,
    CoolerInsufficientTdp,
    CoolerTooTall,
    VerifyRadiatorSupport,
    PsuTotalInsufficient,
    PsuLowHeadroom,
    PowerEstimate,
    FormFactorMismatch,
    NoM2Slots,
}

impl FindingKind {
    /// Every identifier, in rule evaluation order
    pub const ALL: [FindingKind; 19] = [
        FindingKind::SocketMismatch,
        FindingKind::ChipsetWarning,
        FindingKind::TdpExceeded,
        FindingKind::DdrMismatch,
        FindingKind::RamSpeedLimitation,
        FindingKind::RamCapacityExceeded,
        FindingKind::GpuTooLong,
        FindingKind::GpuTightFit,
        FindingKind::PsuInsufficient,
        FindingKind::PcieConnectorWarning,
        FindingKind::CoolerSocketIncompatible,
        FindingKind::CoolerInsufficientTdp,
        FindingKind::CoolerTooTall,
        FindingKind::VerifyRadiatorSupport,
        FindingKind::PsuTotalInsufficient,
        FindingKind::PsuLowHeadroom,
        FindingKind::PowerEstimate,
        FindingKind::FormFactorMismatch,
        FindingKind::NoM2Slots,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FindingKind::SocketMismatch => "SOCKET_MISMATCH",
            FindingKind::ChipsetWarning => "CHIPSET_WARNING",
            FindingKind::TdpExceeded => "TDP_EXCEEDED",
            FindingKind::DdrMismatch => "DDR_MISMATCH",
            FindingKind::RamSpeedLimitation => "RAM_SPEED_LIMITATION",
            FindingKind::RamCapacityExceeded => "RAM_CAPACITY_EXCEEDED",
            FindingKind::GpuTooLong => "GPU_TOO_LONG",
            FindingKind::GpuTightFit => "GPU_TIGHT_FIT",
            FindingKind::PsuInsufficient => "PSU_INSUFFICIENT",
            FindingKind::PcieConnectorWarning => "PCIE_CONNECTOR_WARNING",
            FindingKind::CoolerSocketIncompatible => "COOLER_SOCKET_INCOMPATIBLE",
            FindingKind::CoolerInsufficientTdp => "COOLER_INSUFFICIENT_TDP",
            FindingKind::CoolerTooTall => "COOLER_TOO_TALL",
            FindingKind::VerifyRadiatorSupport => "VERIFY_RADIATOR_SUPPORT",
            FindingKind::PsuTotalInsufficient => "PSU_TOTAL_INSUFFICIENT",
            FindingKind::PsuLowHeadroom => "PSU_LOW_HEADROOM",
            FindingKind::PowerEstimate => "POWER_ESTIMATE",
            FindingKind::FormFactorMismatch => "FORM_FACTOR_MISMATCH",
            FindingKind::NoM2Slots => "NO_M2_SLOTS",
        }
    }

    /// Fixed severity of this identifier
    pub fn severity(&self) -> Severity {
        match self {
            FindingKind::SocketMismatch
            | FindingKind::TdpExceeded
            | FindingKind::DdrMismatch
            | FindingKind::RamCapacityExceeded
            | FindingKind::GpuTooLong
            | FindingKind::PsuInsufficient
            | FindingKind::CoolerSocketIncompatible
            | FindingKind::CoolerTooTall
            | FindingKind::PsuTotalInsufficient
            | FindingKind::FormFactorMismatch
            | FindingKind::NoM2Slots => Severity::Critical,

            FindingKind::ChipsetWarning
            | FindingKind::RamSpeedLimitation
            | FindingKind::GpuTightFit
            | FindingKind::PcieConnectorWarning
            | FindingKind::CoolerInsufficientTdp
            | FindingKind::PsuLowHeadroom => Severity::Warning,

            FindingKind::VerifyRadiatorSupport | FindingKind::PowerEstimate => Severity::Info,
        }
    }

    /// Slots whose records can produce this finding
    pub fn slots(&self) -> &'static [ComponentKind] {
        use ComponentKind::*;
        match self {
            FindingKind::SocketMismatch | FindingKind::ChipsetWarning | FindingKind::TdpExceeded => {
                &[Cpu, Motherboard]
            }
            FindingKind::DdrMismatch
            | FindingKind::RamSpeedLimitation
            | FindingKind::RamCapacityExceeded => &[Ram, Motherboard],
            FindingKind::GpuTooLong | FindingKind::GpuTightFit => &[Gpu, Case],
            FindingKind::PsuInsufficient | FindingKind::PcieConnectorWarning => &[Gpu, Psu],
            FindingKind::CoolerSocketIncompatible | FindingKind::CoolerInsufficientTdp => {
                &[Cooler, Cpu]
            }
            FindingKind::CoolerTooTall | FindingKind::VerifyRadiatorSupport => &[Cooler, Case],
            FindingKind::PsuTotalInsufficient
            | FindingKind::PsuLowHeadroom
            | FindingKind::PowerEstimate => &[Cpu, Gpu, Psu],
            FindingKind::FormFactorMismatch => &[Motherboard, Case],
            FindingKind::NoM2Slots => &[Storage, Motherboard],
        }
    }

    pub fn involves(&self, slot: ComponentKind) -> bool {
        self.slots().contains(&slot)
    }

    pub fn description(&self) -> &'static str {
        match self {
            FindingKind::SocketMismatch => "CPU socket differs from the motherboard socket",
            FindingKind::ChipsetWarning => "Motherboard chipset is not in the CPU's supported list",
            FindingKind::TdpExceeded => "CPU TDP exceeds what the motherboard supports",
            FindingKind::DdrMismatch => "RAM generation differs from the motherboard slots",
            FindingKind::RamSpeedLimitation => "RAM is rated faster than the motherboard runs it",
            FindingKind::RamCapacityExceeded => "RAM capacity exceeds the motherboard maximum",
            FindingKind::GpuTooLong => "GPU is longer than the case clearance",
            FindingKind::GpuTightFit => "GPU fits within the safety margin of the case clearance",
            FindingKind::PsuInsufficient => "PSU wattage is below the GPU minimum",
            FindingKind::PcieConnectorWarning => "GPU needs a high-power connector the PSU lacks natively",
            FindingKind::CoolerSocketIncompatible => "Cooler has no mounting for the CPU socket",
            FindingKind::CoolerInsufficientTdp => "CPU TDP exceeds the cooler rating",
            FindingKind::CoolerTooTall => "Air cooler is taller than the case clearance",
            FindingKind::VerifyRadiatorSupport => "Liquid cooler radiator mounting must be verified",
            FindingKind::PsuTotalInsufficient => "Estimated system draw exceeds PSU capacity",
            FindingKind::PsuLowHeadroom => "PSU is below the recommended wattage",
            FindingKind::PowerEstimate => "Estimated system draw and recommended PSU wattage",
            FindingKind::FormFactorMismatch => "Case does not accept the motherboard form factor",
            FindingKind::NoM2Slots => "NVMe drive chosen for a motherboard without M.2 slots",
        }
    }
}

impl fmt::Display for FindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for FindingKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase().replace('-', "_");
        FindingKind::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == wanted)
            .ok_or_else(|| format!("Unknown finding kind: {}", s))
    }
}

/// One reported compatibility issue or note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub kind: FindingKind,
    /// Label of the components involved, e.g. "CPU/Motherboard"
    pub component_pair: String,
    pub message: String,
    pub severity: Severity,
}

impl Finding {
    /// Create a finding with the identifier's fixed severity
    pub fn new(kind: FindingKind, component_pair: &str, message: impl Into<String>) -> Self {
        Self {
            kind,
            component_pair: component_pair.to_string(),
            message: message.into(),
            severity: kind.severity(),
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.component_pair, self.message)
    }
}

/// Per-evaluation accumulator.
///
/// Created fresh for each `validate_build` call and consumed into a
/// [`Report`]; never shared between evaluations.
#[derive(Debug, Default)]
pub struct Findings {
    errors: Vec<Finding>,
    warnings: Vec<Finding>,
    suggestions: Vec<Finding>,
}

impl Findings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a finding to the list matching its severity
    pub fn push(&mut self, finding: Finding) {
        log::trace!("{} {}", finding.severity, finding);
        match finding.severity {
            Severity::Critical => self.errors.push(finding),
            Severity::Warning => self.warnings.push(finding),
            Severity::Info => self.suggestions.push(finding),
        }
    }

    pub fn report(&mut self, kind: FindingKind, component_pair: &str, message: impl Into<String>) {
        self.push(Finding::new(kind, component_pair, message));
    }

    pub fn len(&self) -> usize {
        self.errors.len() + self.warnings.len() + self.suggestions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_report(self) -> Report {
        Report {
            compatible: self.errors.is_empty(),
            errors: self.errors,
            warnings: self.warnings,
            suggestions: self.suggestions,
        }
    }
}

/// Result of one build evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// True iff `errors` is empty
    pub compatible: bool,
    pub errors: Vec<Finding>,
    pub warnings: Vec<Finding>,
    pub suggestions: Vec<Finding>,
}

impl Default for Report {
    fn default() -> Self {
        Findings::new().into_report()
    }
}

impl Report {
    /// All findings: errors, then warnings, then suggestions
    pub fn findings(&self) -> impl Iterator<Item = &Finding> {
        self.errors
            .iter()
            .chain(self.warnings.iter())
            .chain(self.suggestions.iter())
    }

    pub fn has(&self, kind: FindingKind) -> bool {
        self.findings().any(|f| f.kind == kind)
    }

    /// Count findings as (errors, warnings, suggestions)
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        (self.errors.len(), self.warnings.len(), self.suggestions.len())
    }

    pub fn summary(&self) -> String {
        let (errors, warnings, suggestions) = self.count_by_severity();
        format!(
            "{}: {} errors, {} warnings, {} suggestions",
            if self.compatible { "compatible" } else { "incompatible" },
            errors,
            warnings,
            suggestions
        )
    }
}
