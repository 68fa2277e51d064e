//! Compatibility rule checks
//!
//! Each check is a free function of the records it compares. [`RULES`]
//! lists them in evaluation order together with the slots they need; the
//! engine skips an entry when any of those slots is empty.

use crate::build::Build;
use crate::component::{Component, ComponentKind, CoolingType};
use crate::config::EngineConfig;
use crate::finding::{FindingKind, Findings};
use crate::MalformedComponentError;

type CheckResult = Result<(), MalformedComponentError>;

/// Signature shared by the dispatch table entries
pub type CheckFn = fn(&Build, &EngineConfig, &mut Findings) -> CheckResult;

const CPU_BOARD: &str = "CPU/Motherboard";
const RAM_BOARD: &str = "RAM/Motherboard";
const GPU_CASE: &str = "GPU/Case";
const GPU_PSU: &str = "GPU/PSU";
const COOLER_CPU: &str = "Cooler/CPU";
const COOLER_CASE: &str = "Cooler/Case";
const PSU_SYSTEM: &str = "PSU/System";
const SYSTEM: &str = "System";
const BOARD_CASE: &str = "Motherboard/Case";
const STORAGE_BOARD: &str = "Storage/Motherboard";

/// An entry of the dispatch table
pub struct Rule {
    /// Stable identifier, usable in `rules.disabled`
    pub id: &'static str,
    pub description: &'static str,
    /// Slots that must all be filled for the rule to run
    pub requires: &'static [ComponentKind],
    /// Finding kinds the rule can emit
    pub emits: &'static [FindingKind],
    check: CheckFn,
}

impl Rule {
    pub fn applies_to(&self, build: &Build) -> bool {
        self.requires.iter().all(|slot| build.get(*slot).is_some())
    }

    pub fn run(&self, build: &Build, config: &EngineConfig, out: &mut Findings) -> CheckResult {
        (self.check)(build, config, out)
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("requires", &self.requires)
            .finish()
    }
}

/// All rules in evaluation order
pub const RULES: &[Rule] = &[
    Rule {
        id: "cpu-motherboard",
        description: "Socket, chipset and TDP support between CPU and motherboard",
        requires: &[ComponentKind::Cpu, ComponentKind::Motherboard],
        emits: &[
            FindingKind::SocketMismatch,
            FindingKind::ChipsetWarning,
            FindingKind::TdpExceeded,
        ],
        check: run_cpu_motherboard,
    },
    Rule {
        id: "ram-motherboard",
        description: "Memory generation, speed and capacity against the motherboard",
        requires: &[ComponentKind::Ram, ComponentKind::Motherboard],
        emits: &[
            FindingKind::DdrMismatch,
            FindingKind::RamSpeedLimitation,
            FindingKind::RamCapacityExceeded,
        ],
        check: run_ram_motherboard,
    },
    Rule {
        id: "gpu-case",
        description: "GPU length against case clearance",
        requires: &[ComponentKind::Gpu, ComponentKind::Case],
        emits: &[FindingKind::GpuTooLong, FindingKind::GpuTightFit],
        check: run_gpu_case,
    },
    Rule {
        id: "gpu-psu",
        description: "PSU wattage and power connectors for the GPU",
        requires: &[ComponentKind::Gpu, ComponentKind::Psu],
        emits: &[FindingKind::PsuInsufficient, FindingKind::PcieConnectorWarning],
        check: run_gpu_psu,
    },
    Rule {
        id: "cooler-cpu",
        description: "Cooler socket mounting and TDP rating",
        requires: &[ComponentKind::Cooler, ComponentKind::Cpu],
        emits: &[
            FindingKind::CoolerSocketIncompatible,
            FindingKind::CoolerInsufficientTdp,
        ],
        check: run_cooler_cpu,
    },
    Rule {
        id: "cooler-case",
        description: "Air cooler height or liquid cooler radiator mounting",
        requires: &[ComponentKind::Cooler, ComponentKind::Case],
        emits: &[FindingKind::CoolerTooTall, FindingKind::VerifyRadiatorSupport],
        check: run_cooler_case,
    },
    Rule {
        id: "system-power",
        description: "Estimated total draw against PSU capacity and headroom",
        requires: &[ComponentKind::Cpu, ComponentKind::Gpu, ComponentKind::Psu],
        emits: &[
            FindingKind::PsuTotalInsufficient,
            FindingKind::PsuLowHeadroom,
            FindingKind::PowerEstimate,
        ],
        check: run_system_power,
    },
    Rule {
        id: "motherboard-case",
        description: "Motherboard form factor against case support",
        requires: &[ComponentKind::Motherboard, ComponentKind::Case],
        emits: &[FindingKind::FormFactorMismatch],
        check: run_motherboard_case,
    },
    Rule {
        id: "storage-motherboard",
        description: "M.2 slot availability for NVMe drives",
        requires: &[ComponentKind::Storage, ComponentKind::Motherboard],
        emits: &[FindingKind::NoM2Slots],
        check: run_storage_motherboard,
    },
];

/// Look up a rule by id
pub fn find_rule(id: &str) -> Option<&'static Rule> {
    RULES.iter().find(|r| r.id.eq_ignore_ascii_case(id))
}

/// Read a field an applicable rule cannot do without
fn need<T>(part: &Component, field: &'static str, value: Option<T>) -> Result<T, MalformedComponentError> {
    value.ok_or_else(|| MalformedComponentError::missing(part.kind, field))
}

/// CPU <-> Motherboard socket, chipset and TDP
pub fn cpu_motherboard(cpu: &Component, board: &Component, out: &mut Findings) -> CheckResult {
    let cpu_socket = need(cpu, "socket", cpu.compatibility.socket.as_deref())?;
    let board_socket = need(board, "socket", board.compatibility.socket.as_deref())?;
    if cpu_socket != board_socket {
        out.report(
            FindingKind::SocketMismatch,
            CPU_BOARD,
            format!(
                "CPU socket {} incompatible with motherboard socket {}",
                cpu_socket, board_socket
            ),
        );
    }

    let chipsets = need(cpu, "chipsets", cpu.compatibility.chipsets.as_deref())?;
    let chipset = need(board, "chipset", board.compatibility.chipset.as_deref())?;
    if !chipsets.iter().any(|c| c == chipset) {
        out.report(
            FindingKind::ChipsetWarning,
            CPU_BOARD,
            format!("CPU may have limited features with {} chipset", chipset),
        );
    }

    let tdp = need(cpu, "tdp", cpu.compatibility.tdp)?;
    let max_tdp = need(board, "max_tdp_support", board.compatibility.max_tdp_support)?;
    if tdp > max_tdp {
        out.report(
            FindingKind::TdpExceeded,
            CPU_BOARD,
            format!(
                "CPU TDP ({}W) exceeds motherboard maximum ({}W)",
                tdp, max_tdp
            ),
        );
    }

    Ok(())
}

/// RAM <-> Motherboard generation, speed and capacity
pub fn ram_motherboard(ram: &Component, board: &Component, out: &mut Findings) -> CheckResult {
    let ram_ddr = need(ram, "ddr_type", ram.compatibility.ddr_type.as_deref())?;
    let board_ddr = need(board, "ddr_type", board.compatibility.ddr_type.as_deref())?;
    if ram_ddr != board_ddr {
        out.report(
            FindingKind::DdrMismatch,
            RAM_BOARD,
            format!(
                "{} RAM incompatible with motherboard {} slots",
                ram_ddr, board_ddr
            ),
        );
    }

    let speed = need(ram, "speed", ram.compatibility.speed)?;
    let max_speed = need(board, "ddr_max_speed", board.compatibility.ddr_max_speed)?;
    if speed > max_speed {
        out.report(
            FindingKind::RamSpeedLimitation,
            RAM_BOARD,
            format!(
                "RAM speed {}MHz exceeds motherboard maximum {}MHz. Will run at lower speed.",
                speed, max_speed
            ),
        );
    }

    let capacity = need(ram, "capacity", ram.compatibility.capacity)?;
    let max_ram = need(board, "max_ram", board.compatibility.max_ram)?;
    if capacity > max_ram {
        out.report(
            FindingKind::RamCapacityExceeded,
            RAM_BOARD,
            format!(
                "Total RAM {}GB exceeds motherboard maximum {}GB",
                capacity, max_ram
            ),
        );
    }

    Ok(())
}

/// GPU <-> Case length clearance.
///
/// A GPU whose remaining clearance is at or below `margin_mm` is a tight fit.
pub fn gpu_case(gpu: &Component, case: &Component, margin_mm: u32, out: &mut Findings) -> CheckResult {
    let length = need(gpu, "length", gpu.compatibility.length)?;
    let clearance = need(case, "gpu_clearance", case.compatibility.gpu_clearance)?;

    if length > clearance {
        out.report(
            FindingKind::GpuTooLong,
            GPU_CASE,
            format!(
                "GPU length {}mm exceeds case clearance {}mm",
                length, clearance
            ),
        );
    } else if clearance - length <= margin_mm {
        out.report(
            FindingKind::GpuTightFit,
            GPU_CASE,
            format!(
                "GPU will be a tight fit ({}mm of {}mm clearance). Consider case with more clearance.",
                length, clearance
            ),
        );
    }

    Ok(())
}

/// GPU <-> PSU minimum wattage and high-power connector
pub fn gpu_psu(gpu: &Component, psu: &Component, connector: &str, out: &mut Findings) -> CheckResult {
    let required = need(gpu, "min_psu_wattage", gpu.compatibility.min_psu_wattage)?;
    let wattage = need(psu, "wattage", psu.compatibility.wattage)?;
    if wattage < required {
        out.report(
            FindingKind::PsuInsufficient,
            GPU_PSU,
            format!(
                "GPU requires {}W PSU minimum, but selected PSU is {}W",
                required, wattage
            ),
        );
    }

    let connectors = need(
        gpu,
        "pcie_power_connectors",
        gpu.compatibility.pcie_power_connectors.as_ref(),
    )?;
    if connectors.requires(connector) {
        let native = need(psu, "pcie_5_connector", psu.compatibility.pcie_5_connector)?;
        if !native {
            out.report(
                FindingKind::PcieConnectorWarning,
                GPU_PSU,
                format!("GPU uses {} connector. PSU may need an adapter.", connector),
            );
        }
    }

    Ok(())
}

/// Cooler <-> CPU socket mounting and cooling capacity
pub fn cooler_cpu(cooler: &Component, cpu: &Component, out: &mut Findings) -> CheckResult {
    let sockets = need(cooler, "sockets", cooler.compatibility.sockets.as_deref())?;
    let socket = need(cpu, "socket", cpu.compatibility.socket.as_deref())?;
    if !sockets.iter().any(|s| s == socket) {
        out.report(
            FindingKind::CoolerSocketIncompatible,
            COOLER_CPU,
            format!("Cooler does not support {} socket", socket),
        );
    }

    let tdp = need(cpu, "tdp", cpu.compatibility.tdp)?;
    let rating = need(cooler, "tdp_rating", cooler.compatibility.tdp_rating)?;
    if tdp > rating {
        out.report(
            FindingKind::CoolerInsufficientTdp,
            COOLER_CPU,
            format!(
                "CPU TDP {}W exceeds cooler rating {}W. May run hot.",
                tdp, rating
            ),
        );
    }

    Ok(())
}

/// Cooler <-> Case height clearance (air) or radiator reminder (liquid)
pub fn cooler_case(cooler: &Component, case: &Component, out: &mut Findings) -> CheckResult {
    let cooling = need(cooler, "cooling_type", cooler.compatibility.cooling_type.as_ref())?;

    match cooling {
        CoolingType::Air => {
            let height = need(cooler, "height", cooler.compatibility.height)?;
            let clearance = need(
                case,
                "cpu_cooler_clearance",
                case.compatibility.cpu_cooler_clearance,
            )?;
            if height > clearance {
                out.report(
                    FindingKind::CoolerTooTall,
                    COOLER_CASE,
                    format!(
                        "Cooler height {}mm exceeds case clearance {}mm",
                        height, clearance
                    ),
                );
            }
        }
        CoolingType::Liquid => {
            // Case radiator mounts are not in the catalog
            let radiator = need(cooler, "radiator_size", cooler.compatibility.radiator_size)?;
            out.report(
                FindingKind::VerifyRadiatorSupport,
                COOLER_CASE,
                format!("Verify case supports {}mm radiator mounting", radiator),
            );
        }
        CoolingType::Other(kind) => {
            log::debug!("no case check for cooling type '{}'", kind);
        }
    }

    Ok(())
}

/// Estimated system draw and recommended PSU size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerEstimate {
    pub total_w: u64,
    pub recommended_w: u64,
}

impl PowerEstimate {
    /// CPU TDP + GPU TDP + base allowance; recommendation is the total
    /// times the headroom factor, rounded up to the rounding step
    pub fn new(cpu_tdp: u32, gpu_tdp: u32, config: &EngineConfig) -> Self {
        // Three u32 terms cannot overflow a u64
        let total_w = u64::from(cpu_tdp) + u64::from(gpu_tdp) + u64::from(config.base_system_draw_w);
        let step = u64::from(config.psu_rounding_step_w.max(1));
        let scaled = total_w.saturating_mul(u64::from(config.psu_headroom_percent));
        Self {
            total_w,
            recommended_w: scaled.div_ceil(100 * step) * step,
        }
    }
}

/// Total system power against PSU capacity. Always emits POWER_ESTIMATE.
pub fn system_power(
    cpu: &Component,
    gpu: &Component,
    psu: &Component,
    config: &EngineConfig,
    out: &mut Findings,
) -> CheckResult {
    let cpu_tdp = need(cpu, "tdp", cpu.compatibility.tdp)?;
    let gpu_tdp = need(gpu, "tdp", gpu.compatibility.tdp)?;
    let wattage = u64::from(need(psu, "wattage", psu.compatibility.wattage)?);

    let estimate = PowerEstimate::new(cpu_tdp, gpu_tdp, config);

    if wattage < estimate.total_w {
        out.report(
            FindingKind::PsuTotalInsufficient,
            PSU_SYSTEM,
            format!(
                "Total system power ~{}W exceeds PSU capacity {}W",
                estimate.total_w, wattage
            ),
        );
    } else if wattage < estimate.recommended_w {
        out.report(
            FindingKind::PsuLowHeadroom,
            PSU_SYSTEM,
            format!(
                "PSU {}W may have insufficient headroom. Recommended: {}W+",
                wattage, estimate.recommended_w
            ),
        );
    }

    out.report(
        FindingKind::PowerEstimate,
        SYSTEM,
        format!(
            "Estimated total system power: {}W. Recommended PSU: {}W+",
            estimate.total_w, estimate.recommended_w
        ),
    );

    Ok(())
}

/// Motherboard <-> Case form factor
pub fn motherboard_case(board: &Component, case: &Component, out: &mut Findings) -> CheckResult {
    let form_factor = need(board, "form_factor", board.compatibility.form_factor.as_deref())?;
    let supported = need(
        case,
        "motherboard_support",
        case.compatibility.motherboard_support.as_deref(),
    )?;
    if !supported.iter().any(|f| f == form_factor) {
        out.report(
            FindingKind::FormFactorMismatch,
            BOARD_CASE,
            format!("Case does not support {} motherboards", form_factor),
        );
    }
    Ok(())
}

/// Storage <-> Motherboard M.2 slots for NVMe drives. SATA is not checked.
pub fn storage_motherboard(storage: &Component, board: &Component, out: &mut Findings) -> CheckResult {
    let storage_type = need(storage, "storage_type", storage.compatibility.storage_type.as_ref())?;
    if storage_type.is_nvme() {
        let slots = need(board, "m2_slots", board.compatibility.m2_slots)?;
        if slots == 0 {
            out.report(
                FindingKind::NoM2Slots,
                STORAGE_BOARD,
                "Motherboard has no M.2 slots for NVMe SSD",
            );
        }
    }
    Ok(())
}

fn run_cpu_motherboard(build: &Build, _: &EngineConfig, out: &mut Findings) -> CheckResult {
    match (build.get(ComponentKind::Cpu), build.get(ComponentKind::Motherboard)) {
        (Some(cpu), Some(board)) => cpu_motherboard(cpu, board, out),
        _ => Ok(()),
    }
}

fn run_ram_motherboard(build: &Build, _: &EngineConfig, out: &mut Findings) -> CheckResult {
    match (build.get(ComponentKind::Ram), build.get(ComponentKind::Motherboard)) {
        (Some(ram), Some(board)) => ram_motherboard(ram, board, out),
        _ => Ok(()),
    }
}

fn run_gpu_case(build: &Build, config: &EngineConfig, out: &mut Findings) -> CheckResult {
    match (build.get(ComponentKind::Gpu), build.get(ComponentKind::Case)) {
        (Some(gpu), Some(case)) => gpu_case(gpu, case, config.gpu_fit_margin_mm, out),
        _ => Ok(()),
    }
}

fn run_gpu_psu(build: &Build, config: &EngineConfig, out: &mut Findings) -> CheckResult {
    match (build.get(ComponentKind::Gpu), build.get(ComponentKind::Psu)) {
        (Some(gpu), Some(psu)) => gpu_psu(gpu, psu, &config.high_power_connector, out),
        _ => Ok(()),
    }
}

fn run_cooler_cpu(build: &Build, _: &EngineConfig, out: &mut Findings) -> CheckResult {
    match (build.get(ComponentKind::Cooler), build.get(ComponentKind::Cpu)) {
        (Some(cooler), Some(cpu)) => cooler_cpu(cooler, cpu, out),
        _ => Ok(()),
    }
}

fn run_cooler_case(build: &Build, _: &EngineConfig, out: &mut Findings) -> CheckResult {
    match (build.get(ComponentKind::Cooler), build.get(ComponentKind::Case)) {
        (Some(cooler), Some(case)) => cooler_case(cooler, case, out),
        _ => Ok(()),
    }
}

fn run_system_power(build: &Build, config: &EngineConfig, out: &mut Findings) -> CheckResult {
    match (
        build.get(ComponentKind::Cpu),
        build.get(ComponentKind::Gpu),
        build.get(ComponentKind::Psu),
    ) {
        (Some(cpu), Some(gpu), Some(psu)) => system_power(cpu, gpu, psu, config, out),
        _ => Ok(()),
    }
}

fn run_motherboard_case(build: &Build, _: &EngineConfig, out: &mut Findings) -> CheckResult {
    match (build.get(ComponentKind::Motherboard), build.get(ComponentKind::Case)) {
        (Some(board), Some(case)) => motherboard_case(board, case, out),
        _ => Ok(()),
    }
}

fn run_storage_motherboard(build: &Build, _: &EngineConfig, out: &mut Findings) -> CheckResult {
    match (build.get(ComponentKind::Storage), build.get(ComponentKind::Motherboard)) {
        (Some(storage), Some(board)) => storage_motherboard(storage, board, out),
        _ => Ok(()),
    }
}
