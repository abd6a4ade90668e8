//! The shipped profile table.
//!
//! Patterns are matched against the category name, keywords against the
//! lower-cased name plus description.

use super::profile::{ComponentProfile, FilterHint, SpecificationDeclaration as Decl};
use super::CapabilityTag::*;
use crate::hardware::{CoolerType, FormFactor, StorageInterface};
use crate::value::ValueKind;

/// Efficiency certifications accepted for a power supply.
pub const EFFICIENCY_RATINGS: [&str; 6] = [
    "80+ White",
    "80+ Bronze",
    "80+ Silver",
    "80+ Gold",
    "80+ Platinum",
    "80+ Titanium",
];

/// All builtin profiles, in a stable order.
pub fn profiles() -> Vec<ComponentProfile> {
    vec![cpu(), gpu(), motherboard(), ram(), storage(), psu(), case(), cooler()]
}

fn cpu() -> ComponentProfile {
    ComponentProfile::new("cpu", "Processor")
        .tags(&[ConsumesPower, GeneratesHeat, RequiresSocket, ProvidesCompute])
        .declare(
            Decl::new("socket", ValueKind::Socket)
                .required()
                .compat_key()
                .aliases(&["connector_type", "cpu_socket"])
                .filter(FilterHint::Select),
        )
        .declare(
            Decl::new("tdp", ValueKind::PowerConsumption)
                .compat_key()
                .range(1.0, 500.0)
                .aliases(&["thermal_design_power", "power"])
                .filter(FilterHint::Range),
        )
        .declare(
            Decl::new("generation", ValueKind::Number)
                .compat_key()
                .range(1.0, 20000.0)
                .aliases(&["cpu_generation", "series"]),
        )
        .declare(
            Decl::new("memory_type", ValueKind::MemoryType)
                .aliases(&["supported_memory"]),
        )
        .declare(
            Decl::new("cores", ValueKind::Number)
                .range(1.0, 256.0)
                .aliases(&["core_count"])
                .filter(FilterHint::Range),
        )
        .declare(
            Decl::new("threads", ValueKind::Number)
                .range(1.0, 512.0)
                .aliases(&["thread_count"]),
        )
        .declare(
            Decl::new("base_clock", ValueKind::Frequency)
                .range(100.0, 10000.0)
                .aliases(&["frequency", "base_frequency"]),
        )
        .declare(
            Decl::new("boost_clock", ValueKind::Frequency)
                .range(100.0, 10000.0)
                .aliases(&["boost_frequency", "turbo_clock"]),
        )
        .declare(
            Decl::new("integrated_graphics", ValueKind::Boolean)
                .aliases(&["igpu"])
                .filter(FilterHint::Checkbox),
        )
        .patterns(&[r"(?i)\bcpus?\b", r"(?i)processor", r"(?i)\b(ryzen|core i[3579]|xeon|threadripper)\b"])
        .keywords(&["cpu", "processor", "ryzen", "intel core", "cores"])
        .excludes(&[r"(?i)cool", r"(?i)fan"])
        .priority(10)
}

fn gpu() -> ComponentProfile {
    ComponentProfile::new("gpu", "Graphics Card")
        .tags(&[ConsumesPower, GeneratesHeat, RequiresSlot, ProvidesGraphics])
        .declare(
            Decl::new("power_consumption", ValueKind::PowerConsumption)
                .compat_key()
                .range(1.0, 1000.0)
                .aliases(&["tgp", "board_power", "gpu_power"]),
        )
        .declare(
            Decl::new("recommended_psu_power", ValueKind::PowerConsumption)
                .compat_key()
                .range(100.0, 3000.0)
                .aliases(&["recommended_psu", "psu_recommendation"]),
        )
        .declare(
            Decl::new("length", ValueKind::Number)
                .compat_key()
                .unit("mm")
                .range(50.0, 500.0)
                .aliases(&["card_length", "gpu_length"])
                .filter(FilterHint::Range),
        )
        .declare(
            Decl::new("memory_size", ValueKind::MemorySize)
                .range(0.5, 128.0)
                .aliases(&["vram", "video_memory"])
                .filter(FilterHint::Select),
        )
        .declare(
            Decl::new("boost_clock", ValueKind::Frequency)
                .range(100.0, 5000.0)
                .aliases(&["gpu_clock"]),
        )
        .patterns(&[r"(?i)\bgpus?\b", r"(?i)graphics", r"(?i)video\s*cards?", r"(?i)\b(geforce|radeon|rtx)\b"])
        .keywords(&["gpu", "graphics", "video card", "geforce", "radeon"])
        .priority(10)
}

fn motherboard() -> ComponentProfile {
    ComponentProfile::new("motherboard", "Motherboard")
        .tags(&[ConsumesPower, ProvidesSocket, ProvidesSlots])
        .declare(
            Decl::new("socket", ValueKind::Socket)
                .required()
                .compat_key()
                .aliases(&["connector_type", "cpu_socket"])
                .filter(FilterHint::Select),
        )
        .declare(
            Decl::new("chipset", ValueKind::Chipset)
                .compat_key()
                .filter(FilterHint::Select),
        )
        .declare(
            Decl::new("form_factor", ValueKind::Enum)
                .compat_key()
                .domain(&FormFactor::NAMES)
                .aliases(&["size"])
                .filter(FilterHint::Select),
        )
        .declare(
            Decl::new("memory_type", ValueKind::MemoryType)
                .compat_key()
                .aliases(&["supported_memory", "ram_type"]),
        )
        .declare(
            Decl::new("memory_slots", ValueKind::Number)
                .compat_key()
                .range(1.0, 16.0)
                .aliases(&["ram_slots", "dimm_slots"]),
        )
        .declare(
            Decl::new("max_memory", ValueKind::MemorySize)
                .compat_key()
                .range(1.0, 4096.0)
                .aliases(&["max_memory_capacity", "max_ram"]),
        )
        .declare(
            Decl::new("pcie_x16_slots", ValueKind::Number)
                .compat_key()
                .range(0.0, 8.0)
                .aliases(&["pcie_slots", "x16_slots"]),
        )
        .declare(
            Decl::new("m2_slots", ValueKind::Number)
                .compat_key()
                .range(0.0, 10.0)
                .aliases(&["m.2_slots", "nvme_slots"]),
        )
        .patterns(&[r"(?i)mother\s*boards?", r"(?i)\bmainboards?\b", r"(?i)\bmobo\b"])
        .keywords(&["motherboard", "mainboard", "chipset", "atx"])
        .priority(10)
}

fn ram() -> ComponentProfile {
    ComponentProfile::new("ram", "Memory")
        .tags(&[ConsumesPower, RequiresSlot, ProvidesMemory])
        .declare(
            Decl::new("memory_type", ValueKind::MemoryType)
                .required()
                .compat_key()
                .aliases(&["type", "ram_type"])
                .filter(FilterHint::Select),
        )
        .declare(
            Decl::new("capacity", ValueKind::MemorySize)
                .compat_key()
                .range(1.0, 1024.0)
                .aliases(&["total_capacity", "size"])
                .filter(FilterHint::Select),
        )
        .declare(
            Decl::new("modules", ValueKind::Number)
                .compat_key()
                .range(1.0, 16.0)
                .aliases(&["module_count", "sticks"]),
        )
        .declare(
            Decl::new("frequency", ValueKind::Frequency)
                .compat_key()
                .range(800.0, 12000.0)
                .aliases(&["speed", "clock"])
                .filter(FilterHint::Range),
        )
        .declare(
            Decl::new("cas_latency", ValueKind::Number)
                .range(1.0, 80.0)
                .aliases(&["cl", "latency"]),
        )
        .patterns(&[r"(?i)\bram\b", r"(?i)memory", r"(?i)\bddr[345]\b", r"(?i)\bdimms?\b"])
        .keywords(&["ram", "memory", "ddr4", "ddr5", "dimm"])
        .excludes(&[r"(?i)storage", r"(?i)flash", r"(?i)card\s*reader"])
        .priority(5)
}

fn storage() -> ComponentProfile {
    ComponentProfile::new("storage", "Storage")
        .tags(&[ConsumesPower, ProvidesStorage])
        .declare(
            Decl::new("interface", ValueKind::Enum)
                .required()
                .compat_key()
                .domain(&StorageInterface::NAMES)
                .aliases(&["storage_type", "type"])
                .filter(FilterHint::Select),
        )
        .declare(
            Decl::new("capacity", ValueKind::MemorySize)
                .range(1.0, 102_400.0)
                .aliases(&["size"])
                .filter(FilterHint::Select),
        )
        .declare(Decl::new("form_factor", ValueKind::Text))
        .patterns(&[r"(?i)storage", r"(?i)\b(ssd|hdd|nvme)s?\b", r"(?i)hard\s*drives?", r"(?i)solid\s*state"])
        .keywords(&["storage", "ssd", "hdd", "nvme", "drive"])
        .priority(5)
}

fn psu() -> ComponentProfile {
    ComponentProfile::new("psu", "Power Supply")
        .tags(&[ProvidesPower])
        .declare(
            Decl::new("wattage", ValueKind::PowerConsumption)
                .required()
                .compat_key()
                .range(100.0, 3000.0)
                .aliases(&["power", "max_power", "rated_power"])
                .filter(FilterHint::Range),
        )
        .declare(
            Decl::new("efficiency", ValueKind::Enum)
                .domain(&EFFICIENCY_RATINGS)
                .aliases(&["certification", "efficiency_rating"])
                .filter(FilterHint::Select),
        )
        .declare(
            Decl::new("pcie_connectors", ValueKind::Number)
                .compat_key()
                .range(0.0, 12.0)
                .aliases(&["pcie_power_connectors"]),
        )
        .declare(
            Decl::new("modular", ValueKind::Boolean)
                .filter(FilterHint::Checkbox),
        )
        .patterns(&[r"(?i)power\s*suppl(y|ies)", r"(?i)\bpsus?\b"])
        .keywords(&["psu", "power supply", "watt", "80+"])
        .excludes(&[r"(?i)\bups\b"])
        .priority(10)
}

fn case() -> ComponentProfile {
    ComponentProfile::new("case", "Case")
        .tags(&[HousesComponents])
        .declare(
            Decl::new("form_factor", ValueKind::Enum)
                .compat_key()
                .domain(&FormFactor::NAMES)
                .aliases(&["motherboard_support", "max_motherboard"])
                .filter(FilterHint::Select),
        )
        .declare(
            Decl::new("max_gpu_length", ValueKind::Number)
                .compat_key()
                .unit("mm")
                .range(100.0, 600.0)
                .aliases(&["gpu_clearance", "max_video_card_length"]),
        )
        .declare(
            Decl::new("max_cooler_height", ValueKind::Number)
                .compat_key()
                .unit("mm")
                .range(20.0, 250.0)
                .aliases(&["cpu_cooler_clearance"]),
        )
        .declare(
            Decl::new("fans", ValueKind::Number)
                .range(0.0, 20.0)
                .aliases(&["included_fans"]),
        )
        .patterns(&[r"(?i)\bcases?\b", r"(?i)chassis", r"(?i)tower", r"(?i)enclosure"])
        .keywords(&["case", "chassis", "tower", "enclosure"])
        .excludes(&[r"(?i)fans?\b", r"(?i)cool"])
        .priority(0)
}

fn cooler() -> ComponentProfile {
    ComponentProfile::new("cooler", "CPU Cooler")
        .tags(&[ConsumesPower, ProvidesCooling])
        .declare(
            Decl::new("cooler_type", ValueKind::Enum)
                .required()
                .compat_key()
                .domain(&CoolerType::NAMES)
                .aliases(&["type"])
                .filter(FilterHint::Select),
        )
        .declare(
            Decl::new("max_tdp", ValueKind::PowerConsumption)
                .compat_key()
                .range(10.0, 500.0)
                .aliases(&["tdp_rating", "rated_tdp"]),
        )
        .declare(
            Decl::new("supported_sockets", ValueKind::Text)
                .compat_key()
                .aliases(&["sockets", "socket_support"]),
        )
        .declare(
            Decl::new("height", ValueKind::Number)
                .compat_key()
                .unit("mm")
                .range(20.0, 250.0)
                .aliases(&["cooler_height"]),
        )
        .patterns(&[r"(?i)cool(er|ers|ing)", r"(?i)\baio\b", r"(?i)heat\s*sinks?"])
        .keywords(&["cooler", "cooling", "aio", "liquid", "heatsink"])
        .priority(15)
}
