//! # Hardware Reference Tables
//!
//! Canonical enumerations for the attribute kinds that carry domain meaning
//! (socket, chipset, memory type, form factor, ...) together with the static
//! reference tables the normalizer and the rule engine consult.
//!
//! ## Table Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Reference Tables                                 │
//! │                                                                         │
//! │  Socket ──────────► supported MemoryType set                           │
//! │                                                                         │
//! │  Chipset ─────────► supported Socket set                               │
//! │     │                                                                   │
//! │     └─► ChipsetFamily ──► compatible CPU generations (+ strictness)    │
//! │                      └──► memory speed ceiling per MemoryType          │
//! │                                                                         │
//! │  FormFactor ──────► size rank (a case fits boards of its rank or less) │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Parsing goes through an alias key: the input is upper-cased and stripped
//! of everything that is not alphanumeric, so `"LGA 1700"`, `"lga-1700"` and
//! `"Socket 1700"` all resolve to [`Socket::Lga1700`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reduces free-form input to its alias key.
pub(crate) fn alias_key(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

// =============================================================================
// Memory Type
// =============================================================================

/// System memory generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MemoryType {
    #[serde(rename = "DDR3")]
    Ddr3,
    #[serde(rename = "DDR4")]
    Ddr4,
    #[serde(rename = "DDR5")]
    Ddr5,
}

impl MemoryType {
    pub const ALL: [MemoryType; 3] = [MemoryType::Ddr3, MemoryType::Ddr4, MemoryType::Ddr5];

    pub fn as_str(&self) -> &'static str {
        match self {
            MemoryType::Ddr3 => "DDR3",
            MemoryType::Ddr4 => "DDR4",
            MemoryType::Ddr5 => "DDR5",
        }
    }

    /// Resolves `DDR4`, `ddr4 sdram`, `DDR4-3200` and similar spellings.
    pub fn parse(raw: &str) -> Option<Self> {
        let key = alias_key(raw);
        Self::ALL.into_iter().find(|ty| {
            key.strip_prefix(ty.as_str()).is_some_and(|rest| {
                rest.is_empty() || rest == "SDRAM" || rest.chars().all(|c| c.is_ascii_digit())
            })
        })
    }

    /// Canonical spellings, used as suggestions when parsing fails.
    pub fn canonical_names() -> Vec<String> {
        Self::ALL.iter().map(|t| t.as_str().to_string()).collect()
    }

    /// Estimated draw of one module, in watts.
    pub fn module_watts(&self) -> f64 {
        match self {
            MemoryType::Ddr3 | MemoryType::Ddr4 => 3.0,
            MemoryType::Ddr5 => 5.0,
        }
    }
}

impl fmt::Display for MemoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Socket
// =============================================================================

/// CPU socket standard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Socket {
    #[serde(rename = "LGA1851")]
    Lga1851,
    #[serde(rename = "LGA1700")]
    Lga1700,
    #[serde(rename = "LGA1200")]
    Lga1200,
    #[serde(rename = "LGA1151")]
    Lga1151,
    #[serde(rename = "LGA2066")]
    Lga2066,
    #[serde(rename = "AM5")]
    Am5,
    #[serde(rename = "AM4")]
    Am4,
    #[serde(rename = "sTR5")]
    Str5,
    #[serde(rename = "sTRX4")]
    Strx4,
}

impl Socket {
    pub const ALL: [Socket; 9] = [
        Socket::Lga1851,
        Socket::Lga1700,
        Socket::Lga1200,
        Socket::Lga1151,
        Socket::Lga2066,
        Socket::Am5,
        Socket::Am4,
        Socket::Str5,
        Socket::Strx4,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Socket::Lga1851 => "LGA1851",
            Socket::Lga1700 => "LGA1700",
            Socket::Lga1200 => "LGA1200",
            Socket::Lga1151 => "LGA1151",
            Socket::Lga2066 => "LGA2066",
            Socket::Am5 => "AM5",
            Socket::Am4 => "AM4",
            Socket::Str5 => "sTR5",
            Socket::Strx4 => "sTRX4",
        }
    }

    /// Alias keys accepted for this socket (after the `SOCKET` prefix is dropped).
    fn aliases(&self) -> &'static [&'static str] {
        match self {
            Socket::Lga1851 => &["LGA1851", "1851"],
            Socket::Lga1700 => &["LGA1700", "1700"],
            Socket::Lga1200 => &["LGA1200", "1200"],
            Socket::Lga1151 => &["LGA1151", "1151", "H4"],
            Socket::Lga2066 => &["LGA2066", "2066", "R4"],
            Socket::Am5 => &["AM5"],
            Socket::Am4 => &["AM4"],
            Socket::Str5 => &["STR5", "TR5"],
            Socket::Strx4 => &["STRX4", "TRX4"],
        }
    }

    /// Resolves a socket through the alias table.
    pub fn parse(raw: &str) -> Option<Self> {
        let key = alias_key(raw);
        let key = key.strip_prefix("SOCKET").unwrap_or(&key);
        Self::ALL
            .into_iter()
            .find(|socket| socket.aliases().contains(&key))
    }

    pub fn canonical_names() -> Vec<String> {
        Self::ALL.iter().map(|s| s.as_str().to_string()).collect()
    }

    /// Memory generations the socket's memory controller supports.
    pub fn supported_memory_types(&self) -> &'static [MemoryType] {
        match self {
            Socket::Lga1851 | Socket::Am5 | Socket::Str5 => &[MemoryType::Ddr5],
            Socket::Lga1700 => &[MemoryType::Ddr4, MemoryType::Ddr5],
            Socket::Lga1200 | Socket::Lga2066 | Socket::Am4 | Socket::Strx4 => &[MemoryType::Ddr4],
            Socket::Lga1151 => &[MemoryType::Ddr3, MemoryType::Ddr4],
        }
    }

    pub fn supports_memory(&self, memory: MemoryType) -> bool {
        self.supported_memory_types().contains(&memory)
    }
}

impl fmt::Display for Socket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Chipset
// =============================================================================

/// Chipset family, the unit the generation and memory-speed tables are keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChipsetFamily {
    Intel300,
    Intel400,
    Intel500,
    Intel600,
    Intel700,
    Intel800,
    Amd300,
    Amd400,
    Amd500,
    Amd600,
    Amd800,
    AmdTrx40,
    AmdTrx50,
}

/// CPU generations a chipset family accepts, and how hard a mismatch fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationSupport {
    pub compatible: &'static [u32],
    /// `true`: an unsupported generation cannot boot (error).
    /// `false`: support depends on firmware (warning).
    pub strict: bool,
}

impl GenerationSupport {
    pub fn supports(&self, generation: u32) -> bool {
        self.compatible.contains(&generation)
    }
}

impl ChipsetFamily {
    pub fn generation_support(&self) -> GenerationSupport {
        let (compatible, strict): (&'static [u32], bool) = match self {
            ChipsetFamily::Intel300 => (&[8, 9], true),
            ChipsetFamily::Intel400 | ChipsetFamily::Intel500 => (&[10, 11], true),
            ChipsetFamily::Intel600 | ChipsetFamily::Intel700 => (&[12, 13, 14], true),
            ChipsetFamily::Intel800 => (&[15], true),
            ChipsetFamily::Amd300 | ChipsetFamily::Amd400 => (&[1000, 2000, 3000, 5000], false),
            ChipsetFamily::Amd500 => (&[3000, 5000], false),
            ChipsetFamily::Amd600 | ChipsetFamily::Amd800 => (&[7000, 8000, 9000], true),
            ChipsetFamily::AmdTrx40 => (&[3000], true),
            ChipsetFamily::AmdTrx50 => (&[7000], true),
        };
        GenerationSupport { compatible, strict }
    }

    /// Documented memory speed ceiling in MHz, `None` when the family has no
    /// support for that memory type at all.
    pub fn max_memory_speed(&self, memory: MemoryType) -> Option<f64> {
        let mhz = match (self, memory) {
            (ChipsetFamily::Intel300, MemoryType::Ddr4) => 2666,
            (ChipsetFamily::Intel400, MemoryType::Ddr4) => 2933,
            (ChipsetFamily::Intel500, MemoryType::Ddr4) => 3200,
            (ChipsetFamily::Intel600, MemoryType::Ddr4) => 3200,
            (ChipsetFamily::Intel600, MemoryType::Ddr5) => 4800,
            (ChipsetFamily::Intel700, MemoryType::Ddr4) => 3200,
            (ChipsetFamily::Intel700, MemoryType::Ddr5) => 5600,
            (ChipsetFamily::Intel800, MemoryType::Ddr5) => 6400,
            (ChipsetFamily::Amd300, MemoryType::Ddr4) => 2933,
            (ChipsetFamily::Amd400, MemoryType::Ddr4) => 2933,
            (ChipsetFamily::Amd500, MemoryType::Ddr4) => 3200,
            (ChipsetFamily::Amd600, MemoryType::Ddr5) => 5200,
            (ChipsetFamily::Amd800, MemoryType::Ddr5) => 5600,
            (ChipsetFamily::AmdTrx40, MemoryType::Ddr4) => 3200,
            (ChipsetFamily::AmdTrx50, MemoryType::Ddr5) => 5200,
            _ => return None,
        };
        Some(f64::from(mhz))
    }
}

/// Motherboard chipset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Chipset {
    Z390,
    B365,
    B360,
    H370,
    H310,
    Z490,
    H470,
    B460,
    H410,
    Z590,
    H570,
    B560,
    H510,
    Z690,
    H670,
    B660,
    H610,
    Z790,
    H770,
    B760,
    Z890,
    B860,
    H810,
    X370,
    B350,
    A320,
    X470,
    B450,
    X570,
    B550,
    A520,
    X670E,
    X670,
    B650E,
    B650,
    A620,
    X870E,
    X870,
    B850,
    TRX40,
    TRX50,
}

impl Chipset {
    pub const ALL: [Chipset; 41] = [
        Chipset::Z390,
        Chipset::B365,
        Chipset::B360,
        Chipset::H370,
        Chipset::H310,
        Chipset::Z490,
        Chipset::H470,
        Chipset::B460,
        Chipset::H410,
        Chipset::Z590,
        Chipset::H570,
        Chipset::B560,
        Chipset::H510,
        Chipset::Z690,
        Chipset::H670,
        Chipset::B660,
        Chipset::H610,
        Chipset::Z790,
        Chipset::H770,
        Chipset::B760,
        Chipset::Z890,
        Chipset::B860,
        Chipset::H810,
        Chipset::X370,
        Chipset::B350,
        Chipset::A320,
        Chipset::X470,
        Chipset::B450,
        Chipset::X570,
        Chipset::B550,
        Chipset::A520,
        Chipset::X670E,
        Chipset::X670,
        Chipset::B650E,
        Chipset::B650,
        Chipset::A620,
        Chipset::X870E,
        Chipset::X870,
        Chipset::B850,
        Chipset::TRX40,
        Chipset::TRX50,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Chipset::Z390 => "Z390",
            Chipset::B365 => "B365",
            Chipset::B360 => "B360",
            Chipset::H370 => "H370",
            Chipset::H310 => "H310",
            Chipset::Z490 => "Z490",
            Chipset::H470 => "H470",
            Chipset::B460 => "B460",
            Chipset::H410 => "H410",
            Chipset::Z590 => "Z590",
            Chipset::H570 => "H570",
            Chipset::B560 => "B560",
            Chipset::H510 => "H510",
            Chipset::Z690 => "Z690",
            Chipset::H670 => "H670",
            Chipset::B660 => "B660",
            Chipset::H610 => "H610",
            Chipset::Z790 => "Z790",
            Chipset::H770 => "H770",
            Chipset::B760 => "B760",
            Chipset::Z890 => "Z890",
            Chipset::B860 => "B860",
            Chipset::H810 => "H810",
            Chipset::X370 => "X370",
            Chipset::B350 => "B350",
            Chipset::A320 => "A320",
            Chipset::X470 => "X470",
            Chipset::B450 => "B450",
            Chipset::X570 => "X570",
            Chipset::B550 => "B550",
            Chipset::A520 => "A520",
            Chipset::X670E => "X670E",
            Chipset::X670 => "X670",
            Chipset::B650E => "B650E",
            Chipset::B650 => "B650",
            Chipset::A620 => "A620",
            Chipset::X870E => "X870E",
            Chipset::X870 => "X870",
            Chipset::B850 => "B850",
            Chipset::TRX40 => "TRX40",
            Chipset::TRX50 => "TRX50",
        }
    }

    /// Resolves `Z790`, `Intel Z790`, `AMD B650 chipset` and similar spellings.
    pub fn parse(raw: &str) -> Option<Self> {
        let key = alias_key(raw);
        let key = key
            .strip_prefix("INTEL")
            .or_else(|| key.strip_prefix("AMD"))
            .unwrap_or(&key);
        let key = key.strip_suffix("CHIPSET").unwrap_or(key);
        Self::ALL.into_iter().find(|chipset| chipset.as_str() == key)
    }

    pub fn canonical_names() -> Vec<String> {
        Self::ALL.iter().map(|c| c.as_str().to_string()).collect()
    }

    pub fn family(&self) -> ChipsetFamily {
        use Chipset::*;
        match self {
            Z390 | B365 | B360 | H370 | H310 => ChipsetFamily::Intel300,
            Z490 | H470 | B460 | H410 => ChipsetFamily::Intel400,
            Z590 | H570 | B560 | H510 => ChipsetFamily::Intel500,
            Z690 | H670 | B660 | H610 => ChipsetFamily::Intel600,
            Z790 | H770 | B760 => ChipsetFamily::Intel700,
            Z890 | B860 | H810 => ChipsetFamily::Intel800,
            X370 | B350 | A320 => ChipsetFamily::Amd300,
            X470 | B450 => ChipsetFamily::Amd400,
            X570 | B550 | A520 => ChipsetFamily::Amd500,
            X670E | X670 | B650E | B650 | A620 => ChipsetFamily::Amd600,
            X870E | X870 | B850 => ChipsetFamily::Amd800,
            TRX40 => ChipsetFamily::AmdTrx40,
            TRX50 => ChipsetFamily::AmdTrx50,
        }
    }

    /// Sockets a board with this chipset can carry.
    pub fn supported_sockets(&self) -> &'static [Socket] {
        match self.family() {
            ChipsetFamily::Intel300 => &[Socket::Lga1151],
            ChipsetFamily::Intel400 | ChipsetFamily::Intel500 => &[Socket::Lga1200],
            ChipsetFamily::Intel600 | ChipsetFamily::Intel700 => &[Socket::Lga1700],
            ChipsetFamily::Intel800 => &[Socket::Lga1851],
            ChipsetFamily::Amd300 | ChipsetFamily::Amd400 | ChipsetFamily::Amd500 => {
                &[Socket::Am4]
            }
            ChipsetFamily::Amd600 | ChipsetFamily::Amd800 => &[Socket::Am5],
            ChipsetFamily::AmdTrx40 => &[Socket::Strx4],
            ChipsetFamily::AmdTrx50 => &[Socket::Str5],
        }
    }

    pub fn supports_socket(&self, socket: Socket) -> bool {
        self.supported_sockets().contains(&socket)
    }
}

impl fmt::Display for Chipset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Form Factor
// =============================================================================

/// Motherboard / case size class, ordered from smallest to largest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormFactor {
    MiniItx,
    MicroAtx,
    Atx,
    EAtx,
}

impl FormFactor {
    /// Canonical spellings, also the enum domain of the `form_factor` declarations.
    pub const NAMES: [&'static str; 4] = ["Mini-ITX", "Micro-ATX", "ATX", "E-ATX"];

    pub fn parse(raw: &str) -> Option<Self> {
        match alias_key(raw).as_str() {
            "MINIITX" | "ITX" => Some(FormFactor::MiniItx),
            "MICROATX" | "MATX" | "UATX" => Some(FormFactor::MicroAtx),
            "ATX" => Some(FormFactor::Atx),
            "EATX" | "EXTENDEDATX" => Some(FormFactor::EAtx),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FormFactor::MiniItx => "Mini-ITX",
            FormFactor::MicroAtx => "Micro-ATX",
            FormFactor::Atx => "ATX",
            FormFactor::EAtx => "E-ATX",
        }
    }
}

// =============================================================================
// Cooler Type / Storage Interface
// =============================================================================

/// Cooling technology of a CPU cooler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoolerType {
    Air,
    Liquid,
}

impl CoolerType {
    pub const NAMES: [&'static str; 2] = ["Air", "Liquid"];

    pub fn parse(raw: &str) -> Option<Self> {
        match alias_key(raw).as_str() {
            "AIR" | "TOWER" => Some(CoolerType::Air),
            "LIQUID" | "AIO" | "WATER" => Some(CoolerType::Liquid),
            _ => None,
        }
    }

    /// Share of the rated capacity above which the cooler runs near its limit.
    pub fn comfort_ratio(&self) -> f64 {
        match self {
            CoolerType::Air => 0.8,
            CoolerType::Liquid => 0.9,
        }
    }

    /// Pump/fan draw estimate in watts.
    pub fn watts(&self) -> f64 {
        match self {
            CoolerType::Air => 5.0,
            CoolerType::Liquid => 15.0,
        }
    }
}

/// Storage interface class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageInterface {
    Nvme,
    SataSsd,
    Hdd,
}

impl StorageInterface {
    pub const NAMES: [&'static str; 3] = ["NVMe", "SATA SSD", "HDD"];

    pub fn parse(raw: &str) -> Option<Self> {
        match alias_key(raw).as_str() {
            "NVME" | "M2NVME" | "PCIENVME" => Some(StorageInterface::Nvme),
            "SATASSD" | "SSD" | "SATA" => Some(StorageInterface::SataSsd),
            "HDD" | "SATAHDD" => Some(StorageInterface::Hdd),
            _ => None,
        }
    }

    pub fn watts(&self) -> f64 {
        match self {
            StorageInterface::Nvme => 7.0,
            StorageInterface::SataSsd => 4.0,
            StorageInterface::Hdd => 9.0,
        }
    }
}

// =============================================================================
// CPU Generation Inference
// =============================================================================

/// Derives the CPU generation from a product title.
///
/// Intel generations are reported as their ordinal (`Core i7-13700K` → 13,
/// `Core Ultra 9 285K` → 15); AMD generations as their series
/// (`Ryzen 7 7800X3D` → 7000, `Threadripper 3970X` → 3000).
pub fn infer_cpu_generation(title: &str) -> Option<u32> {
    let lower = title.to_ascii_lowercase();
    let tokens: Vec<&str> = lower
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();

    let leading_digits = |token: &str| -> String {
        token.chars().take_while(|c| c.is_ascii_digit()).collect()
    };

    if tokens.iter().any(|t| *t == "ryzen" || *t == "threadripper") {
        return tokens.iter().find_map(|t| {
            let digits = leading_digits(t);
            (digits.len() == 4)
                .then(|| digits[..1].parse::<u32>().ok())
                .flatten()
                .map(|series| series * 1000)
        });
    }

    if tokens.contains(&"ultra") {
        // Core Ultra desktop parts: 2xx is the 200S series (generation 15).
        return tokens.iter().find_map(|t| {
            let digits = leading_digits(t);
            (digits.len() == 3 && digits.starts_with('2')).then_some(15)
        });
    }

    let model_index = tokens
        .iter()
        .position(|t| matches!(*t, "i3" | "i5" | "i7" | "i9"))?;
    tokens[model_index + 1..].iter().find_map(|t| {
        let digits = leading_digits(t);
        match digits.len() {
            5 => digits[..2].parse().ok(),
            4 => digits[..1].parse().ok(),
            _ => None,
        }
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
