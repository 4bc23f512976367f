//! Static capability table - product id to matrix dimensions
//!
//! Single source of truth for the models this crate can drive. Entries are
//! keyed by masked product id so every hardware revision of a model shares
//! one record.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::protocol::{matrix, pid};

/// Physical form factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceType {
    Unknown,
    Tkl,
    Keyboard,
    Keyboard60,
    Keypad3Key,
    Keyboard80,
}

/// Key layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    Unknown,
    Ansi,
    Iso,
}

/// Capability metadata for one model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyboardInfo {
    pub model: &'static str,
    pub device_type: DeviceType,
    /// LED matrix rows
    pub rows: u8,
    /// LED matrix columns
    pub columns: u8,
    /// Highest LED index
    pub led_max: u8,
    /// Speaks the second-generation protocol
    pub v2: bool,
    pub layout: Layout,
    /// Firmware only accepts small packets (chunked RGB transfers)
    pub small_packets: bool,
}

const WOOTING_TWO_V2: KeyboardInfo = KeyboardInfo {
    model: "Wooting Two",
    device_type: DeviceType::Keyboard,
    rows: matrix::RGB_ROWS,
    columns: matrix::TWO_RGB_COLS,
    led_max: matrix::TWO_KEY_CODE_LIMIT,
    v2: true,
    layout: Layout::Unknown,
    small_packets: false,
};

const WOOTING_TWO_LE: KeyboardInfo = KeyboardInfo {
    model: "Wooting Two Lekker Edition",
    ..WOOTING_TWO_V2
};

const WOOTING_TWO_HE: KeyboardInfo = KeyboardInfo {
    model: "Wooting Two HE",
    ..WOOTING_TWO_V2
};

const WOOTING_TWO_HE_ARM: KeyboardInfo = KeyboardInfo {
    model: "Wooting Two HE (ARM)",
    small_packets: true,
    ..WOOTING_TWO_V2
};

const WOOTING_60HE: KeyboardInfo = KeyboardInfo {
    model: "Wooting 60HE",
    device_type: DeviceType::Keyboard60,
    columns: matrix::SIXTY_RGB_COLS,
    ..WOOTING_TWO_V2
};

const WOOTING_60HE_ARM: KeyboardInfo = KeyboardInfo {
    model: "Wooting 60HE (ARM)",
    small_packets: true,
    ..WOOTING_60HE
};

const WOOTING_60HE_PLUS: KeyboardInfo = KeyboardInfo {
    model: "Wooting 60HE+",
    small_packets: true,
    ..WOOTING_60HE
};

const WOOTING_80HE: KeyboardInfo = KeyboardInfo {
    model: "Wooting 80HE",
    device_type: DeviceType::Keyboard80,
    columns: matrix::EIGHTY_RGB_COLS,
    ..WOOTING_TWO_V2
};

const WOOTING_UWU_RGB: KeyboardInfo = KeyboardInfo {
    model: "Wooting UwU RGB",
    device_type: DeviceType::Keypad3Key,
    rows: 5,
    columns: 7,
    led_max: 18,
    v2: true,
    layout: Layout::Unknown,
    small_packets: true,
};

const WOOTING_UWU: KeyboardInfo = KeyboardInfo {
    model: "Wooting UwU",
    led_max: 0,
    ..WOOTING_UWU_RGB
};

/// All known models, keyed by masked product id
const KNOWN_KEYBOARDS: &[(u16, KeyboardInfo)] = &[
    (pid::TWO_V2, WOOTING_TWO_V2),
    (pid::TWO_LE, WOOTING_TWO_LE),
    (pid::TWO_HE, WOOTING_TWO_HE),
    (pid::TWO_HE_ARM, WOOTING_TWO_HE_ARM),
    (pid::SIXTY_HE, WOOTING_60HE),
    (pid::SIXTY_HE_ARM, WOOTING_60HE_ARM),
    (pid::SIXTY_HE_PLUS, WOOTING_60HE_PLUS),
    (pid::EIGHTY_HE, WOOTING_80HE),
    (pid::UWU, WOOTING_UWU),
    (pid::UWU_RGB, WOOTING_UWU_RGB),
];

/// Lookup table built once on first use
pub struct KeyboardTable {
    by_pid: HashMap<u16, KeyboardInfo>,
}

impl KeyboardTable {
    fn new() -> Self {
        Self {
            by_pid: KNOWN_KEYBOARDS.iter().copied().collect(),
        }
    }

    /// Look up by masked product id
    pub fn get(&self, masked_pid: u16) -> Option<&KeyboardInfo> {
        self.by_pid.get(&masked_pid)
    }

    /// All entries, unordered
    pub fn iter(&self) -> impl Iterator<Item = (u16, &KeyboardInfo)> {
        self.by_pid.iter().map(|(pid, info)| (*pid, info))
    }
}

/// Global keyboard table
pub fn keyboard_table() -> &'static KeyboardTable {
    static TABLE: OnceLock<KeyboardTable> = OnceLock::new();
    TABLE.get_or_init(KeyboardTable::new)
}

/// Resolve metadata for an (unmasked) product id
pub fn lookup(product_id: u16) -> Option<&'static KeyboardInfo> {
    keyboard_table().get(wooting_transport::masked_product_id(product_id))
}
