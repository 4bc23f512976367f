//! Wire constants for Wooting keyboards

/// Wooting vendor ID
pub const VENDOR_ID: u16 = 0x31E3;

/// Usage page of the configuration interface (RGB commands)
pub const CFG_USAGE_PAGE: u16 = 0x1337;

/// Usage page of the analog report interface
pub const ANALOG_USAGE_PAGE: u16 = 0xFF54;

/// Magic preamble at the start of every command frame
pub const MAGIC: [u8; 2] = [0xD0, 0xDA];

/// Report id used for every feature and output report
pub const REPORT_ID: u8 = 0;

/// Length of a feature command frame (magic + command + 4 params)
pub const FEATURE_FRAME_LEN: usize = 7;

/// Fixed size of the raw colour output report
pub const RGB_REPORT_SIZE: usize = 256;

/// Header length of the raw colour report (magic + report id)
pub const RGB_REPORT_HEADER_LEN: usize = 3;

/// Command and report identifiers
pub mod cmd {
    /// Raw colour buffer report
    pub const RAW_COLORS_REPORT: u8 = 11;
    /// Device configuration query
    pub const DEVICE_CONFIG: u8 = 19;
    /// Set a single key colour
    pub const SINGLE_COLOR: u8 = 30;
    /// Reset a single key colour
    pub const SINGLE_RESET: u8 = 31;
    /// Reset all keys and hand lighting back to the keyboard
    pub const RESET_ALL: u8 = 32;
    /// Colour control initialisation
    pub const COLOR_INIT: u8 = 33;
}

/// Product ids, already masked with `0xFFF0`
pub mod pid {
    pub const TWO_V2: u16 = 0x1200;
    pub const TWO_LE: u16 = 0x1210;
    pub const TWO_HE: u16 = 0x1220;
    pub const TWO_HE_ARM: u16 = 0x1230;
    pub const SIXTY_HE: u16 = 0x1300;
    pub const SIXTY_HE_ARM: u16 = 0x1310;
    pub const SIXTY_HE_PLUS: u16 = 0x1320;
    pub const EIGHTY_HE: u16 = 0x1400;
    pub const UWU: u16 = 0x1500;
    pub const UWU_RGB: u16 = 0x1510;
}

/// Matrix dimensions shared by the keyboard table
pub mod matrix {
    /// Rows on every full keyboard
    pub const RGB_ROWS: u8 = 6;
    /// Columns on full-size (Two) boards
    pub const TWO_RGB_COLS: u8 = 21;
    /// Columns on 60% boards
    pub const SIXTY_RGB_COLS: u8 = 14;
    /// Columns on 80% boards
    pub const EIGHTY_RGB_COLS: u8 = 17;
    /// Highest LED index on full keyboards
    pub const TWO_KEY_CODE_LIMIT: u8 = 116;
}
