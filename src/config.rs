//! Driver configuration
//!
//! Stored as TOML at `<config_dir>/wooting/driver.toml`. Every field has a
//! default, so a missing file or a partial file both load.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use wooting_keyboard::{DevicesOptions, Rgb};

/// Colours the buffered demo cycles through
pub const DEFAULT_DEMO_COLOURS: [Rgb; 6] = [
    Rgb::new(255, 0, 0),
    Rgb::new(0, 255, 0),
    Rgb::new(0, 0, 255),
    Rgb::new(127, 127, 0),
    Rgb::new(0, 127, 127),
    Rgb::new(127, 0, 127),
];

/// Demo timing and palette
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Palette indexed by row, then by column
    pub colours: Vec<Rgb>,
    /// Pause between the row and column passes (ms)
    pub step_ms: u64,
    /// How long the final state is shown before resetting (ms)
    pub hold_ms: u64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            colours: DEFAULT_DEMO_COLOURS.to_vec(),
            step_ms: 2000,
            hold_ms: 5000,
        }
    }
}

impl DemoConfig {
    /// Palette entry for an index, wrapping around
    ///
    /// An empty palette steps around the hue wheel instead.
    pub fn colour(&self, index: u8) -> Rgb {
        if self.colours.is_empty() {
            return Rgb::from_hsv(index as f32 * 60.0, 1.0, 1.0);
        }
        self.colours[index as usize % self.colours.len()]
    }
}

/// Top-level driver configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Log filter used when `RUST_LOG` is unset
    pub log_level: String,
    /// Capabilities to claim
    pub devices: DevicesOptions,
    pub demo: DemoConfig,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            devices: DevicesOptions::default(),
            demo: DemoConfig::default(),
        }
    }
}

impl DriverConfig {
    /// Get the default config file path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("wooting")
            .join("driver.toml")
    }

    /// Load config from a file, or return default if not found
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::parse(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse config from TOML text
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Save config to a file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Device options after command-line overrides
    pub fn device_options(&self, analog: bool, no_rgb: bool) -> DevicesOptions {
        DevicesOptions {
            rgb: self.devices.rgb && !no_rgb,
            analog: self.devices.analog || analog,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(DriverConfig::parse("").unwrap(), DriverConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config = DriverConfig::parse(
            r##"
log_level = "debug"

[devices]
analog = true

[demo]
colours = ["#ffffff", "00ff00"]
"##,
        )
        .unwrap();

        assert_eq!(config.log_level, "debug");
        assert!(config.devices.rgb);
        assert!(config.devices.analog);
        assert_eq!(config.demo.colours, vec![Rgb::WHITE, Rgb::GREEN]);
        assert_eq!(config.demo.hold_ms, 5000);
    }

    #[test]
    fn test_bad_colour_is_rejected() {
        let err = DriverConfig::parse("[demo]\ncolours = [\"#12345\"]").unwrap_err();
        assert!(err.to_string().contains("Hex code invalid"), "{err}");
    }

    #[test]
    fn test_serialized_form_parses_back() {
        let config = DriverConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        assert!(text.contains("#ff0000"));
        assert_eq!(DriverConfig::parse(&text).unwrap(), config);
    }

    #[test]
    fn test_command_line_overrides() {
        let config = DriverConfig::default();
        assert_eq!(
            config.device_options(true, true),
            DevicesOptions {
                rgb: false,
                analog: true
            }
        );
        assert_eq!(config.device_options(false, false), DevicesOptions::default());
    }

    #[test]
    fn test_palette_wraps() {
        let demo = DemoConfig::default();
        assert_eq!(demo.colour(0), Rgb::RED);
        assert_eq!(demo.colour(7), Rgb::GREEN);

        let empty = DemoConfig {
            colours: Vec::new(),
            ..DemoConfig::default()
        };
        assert_eq!(empty.colour(0), Rgb::RED);
        assert_eq!(empty.colour(3), Rgb::new(0, 255, 255));
    }
}
