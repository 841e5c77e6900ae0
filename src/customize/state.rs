//! Persistable customization state.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SwatchError};

/// How icons are coloured at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CustomizationMode {
    /// Stored colours, unmodified.
    #[default]
    Original,
    /// Every paint defers to the inherited CSS colour.
    CurrentColor,
    /// Every solid and stop becomes one colour.
    SingleColorPicker,
    /// Per-colour and per-stop overrides plus a global HSL shift.
    CustomPalette,
}

impl fmt::Display for CustomizationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CustomizationMode::Original => "original",
            CustomizationMode::CurrentColor => "currentColor",
            CustomizationMode::SingleColorPicker => "singleColorPicker",
            CustomizationMode::CustomPalette => "customPalette",
        };
        f.write_str(name)
    }
}

/// Hue in degrees, saturation and lightness in percentage points.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HslShift {
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
}

impl HslShift {
    /// Build a shift clamped to hue ∈ [-180, 180], saturation and lightness ∈ [-100, 100].
    pub fn new(hue: f32, saturation: f32, lightness: f32) -> Self {
        Self {
            hue,
            saturation,
            lightness,
        }
        .clamped()
    }

    pub fn clamped(self) -> Self {
        Self {
            hue: self.hue.clamp(-180.0, 180.0),
            saturation: self.saturation.clamp(-100.0, 100.0),
            lightness: self.lightness.clamp(-100.0, 100.0),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.hue == 0.0 && self.saturation == 0.0 && self.lightness == 0.0
    }
}

/// Everything the resolver needs besides the palette itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomizationState {
    pub mode: CustomizationMode,
    pub hsl_shift: HslShift,
    pub single_color: String,
    /// Gradient hash to stop index to colour.
    pub gradient_overrides: BTreeMap<String, BTreeMap<usize, String>>,
    /// Original solid colour to replacement.
    pub solid_overrides: BTreeMap<String, String>,
}

impl Default for CustomizationState {
    fn default() -> Self {
        Self {
            mode: CustomizationMode::Original,
            hsl_shift: HslShift::default(),
            single_color: "#000000".to_string(),
            gradient_overrides: BTreeMap::new(),
            solid_overrides: BTreeMap::new(),
        }
    }
}

impl CustomizationState {
    /// Load a saved profile (JSON).
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| SwatchError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read profile: {}", e),
        })?;
        let mut state: Self = serde_json::from_str(&content).map_err(|e| SwatchError::Parse {
            message: format!("Invalid profile {}: {}", path.display(), e),
            help: Some("A profile is the JSON form of a customization state".to_string()),
        })?;
        state.hsl_shift = state.hsl_shift.clamped();
        Ok(state)
    }

    pub fn gradient_override(&self, hash: &str, index: usize) -> Option<&str> {
        self.gradient_overrides
            .get(hash)
            .and_then(|stops| stops.get(&index))
            .map(String::as_str)
    }

    pub fn solid_override(&self, color: &str) -> Option<&str> {
        self.solid_overrides.get(color).map(String::as_str)
    }
}
