//! The icon library artifact: index entries plus the shared palette.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SwatchError};
use crate::svg::GradientInfo;

/// A gradient structure together with its structural hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniqueGradientStructure {
    pub hash: String,
    #[serde(flatten)]
    pub gradient: GradientInfo,
}

/// One exported icon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconIndexEntry {
    #[serde(rename = "type")]
    pub icon_type: String,
    pub category: String,
    pub name: String,
    /// SVG path relative to the output root, always `/`-separated.
    pub file_path: String,
    pub node_id: String,
    /// Solid paints this icon uses, sorted.
    pub solid_colors: Vec<String>,
    /// Hashes into `palette.unique_gradients`.
    pub gradient_refs: Vec<String>,
}

/// Global, deduplicated colour data across all icons.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Palette {
    pub unique_solid_colors: Vec<String>,
    pub unique_gradients: Vec<UniqueGradientStructure>,
}

impl Palette {
    pub fn gradient(&self, hash: &str) -> Option<&UniqueGradientStructure> {
        self.unique_gradients.iter().find(|g| g.hash == hash)
    }
}

/// The single build artifact consumed at runtime.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IconLibraryData {
    pub icons: Vec<IconIndexEntry>,
    pub palette: Palette,
}

impl IconLibraryData {
    /// Read an index file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| SwatchError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read index: {}", e),
        })?;

        serde_json::from_str(&content).map_err(|e| SwatchError::Parse {
            message: format!("Invalid index {}: {}", path.display(), e),
            help: Some("Regenerate it with `swatch build`".to_string()),
        })
    }

    /// Write the index as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| SwatchError::Io {
                path: parent.to_path_buf(),
                message: format!("Failed to create directory: {}", e),
            })?;
        }

        let mut json = serde_json::to_string_pretty(self).map_err(|e| SwatchError::Build {
            message: format!("Failed to serialize index: {}", e),
            help: None,
        })?;
        json.push('\n');

        std::fs::write(path, json).map_err(|e| SwatchError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to write index: {}", e),
        })
    }

    pub fn icon(&self, name: &str) -> Option<&IconIndexEntry> {
        self.icons.iter().find(|i| i.name == name)
    }
}
