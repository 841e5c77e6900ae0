//! Folds per-icon extraction results into the shared palette and index.

use std::collections::{BTreeSet, HashSet};

use tracing::{debug, warn};

use crate::document::IconTarget;
use crate::svg::ColorExtraction;
use crate::validation::Diagnostics;

use super::hash::gradient_hash;
use super::library::{IconIndexEntry, IconLibraryData, Palette, UniqueGradientStructure};

/// Accumulates icons in processing order.
///
/// Gradient hashes are stable across runs; the order of
/// `unique_gradients` follows the order icons were added.
#[derive(Debug, Default)]
pub struct PaletteAggregator {
    icons: Vec<IconIndexEntry>,
    solids: BTreeSet<String>,
    gradients: Vec<UniqueGradientStructure>,
    seen_hashes: HashSet<String>,
    seen_paths: HashSet<String>,
    diagnostics: Diagnostics,
}

impl PaletteAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one exported icon. Returns `false` if its file path was taken.
    pub fn add(&mut self, target: &IconTarget, extraction: &ColorExtraction) -> bool {
        let file_path = target.file_path();
        if !self.seen_paths.insert(file_path.clone()) {
            warn!(%file_path, node = %target.node_id, "duplicate icon path, skipping");
            self.diagnostics.warn(
                "swatch::index::duplicate-path",
                &target.node_id,
                format!("{} is already taken by an earlier icon", file_path),
            );
            return false;
        }

        self.solids.extend(extraction.solid_colors.iter().cloned());

        let mut refs: Vec<String> = Vec::with_capacity(extraction.gradients.len());
        for extracted in &extraction.gradients {
            let hash = gradient_hash(&extracted.info);
            if self.seen_hashes.insert(hash.clone()) {
                debug!(%hash, id = %extracted.id, "new gradient structure");
                self.gradients.push(UniqueGradientStructure {
                    hash: hash.clone(),
                    gradient: extracted.info.clone(),
                });
            }
            if !refs.contains(&hash) {
                refs.push(hash);
            }
        }

        self.icons.push(IconIndexEntry {
            icon_type: target.icon_type.clone(),
            category: target.category.clone(),
            name: target.name.clone(),
            file_path,
            node_id: target.node_id.clone(),
            solid_colors: extraction.solid_colors.iter().cloned().collect(),
            gradient_refs: refs,
        });
        true
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }

    /// Produce the library artifact and the warnings raised while adding.
    pub fn finish(self) -> (IconLibraryData, Diagnostics) {
        let library = IconLibraryData {
            icons: self.icons,
            palette: Palette {
                unique_solid_colors: self.solids.into_iter().collect(),
                unique_gradients: self.gradients,
            },
        };
        (library, self.diagnostics)
    }
}
