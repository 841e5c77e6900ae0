//! Compute the colours actually rendered for an icon.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::palette::{IconIndexEntry, PaletteIndex};

use super::colour::apply_hsl_shift;
use super::grouping::CollapsedGradient;
use super::state::{CustomizationMode, CustomizationState};

/// A resolved paint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Paint {
    Colour(String),
    /// Defer to the inherited CSS `color`.
    CurrentColor,
}

impl fmt::Display for Paint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Paint::Colour(c) => f.write_str(c),
            Paint::CurrentColor => f.write_str("currentColor"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedSolid {
    pub original: String,
    pub paint: Paint,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedGradient {
    pub hash: String,
    /// One paint per stop, in offset order.
    pub stops: Vec<Paint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedIcon {
    pub name: String,
    pub solids: Vec<ResolvedSolid>,
    pub gradients: Vec<ResolvedGradient>,
}

/// Read-only view over a state snapshot and the palette.
pub struct ColorResolver<'a> {
    state: &'a CustomizationState,
    palette: &'a PaletteIndex,
}

impl<'a> ColorResolver<'a> {
    pub fn new(state: &'a CustomizationState, palette: &'a PaletteIndex) -> Self {
        Self { state, palette }
    }

    pub fn resolve_solid(&self, original: &str) -> Paint {
        match self.state.mode {
            CustomizationMode::Original => Paint::Colour(original.to_string()),
            CustomizationMode::CurrentColor => Paint::CurrentColor,
            CustomizationMode::SingleColorPicker => Paint::Colour(self.state.single_color.clone()),
            CustomizationMode::CustomPalette => match self.state.solid_override(original) {
                Some(color) => Paint::Colour(color.to_string()),
                None => Paint::Colour(apply_hsl_shift(original, &self.state.hsl_shift)),
            },
        }
    }

    /// Stops keep their stored colour in custom palette mode unless overridden.
    pub fn resolve_stop(&self, hash: &str, index: usize, original: &str) -> Paint {
        match self.state.mode {
            CustomizationMode::Original => Paint::Colour(original.to_string()),
            CustomizationMode::CurrentColor => Paint::CurrentColor,
            CustomizationMode::SingleColorPicker => Paint::Colour(self.state.single_color.clone()),
            CustomizationMode::CustomPalette => Paint::Colour(
                self.state
                    .gradient_override(hash, index)
                    .unwrap_or(original)
                    .to_string(),
            ),
        }
    }

    pub fn resolve_icon(&self, icon: &IconIndexEntry) -> ResolvedIcon {
        let solids = icon
            .solid_colors
            .iter()
            .map(|original| ResolvedSolid {
                original: original.clone(),
                paint: self.resolve_solid(original),
            })
            .collect();

        let gradients = icon
            .gradient_refs
            .iter()
            .filter_map(|hash| {
                let Some(structure) = self.palette.gradient(hash) else {
                    debug!(icon = %icon.name, %hash, "gradient ref not in palette");
                    return None;
                };
                let stops = structure
                    .gradient
                    .stops
                    .iter()
                    .enumerate()
                    .map(|(i, stop)| self.resolve_stop(hash, i, &stop.color))
                    .collect();
                Some(ResolvedGradient {
                    hash: hash.clone(),
                    stops,
                })
            })
            .collect();

        ResolvedIcon {
            name: icon.name.clone(),
            solids,
            gradients,
        }
    }

    /// The colour a collapsed gradient's editor shows for `ui_index`.
    ///
    /// The first member with an override on the stop holding the original
    /// colour wins. Otherwise the original colour is shown.
    pub fn resolve_picker_color(
        &self,
        collapsed: &CollapsedGradient,
        ui_index: usize,
    ) -> Option<String> {
        let original = &collapsed.stops.get(ui_index)?.color;

        for hash in &collapsed.original_hashes {
            let Some(index) = self.palette.stop_index_of(hash, original) else {
                continue;
            };
            if let Some(color) = self.state.gradient_override(hash, index) {
                return Some(color.to_string());
            }
        }

        Some(original.clone())
    }
}
