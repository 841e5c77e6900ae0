//! Single-writer owner of the customization state.

use tracing::{debug, warn};

use crate::palette::{Palette, PaletteIndex};

use super::grouping::{group_gradients, CollapsedGradient};
use super::state::{CustomizationMode, CustomizationState, HslShift};

/// Every mutation the store accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCommand {
    SetMode(CustomizationMode),
    SetHslShift(HslShift),
    SetSingleColor(String),
    SetSolidOverride { original: String, color: String },
    ClearSolidOverride(String),
    SetGradientStop { hash: String, index: usize, color: String },
    /// Edit one stop of a collapsed group, addressed by colour signature.
    SetCollapsedStop { signature: String, ui_index: usize, color: String },
    Load(CustomizationState),
    Reset,
}

/// Where a collapsed-stop edit landed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Propagation {
    /// `(hash, stop index)` pairs that were written.
    pub updated: Vec<(String, usize)>,
    /// Member hashes that have no stop with the edited colour.
    pub skipped: Vec<String>,
}

/// Owns the state and the palette it refers to.
///
/// All writes go through the methods here; readers take snapshots.
#[derive(Debug, Clone)]
pub struct CustomizationStore {
    state: CustomizationState,
    palette: PaletteIndex,
    groups: Vec<CollapsedGradient>,
}

impl CustomizationStore {
    /// Start from the default state for a freshly loaded palette.
    pub fn new(palette: &Palette) -> Self {
        Self {
            state: CustomizationState::default(),
            palette: PaletteIndex::new(palette),
            groups: group_gradients(&palette.unique_gradients),
        }
    }

    pub fn state(&self) -> &CustomizationState {
        &self.state
    }

    pub fn palette(&self) -> &PaletteIndex {
        &self.palette
    }

    /// Collapsed gradients, sorted by signature.
    pub fn groups(&self) -> &[CollapsedGradient] {
        &self.groups
    }

    pub fn group(&self, signature: &str) -> Option<&CollapsedGradient> {
        self.groups.iter().find(|g| g.color_signature == signature)
    }

    pub fn set_mode(&mut self, mode: CustomizationMode) {
        debug!(from = %self.state.mode, to = %mode, "mode change");
        self.state.mode = mode;
    }

    pub fn set_hsl_shift(&mut self, shift: HslShift) {
        self.state.hsl_shift = shift.clamped();
    }

    pub fn set_single_color(&mut self, color: impl Into<String>) {
        self.state.single_color = color.into();
    }

    pub fn set_solid_override(&mut self, original: impl Into<String>, color: impl Into<String>) {
        self.state.solid_overrides.insert(original.into(), color.into());
    }

    pub fn clear_solid_override(&mut self, original: &str) {
        self.state.solid_overrides.remove(original);
    }

    /// Override one stop of one gradient. Unknown hashes and out-of-range
    /// indices are ignored with a warning.
    pub fn update_gradient_stop_override(
        &mut self,
        hash: &str,
        index: usize,
        color: impl Into<String>,
    ) -> bool {
        match self.palette.stop_count(hash) {
            None => {
                warn!(%hash, "override for a gradient not in the palette, ignored");
                false
            }
            Some(count) if index >= count => {
                warn!(%hash, index, count, "override for a missing stop, ignored");
                false
            }
            Some(_) => {
                self.state
                    .gradient_overrides
                    .entry(hash.to_string())
                    .or_default()
                    .insert(index, color.into());
                true
            }
        }
    }

    /// Write `color` into every member of `collapsed` at the stop holding the
    /// representative's original colour for `ui_index`.
    pub fn update_collapsed_stop(
        &mut self,
        collapsed: &CollapsedGradient,
        ui_index: usize,
        color: &str,
    ) -> Propagation {
        let mut report = Propagation::default();
        let Some(original) = collapsed.stops.get(ui_index).map(|s| s.color.clone()) else {
            warn!(
                signature = %collapsed.color_signature,
                ui_index,
                "no such stop in collapsed gradient"
            );
            return report;
        };

        for hash in &collapsed.original_hashes {
            match self.palette.stop_index_of(hash, &original) {
                Some(index) => {
                    self.state
                        .gradient_overrides
                        .entry(hash.clone())
                        .or_default()
                        .insert(index, color.to_string());
                    report.updated.push((hash.clone(), index));
                }
                None => {
                    warn!(%hash, %original, "gradient has no stop with this colour, skipped");
                    report.skipped.push(hash.clone());
                }
            }
        }

        report
    }

    /// Replace the whole state, dropping overrides that no longer match the
    /// palette. Returns the number of dropped entries.
    pub fn load_state(&mut self, mut state: CustomizationState) -> usize {
        let mut pruned = 0;
        let palette = &self.palette;

        state.gradient_overrides.retain(|hash, stops| {
            let Some(count) = palette.stop_count(hash) else {
                debug!(%hash, "dropping overrides for stale gradient");
                pruned += stops.len();
                return false;
            };
            let before = stops.len();
            stops.retain(|index, _| *index < count);
            pruned += before - stops.len();
            !stops.is_empty()
        });

        state.hsl_shift = state.hsl_shift.clamped();
        self.state = state;
        pruned
    }

    /// Back to the default state. The palette is kept.
    pub fn reset(&mut self) {
        self.state = CustomizationState::default();
    }

    /// Apply one command.
    pub fn apply(&mut self, command: StoreCommand) {
        match command {
            StoreCommand::SetMode(mode) => self.set_mode(mode),
            StoreCommand::SetHslShift(shift) => self.set_hsl_shift(shift),
            StoreCommand::SetSingleColor(color) => self.set_single_color(color),
            StoreCommand::SetSolidOverride { original, color } => {
                self.set_solid_override(original, color)
            }
            StoreCommand::ClearSolidOverride(original) => self.clear_solid_override(&original),
            StoreCommand::SetGradientStop { hash, index, color } => {
                self.update_gradient_stop_override(&hash, index, color);
            }
            StoreCommand::SetCollapsedStop {
                signature,
                ui_index,
                color,
            } => match self.group(&signature).cloned() {
                Some(group) => {
                    self.update_collapsed_stop(&group, ui_index, &color);
                }
                None => warn!(%signature, "no collapsed gradient with this signature"),
            },
            StoreCommand::Load(state) => {
                self.load_state(state);
            }
            StoreCommand::Reset => self.reset(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::{gradient_hash, UniqueGradientStructure};
    use crate::svg::{GradientInfo, GradientKind};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn structure(info: GradientInfo) -> UniqueGradientStructure {
        UniqueGradientStructure {
            hash: gradient_hash(&info),
            gradient: info,
        }
    }

    /// Two red/blue gradients with the colours in opposite stop order.
    fn palette() -> Palette {
        let forward = GradientInfo::new(GradientKind::Linear)
            .with_stop(0.0, "red", 1.0)
            .with_stop(1.0, "blue", 1.0);
        let backward = GradientInfo::new(GradientKind::Linear)
            .with_stop(0.0, "blue", 1.0)
            .with_stop(1.0, "red", 1.0);
        Palette {
            unique_solid_colors: vec!["#fff".to_string()],
            unique_gradients: vec![structure(forward), structure(backward)],
        }
    }

    #[test]
    fn test_direct_override_validates_target() {
        let palette = palette();
        let hash = palette.unique_gradients[0].hash.clone();
        let mut store = CustomizationStore::new(&palette);

        assert!(store.update_gradient_stop_override(&hash, 1, "#00ff00"));
        assert!(!store.update_gradient_stop_override(&hash, 2, "#00ff00"));
        assert!(!store.update_gradient_stop_override("stale", 0, "#00ff00"));

        assert_eq!(store.state().gradient_override(&hash, 1), Some("#00ff00"));
        assert_eq!(store.state().gradient_overrides.len(), 1);
    }

    #[test]
    fn test_collapsed_edit_uses_each_members_own_index() {
        let palette = palette();
        let forward = palette.unique_gradients[0].hash.clone();
        let backward = palette.unique_gradients[1].hash.clone();
        let mut store = CustomizationStore::new(&palette);
        let group = store.groups()[0].clone();
        assert_eq!(group.color_signature, "blue|red");

        // UI stop 0 of the representative is "red"
        let report = store.update_collapsed_stop(&group, 0, "#ff8800");

        assert_eq!(report.updated, vec![(forward.clone(), 0), (backward.clone(), 1)]);
        assert!(report.skipped.is_empty());
        assert_eq!(store.state().gradient_override(&forward, 0), Some("#ff8800"));
        assert_eq!(store.state().gradient_override(&backward, 1), Some("#ff8800"));
    }

    #[test]
    fn test_collapsed_edit_skips_members_without_colour() {
        let palette = palette();
        let mut store = CustomizationStore::new(&palette);
        let mut group = store.groups()[0].clone();
        // A member whose stops do not carry the edited colour
        group.original_hashes.push("not-in-palette".to_string());

        let report = store.update_collapsed_stop(&group, 1, "#000");
        assert_eq!(report.updated.len(), 2);
        assert_eq!(report.skipped, vec!["not-in-palette".to_string()]);
    }

    #[test]
    fn test_load_state_prunes_stale_keys() {
        let palette = palette();
        let hash = palette.unique_gradients[0].hash.clone();
        let mut store = CustomizationStore::new(&palette);

        let mut state = CustomizationState::default();
        state.gradient_overrides.insert(
            hash.clone(),
            BTreeMap::from([(0, "#111".to_string()), (5, "#222".to_string())]),
        );
        state
            .gradient_overrides
            .insert("gone".to_string(), BTreeMap::from([(0, "#333".to_string())]));

        assert_eq!(store.load_state(state), 2);
        assert_eq!(store.state().gradient_override(&hash, 0), Some("#111"));
        assert_eq!(store.state().gradient_overrides.len(), 1);
    }

    #[test]
    fn test_apply_and_reset() {
        let mut store = CustomizationStore::new(&palette());
        store.apply(StoreCommand::SetMode(CustomizationMode::SingleColorPicker));
        store.apply(StoreCommand::SetSingleColor("#112233".into()));
        store.apply(StoreCommand::SetHslShift(HslShift {
            hue: 400.0,
            saturation: 0.0,
            lightness: 0.0,
        }));

        assert_eq!(store.state().mode, CustomizationMode::SingleColorPicker);
        assert_eq!(store.state().hsl_shift.hue, 180.0);

        store.apply(StoreCommand::Reset);
        assert_eq!(store.state(), &CustomizationState::default());
    }

    #[test]
    fn test_collapsed_command_by_signature() {
        let palette = palette();
        let mut store = CustomizationStore::new(&palette);
        store.apply(StoreCommand::SetCollapsedStop {
            signature: "blue|red".into(),
            ui_index: 1,
            color: "#0000aa".into(),
        });
        store.apply(StoreCommand::SetCollapsedStop {
            signature: "missing".into(),
            ui_index: 0,
            color: "#fff".into(),
        });

        let total: usize = store.state().gradient_overrides.values().map(|s| s.len()).sum();
        assert_eq!(total, 2);
    }
}
