//! Runtime recolouring of icons against a loaded palette.

mod actor;
mod colour;
mod grouping;
mod resolver;
mod state;
mod store;
mod throttle;

pub use actor::{StoreActor, StoreHandle};
pub use colour::{apply_hsl_shift, Colour};
pub use grouping::{color_signature, group_gradients, CollapsedGradient, CollapsedStop};
pub use resolver::{ColorResolver, Paint, ResolvedGradient, ResolvedIcon, ResolvedSolid};
pub use state::{CustomizationMode, CustomizationState, HslShift};
pub use store::{CustomizationStore, Propagation, StoreCommand};
pub use throttle::{Throttle, THROTTLE_MS};
