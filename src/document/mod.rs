//! Document tree walking and variant selection.
//!
//! Turns the raw design document into an ordered list of icon sets, each
//! reduced to the single variant that gets exported.

mod node;
mod slug;
mod variant;
mod walker;

pub use node::{DocumentFile, DocumentNode, NodeKind};
pub use slug::slugify;
pub use variant::{parse_variant_name, select_variant, SkipReason, Variant, PREFERRED_SIZE};
pub use walker::{
    DocumentWalker, IconSet, IconTarget, SetKind, WalkResult, DEFAULT_CATEGORY, PRIVATE_CATEGORY,
};
