//! Gradient hashing, palette aggregation and the library artifact.

mod aggregate;
mod hash;
mod index;
mod library;

pub use aggregate::PaletteAggregator;
pub use hash::{canonical_json, gradient_hash, HASH_LENGTH};
pub use index::PaletteIndex;
pub use library::{IconIndexEntry, IconLibraryData, Palette, UniqueGradientStructure};
