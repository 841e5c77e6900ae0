//! swatch - icon palette pipeline
//!
//! Exports icon SVGs from a design document, deduplicates their gradients
//! by structure into one shared palette, and recolours icons at runtime
//! from a customization state without touching the SVG files.

pub mod cli;
pub mod config;
pub mod customize;
pub mod document;
pub mod error;
pub mod fetch;
pub mod output;
pub mod palette;
pub mod pipeline;
pub mod svg;
pub mod validation;

pub use config::{Config, Credentials, Section};
pub use customize::{
    ColorResolver, CustomizationMode, CustomizationState, CustomizationStore, HslShift, Paint,
    StoreActor, StoreCommand,
};
pub use document::{DocumentNode, DocumentWalker, IconSet, IconTarget};
pub use error::{Result, SwatchError};
pub use fetch::{AssetFetcher, DocumentApi, FetchError, FigmaClient, ImageExport};
pub use crate::palette::{
    gradient_hash, IconIndexEntry, IconLibraryData, Palette, UniqueGradientStructure,
};
pub use pipeline::{BuildReport, Pipeline};
pub use validation::{validate_library, Diagnostic, Diagnostics, Severity};
